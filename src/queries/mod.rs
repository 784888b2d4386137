pub mod item_search;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::ServiceError;

pub use item_search::{search_items, ItemSearchCriteria, SearchDateRange, SearchTarget};

pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 100;

/// Zero-based page request. Validated before any store round-trip;
/// sizes above [`MAX_PAGE_SIZE`] are clamped, not rejected.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u64,
    pub size: u64,
}

impl PageRequest {
    pub fn new(page: u64, size: u64) -> Self {
        Self {
            page,
            size: size.min(MAX_PAGE_SIZE),
        }
    }

    /// Rejects unusable pagination input so the store is never queried
    /// with a degenerate request.
    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.size == 0 {
            return Err(ServiceError::InvalidInput(
                "page size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn offset(&self) -> u64 {
        self.page.saturating_mul(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// A bounded slice of results plus total-count metadata, echoing the
/// page request it answered.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_count: u64,
    pub page: u64,
    pub size: u64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, total_count: u64, request: &PageRequest) -> Self {
        Self {
            content,
            total_count,
            page: request.page,
            size: request.size,
        }
    }

    pub fn total_pages(&self) -> u64 {
        if self.total_count == 0 {
            0
        } else {
            (self.total_count + self.size - 1) / self.size
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            total_count: self.total_count,
            page: self.page,
            size: self.size,
        }
    }
}
