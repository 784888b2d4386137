//! Filtered, paginated item search.
//!
//! Criteria translate into a conjunction of the filters that are
//! actually present; absent filters impose no constraint. The fetch is
//! ordered by creation time descending with the identifier as the
//! tie-break, so repeated calls against an unchanged store return
//! identical pages.

use chrono::{DateTime, Duration, Months, Utc};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use super::{Page, PageRequest};
use crate::{
    entities::{item, Item, ItemSellStatus},
    errors::ServiceError,
};

/// Relative date window over the item creation timestamp
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SearchDateRange {
    #[default]
    All,
    Day,
    Week,
    Month,
    Year,
}

impl SearchDateRange {
    /// Lower bound for `created_at`, or `None` when the window is
    /// unbounded. Month and year windows are calendar-based.
    pub fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Self::All => None,
            Self::Day => Some(now - Duration::days(1)),
            Self::Week => Some(now - Duration::weeks(1)),
            Self::Month => now.checked_sub_months(Months::new(1)),
            Self::Year => now.checked_sub_months(Months::new(12)),
        }
    }
}

/// Field selector for the keyword filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SearchTarget {
    Name,
    Detail,
    /// Either field matching suffices
    #[default]
    All,
}

/// Request-scoped description of the desired filters. Constructed per
/// request and discarded after use.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemSearchCriteria {
    #[serde(default)]
    pub date_range: SearchDateRange,
    #[serde(default)]
    pub sell_status: Option<ItemSellStatus>,
    #[serde(default)]
    pub target: SearchTarget,
    #[serde(default)]
    pub query: String,
    /// Strictly-greater-than price floor
    #[serde(default)]
    pub min_price: Option<i32>,
}

impl ItemSearchCriteria {
    /// Composes the conjunction of the present filters. An empty (or
    /// all-whitespace) query string imposes no keyword constraint
    /// regardless of the target.
    pub fn to_condition(&self, now: DateTime<Utc>) -> Condition {
        let mut condition = Condition::all();

        if let Some(status) = self.sell_status {
            condition = condition.add(item::Column::SellStatus.eq(status));
        }

        if let Some(cutoff) = self.date_range.cutoff(now) {
            condition = condition.add(item::Column::CreatedAt.gte(cutoff));
        }

        let query = self.query.trim();
        if !query.is_empty() {
            condition = condition.add(match self.target {
                SearchTarget::Name => Condition::all().add(item::Column::Name.contains(query)),
                SearchTarget::Detail => Condition::all().add(item::Column::Detail.contains(query)),
                SearchTarget::All => Condition::any()
                    .add(item::Column::Name.contains(query))
                    .add(item::Column::Detail.contains(query)),
            });
        }

        if let Some(min_price) = self.min_price {
            condition = condition.add(item::Column::Price.gt(min_price));
        }

        condition
    }
}

/// Executes the filtered fetch: count the matching rows, then pull one
/// page ordered newest-first. Read-only; store failures propagate
/// without retry and never yield a truncated page.
pub async fn search_items(
    db: &DatabaseConnection,
    criteria: &ItemSearchCriteria,
    page_request: &PageRequest,
) -> Result<Page<item::Model>, ServiceError> {
    page_request.validate()?;

    debug!(?criteria, ?page_request, "Executing item search");

    let query = Item::find().filter(criteria.to_condition(Utc::now()));

    let total_count = query.clone().count(db).await?;

    let content = query
        .order_by_desc(item::Column::CreatedAt)
        .order_by_desc(item::Column::Id)
        .limit(page_request.size)
        .offset(page_request.offset())
        .all(db)
        .await?;

    Ok(Page::new(content, total_count, page_request))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_and_week_cutoffs_are_fixed_windows() {
        let now = Utc::now();
        assert_eq!(SearchDateRange::Day.cutoff(now), Some(now - Duration::days(1)));
        assert_eq!(
            SearchDateRange::Week.cutoff(now),
            Some(now - Duration::weeks(1))
        );
    }

    #[test]
    fn month_cutoff_is_calendar_based() {
        let now = "2024-03-31T12:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let cutoff = SearchDateRange::Month.cutoff(now).unwrap();
        // February has no 31st; chrono clamps to the end of the month.
        assert_eq!(cutoff.to_rfc3339(), "2024-02-29T12:00:00+00:00");
    }

    #[test]
    fn all_window_is_unbounded() {
        assert_eq!(SearchDateRange::All.cutoff(Utc::now()), None);
    }

    #[test]
    fn default_criteria_has_empty_query() {
        let criteria = ItemSearchCriteria::default();
        assert_eq!(criteria.query, "");
        assert_eq!(criteria.date_range, SearchDateRange::All);
        assert_eq!(criteria.target, SearchTarget::All);
        assert!(criteria.sell_status.is_none());
        assert!(criteria.min_price.is_none());
    }

    #[test]
    fn criteria_deserializes_from_query_style_input() {
        let criteria: ItemSearchCriteria = serde_json::from_value(serde_json::json!({
            "date_range": "week",
            "sell_status": "ON_SALE",
            "target": "detail",
            "query": "Desc",
        }))
        .unwrap();

        assert_eq!(criteria.date_range, SearchDateRange::Week);
        assert_eq!(criteria.sell_status, Some(ItemSellStatus::OnSale));
        assert_eq!(criteria.target, SearchTarget::Detail);
        assert_eq!(criteria.query, "Desc");
    }
}
