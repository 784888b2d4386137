use crate::{
    entities::{item, Item, ItemSellStatus},
    errors::ServiceError,
    queries::{self, ItemSearchCriteria, Page, PageRequest},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

/// Catalog service for managing and searching items
#[derive(Clone)]
pub struct ItemService {
    db: Arc<DatabaseConnection>,
}

impl ItemService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Create a new catalog item
    #[instrument(skip(self, input))]
    pub async fn create_item(&self, input: CreateItemInput) -> Result<item::Model, ServiceError> {
        validate_item_fields(&input.name, input.price, input.stock_quantity)?;

        let item = item::ActiveModel {
            name: Set(input.name),
            detail: Set(input.detail),
            price: Set(input.price),
            stock_quantity: Set(input.stock_quantity),
            sell_status: Set(input.sell_status),
            ..Default::default()
        };

        let item = item.insert(&*self.db).await?;

        info!("Created item: {}", item.id);
        Ok(item)
    }

    /// Update an existing item. Absent fields are left untouched.
    #[instrument(skip(self, input))]
    pub async fn update_item(
        &self,
        item_id: i64,
        input: UpdateItemInput,
    ) -> Result<item::Model, ServiceError> {
        let item = self.get_item(item_id).await?;
        let mut active: item::ActiveModel = item.into();

        if let Some(name) = input.name {
            if name.trim().is_empty() {
                return Err(ServiceError::InvalidInput(
                    "item name cannot be blank".to_string(),
                ));
            }
            active.name = Set(name);
        }
        if let Some(detail) = input.detail {
            active.detail = Set(detail);
        }
        if let Some(price) = input.price {
            if price < 0 {
                return Err(ServiceError::InvalidInput(
                    "price cannot be negative".to_string(),
                ));
            }
            active.price = Set(price);
        }
        if let Some(stock_quantity) = input.stock_quantity {
            if stock_quantity < 0 {
                return Err(ServiceError::InvalidInput(
                    "stock quantity cannot be negative".to_string(),
                ));
            }
            active.stock_quantity = Set(stock_quantity);
        }
        if let Some(sell_status) = input.sell_status {
            active.sell_status = Set(sell_status);
        }

        let item = active.update(&*self.db).await?;
        info!("Updated item: {}", item_id);
        Ok(item)
    }

    /// Get an item by ID
    #[instrument(skip(self))]
    pub async fn get_item(&self, item_id: i64) -> Result<item::Model, ServiceError> {
        Item::find_by_id(item_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Item {} not found", item_id)))
    }

    /// Filtered, paginated search over the catalog
    #[instrument(skip(self))]
    pub async fn search(
        &self,
        criteria: &ItemSearchCriteria,
        page_request: &PageRequest,
    ) -> Result<Page<item::Model>, ServiceError> {
        queries::search_items(&self.db, criteria, page_request).await
    }

    /// Items with exactly the given name
    #[instrument(skip(self))]
    pub async fn find_by_name(&self, name: &str) -> Result<Vec<item::Model>, ServiceError> {
        Item::find()
            .filter(item::Column::Name.eq(name))
            .all(&*self.db)
            .await
            .map_err(Into::into)
    }

    /// Items whose name or detail matches exactly
    #[instrument(skip(self))]
    pub async fn find_by_name_or_detail(
        &self,
        name: &str,
        detail: &str,
    ) -> Result<Vec<item::Model>, ServiceError> {
        Item::find()
            .filter(
                Condition::any()
                    .add(item::Column::Name.eq(name))
                    .add(item::Column::Detail.eq(detail)),
            )
            .all(&*self.db)
            .await
            .map_err(Into::into)
    }

    /// Items priced strictly below the bound, most expensive first
    #[instrument(skip(self))]
    pub async fn find_by_price_less_than(
        &self,
        price: i32,
    ) -> Result<Vec<item::Model>, ServiceError> {
        Item::find()
            .filter(item::Column::Price.lt(price))
            .order_by_desc(item::Column::Price)
            .all(&*self.db)
            .await
            .map_err(Into::into)
    }

    /// Items whose detail contains the fragment, most expensive first
    #[instrument(skip(self))]
    pub async fn find_by_detail(&self, detail: &str) -> Result<Vec<item::Model>, ServiceError> {
        Item::find()
            .filter(item::Column::Detail.contains(detail))
            .order_by_desc(item::Column::Price)
            .all(&*self.db)
            .await
            .map_err(Into::into)
    }
}

fn validate_item_fields(name: &str, price: i32, stock_quantity: i32) -> Result<(), ServiceError> {
    if name.trim().is_empty() {
        return Err(ServiceError::InvalidInput(
            "item name cannot be blank".to_string(),
        ));
    }
    if price < 0 {
        return Err(ServiceError::InvalidInput(
            "price cannot be negative".to_string(),
        ));
    }
    if stock_quantity < 0 {
        return Err(ServiceError::InvalidInput(
            "stock quantity cannot be negative".to_string(),
        ));
    }
    Ok(())
}

/// Input for creating an item
#[derive(Debug, Deserialize, Serialize)]
pub struct CreateItemInput {
    pub name: String,
    pub detail: String,
    pub price: i32,
    pub stock_quantity: i32,
    pub sell_status: ItemSellStatus,
}

/// Input for updating an item
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct UpdateItemInput {
    pub name: Option<String>,
    pub detail: Option<String>,
    pub price: Option<i32>,
    pub stock_quantity: Option<i32>,
    pub sell_status: Option<ItemSellStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn blank_name_is_rejected() {
        assert_matches!(
            validate_item_fields("   ", 1000, 10),
            Err(ServiceError::InvalidInput(_))
        );
    }

    #[test]
    fn negative_price_is_rejected() {
        assert_matches!(
            validate_item_fields("Widget", -1, 10),
            Err(ServiceError::InvalidInput(_))
        );
    }

    #[test]
    fn negative_stock_is_rejected() {
        assert_matches!(
            validate_item_fields("Widget", 1000, -1),
            Err(ServiceError::InvalidInput(_))
        );
    }

    #[test]
    fn zero_price_and_stock_are_valid() {
        assert!(validate_item_fields("Widget", 0, 0).is_ok());
    }
}
