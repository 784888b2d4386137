use crate::{
    entities::{cart, cart_item, item, Cart, CartItem, Item, Member},
    errors::ServiceError,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

/// Shopping cart service. A member's cart is created lazily on the
/// first add.
#[derive(Clone)]
pub struct CartService {
    db: Arc<DatabaseConnection>,
}

impl CartService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Add an item to the member's cart, merging quantity when the item
    /// is already in the cart. Adds are capped by the item's stock.
    #[instrument(skip(self))]
    pub async fn add_item(
        &self,
        member_id: i64,
        input: AddToCartInput,
    ) -> Result<cart_item::Model, ServiceError> {
        if input.quantity <= 0 {
            return Err(ServiceError::InvalidInput(
                "quantity must be greater than zero".to_string(),
            ));
        }

        let item = Item::find_by_id(input.item_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Item {} not found", input.item_id)))?;

        let cart = self.get_or_create_cart(member_id).await?;

        let existing = CartItem::find()
            .filter(cart_item::Column::CartId.eq(cart.id))
            .filter(cart_item::Column::ItemId.eq(item.id))
            .one(&*self.db)
            .await?;

        let merged_quantity = existing.as_ref().map_or(0, |line| line.quantity) + input.quantity;
        if merged_quantity > item.stock_quantity {
            return Err(ServiceError::Conflict(format!(
                "Not enough stock for item {}: requested {}, available {}",
                item.id, merged_quantity, item.stock_quantity
            )));
        }

        let line = match existing {
            Some(line) => {
                let mut active: cart_item::ActiveModel = line.into();
                active.quantity = Set(merged_quantity);
                active.update(&*self.db).await?
            }
            None => {
                let line = cart_item::ActiveModel {
                    cart_id: Set(cart.id),
                    item_id: Set(item.id),
                    quantity: Set(input.quantity),
                    ..Default::default()
                };
                line.insert(&*self.db).await?
            }
        };

        info!("Cart {}: item {} now x{}", cart.id, item.id, line.quantity);
        Ok(line)
    }

    /// Detail view of the member's cart, joining each line with its item
    #[instrument(skip(self))]
    pub async fn get_cart_items(&self, member_id: i64) -> Result<Vec<CartLine>, ServiceError> {
        let cart = match self.find_cart(member_id).await? {
            Some(cart) => cart,
            None => return Ok(Vec::new()),
        };

        let lines = CartItem::find()
            .filter(cart_item::Column::CartId.eq(cart.id))
            .find_also_related(Item)
            .order_by_asc(cart_item::Column::Id)
            .all(&*self.db)
            .await?;

        lines
            .into_iter()
            .map(|(line, item)| {
                let item = item.ok_or_else(|| {
                    ServiceError::InternalError(format!(
                        "cart line {} references missing item {}",
                        line.id, line.item_id
                    ))
                })?;
                Ok(CartLine::new(line, &item))
            })
            .collect()
    }

    /// Change the quantity of a cart line
    #[instrument(skip(self))]
    pub async fn update_quantity(
        &self,
        cart_item_id: i64,
        quantity: i32,
    ) -> Result<cart_item::Model, ServiceError> {
        if quantity <= 0 {
            return Err(ServiceError::InvalidInput(
                "quantity must be greater than zero".to_string(),
            ));
        }

        let line = self.get_cart_line(cart_item_id).await?;

        let item = Item::find_by_id(line.item_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Item {} not found", line.item_id)))?;

        if quantity > item.stock_quantity {
            return Err(ServiceError::Conflict(format!(
                "Not enough stock for item {}: requested {}, available {}",
                item.id, quantity, item.stock_quantity
            )));
        }

        let mut active: cart_item::ActiveModel = line.into();
        active.quantity = Set(quantity);
        active.update(&*self.db).await.map_err(Into::into)
    }

    /// Remove a line from the cart
    #[instrument(skip(self))]
    pub async fn remove_item(&self, cart_item_id: i64) -> Result<(), ServiceError> {
        let line = self.get_cart_line(cart_item_id).await?;
        line.delete(&*self.db).await?;
        info!("Removed cart line {}", cart_item_id);
        Ok(())
    }

    pub(crate) async fn get_cart_line(
        &self,
        cart_item_id: i64,
    ) -> Result<cart_item::Model, ServiceError> {
        CartItem::find_by_id(cart_item_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Cart item {} not found", cart_item_id)))
    }

    async fn find_cart(&self, member_id: i64) -> Result<Option<cart::Model>, ServiceError> {
        Cart::find()
            .filter(cart::Column::MemberId.eq(member_id))
            .one(&*self.db)
            .await
            .map_err(Into::into)
    }

    async fn get_or_create_cart(&self, member_id: i64) -> Result<cart::Model, ServiceError> {
        if let Some(cart) = self.find_cart(member_id).await? {
            return Ok(cart);
        }

        Member::find_by_id(member_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Member {} not found", member_id)))?;

        let cart = cart::ActiveModel {
            member_id: Set(member_id),
            ..Default::default()
        };
        let cart = cart.insert(&*self.db).await?;

        info!("Created cart {} for member {}", cart.id, member_id);
        Ok(cart)
    }
}

/// Input for adding an item to a cart
#[derive(Debug, Deserialize, Serialize)]
pub struct AddToCartInput {
    pub item_id: i64,
    pub quantity: i32,
}

/// A cart line joined with its catalog item
#[derive(Debug, Clone, Serialize)]
pub struct CartLine {
    pub cart_item_id: i64,
    pub item_id: i64,
    pub item_name: String,
    pub price: i32,
    pub quantity: i32,
}

impl CartLine {
    fn new(line: cart_item::Model, item: &item::Model) -> Self {
        Self {
            cart_item_id: line.id,
            item_id: item.id,
            item_name: item.name.clone(),
            price: item.price,
            quantity: line.quantity,
        }
    }
}
