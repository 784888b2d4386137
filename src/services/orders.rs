use crate::{
    entities::{
        cart, cart_item, item, order, order_item, Cart, CartItem, Item, ItemSellStatus, Member,
        Order, OrderItem, OrderStatus,
    },
    errors::ServiceError,
    queries::{Page, PageRequest},
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

/// Order service. Placement and cancellation run inside a single
/// transaction so stock counts and order rows never diverge.
#[derive(Clone)]
pub struct OrderService {
    db: Arc<DatabaseConnection>,
}

impl OrderService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Place an order for a single item
    #[instrument(skip(self))]
    pub async fn place_order(
        &self,
        member_id: i64,
        input: PlaceOrderInput,
    ) -> Result<order::Model, ServiceError> {
        if input.quantity <= 0 {
            return Err(ServiceError::InvalidInput(
                "quantity must be greater than zero".to_string(),
            ));
        }

        let txn = self.db.begin().await?;

        Member::find_by_id(member_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Member {} not found", member_id)))?;

        let placed = create_order(&txn, member_id, &[(input.item_id, input.quantity)]).await?;

        txn.commit().await?;

        info!("Member {} placed order {}", member_id, placed.id);
        Ok(placed)
    }

    /// Order the given cart lines, removing them from the cart
    #[instrument(skip(self))]
    pub async fn order_cart_items(
        &self,
        member_id: i64,
        cart_item_ids: &[i64],
    ) -> Result<order::Model, ServiceError> {
        if cart_item_ids.is_empty() {
            return Err(ServiceError::InvalidInput(
                "no cart items selected".to_string(),
            ));
        }

        let txn = self.db.begin().await?;

        let cart = Cart::find()
            .filter(cart::Column::MemberId.eq(member_id))
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Member {} has no cart", member_id))
            })?;

        let mut requested = Vec::with_capacity(cart_item_ids.len());
        let mut lines = Vec::with_capacity(cart_item_ids.len());
        for &cart_item_id in cart_item_ids {
            let line = CartItem::find_by_id(cart_item_id)
                .one(&txn)
                .await?
                .filter(|line| line.cart_id == cart.id)
                .ok_or_else(|| {
                    ServiceError::NotFound(format!(
                        "Cart item {} not found in member {}'s cart",
                        cart_item_id, member_id
                    ))
                })?;
            requested.push((line.item_id, line.quantity));
            lines.push(line);
        }

        let placed = create_order(&txn, member_id, &requested).await?;

        for line in lines {
            line.delete(&txn).await?;
        }

        txn.commit().await?;

        info!("Member {} ordered cart lines into order {}", member_id, placed.id);
        Ok(placed)
    }

    /// Cancel an order and restore the stock it consumed
    #[instrument(skip(self))]
    pub async fn cancel_order(&self, order_id: i64) -> Result<order::Model, ServiceError> {
        let txn = self.db.begin().await?;

        let order = Order::find_by_id(order_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", order_id)))?;

        if order.status == OrderStatus::Cancelled {
            return Err(ServiceError::InvalidInput(format!(
                "Order {} is already cancelled",
                order_id
            )));
        }

        let lines = OrderItem::find()
            .filter(order_item::Column::OrderId.eq(order_id))
            .all(&txn)
            .await?;

        for line in &lines {
            let item = Item::find_by_id(line.item_id)
                .one(&txn)
                .await?
                .ok_or_else(|| ServiceError::NotFound(format!("Item {} not found", line.item_id)))?;

            let restored = item.stock_quantity + line.quantity;
            let was_sold_out = item.sell_status == ItemSellStatus::SoldOut;

            let mut active: item::ActiveModel = item.into();
            active.stock_quantity = Set(restored);
            if was_sold_out && restored > 0 {
                active.sell_status = Set(ItemSellStatus::OnSale);
            }
            active.update(&txn).await?;
        }

        let mut active: order::ActiveModel = order.into();
        active.status = Set(OrderStatus::Cancelled);
        let order = active.update(&txn).await?;

        txn.commit().await?;

        info!("Cancelled order {}", order_id);
        Ok(order)
    }

    /// Get an order with its lines
    #[instrument(skip(self))]
    pub async fn get_order(&self, order_id: i64) -> Result<OrderDetail, ServiceError> {
        let order = Order::find_by_id(order_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", order_id)))?;

        let lines = OrderItem::find()
            .filter(order_item::Column::OrderId.eq(order_id))
            .order_by_asc(order_item::Column::Id)
            .all(&*self.db)
            .await?;

        Ok(OrderDetail::new(order, lines))
    }

    /// Page through a member's orders, newest first
    #[instrument(skip(self))]
    pub async fn list_orders(
        &self,
        member_id: i64,
        page_request: &PageRequest,
    ) -> Result<Page<order::Model>, ServiceError> {
        page_request.validate()?;

        let query = Order::find().filter(order::Column::MemberId.eq(member_id));

        let total_count = query.clone().count(&*self.db).await?;

        let content = query
            .order_by_desc(order::Column::OrderDate)
            .order_by_desc(order::Column::Id)
            .limit(page_request.size)
            .offset(page_request.offset())
            .all(&*self.db)
            .await?;

        Ok(Page::new(content, total_count, page_request))
    }
}

/// Inserts the order header and one line per requested item,
/// decrementing stock as it goes. Items drained to zero flip to
/// [`ItemSellStatus::SoldOut`].
async fn create_order(
    txn: &DatabaseTransaction,
    member_id: i64,
    requested: &[(i64, i32)],
) -> Result<order::Model, ServiceError> {
    let order = order::ActiveModel {
        member_id: Set(member_id),
        status: Set(OrderStatus::Ordered),
        order_date: Set(Utc::now()),
        ..Default::default()
    };
    let order = order.insert(txn).await?;

    for &(item_id, quantity) in requested {
        let item = Item::find_by_id(item_id)
            .one(txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Item {} not found", item_id)))?;

        if quantity > item.stock_quantity {
            return Err(ServiceError::Conflict(format!(
                "Not enough stock for item {}: requested {}, available {}",
                item.id, quantity, item.stock_quantity
            )));
        }

        let line = order_item::ActiveModel {
            order_id: Set(order.id),
            item_id: Set(item.id),
            price: Set(item.price),
            quantity: Set(quantity),
            ..Default::default()
        };
        line.insert(txn).await?;

        let remaining = item.stock_quantity - quantity;
        let mut active: item::ActiveModel = item.into();
        active.stock_quantity = Set(remaining);
        if remaining == 0 {
            active.sell_status = Set(ItemSellStatus::SoldOut);
        }
        active.update(txn).await?;
    }

    Ok(order)
}

/// Input for placing a single-item order
#[derive(Debug, Deserialize, Serialize)]
pub struct PlaceOrderInput {
    pub item_id: i64,
    pub quantity: i32,
}

/// An order header joined with its lines
#[derive(Debug, Clone, Serialize)]
pub struct OrderDetail {
    pub order: order::Model,
    pub lines: Vec<order_item::Model>,
    pub total_price: i64,
}

impl OrderDetail {
    fn new(order: order::Model, lines: Vec<order_item::Model>) -> Self {
        let total_price = lines
            .iter()
            .map(|line| i64::from(line.price) * i64::from(line.quantity))
            .sum();
        Self {
            order,
            lines,
            total_price,
        }
    }
}
