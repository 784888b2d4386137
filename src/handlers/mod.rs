use crate::services::{CartService, ItemService, MemberService, OrderService};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

pub mod carts;
pub mod common;
pub mod health;
pub mod items;
pub mod members;
pub mod orders;

pub use crate::AppState;

/// Service container shared across handlers via [`AppState`]
#[derive(Clone)]
pub struct AppServices {
    pub items: Arc<ItemService>,
    pub members: Arc<MemberService>,
    pub carts: Arc<CartService>,
    pub orders: Arc<OrderService>,
}

impl AppServices {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            items: Arc::new(ItemService::new(db.clone())),
            members: Arc::new(MemberService::new(db.clone())),
            carts: Arc::new(CartService::new(db.clone())),
            orders: Arc::new(OrderService::new(db)),
        }
    }
}
