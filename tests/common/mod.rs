use chrono::{DateTime, Duration, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use shop_api::{
    config::AppConfig,
    db,
    entities::{item, ItemSellStatus},
    AppServices, AppState,
};
use std::sync::Arc;

/// In-memory application wired against a fresh sqlite database.
///
/// Each test gets its own database; the pool is capped at a single
/// connection so `sqlite::memory:` keeps its state.
pub struct TestApp {
    pub state: AppState,
}

impl TestApp {
    pub async fn new() -> Self {
        let mut config = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            18080,
            "test".to_string(),
        );
        config.auto_migrate = true;
        config.db_max_connections = 1;
        config.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&config)
            .await
            .expect("test database should connect");
        db::run_migrations(&pool)
            .await
            .expect("migrations should apply");

        let db = Arc::new(pool);
        let services = AppServices::new(db.clone());

        Self {
            state: AppState {
                db,
                config,
                services,
            },
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.state.db
    }

    pub fn services(&self) -> &AppServices {
        &self.state.services
    }

    /// Inserts an item with an explicit creation timestamp, bypassing
    /// the service layer so tests control ordering.
    pub async fn seed_item(
        &self,
        name: &str,
        detail: &str,
        price: i32,
        stock_quantity: i32,
        sell_status: ItemSellStatus,
        created_at: DateTime<Utc>,
    ) -> item::Model {
        item::ActiveModel {
            name: Set(name.to_string()),
            detail: Set(detail.to_string()),
            price: Set(price),
            stock_quantity: Set(stock_quantity),
            sell_status: Set(sell_status),
            created_at: Set(created_at),
            ..Default::default()
        }
        .insert(self.db())
        .await
        .expect("seed item should insert")
    }

    /// Seeds ten on-sale items Product1..Product10, each a minute newer
    /// than the last.
    pub async fn seed_catalog(&self) -> Vec<item::Model> {
        let base = Utc::now() - Duration::hours(1);
        let mut items = Vec::with_capacity(10);
        for i in 1..=10 {
            let item = self
                .seed_item(
                    &format!("Product{}", i),
                    &format!("Desc{}", i),
                    1000 + i,
                    100,
                    ItemSellStatus::OnSale,
                    base + Duration::minutes(i64::from(i)),
                )
                .await;
            items.push(item);
        }
        items
    }
}
