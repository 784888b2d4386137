mod common;

use assert_matches::assert_matches;
use common::TestApp;
use shop_api::entities::ItemSellStatus;
use shop_api::errors::ServiceError;
use shop_api::services::items::{CreateItemInput, UpdateItemInput};

fn input(name: &str, detail: &str, price: i32) -> CreateItemInput {
    CreateItemInput {
        name: name.to_string(),
        detail: detail.to_string(),
        price,
        stock_quantity: 100,
        sell_status: ItemSellStatus::OnSale,
    }
}

#[tokio::test]
async fn create_and_get_item_round_trip() {
    let app = TestApp::new().await;
    let items = app.services();

    let created = items
        .items
        .create_item(input("Test item", "Test detail", 10000))
        .await
        .unwrap();

    assert!(created.id > 0);
    assert_eq!(created.sell_status, ItemSellStatus::OnSale);

    let fetched = items.items.get_item(created.id).await.unwrap();
    assert_eq!(fetched.name, "Test item");
    assert_eq!(fetched.price, 10000);
}

#[tokio::test]
async fn create_rejects_blank_name_and_negative_numbers() {
    let app = TestApp::new().await;
    let items = &app.services().items;

    let result = items.create_item(input("   ", "detail", 100)).await;
    assert_matches!(result, Err(ServiceError::InvalidInput(_)));

    let result = items.create_item(input("Thing", "detail", -1)).await;
    assert_matches!(result, Err(ServiceError::InvalidInput(_)));

    let mut bad_stock = input("Thing", "detail", 100);
    bad_stock.stock_quantity = -5;
    let result = items.create_item(bad_stock).await;
    assert_matches!(result, Err(ServiceError::InvalidInput(_)));
}

#[tokio::test]
async fn update_item_changes_only_provided_fields() {
    let app = TestApp::new().await;
    let items = &app.services().items;

    let created = items
        .create_item(input("Original", "Original detail", 500))
        .await
        .unwrap();

    let updated = items
        .update_item(
            created.id,
            UpdateItemInput {
                price: Some(750),
                sell_status: Some(ItemSellStatus::SoldOut),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Original");
    assert_eq!(updated.price, 750);
    assert_eq!(updated.sell_status, ItemSellStatus::SoldOut);
}

#[tokio::test]
async fn get_missing_item_is_not_found() {
    let app = TestApp::new().await;

    let result = app.services().items.get_item(9999).await;
    assert_matches!(result, Err(ServiceError::NotFound(_)));
}

#[tokio::test]
async fn find_by_name_returns_exact_matches() {
    let app = TestApp::new().await;
    app.seed_catalog().await;

    let found = app.services().items.find_by_name("Product1").await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].detail, "Desc1");

    let missing = app.services().items.find_by_name("NoSuch").await.unwrap();
    assert!(missing.is_empty());
}

#[tokio::test]
async fn find_by_name_or_detail_matches_either_column() {
    let app = TestApp::new().await;
    app.seed_catalog().await;

    // "Product1" matches by name, "Desc5" matches a different row by detail
    let found = app
        .services()
        .items
        .find_by_name_or_detail("Product1", "Desc5")
        .await
        .unwrap();

    assert_eq!(found.len(), 2);
    let names: Vec<&str> = found.iter().map(|item| item.name.as_str()).collect();
    assert!(names.contains(&"Product1"));
    assert!(names.contains(&"Product5"));
}

#[tokio::test]
async fn find_by_price_less_than_orders_descending() {
    let app = TestApp::new().await;
    app.seed_catalog().await; // prices 1001..=1010

    let found = app
        .services()
        .items
        .find_by_price_less_than(1005)
        .await
        .unwrap();

    // Strictly below 1005: 1001..=1004, highest price first
    assert_eq!(found.len(), 4);
    let prices: Vec<i32> = found.iter().map(|item| item.price).collect();
    assert_eq!(prices, vec![1004, 1003, 1002, 1001]);
}

#[tokio::test]
async fn find_by_detail_substring_orders_by_price_descending() {
    let app = TestApp::new().await;
    app.seed_catalog().await;

    let found = app.services().items.find_by_detail("Desc").await.unwrap();

    assert_eq!(found.len(), 10);
    let prices: Vec<i32> = found.iter().map(|item| item.price).collect();
    let mut sorted = prices.clone();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    assert_eq!(prices, sorted);
    assert_eq!(prices[0], 1010);
}
