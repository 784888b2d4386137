mod common;

use assert_matches::assert_matches;
use chrono::Utc;
use common::TestApp;
use shop_api::entities::{ItemSellStatus, OrderStatus};
use shop_api::errors::ServiceError;
use shop_api::queries::PageRequest;
use shop_api::services::carts::AddToCartInput;
use shop_api::services::members::RegisterMemberInput;
use shop_api::services::orders::PlaceOrderInput;

async fn register_member(app: &TestApp, email: &str) -> i64 {
    app.services()
        .members
        .register(RegisterMemberInput {
            email: email.to_string(),
            name: "Test Member".to_string(),
            address: "1 Test Street".to_string(),
            password: "correct horse battery".to_string(),
        })
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn placing_an_order_decrements_stock_and_snapshots_price() {
    let app = TestApp::new().await;
    let member_id = register_member(&app, "buyer@example.com").await;
    let item = app
        .seed_item("Kettle", "steel", 400, 10, ItemSellStatus::OnSale, Utc::now())
        .await;

    let order = app
        .services()
        .orders
        .place_order(
            member_id,
            PlaceOrderInput {
                item_id: item.id,
                quantity: 3,
            },
        )
        .await
        .unwrap();

    assert_eq!(order.status, OrderStatus::Ordered);

    let stocked = app.services().items.get_item(item.id).await.unwrap();
    assert_eq!(stocked.stock_quantity, 7);
    assert_eq!(stocked.sell_status, ItemSellStatus::OnSale);

    let detail = app.services().orders.get_order(order.id).await.unwrap();
    assert_eq!(detail.lines.len(), 1);
    assert_eq!(detail.lines[0].price, 400);
    assert_eq!(detail.total_price, 1200);
}

#[tokio::test]
async fn draining_stock_flips_the_item_to_sold_out() {
    let app = TestApp::new().await;
    let member_id = register_member(&app, "lastone@example.com").await;
    let item = app
        .seed_item("Final", "last unit", 250, 2, ItemSellStatus::OnSale, Utc::now())
        .await;

    app.services()
        .orders
        .place_order(
            member_id,
            PlaceOrderInput {
                item_id: item.id,
                quantity: 2,
            },
        )
        .await
        .unwrap();

    let drained = app.services().items.get_item(item.id).await.unwrap();
    assert_eq!(drained.stock_quantity, 0);
    assert_eq!(drained.sell_status, ItemSellStatus::SoldOut);
}

#[tokio::test]
async fn insufficient_stock_is_a_conflict_and_changes_nothing() {
    let app = TestApp::new().await;
    let member_id = register_member(&app, "over@example.com").await;
    let item = app
        .seed_item("Scarce", "few left", 250, 2, ItemSellStatus::OnSale, Utc::now())
        .await;

    let result = app
        .services()
        .orders
        .place_order(
            member_id,
            PlaceOrderInput {
                item_id: item.id,
                quantity: 3,
            },
        )
        .await;

    assert_matches!(result, Err(ServiceError::Conflict(_)));

    // Transaction rolled back: stock untouched, no order persisted
    let untouched = app.services().items.get_item(item.id).await.unwrap();
    assert_eq!(untouched.stock_quantity, 2);

    let page = app
        .services()
        .orders
        .list_orders(member_id, &PageRequest::new(0, 10))
        .await
        .unwrap();
    assert_eq!(page.total_count, 0);
}

#[tokio::test]
async fn cancelling_restores_stock_and_reopens_the_item() {
    let app = TestApp::new().await;
    let member_id = register_member(&app, "regret@example.com").await;
    let item = app
        .seed_item("Gadget", "impulse buy", 999, 1, ItemSellStatus::OnSale, Utc::now())
        .await;

    let order = app
        .services()
        .orders
        .place_order(
            member_id,
            PlaceOrderInput {
                item_id: item.id,
                quantity: 1,
            },
        )
        .await
        .unwrap();

    let sold_out = app.services().items.get_item(item.id).await.unwrap();
    assert_eq!(sold_out.sell_status, ItemSellStatus::SoldOut);

    let cancelled = app.services().orders.cancel_order(order.id).await.unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);

    let restored = app.services().items.get_item(item.id).await.unwrap();
    assert_eq!(restored.stock_quantity, 1);
    assert_eq!(restored.sell_status, ItemSellStatus::OnSale);

    let again = app.services().orders.cancel_order(order.id).await;
    assert_matches!(again, Err(ServiceError::InvalidInput(_)));
}

#[tokio::test]
async fn ordering_cart_lines_empties_them_from_the_cart() {
    let app = TestApp::new().await;
    let member_id = register_member(&app, "checkout@example.com").await;
    let kettle = app
        .seed_item("Kettle", "steel", 400, 10, ItemSellStatus::OnSale, Utc::now())
        .await;
    let mug = app
        .seed_item("Mug", "ceramic", 200, 10, ItemSellStatus::OnSale, Utc::now())
        .await;

    let carts = &app.services().carts;
    let line_a = carts
        .add_item(member_id, AddToCartInput { item_id: kettle.id, quantity: 2 })
        .await
        .unwrap();
    let line_b = carts
        .add_item(member_id, AddToCartInput { item_id: mug.id, quantity: 1 })
        .await
        .unwrap();

    let order = app
        .services()
        .orders
        .order_cart_items(member_id, &[line_a.id, line_b.id])
        .await
        .unwrap();

    let detail = app.services().orders.get_order(order.id).await.unwrap();
    assert_eq!(detail.lines.len(), 2);
    assert_eq!(detail.total_price, 2 * 400 + 200);

    let remaining = carts.get_cart_items(member_id).await.unwrap();
    assert!(remaining.is_empty());

    let kettle = app.services().items.get_item(kettle.id).await.unwrap();
    assert_eq!(kettle.stock_quantity, 8);
}

#[tokio::test]
async fn ordering_a_foreign_cart_line_is_not_found() {
    let app = TestApp::new().await;
    let owner = register_member(&app, "owner@example.com").await;
    let thief = register_member(&app, "thief@example.com").await;
    let item = app
        .seed_item("Target", "coveted", 300, 5, ItemSellStatus::OnSale, Utc::now())
        .await;

    let line = app
        .services()
        .carts
        .add_item(owner, AddToCartInput { item_id: item.id, quantity: 1 })
        .await
        .unwrap();

    let result = app
        .services()
        .orders
        .order_cart_items(thief, &[line.id])
        .await;

    assert_matches!(result, Err(ServiceError::NotFound(_)));
}

#[tokio::test]
async fn list_orders_pages_newest_first() {
    let app = TestApp::new().await;
    let member_id = register_member(&app, "repeat@example.com").await;
    let other = register_member(&app, "other@example.com").await;
    let item = app
        .seed_item("Staple", "bought often", 50, 100, ItemSellStatus::OnSale, Utc::now())
        .await;

    let orders = &app.services().orders;
    let mut placed = Vec::new();
    for _ in 0..7 {
        let order = orders
            .place_order(member_id, PlaceOrderInput { item_id: item.id, quantity: 1 })
            .await
            .unwrap();
        placed.push(order.id);
    }
    orders
        .place_order(other, PlaceOrderInput { item_id: item.id, quantity: 1 })
        .await
        .unwrap();

    let first = orders
        .list_orders(member_id, &PageRequest::new(0, 5))
        .await
        .unwrap();
    assert_eq!(first.total_count, 7);
    assert_eq!(first.content.len(), 5);
    assert_eq!(first.content[0].id, *placed.last().unwrap());

    let second = orders
        .list_orders(member_id, &PageRequest::new(1, 5))
        .await
        .unwrap();
    assert_eq!(second.content.len(), 2);
    assert_eq!(second.content[1].id, placed[0]);

    let invalid = orders.list_orders(member_id, &PageRequest::new(0, 0)).await;
    assert_matches!(invalid, Err(ServiceError::InvalidInput(_)));
}
