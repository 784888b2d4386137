mod common;

use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use common::TestApp;
use shop_api::entities::ItemSellStatus;
use shop_api::errors::ServiceError;
use shop_api::queries::{
    search_items, ItemSearchCriteria, PageRequest, SearchDateRange, SearchTarget,
};

#[tokio::test]
async fn empty_criteria_matches_everything_newest_first() {
    let app = TestApp::new().await;
    let seeded = app.seed_catalog().await;

    let page = search_items(
        app.db(),
        &ItemSearchCriteria::default(),
        &PageRequest::new(0, 20),
    )
    .await
    .unwrap();

    assert_eq!(page.total_count, 10);
    assert_eq!(page.content.len(), 10);
    // Newest first: Product10 down to Product1
    assert_eq!(page.content[0].name, "Product10");
    assert_eq!(page.content[9].name, "Product1");
    assert_eq!(page.content[0].id, seeded[9].id);
}

#[tokio::test]
async fn repeated_search_is_deterministic() {
    let app = TestApp::new().await;
    app.seed_catalog().await;

    let criteria = ItemSearchCriteria {
        sell_status: Some(ItemSellStatus::OnSale),
        ..Default::default()
    };
    let request = PageRequest::new(0, 5);

    let first = search_items(app.db(), &criteria, &request).await.unwrap();
    let second = search_items(app.db(), &criteria, &request).await.unwrap();

    let first_ids: Vec<i64> = first.content.iter().map(|item| item.id).collect();
    let second_ids: Vec<i64> = second.content.iter().map(|item| item.id).collect();
    assert_eq!(first_ids, second_ids);
    assert_eq!(first.total_count, second.total_count);
}

#[tokio::test]
async fn equal_timestamps_break_ties_by_descending_id() {
    let app = TestApp::new().await;
    let created_at = Utc::now() - Duration::minutes(5);

    let older = app
        .seed_item("Twin A", "first", 500, 10, ItemSellStatus::OnSale, created_at)
        .await;
    let newer = app
        .seed_item("Twin B", "second", 500, 10, ItemSellStatus::OnSale, created_at)
        .await;

    let page = search_items(
        app.db(),
        &ItemSearchCriteria::default(),
        &PageRequest::new(0, 10),
    )
    .await
    .unwrap();

    assert_eq!(page.content.len(), 2);
    assert_eq!(page.content[0].id, newer.id);
    assert_eq!(page.content[1].id, older.id);
}

#[tokio::test]
async fn detail_keyword_with_status_filter_pages_correctly() {
    let app = TestApp::new().await;
    app.seed_catalog().await;

    // Sold-out noise that must never match the ON_SALE filter
    let base = Utc::now() - Duration::hours(2);
    for i in 1..=3 {
        app.seed_item(
            &format!("Stale{}", i),
            &format!("Desc{}", i),
            2000,
            0,
            ItemSellStatus::SoldOut,
            base + Duration::minutes(i),
        )
        .await;
    }

    let criteria = ItemSearchCriteria {
        sell_status: Some(ItemSellStatus::OnSale),
        target: SearchTarget::Detail,
        query: "Desc".to_string(),
        ..Default::default()
    };

    let first_page = search_items(app.db(), &criteria, &PageRequest::new(0, 5))
        .await
        .unwrap();

    assert_eq!(first_page.total_count, 10);
    assert_eq!(first_page.content.len(), 5);
    assert_eq!(first_page.content[0].name, "Product10");
    assert_eq!(first_page.content[4].name, "Product6");

    let second_page = search_items(app.db(), &criteria, &PageRequest::new(1, 5))
        .await
        .unwrap();

    assert_eq!(second_page.content.len(), 5);
    assert_eq!(second_page.content[0].name, "Product5");
    assert_eq!(second_page.content[4].name, "Product1");
}

#[tokio::test]
async fn keyword_matches_name_or_detail_when_target_is_all() {
    let app = TestApp::new().await;
    let now = Utc::now();

    app.seed_item(
        "Camping kettle",
        "stainless steel",
        400,
        5,
        ItemSellStatus::OnSale,
        now - Duration::minutes(3),
    )
    .await;
    app.seed_item(
        "Thermos",
        "kettle-compatible lid",
        300,
        5,
        ItemSellStatus::OnSale,
        now - Duration::minutes(2),
    )
    .await;
    app.seed_item(
        "Mug",
        "ceramic",
        200,
        5,
        ItemSellStatus::OnSale,
        now - Duration::minutes(1),
    )
    .await;

    let criteria = ItemSearchCriteria {
        query: "kettle".to_string(),
        ..Default::default()
    };

    let page = search_items(app.db(), &criteria, &PageRequest::new(0, 10))
        .await
        .unwrap();

    assert_eq!(page.total_count, 2);
    assert_eq!(page.content[0].name, "Thermos");
    assert_eq!(page.content[1].name, "Camping kettle");
}

#[tokio::test]
async fn name_target_does_not_match_detail() {
    let app = TestApp::new().await;
    let now = Utc::now();

    app.seed_item(
        "Lantern",
        "glows like a beacon",
        700,
        5,
        ItemSellStatus::OnSale,
        now,
    )
    .await;

    let criteria = ItemSearchCriteria {
        target: SearchTarget::Name,
        query: "beacon".to_string(),
        ..Default::default()
    };

    let page = search_items(app.db(), &criteria, &PageRequest::new(0, 10))
        .await
        .unwrap();

    assert_eq!(page.total_count, 0);
    assert!(page.content.is_empty());
}

#[tokio::test]
async fn date_window_excludes_older_items() {
    let app = TestApp::new().await;
    let now = Utc::now();

    app.seed_item(
        "Fresh",
        "made today",
        100,
        5,
        ItemSellStatus::OnSale,
        now - Duration::hours(2),
    )
    .await;
    app.seed_item(
        "Stale",
        "last month",
        100,
        5,
        ItemSellStatus::OnSale,
        now - Duration::days(10),
    )
    .await;

    let criteria = ItemSearchCriteria {
        date_range: SearchDateRange::Day,
        ..Default::default()
    };

    let page = search_items(app.db(), &criteria, &PageRequest::new(0, 10))
        .await
        .unwrap();

    assert_eq!(page.total_count, 1);
    assert_eq!(page.content[0].name, "Fresh");

    let week = ItemSearchCriteria {
        date_range: SearchDateRange::Week,
        ..Default::default()
    };
    let page = search_items(app.db(), &week, &PageRequest::new(0, 10))
        .await
        .unwrap();
    assert_eq!(page.total_count, 1);

    let month = ItemSearchCriteria {
        date_range: SearchDateRange::Month,
        ..Default::default()
    };
    let page = search_items(app.db(), &month, &PageRequest::new(0, 10))
        .await
        .unwrap();
    assert_eq!(page.total_count, 2);
}

#[tokio::test]
async fn min_price_filter_is_strictly_greater() {
    let app = TestApp::new().await;
    let base = Utc::now() - Duration::hours(1);

    // Five on-sale items priced 1001..=1005, five sold-out ones
    for i in 1..=5 {
        app.seed_item(
            &format!("Cheap{}", i),
            "on sale",
            1000 + i,
            10,
            ItemSellStatus::OnSale,
            base + Duration::minutes(i64::from(i)),
        )
        .await;
    }
    for i in 1..=5 {
        app.seed_item(
            &format!("Gone{}", i),
            "sold out",
            1000 + i,
            0,
            ItemSellStatus::SoldOut,
            base + Duration::minutes(i64::from(5 + i)),
        )
        .await;
    }

    let criteria = ItemSearchCriteria {
        sell_status: Some(ItemSellStatus::OnSale),
        min_price: Some(1003),
        ..Default::default()
    };

    let page = search_items(app.db(), &criteria, &PageRequest::new(0, 10))
        .await
        .unwrap();

    // Strictly greater than 1003: only 1004 and 1005 qualify
    assert_eq!(page.total_count, 2);
    assert_eq!(page.content[0].name, "Cheap5");
    assert_eq!(page.content[1].name, "Cheap4");
}

#[tokio::test]
async fn zero_page_size_is_rejected_before_touching_the_store() {
    let app = TestApp::new().await;

    let result = search_items(
        app.db(),
        &ItemSearchCriteria::default(),
        &PageRequest::new(0, 0),
    )
    .await;

    assert_matches!(result, Err(ServiceError::InvalidInput(_)));
}

#[tokio::test]
async fn oversized_page_size_is_clamped_not_rejected() {
    let app = TestApp::new().await;
    app.seed_catalog().await;

    let page = search_items(
        app.db(),
        &ItemSearchCriteria::default(),
        &PageRequest::new(0, 101),
    )
    .await
    .unwrap();

    assert_eq!(page.size, 100);
    assert_eq!(page.total_count, 10);
    assert_eq!(page.content.len(), 10);
}

#[tokio::test]
async fn past_the_last_page_returns_empty_content_with_total() {
    let app = TestApp::new().await;
    app.seed_catalog().await;

    let page = search_items(
        app.db(),
        &ItemSearchCriteria::default(),
        &PageRequest::new(5, 5),
    )
    .await
    .unwrap();

    assert!(page.content.is_empty());
    assert_eq!(page.total_count, 10);
}
