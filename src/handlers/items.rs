use crate::handlers::common::{
    created_response, map_service_error, success_response, validate_input, PageResponse,
};
use crate::queries::{ItemSearchCriteria, PageRequest, SearchDateRange, SearchTarget};
use crate::{
    entities::{item, ItemSellStatus},
    errors::ApiError,
    services::items::{CreateItemInput, UpdateItemInput},
    AppState,
};
use axum::{
    extract::{Json, Path, Query, State},
    routing::{get, post, put},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Creates the router for item endpoints
pub fn items_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_item))
        .route("/search", get(search_items))
        .route("/:id", get(get_item).put(update_item))
}

/// Create a new catalog item
#[utoipa::path(
    post,
    path = "/api/v1/items",
    request_body = CreateItemRequest,
    responses(
        (status = 201, description = "Item created", body = ItemResponse),
        (status = 400, description = "Invalid payload", body = crate::errors::ErrorResponse)
    ),
    tag = "Items"
)]
pub async fn create_item(
    State(state): State<AppState>,
    Json(payload): Json<CreateItemRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let input = CreateItemInput {
        name: payload.name.trim().to_string(),
        detail: payload.detail,
        price: payload.price,
        stock_quantity: payload.stock_quantity,
        sell_status: payload.sell_status.unwrap_or(ItemSellStatus::OnSale),
    };

    let item = state
        .services
        .items
        .create_item(input)
        .await
        .map_err(map_service_error)?;

    Ok(created_response(ItemResponse::from(item)))
}

/// Get an item by ID
#[utoipa::path(
    get,
    path = "/api/v1/items/:id",
    params(
        ("id" = i64, Path, description = "Item ID")
    ),
    responses(
        (status = 200, description = "Item retrieved", body = ItemResponse),
        (status = 404, description = "Item not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Items"
)]
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let item = state
        .services
        .items
        .get_item(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(ItemResponse::from(item)))
}

/// Update an item
#[utoipa::path(
    put,
    path = "/api/v1/items/:id",
    params(
        ("id" = i64, Path, description = "Item ID")
    ),
    request_body = UpdateItemRequest,
    responses(
        (status = 200, description = "Item updated", body = ItemResponse),
        (status = 400, description = "Invalid payload", body = crate::errors::ErrorResponse),
        (status = 404, description = "Item not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Items"
)]
pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateItemRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let input = UpdateItemInput {
        name: payload.name,
        detail: payload.detail,
        price: payload.price,
        stock_quantity: payload.stock_quantity,
        sell_status: payload.sell_status,
    };

    let item = state
        .services
        .items
        .update_item(id, input)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(ItemResponse::from(item)))
}

/// Filtered, paginated item search
#[utoipa::path(
    get,
    path = "/api/v1/items/search",
    params(ItemSearchParams),
    responses(
        (status = 200, description = "Search results", body = PageResponse<ItemResponse>),
        (status = 400, description = "Invalid query parameters", body = crate::errors::ErrorResponse)
    ),
    tag = "Items"
)]
pub async fn search_items(
    State(state): State<AppState>,
    Query(params): Query<ItemSearchParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let (criteria, page_request) = params.into_parts();

    let page = state
        .services
        .items
        .search(&criteria, &page_request)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PageResponse::from_page(
        page,
        ItemResponse::from,
    )))
}

// Request/Response DTOs

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "name": "Wireless Mouse",
    "detail": "Compact 2.4GHz wireless mouse with silent click",
    "price": 15900,
    "stock_quantity": 120,
    "sell_status": "ON_SALE"
}))]
pub struct CreateItemRequest {
    /// Item display name
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// Free-text description
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub detail: String,
    /// Unit price (smallest currency unit)
    #[validate(range(min = 0))]
    pub price: i32,
    /// Units in stock
    #[validate(range(min = 0))]
    pub stock_quantity: i32,
    /// Defaults to ON_SALE
    #[serde(default)]
    pub sell_status: Option<ItemSellStatus>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateItemRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub detail: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub price: Option<i32>,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub stock_quantity: Option<i32>,
    #[serde(default)]
    pub sell_status: Option<ItemSellStatus>,
}

/// Search criteria and page request, flattened into query parameters
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ItemSearchParams {
    /// Relative creation-date window: all, day, week, month or year
    #[serde(default)]
    pub date_range: SearchDateRange,
    /// Exact sell-status filter
    #[serde(default)]
    pub sell_status: Option<ItemSellStatus>,
    /// Keyword field selector: name, detail or all
    #[serde(default)]
    pub target: SearchTarget,
    /// Keyword; empty matches everything
    #[serde(default)]
    pub query: String,
    /// Strictly-greater-than price floor
    #[serde(default)]
    pub min_price: Option<i32>,
    /// Zero-based page index
    #[serde(default)]
    pub page: u64,
    #[serde(default = "default_size")]
    pub size: u64,
}

fn default_size() -> u64 {
    crate::queries::DEFAULT_PAGE_SIZE
}

impl ItemSearchParams {
    fn into_parts(self) -> (ItemSearchCriteria, PageRequest) {
        let criteria = ItemSearchCriteria {
            date_range: self.date_range,
            sell_status: self.sell_status,
            target: self.target,
            query: self.query,
            min_price: self.min_price,
        };
        (criteria, PageRequest::new(self.page, self.size))
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ItemResponse {
    pub id: i64,
    pub name: String,
    pub detail: String,
    pub price: i32,
    pub stock_quantity: i32,
    pub sell_status: ItemSellStatus,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<item::Model> for ItemResponse {
    fn from(model: item::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            detail: model.detail,
            price: model.price,
            stock_quantity: model.stock_quantity,
            sell_status: model.sell_status,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
