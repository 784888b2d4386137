use crate::handlers::common::{
    created_response, map_service_error, success_response, validate_input, PageResponse,
};
use crate::queries::PageRequest;
use crate::{
    errors::ApiError,
    services::orders::{OrderDetail, PlaceOrderInput},
    AppState,
};
use axum::{
    extract::{Json, Path, Query, State},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

pub fn orders_routes() -> Router<AppState> {
    Router::new()
        .route("/members/:member_id", post(place_order).get(list_orders))
        .route("/members/:member_id/cart", post(order_cart_items))
        .route("/:id", get(get_order))
        .route("/:id/cancel", post(cancel_order))
}

/// Place a single-item order
#[utoipa::path(
    post,
    path = "/api/v1/orders/members/:member_id",
    params(
        ("member_id" = i64, Path, description = "Member ID")
    ),
    request_body = PlaceOrderRequest,
    responses(
        (status = 201, description = "Order placed"),
        (status = 404, description = "Member or item not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Not enough stock", body = crate::errors::ErrorResponse)
    ),
    tag = "Orders"
)]
pub async fn place_order(
    State(state): State<AppState>,
    Path(member_id): Path<i64>,
    Json(payload): Json<PlaceOrderRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let input = PlaceOrderInput {
        item_id: payload.item_id,
        quantity: payload.quantity,
    };

    let order = state
        .services
        .orders
        .place_order(member_id, input)
        .await
        .map_err(map_service_error)?;

    Ok(created_response(order))
}

/// Order selected cart lines, emptying them from the cart
#[utoipa::path(
    post,
    path = "/api/v1/orders/members/:member_id/cart",
    params(
        ("member_id" = i64, Path, description = "Member ID")
    ),
    request_body = OrderCartItemsRequest,
    responses(
        (status = 201, description = "Order placed from cart"),
        (status = 404, description = "Member, cart or line not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Not enough stock", body = crate::errors::ErrorResponse)
    ),
    tag = "Orders"
)]
pub async fn order_cart_items(
    State(state): State<AppState>,
    Path(member_id): Path<i64>,
    Json(payload): Json<OrderCartItemsRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let order = state
        .services
        .orders
        .order_cart_items(member_id, &payload.cart_item_ids)
        .await
        .map_err(map_service_error)?;

    Ok(created_response(order))
}

/// Get an order with its lines and total
#[utoipa::path(
    get,
    path = "/api/v1/orders/:id",
    params(
        ("id" = i64, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order detail"),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let detail: OrderDetail = state
        .services
        .orders
        .get_order(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(detail))
}

/// Cancel an order, restoring stock
#[utoipa::path(
    post,
    path = "/api/v1/orders/:id/cancel",
    params(
        ("id" = i64, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order cancelled"),
        (status = 400, description = "Order already cancelled", body = crate::errors::ErrorResponse),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Orders"
)]
pub async fn cancel_order(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let order = state
        .services
        .orders
        .cancel_order(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(order))
}

/// Page through a member's orders, newest first
#[utoipa::path(
    get,
    path = "/api/v1/orders/members/:member_id",
    params(
        ("member_id" = i64, Path, description = "Member ID"),
        OrderListParams
    ),
    responses(
        (status = 200, description = "Order page"),
        (status = 400, description = "Invalid page size", body = crate::errors::ErrorResponse)
    ),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    Path(member_id): Path<i64>,
    Query(params): Query<OrderListParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let page_request = PageRequest::new(params.page, params.size);

    let page = state
        .services
        .orders
        .list_orders(member_id, &page_request)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PageResponse::from_page(
        page,
        std::convert::identity,
    )))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PlaceOrderRequest {
    pub item_id: i64,
    #[validate(range(min = 1))]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderCartItemsRequest {
    pub cart_item_ids: Vec<i64>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OrderListParams {
    /// Zero-based page index
    #[serde(default)]
    pub page: u64,
    #[serde(default = "default_size")]
    pub size: u64,
}

fn default_size() -> u64 {
    crate::queries::DEFAULT_PAGE_SIZE
}
