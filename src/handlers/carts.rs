use crate::handlers::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
};
use crate::{
    errors::ApiError,
    services::carts::{AddToCartInput, CartLine},
    AppState,
};
use axum::{
    extract::{Json, Path, State},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

pub fn carts_routes() -> Router<AppState> {
    Router::new()
        .route("/members/:member_id/items", post(add_to_cart).get(list_cart_items))
        .route(
            "/items/:cart_item_id",
            get(get_cart_item)
                .put(update_cart_item)
                .delete(remove_cart_item),
        )
}

/// Add an item to a member's cart
#[utoipa::path(
    post,
    path = "/api/v1/carts/members/:member_id/items",
    params(
        ("member_id" = i64, Path, description = "Member ID")
    ),
    request_body = AddToCartRequest,
    responses(
        (status = 201, description = "Item added to cart"),
        (status = 404, description = "Member or item not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Not enough stock", body = crate::errors::ErrorResponse)
    ),
    tag = "Carts"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    Path(member_id): Path<i64>,
    Json(payload): Json<AddToCartRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let input = AddToCartInput {
        item_id: payload.item_id,
        quantity: payload.quantity,
    };

    let line = state
        .services
        .carts
        .add_item(member_id, input)
        .await
        .map_err(map_service_error)?;

    Ok(created_response(line))
}

/// List the lines in a member's cart
#[utoipa::path(
    get,
    path = "/api/v1/carts/members/:member_id/items",
    params(
        ("member_id" = i64, Path, description = "Member ID")
    ),
    responses(
        (status = 200, description = "Cart lines")
    ),
    tag = "Carts"
)]
pub async fn list_cart_items(
    State(state): State<AppState>,
    Path(member_id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let lines: Vec<CartLine> = state
        .services
        .carts
        .get_cart_items(member_id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(lines))
}

/// Get a single cart line
#[utoipa::path(
    get,
    path = "/api/v1/carts/items/:cart_item_id",
    params(
        ("cart_item_id" = i64, Path, description = "Cart line ID")
    ),
    responses(
        (status = 200, description = "Cart line"),
        (status = 404, description = "Cart line not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Carts"
)]
pub async fn get_cart_item(
    State(state): State<AppState>,
    Path(cart_item_id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let line = state
        .services
        .carts
        .get_cart_line(cart_item_id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(line))
}

/// Change the quantity of a cart line
#[utoipa::path(
    put,
    path = "/api/v1/carts/items/:cart_item_id",
    params(
        ("cart_item_id" = i64, Path, description = "Cart line ID")
    ),
    request_body = UpdateCartItemRequest,
    responses(
        (status = 200, description = "Quantity updated"),
        (status = 404, description = "Cart line not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Not enough stock", body = crate::errors::ErrorResponse)
    ),
    tag = "Carts"
)]
pub async fn update_cart_item(
    State(state): State<AppState>,
    Path(cart_item_id): Path<i64>,
    Json(payload): Json<UpdateCartItemRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let line = state
        .services
        .carts
        .update_quantity(cart_item_id, payload.quantity)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(line))
}

/// Remove a line from the cart
#[utoipa::path(
    delete,
    path = "/api/v1/carts/items/:cart_item_id",
    params(
        ("cart_item_id" = i64, Path, description = "Cart line ID")
    ),
    responses(
        (status = 204, description = "Cart line removed"),
        (status = 404, description = "Cart line not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Carts"
)]
pub async fn remove_cart_item(
    State(state): State<AppState>,
    Path(cart_item_id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    state
        .services
        .carts
        .remove_item(cart_item_id)
        .await
        .map_err(map_service_error)?;

    Ok(no_content_response())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddToCartRequest {
    pub item_id: i64,
    #[validate(range(min = 1))]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCartItemRequest {
    #[validate(range(min = 1))]
    pub quantity: i32,
}
