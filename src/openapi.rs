use utoipa::OpenApi;

use crate::entities::{ItemSellStatus, OrderStatus};
use crate::errors::ErrorResponse;
use crate::handlers;
use crate::handlers::common::PageResponse;
use crate::handlers::items::{CreateItemRequest, ItemResponse, UpdateItemRequest};
use crate::handlers::members::{MemberResponse, RegisterMemberRequest};

/// Aggregated API documentation, served as JSON from the router.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Shop API",
        version = "0.1.0",
        description = "Catalog items, carts, members and orders with filtered, paginated item search"
    ),
    paths(
        handlers::items::create_item,
        handlers::items::get_item,
        handlers::items::update_item,
        handlers::items::search_items,
        handlers::members::register_member,
        handlers::members::get_member,
        handlers::carts::add_to_cart,
        handlers::carts::list_cart_items,
        handlers::carts::get_cart_item,
        handlers::carts::update_cart_item,
        handlers::carts::remove_cart_item,
        handlers::orders::place_order,
        handlers::orders::order_cart_items,
        handlers::orders::get_order,
        handlers::orders::cancel_order,
        handlers::orders::list_orders,
        handlers::health::health_check,
    ),
    components(schemas(
        ErrorResponse,
        ItemSellStatus,
        OrderStatus,
        CreateItemRequest,
        UpdateItemRequest,
        ItemResponse,
        PageResponse<ItemResponse>,
        RegisterMemberRequest,
        MemberResponse,
        handlers::carts::AddToCartRequest,
        handlers::carts::UpdateCartItemRequest,
        handlers::orders::PlaceOrderRequest,
        handlers::orders::OrderCartItemsRequest,
        handlers::health::HealthStatus,
    )),
    tags(
        (name = "Items", description = "Catalog and item search endpoints"),
        (name = "Members", description = "Member registration and lookup"),
        (name = "Carts", description = "Cart line management"),
        (name = "Orders", description = "Order placement, cancellation and history"),
        (name = "Health", description = "Service health")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doc_covers_the_search_endpoint() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/v1/items/search"));
        assert!(doc.paths.paths.contains_key("/health"));
    }

    #[test]
    fn doc_registers_error_schema() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components should be present");
        assert!(components.schemas.contains_key("ErrorResponse"));
        assert!(components.schemas.contains_key("ItemSellStatus"));
    }
}
