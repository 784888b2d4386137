pub mod carts;
pub mod items;
pub mod members;
pub mod orders;

pub use carts::CartService;
pub use items::ItemService;
pub use members::MemberService;
pub use orders::OrderService;
