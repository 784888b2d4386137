pub mod cart;
pub mod cart_item;
pub mod item;
pub mod member;
pub mod order;
pub mod order_item;

pub use cart::Entity as Cart;
pub use cart_item::Entity as CartItem;
pub use item::Entity as Item;
pub use member::Entity as Member;
pub use order::Entity as Order;
pub use order_item::Entity as OrderItem;

pub use item::ItemSellStatus;
pub use order::OrderStatus;

pub type ItemModel = item::Model;
pub type MemberModel = member::Model;
pub type CartModel = cart::Model;
pub type CartItemModel = cart_item::Model;
pub type OrderModel = order::Model;
pub type OrderItemModel = order_item::Model;
