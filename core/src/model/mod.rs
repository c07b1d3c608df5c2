// core/src/model/mod.rs

//! Data structures representing the persisted storefront entities.

pub mod cart_item;
pub mod order;
pub mod order_item;
pub mod product;
pub mod user;

pub use cart_item::{cart_total, CartItem, CartLine, CartSummary, PricedCartLine};
pub use order::{NewOrder, Order, OrderStatus, OrderWithItems, PaymentStatus};
pub use order_item::{NewOrderItem, OrderItem};
pub use product::{NewProduct, Product, ProductChanges};
pub use user::{NewUser, PublicUser, Role, User};
