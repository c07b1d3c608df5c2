// core/src/store/mod.rs

//! Storage seams.
//!
//! Services talk to storage only through these traits. Two implementations ship with the
//! crate: [`PgStore`] for PostgreSQL and [`MemoryStore`] for development and tests.
//!
//! Checkout is the one multi-row write. It goes through a [`CheckoutUnit`], an all-or-nothing
//! unit of work that holds the caller's per-user checkout lock for its whole lifetime.
//! Dropping a unit without calling [`CheckoutUnit::commit`] discards every write made
//! through it.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::ShopResult;
use crate::model::{
  CartItem, CartLine, NewOrder, NewOrderItem, NewProduct, NewUser, Order, OrderItem, OrderStatus, OrderWithItems,
  Product, ProductChanges, User,
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Which orders a listing should include.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderScope {
  All,
  /// Orders with at least one line for a product owned by this seller.
  Seller(Uuid),
}

#[async_trait]
pub trait UserStore: Send + Sync {
  async fn find_user_by_email(&self, email: &str) -> ShopResult<Option<User>>;

  /// Fails with `ValidationError::UserExists` when the email is taken.
  async fn insert_user(&self, user: NewUser) -> ShopResult<User>;
}

#[async_trait]
pub trait CatalogStore: Send + Sync {
  async fn list_products(&self) -> ShopResult<Vec<Product>>;

  async fn list_products_by_seller(&self, seller_id: Uuid) -> ShopResult<Vec<Product>>;

  async fn find_product(&self, product_id: Uuid) -> ShopResult<Option<Product>>;

  async fn insert_product(&self, seller_id: Uuid, product: NewProduct) -> ShopResult<Product>;

  /// Applies `changes` if the product exists and, when `owner` is given, belongs to it.
  /// `None` means no matching product.
  async fn update_product(
    &self,
    product_id: Uuid,
    owner: Option<Uuid>,
    changes: &ProductChanges,
  ) -> ShopResult<Option<Product>>;

  /// Deletes the product if `owner` owns it. Cart rows go with it; order items keep their
  /// snapshot with the product reference cleared.
  async fn delete_product(&self, product_id: Uuid, owner: Uuid) -> ShopResult<bool>;
}

#[async_trait]
pub trait CartStore: Send + Sync {
  /// Cart rows joined with product name and current price, in insertion order.
  async fn cart_lines(&self, user_id: Uuid) -> ShopResult<Vec<CartLine>>;

  /// Inserts the row, or increments quantity if the product is already in the cart.
  async fn add_cart_item(&self, user_id: Uuid, product_id: Uuid, quantity: i32) -> ShopResult<CartItem>;

  async fn set_cart_quantity(&self, user_id: Uuid, cart_item_id: Uuid, quantity: i32) -> ShopResult<Option<CartItem>>;

  async fn remove_cart_item(&self, user_id: Uuid, cart_item_id: Uuid) -> ShopResult<bool>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
  /// Opens a checkout unit for `user_id`, waiting for any other checkout of the same user.
  async fn begin_checkout(&self, user_id: Uuid) -> ShopResult<Box<dyn CheckoutUnit>>;

  /// Newest first, each with all of its items.
  async fn list_orders(&self, scope: OrderScope) -> ShopResult<Vec<OrderWithItems>>;

  async fn find_order(&self, order_id: Uuid) -> ShopResult<Option<OrderWithItems>>;

  async fn update_order_status(&self, order_id: Uuid, status: OrderStatus) -> ShopResult<Option<Order>>;
}

#[async_trait]
pub trait CheckoutUnit: Send {
  fn user_id(&self) -> Uuid;

  /// The cart as seen inside the unit; rows stay locked until the unit ends.
  async fn cart_lines(&mut self) -> ShopResult<Vec<CartLine>>;

  async fn insert_order(&mut self, order: NewOrder) -> ShopResult<Order>;

  async fn insert_order_item(&mut self, item: NewOrderItem) -> ShopResult<OrderItem>;

  /// Deletes exactly these cart rows of the unit's user. Returns how many were removed.
  async fn remove_cart_items(&mut self, cart_item_ids: &[Uuid]) -> ShopResult<u64>;

  async fn commit(self: Box<Self>) -> ShopResult<()>;
}

/// Everything the storefront services need from storage.
pub trait Store: UserStore + CatalogStore + CartStore + OrderStore {}

impl<T> Store for T where T: UserStore + CatalogStore + CartStore + OrderStore {}
