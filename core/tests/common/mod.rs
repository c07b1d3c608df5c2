// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};
use storefront::model::{
  CartLine, NewOrder, NewOrderItem, NewProduct, NewUser, Order, OrderItem, OrderStatus, OrderWithItems, Product, User,
};
use storefront::store::{CartStore, CatalogStore, CheckoutUnit, OrderScope, OrderStore, UserStore};
use storefront::{AuthContext, MemoryStore, Role, ShopError, ShopResult};
use tracing::Level;
use uuid::Uuid;

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

pub const TEST_SECRET: &str = "test-secret-do-not-use";

pub fn price(cents: i64) -> Decimal {
  Decimal::new(cents, 2)
}

pub fn ctx(user: &User) -> AuthContext {
  AuthContext {
    user_id: user.id,
    role: user.role,
  }
}

pub async fn add_user(store: &MemoryStore, name: &str, role: Role) -> User {
  store
    .insert_user(NewUser {
      name: name.to_string(),
      email: format!("{}@example.com", name.to_ascii_lowercase()),
      password_hash: "not-a-real-hash".to_string(),
      role,
    })
    .await
    .unwrap()
}

pub async fn add_product(store: &MemoryStore, seller: &User, name: &str, cents: i64) -> Product {
  store
    .insert_product(
      seller.id,
      NewProduct {
        name: name.to_string(),
        description: None,
        price: price(cents),
        stock: 100,
      },
    )
    .await
    .unwrap()
}

/// A store holding one seller, one customer and an admin.
pub struct Shop {
  pub store: MemoryStore,
  pub seller: User,
  pub customer: User,
  pub admin: User,
}

pub async fn shop() -> Shop {
  let store = MemoryStore::new();
  let seller = add_user(&store, "Sam", Role::Seller).await;
  let customer = add_user(&store, "Cora", Role::Customer).await;
  let admin = add_user(&store, "Ada", Role::Admin).await;
  Shop {
    store,
    seller,
    customer,
    admin,
  }
}

// --- Fault injection for checkout ---

/// Where a [`FlakyStore`] checkout goes wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
  /// The N-th order item insert fails.
  OrderItem(usize),
  /// The cart delete reports one row fewer than it was asked to remove.
  ShortRemove,
  /// Commit fails after every step succeeded.
  Commit,
}

/// Wraps a [`MemoryStore`] and injects one [`Fault`] into each checkout.
pub struct FlakyStore {
  pub inner: MemoryStore,
  pub fault: Fault,
  pub item_inserts: Arc<AtomicUsize>,
}

impl FlakyStore {
  pub fn new(inner: MemoryStore, fault: Fault) -> Self {
    FlakyStore {
      inner,
      fault,
      item_inserts: Arc::new(AtomicUsize::new(0)),
    }
  }
}

#[async_trait]
impl OrderStore for FlakyStore {
  async fn begin_checkout(&self, user_id: Uuid) -> ShopResult<Box<dyn CheckoutUnit>> {
    let inner = self.inner.begin_checkout(user_id).await?;
    Ok(Box::new(FlakyUnit {
      inner,
      fault: self.fault,
      seen: 0,
      item_inserts: Arc::clone(&self.item_inserts),
    }))
  }

  async fn list_orders(&self, scope: OrderScope) -> ShopResult<Vec<OrderWithItems>> {
    self.inner.list_orders(scope).await
  }

  async fn find_order(&self, order_id: Uuid) -> ShopResult<Option<OrderWithItems>> {
    self.inner.find_order(order_id).await
  }

  async fn update_order_status(&self, order_id: Uuid, status: OrderStatus) -> ShopResult<Option<Order>> {
    self.inner.update_order_status(order_id, status).await
  }
}

struct FlakyUnit {
  inner: Box<dyn CheckoutUnit>,
  fault: Fault,
  seen: usize,
  item_inserts: Arc<AtomicUsize>,
}

#[async_trait]
impl CheckoutUnit for FlakyUnit {
  fn user_id(&self) -> Uuid {
    self.inner.user_id()
  }

  async fn cart_lines(&mut self) -> ShopResult<Vec<CartLine>> {
    self.inner.cart_lines().await
  }

  async fn insert_order(&mut self, order: NewOrder) -> ShopResult<Order> {
    self.inner.insert_order(order).await
  }

  async fn insert_order_item(&mut self, item: NewOrderItem) -> ShopResult<OrderItem> {
    self.seen += 1;
    self.item_inserts.fetch_add(1, Ordering::SeqCst);
    if self.fault == Fault::OrderItem(self.seen) {
      return Err(ShopError::Internal("injected order item failure".to_string()));
    }
    self.inner.insert_order_item(item).await
  }

  async fn remove_cart_items(&mut self, cart_item_ids: &[Uuid]) -> ShopResult<u64> {
    let removed = self.inner.remove_cart_items(cart_item_ids).await?;
    if self.fault == Fault::ShortRemove {
      return Ok(removed.saturating_sub(1));
    }
    Ok(removed)
  }

  async fn commit(self: Box<Self>) -> ShopResult<()> {
    let unit = *self;
    if unit.fault == Fault::Commit {
      // Dropping the inner unit discards everything it staged.
      return Err(ShopError::Internal("injected commit failure".to_string()));
    }
    unit.inner.commit().await
  }
}

pub async fn cart_len(store: &MemoryStore, user: &User) -> usize {
  store.cart_lines(user.id).await.unwrap().len()
}
