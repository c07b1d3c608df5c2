// core/src/store/memory.rs

//! In-process store for development without PostgreSQL and for tests.
//!
//! Tables live behind one `parking_lot::RwLock`. Lock guards are blocking and are never held
//! across an `.await`. Each user has a `tokio::sync::Mutex` that cart writes take briefly and
//! a [`MemoryCheckoutUnit`] holds until it is committed or dropped, so a snapshotted cart
//! cannot change under a checkout. The unit's writes are staged and applied in a single
//! write-lock section on commit, so readers see all of a checkout or none of it.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use uuid::Uuid;

use super::{CartStore, CatalogStore, CheckoutUnit, OrderScope, OrderStore, UserStore};
use crate::error::{ShopError, ShopResult, ValidationError};
use crate::model::{
  CartItem, CartLine, NewOrder, NewOrderItem, NewProduct, NewUser, Order, OrderItem, OrderStatus, OrderWithItems,
  PaymentStatus, Product, ProductChanges, User,
};
use crate::validation::{line_quantity_exceeded, MAX_LINE_QUANTITY};

#[derive(Debug, Default)]
struct Tables {
  users: Vec<User>,
  products: Vec<Product>,
  cart_items: Vec<CartItem>,
  orders: Vec<Order>,
  order_items: Vec<OrderItem>,
}

impl Tables {
  fn cart_lines(&self, user_id: Uuid) -> Vec<CartLine> {
    self
      .cart_items
      .iter()
      .filter(|item| item.user_id == user_id)
      .filter_map(|item| {
        self.products.iter().find(|p| p.id == item.product_id).map(|p| CartLine {
          cart_item_id: item.id,
          product_id: p.id,
          name: p.name.clone(),
          price: p.price,
          quantity: item.quantity,
        })
      })
      .collect()
  }

  fn with_items(&self, order: &Order) -> OrderWithItems {
    OrderWithItems {
      order: order.clone(),
      items: self.order_items.iter().filter(|i| i.order_id == order.id).cloned().collect(),
    }
  }

  fn seller_owns_line_of(&self, seller_id: Uuid, order_id: Uuid) -> bool {
    self.order_items.iter().any(|item| {
      item.order_id == order_id
        && item
          .product_id
          .and_then(|pid| self.products.iter().find(|p| p.id == pid))
          .map_or(false, |p| p.seller_id == seller_id)
    })
  }
}

type UserLocks = Arc<Mutex<HashMap<Uuid, Arc<AsyncMutex<()>>>>>;

/// A held per-user lock. Its map entry is removed on release once no one else refers to it.
struct UserLock {
  guard: Option<OwnedMutexGuard<()>>,
  user_id: Uuid,
  locks: UserLocks,
}

impl Drop for UserLock {
  fn drop(&mut self) {
    // Clones are only handed out under the map lock, so the count cannot grow here.
    let mut locks = self.locks.lock();
    drop(self.guard.take());
    if locks
      .get(&self.user_id)
      .map_or(false, |lock| Arc::strong_count(lock) == 1)
    {
      locks.remove(&self.user_id);
    }
  }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  tables: Arc<RwLock<Tables>>,
  user_locks: UserLocks,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  async fn lock_user(&self, user_id: Uuid) -> UserLock {
    let lock = self.user_locks.lock().entry(user_id).or_default().clone();
    UserLock {
      guard: Some(lock.lock_owned().await),
      user_id,
      locks: Arc::clone(&self.user_locks),
    }
  }

  /// Number of users with a live cart or checkout lock.
  pub fn held_user_locks(&self) -> usize {
    self.user_locks.lock().len()
  }

  /// Number of orders stored, for diagnostics and tests.
  pub fn order_count(&self) -> usize {
    self.tables.read().orders.len()
  }
}

#[async_trait]
impl UserStore for MemoryStore {
  async fn find_user_by_email(&self, email: &str) -> ShopResult<Option<User>> {
    Ok(self.tables.read().users.iter().find(|u| u.email == email).cloned())
  }

  async fn insert_user(&self, user: NewUser) -> ShopResult<User> {
    let mut tables = self.tables.write();
    if tables.users.iter().any(|u| u.email == user.email) {
      return Err(ValidationError::UserExists.into());
    }
    let user = User {
      id: Uuid::new_v4(),
      name: user.name,
      email: user.email,
      password_hash: user.password_hash,
      role: user.role,
      created_at: Utc::now(),
    };
    tables.users.push(user.clone());
    Ok(user)
  }
}

#[async_trait]
impl CatalogStore for MemoryStore {
  async fn list_products(&self) -> ShopResult<Vec<Product>> {
    Ok(self.tables.read().products.clone())
  }

  async fn list_products_by_seller(&self, seller_id: Uuid) -> ShopResult<Vec<Product>> {
    Ok(
      self
        .tables
        .read()
        .products
        .iter()
        .filter(|p| p.seller_id == seller_id)
        .cloned()
        .collect(),
    )
  }

  async fn find_product(&self, product_id: Uuid) -> ShopResult<Option<Product>> {
    Ok(self.tables.read().products.iter().find(|p| p.id == product_id).cloned())
  }

  async fn insert_product(&self, seller_id: Uuid, product: NewProduct) -> ShopResult<Product> {
    let now = Utc::now();
    let product = Product {
      id: Uuid::new_v4(),
      name: product.name,
      description: product.description,
      price: product.price,
      stock: product.stock,
      seller_id,
      created_at: now,
      updated_at: now,
    };
    self.tables.write().products.push(product.clone());
    Ok(product)
  }

  async fn update_product(
    &self,
    product_id: Uuid,
    owner: Option<Uuid>,
    changes: &ProductChanges,
  ) -> ShopResult<Option<Product>> {
    let mut tables = self.tables.write();
    let found = tables
      .products
      .iter_mut()
      .find(|p| p.id == product_id && owner.map_or(true, |o| p.seller_id == o));
    Ok(found.map(|product| {
      product.apply(changes);
      product.updated_at = Utc::now();
      product.clone()
    }))
  }

  async fn delete_product(&self, product_id: Uuid, owner: Uuid) -> ShopResult<bool> {
    let mut tables = self.tables.write();
    let before = tables.products.len();
    tables.products.retain(|p| !(p.id == product_id && p.seller_id == owner));
    if tables.products.len() == before {
      return Ok(false);
    }
    tables.cart_items.retain(|c| c.product_id != product_id);
    for item in tables.order_items.iter_mut().filter(|i| i.product_id == Some(product_id)) {
      item.product_id = None;
    }
    Ok(true)
  }
}

#[async_trait]
impl CartStore for MemoryStore {
  async fn cart_lines(&self, user_id: Uuid) -> ShopResult<Vec<CartLine>> {
    Ok(self.tables.read().cart_lines(user_id))
  }

  async fn add_cart_item(&self, user_id: Uuid, product_id: Uuid, quantity: i32) -> ShopResult<CartItem> {
    let _lock = self.lock_user(user_id).await;
    let mut tables = self.tables.write();
    if !tables.products.iter().any(|p| p.id == product_id) {
      return Err(ShopError::not_found("Product not found"));
    }
    if let Some(existing) = tables
      .cart_items
      .iter_mut()
      .find(|c| c.user_id == user_id && c.product_id == product_id)
    {
      existing.quantity = existing
        .quantity
        .checked_add(quantity)
        .filter(|merged| *merged <= MAX_LINE_QUANTITY)
        .ok_or_else(line_quantity_exceeded)?;
      return Ok(existing.clone());
    }
    let item = CartItem {
      id: Uuid::new_v4(),
      user_id,
      product_id,
      quantity,
      added_at: Utc::now(),
    };
    tables.cart_items.push(item.clone());
    Ok(item)
  }

  async fn set_cart_quantity(&self, user_id: Uuid, cart_item_id: Uuid, quantity: i32) -> ShopResult<Option<CartItem>> {
    let _lock = self.lock_user(user_id).await;
    let mut tables = self.tables.write();
    Ok(
      tables
        .cart_items
        .iter_mut()
        .find(|c| c.id == cart_item_id && c.user_id == user_id)
        .map(|item| {
          item.quantity = quantity;
          item.clone()
        }),
    )
  }

  async fn remove_cart_item(&self, user_id: Uuid, cart_item_id: Uuid) -> ShopResult<bool> {
    let _lock = self.lock_user(user_id).await;
    let mut tables = self.tables.write();
    let before = tables.cart_items.len();
    tables
      .cart_items
      .retain(|c| !(c.id == cart_item_id && c.user_id == user_id));
    Ok(tables.cart_items.len() < before)
  }
}

#[async_trait]
impl OrderStore for MemoryStore {
  async fn begin_checkout(&self, user_id: Uuid) -> ShopResult<Box<dyn CheckoutUnit>> {
    let lock = self.lock_user(user_id).await;
    Ok(Box::new(MemoryCheckoutUnit {
      tables: Arc::clone(&self.tables),
      user_id,
      _lock: lock,
      staged_order: None,
      staged_items: Vec::new(),
      consumed_cart_items: Vec::new(),
    }))
  }

  async fn list_orders(&self, scope: OrderScope) -> ShopResult<Vec<OrderWithItems>> {
    let tables = self.tables.read();
    let mut orders: Vec<OrderWithItems> = tables
      .orders
      .iter()
      .filter(|o| match scope {
        OrderScope::All => true,
        OrderScope::Seller(seller_id) => tables.seller_owns_line_of(seller_id, o.id),
      })
      .map(|o| tables.with_items(o))
      .collect();
    // Stored in creation order; newest first.
    orders.reverse();
    Ok(orders)
  }

  async fn find_order(&self, order_id: Uuid) -> ShopResult<Option<OrderWithItems>> {
    let tables = self.tables.read();
    Ok(tables.orders.iter().find(|o| o.id == order_id).map(|o| tables.with_items(o)))
  }

  async fn update_order_status(&self, order_id: Uuid, status: OrderStatus) -> ShopResult<Option<Order>> {
    let mut tables = self.tables.write();
    Ok(tables.orders.iter_mut().find(|o| o.id == order_id).map(|order| {
      order.order_status = status;
      order.clone()
    }))
  }
}

/// Staged checkout. Nothing is visible to other readers until `commit`.
pub struct MemoryCheckoutUnit {
  tables: Arc<RwLock<Tables>>,
  user_id: Uuid,
  _lock: UserLock,
  staged_order: Option<Order>,
  staged_items: Vec<OrderItem>,
  consumed_cart_items: Vec<Uuid>,
}

#[async_trait]
impl CheckoutUnit for MemoryCheckoutUnit {
  fn user_id(&self) -> Uuid {
    self.user_id
  }

  async fn cart_lines(&mut self) -> ShopResult<Vec<CartLine>> {
    let lines = self.tables.read().cart_lines(self.user_id);
    Ok(
      lines
        .into_iter()
        .filter(|line| !self.consumed_cart_items.contains(&line.cart_item_id))
        .collect(),
    )
  }

  async fn insert_order(&mut self, order: NewOrder) -> ShopResult<Order> {
    if self.staged_order.is_some() {
      return Err(ShopError::Internal("Checkout unit already holds an order".to_string()));
    }
    let order = Order {
      id: Uuid::new_v4(),
      user_id: order.user_id,
      total_price: order.total_price,
      payment_status: PaymentStatus::Pending,
      order_status: OrderStatus::Pending,
      created_at: Utc::now(),
    };
    self.staged_order = Some(order.clone());
    Ok(order)
  }

  async fn insert_order_item(&mut self, item: NewOrderItem) -> ShopResult<OrderItem> {
    match &self.staged_order {
      Some(order) if order.id == item.order_id => {}
      _ => {
        return Err(ShopError::Internal(format!(
          "Order item references unknown order {}",
          item.order_id
        )))
      }
    }
    let item = OrderItem {
      id: Uuid::new_v4(),
      order_id: item.order_id,
      product_id: Some(item.product_id),
      quantity: item.quantity,
      price: item.price,
    };
    self.staged_items.push(item.clone());
    Ok(item)
  }

  async fn remove_cart_items(&mut self, cart_item_ids: &[Uuid]) -> ShopResult<u64> {
    let tables = self.tables.read();
    let mut removed = 0;
    for id in cart_item_ids {
      let present = tables
        .cart_items
        .iter()
        .any(|c| c.id == *id && c.user_id == self.user_id);
      if present && !self.consumed_cart_items.contains(id) {
        self.consumed_cart_items.push(*id);
        removed += 1;
      }
    }
    Ok(removed)
  }

  async fn commit(self: Box<Self>) -> ShopResult<()> {
    let unit = *self;
    let mut tables = unit.tables.write();
    if let Some(order) = unit.staged_order {
      tables.orders.push(order);
    }
    tables.order_items.extend(unit.staged_items);
    let consumed = unit.consumed_cart_items;
    tables.cart_items.retain(|c| !consumed.contains(&c.id));
    Ok(())
  }
}
