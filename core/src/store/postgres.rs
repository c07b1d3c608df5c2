// core/src/store/postgres.rs

//! PostgreSQL-backed store.
//!
//! Checkout isolation: each [`PgCheckoutUnit`] runs in one transaction that first takes a
//! transaction-scoped advisory lock keyed by the user id, then reads the cart with
//! `FOR UPDATE`. A second checkout for the same user blocks on the advisory lock and, once
//! the first commits, reads an empty cart.

use anyhow::Context as _;
use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Postgres, Transaction};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::{CartStore, CatalogStore, CheckoutUnit, OrderScope, OrderStore, UserStore};
use crate::error::{ShopError, ShopResult, ValidationError};
use crate::model::{
  CartItem, CartLine, NewOrder, NewOrderItem, NewProduct, NewUser, Order, OrderItem, OrderStatus, OrderWithItems,
  PaymentStatus, Product, ProductChanges, User,
};
use crate::validation::{line_quantity_exceeded, MAX_LINE_QUANTITY};

const USER_COLUMNS: &str = "id, name, email, password_hash, role, created_at";
const PRODUCT_COLUMNS: &str = "id, name, description, price, stock, seller_id, created_at, updated_at";
const CART_ITEM_COLUMNS: &str = "id, user_id, product_id, quantity, added_at";
const ORDER_COLUMNS: &str = "id, user_id, total_price, payment_status, order_status, created_at";
const ORDER_ITEM_COLUMNS: &str = "id, order_id, product_id, quantity, price";

const CART_LINES_SQL: &str = r#"
  SELECT c.id AS cart_item_id, p.id AS product_id, p.name, p.price, c.quantity
  FROM cart_items c
  JOIN products p ON p.id = c.product_id
  WHERE c.user_id = $1
  ORDER BY c.added_at, c.id
"#;

#[derive(Debug, Clone)]
pub struct PgStore {
  pool: PgPool,
}

impl PgStore {
  pub fn new(pool: PgPool) -> Self {
    PgStore { pool }
  }

  pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
    let pool = PgPoolOptions::new()
      .max_connections(max_connections)
      .connect(database_url)
      .await
      .context("Failed to connect to the database")?;
    info!(max_connections, "Successfully connected to the database.");
    Ok(PgStore { pool })
  }

  pub async fn migrate(&self) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
      .run(&self.pool)
      .await
      .context("Failed to apply database migrations")?;
    info!("Database migrations applied.");
    Ok(())
  }

  pub fn pool(&self) -> &PgPool {
    &self.pool
  }

  async fn items_for_orders(&self, orders: Vec<Order>) -> ShopResult<Vec<OrderWithItems>> {
    let ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
    let items = sqlx::query_as::<_, OrderItem>(&format!(
      "SELECT {ORDER_ITEM_COLUMNS} FROM order_items WHERE order_id = ANY($1) ORDER BY order_id, id"
    ))
    .bind(&ids[..])
    .fetch_all(&self.pool)
    .await?;

    Ok(
      orders
        .into_iter()
        .map(|order| {
          let items = items.iter().filter(|i| i.order_id == order.id).cloned().collect();
          OrderWithItems { order, items }
        })
        .collect(),
    )
  }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
  matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
  matches!(err, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}

#[async_trait]
impl UserStore for PgStore {
  async fn find_user_by_email(&self, email: &str) -> ShopResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
      .bind(email)
      .fetch_optional(&self.pool)
      .await?;
    Ok(user)
  }

  #[instrument(name = "pg_store::insert_user", skip(self, user), fields(email = %user.email, role = %user.role))]
  async fn insert_user(&self, user: NewUser) -> ShopResult<User> {
    sqlx::query_as::<_, User>(&format!(
      "INSERT INTO users (id, name, email, password_hash, role) VALUES ($1, $2, $3, $4, $5) RETURNING {USER_COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(&user.name)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(user.role)
    .fetch_one(&self.pool)
    .await
    .map_err(|e| {
      if is_unique_violation(&e) {
        ValidationError::UserExists.into()
      } else {
        ShopError::Database(e)
      }
    })
  }
}

#[async_trait]
impl CatalogStore for PgStore {
  async fn list_products(&self) -> ShopResult<Vec<Product>> {
    let products = sqlx::query_as::<_, Product>(&format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at, id"))
      .fetch_all(&self.pool)
      .await?;
    Ok(products)
  }

  async fn list_products_by_seller(&self, seller_id: Uuid) -> ShopResult<Vec<Product>> {
    let products = sqlx::query_as::<_, Product>(&format!(
      "SELECT {PRODUCT_COLUMNS} FROM products WHERE seller_id = $1 ORDER BY created_at, id"
    ))
    .bind(seller_id)
    .fetch_all(&self.pool)
    .await?;
    Ok(products)
  }

  async fn find_product(&self, product_id: Uuid) -> ShopResult<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"))
      .bind(product_id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(product)
  }

  #[instrument(name = "pg_store::insert_product", skip(self, product), fields(seller_id = %seller_id))]
  async fn insert_product(&self, seller_id: Uuid, product: NewProduct) -> ShopResult<Product> {
    let product = sqlx::query_as::<_, Product>(&format!(
      "INSERT INTO products (id, name, description, price, stock, seller_id) \
       VALUES ($1, $2, $3, $4, $5, $6) RETURNING {PRODUCT_COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(&product.name)
    .bind(&product.description)
    .bind(product.price)
    .bind(product.stock)
    .bind(seller_id)
    .fetch_one(&self.pool)
    .await?;
    Ok(product)
  }

  async fn update_product(
    &self,
    product_id: Uuid,
    owner: Option<Uuid>,
    changes: &ProductChanges,
  ) -> ShopResult<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(&format!(
      "UPDATE products SET \
         name = COALESCE($1, name), \
         description = COALESCE($2, description), \
         price = COALESCE($3, price), \
         stock = COALESCE($4, stock), \
         updated_at = NOW() \
       WHERE id = $5 AND ($6::uuid IS NULL OR seller_id = $6) \
       RETURNING {PRODUCT_COLUMNS}"
    ))
    .bind(&changes.name)
    .bind(&changes.description)
    .bind(changes.price)
    .bind(changes.stock)
    .bind(product_id)
    .bind(owner)
    .fetch_optional(&self.pool)
    .await?;
    Ok(product)
  }

  async fn delete_product(&self, product_id: Uuid, owner: Uuid) -> ShopResult<bool> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1 AND seller_id = $2")
      .bind(product_id)
      .bind(owner)
      .execute(&self.pool)
      .await?;
    Ok(result.rows_affected() > 0)
  }
}

#[async_trait]
impl CartStore for PgStore {
  async fn cart_lines(&self, user_id: Uuid) -> ShopResult<Vec<CartLine>> {
    let lines = sqlx::query_as::<_, CartLine>(CART_LINES_SQL)
      .bind(user_id)
      .fetch_all(&self.pool)
      .await?;
    Ok(lines)
  }

  async fn add_cart_item(&self, user_id: Uuid, product_id: Uuid, quantity: i32) -> ShopResult<CartItem> {
    // A merge that would pass the line cap updates nothing and returns no row.
    let item = sqlx::query_as::<_, CartItem>(&format!(
      "INSERT INTO cart_items (id, user_id, product_id, quantity) VALUES ($1, $2, $3, $4) \
       ON CONFLICT (user_id, product_id) DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity \
       WHERE cart_items.quantity <= $5 - EXCLUDED.quantity \
       RETURNING {CART_ITEM_COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(product_id)
    .bind(quantity)
    .bind(MAX_LINE_QUANTITY)
    .fetch_optional(&self.pool)
    .await
    .map_err(|e| {
      // Product deleted between the existence check and the insert.
      if is_foreign_key_violation(&e) {
        ShopError::not_found("Product not found")
      } else {
        ShopError::Database(e)
      }
    })?;
    item.ok_or_else(|| line_quantity_exceeded().into())
  }

  async fn set_cart_quantity(&self, user_id: Uuid, cart_item_id: Uuid, quantity: i32) -> ShopResult<Option<CartItem>> {
    let item = sqlx::query_as::<_, CartItem>(&format!(
      "UPDATE cart_items SET quantity = $1 WHERE id = $2 AND user_id = $3 RETURNING {CART_ITEM_COLUMNS}"
    ))
    .bind(quantity)
    .bind(cart_item_id)
    .bind(user_id)
    .fetch_optional(&self.pool)
    .await?;
    Ok(item)
  }

  async fn remove_cart_item(&self, user_id: Uuid, cart_item_id: Uuid) -> ShopResult<bool> {
    let result = sqlx::query("DELETE FROM cart_items WHERE id = $1 AND user_id = $2")
      .bind(cart_item_id)
      .bind(user_id)
      .execute(&self.pool)
      .await?;
    Ok(result.rows_affected() > 0)
  }
}

#[async_trait]
impl OrderStore for PgStore {
  #[instrument(name = "pg_store::begin_checkout", skip(self), fields(user_id = %user_id))]
  async fn begin_checkout(&self, user_id: Uuid) -> ShopResult<Box<dyn CheckoutUnit>> {
    let mut tx = self.pool.begin().await?;
    sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1::text, 0))")
      .bind(user_id)
      .execute(&mut *tx)
      .await?;
    debug!("Checkout lock acquired.");
    Ok(Box::new(PgCheckoutUnit { tx, user_id }))
  }

  async fn list_orders(&self, scope: OrderScope) -> ShopResult<Vec<OrderWithItems>> {
    let orders: Vec<Order> = match scope {
      OrderScope::All => {
        sqlx::query_as::<_, Order>(&format!("SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC, id"))
          .fetch_all(&self.pool)
          .await?
      }
      OrderScope::Seller(seller_id) => {
        sqlx::query_as::<_, Order>(&format!(
          "SELECT {ORDER_COLUMNS} FROM orders o WHERE EXISTS ( \
             SELECT 1 FROM order_items oi JOIN products p ON p.id = oi.product_id \
             WHERE oi.order_id = o.id AND p.seller_id = $1) \
           ORDER BY created_at DESC, id"
        ))
        .bind(seller_id)
        .fetch_all(&self.pool)
        .await?
      }
    };
    self.items_for_orders(orders).await
  }

  async fn find_order(&self, order_id: Uuid) -> ShopResult<Option<OrderWithItems>> {
    let order = sqlx::query_as::<_, Order>(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"))
      .bind(order_id)
      .fetch_optional(&self.pool)
      .await?;
    match order {
      Some(order) => Ok(self.items_for_orders(vec![order]).await?.pop()),
      None => Ok(None),
    }
  }

  async fn update_order_status(&self, order_id: Uuid, status: OrderStatus) -> ShopResult<Option<Order>> {
    let order = sqlx::query_as::<_, Order>(&format!(
      "UPDATE orders SET order_status = $1 WHERE id = $2 RETURNING {ORDER_COLUMNS}"
    ))
    .bind(status)
    .bind(order_id)
    .fetch_optional(&self.pool)
    .await?;
    Ok(order)
  }
}

/// One checkout transaction. Dropping it without `commit` rolls the transaction back.
pub struct PgCheckoutUnit {
  tx: Transaction<'static, Postgres>,
  user_id: Uuid,
}

#[async_trait]
impl CheckoutUnit for PgCheckoutUnit {
  fn user_id(&self) -> Uuid {
    self.user_id
  }

  async fn cart_lines(&mut self) -> ShopResult<Vec<CartLine>> {
    let lines = sqlx::query_as::<_, CartLine>(&format!("{} FOR UPDATE OF c", CART_LINES_SQL))
      .bind(self.user_id)
      .fetch_all(&mut *self.tx)
      .await?;
    Ok(lines)
  }

  async fn insert_order(&mut self, order: NewOrder) -> ShopResult<Order> {
    let order = sqlx::query_as::<_, Order>(&format!(
      "INSERT INTO orders (id, user_id, total_price, payment_status, order_status) \
       VALUES ($1, $2, $3, $4, $5) RETURNING {ORDER_COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(order.user_id)
    .bind(order.total_price)
    .bind(PaymentStatus::Pending)
    .bind(OrderStatus::Pending)
    .fetch_one(&mut *self.tx)
    .await?;
    Ok(order)
  }

  async fn insert_order_item(&mut self, item: NewOrderItem) -> ShopResult<OrderItem> {
    let item = sqlx::query_as::<_, OrderItem>(&format!(
      "INSERT INTO order_items (id, order_id, product_id, quantity, price) \
       VALUES ($1, $2, $3, $4, $5) RETURNING {ORDER_ITEM_COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(item.order_id)
    .bind(item.product_id)
    .bind(item.quantity)
    .bind(item.price)
    .fetch_one(&mut *self.tx)
    .await?;
    Ok(item)
  }

  async fn remove_cart_items(&mut self, cart_item_ids: &[Uuid]) -> ShopResult<u64> {
    let result = sqlx::query("DELETE FROM cart_items WHERE user_id = $1 AND id = ANY($2)")
      .bind(self.user_id)
      .bind(cart_item_ids)
      .execute(&mut *self.tx)
      .await?;
    Ok(result.rows_affected())
  }

  async fn commit(self: Box<Self>) -> ShopResult<()> {
    self.tx.commit().await?;
    Ok(())
  }
}
