// core/src/service/checkout.rs

//! Cart-to-order checkout.
//!
//! ```text
//!  begin_checkout(user)        per-user lock taken, unit of work opened
//!        │
//!  cart_lines()                snapshot; empty → EmptyCart, nothing written
//!        │
//!  insert_order(total)         total = Σ price × quantity over the snapshot
//!        │
//!  insert_order_item() × N     snapshotted price, never the live one
//!        │
//!  remove_cart_items(ids)      exactly the snapshotted rows
//!        │
//!  commit()                    all of the above become visible at once
//! ```
//!
//! Any failure after `begin_checkout` drops the unit, which rolls everything back and leaves
//! the cart intact so the customer can retry.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::auth::AuthContext;
use crate::error::{ShopError, ShopResult, ValidationError};
use crate::model::{cart_total, CartLine, NewOrder, NewOrderItem};
use crate::store::OrderStore;
use crate::validation::max_amount;

pub const ORDER_PLACED_MESSAGE: &str = "Order placed successfully (COD)";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckoutReceipt {
  pub message: String,
  #[serde(rename = "orderId")]
  pub order_id: Uuid,
  pub total_price: Decimal,
  pub item_count: usize,
}

/// Order total of a snapshot; it must fit the money column of the order row.
pub fn snapshot_total(lines: &[CartLine]) -> ShopResult<Decimal> {
  let total = cart_total(lines)?;
  if total > max_amount() {
    return Err(ValidationError::invalid(format!("Order total must not exceed {}", max_amount())).into());
  }
  Ok(total)
}

#[instrument(name = "checkout::place_order", skip(store, ctx), fields(user_id = %ctx.user_id), err(Display))]
pub async fn place_order<S>(store: &S, ctx: &AuthContext) -> ShopResult<CheckoutReceipt>
where
  S: OrderStore + ?Sized,
{
  let mut unit = store.begin_checkout(ctx.user_id).await?;

  let snapshot = unit.cart_lines().await?;
  if snapshot.is_empty() {
    warn!("Checkout attempted with an empty cart.");
    return Err(ValidationError::EmptyCart.into());
  }

  let total_price = snapshot_total(&snapshot)?;
  let order = unit
    .insert_order(NewOrder {
      user_id: ctx.user_id,
      total_price,
    })
    .await?;

  for line in &snapshot {
    unit
      .insert_order_item(NewOrderItem {
        order_id: order.id,
        product_id: line.product_id,
        quantity: line.quantity,
        price: line.price,
      })
      .await?;
  }

  let consumed: Vec<Uuid> = snapshot.iter().map(|line| line.cart_item_id).collect();
  let removed = unit.remove_cart_items(&consumed).await?;
  if removed != consumed.len() as u64 {
    // Compare-and-delete against the snapshot.
    warn!(expected = consumed.len(), removed, "Cart changed during checkout; rolling back.");
    return Err(ShopError::Internal("Cart changed during checkout".to_string()));
  }

  unit.commit().await?;

  info!(order_id = %order.id, total = %total_price, lines = snapshot.len(), "Order placed.");
  Ok(CheckoutReceipt {
    message: ORDER_PLACED_MESSAGE.to_string(),
    order_id: order.id,
    total_price,
    item_count: snapshot.len(),
  })
}
