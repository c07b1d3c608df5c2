// core/src/model/cart_item.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct CartItem {
  pub id: Uuid, // Primary key for the cart_item itself
  pub user_id: Uuid,
  pub product_id: Uuid,
  pub quantity: i32,
  pub added_at: DateTime<Utc>,
}

/// A cart row joined with the product it refers to, priced at read time.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct CartLine {
  pub cart_item_id: Uuid,
  pub product_id: Uuid,
  pub name: String,
  pub price: Decimal,
  pub quantity: i32,
}

fn amount_out_of_range() -> ValidationError {
  ValidationError::invalid("Cart total is out of range")
}

impl CartLine {
  pub fn line_total(&self) -> Result<Decimal, ValidationError> {
    self
      .price
      .checked_mul(Decimal::from(self.quantity))
      .ok_or_else(amount_out_of_range)
  }
}

/// Sum of the line totals, failing rather than overflowing.
pub fn cart_total(lines: &[CartLine]) -> Result<Decimal, ValidationError> {
  lines.iter().try_fold(Decimal::ZERO, |acc, line| {
    acc.checked_add(line.line_total()?).ok_or_else(amount_out_of_range)
  })
}

/// Cart contents plus summed pricing, as shown to the customer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartSummary {
  pub items: Vec<PricedCartLine>,
  pub total_price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricedCartLine {
  #[serde(flatten)]
  pub line: CartLine,
  pub line_total: Decimal,
}

impl CartSummary {
  pub fn from_lines(lines: Vec<CartLine>) -> Result<Self, ValidationError> {
    let total_price = cart_total(&lines)?;
    let items = lines
      .into_iter()
      .map(|line| {
        Ok(PricedCartLine {
          line_total: line.line_total()?,
          line,
        })
      })
      .collect::<Result<Vec<_>, ValidationError>>()?;
    Ok(CartSummary { items, total_price })
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }
}
