// core/src/model/order.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type as SqlxType};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::order_item::OrderItem;
use crate::error::ValidationError;

/// Lifecycle label of an order. Any known status may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, SqlxType)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "order_status_enum", rename_all = "lowercase")]
pub enum OrderStatus {
  Pending,
  Confirmed,
  Shipped,
  Delivered,
  Cancelled,
}

impl OrderStatus {
  pub const ALL: [OrderStatus; 5] = [
    OrderStatus::Pending,
    OrderStatus::Confirmed,
    OrderStatus::Shipped,
    OrderStatus::Delivered,
    OrderStatus::Cancelled,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      OrderStatus::Pending => "pending",
      OrderStatus::Confirmed => "confirmed",
      OrderStatus::Shipped => "shipped",
      OrderStatus::Delivered => "delivered",
      OrderStatus::Cancelled => "cancelled",
    }
  }
}

impl fmt::Display for OrderStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for OrderStatus {
  type Err = ValidationError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let wanted = s.trim().to_ascii_lowercase();
    OrderStatus::ALL
      .into_iter()
      .find(|status| status.as_str() == wanted)
      .ok_or_else(|| ValidationError::UnknownOrderStatus(s.to_string()))
  }
}

/// Checkout settles pay-on-delivery, so every order starts (and stays) pending payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, SqlxType)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "payment_status_enum", rename_all = "lowercase")]
pub enum PaymentStatus {
  Pending,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Order {
  pub id: Uuid,
  pub user_id: Uuid,
  pub total_price: Decimal,
  pub payment_status: PaymentStatus,
  pub order_status: OrderStatus,
  pub created_at: DateTime<Utc>,
}

/// Values for a new order row; the store assigns id and timestamp.
#[derive(Debug, Clone)]
pub struct NewOrder {
  pub user_id: Uuid,
  pub total_price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderWithItems {
  #[serde(flatten)]
  pub order: Order,
  pub items: Vec<OrderItem>,
}

impl OrderWithItems {
  /// Sum of the snapshotted line prices; equals `order.total_price` for every stored order.
  pub fn items_total(&self) -> Decimal {
    self.items.iter().map(OrderItem::line_total).sum()
  }
}
