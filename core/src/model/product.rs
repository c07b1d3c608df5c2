// core/src/model/product.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Product {
  pub id: Uuid,
  pub name: String,
  pub description: Option<String>, // Description can be optional
  pub price: Decimal,
  pub stock: i32,
  pub seller_id: Uuid,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Product {
  /// Applies a partial update in place; absent fields keep their value.
  pub fn apply(&mut self, changes: &ProductChanges) {
    if let Some(name) = &changes.name {
      self.name = name.clone();
    }
    if let Some(description) = &changes.description {
      self.description = Some(description.clone());
    }
    if let Some(price) = changes.price {
      self.price = price;
    }
    if let Some(stock) = changes.stock {
      self.stock = stock;
    }
  }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewProduct {
  #[validate(custom(function = "crate::validation::name_present"))]
  pub name: String,
  pub description: Option<String>,
  #[validate(custom(function = "crate::validation::price_in_range"))]
  pub price: Decimal,
  #[validate(range(min = 0, message = "Stock must not be negative"))]
  pub stock: i32,
}

impl NewProduct {
  pub const FIELDS: [&'static str; 3] = ["name", "price", "stock"];
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ProductChanges {
  #[validate(custom(function = "crate::validation::name_present"))]
  pub name: Option<String>,
  pub description: Option<String>,
  #[validate(custom(function = "crate::validation::price_in_range"))]
  pub price: Option<Decimal>,
  #[validate(range(min = 0, message = "Stock must not be negative"))]
  pub stock: Option<i32>,
}
