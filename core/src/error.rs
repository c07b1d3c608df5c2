// core/src/error.rs

//! Error taxonomy shared by every storefront operation.

use serde::Serialize;
use thiserror::Error;

/// A single rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
  pub field: String,
  pub message: String,
}

impl FieldError {
  pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
    FieldError {
      field: field.into(),
      message: message.into(),
    }
  }
}

/// Malformed or unacceptable input. Always surfaces as a 400.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("{message}")]
  Invalid { message: String, fields: Vec<FieldError> },

  #[error("Cart is empty!")]
  EmptyCart,

  #[error("Unknown order status '{0}'")]
  UnknownOrderStatus(String),

  #[error("User already exists")]
  UserExists,
}

impl ValidationError {
  pub fn invalid(message: impl Into<String>) -> Self {
    ValidationError::Invalid {
      message: message.into(),
      fields: Vec::new(),
    }
  }

  /// Builds an `Invalid` error out of collected field errors.
  pub fn from_fields(fields: Vec<FieldError>) -> Self {
    let message = fields
      .first()
      .map(|f| f.message.clone())
      .unwrap_or_else(|| "Invalid request".to_string());
    ValidationError::Invalid { message, fields }
  }

  pub fn fields(&self) -> &[FieldError] {
    match self {
      ValidationError::Invalid { fields, .. } => fields,
      _ => &[],
    }
  }
}

/// Authentication and authorization failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
  #[error("Access Denied: No Token Provided")]
  MissingToken,

  #[error("Invalid Token")]
  InvalidToken,

  #[error("{0}")]
  Forbidden(String),

  #[error("Invalid credentials")]
  InvalidCredentials,
}

#[derive(Debug, Error)]
pub enum ShopError {
  #[error(transparent)]
  Validation(#[from] ValidationError),

  #[error(transparent)]
  Auth(#[from] AuthError),

  #[error("{0}")]
  NotFound(String),

  #[error("Database Error: {0}")]
  Database(#[from] sqlx::Error),

  #[error("Internal Error: {0}")]
  Internal(String),
}

impl ShopError {
  pub fn not_found(message: impl Into<String>) -> Self {
    ShopError::NotFound(message.into())
  }

  /// True when the failure is the empty-cart rejection of a checkout.
  pub fn is_empty_cart(&self) -> bool {
    matches!(self, ShopError::Validation(ValidationError::EmptyCart))
  }
}

// Store adapters and startup helpers use anyhow for context; fold those into Internal.
impl From<anyhow::Error> for ShopError {
  fn from(err: anyhow::Error) -> Self {
    match err.downcast::<sqlx::Error>() {
      Ok(db_err) => ShopError::Database(db_err),
      Err(other) => ShopError::Internal(format!("{:#}", other)),
    }
  }
}

pub type ShopResult<T, E = ShopError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn from_fields_uses_first_message() {
    let err = ValidationError::from_fields(vec![
      FieldError::new("name", "Name is required"),
      FieldError::new("email", "Valid email is required"),
    ]);
    assert_eq!(err.to_string(), "Name is required");
    assert_eq!(err.fields().len(), 2);
  }

  #[test]
  fn anyhow_wrapping_sqlx_keeps_database_variant() {
    let err: ShopError = anyhow::Error::new(sqlx::Error::RowNotFound).into();
    assert!(matches!(err, ShopError::Database(sqlx::Error::RowNotFound)));

    let err: ShopError = anyhow::anyhow!("boom").into();
    assert!(matches!(err, ShopError::Internal(m) if m == "boom"));
  }
}
