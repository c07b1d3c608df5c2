// core/src/validation.rs

//! Input checks for registration, login, catalog and cart requests.
//!
//! Payload types derive `validator::Validate`. [`check`] runs those rules and folds every
//! failing field into one [`ValidationError`], so a client sees the full list of problems in a
//! single 400 response.

use rust_decimal::Decimal;
use std::borrow::Cow;
use validator::{Validate, ValidationErrors};

use crate::error::{FieldError, ValidationError};

/// Largest quantity a single cart line may hold, whether set directly or reached by adding.
pub const MAX_LINE_QUANTITY: i32 = 10_000;

/// Largest money amount a price or order total may carry (`NUMERIC(12, 2)`).
pub fn max_amount() -> Decimal {
  Decimal::new(999_999_999_999, 2)
}

/// Runs the derived rules of `payload`. Field errors are reported in `field_order`; fields not
/// listed there come last.
pub fn check<T: Validate>(payload: &T, field_order: &[&str]) -> Result<(), ValidationError> {
  payload
    .validate()
    .map_err(|errors| from_validator(&errors, field_order))
}

fn from_validator(errors: &ValidationErrors, field_order: &[&str]) -> ValidationError {
  let mut fields: Vec<FieldError> = Vec::new();
  for (field, errs) in errors.field_errors() {
    let field = field.to_string();
    for err in errs.iter() {
      let message = match &err.message {
        Some(message) => message.to_string(),
        None => err.code.to_string(),
      };
      fields.push(FieldError::new(field.clone(), message));
    }
  }
  fields.sort_by_key(|f| {
    field_order
      .iter()
      .position(|name| *name == f.field)
      .unwrap_or(field_order.len())
  });
  ValidationError::from_fields(fields)
}

fn rule(code: &'static str, message: impl Into<Cow<'static, str>>) -> validator::ValidationError {
  let mut err = validator::ValidationError::new(code);
  err.message = Some(message.into());
  err
}

pub(crate) fn name_present(name: &str) -> Result<(), validator::ValidationError> {
  if name.trim().is_empty() {
    return Err(rule("required", "Name is required"));
  }
  Ok(())
}

pub(crate) fn price_in_range(price: &Decimal) -> Result<(), validator::ValidationError> {
  if price.is_sign_negative() && !price.is_zero() {
    return Err(rule("range", "Price must not be negative"));
  }
  if *price > max_amount() {
    return Err(rule("range", format!("Price must not exceed {}", max_amount())));
  }
  if price.normalize().scale() > 2 {
    return Err(rule("scale", "Price must have at most two decimal places"));
  }
  Ok(())
}

fn quantity_error(message: String) -> ValidationError {
  ValidationError::from_fields(vec![FieldError::new("quantity", message)])
}

pub fn validate_quantity(quantity: i32) -> Result<(), ValidationError> {
  if quantity <= 0 {
    return Err(quantity_error("Quantity must be greater than zero".to_string()));
  }
  if quantity > MAX_LINE_QUANTITY {
    return Err(line_quantity_exceeded());
  }
  Ok(())
}

/// A cart line would grow past [`MAX_LINE_QUANTITY`].
pub fn line_quantity_exceeded() -> ValidationError {
  quantity_error(format!("Quantity must not exceed {}", MAX_LINE_QUANTITY))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::{NewProduct, ProductChanges};
  use crate::service::accounts::{Login, Registration};

  fn registration(name: &str, email: &str, password: &str) -> Registration {
    Registration {
      name: name.to_string(),
      email: email.to_string(),
      password: password.to_string(),
      role: None,
    }
  }

  fn field_names(err: &ValidationError) -> Vec<&str> {
    err.fields().iter().map(|f| f.field.as_str()).collect()
  }

  #[test]
  fn registration_collects_all_fields_in_order() {
    let err = check(&registration(" ", "nope", "123"), &["name", "email", "password"]).unwrap_err();
    assert_eq!(field_names(&err), vec!["name", "email", "password"]);
    assert_eq!(err.to_string(), "Name is required");
  }

  #[test]
  fn registration_accepts_valid_input() {
    assert!(check(&registration("Ada", "ada@example.com", "secret1"), &[]).is_ok());
  }

  #[test]
  fn email_shapes() {
    for bad in ["ada.example.com", "@example.com", "ada@@example.com", "a da@example.com"] {
      let login = Login {
        email: bad.to_string(),
        password: "x".to_string(),
      };
      let err = check(&login, &[]).unwrap_err();
      assert_eq!(field_names(&err), vec!["email"], "{bad}");
      assert_eq!(err.to_string(), "Valid email is required");
    }
  }

  #[test]
  fn quantity_bounds() {
    assert!(validate_quantity(1).is_ok());
    assert!(validate_quantity(MAX_LINE_QUANTITY).is_ok());
    assert!(validate_quantity(0).is_err());
    assert!(validate_quantity(-3).is_err());
    assert_eq!(
      validate_quantity(MAX_LINE_QUANTITY + 1).unwrap_err().to_string(),
      "Quantity must not exceed 10000"
    );
  }

  #[test]
  fn product_rules() {
    let mut p = NewProduct {
      name: "Lamp".to_string(),
      description: None,
      price: Decimal::new(1999, 2),
      stock: 4,
    };
    assert!(check(&p, &[]).is_ok());
    p.price = Decimal::new(-1, 0);
    p.stock = -1;
    let err = check(&p, &["name", "price", "stock"]).unwrap_err();
    assert_eq!(field_names(&err), vec!["price", "stock"]);

    let changes = ProductChanges {
      name: Some("  ".to_string()),
      ..Default::default()
    };
    assert!(check(&changes, &[]).is_err());
    assert!(check(&ProductChanges::default(), &[]).is_ok());
  }

  #[test]
  fn price_is_bounded_by_the_money_column() {
    assert!(price_in_range(&max_amount()).is_ok());
    assert!(price_in_range(&Decimal::new(1050, 3)).is_ok());
    assert!(price_in_range(&Decimal::MAX).is_err());
    assert!(price_in_range(&(max_amount() + Decimal::new(1, 2))).is_err());
    assert!(price_in_range(&Decimal::new(1999, 3)).is_err());
  }
}
