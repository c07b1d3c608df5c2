// server/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use storefront::{AuthError, ShopError, ValidationError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Configuration Error: {0}")]
  Config(String),

  #[error(transparent)]
  Shop(#[from] ShopError),
}

impl From<AuthError> for AppError {
  fn from(err: AuthError) -> Self {
    AppError::Shop(err.into())
  }
}

impl From<ValidationError> for AppError {
  fn from(err: ValidationError) -> Self {
    AppError::Shop(err.into())
  }
}

// Startup helpers (pool, migrations) report through anyhow.
impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    AppError::Shop(err.into())
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
      AppError::Shop(shop) => match shop {
        ShopError::Validation(_) => StatusCode::BAD_REQUEST,
        ShopError::Auth(AuthError::MissingToken) => StatusCode::UNAUTHORIZED,
        ShopError::Auth(AuthError::InvalidToken) | ShopError::Auth(AuthError::Forbidden(_)) => StatusCode::FORBIDDEN,
        ShopError::Auth(AuthError::InvalidCredentials) => StatusCode::BAD_REQUEST,
        ShopError::NotFound(_) => StatusCode::NOT_FOUND,
        ShopError::Database(_) | ShopError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
      },
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    if status.is_server_error() {
      // Details stay in the log; the client only learns that something failed.
      tracing::error!(application_error = %self, "Responding with server error");
      return HttpResponse::build(status).json(json!({ "message": "Server error" }));
    }

    tracing::debug!(application_error = %self, status = status.as_u16(), "Responding with client error");
    match self {
      AppError::Shop(ShopError::Validation(v)) if !v.fields().is_empty() => {
        HttpResponse::build(status).json(json!({ "message": v.to_string(), "errors": v.fields() }))
      }
      _ => HttpResponse::build(status).json(json!({ "message": self.to_string() })),
    }
  }
}

// Define a Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;
