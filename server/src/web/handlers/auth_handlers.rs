// server/src/web/handlers/auth_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use storefront::service::accounts::{self, Login, Registration};
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::{AdminOnly, Authorized};

#[instrument(name = "handler::register", skip(app_state, req_payload), fields(req_email = %req_payload.email))]
pub async fn register_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<Registration>,
) -> Result<HttpResponse, AppError> {
  let account = accounts::register(&*app_state.store, &app_state.tokens, req_payload.into_inner()).await?;

  Ok(HttpResponse::Created().json(json!({
      "message": "User registered successfully",
      "token": account.token,
      "user": account.user,
  })))
}

#[instrument(name = "handler::login", skip(app_state, req_payload), fields(req_email = %req_payload.email))]
pub async fn login_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<Login>,
) -> Result<HttpResponse, AppError> {
  let token = accounts::login(&*app_state.store, &app_state.tokens, req_payload.into_inner()).await?;

  Ok(HttpResponse::Ok().json(json!({
      "message": "Login successful",
      "token": token,
  })))
}

#[instrument(name = "handler::admin_welcome", skip(admin), fields(user_id = %admin.user_id))]
pub async fn admin_welcome_handler(admin: Authorized<AdminOnly>) -> HttpResponse {
  info!("Admin area accessed.");
  HttpResponse::Ok().json(json!({ "message": "Welcome, Admin!" }))
}
