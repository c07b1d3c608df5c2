// server/src/web/handlers/cart_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use storefront::service::{cart, CartAggregator};
use tracing::instrument;
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::{Authorized, CustomerOnly};

// --- Request DTOs ---
#[derive(Deserialize, Debug)]
pub struct AddToCartRequestPayload {
  pub product_id: Uuid,
  pub quantity: i32,
}

#[derive(Deserialize, Debug)]
pub struct UpdateCartRequestPayload {
  pub quantity: i32,
}

// --- Handler Implementations ---

#[instrument(name = "handler::view_cart", skip(app_state, customer), fields(user_id = %customer.user_id))]
pub async fn view_cart_handler(
  app_state: web::Data<AppState>,
  customer: Authorized<CustomerOnly>,
) -> Result<HttpResponse, AppError> {
  let summary = CartAggregator::summarize(&*app_state.store, customer.user_id).await?;
  Ok(HttpResponse::Ok().json(summary))
}

#[instrument(
  name = "handler::add_to_cart",
  skip(app_state, req_payload, customer),
  fields(user_id = %customer.user_id, product_id = %req_payload.product_id, quantity = %req_payload.quantity)
)]
pub async fn add_to_cart_handler(
  app_state: web::Data<AppState>,
  customer: Authorized<CustomerOnly>,
  req_payload: web::Json<AddToCartRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let item = cart::add_item(
    &*app_state.store,
    customer.context(),
    req_payload.product_id,
    req_payload.quantity,
  )
  .await?;

  Ok(HttpResponse::Ok().json(json!({
      "message": "Product added to cart successfully",
      "cartItem": item,
  })))
}

#[instrument(
  name = "handler::update_cart_item",
  skip(app_state, path, req_payload, customer),
  fields(user_id = %customer.user_id, cart_item_id = %path.as_ref())
)]
pub async fn update_cart_item_handler(
  app_state: web::Data<AppState>,
  customer: Authorized<CustomerOnly>,
  path: web::Path<Uuid>,
  req_payload: web::Json<UpdateCartRequestPayload>,
) -> Result<HttpResponse, AppError> {
  cart::update_quantity(
    &*app_state.store,
    customer.context(),
    path.into_inner(),
    req_payload.quantity,
  )
  .await?;
  Ok(HttpResponse::Ok().json(json!({ "message": "Cart updated successfully" })))
}

#[instrument(
  name = "handler::remove_cart_item",
  skip(app_state, path, customer),
  fields(user_id = %customer.user_id, cart_item_id = %path.as_ref())
)]
pub async fn remove_cart_item_handler(
  app_state: web::Data<AppState>,
  customer: Authorized<CustomerOnly>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  cart::remove_item(&*app_state.store, customer.context(), path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(json!({ "message": "Item removed from cart successfully" })))
}
