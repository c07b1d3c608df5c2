// server/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use storefront::service::{orders, place_order};
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::{AdminOrSeller, Authorized, CustomerOnly};

#[instrument(name = "handler::place_order", skip(app_state, customer), fields(user_id = %customer.user_id))]
pub async fn place_order_handler(
  app_state: web::Data<AppState>,
  customer: Authorized<CustomerOnly>,
) -> Result<HttpResponse, AppError> {
  let receipt = place_order(&*app_state.store, customer.context()).await?;
  info!(order_id = %receipt.order_id, "Checkout completed.");
  Ok(HttpResponse::Ok().json(receipt))
}

#[instrument(name = "handler::list_orders", skip(app_state, staff), fields(user_id = %staff.user_id, role = %staff.role))]
pub async fn list_orders_handler(
  app_state: web::Data<AppState>,
  staff: Authorized<AdminOrSeller>,
) -> Result<HttpResponse, AppError> {
  let orders = orders::list_for(&*app_state.store, staff.context()).await?;
  Ok(HttpResponse::Ok().json(orders))
}
