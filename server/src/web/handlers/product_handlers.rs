// server/src/web/handlers/product_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use storefront::model::{NewProduct, ProductChanges};
use storefront::service::{catalog, orders};
use storefront::store::CatalogStore;
use storefront::ShopError;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::{AdminOrSeller, AnyRole, Authorized, SellerOnly};

#[instrument(name = "handler::list_products", skip(app_state, _caller))]
pub async fn list_products_handler(
  app_state: web::Data<AppState>,
  _caller: Authorized<AnyRole>,
) -> Result<HttpResponse, AppError> {
  let products = catalog::list_all(&*app_state.store).await?;
  info!("Successfully fetched {} products.", products.len());
  Ok(HttpResponse::Ok().json(products))
}

#[instrument(name = "handler::get_product", skip(app_state, _caller, path), fields(product_id = %path.as_ref()))]
pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  _caller: Authorized<AnyRole>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let product = app_state
    .store
    .find_product(path.into_inner())
    .await?
    .ok_or_else(|| ShopError::not_found("Product not found"))?;
  Ok(HttpResponse::Ok().json(product))
}

#[instrument(name = "handler::create_product", skip(app_state, staff, req_payload), fields(user_id = %staff.user_id))]
pub async fn create_product_handler(
  app_state: web::Data<AppState>,
  staff: Authorized<AdminOrSeller>,
  req_payload: web::Json<NewProduct>,
) -> Result<HttpResponse, AppError> {
  let product = catalog::create(&*app_state.store, staff.context(), req_payload.into_inner()).await?;
  Ok(HttpResponse::Created().json(product))
}

#[instrument(name = "handler::list_own_products", skip(app_state, staff), fields(user_id = %staff.user_id))]
pub async fn list_own_products_handler(
  app_state: web::Data<AppState>,
  staff: Authorized<AdminOrSeller>,
) -> Result<HttpResponse, AppError> {
  let products = catalog::list_own(&*app_state.store, staff.context()).await?;
  Ok(HttpResponse::Ok().json(products))
}

#[instrument(
  name = "handler::update_product",
  skip(app_state, staff, path, req_payload),
  fields(user_id = %staff.user_id, product_id = %path.as_ref())
)]
pub async fn update_product_handler(
  app_state: web::Data<AppState>,
  staff: Authorized<AdminOrSeller>,
  path: web::Path<Uuid>,
  req_payload: web::Json<ProductChanges>,
) -> Result<HttpResponse, AppError> {
  let product = catalog::update(
    &*app_state.store,
    staff.context(),
    path.into_inner(),
    req_payload.into_inner(),
  )
  .await?;
  Ok(HttpResponse::Ok().json(product))
}

#[instrument(
  name = "handler::delete_product",
  skip(app_state, seller, path),
  fields(user_id = %seller.user_id, product_id = %path.as_ref())
)]
pub async fn delete_product_handler(
  app_state: web::Data<AppState>,
  seller: Authorized<SellerOnly>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  catalog::delete(&*app_state.store, seller.context(), path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(json!({ "message": "Product deleted successfully" })))
}

#[derive(Deserialize, Debug)]
pub struct OrderStatusPayload {
  pub order_status: String,
}

#[instrument(
  name = "handler::update_order_status",
  skip(app_state, staff, path, req_payload),
  fields(user_id = %staff.user_id, order_id = %path.as_ref())
)]
pub async fn update_order_status_handler(
  app_state: web::Data<AppState>,
  staff: Authorized<AdminOrSeller>,
  path: web::Path<Uuid>,
  req_payload: web::Json<OrderStatusPayload>,
) -> Result<HttpResponse, AppError> {
  let order = orders::set_status(
    &*app_state.store,
    staff.context(),
    path.into_inner(),
    &req_payload.order_status,
  )
  .await?;

  Ok(HttpResponse::Ok().json(json!({
      "message": "Order status updated",
      "order": order,
  })))
}
