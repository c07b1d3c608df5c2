// server/src/web/routes.rs

use actix_web::error::{JsonPayloadError, PathError};
use actix_web::{web, HttpRequest, HttpResponse};
use storefront::ValidationError;

use crate::errors::AppError;
use crate::web::handlers::{auth_handlers, cart_handlers, order_handlers, product_handlers};

async fn banner_handler() -> HttpResponse {
  HttpResponse::Ok()
    .content_type("text/plain; charset=utf-8")
    .body("E-commerce Backend API is Running!")
}

async fn health_check_handler() -> HttpResponse {
  HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

// Malformed or mistyped bodies are client errors with the usual `message` shape.
fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
  tracing::debug!(error = %err, "Rejected request body.");
  AppError::from(ValidationError::invalid(format!("Invalid request body: {}", err))).into()
}

// Ids in the path that do not parse get the same shape instead of actix's plain-text 404.
fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
  tracing::debug!(error = %err, "Rejected path parameter.");
  AppError::from(ValidationError::invalid(format!("Invalid path parameter: {}", err))).into()
}

// Called from `main.rs` and the integration tests to configure the Actix App.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .app_data(web::JsonConfig::default().error_handler(json_error_handler))
    .app_data(web::PathConfig::default().error_handler(path_error_handler))
    .route("/", web::get().to(banner_handler))
    .route("/health", web::get().to(health_check_handler))
    .service(
      web::scope("/api")
        .service(
          web::scope("/auth")
            .route("/register", web::post().to(auth_handlers::register_handler))
            .route("/login", web::post().to(auth_handlers::login_handler))
            .route("/admin", web::get().to(auth_handlers::admin_welcome_handler)),
        )
        .service(
          web::scope("/products")
            .route("", web::get().to(product_handlers::list_products_handler))
            .route("", web::post().to(product_handlers::create_product_handler))
            // Fixed segments before `/{product_id}`.
            .route("/seller/products", web::get().to(product_handlers::list_own_products_handler))
            .route(
              "/order/{order_id}/status",
              web::put().to(product_handlers::update_order_status_handler),
            )
            .route("/{product_id}", web::get().to(product_handlers::get_product_handler))
            .route("/{product_id}", web::put().to(product_handlers::update_product_handler))
            .route("/{product_id}", web::delete().to(product_handlers::delete_product_handler)),
        )
        .service(
          web::scope("/cart")
            .route("", web::get().to(cart_handlers::view_cart_handler))
            .route("/add", web::post().to(cart_handlers::add_to_cart_handler))
            .route("/update/{cart_item_id}", web::put().to(cart_handlers::update_cart_item_handler))
            .route("/remove/{cart_item_id}", web::delete().to(cart_handlers::remove_cart_item_handler)),
        )
        .service(
          web::scope("/orders")
            .route("/order", web::post().to(order_handlers::place_order_handler))
            .route("/orders", web::get().to(order_handlers::list_orders_handler)),
        ),
    );
}
