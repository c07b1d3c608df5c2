// server/src/lib.rs

//! HTTP surface of the storefront: configuration, error mapping, request guards and routes.

pub mod config;
pub mod errors;
pub mod state;
pub mod web;

pub use config::AppConfig;
pub use errors::AppError;
pub use state::AppState;
pub use web::configure_app_routes;
