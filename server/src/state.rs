// server/src/state.rs
use crate::config::AppConfig;
use std::sync::Arc;
use storefront::{Store, TokenCodec};

#[derive(Clone)]
pub struct AppState {
  pub store: Arc<dyn Store>,
  pub tokens: Arc<TokenCodec>,
  pub config: Arc<AppConfig>, // Share loaded config
}

impl AppState {
  pub fn new(store: Arc<dyn Store>, config: AppConfig) -> Self {
    AppState {
      store,
      tokens: Arc::new(TokenCodec::new(&config.jwt_secret)),
      config: Arc::new(config),
    }
  }
}
