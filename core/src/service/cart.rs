// core/src/service/cart.rs

//! The customer's cart: aggregation (read side) and line maintenance.

use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::AuthContext;
use crate::error::{ShopError, ShopResult};
use crate::model::{CartItem, CartLine, CartSummary};
use crate::store::{CartStore, CatalogStore};
use crate::validation::validate_quantity;

/// Read-only view of a user's cart priced against the live catalog.
pub struct CartAggregator;

impl CartAggregator {
  /// Lines in cart insertion order; an empty cart is an empty vector, not an error.
  pub async fn list<S>(store: &S, user_id: Uuid) -> ShopResult<Vec<CartLine>>
  where
    S: CartStore + ?Sized,
  {
    store.cart_lines(user_id).await
  }

  pub async fn summarize<S>(store: &S, user_id: Uuid) -> ShopResult<CartSummary>
  where
    S: CartStore + ?Sized,
  {
    Ok(CartSummary::from_lines(Self::list(store, user_id).await?)?)
  }
}

#[instrument(name = "cart::add_item", skip(store, ctx), fields(user_id = %ctx.user_id))]
pub async fn add_item<S>(store: &S, ctx: &AuthContext, product_id: Uuid, quantity: i32) -> ShopResult<CartItem>
where
  S: CartStore + CatalogStore + ?Sized,
{
  validate_quantity(quantity)?;

  if store.find_product(product_id).await?.is_none() {
    return Err(ShopError::not_found("Product not found"));
  }

  let item = store.add_cart_item(ctx.user_id, product_id, quantity).await?;
  info!(cart_item_id = %item.id, new_quantity = item.quantity, "Product added to cart.");
  Ok(item)
}

#[instrument(name = "cart::update_quantity", skip(store, ctx), fields(user_id = %ctx.user_id))]
pub async fn update_quantity<S>(store: &S, ctx: &AuthContext, cart_item_id: Uuid, quantity: i32) -> ShopResult<CartItem>
where
  S: CartStore + ?Sized,
{
  validate_quantity(quantity)?;

  store
    .set_cart_quantity(ctx.user_id, cart_item_id, quantity)
    .await?
    .ok_or_else(|| ShopError::not_found("Cart item not found"))
}

#[instrument(name = "cart::remove_item", skip(store, ctx), fields(user_id = %ctx.user_id))]
pub async fn remove_item<S>(store: &S, ctx: &AuthContext, cart_item_id: Uuid) -> ShopResult<()>
where
  S: CartStore + ?Sized,
{
  if store.remove_cart_item(ctx.user_id, cart_item_id).await? {
    Ok(())
  } else {
    Err(ShopError::not_found("Cart item not found"))
  }
}
