// core/src/service/catalog.rs

use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::AuthContext;
use crate::error::{ShopError, ShopResult};
use crate::model::{NewProduct, Product, ProductChanges, Role};
use crate::store::CatalogStore;
use crate::validation;

pub const NOT_OWNED_EDIT: &str = "Product not found or you don't have permission to edit it";
pub const NOT_OWNED_DELETE: &str = "Product not found or you don't have permission to delete it";

pub async fn list_all<S: CatalogStore + ?Sized>(store: &S) -> ShopResult<Vec<Product>> {
  store.list_products().await
}

pub async fn list_own<S: CatalogStore + ?Sized>(store: &S, ctx: &AuthContext) -> ShopResult<Vec<Product>> {
  store.list_products_by_seller(ctx.user_id).await
}

#[instrument(name = "catalog::create", skip(store, ctx, product), fields(seller_id = %ctx.user_id, name = %product.name))]
pub async fn create<S: CatalogStore + ?Sized>(store: &S, ctx: &AuthContext, product: NewProduct) -> ShopResult<Product> {
  validation::check(&product, &NewProduct::FIELDS)?;
  let product = store.insert_product(ctx.user_id, product).await?;
  info!(product_id = %product.id, "Product created.");
  Ok(product)
}

/// Sellers may only edit their own products; admins may edit any.
#[instrument(name = "catalog::update", skip(store, ctx, changes), fields(user_id = %ctx.user_id))]
pub async fn update<S: CatalogStore + ?Sized>(
  store: &S,
  ctx: &AuthContext,
  product_id: Uuid,
  changes: ProductChanges,
) -> ShopResult<Product> {
  validation::check(&changes, &NewProduct::FIELDS)?;

  let owner = match ctx.role {
    Role::Admin => None,
    _ => Some(ctx.user_id),
  };

  store
    .update_product(product_id, owner, &changes)
    .await?
    .ok_or_else(|| ShopError::not_found(NOT_OWNED_EDIT))
}

#[instrument(name = "catalog::delete", skip(store, ctx), fields(user_id = %ctx.user_id))]
pub async fn delete<S: CatalogStore + ?Sized>(store: &S, ctx: &AuthContext, product_id: Uuid) -> ShopResult<()> {
  if store.delete_product(product_id, ctx.user_id).await? {
    info!("Product deleted.");
    Ok(())
  } else {
    Err(ShopError::not_found(NOT_OWNED_DELETE))
  }
}
