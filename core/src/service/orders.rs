// core/src/service/orders.rs

//! Order oversight for admins and sellers.

use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::{AuthContext, Capability};
use crate::error::{AuthError, ShopError, ShopResult};
use crate::model::{Order, OrderStatus, OrderWithItems, Role};
use crate::store::{OrderScope, OrderStore};

/// Admins see every order; sellers see orders that include one of their products.
pub async fn list_for<S>(store: &S, ctx: &AuthContext) -> ShopResult<Vec<OrderWithItems>>
where
  S: OrderStore + ?Sized,
{
  let scope = match ctx.role {
    Role::Admin => OrderScope::All,
    Role::Seller => OrderScope::Seller(ctx.user_id),
    Role::Customer => {
      return Err(AuthError::Forbidden(Capability::AdminOrSeller.denial_reason().to_string()).into())
    }
  };
  store.list_orders(scope).await
}

/// Sets `order_status` to any known status. No transition table is enforced.
#[instrument(name = "orders::set_status", skip(store, ctx), fields(actor = %ctx.user_id, role = %ctx.role), err(Display))]
pub async fn set_status<S>(store: &S, ctx: &AuthContext, order_id: Uuid, new_status: &str) -> ShopResult<Order>
where
  S: OrderStore + ?Sized,
{
  if !ctx.holds(Capability::AdminOrSeller) {
    return Err(AuthError::Forbidden(Capability::AdminOrSeller.denial_reason().to_string()).into());
  }

  let status: OrderStatus = new_status.parse()?;

  let order = store
    .update_order_status(order_id, status)
    .await?
    .ok_or_else(|| ShopError::not_found("Order not found"))?;

  info!(status = %order.order_status, "Order status updated.");
  Ok(order)
}
