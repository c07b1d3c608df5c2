// server/src/web/extractors.rs

//! Request guards.
//!
//! The bearer token is verified first, then `Authorized<R>` runs the role gate named by `R`
//! on the resulting `Principal` and hands the handler an immutable `AuthContext`. Handlers
//! never see a request that failed either step.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};
use std::marker::PhantomData;
use std::ops::Deref;
use storefront::auth::extract_bearer_token;
use storefront::{AuthContext, AuthError, Capability, Principal, RoleGate};
use tracing::debug;

use crate::errors::AppError;
use crate::state::AppState;

fn principal_from(req: &HttpRequest) -> Result<Principal, AppError> {
  let state = req
    .app_data::<web::Data<AppState>>()
    .ok_or_else(|| AppError::Config("Application state is not registered".to_string()))?;

  let header = match req.headers().get(AUTHORIZATION) {
    Some(value) => value,
    None => return Err(AuthError::MissingToken.into()),
  };

  let token = header
    .to_str()
    .ok()
    .and_then(extract_bearer_token)
    .ok_or_else(|| {
      debug!("Authorization header is not a bearer token.");
      AuthError::InvalidToken
    })?;

  let claims = state.tokens.verify(token)?;
  Ok(Principal::from(claims))
}

/// A named gate for [`Authorized`].
pub trait Requirement {
  fn gate() -> RoleGate;
}

pub struct AnyRole;
pub struct AdminOnly;
pub struct SellerOnly;
pub struct CustomerOnly;
pub struct AdminOrSeller;

impl Requirement for AnyRole {
  fn gate() -> RoleGate {
    RoleGate::new().require(Capability::AnyAuthenticated)
  }
}

impl Requirement for AdminOnly {
  fn gate() -> RoleGate {
    RoleGate::new().require(Capability::AdminOnly)
  }
}

impl Requirement for SellerOnly {
  fn gate() -> RoleGate {
    RoleGate::new()
      .require(Capability::AdminOrSeller)
      .require(Capability::SellerOnly)
  }
}

impl Requirement for CustomerOnly {
  fn gate() -> RoleGate {
    RoleGate::new().require(Capability::CustomerOnly)
  }
}

impl Requirement for AdminOrSeller {
  fn gate() -> RoleGate {
    RoleGate::new().require(Capability::AdminOrSeller)
  }
}

/// A caller that passed the gate of `R`.
pub struct Authorized<R> {
  ctx: AuthContext,
  _requirement: PhantomData<R>,
}

impl<R> Authorized<R> {
  pub fn context(&self) -> &AuthContext {
    &self.ctx
  }
}

impl<R> Deref for Authorized<R> {
  type Target = AuthContext;

  fn deref(&self) -> &AuthContext {
    &self.ctx
  }
}

impl<R: Requirement> FromRequest for Authorized<R> {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
    let result = principal_from(req).and_then(|principal| {
      R::gate()
        .authorize(&principal)
        .map(|ctx| Authorized {
          ctx,
          _requirement: PhantomData,
        })
        .map_err(AppError::from)
    });
    ready(result)
  }
}
