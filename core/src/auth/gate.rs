// core/src/auth/gate.rs

//! Role-based authorization.
//!
//! A [`RoleGate`] is a chain of [`Capability`] requirements. Every requirement is evaluated
//! against the caller's actual role and the results are combined with AND. Disjunctions
//! such as "admin or seller" are a single capability, so they are never split across two
//! independently short-circuiting checks.

use serde::Serialize;
use uuid::Uuid;

use crate::auth::token::Claims;
use crate::error::AuthError;
use crate::model::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Capability {
  AnyAuthenticated,
  AdminOnly,
  SellerOnly,
  CustomerOnly,
  AdminOrSeller,
}

impl Capability {
  pub fn permits(&self, role: Role) -> bool {
    match self {
      Capability::AnyAuthenticated => true,
      Capability::AdminOnly => role == Role::Admin,
      Capability::SellerOnly => role == Role::Seller,
      Capability::CustomerOnly => role == Role::Customer,
      Capability::AdminOrSeller => role == Role::Admin || role == Role::Seller,
    }
  }

  pub fn denial_reason(&self) -> &'static str {
    match self {
      Capability::AnyAuthenticated => "Access Denied",
      Capability::AdminOnly => "Access Denied: Admins Only",
      Capability::SellerOnly => "Access Denied: Sellers Only",
      Capability::CustomerOnly => "Access Denied: Customers Only",
      Capability::AdminOrSeller => "Access Denied: Admins or Sellers Only",
    }
  }
}

/// Outcome of evaluating a gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
  Allow,
  Deny { failed: Capability },
}

impl Decision {
  pub fn is_allowed(&self) -> bool {
    matches!(self, Decision::Allow)
  }
}

/// The verified caller, as decoded from a session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
  pub user_id: Uuid,
  pub role: Role,
}

impl From<Claims> for Principal {
  fn from(claims: Claims) -> Self {
    Principal {
      user_id: claims.id,
      role: claims.role,
    }
  }
}

/// Immutable proof that a principal passed a gate. Handlers receive this, never the raw request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthContext {
  pub user_id: Uuid,
  pub role: Role,
}

impl AuthContext {
  pub fn holds(&self, capability: Capability) -> bool {
    capability.permits(self.role)
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleGate {
  requirements: Vec<Capability>,
}

impl RoleGate {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn require(mut self, capability: Capability) -> Self {
    self.requirements.push(capability);
    self
  }

  pub fn requirements(&self) -> &[Capability] {
    &self.requirements
  }

  /// Evaluates every requirement against `role`; the first failing one is reported.
  pub fn decide(&self, role: Role) -> Decision {
    match self.requirements.iter().find(|cap| !cap.permits(role)) {
      Some(failed) => Decision::Deny { failed: *failed },
      None => Decision::Allow,
    }
  }

  pub fn authorize(&self, principal: &Principal) -> Result<AuthContext, AuthError> {
    match self.decide(principal.role) {
      Decision::Allow => Ok(AuthContext {
        user_id: principal.user_id,
        role: principal.role,
      }),
      Decision::Deny { failed } => {
        tracing::debug!(
          user_id = %principal.user_id,
          role = %principal.role,
          capability = ?failed,
          "Role gate denied request."
        );
        Err(AuthError::Forbidden(failed.denial_reason().to_string()))
      }
    }
  }
}
