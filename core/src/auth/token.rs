// core/src/auth/token.rs

//! Signed session tokens carrying identity and role.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::error::{AuthError, ShopError, ShopResult};
use crate::model::Role;

/// Tokens are valid for one hour from issuance.
pub const TOKEN_TTL_SECS: i64 = 60 * 60;

/// JWT claims structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
  /// User id
  pub id: Uuid,
  pub role: Role,
  /// Issued at (Unix timestamp)
  pub iat: i64,
  /// Expiration (Unix timestamp)
  pub exp: i64,
}

/// Issues and verifies HS256 session tokens. Stateless: there is no revocation list.
pub struct TokenCodec {
  encoding_key: EncodingKey,
  decoding_key: DecodingKey,
  validation: Validation,
  ttl: Duration,
}

impl TokenCodec {
  pub fn new(secret: impl AsRef<[u8]>) -> Self {
    let secret = secret.as_ref();
    let mut validation = Validation::new(Algorithm::HS256);
    // Expiry is exact; a token one second past its window is rejected.
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp"]);

    TokenCodec {
      encoding_key: EncodingKey::from_secret(secret),
      decoding_key: DecodingKey::from_secret(secret),
      validation,
      ttl: Duration::seconds(TOKEN_TTL_SECS),
    }
  }

  pub fn issue(&self, user_id: Uuid, role: Role) -> ShopResult<String> {
    self.issue_at(user_id, role, Utc::now())
  }

  /// Issues a token as if minted at `issued_at`.
  #[instrument(name = "token_codec::issue", skip_all, fields(user_id = %user_id, role = %role))]
  pub fn issue_at(&self, user_id: Uuid, role: Role, issued_at: DateTime<Utc>) -> ShopResult<String> {
    let claims = Claims {
      id: user_id,
      role,
      iat: issued_at.timestamp(),
      exp: (issued_at + self.ttl).timestamp(),
    };

    encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
      .map_err(|e| ShopError::Internal(format!("Failed to generate token: {}", e)))
  }

  /// Checks signature, shape and expiry. Every failure collapses to `InvalidToken`.
  pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
    decode::<Claims>(token, &self.decoding_key, &self.validation)
      .map(|data| data.claims)
      .map_err(|e| {
        debug!(error = %e, "Token verification failed.");
        AuthError::InvalidToken
      })
  }
}

/// Extract bearer token from authorization header.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
  auth_header
    .strip_prefix("Bearer ")
    .map(str::trim)
    .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn codec() -> TokenCodec {
    TokenCodec::new("test-secret")
  }

  #[test]
  fn test_token_roundtrip() {
    let user_id = Uuid::new_v4();
    let token = codec().issue(user_id, Role::Seller).unwrap();

    let claims = codec().verify(&token).unwrap();
    assert_eq!(claims.id, user_id);
    assert_eq!(claims.role, Role::Seller);
    assert_eq!(claims.exp - claims.iat, TOKEN_TTL_SECS);
  }

  #[test]
  fn test_expired_token_rejected() {
    let issued = Utc::now() - Duration::seconds(TOKEN_TTL_SECS + 5);
    let token = codec().issue_at(Uuid::new_v4(), Role::Customer, issued).unwrap();
    assert_eq!(codec().verify(&token), Err(AuthError::InvalidToken));
  }

  #[test]
  fn test_token_still_valid_inside_window() {
    let issued = Utc::now() - Duration::seconds(TOKEN_TTL_SECS - 60);
    let token = codec().issue_at(Uuid::new_v4(), Role::Admin, issued).unwrap();
    assert!(codec().verify(&token).is_ok());
  }

  #[test]
  fn test_wrong_secret_rejected() {
    let token = TokenCodec::new("other-secret")
      .issue(Uuid::new_v4(), Role::Admin)
      .unwrap();
    assert_eq!(codec().verify(&token), Err(AuthError::InvalidToken));
  }

  #[test]
  fn test_garbage_rejected() {
    assert_eq!(codec().verify("not.a.jwt"), Err(AuthError::InvalidToken));
    assert_eq!(codec().verify(""), Err(AuthError::InvalidToken));
  }

  #[test]
  fn test_extract_bearer_token() {
    assert_eq!(extract_bearer_token("Bearer abc.def"), Some("abc.def"));
    assert_eq!(extract_bearer_token("Bearer "), None);
    assert_eq!(extract_bearer_token("Token abc"), None);
  }
}
