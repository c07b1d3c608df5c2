// core/src/service/accounts.rs

//! Registration and login.

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::auth::credentials::{hash_password, verify_password};
use crate::auth::TokenCodec;
use crate::error::{AuthError, FieldError, ShopResult, ValidationError};
use crate::model::{NewUser, PublicUser, Role};
use crate::store::UserStore;
use crate::validation;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Registration {
  #[validate(custom(function = "crate::validation::name_present"))]
  pub name: String,
  #[validate(email(message = "Valid email is required"))]
  pub email: String,
  #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
  pub password: String,
  pub role: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Login {
  #[validate(email(message = "Valid email is required"))]
  pub email: String,
  #[validate(length(min = 1, message = "Password is required"))]
  pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisteredAccount {
  pub token: String,
  pub user: PublicUser,
}

fn normalize_email(email: &str) -> String {
  email.trim().to_ascii_lowercase()
}

#[instrument(name = "accounts::register", skip(store, codec, registration), fields(email = %registration.email))]
pub async fn register<S>(store: &S, codec: &TokenCodec, mut registration: Registration) -> ShopResult<RegisteredAccount>
where
  S: UserStore + ?Sized,
{
  registration.email = normalize_email(&registration.email);
  validation::check(&registration, &["name", "email", "password"])?;

  let role = match registration.role.as_deref() {
    None | Some("") => Role::default(),
    Some(raw) => raw
      .parse::<Role>()
      .map_err(|msg| ValidationError::from_fields(vec![FieldError::new("role", msg)]))?,
  };

  let email = registration.email;
  if store.find_user_by_email(&email).await?.is_some() {
    return Err(ValidationError::UserExists.into());
  }

  let user = store
    .insert_user(NewUser {
      name: registration.name.trim().to_string(),
      email,
      password_hash: hash_password(&registration.password)?,
      role,
    })
    .await?;

  let token = codec.issue(user.id, user.role)?;
  info!(user_id = %user.id, role = %user.role, "User registered.");
  Ok(RegisteredAccount {
    token,
    user: user.public(),
  })
}

#[instrument(name = "accounts::login", skip(store, codec, login), fields(email = %login.email))]
pub async fn login<S>(store: &S, codec: &TokenCodec, mut login: Login) -> ShopResult<String>
where
  S: UserStore + ?Sized,
{
  login.email = normalize_email(&login.email);
  validation::check(&login, &["email", "password"])?;

  let user = match store.find_user_by_email(&login.email).await? {
    Some(user) => user,
    None => {
      warn!("Login failed: unknown email.");
      return Err(AuthError::InvalidCredentials.into());
    }
  };

  if !verify_password(&user.password_hash, &login.password)? {
    warn!(user_id = %user.id, "Login failed: password mismatch.");
    return Err(AuthError::InvalidCredentials.into());
  }

  info!(user_id = %user.id, "Login successful.");
  codec.issue(user.id, user.role)
}
