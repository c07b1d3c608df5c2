// core/src/auth/mod.rs

//! Authentication (tokens, passwords) and role-based authorization.

pub mod credentials;
pub mod gate;
pub mod token;

pub use gate::{AuthContext, Capability, Decision, Principal, RoleGate};
pub use token::{extract_bearer_token, Claims, TokenCodec, TOKEN_TTL_SECS};
