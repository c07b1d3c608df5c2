// src/lib.rs

//! Storefront: the domain core of a small multi-role e-commerce backend.
//!
//! Customers browse products, hold a cart and check out; sellers manage their own
//! products and follow orders; admins oversee everything. This crate provides:
//!  - Signed session tokens ([`TokenCodec`]) and role gates ([`RoleGate`]).
//!  - Storage traits with PostgreSQL and in-memory implementations.
//!  - The services behind every endpoint, including the transactional checkout that turns
//!    a cart into an order exactly once.
//!
//! The HTTP surface lives in the `storefront_server` crate.

pub mod auth;
pub mod error;
pub mod model;
pub mod service;
pub mod store;
pub mod validation;

// --- Re-exports for the Public API ---

pub use crate::auth::{AuthContext, Capability, Claims, Decision, Principal, RoleGate, TokenCodec};
pub use crate::error::{AuthError, FieldError, ShopError, ShopResult, ValidationError};
pub use crate::model::{Order, OrderStatus, Product, Role, User};
pub use crate::store::{MemoryStore, PgStore, Store};
