// core/src/service/mod.rs

//! Storefront operations. Each takes a store and, where the caller matters, the
//! [`AuthContext`](crate::auth::AuthContext) produced by the role gate.

pub mod accounts;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod orders;

pub use cart::CartAggregator;
pub use checkout::{place_order, CheckoutReceipt};
