//! Identity client seam
//!
//! The OIDC protocol itself (authorization-code exchange, state and nonce
//! validation, redirect construction) lives behind [`IdentityClient`]. This crate
//! only drives it and records the outcome.

pub mod client;
pub mod config;
pub mod error;

pub use client::IdentityClient;
pub use config::IdentityClientConfig;
pub use error::IdentityError;
