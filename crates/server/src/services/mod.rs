//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Account registration and password login

pub mod auth;

pub use auth::{AuthError, AuthService};
