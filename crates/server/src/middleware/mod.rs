//! HTTP middleware stack.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Session layer (tower-sessions, in-memory store)

pub mod ajax;
pub mod auth;
pub mod client_ip;
pub mod session;

pub use ajax::RequireXhr;
pub use auth::{RequireAdmin, RequireUser, clear_session_user, set_session_user};
pub use client_ip::client_ip;
pub use session::create_session_layer;
