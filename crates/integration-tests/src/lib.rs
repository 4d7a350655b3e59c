//! Integration tests for LocSent.
//!
//! The tests in `tests/` exercise a running server over HTTP, including the
//! remote document store behind it, so they are all `#[ignore]`d by default.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the server against a test store
//! cargo run -p locsent-server
//!
//! # Run integration tests
//! cargo test -p locsent-integration-tests -- --ignored
//! ```
//!
//! # Environment
//!
//! - `LOCSENT_BASE_URL` - server under test (default `http://localhost:3000`)
//! - `LOCSENT_TEST_ADMIN_USERNAME` / `LOCSENT_TEST_ADMIN_PASSWORD` - an
//!   existing Admin account in the test store, needed by the admin tests
//!
//! The signup flag must be enabled in the test store; the auth tests create
//! throwaway accounts with random usernames.
//!
//! # Test Categories
//!
//! - `auth_flow` - signup, login, session, logout
//! - `location_tracking` - point submission
//! - `admin_dashboard` - admin queries, exports, stats guards
//! - `health` - liveness and readiness probes
