//! HTTP route handlers for the location service.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (probes the document store)
//!
//! # Auth
//! POST /auth/signup            - Create an account
//! POST /auth/login             - Verify credentials, establish session
//! POST /auth/logout            - Clear session
//! GET  /auth/me                - Current session's user
//!
//! # User (requires auth)
//! POST /user/send_location     - Record a location point, evaluate geofences
//!
//! # Admin (requires Admin role)
//! GET  /admin/users                            - List all accounts
//! POST /admin/delete_user/{page_id}            - Archive an account
//! POST /admin/toggle_signup                    - Flip the signup flag
//! GET  /admin/api/get_all_latest_locations     - Latest record per user
//! GET  /admin/get_location_history/{page_id}   - Recent history for one user
//! GET  /admin/export_logs/{page_id}/{username}/{format} - Full history download
//!
//! # Stats (require X-Requested-With: XMLHttpRequest)
//! GET  /api/get_active_users_count - Count of user accounts
//! GET  /api/get_geofence_count     - Count of configured zones
//! GET  /api/get_geofences          - Zone list for map display (requires auth)
//! ```

pub mod admin;
pub mod auth;
pub mod export;
pub mod locations;
pub mod stats;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

/// Create the authenticated user routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new().route("/send_location", post(locations::send_location))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(admin::list_users))
        .route("/delete_user/{page_id}", post(admin::delete_user))
        .route("/toggle_signup", post(admin::toggle_signup))
        .route(
            "/api/get_all_latest_locations",
            get(admin::latest_locations),
        )
        .route(
            "/get_location_history/{page_id}",
            get(admin::location_history),
        )
        .route(
            "/export_logs/{page_id}/{username}/{format}",
            get(export::export_logs),
        )
}

/// Create the stats API routes router.
pub fn stats_routes() -> Router<AppState> {
    Router::new()
        .route("/get_active_users_count", get(stats::active_users_count))
        .route("/get_geofence_count", get(stats::geofence_count))
        .route("/get_geofences", get(stats::get_geofences))
}

/// Compose all application routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/user", user_routes())
        .nest("/admin", admin_routes())
        .nest("/api", stats_routes())
}
