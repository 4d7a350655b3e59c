//! Dashboard stats route handlers.
//!
//! Small aggregate endpoints polled by the dashboard. The count endpoints
//! additionally require the `X-Requested-With: XMLHttpRequest` header so
//! plain link-following does not hit them.

use axum::{Json, extract::State};
use serde::Serialize;

use crate::error::AppError;
use crate::geo::Zone;
use crate::middleware::{RequireUser, RequireXhr};
use crate::state::AppState;

/// A bare count.
#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: usize,
}

/// Count of tracked (non-admin) accounts.
///
/// # Errors
///
/// Returns 500 when the users database cannot be queried.
pub async fn active_users_count(
    RequireUser(_user): RequireUser,
    _xhr: RequireXhr,
    State(state): State<AppState>,
) -> Result<Json<CountResponse>, AppError> {
    let users = state.users().list_all().await?;
    let count = users.iter().filter(|u| !u.role.is_admin()).count();

    Ok(Json(CountResponse { count }))
}

/// Count of configured geofence zones. Zero when no zones database is
/// configured.
///
/// # Errors
///
/// Returns 500 when the zones database cannot be queried.
pub async fn geofence_count(
    RequireUser(_user): RequireUser,
    _xhr: RequireXhr,
    State(state): State<AppState>,
) -> Result<Json<CountResponse>, AppError> {
    let zones = state.geofences().list().await?;

    Ok(Json(CountResponse { count: zones.len() }))
}

/// Zone list for the map overlay.
///
/// # Errors
///
/// Returns 500 when the zones database cannot be queried.
pub async fn get_geofences(
    RequireUser(_user): RequireUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Zone>>, AppError> {
    let zones = state.geofences().list().await?;

    Ok(Json(zones))
}
