//! Admin route handlers.
//!
//! Account management and the dashboard queries behind the admin map view.
//! Every handler requires the Admin role via [`RequireAdmin`].

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::{DateTime, Utc};
use locsent_core::{PageId, Username};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::AppError;
use crate::middleware::RequireAdmin;
use crate::models::LocationRecord;
use crate::routes::auth::UserView;
use crate::state::AppState;

/// History entries returned when the query does not name a limit.
const DEFAULT_HISTORY_LIMIT: u32 = 10;

// =============================================================================
// Request / Response Types
// =============================================================================

/// Outcome of a state-changing admin action.
#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub status: &'static str,
    pub message: String,
}

/// Outcome of flipping the signup flag.
#[derive(Debug, Serialize)]
pub struct ToggleSignupResponse {
    pub status: &'static str,
    pub signup_enabled: bool,
    pub message: String,
}

/// Latest known position of one tracked user.
#[derive(Debug, Serialize)]
pub struct LatestLocationView {
    pub username: Username,
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: DateTime<Utc>,
    pub battery: String,
}

/// One row of a user's location history.
///
/// Device info is deliberately absent; the history panel never shows it and
/// the full export covers it instead.
#[derive(Debug, Serialize)]
pub struct HistoryEntryView {
    pub timestamp: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub ip_address: String,
    pub battery: String,
}

impl From<LocationRecord> for HistoryEntryView {
    fn from(record: LocationRecord) -> Self {
        Self {
            timestamp: record.timestamp,
            latitude: record.latitude,
            longitude: record.longitude,
            ip_address: record.ip_address,
            battery: record.battery,
        }
    }
}

/// Query parameters for the history endpoint.
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<u32>,
}

// =============================================================================
// Handlers
// =============================================================================

/// List every account, admins included.
///
/// # Errors
///
/// Returns 500 when the users database cannot be queried.
pub async fn list_users(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<UserView>>, AppError> {
    let users = state.users().list_all().await?;
    Ok(Json(users.iter().map(UserView::from).collect()))
}

/// Archive a user's page, removing the account.
///
/// The user's location records stay behind; only the account document is
/// archived. An open session for the account dies at the next `/auth/me`
/// re-validation.
///
/// # Errors
///
/// Returns 404 when no such page exists.
#[instrument(skip(state))]
pub async fn delete_user(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(page_id): Path<PageId>,
) -> Result<Json<ActionResponse>, AppError> {
    state.users().archive(&page_id).await?;

    Ok(Json(ActionResponse {
        status: "success",
        message: "User successfully deleted.".to_string(),
    }))
}

/// Flip the signup flag and report the new value.
///
/// # Errors
///
/// Returns 503 when the settings database is not configured or the flag row
/// is missing.
#[instrument(skip(state))]
pub async fn toggle_signup(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<ToggleSignupResponse>, AppError> {
    let settings = state.settings();
    let enabled = !settings.signup_enabled().await?;
    settings.set_signup_enabled(enabled).await?;

    let state_word = if enabled { "enabled" } else { "disabled" };
    Ok(Json(ToggleSignupResponse {
        status: "success",
        signup_enabled: enabled,
        message: format!("User sign-up has been {state_word}."),
    }))
}

/// Latest location per tracked user, for the live map.
///
/// Admin accounts are not tracked and are left out. Users with no records
/// yet are skipped, as are users whose latest record cannot be fetched.
///
/// # Errors
///
/// Returns 500 when the user list itself cannot be fetched.
pub async fn latest_locations(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<LatestLocationView>>, AppError> {
    let users = state.users().list_all().await?;
    let locations = state.locations();

    let mut latest = Vec::new();
    for user in users.into_iter().filter(|u| !u.role.is_admin()) {
        match locations.latest_for_user(&user.page_id).await {
            Ok(Some(record)) => latest.push(LatestLocationView {
                username: user.username,
                latitude: record.latitude,
                longitude: record.longitude,
                timestamp: record.timestamp,
                battery: record.battery,
            }),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(user_id = %user.id, "skipping user in latest locations: {e}");
            }
        }
    }

    Ok(Json(latest))
}

/// Recent location history for one user, newest first.
///
/// # Errors
///
/// Returns 500 when the locations database cannot be queried.
pub async fn location_history(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(page_id): Path<PageId>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<HistoryEntryView>>, AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    let records = state.locations().history(&page_id, limit).await?;

    Ok(Json(records.into_iter().map(HistoryEntryView::from).collect()))
}
