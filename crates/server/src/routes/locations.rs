//! Location submission route handler.
//!
//! The tracking client posts a point here on a timer. The handler stores it,
//! then evaluates the configured geofence zones and folds any alert into the
//! response message.

use std::net::SocketAddr;

use axum::{
    Json,
    extract::{ConnectInfo, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::geo;
use crate::middleware::{RequireUser, client_ip};
use crate::models::NewLocation;
use crate::state::AppState;

/// Location submission body, as sent by the tracking client.
#[derive(Debug, Deserialize)]
pub struct SendLocationRequest {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub battery: Option<String>,
    #[serde(rename = "deviceInfo")]
    pub device_info: Option<String>,
}

/// Submission outcome. `message` carries the geofence alert when one fired.
#[derive(Debug, Serialize)]
pub struct SendLocationResponse {
    pub status: &'static str,
    pub message: String,
}

/// Record a location point for the logged-in user.
///
/// The client IP comes from the first `X-Forwarded-For` entry when present,
/// else the socket peer address. A zone match is reported in the response;
/// a zone lookup failure only suppresses the alert, the point is already
/// stored by then.
pub async fn send_location(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    ConnectInfo(remote_addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(body): Json<SendLocationRequest>,
) -> Response {
    let ip = client_ip(&headers, remote_addr);
    let location = NewLocation {
        latitude: body.latitude,
        longitude: body.longitude,
        ip_address: ip.to_string(),
        battery: body.battery,
        device_info: body.device_info,
    };

    if let Err(e) = state.locations().append(&user.page_id, &location).await {
        let event_id = sentry::capture_error(&e);
        tracing::error!(
            error = %e,
            sentry_event_id = %event_id,
            user_id = %user.id,
            "failed to log location"
        );
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(SendLocationResponse {
                status: "error",
                message: "Failed to log location. Check server logs.".to_string(),
            }),
        )
            .into_response();
    }

    let mut message = "Location logged successfully!".to_string();
    if let (Some(lat), Some(lon)) = (location.latitude, location.longitude) {
        match state.geofences().list().await {
            Ok(zones) => {
                if let Some(zone) = geo::find_containing_zone(lat, lon, &zones) {
                    tracing::info!(
                        user_id = %user.id,
                        zone = %zone.name,
                        "geofence alert"
                    );
                    message = format!(
                        "GEOFENCE ALERT: User '{}' is inside the '{}' zone.",
                        user.username, zone.name
                    );
                }
            }
            Err(e) => {
                tracing::warn!("geofence lookup failed: {e}");
            }
        }
    }

    (
        StatusCode::OK,
        Json(SendLocationResponse {
            status: "success",
            message,
        }),
    )
        .into_response()
}
