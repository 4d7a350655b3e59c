//! Location log domain types.

use chrono::{DateTime, Utc};

/// A stored location log entry.
///
/// Text fields default to `"N/A"` and coordinates to `0.0` when the stored
/// document omits them, so history views and exports never need to handle
/// missing columns.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationRecord {
    /// When the location was logged (UTC).
    pub timestamp: DateTime<Utc>,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Client IP at submission time.
    pub ip_address: String,
    /// Battery level as reported by the device (free text, e.g. `"87%"`).
    pub battery: String,
    /// Device description as reported by the client.
    pub device_info: String,
}

/// A location submission about to be written.
///
/// Mirrors what the tracking client sends: coordinates and device details are
/// all optional, the IP is filled in server-side.
#[derive(Debug, Clone, Default)]
pub struct NewLocation {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub ip_address: String,
    pub battery: Option<String>,
    pub device_info: Option<String>,
}
