//! Session-related types.
//!
//! Types stored in the session for authentication state.

use locsent_core::{PageId, Role, UserId, Username};
use serde::{Deserialize, Serialize};

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the logged-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUser {
    /// User's application-level ID.
    pub id: UserId,
    /// User's document ID in the store.
    pub page_id: PageId,
    /// Login name, used in geofence alerts and exports.
    pub username: Username,
    /// Permission level at login time.
    pub role: Role,
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";
}
