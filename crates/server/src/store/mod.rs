//! Store operations for the Notion-backed databases.
//!
//! Every repository here wraps one database in the remote document store.
//! There is no local persistence: a query per read, a page write per mutation.
//!
//! ## Databases
//!
//! - `users` - accounts (`UserID`, `Username`, `PasswordHash`, `Role`)
//! - `locations` - append-only location logs, one page per submission
//! - `geofences` - alert zones (optional; alerts disabled when unconfigured)
//! - `settings` - app flags such as `SignUpEnabled` (optional)
//!
//! Deletion is always archival. Archived pages drop out of query results but
//! stay recoverable in the store's own UI.

pub mod geofences;
pub mod locations;
pub mod settings;
pub mod users;

pub use geofences::GeofenceRepository;
pub use locations::LocationRepository;
pub use settings::SettingsRepository;
pub use users::UserRepository;

use thiserror::Error;

use crate::notion::NotionError;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The remote document store call failed.
    #[error("store API error: {0}")]
    Api(#[from] NotionError),

    /// Data in the store is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate username).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// The backing database for this feature is not configured.
    #[error("unavailable: {0}")]
    Unavailable(&'static str),
}
