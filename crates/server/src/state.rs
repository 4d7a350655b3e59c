//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::Config;
use crate::notion::{NotionClient, NotionError};
use crate::store::{GeofenceRepository, LocationRepository, SettingsRepository, UserRepository};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration and the document store client.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    notion: NotionClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the store client cannot be built from the
    /// configured token and API version.
    pub fn new(config: Config) -> Result<Self, NotionError> {
        let notion = NotionClient::new(&config.notion)?;

        Ok(Self {
            inner: Arc::new(AppStateInner { config, notion }),
        })
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get a reference to the document store client.
    #[must_use]
    pub fn notion(&self) -> &NotionClient {
        &self.inner.notion
    }

    /// Repository over the users database.
    #[must_use]
    pub fn users(&self) -> UserRepository<'_> {
        UserRepository::new(&self.inner.notion, &self.inner.config.notion.users_db)
    }

    /// Repository over the locations database.
    #[must_use]
    pub fn locations(&self) -> LocationRepository<'_> {
        LocationRepository::new(&self.inner.notion, &self.inner.config.notion.locations_db)
    }

    /// Repository over the geofences database, if configured.
    #[must_use]
    pub fn geofences(&self) -> GeofenceRepository<'_> {
        GeofenceRepository::new(
            &self.inner.notion,
            self.inner.config.notion.geofences_db.as_deref(),
        )
    }

    /// Repository over the settings database, if configured.
    #[must_use]
    pub fn settings(&self) -> SettingsRepository<'_> {
        SettingsRepository::new(
            &self.inner.notion,
            self.inner.config.notion.settings_db.as_deref(),
        )
    }
}
