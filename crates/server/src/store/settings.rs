//! App settings repository.
//!
//! Settings are `Setting` title / `Value` rich text pairs in an optional
//! database. Reads degrade to defaults when the database is unconfigured;
//! writes do not, so the admin toggle reports the misconfiguration instead
//! of silently dropping it.

use tracing::instrument;

use super::StoreError;
use crate::notion::{NotionClient, Page, QueryRequest, props, title_equals};

const PROP_SETTING: &str = "Setting";
const PROP_VALUE: &str = "Value";

/// Name of the row controlling open registration.
const SIGNUP_SETTING: &str = "SignUpEnabled";

/// Repository for app setting reads and writes.
pub struct SettingsRepository<'a> {
    client: &'a NotionClient,
    database_id: Option<&'a str>,
}

impl<'a> SettingsRepository<'a> {
    /// Create a new settings repository.
    ///
    /// Pass `None` when no settings database is configured.
    #[must_use]
    pub const fn new(client: &'a NotionClient, database_id: Option<&'a str>) -> Self {
        Self {
            client,
            database_id,
        }
    }

    /// Whether sign-up is currently open.
    ///
    /// Defaults to enabled: a missing database, a missing row, and an unset
    /// value all mean sign-up stays open.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Api` if the query fails.
    pub async fn signup_enabled(&self) -> Result<bool, StoreError> {
        let Some(database_id) = self.database_id else {
            return Ok(true);
        };

        let value = self
            .find_setting(database_id, SIGNUP_SETTING)
            .await?
            .and_then(|page| props::extract_rich_text(&page.properties, PROP_VALUE));
        Ok(parse_enabled(value.as_deref()))
    }

    /// Set the sign-up flag.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable` if the settings database is not
    /// configured or the `SignUpEnabled` row does not exist.
    /// Returns `StoreError::Api` if a store call fails.
    #[instrument(skip(self))]
    pub async fn set_signup_enabled(&self, enabled: bool) -> Result<(), StoreError> {
        let Some(database_id) = self.database_id else {
            return Err(StoreError::Unavailable(
                "settings database is not configured",
            ));
        };

        let Some(page) = self.find_setting(database_id, SIGNUP_SETTING).await? else {
            return Err(StoreError::Unavailable(
                "the SignUpEnabled settings row is missing",
            ));
        };

        let mut properties = serde_json::Map::new();
        properties.insert(
            PROP_VALUE.to_string(),
            props::rich_text(if enabled { "true" } else { "false" }),
        );
        self.client.update_page(&page.id, properties).await?;
        Ok(())
    }

    /// Find a setting row by name.
    async fn find_setting(
        &self,
        database_id: &str,
        name: &str,
    ) -> Result<Option<Page>, StoreError> {
        let request = QueryRequest {
            filter: Some(title_equals(PROP_SETTING, name)),
            page_size: Some(1),
            ..Default::default()
        };
        let response = self.client.query_database(database_id, &request).await?;
        Ok(response.results.into_iter().next())
    }
}

/// Interpret a stored flag value; anything but `"true"` disables, absence enables.
fn parse_enabled(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.eq_ignore_ascii_case("true"))
}
