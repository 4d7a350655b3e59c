//! Location log repository.
//!
//! Logs are append-only: one page per submission, related to the owning user
//! by page ID. Nothing here updates or archives a log.

use chrono::{DateTime, Utc};
use locsent_core::{LogId, PageId};
use serde_json::{Map, Value};
use tracing::instrument;

use super::StoreError;
use crate::models::{LocationRecord, NewLocation};
use crate::notion::{NotionClient, Page, QueryRequest, Sort, props, relation_contains};

const PROP_LOG_ID: &str = "LogID";
const PROP_USER: &str = "User";
const PROP_TIMESTAMP: &str = "Timestamp";
const PROP_LATITUDE: &str = "Latitude";
const PROP_LONGITUDE: &str = "Longitude";
const PROP_IP_ADDRESS: &str = "IPAddress";
const PROP_BATTERY: &str = "Battery";
const PROP_DEVICE_INFO: &str = "DeviceInfo";

/// Placeholder written when the client omits a text field.
const NOT_AVAILABLE: &str = "N/A";

/// The store caps query page sizes at 100.
const MAX_PAGE_SIZE: u32 = 100;

/// Repository for location log operations.
pub struct LocationRepository<'a> {
    client: &'a NotionClient,
    database_id: &'a str,
}

impl<'a> LocationRepository<'a> {
    /// Create a new location repository.
    #[must_use]
    pub const fn new(client: &'a NotionClient, database_id: &'a str) -> Self {
        Self {
            client,
            database_id,
        }
    }

    /// Append a location log for a user, stamped with the current time.
    ///
    /// Missing coordinates are stored as `0.0`, missing text fields as
    /// `"N/A"`, so every log page carries the full column set.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Api` if the page creation fails.
    #[instrument(skip(self, location), fields(user_page = %user_page))]
    pub async fn append(
        &self,
        user_page: &PageId,
        location: &NewLocation,
    ) -> Result<(), StoreError> {
        let now = Utc::now();
        let properties = build_properties(user_page, now, location);
        self.client.create_page(self.database_id, properties).await?;
        Ok(())
    }

    /// The most recent logs for a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Api` if the query fails.
    pub async fn history(
        &self,
        user_page: &PageId,
        limit: u32,
    ) -> Result<Vec<LocationRecord>, StoreError> {
        let request = QueryRequest {
            filter: Some(relation_contains(PROP_USER, user_page)),
            sorts: vec![Sort::descending(PROP_TIMESTAMP)],
            page_size: Some(limit.min(MAX_PAGE_SIZE)),
            ..Default::default()
        };
        let response = self.client.query_database(self.database_id, &request).await?;
        Ok(build_records(&response.results))
    }

    /// Every log for a user, newest first, following pagination.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Api` if any query page fails.
    #[instrument(skip(self), fields(user_page = %user_page))]
    pub async fn full_history(
        &self,
        user_page: &PageId,
    ) -> Result<Vec<LocationRecord>, StoreError> {
        let request = QueryRequest {
            filter: Some(relation_contains(PROP_USER, user_page)),
            sorts: vec![Sort::descending(PROP_TIMESTAMP)],
            page_size: Some(MAX_PAGE_SIZE),
            ..Default::default()
        };
        let pages = self.client.query_database_all(self.database_id, request).await?;
        Ok(build_records(&pages))
    }

    /// The single most recent log for a user, if any.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Api` if the query fails.
    pub async fn latest_for_user(
        &self,
        user_page: &PageId,
    ) -> Result<Option<LocationRecord>, StoreError> {
        Ok(self.history(user_page, 1).await?.into_iter().next())
    }
}

/// Build the property map for a new log page.
fn build_properties(
    user_page: &PageId,
    now: DateTime<Utc>,
    location: &NewLocation,
) -> Map<String, Value> {
    let log_id = LogId::from_page_and_timestamp(user_page, now.timestamp());

    let mut properties = Map::new();
    properties.insert(PROP_LOG_ID.to_string(), props::title(log_id.as_str()));
    properties.insert(PROP_USER.to_string(), props::relation(user_page));
    properties.insert(PROP_TIMESTAMP.to_string(), props::date(now));
    properties.insert(
        PROP_LATITUDE.to_string(),
        props::number(location.latitude.unwrap_or(0.0)),
    );
    properties.insert(
        PROP_LONGITUDE.to_string(),
        props::number(location.longitude.unwrap_or(0.0)),
    );
    properties.insert(
        PROP_IP_ADDRESS.to_string(),
        props::rich_text(&location.ip_address),
    );
    properties.insert(
        PROP_BATTERY.to_string(),
        props::rich_text(location.battery.as_deref().unwrap_or(NOT_AVAILABLE)),
    );
    properties.insert(
        PROP_DEVICE_INFO.to_string(),
        props::rich_text(location.device_info.as_deref().unwrap_or(NOT_AVAILABLE)),
    );
    properties
}

/// Build records from query results, skipping pages without a usable timestamp.
fn build_records(pages: &[Page]) -> Vec<LocationRecord> {
    let mut records = Vec::with_capacity(pages.len());
    for page in pages {
        match build_record(page) {
            Some(record) => records.push(record),
            None => {
                tracing::warn!(page_id = %page.id, "skipping log page without a valid Timestamp");
            }
        }
    }
    records
}

/// Build a single record; `None` when the timestamp is missing or unparseable.
fn build_record(page: &Page) -> Option<LocationRecord> {
    let props = &page.properties;
    let timestamp = props::extract_date(props, PROP_TIMESTAMP)?;

    Some(LocationRecord {
        timestamp,
        latitude: props::extract_number(props, PROP_LATITUDE).unwrap_or(0.0),
        longitude: props::extract_number(props, PROP_LONGITUDE).unwrap_or(0.0),
        ip_address: props::extract_rich_text(props, PROP_IP_ADDRESS)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        battery: props::extract_rich_text(props, PROP_BATTERY)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        device_info: props::extract_rich_text(props, PROP_DEVICE_INFO)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
    })
}
