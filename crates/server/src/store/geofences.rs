//! Geofence zone repository.
//!
//! The geofences database is optional. When it is not configured the
//! repository reports no zones, which disables alerts without erroring.

use tracing::instrument;

use super::StoreError;
use crate::geo::Zone;
use crate::notion::{NotionClient, Page, QueryRequest, props};

const PROP_NAME: &str = "Name";
const PROP_LATITUDE: &str = "Latitude";
const PROP_LONGITUDE: &str = "Longitude";
const PROP_RADIUS: &str = "Radius";

/// Repository for geofence zone reads.
pub struct GeofenceRepository<'a> {
    client: &'a NotionClient,
    database_id: Option<&'a str>,
}

impl<'a> GeofenceRepository<'a> {
    /// Create a new geofence repository.
    ///
    /// Pass `None` when no geofences database is configured.
    #[must_use]
    pub const fn new(client: &'a NotionClient, database_id: Option<&'a str>) -> Self {
        Self {
            client,
            database_id,
        }
    }

    /// All zones in store order. Empty when no database is configured.
    ///
    /// Order is preserved because overlapping zones resolve to the first
    /// match. Zones missing a coordinate or radius are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Api` if the query fails.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Zone>, StoreError> {
        let Some(database_id) = self.database_id else {
            return Ok(Vec::new());
        };

        let pages = self
            .client
            .query_database_all(database_id, QueryRequest::default())
            .await?;

        let mut zones = Vec::with_capacity(pages.len());
        for page in &pages {
            match build_zone(page) {
                Some(zone) => zones.push(zone),
                None => {
                    tracing::warn!(page_id = %page.id, "skipping incomplete geofence page");
                }
            }
        }
        Ok(zones)
    }
}

/// Build a zone; `None` when the name, a coordinate, or the radius is missing.
fn build_zone(page: &Page) -> Option<Zone> {
    let props = &page.properties;
    Some(Zone {
        name: props::extract_title(props, PROP_NAME)?,
        latitude: props::extract_number(props, PROP_LATITUDE)?,
        longitude: props::extract_number(props, PROP_LONGITUDE)?,
        radius_m: props::extract_number(props, PROP_RADIUS)?,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_zone_complete_page() {
        let page: Page = serde_json::from_value(json!({
            "id": "zone-1",
            "properties": {
                "Name": { "title": [{ "text": { "content": "HQ" } }] },
                "Latitude": { "number": 48.8566 },
                "Longitude": { "number": 2.3522 },
                "Radius": { "number": 500.0 },
            }
        }))
        .unwrap();

        let zone = build_zone(&page).unwrap();
        assert_eq!(zone.name, "HQ");
        assert!((zone.radius_m - 500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_build_zone_missing_radius_is_none() {
        let page: Page = serde_json::from_value(json!({
            "id": "zone-1",
            "properties": {
                "Name": { "title": [{ "text": { "content": "HQ" } }] },
                "Latitude": { "number": 48.8566 },
                "Longitude": { "number": 2.3522 },
            }
        }))
        .unwrap();

        assert!(build_zone(&page).is_none());
    }
}
