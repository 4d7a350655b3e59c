//! Request and response types for the Notion API.
//!
//! Only the fields this service actually reads are modeled; everything else
//! in a response is ignored during deserialization.

use locsent_core::PageId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Body for `POST /v1/databases/{id}/query`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct QueryRequest {
    /// Property filter, built with the helpers below.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,
    /// Sort order for results.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sorts: Vec<Sort>,
    /// Maximum number of results per page (Notion caps this at 100).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    /// Cursor from a previous response, for fetching the next page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<String>,
}

/// A single sort instruction.
#[derive(Debug, Clone, Serialize)]
pub struct Sort {
    pub property: String,
    pub direction: SortDirection,
}

impl Sort {
    /// Sort a property in ascending order.
    #[must_use]
    pub fn ascending(property: &str) -> Self {
        Self {
            property: property.to_string(),
            direction: SortDirection::Ascending,
        }
    }

    /// Sort a property in descending order.
    #[must_use]
    pub fn descending(property: &str) -> Self {
        Self {
            property: property.to_string(),
            direction: SortDirection::Descending,
        }
    }
}

/// Sort direction for queries.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Response body for a database query.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryResponse {
    pub results: Vec<Page>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// A page (row) in a Notion database.
#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    pub id: PageId,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

/// Body for `POST /v1/pages`.
#[derive(Debug, Clone, Serialize)]
pub struct CreatePageRequest {
    pub parent: Parent,
    pub properties: Map<String, Value>,
}

/// Parent database reference for page creation.
#[derive(Debug, Clone, Serialize)]
pub struct Parent {
    pub database_id: String,
}

// =============================================================================
// Filter builders
// =============================================================================

/// Filter pages whose title property equals `value`.
#[must_use]
pub fn title_equals(property: &str, value: &str) -> Value {
    json!({ "property": property, "title": { "equals": value } })
}

/// Filter pages whose rich text property equals `value`.
#[must_use]
pub fn rich_text_equals(property: &str, value: &str) -> Value {
    json!({ "property": property, "rich_text": { "equals": value } })
}

/// Filter pages whose relation property contains `page_id`.
#[must_use]
pub fn relation_contains(property: &str, page_id: &PageId) -> Value {
    json!({ "property": property, "relation": { "contains": page_id.as_str() } })
}
