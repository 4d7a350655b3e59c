//! Property payload construction and extraction.
//!
//! Notion wraps every property value in a type-tagged envelope, e.g. a title
//! is `{"title": [{"text": {"content": "..."}}]}`. The builders here produce
//! those envelopes for writes; the extractors unwrap them on reads, returning
//! `None` when a property is absent or empty so callers choose the fallback.

use chrono::{DateTime, Utc};
use locsent_core::PageId;
use serde_json::{Map, Value, json};

// =============================================================================
// Builders
// =============================================================================

/// Title property value.
#[must_use]
pub fn title(content: &str) -> Value {
    json!({ "title": [{ "text": { "content": content } }] })
}

/// Rich text property value.
#[must_use]
pub fn rich_text(content: &str) -> Value {
    json!({ "rich_text": [{ "text": { "content": content } }] })
}

/// Select property value.
#[must_use]
pub fn select(name: &str) -> Value {
    json!({ "select": { "name": name } })
}

/// Number property value.
#[must_use]
pub fn number(value: f64) -> Value {
    json!({ "number": value })
}

/// Date property value (RFC 3339, UTC).
#[must_use]
pub fn date(value: DateTime<Utc>) -> Value {
    json!({ "date": { "start": value.to_rfc3339() } })
}

/// Single-page relation property value.
#[must_use]
pub fn relation(page_id: &PageId) -> Value {
    json!({ "relation": [{ "id": page_id.as_str() }] })
}

// =============================================================================
// Extractors
// =============================================================================

/// Extract the plain text of a title property.
#[must_use]
pub fn extract_title(props: &Map<String, Value>, name: &str) -> Option<String> {
    extract_text_array(props.get(name)?.get("title")?)
}

/// Extract the plain text of a rich text property.
#[must_use]
pub fn extract_rich_text(props: &Map<String, Value>, name: &str) -> Option<String> {
    extract_text_array(props.get(name)?.get("rich_text")?)
}

/// Extract the selected option name of a select property.
#[must_use]
pub fn extract_select(props: &Map<String, Value>, name: &str) -> Option<String> {
    props
        .get(name)?
        .get("select")?
        .get("name")?
        .as_str()
        .map(str::to_string)
}

/// Extract a number property.
#[must_use]
pub fn extract_number(props: &Map<String, Value>, name: &str) -> Option<f64> {
    props.get(name)?.get("number")?.as_f64()
}

/// Extract the start of a date property as a UTC timestamp.
#[must_use]
pub fn extract_date(props: &Map<String, Value>, name: &str) -> Option<DateTime<Utc>> {
    let start = props.get(name)?.get("date")?.get("start")?.as_str()?;
    DateTime::parse_from_rfc3339(start)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// First fragment of a text array, via `text.content` with a `plain_text`
/// fallback (responses carry both, writes only the former).
fn extract_text_array(value: &Value) -> Option<String> {
    let first = value.get(0)?;
    first
        .get("text")
        .and_then(|t| t.get("content"))
        .or_else(|| first.get("plain_text"))?
        .as_str()
        .map(str::to_string)
}
