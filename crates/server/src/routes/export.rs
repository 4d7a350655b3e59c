//! Location history export handler.
//!
//! Serves a user's full history as a CSV or HTML download. Formatting is
//! done here rather than in the store layer; both formats are built from the
//! same fetched records.

use std::borrow::Cow;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use locsent_core::{PageId, Username};
use tracing::instrument;

use crate::error::AppError;
use crate::middleware::RequireAdmin;
use crate::models::LocationRecord;
use crate::state::AppState;

/// Column order shared by both export formats.
const EXPORT_COLUMNS: [&str; 6] = [
    "Timestamp",
    "Latitude",
    "Longitude",
    "IPAddress",
    "Battery",
    "DeviceInfo",
];

/// A supported download format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExportFormat {
    Csv,
    Html,
}

impl ExportFormat {
    const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Html => "html",
        }
    }

    const fn content_type(self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Html => "text/html; charset=utf-8",
        }
    }
}

fn parse_format(s: &str) -> Option<ExportFormat> {
    match s {
        "csv" => Some(ExportFormat::Csv),
        "html" => Some(ExportFormat::Html),
        _ => None,
    }
}

/// Download a user's full location history.
///
/// The `username` path segment is display-only (filename, document header);
/// the records are keyed by `page_id`.
///
/// # Errors
///
/// Returns 400 for an unknown format or invalid username, 404 when the user
/// has no records, and 500 when the history cannot be fetched.
#[instrument(skip(state))]
pub async fn export_logs(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path((page_id, username, format)): Path<(PageId, String, String)>,
) -> Result<Response, AppError> {
    let Some(format) = parse_format(&format) else {
        return Err(AppError::BadRequest(format!(
            "Invalid export format: {format}"
        )));
    };
    // Re-parsing keeps header-unsafe characters out of the filename.
    let username =
        Username::parse(&username).map_err(|e| AppError::BadRequest(e.to_string()))?;

    let records = state.locations().full_history(&page_id).await?;
    if records.is_empty() {
        return Err(AppError::NotFound(format!(
            "No logs found for user {username} to export."
        )));
    }

    tracing::info!(
        %username,
        records = records.len(),
        format = format.extension(),
        "exporting location history"
    );

    let body = match format {
        ExportFormat::Csv => build_csv(&records),
        ExportFormat::Html => build_html(username.as_ref(), &records),
    };
    let filename = format!("{username}_location_history.{}", format.extension());

    Ok((
        StatusCode::OK,
        [
            ("Content-Type", format.content_type()),
            (
                "Content-Disposition",
                &format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response())
}

// =============================================================================
// Format Builders
// =============================================================================

fn build_csv(records: &[LocationRecord]) -> String {
    use std::fmt::Write;

    let mut csv = EXPORT_COLUMNS.join(",");
    csv.push('\n');
    for record in records {
        let _ = writeln!(
            csv,
            "{},{},{},{},{},{}",
            csv_field(&record.timestamp.to_rfc3339()),
            record.latitude,
            record.longitude,
            csv_field(&record.ip_address),
            csv_field(&record.battery),
            csv_field(&record.device_info)
        );
    }
    csv
}

/// Quote a CSV field when it contains a delimiter, quote, or line break.
fn csv_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

fn build_html(username: &str, records: &[LocationRecord]) -> String {
    use std::fmt::Write;

    let mut html = String::from("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(html, "<title>Location History - {}</title>", esc(username));
    html.push_str(
        "<style>\n\
         body { font-family: sans-serif; margin: 2em; }\n\
         table { border-collapse: collapse; width: 100%; }\n\
         th, td { border: 1px solid #ccc; padding: 4px 8px; text-align: left; }\n\
         th { background: #e8eef7; }\n\
         </style>\n</head>\n<body>\n",
    );
    let _ = writeln!(html, "<h1>Location History for {}</h1>", esc(username));
    html.push_str("<table>\n<tr>");
    for column in EXPORT_COLUMNS {
        let _ = write!(html, "<th>{column}</th>");
    }
    html.push_str("</tr>\n");
    for record in records {
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            esc(&record.timestamp.to_rfc3339()),
            record.latitude,
            record.longitude,
            esc(&record.ip_address),
            esc(&record.battery),
            esc(&record.device_info)
        );
    }
    html.push_str("</table>\n</body>\n</html>\n");
    html
}

fn esc(value: &str) -> Cow<'_, str> {
    if value.contains(['&', '<', '>', '"', '\'']) {
        Cow::Owned(
            value
                .replace('&', "&amp;")
                .replace('<', "&lt;")
                .replace('>', "&gt;")
                .replace('"', "&quot;")
                .replace('\'', "&#39;"),
        )
    } else {
        Cow::Borrowed(value)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn test_record() -> LocationRecord {
        LocationRecord {
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            latitude: 40.7128,
            longitude: -74.006,
            ip_address: "203.0.113.7".to_string(),
            battery: "87%".to_string(),
            device_info: "Pixel 8, Android 15".to_string(),
        }
    }

    #[test]
    fn test_parse_format_known_and_unknown() {
        assert_eq!(parse_format("csv"), Some(ExportFormat::Csv));
        assert_eq!(parse_format("html"), Some(ExportFormat::Html));
        assert_eq!(parse_format("pdf"), None);
        // Exact match only
        assert_eq!(parse_format("CSV"), None);
    }

    #[test]
    fn test_csv_field_plain_value_unquoted() {
        assert_eq!(csv_field("203.0.113.7"), "203.0.113.7");
    }

    #[test]
    fn test_csv_field_quotes_when_needed() {
        assert_eq!(csv_field("Pixel 8, Android 15"), "\"Pixel 8, Android 15\"");
        assert_eq!(csv_field("said \"hi\""), "\"said \"\"hi\"\"\"");
        assert_eq!(csv_field("line\nbreak"), "\"line\nbreak\"");
    }

    #[test]
    fn test_build_csv_header_and_rows() {
        let csv = build_csv(&[test_record()]);
        let mut lines = csv.lines();

        assert_eq!(
            lines.next().unwrap(),
            "Timestamp,Latitude,Longitude,IPAddress,Battery,DeviceInfo"
        );
        let row = lines.next().unwrap();
        assert!(row.starts_with("2024-05-01T12:00:00+00:00,40.7128,-74.006,"));
        // The comma in the device description forces quoting
        assert!(row.ends_with("\"Pixel 8, Android 15\""));
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_build_html_escapes_markup() {
        let mut record = test_record();
        record.device_info = "<script>alert(1)</script>".to_string();

        let html = build_html("alice", &[record]);
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("<h1>Location History for alice</h1>"));
    }

    #[test]
    fn test_build_html_has_all_columns() {
        let html = build_html("alice", &[test_record()]);
        for column in EXPORT_COLUMNS {
            assert!(html.contains(&format!("<th>{column}</th>")));
        }
    }
}
