//! Notion API client, the storage backend for all persistent state.
//!
//! Users, location logs, geofence zones, and app settings are rows in Notion
//! databases; every read and write in this service goes through this client.
//! There is no local database.
//!
//! # API Reference
//!
//! - Base URL: `https://api.notion.com` (overridable via `NOTION_BASE_URL`)
//! - Authentication: integration token via `Authorization: Bearer <token>`
//! - API Version: set per-request via the `Notion-Version` header

pub mod props;
mod types;

pub use types::*;

use std::sync::Arc;

use locsent_core::PageId;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde_json::{Map, Value, json};
use thiserror::Error;

use crate::config::NotionConfig;

/// Errors that can occur when interacting with the Notion API.
#[derive(Debug, Error)]
pub enum NotionError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Rate limited by Notion.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Unauthorized (invalid integration token or unshared database).
    #[error("Unauthorized: invalid integration token")]
    Unauthorized,
}

/// Notion API client.
///
/// Cheap to clone; the underlying HTTP client and headers are shared.
#[derive(Clone)]
pub struct NotionClient {
    inner: Arc<NotionClientInner>,
}

struct NotionClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl NotionClient {
    /// Create a new Notion API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build or the configured
    /// token/version cannot form valid headers.
    pub fn new(config: &NotionConfig) -> Result<Self, NotionError> {
        let mut headers = HeaderMap::new();

        // Authorization header
        let auth_value = format!("Bearer {}", config.api_key.expose_secret());
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&auth_value)
                .map_err(|e| NotionError::Parse(format!("Invalid API key format: {e}")))?,
        );

        // Version header, required on every request
        headers.insert(
            "Notion-Version",
            HeaderValue::from_str(&config.api_version)
                .map_err(|e| NotionError::Parse(format!("Invalid API version: {e}")))?,
        );

        headers.insert("Content-Type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(NotionClientInner {
                client,
                base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
            }),
        })
    }

    /// Get the configured API endpoint (no trailing slash).
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Query a database for pages matching the request.
    ///
    /// # Errors
    ///
    /// Returns `NotionError` if the request fails or the response cannot be parsed.
    pub async fn query_database(
        &self,
        database_id: &str,
        request: &QueryRequest,
    ) -> Result<QueryResponse, NotionError> {
        self.post(&format!("/v1/databases/{database_id}/query"), request)
            .await
    }

    /// Query a database and follow `next_cursor` until every page is fetched.
    ///
    /// # Errors
    ///
    /// Returns `NotionError` if any page of the query fails.
    pub async fn query_database_all(
        &self,
        database_id: &str,
        mut request: QueryRequest,
    ) -> Result<Vec<Page>, NotionError> {
        let mut pages = Vec::new();
        loop {
            let response = self.query_database(database_id, &request).await?;
            pages.extend(response.results);
            match (response.has_more, response.next_cursor) {
                (true, Some(cursor)) => request.start_cursor = Some(cursor),
                _ => return Ok(pages),
            }
        }
    }

    /// Create a page (row) in a database.
    ///
    /// # Errors
    ///
    /// Returns `NotionError` if the request fails or the response cannot be parsed.
    pub async fn create_page(
        &self,
        database_id: &str,
        properties: Map<String, Value>,
    ) -> Result<Page, NotionError> {
        let request = CreatePageRequest {
            parent: Parent {
                database_id: database_id.to_string(),
            },
            properties,
        };
        self.post("/v1/pages", &request).await
    }

    /// Update properties on an existing page.
    ///
    /// # Errors
    ///
    /// Returns `NotionError` if the request fails or the response cannot be parsed.
    pub async fn update_page(
        &self,
        page_id: &PageId,
        properties: Map<String, Value>,
    ) -> Result<Page, NotionError> {
        self.patch(
            &format!("/v1/pages/{page_id}"),
            &json!({ "properties": properties }),
        )
        .await
    }

    /// Archive a page. Notion has no hard delete; archived pages disappear
    /// from query results but remain recoverable in the store's UI.
    ///
    /// # Errors
    ///
    /// Returns `NotionError` if the request fails.
    pub async fn archive_page(&self, page_id: &PageId) -> Result<(), NotionError> {
        let _: Page = self
            .patch(&format!("/v1/pages/{page_id}"), &json!({ "archived": true }))
            .await?;
        Ok(())
    }

    /// Retrieve a single page by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotionError::NotFound` if the page does not exist.
    pub async fn get_page(&self, page_id: &PageId) -> Result<Page, NotionError> {
        self.get(&format!("/v1/pages/{page_id}")).await
    }

    /// Probe API reachability and token validity (`GET /v1/users/me`).
    ///
    /// # Errors
    ///
    /// Returns `NotionError` if the API is unreachable or rejects the token.
    pub async fn ping(&self) -> Result<(), NotionError> {
        let _: Value = self.get("/v1/users/me").await?;
        Ok(())
    }

    /// Execute a GET request against the API.
    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, NotionError> {
        let url = format!("{}{path}", self.inner.base_url);
        let response = self.inner.client.get(&url).send().await?;
        self.handle_response(response).await
    }

    /// Execute a POST request against the API.
    async fn post<T: serde::de::DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, NotionError> {
        let url = format!("{}{path}", self.inner.base_url);
        let response = self.inner.client.post(&url).json(body).send().await?;
        self.handle_response(response).await
    }

    /// Execute a PATCH request against the API.
    async fn patch<T: serde::de::DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, NotionError> {
        let url = format!("{}{path}", self.inner.base_url);
        let response = self.inner.client.patch(&url).json(body).send().await?;
        self.handle_response(response).await
    }

    /// Handle API response and parse JSON.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, NotionError> {
        let status = response.status();

        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| NotionError::Parse(format!("Failed to parse response: {e}")));
        }

        Err(Self::parse_error(response).await)
    }

    /// Parse an error response from the API.
    async fn parse_error(response: reqwest::Response) -> NotionError {
        let status = response.status().as_u16();

        // Check for rate limiting
        if status == 429 {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return NotionError::RateLimited(retry_after);
        }

        // Check for unauthorized
        if status == 401 || status == 403 {
            return NotionError::Unauthorized;
        }

        // Check for not found
        if status == 404 {
            return NotionError::NotFound("Resource not found".to_string());
        }

        // Try to parse error message from response body
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        NotionError::Api { status, message }
    }
}

impl std::fmt::Debug for NotionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotionClient")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::SecretString;
    use url::Url;

    fn test_notion_config(base_url: &str) -> NotionConfig {
        NotionConfig {
            api_key: SecretString::from("ntn_test_token"),
            api_version: "2022-06-28".to_string(),
            base_url: Url::parse(base_url).unwrap(),
            users_db: "users-db".to_string(),
            locations_db: "locations-db".to_string(),
            geofences_db: None,
            settings_db: None,
        }
    }

    #[test]
    fn test_client_strips_trailing_slash() {
        let client = NotionClient::new(&test_notion_config("https://api.notion.com/")).unwrap();
        assert_eq!(client.base_url(), "https://api.notion.com");
    }

    #[test]
    fn test_debug_omits_token() {
        let client = NotionClient::new(&test_notion_config("https://api.notion.com")).unwrap();
        let debug_output = format!("{client:?}");
        assert!(debug_output.contains("api.notion.com"));
        assert!(!debug_output.contains("ntn_test_token"));
    }
}
