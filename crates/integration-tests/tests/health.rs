//! Integration tests for the health endpoints.
//!
//! Run with: cargo test -p locsent-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::Value;

/// Base URL for the server (configurable via environment).
fn base_url() -> String {
    std::env::var("LOCSENT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_liveness() {
    let resp = Client::new()
        .get(format!("{}/health", base_url()))
        .send()
        .await
        .expect("Failed to send health request");

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.expect("Failed to read body"), "ok");
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_readiness_reports_store_state() {
    let resp = Client::new()
        .get(format!("{}/health/ready", base_url()))
        .send()
        .await
        .expect("Failed to send readiness request");

    // Ready when the document store answers, degraded when it does not
    let status = resp.status();
    assert!(status == StatusCode::OK || status == StatusCode::SERVICE_UNAVAILABLE);

    let body: Value = resp.json().await.expect("Failed to parse readiness body");
    match status {
        StatusCode::OK => assert_eq!(body["status"], "ready"),
        _ => assert_eq!(body["status"], "degraded"),
    }
}
