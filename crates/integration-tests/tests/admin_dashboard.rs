//! Integration tests for the admin dashboard API.
//!
//! These tests require:
//! - A running server (cargo run -p locsent-server)
//! - Valid store credentials in the server's environment
//! - An existing Admin account, named via `LOCSENT_TEST_ADMIN_USERNAME` and
//!   `LOCSENT_TEST_ADMIN_PASSWORD`
//!
//! Run with: cargo test -p locsent-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use uuid::Uuid;

/// Base URL for the server (configurable via environment).
fn base_url() -> String {
    std::env::var("LOCSENT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

fn session_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// Test helper: a client logged in as the configured admin account.
async fn admin_client() -> Client {
    let username = std::env::var("LOCSENT_TEST_ADMIN_USERNAME")
        .unwrap_or_else(|_| "admin".to_string());
    let password =
        std::env::var("LOCSENT_TEST_ADMIN_PASSWORD").expect("LOCSENT_TEST_ADMIN_PASSWORD not set");

    let client = session_client();
    let resp = client
        .post(format!("{}/auth/login", base_url()))
        .json(&json!({ "username": username, "password": password }))
        .send()
        .await
        .expect("Failed to log in as admin");
    assert_eq!(resp.status(), StatusCode::OK, "admin login failed");

    client
}

/// Test helper: a client logged in on a fresh non-admin account.
async fn user_client() -> Client {
    let client = session_client();
    let id = Uuid::new_v4().simple().to_string();
    let username = format!("it-admin-{}", &id[..8]);
    let base_url = base_url();

    let resp = client
        .post(format!("{base_url}/auth/signup"))
        .json(&json!({ "username": username, "password": "dashboard-test-pass" }))
        .send()
        .await
        .expect("Failed to sign up");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = client
        .post(format!("{base_url}/auth/login"))
        .json(&json!({ "username": username, "password": "dashboard-test-pass" }))
        .send()
        .await
        .expect("Failed to log in");
    assert_eq!(resp.status(), StatusCode::OK);

    client
}

// ============================================================================
// Access Control Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server, store credentials, and an admin account"]
async fn test_admin_routes_reject_anonymous() {
    let resp = session_client()
        .get(format!("{}/admin/users", base_url()))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running server and store credentials"]
async fn test_admin_routes_reject_normal_user() {
    let client = user_client().await;

    let resp = client
        .get(format!("{}/admin/users", base_url()))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = resp.json().await.expect("Failed to parse error response");
    assert_eq!(body["error"], "Admin access is required");
}

// ============================================================================
// Dashboard Query Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server, store credentials, and an admin account"]
async fn test_users_list_shape() {
    let client = admin_client().await;

    let resp = client
        .get(format!("{}/admin/users", base_url()))
        .send()
        .await
        .expect("Failed to list users");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse users list");
    let users = body.as_array().expect("users list is not an array");
    // The admin account itself is always present
    assert!(!users.is_empty());
    for user in users {
        assert!(user["id"].is_string());
        assert!(user["page_id"].is_string());
        assert!(user["username"].is_string());
        assert!(user["role"] == "Admin" || user["role"] == "User");
    }
}

#[tokio::test]
#[ignore = "Requires running server, store credentials, and an admin account"]
async fn test_latest_locations_shape() {
    let client = admin_client().await;

    let resp = client
        .get(format!("{}/admin/api/get_all_latest_locations", base_url()))
        .send()
        .await
        .expect("Failed to fetch latest locations");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse latest locations");
    for entry in body.as_array().expect("latest locations is not an array") {
        assert!(entry["username"].is_string());
        assert!(entry["latitude"].is_number());
        assert!(entry["longitude"].is_number());
        assert!(entry["timestamp"].is_string());
        assert!(entry["battery"].is_string());
    }
}

#[tokio::test]
#[ignore = "Requires running server, store credentials, and an admin account"]
async fn test_location_history_respects_limit() {
    let client = admin_client().await;
    let base_url = base_url();

    let resp = client
        .get(format!("{base_url}/admin/users"))
        .send()
        .await
        .expect("Failed to list users");
    let users: Value = resp.json().await.expect("Failed to parse users list");
    let page_id = users[0]["page_id"].as_str().expect("no users in store");

    let resp = client
        .get(format!(
            "{base_url}/admin/get_location_history/{page_id}?limit=2"
        ))
        .send()
        .await
        .expect("Failed to fetch history");

    assert_eq!(resp.status(), StatusCode::OK);
    let history: Value = resp.json().await.expect("Failed to parse history");
    assert!(history.as_array().expect("history is not an array").len() <= 2);
}

// ============================================================================
// Export Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server, store credentials, and an admin account"]
async fn test_export_csv_download() {
    let client = admin_client().await;
    let base_url = base_url();

    let resp = client
        .get(format!("{base_url}/admin/users"))
        .send()
        .await
        .expect("Failed to list users");
    let users: Value = resp.json().await.expect("Failed to parse users list");
    let page_id = users[0]["page_id"].as_str().expect("no users in store");
    let username = users[0]["username"].as_str().expect("no users in store");

    let resp = client
        .get(format!(
            "{base_url}/admin/export_logs/{page_id}/{username}/csv"
        ))
        .send()
        .await
        .expect("Failed to export history");

    // 404 when this user has no records yet
    assert!(resp.status() == StatusCode::OK || resp.status() == StatusCode::NOT_FOUND);
    if resp.status() == StatusCode::OK {
        let disposition = resp
            .headers()
            .get("content-disposition")
            .expect("missing content-disposition")
            .to_str()
            .expect("invalid content-disposition");
        assert!(disposition.contains(&format!("{username}_location_history.csv")));

        let body = resp.text().await.expect("Failed to read body");
        assert!(body.starts_with("Timestamp,Latitude,Longitude,IPAddress,Battery,DeviceInfo"));
    }
}

#[tokio::test]
#[ignore = "Requires running server, store credentials, and an admin account"]
async fn test_export_invalid_format_rejected() {
    let client = admin_client().await;
    let base_url = base_url();

    let resp = client
        .get(format!("{base_url}/admin/users"))
        .send()
        .await
        .expect("Failed to list users");
    let users: Value = resp.json().await.expect("Failed to parse users list");
    let page_id = users[0]["page_id"].as_str().expect("no users in store");
    let username = users[0]["username"].as_str().expect("no users in store");

    let resp = client
        .get(format!(
            "{base_url}/admin/export_logs/{page_id}/{username}/pdf"
        ))
        .send()
        .await
        .expect("Failed to send export request");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to parse error response");
    assert_eq!(body["error"], "Invalid export format: pdf");
}

// ============================================================================
// Stats & Settings Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server and store credentials"]
async fn test_stats_require_xhr_header() {
    let client = user_client().await;
    let base_url = base_url();

    // Without the header: rejected
    let resp = client
        .get(format!("{base_url}/api/get_active_users_count"))
        .send()
        .await
        .expect("Failed to send stats request");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = resp.json().await.expect("Failed to parse error response");
    assert_eq!(body["error"], "Forbidden");

    // With the header: served
    let resp = client
        .get(format!("{base_url}/api/get_active_users_count"))
        .header("X-Requested-With", "XMLHttpRequest")
        .send()
        .await
        .expect("Failed to send stats request");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse count response");
    assert!(body["count"].is_number());
}

#[tokio::test]
#[ignore = "Requires running server and store credentials"]
async fn test_geofences_list_for_logged_in_user() {
    let client = user_client().await;

    let resp = client
        .get(format!("{}/api/get_geofences", base_url()))
        .send()
        .await
        .expect("Failed to fetch geofences");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse geofences");
    for zone in body.as_array().expect("geofences is not an array") {
        assert!(zone["name"].is_string());
        assert!(zone["lat"].is_number());
        assert!(zone["lon"].is_number());
        assert!(zone["radius"].is_number());
    }
}

#[tokio::test]
#[ignore = "Requires running server, store credentials, an admin account, and a settings database"]
async fn test_toggle_signup_roundtrip() {
    let client = admin_client().await;
    let base_url = base_url();

    let resp = client
        .post(format!("{base_url}/admin/toggle_signup"))
        .send()
        .await
        .expect("Failed to toggle signup");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse toggle response");
    let flipped = body["signup_enabled"].as_bool().expect("missing flag");

    // Flip it back so the store ends where it started
    let resp = client
        .post(format!("{base_url}/admin/toggle_signup"))
        .send()
        .await
        .expect("Failed to toggle signup back");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse toggle response");
    assert_eq!(body["signup_enabled"].as_bool(), Some(!flipped));
}
