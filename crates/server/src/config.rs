//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `LOCSENT_SESSION_SECRET` - Session secret (min 32 chars, high entropy)
//! - `NOTION_API_KEY` - Notion integration token (the document store backing all data)
//! - `NOTION_DATABASE_ID_USERS` - Database ID for user accounts
//! - `NOTION_DATABASE_ID_LOCATIONS` - Database ID for location logs
//!
//! ## Optional
//! - `LOCSENT_HOST` - Bind address (default: 0.0.0.0)
//! - `LOCSENT_PORT` - Listen port (default: 3000)
//! - `LOCSENT_BASE_URL` - Public URL for the service (default: http://localhost:3000)
//! - `NOTION_VERSION` - Notion API version header (default: 2022-06-28)
//! - `NOTION_BASE_URL` - Notion API endpoint (default: https://api.notion.com)
//! - `NOTION_DATABASE_ID_GEOFENCES` - Database ID for geofence zones (alerts disabled if unset)
//! - `NOTION_DATABASE_ID_SETTINGS` - Database ID for app settings (sign-up toggle disabled if unset)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment (e.g., "development", "production")

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

const MIN_SESSION_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;
const DEFAULT_NOTION_VERSION: &str = "2022-06-28";
const DEFAULT_NOTION_BASE_URL: &str = "https://api.notion.com";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// LocSent application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the service (drives the Secure cookie flag)
    pub base_url: String,
    /// Session secret
    pub session_secret: SecretString,
    /// Notion document store configuration
    pub notion: NotionConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Notion API configuration.
///
/// All persistent state (users, location logs, geofences, settings) lives in
/// Notion databases reached over HTTPS. Implements `Debug` manually to redact
/// the integration token.
#[derive(Clone)]
pub struct NotionConfig {
    /// Notion integration token
    pub api_key: SecretString,
    /// Value for the `Notion-Version` header
    pub api_version: String,
    /// API endpoint, overridable for tests and proxies
    pub base_url: Url,
    /// Database ID holding user accounts
    pub users_db: String,
    /// Database ID holding location logs
    pub locations_db: String,
    /// Database ID holding geofence zones (optional, alerts disabled if unset)
    pub geofences_db: Option<String>,
    /// Database ID holding app settings (optional, sign-up toggle disabled if unset)
    pub settings_db: Option<String>,
}

impl std::fmt::Debug for NotionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotionConfig")
            .field("api_key", &"[REDACTED]")
            .field("api_version", &self.api_version)
            .field("base_url", &self.base_url.as_str())
            .field("users_db", &self.users_db)
            .field("locations_db", &self.locations_db)
            .field("geofences_db", &self.geofences_db)
            .field("settings_db", &self.settings_db)
            .finish()
    }
}

impl NotionConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let api_key = get_required_env("NOTION_API_KEY")?;
        // Notion tokens (secret_... / ntn_...) routinely trip the placeholder
        // blocklist, so a weak-looking key only warns here.
        if let Err(e) = validate_secret_strength(&api_key, "NOTION_API_KEY") {
            tracing::warn!("NOTION_API_KEY validation warning: {e}");
        }

        let base_url = get_env_or_default("NOTION_BASE_URL", DEFAULT_NOTION_BASE_URL);
        let base_url = Url::parse(&base_url)
            .map_err(|e| ConfigError::InvalidEnvVar("NOTION_BASE_URL".to_string(), e.to_string()))?;

        Ok(Self {
            api_key: SecretString::from(api_key),
            api_version: get_env_or_default("NOTION_VERSION", DEFAULT_NOTION_VERSION),
            base_url,
            users_db: get_required_env("NOTION_DATABASE_ID_USERS")?,
            locations_db: get_required_env("NOTION_DATABASE_ID_LOCATIONS")?,
            geofences_db: get_optional_env("NOTION_DATABASE_ID_GEOFENCES"),
            settings_db: get_optional_env("NOTION_DATABASE_ID_SETTINGS"),
        })
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("LOCSENT_HOST", "0.0.0.0")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("LOCSENT_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("LOCSENT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("LOCSENT_PORT".to_string(), e.to_string()))?;
        let base_url = get_env_or_default("LOCSENT_BASE_URL", "http://localhost:3000");
        let session_secret = get_validated_secret("LOCSENT_SESSION_SECRET")?;
        validate_session_secret(&session_secret, "LOCSENT_SESSION_SECRET")?;

        let notion = NotionConfig::from_env()?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            host,
            port,
            base_url,
            session_secret,
            notion,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Returns a reference to the Notion configuration.
    #[must_use]
    pub const fn notion(&self) -> &NotionConfig {
        &self.notion
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Validate that a session secret meets minimum length requirements.
fn validate_session_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_SESSION_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_SESSION_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    // Check blocklist
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Check entropy (real secrets have high entropy)
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            host: "0.0.0.0".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            session_secret: SecretString::from("x".repeat(32)),
            notion: NotionConfig {
                api_key: SecretString::from("ntn_test_integration_token"),
                api_version: DEFAULT_NOTION_VERSION.to_string(),
                base_url: Url::parse(DEFAULT_NOTION_BASE_URL).unwrap(),
                users_db: "users-db-id".to_string(),
                locations_db: "locations-db-id".to_string(),
                geofences_db: None,
                settings_db: None,
            },
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 1.0,
        }
    }

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_single_char() {
        // All same character = 0 entropy
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_high() {
        // Random-looking string should have high entropy
        let entropy = shannon_entropy("aB3$xY9!mK2@nL5#");
        assert!(entropy > 3.3);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-session-key-here", "TEST_VAR");
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        // High-entropy random string
        let result = validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_session_secret_too_short() {
        let secret = SecretString::from("short");
        let result = validate_session_secret(&secret, "TEST_SESSION");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_session_secret_valid_length() {
        let secret = SecretString::from("a".repeat(32));
        let result = validate_session_secret(&secret, "TEST_SESSION");
        assert!(result.is_ok());
    }

    #[test]
    fn test_socket_addr() {
        let config = test_config();
        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "0.0.0.0");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_notion_config_debug_redacts_token() {
        let config = test_config();
        let debug_output = format!("{:?}", config.notion());

        // Public fields should be visible
        assert!(debug_output.contains(DEFAULT_NOTION_VERSION));
        assert!(debug_output.contains("users-db-id"));

        // The integration token should be redacted
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("ntn_test_integration_token"));
    }

    #[test]
    fn test_default_notion_version() {
        assert_eq!(DEFAULT_NOTION_VERSION, "2022-06-28");
    }
}
