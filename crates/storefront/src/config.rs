//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CASPIAN_API_BASE_URL` - Origin of the upstream shop API
//!
//! ## Optional
//! - `CASPIAN_API_PATH` - API path prefix (default: /api/v1/)
//! - `CASPIAN_COLOR_TYPE_ID` - `type_id` of the color facet (default: 2)
//! - `CASPIAN_REQUEST_TIMEOUT_SECS` - Upstream request timeout (default: 30)

use std::time::Duration;

use caspian_core::AttributeTypeId;
use thiserror::Error;
use url::Url;

/// The facet the backend uses for colors unless configured otherwise.
///
/// Kept as the historical value for wire compatibility; override via
/// `CASPIAN_COLOR_TYPE_ID` when the backend assigns a different facet.
pub const DEFAULT_COLOR_TYPE_ID: i64 = 2;

const DEFAULT_API_PATH: &str = "/api/v1/";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Origin of the upstream shop API.
    pub api_base_url: Url,
    /// Path prefix under the origin, with leading and trailing slash.
    pub api_path: String,
    /// The attribute facet that carries color swatches.
    pub color_type_id: AttributeTypeId,
    /// Timeout applied to every upstream request.
    pub request_timeout: Duration,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base_url = get_required_env("CASPIAN_API_BASE_URL")?;
        let api_base_url = Url::parse(&api_base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("CASPIAN_API_BASE_URL".to_string(), e.to_string())
        })?;

        let api_path = normalize_path(&get_env_or_default("CASPIAN_API_PATH", DEFAULT_API_PATH));

        let color_type_id = get_env_or_default(
            "CASPIAN_COLOR_TYPE_ID",
            &DEFAULT_COLOR_TYPE_ID.to_string(),
        )
        .parse::<i64>()
        .map(AttributeTypeId::new)
        .map_err(|e| {
            ConfigError::InvalidEnvVar("CASPIAN_COLOR_TYPE_ID".to_string(), e.to_string())
        })?;

        let request_timeout = get_env_or_default(
            "CASPIAN_REQUEST_TIMEOUT_SECS",
            &DEFAULT_REQUEST_TIMEOUT_SECS.to_string(),
        )
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|e| {
            ConfigError::InvalidEnvVar("CASPIAN_REQUEST_TIMEOUT_SECS".to_string(), e.to_string())
        })?;

        Ok(Self {
            api_base_url,
            api_path,
            color_type_id,
            request_timeout,
        })
    }

    /// Create a configuration programmatically with defaults for everything
    /// but the base URL.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the base URL does not parse.
    pub fn new(api_base_url: &str) -> Result<Self, ConfigError> {
        let api_base_url = Url::parse(api_base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("api_base_url".to_string(), e.to_string())
        })?;

        Ok(Self {
            api_base_url,
            api_path: DEFAULT_API_PATH.to_string(),
            color_type_id: AttributeTypeId::new(DEFAULT_COLOR_TYPE_ID),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Ensure a path prefix has exactly one leading and one trailing slash.
fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{trimmed}/")
    }
}
