//! Upstream shop REST API client.
//!
//! # Architecture
//!
//! - The shop backend is source of truth - no local sync, direct API calls
//! - In-memory caching via `moka` for API responses (5 minute TTL)
//! - Errors surface as one opaque [`ApiError`]; retry/backoff policy, if
//!   any, belongs to the caller
//!
//! # Example
//!
//! ```rust,ignore
//! use caspian_storefront::config::StorefrontConfig;
//! use caspian_storefront::shop::ShopClient;
//!
//! let config = StorefrontConfig::from_env()?;
//! let client = ShopClient::new(&config);
//!
//! // Get a product and its category tree
//! let product = client.get_product("silicone-swim-cap").await?;
//! let tree = client.get_category_tree(1).await?;
//! ```

mod cache;
mod client;
pub mod types;

pub use client::ShopClient;
pub use types::*;

use thiserror::Error;

/// Errors that can occur when talking to the shop API.
///
/// Deliberately coarse: the storefront core does not distinguish error
/// subtypes, does not retry, and performs no recovery. Callers get the
/// error value alongside the absence of data and decide nothing finer.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (includes timeouts).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Upstream returned a non-success status.
    #[error("upstream returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, truncated.
        body: String,
    },

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::NotFound("product/silicone-swim-cap".to_string());
        assert_eq!(err.to_string(), "not found: product/silicone-swim-cap");

        let err = ApiError::Status {
            status: 502,
            body: "bad gateway".to_string(),
        };
        assert_eq!(err.to_string(), "upstream returned status 502: bad gateway");
    }
}
