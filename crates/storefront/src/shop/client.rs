//! Shop API client implementation.
//!
//! Plain REST over `reqwest`. Caches products, unfiltered listings, and the
//! category tree using `moka` (5-minute TTL).

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tracing::{debug, instrument};

use crate::config::StorefrontConfig;
use crate::shop::ApiError;
use crate::shop::cache::CacheValue;
use crate::shop::types::{Category, Envelope, Product, ProductListing};

// =============================================================================
// ShopClient
// =============================================================================

/// Client for the upstream shop REST API.
///
/// Provides typed access to products, category listings, and the category
/// tree. Products and the tree are cached for 5 minutes; listings are cached
/// per page when no filters are applied.
#[derive(Clone)]
pub struct ShopClient {
    inner: Arc<ShopClientInner>,
}

struct ShopClientInner {
    client: reqwest::Client,
    root: String,
    timeout: Duration,
    cache: Cache<String, CacheValue>,
}

impl ShopClient {
    /// Create a new shop API client.
    #[must_use]
    pub fn new(config: &StorefrontConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        let root = format!(
            "{}{}",
            config.api_base_url.as_str().trim_end_matches('/'),
            config.api_path
        );

        Self {
            inner: Arc::new(ShopClientInner {
                client: reqwest::Client::new(),
                root,
                timeout: config.request_timeout,
                cache,
            }),
        }
    }

    /// The resolved API root every endpoint is relative to.
    #[must_use]
    pub fn api_root(&self) -> &str {
        &self.inner.root
    }

    /// Execute a GET request and parse the JSON body.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let response = self
            .inner
            .client
            .get(url)
            .query(query)
            .timeout(self.inner.timeout)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(url.to_string()));
        }

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "shop API returned non-success status"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: response_text.chars().take(200).collect(),
            });
        }

        match serde_json::from_str(&response_text) {
            Ok(parsed) => Ok(parsed),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %response_text.chars().take(500).collect::<String>(),
                    "failed to parse shop API response"
                );
                Err(ApiError::Parse(e))
            }
        }
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Get a product by its slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the API request fails.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn get_product(&self, slug: &str) -> Result<Product, ApiError> {
        let cache_key = format!("product:{slug}");

        // Check cache
        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let url = format!("{}product/{slug}", self.inner.root);
        let envelope: Envelope<Product> = self.get_json(&url, &[]).await.map_err(|e| match e {
            ApiError::NotFound(_) => ApiError::NotFound(format!("Product not found: {slug}")),
            other => other,
        })?;

        // Cache the result
        self.inner
            .cache
            .insert(
                cache_key,
                CacheValue::Product(Box::new(envelope.data.clone())),
            )
            .await;

        Ok(envelope.data)
    }

    /// Get products related to the given product.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn get_related_products(&self, slug: &str) -> Result<Vec<Product>, ApiError> {
        let url = format!("{}product/{slug}/related", self.inner.root);
        let envelope: Envelope<Vec<Product>> = self.get_json(&url, &[]).await?;
        Ok(envelope.data)
    }

    /// Get a page of the shop listing, optionally filtered.
    ///
    /// Only unfiltered pages are cached; filter combinations are passed
    /// through as query parameters and always hit the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, filters))]
    pub async fn get_products(
        &self,
        page: u32,
        filters: &BTreeMap<String, String>,
    ) -> Result<ProductListing, ApiError> {
        let cache_key = format!("products:{page}");

        // Check cache (only for unfiltered listings)
        if filters.is_empty()
            && let Some(CacheValue::Products(listing)) = self.inner.cache.get(&cache_key).await
        {
            debug!("Cache hit for products");
            return Ok(listing);
        }

        let url = format!("{}shop", self.inner.root);
        let mut query: Vec<(&str, String)> = vec![("page", page.to_string())];
        query.extend(filters.iter().map(|(k, v)| (k.as_str(), v.clone())));

        let envelope: Envelope<ProductListing> = self.get_json(&url, &query).await?;

        // Cache if unfiltered
        if filters.is_empty() {
            self.inner
                .cache
                .insert(cache_key, CacheValue::Products(envelope.data.clone()))
                .await;
        }

        Ok(envelope.data)
    }

    // =========================================================================
    // Category Methods
    // =========================================================================

    /// Get a page of products in a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the category is not found or the API request
    /// fails.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn get_category_products(
        &self,
        slug: &str,
        page: u32,
    ) -> Result<ProductListing, ApiError> {
        let cache_key = format!("category:{slug}:{page}");

        // Check cache
        if let Some(CacheValue::Products(listing)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for category products");
            return Ok(listing);
        }

        let url = format!("{}shop/category/{slug}", self.inner.root);
        let envelope: Envelope<ProductListing> = self
            .get_json(&url, &[("page", page.to_string())])
            .await
            .map_err(|e| match e {
                ApiError::NotFound(_) => {
                    ApiError::NotFound(format!("Category not found: {slug}"))
                }
                other => other,
            })?;

        // Cache the result
        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(envelope.data.clone()))
            .await;

        Ok(envelope.data)
    }

    /// Get the nested category tree down to the given depth.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_category_tree(&self, depth: u8) -> Result<Vec<Category>, ApiError> {
        let cache_key = format!("categories:{depth}");

        // Check cache
        if let Some(CacheValue::Categories(categories)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for category tree");
            return Ok(categories);
        }

        let url = format!("{}shop/categories", self.inner.root);
        let envelope: Envelope<Vec<Category>> =
            self.get_json(&url, &[("d", depth.to_string())]).await?;

        // Cache the result
        self.inner
            .cache
            .insert(cache_key, CacheValue::Categories(envelope.data.clone()))
            .await;

        Ok(envelope.data)
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    /// Invalidate a cached product.
    pub async fn invalidate_product(&self, slug: &str) {
        let cache_key = format!("product:{slug}");
        self.inner.cache.invalidate(&cache_key).await;
    }

    /// Invalidate all cached data.
    pub async fn invalidate_all(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }
}
