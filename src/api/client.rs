//! REST client for the relationships backend
//!
//! Thin consumer of a fixed external contract: entity search and entity
//! expansion over one endpoint, authenticated with an `x-api-key` header.
//! Successful responses are cached with per-operation TTLs; failures are
//! surfaced to the caller and never cached. There is no retry; the user
//! re-triggers.

use super::cache::ResponseCache;
use super::types::{EntityDetails, ExpandResponse, SearchHit};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Search results stay fresh for a short window
pub const SEARCH_TTL: Duration = Duration::from_secs(2 * 60);

/// Expansion responses change less often
pub const EXPAND_TTL: Duration = Duration::from_secs(5 * 60);

/// Full entity details are the most stable
pub const DETAILS_TTL: Duration = Duration::from_secs(10 * 60);

/// Errors surfaced by backend calls
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend returned status {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Backend endpoint and credentials, supplied by the caller
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host (or full base URL) of the API gateway
    pub endpoint: String,
    pub api_key: String,
}

impl ApiConfig {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        ApiConfig {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }

    /// Read configuration from `NEXUS_API_ENDPOINT` / `NEXUS_API_KEY`,
    /// if both are present
    pub fn from_env() -> Option<Self> {
        let endpoint = std::env::var("NEXUS_API_ENDPOINT").ok()?;
        let api_key = std::env::var("NEXUS_API_KEY").ok()?;
        Some(ApiConfig::new(endpoint, api_key))
    }

    /// The relationships resource URL. A bare host gets the https scheme
    /// prepended; a full URL is used as-is.
    pub fn relationships_url(&self) -> String {
        let endpoint = self.endpoint.trim_end_matches('/');
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            format!("{}/relationships", endpoint)
        } else {
            format!("https://{}/relationships", endpoint)
        }
    }
}

/// Client for the relationships backend
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ApiConfig,
    cache: Arc<ResponseCache>,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Self {
        ApiClient::with_cache(config, Arc::new(ResponseCache::new()))
    }

    /// Build a client sharing an externally owned cache (so several
    /// clients, or a sweeper task, can see the same entries)
    pub fn with_cache(config: ApiConfig, cache: Arc<ResponseCache>) -> Self {
        ApiClient {
            http: reqwest::Client::new(),
            config,
            cache,
        }
    }

    pub fn cache(&self) -> &Arc<ResponseCache> {
        &self.cache
    }

    /// Search entities by free text. Empty or whitespace-only terms
    /// return no hits without touching the network.
    pub async fn search(&self, term: &str) -> ApiResult<Vec<SearchHit>> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(Vec::new());
        }
        let body = self.get_json(&[("search", term)], SEARCH_TTL).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// Fetch an entity together with its full relationship set
    pub async fn expand(&self, entity_id: &str) -> ApiResult<ExpandResponse> {
        let body = self
            .get_json(&[("entity_id", entity_id)], EXPAND_TTL)
            .await?;
        Ok(serde_json::from_value(body)?)
    }

    /// Fetch just the entity envelope, for filling in stub entities that
    /// were discovered as relationship endpoints
    pub async fn entity_details(&self, entity_id: &str) -> ApiResult<EntityDetails> {
        let body = self
            .get_json(&[("entity_id", entity_id)], DETAILS_TTL)
            .await?;
        let response: ExpandResponse = serde_json::from_value(body)?;
        Ok(response.entity)
    }

    async fn get_json(&self, params: &[(&str, &str)], ttl: Duration) -> ApiResult<Value> {
        let request = self
            .http
            .get(self.config.relationships_url())
            .query(params)
            .header("x-api-key", &self.config.api_key)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .build()?;

        let url = request.url().to_string();
        let key = ResponseCache::key("GET", &url, &self.config.api_key);
        if let Some(body) = self.cache.get(&key) {
            debug!(%url, "response cache hit");
            return Ok(body);
        }

        let response = self.http.execute(request).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }

        let body: Value = response.json().await?;
        self.cache.insert(key, body.clone(), ttl);
        Ok(body)
    }
}
