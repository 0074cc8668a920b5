//! Backend REST client, response cache and request pacing
//!
//! The backend contract is fixed and external: one `relationships`
//! resource serving free-text search and per-entity expansion, keyed by
//! an API gateway endpoint and key supplied through configuration.

pub mod cache;
pub mod client;
pub mod debounce;
pub mod types;

// Re-export main types
pub use cache::{spawn_sweeper, CacheStats, ResponseCache, DEFAULT_TTL, SWEEP_INTERVAL};
pub use client::{ApiClient, ApiConfig, ApiError, ApiResult, DETAILS_TTL, EXPAND_TTL, SEARCH_TTL};
pub use debounce::{Debouncer, DEFAULT_DELAY};
pub use types::{EntityDetails, ExpandResponse, RelationshipEndpoint, SearchHit, WireRelationship};
