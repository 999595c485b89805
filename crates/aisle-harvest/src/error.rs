//! Error types for the harvest engine.

use thiserror::Error;

use crate::sink::SinkError;

/// Errors that can occur while harvesting a venue's assortment.
#[derive(Debug, Error)]
pub enum HarvestError {
    /// Network-level HTTP failure (connection refused, timeout, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body was received but could not be parsed as the
    /// expected JSON shape.
    #[error("failed to deserialize {context}: {source}")]
    Deserialize {
        /// What was being parsed, e.g. `"venue assortment"`.
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// HTTP 429 from the API.
    #[error("rate limited by {domain}, retry after {retry_after_secs}s")]
    RateLimited {
        domain: String,
        /// Seconds from the `Retry-After` header, or 60 if absent.
        retry_after_secs: u64,
    },

    /// HTTP 404. For category item listings this is an expected condition
    /// and the caller maps it to an empty result instead of failing.
    #[error("resource not found (404): {url}")]
    NotFound { url: String },

    /// Any other non-success HTTP status.
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// Writing a finished dataset failed. Always fatal to the run.
    #[error("failed to persist dataset `{name}`: {source}")]
    Persist {
        name: String,
        #[source]
        source: SinkError,
    },
}

impl HarvestError {
    /// True for the 404 case that category fetches treat as "no listing"
    /// rather than as a failure.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, HarvestError::NotFound { .. })
    }
}
