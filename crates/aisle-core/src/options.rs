use std::time::Duration;

use crate::app_config::AppConfig;
use crate::venues::VenueConfig;

/// Sweep queries used when a venue does not configure its own. Broad on
/// purpose: a space and a wildcard first, then high-frequency single letters.
pub const DEFAULT_SWEEP_QUERIES: [&str; 10] =
    [" ", "*", "a", "b", "c", "d", "e", "s", "m", "k"];

#[must_use]
pub fn default_sweep_queries() -> Vec<String> {
    DEFAULT_SWEEP_QUERIES.iter().map(|q| (*q).to_string()).collect()
}

/// Resolved invocation parameters for one harvest run against one venue.
#[derive(Debug, Clone)]
pub struct HarvestOptions {
    pub venue_slug: String,
    pub venue_name: String,
    /// Language variant requested for category and item payloads.
    pub language: String,
    /// Threshold for the Suspect verdict; also the search request limit.
    pub page_cap: usize,
    /// Minimum spacing between successive category fetches.
    pub request_delay: Duration,
    /// Minimum spacing between successive sweep queries.
    pub sweep_delay: Duration,
    /// Broad queries for the discovery sweep, in issue order.
    pub sweep_queries: Vec<String>,
}

impl HarvestOptions {
    /// Merge process-wide config with one venue's overrides.
    #[must_use]
    pub fn for_venue(config: &AppConfig, venue: &VenueConfig) -> Self {
        HarvestOptions {
            venue_slug: venue.slug.clone(),
            venue_name: venue.name.clone(),
            language: venue
                .language
                .clone()
                .unwrap_or_else(|| config.language.clone()),
            page_cap: config.page_cap,
            request_delay: Duration::from_millis(config.inter_request_delay_ms),
            sweep_delay: Duration::from_millis(config.sweep_delay_ms),
            sweep_queries: venue
                .sweep_queries
                .clone()
                .unwrap_or_else(default_sweep_queries),
        }
    }
}
