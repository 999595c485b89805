use std::path::PathBuf;

/// Process-wide configuration assembled from `AISLE_*` environment variables.
///
/// Per-venue values (language override, sweep queries) live in the venues
/// file; this struct carries the defaults and the transport/pacing knobs.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub user_agent: String,
    pub log_level: String,
    pub venues_path: PathBuf,
    /// Root directory the dataset sink writes under, one subdirectory per venue.
    pub output_dir: PathBuf,
    /// Default item locale; a venue entry may override it.
    pub language: String,
    /// Upstream page cap: Suspect threshold and search request limit.
    pub page_cap: usize,
    pub request_timeout_secs: u64,
    pub inter_request_delay_ms: u64,
    pub sweep_delay_ms: u64,
    /// Transport retry budget for transient failures; the harvest itself
    /// never retries a category.
    pub max_retries: u32,
    pub retry_backoff_base_secs: u64,
}
