//! Core domain types and configuration for the aisle workspace: categories,
//! products, harvest statistics, and the env/YAML configuration surface.

pub mod app_config;
pub mod categories;
pub mod config;
pub mod options;
pub mod products;
pub mod report;
pub mod venues;

use thiserror::Error;

pub use app_config::AppConfig;
pub use categories::Category;
pub use config::{load_app_config, load_app_config_from_env};
pub use options::{default_sweep_queries, HarvestOptions};
pub use products::{Product, Provenance};
pub use report::{
    CategoryStat, CompletenessVerdict, FailedCategory, FetchOutcome, FlaggedCategory,
    HarvestReport, SweepStat,
};
pub use venues::{load_venues, VenueConfig, VenuesFile};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read venues file {path}: {source}")]
    VenuesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse venues file: {0}")]
    VenuesFileParse(serde_yaml::Error),

    #[error("invalid venues config: {0}")]
    Validation(String),
}
