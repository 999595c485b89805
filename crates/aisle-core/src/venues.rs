use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// One harvestable storefront from `config/venues.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueConfig {
    pub name: String,
    /// Upstream venue slug; addresses the assortment endpoints directly, so it
    /// is configured rather than derived from the name.
    pub slug: String,
    /// Overrides the process-wide default language for this venue.
    pub language: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Overrides the default sweep query list for this venue.
    pub sweep_queries: Option<Vec<String>>,
    pub notes: Option<String>,
}

fn default_enabled() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct VenuesFile {
    pub venues: Vec<VenueConfig>,
}

impl VenuesFile {
    /// Venues eligible for a harvest run, in file order.
    #[must_use]
    pub fn enabled_venues(&self) -> Vec<&VenueConfig> {
        self.venues.iter().filter(|v| v.enabled).collect()
    }
}

/// Load and validate the venues configuration from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_venues(path: &Path) -> Result<VenuesFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::VenuesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let venues_file: VenuesFile =
        serde_yaml::from_str(&content).map_err(ConfigError::VenuesFileParse)?;

    validate_venues(&venues_file)?;

    Ok(venues_file)
}

fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
}

fn validate_venues(venues_file: &VenuesFile) -> Result<(), ConfigError> {
    let mut seen_names = HashSet::new();
    let mut seen_slugs = HashSet::new();

    for venue in &venues_file.venues {
        if venue.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "venue name must be non-empty".to_string(),
            ));
        }

        if !is_valid_slug(&venue.slug) {
            return Err(ConfigError::Validation(format!(
                "venue '{}' has invalid slug '{}'; expected lowercase ascii, digits, '-' or '_'",
                venue.name, venue.slug
            )));
        }

        let lower_name = venue.name.to_lowercase();
        if !seen_names.insert(lower_name) {
            return Err(ConfigError::Validation(format!(
                "duplicate venue name: '{}'",
                venue.name
            )));
        }

        if !seen_slugs.insert(venue.slug.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate venue slug: '{}' (from venue '{}')",
                venue.slug, venue.name
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_venue(name: &str, slug: &str) -> VenueConfig {
        VenueConfig {
            name: name.to_string(),
            slug: slug.to_string(),
            language: None,
            enabled: true,
            sweep_queries: None,
            notes: None,
        }
    }

    #[test]
    fn validate_accepts_valid_venues() {
        let venues_file = VenuesFile {
            venues: vec![
                make_venue("Bravo Storefront", "bravo-storefront"),
                make_venue("Araz Market", "araz-market"),
            ],
        };
        assert!(validate_venues(&venues_file).is_ok());
    }

    #[test]
    fn validate_rejects_empty_name() {
        let venues_file = VenuesFile {
            venues: vec![make_venue("  ", "bravo-storefront")],
        };
        let err = validate_venues(&venues_file).unwrap_err();
        assert!(err.to_string().contains("non-empty"));
    }

    #[test]
    fn validate_rejects_invalid_slug() {
        let venues_file = VenuesFile {
            venues: vec![make_venue("Bravo", "Bravo Storefront!")],
        };
        let err = validate_venues(&venues_file).unwrap_err();
        assert!(err.to_string().contains("invalid slug"));
    }

    #[test]
    fn validate_rejects_duplicate_name() {
        let venues_file = VenuesFile {
            venues: vec![
                make_venue("Bravo", "bravo-storefront"),
                make_venue("bravo", "bravo-express"),
            ],
        };
        let err = validate_venues(&venues_file).unwrap_err();
        assert!(err.to_string().contains("duplicate venue name"));
    }

    #[test]
    fn validate_rejects_duplicate_slug() {
        let venues_file = VenuesFile {
            venues: vec![
                make_venue("Bravo One", "bravo-storefront"),
                make_venue("Bravo Two", "bravo-storefront"),
            ],
        };
        let err = validate_venues(&venues_file).unwrap_err();
        assert!(err.to_string().contains("duplicate venue slug"));
    }

    #[test]
    fn enabled_defaults_to_true_when_omitted() {
        let yaml = "venues:\n  - name: Bravo Storefront\n    slug: bravo-storefront\n";
        let venues_file: VenuesFile = serde_yaml::from_str(yaml).unwrap();
        assert!(venues_file.venues[0].enabled);
    }

    #[test]
    fn enabled_venues_filters_disabled_entries() {
        let mut disabled = make_venue("Araz Market", "araz-market");
        disabled.enabled = false;
        let venues_file = VenuesFile {
            venues: vec![make_venue("Bravo", "bravo-storefront"), disabled],
        };
        let enabled = venues_file.enabled_venues();
        assert_eq!(enabled.len(), 1);
        assert_eq!(enabled[0].slug, "bravo-storefront");
    }

    #[test]
    fn load_venues_from_real_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("config")
            .join("venues.yaml");
        assert!(
            path.exists(),
            "venues.yaml missing at {path:?} — required for this test"
        );
        let result = load_venues(&path);
        assert!(result.is_ok(), "failed to load venues.yaml: {result:?}");
        let venues_file = result.unwrap();
        assert!(!venues_file.venues.is_empty());
    }
}
