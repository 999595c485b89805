use crate::app_config::AppConfig;
use crate::ConfigError;

/// Loads the harvest configuration from the process environment.
///
/// A `.env` file is read first via `dotenvy`, and every `AISLE_*` variable
/// falls back to a built-in default when unset.
///
/// # Errors
///
/// Returns `ConfigError` when a variable is set but does not parse or
/// fails validation.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Loads the harvest configuration without touching `.env` files.
///
/// For callers that have already prepared the environment, such as the
/// CLI after its own `dotenv` call.
///
/// # Errors
///
/// Returns `ConfigError` when a variable is set but does not parse or
/// fails validation.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Parses and validates a configuration out of `lookup`.
///
/// Keeping the environment behind a closure lets the tests below feed a
/// plain map instead of mutating real process state.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let api_base_url = or_default("AISLE_API_BASE_URL", "https://consumer-api.wolt.com");
    let user_agent = or_default(
        "AISLE_USER_AGENT",
        "Mozilla/5.0 (iPhone; CPU iPhone OS 16_0 like Mac OS X) AppleWebKit/605.1.15",
    );
    let log_level = or_default("AISLE_LOG_LEVEL", "info");
    let venues_path = PathBuf::from(or_default("AISLE_VENUES_FILE", "./config/venues.yaml"));
    let output_dir = PathBuf::from(or_default("AISLE_OUTPUT_DIR", "data"));
    let language = or_default("AISLE_LANGUAGE", "az");

    let page_cap = parse_usize("AISLE_PAGE_CAP", "500")?;
    if page_cap == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "AISLE_PAGE_CAP".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    let request_timeout_secs = parse_u64("AISLE_REQUEST_TIMEOUT_SECS", "30")?;
    let inter_request_delay_ms = parse_u64("AISLE_INTER_REQUEST_DELAY_MS", "300")?;
    let sweep_delay_ms = parse_u64("AISLE_SWEEP_DELAY_MS", "500")?;
    let max_retries = parse_u32("AISLE_MAX_RETRIES", "3")?;
    let retry_backoff_base_secs = parse_u64("AISLE_RETRY_BACKOFF_BASE_SECS", "2")?;

    Ok(AppConfig {
        api_base_url,
        user_agent,
        log_level,
        venues_path,
        output_dir,
        language,
        page_cap,
        request_timeout_secs,
        inter_request_delay_ms,
        sweep_delay_ms,
        max_retries,
        retry_backoff_base_secs,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| match map.get(key) {
            Some(value) => Ok((*value).to_string()),
            None => Err(VarError::NotPresent),
        }
    }

    #[test]
    fn build_app_config_succeeds_with_empty_env() {
        let map: HashMap<&str, &str> = HashMap::new();
        let result = build_app_config(lookup_from_map(&map));
        assert!(result.is_ok(), "expected Ok, got: {result:?}");
        let cfg = result.unwrap();
        assert_eq!(cfg.api_base_url, "https://consumer-api.wolt.com");
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.language, "az");
        assert_eq!(cfg.page_cap, 500);
        assert_eq!(cfg.request_timeout_secs, 30);
        assert_eq!(cfg.inter_request_delay_ms, 300);
        assert_eq!(cfg.sweep_delay_ms, 500);
        assert_eq!(cfg.max_retries, 3);
        assert_eq!(cfg.retry_backoff_base_secs, 2);
        assert_eq!(cfg.venues_path.to_string_lossy(), "./config/venues.yaml");
        assert_eq!(cfg.output_dir.to_string_lossy(), "data");
    }

    #[test]
    fn build_app_config_base_url_override() {
        let mut map = HashMap::new();
        map.insert("AISLE_API_BASE_URL", "http://127.0.0.1:9999");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.api_base_url, "http://127.0.0.1:9999");
    }

    #[test]
    fn build_app_config_language_override() {
        let mut map = HashMap::new();
        map.insert("AISLE_LANGUAGE", "en");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.language, "en");
    }

    #[test]
    fn build_app_config_page_cap_override() {
        let mut map = HashMap::new();
        map.insert("AISLE_PAGE_CAP", "250");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.page_cap, 250);
    }

    #[test]
    fn build_app_config_page_cap_zero_rejected() {
        let mut map = HashMap::new();
        map.insert("AISLE_PAGE_CAP", "0");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "AISLE_PAGE_CAP"),
            "expected InvalidEnvVar(AISLE_PAGE_CAP), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_page_cap_invalid() {
        let mut map = HashMap::new();
        map.insert("AISLE_PAGE_CAP", "not-a-number");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "AISLE_PAGE_CAP"),
            "expected InvalidEnvVar(AISLE_PAGE_CAP), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_request_timeout_override() {
        let mut map = HashMap::new();
        map.insert("AISLE_REQUEST_TIMEOUT_SECS", "60");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.request_timeout_secs, 60);
    }

    #[test]
    fn build_app_config_request_timeout_invalid() {
        let mut map = HashMap::new();
        map.insert("AISLE_REQUEST_TIMEOUT_SECS", "soon");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "AISLE_REQUEST_TIMEOUT_SECS"),
            "expected InvalidEnvVar(AISLE_REQUEST_TIMEOUT_SECS), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_inter_request_delay_override() {
        let mut map = HashMap::new();
        map.insert("AISLE_INTER_REQUEST_DELAY_MS", "50");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.inter_request_delay_ms, 50);
    }

    #[test]
    fn build_app_config_inter_request_delay_invalid() {
        let mut map = HashMap::new();
        map.insert("AISLE_INTER_REQUEST_DELAY_MS", "fast");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "AISLE_INTER_REQUEST_DELAY_MS"),
            "expected InvalidEnvVar(AISLE_INTER_REQUEST_DELAY_MS), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_max_retries_override() {
        let mut map = HashMap::new();
        map.insert("AISLE_MAX_RETRIES", "0");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.max_retries, 0);
    }

    #[test]
    fn build_app_config_max_retries_invalid() {
        let mut map = HashMap::new();
        map.insert("AISLE_MAX_RETRIES", "never");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "AISLE_MAX_RETRIES"),
            "expected InvalidEnvVar(AISLE_MAX_RETRIES), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_retry_backoff_invalid() {
        let mut map = HashMap::new();
        map.insert("AISLE_RETRY_BACKOFF_BASE_SECS", "n/a");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "AISLE_RETRY_BACKOFF_BASE_SECS"),
            "expected InvalidEnvVar(AISLE_RETRY_BACKOFF_BASE_SECS), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_paths_override() {
        let mut map = HashMap::new();
        map.insert("AISLE_VENUES_FILE", "/etc/aisle/venues.yaml");
        map.insert("AISLE_OUTPUT_DIR", "/var/lib/aisle");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.venues_path.to_string_lossy(), "/etc/aisle/venues.yaml");
        assert_eq!(cfg.output_dir.to_string_lossy(), "/var/lib/aisle");
    }

    #[test]
    fn build_app_config_user_agent_override() {
        let mut map = HashMap::new();
        map.insert("AISLE_USER_AGENT", "custom-agent/2.0");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.user_agent, "custom-agent/2.0");
    }
}
