//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::AdtechConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Overrides `origins.adtech_url`.
pub const ADTECH_URL_ENV: &str = "ADTECH_URL";

/// Overrides `origins.advertiser_url`.
pub const ADVERTISER_URL_ENV: &str = "ADVERTISER_URL";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Apply environment overrides using the given lookup.
pub fn apply_env_overrides<F>(config: &mut AdtechConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ADTECH_URL_ENV).filter(|v| !v.is_empty()) {
        config.origins.adtech_url = url;
    }
    if let Some(url) = lookup(ADVERTISER_URL_ENV).filter(|v| !v.is_empty()) {
        config.origins.advertiser_url = url;
    }
}

fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Load a TOML file, apply environment overrides and validate.
pub fn load_config(path: &Path) -> Result<AdtechConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let mut config: AdtechConfig = toml::from_str(&content)?;

    apply_env_overrides(&mut config, process_env);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Defaults plus environment overrides, validated. Used when no file is given.
pub fn load_from_env() -> Result<AdtechConfig, ConfigError> {
    let mut config = AdtechConfig::default();

    apply_env_overrides(&mut config, process_env);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_env_overrides() {
        let mut config = AdtechConfig::default();
        apply_env_overrides(&mut config, |key| match key {
            ADTECH_URL_ENV => Some("https://adtech.example".to_string()),
            ADVERTISER_URL_ENV => Some(String::new()),
            _ => None,
        });

        assert_eq!(config.origins.adtech_url, "https://adtech.example");
        // Empty values are ignored.
        assert_eq!(config.origins.advertiser_url, "http://localhost:8086");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [listener]
            bind_address = "127.0.0.1:9999"

            [measurement]
            campaign_id = 99
            "#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:9999");
        assert_eq!(config.measurement.campaign_id, 99);
        assert_eq!(config.measurement.geo_id, 7);
    }

    #[test]
    fn test_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[listener\nbind_address = ").unwrap();

        assert!(matches!(load_config(file.path()), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_validation_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[reports]\ncapacity = 0").unwrap();

        let err = load_config(file.path()).unwrap_err();
        assert!(err.to_string().contains("reports.capacity"));
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/nonexistent/adtech.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
