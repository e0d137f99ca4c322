//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Origins must be absolute http(s) URLs
//! - Bind addresses must parse as socket addresses
//! - Scaling factors, expiry and capacities must be non-zero
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AdtechConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::AdtechConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid URL `{value}`")]
    InvalidUrl { field: &'static str, value: String },

    #[error("{field}: invalid socket address `{value}`")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("{field} must not be empty")]
    Empty { field: &'static str },
}

fn check_url(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    let valid = Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
        .unwrap_or(false);
    if !valid {
        errors.push(ValidationError::InvalidUrl {
            field,
            value: value.to_string(),
        });
    }
}

fn check_address(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

fn check_non_zero(field: &'static str, value: u64, errors: &mut Vec<ValidationError>) {
    if value == 0 {
        errors.push(ValidationError::Zero { field });
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &AdtechConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address("listener.bind_address", &config.listener.bind_address, &mut errors);
    check_url("origins.adtech_url", &config.origins.adtech_url, &mut errors);
    check_url("origins.advertiser_url", &config.origins.advertiser_url, &mut errors);

    let m = &config.measurement;
    check_non_zero("measurement.source_expiry_secs", m.source_expiry_secs, &mut errors);
    check_non_zero("measurement.purchase_count_scale", m.purchase_count_scale, &mut errors);
    check_non_zero("measurement.purchase_value_scale", m.purchase_value_scale, &mut errors);
    if m.filter_category.is_empty() {
        errors.push(ValidationError::Empty {
            field: "measurement.filter_category",
        });
    }

    check_non_zero("reports.capacity", config.reports.capacity as u64, &mut errors);
    check_non_zero("timeouts.request_secs", config.timeouts.request_secs, &mut errors);
    check_non_zero("security.max_body_size", config.security.max_body_size as u64, &mut errors);

    if config.observability.metrics_enabled {
        check_address(
            "observability.metrics_address",
            &config.observability.metrics_address,
            &mut errors,
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&AdtechConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = AdtechConfig::default();
        config.origins.advertiser_url = "not a url".into();
        config.listener.bind_address = "localhost".into();
        config.measurement.purchase_value_scale = 0;
        config.reports.capacity = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::Zero {
            field: "measurement.purchase_value_scale"
        }));
        assert!(errors.contains(&ValidationError::Zero {
            field: "reports.capacity"
        }));
    }

    #[test]
    fn test_rejects_non_http_origin() {
        let mut config = AdtechConfig::default();
        config.origins.adtech_url = "ftp://files.example".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::InvalidUrl {
                field: "origins.adtech_url",
                value: "ftp://files.example".into(),
            }]
        );
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = AdtechConfig::default();
        config.observability.metrics_address = "nope".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }
}
