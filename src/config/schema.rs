//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the server.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the ad-tech server.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct AdtechConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Public origins of the ad-tech and advertiser sites.
    pub origins: OriginsConfig,

    /// Registration header settings.
    pub measurement: MeasurementConfig,

    /// In-memory report log.
    pub reports: ReportsConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request limits.
    pub security: SecurityConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8085").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8085".to_string(),
        }
    }
}

/// Origins used in ad markup and registration headers.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct OriginsConfig {
    /// Public URL of this server. Overridden by `ADTECH_URL`.
    pub adtech_url: String,

    /// Advertiser site: source destination and click-through target.
    /// Overridden by `ADVERTISER_URL`.
    pub advertiser_url: String,
}

impl Default for OriginsConfig {
    fn default() -> Self {
        Self {
            adtech_url: "http://localhost:8085".to_string(),
            advertiser_url: "http://localhost:8086".to_string(),
        }
    }
}

/// Settings for the registration headers.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct MeasurementConfig {
    /// Source expiry in seconds (protocol default is 30 days).
    pub source_expiry_secs: u64,

    /// Campaign embedded in the source-side key pieces.
    pub campaign_id: u32,

    /// Geo embedded in the source-side key pieces.
    pub geo_id: u32,

    /// Category registered in the source `filter_data`.
    pub filter_category: String,

    /// Ask the browser for debug reports.
    pub debug_reporting: bool,

    /// Scaling factor for the purchase count (keeps sums in the contribution budget).
    pub purchase_count_scale: u64,

    /// Scaling factor for the purchase value.
    pub purchase_value_scale: u64,
}

impl Default for MeasurementConfig {
    fn default() -> Self {
        Self {
            source_expiry_secs: 604_800, // 7 days
            campaign_id: 12,
            geo_id: 7,
            filter_category: "category_1".to_string(),
            debug_reporting: true,
            purchase_count_scale: 32_768,
            purchase_value_scale: 22,
        }
    }
}

/// Report log configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ReportsConfig {
    /// Maximum reports kept in memory; oldest are evicted first.
    pub capacity: usize,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self { capacity: 1_000 }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Request limits.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum body size in bytes for report intake.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 1024 * 1024, // 1MB
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AdtechConfig::default();
        assert_eq!(config.measurement.source_expiry_secs, 604_800);
        assert_eq!(config.measurement.purchase_count_scale, 32_768);
        assert_eq!(config.measurement.purchase_value_scale, 22);
        assert_eq!(config.measurement.filter_category, "category_1");
        assert!(config.measurement.debug_reporting);
        assert!(!config.observability.metrics_enabled);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: AdtechConfig = toml::from_str(
            r#"
            [origins]
            advertiser_url = "https://shop.example"

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.origins.advertiser_url, "https://shop.example");
        assert_eq!(config.origins.adtech_url, "http://localhost:8085");
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert_eq!(config.measurement, MeasurementConfig::default());
    }
}
