//! Registration header assembly.
//!
//! # Responsibilities
//! - Build the source registration for ad clicks and views
//! - Build the trigger registration for conversions
//! - Apply the priority and deduplication gates
//! - Attach aggregatable data to purchases only
//!
//! # Design Decisions
//! - Settings are copied from `AdtechConfig` once; the builder is immutable
//! - Source event ids come from `fastrand`: fine for a demo, not unpredictable

use std::collections::BTreeMap;

use crate::config::AdtechConfig;
use crate::config::MeasurementConfig;
use crate::measurement::key_piece::KeyPiece;
use crate::measurement::params::{SourceParams, TriggerParams};
use crate::measurement::types::{
    AggregatableTriggerData, EventTrigger, SourceRegistration, TriggerRegistration,
    ValidationError, ValidationResult, PRODUCT_TYPE_FILTER, PURCHASE_COUNT_KEY,
    PURCHASE_VALUE_KEY,
};

/// Upper bound (exclusive) for random source event ids.
pub const MAX_SOURCE_EVENT_ID: u64 = 1_000_000_000_000_000;

/// Builds registration headers from request parameters.
#[derive(Debug, Clone)]
pub struct HeaderBuilder {
    destination: String,
    settings: MeasurementConfig,
}

impl HeaderBuilder {
    pub fn new(destination: impl Into<String>, settings: MeasurementConfig) -> Self {
        Self {
            destination: destination.into(),
            settings,
        }
    }

    pub fn from_config(config: &AdtechConfig) -> Self {
        Self::new(config.origins.advertiser_url.clone(), config.measurement.clone())
    }

    /// Source registration with a fresh random event id.
    pub fn build_source(&self, params: &SourceParams) -> SourceRegistration {
        self.build_source_with_event_id(fastrand::u64(0..MAX_SOURCE_EVENT_ID), params)
    }

    /// Source registration with a caller-chosen event id.
    pub fn build_source_with_event_id(
        &self,
        source_event_id: u64,
        params: &SourceParams,
    ) -> SourceRegistration {
        let filter_data = BTreeMap::from([(
            PRODUCT_TYPE_FILTER.to_string(),
            vec![self.settings.filter_category.clone()],
        )]);

        let aggregation_keys = BTreeMap::from([
            (
                PURCHASE_COUNT_KEY.to_string(),
                KeyPiece::source(&self.source_key_input("COUNT")),
            ),
            (
                PURCHASE_VALUE_KEY.to_string(),
                KeyPiece::source(&self.source_key_input("VALUE")),
            ),
        ]);

        SourceRegistration {
            source_event_id,
            destination: self.destination.clone(),
            expiry: self.settings.source_expiry_secs,
            debug_key: params.debug_key.clone(),
            filter_data,
            aggregation_keys,
            debug_reporting: self.settings.debug_reporting,
        }
    }

    /// Trigger registration for a validated conversion.
    pub fn build_trigger(&self, params: &TriggerParams) -> ValidationResult<TriggerRegistration> {
        let conversion = params.conversion_type;

        let filters = BTreeMap::from([(
            PRODUCT_TYPE_FILTER.to_string(),
            vec![params.product_category.clone()],
        )]);

        let deduplication_key = params
            .purchase_id
            .clone()
            .filter(|_| params.use_deduplication);

        let event_trigger = EventTrigger {
            trigger_data: conversion.trigger_data(),
            priority: params
                .use_priorities
                .then(|| conversion.priority(true)),
            deduplication_key,
        };

        let mut registration = TriggerRegistration {
            filters,
            event_trigger_data: vec![event_trigger],
            debug_key: params.debug_key.clone(),
            debug_reporting: self.settings.debug_reporting,
            aggregatable_trigger_data: None,
            aggregatable_values: None,
        };

        if conversion.is_purchase() {
            let purchase_value = params
                .purchase_value
                .ok_or(ValidationError::MissingParameter("purchase-value"))?;

            registration.aggregatable_trigger_data = Some(vec![AggregatableTriggerData {
                key_piece: KeyPiece::trigger(&format!(
                    "ProductCategory={}",
                    params.product_category
                )),
                source_keys: vec![PURCHASE_COUNT_KEY.to_string(), PURCHASE_VALUE_KEY.to_string()],
            }]);
            registration.aggregatable_values = Some(self.aggregatable_values(purchase_value)?);
        }

        Ok(registration)
    }

    fn source_key_input(&self, measure: &str) -> String {
        format!(
            "{}, CampaignID={}, GeoID={}",
            measure, self.settings.campaign_id, self.settings.geo_id
        )
    }

    fn aggregatable_values(&self, purchase_value: u64) -> ValidationResult<BTreeMap<String, u64>> {
        let scaled_value = purchase_value
            .checked_mul(self.settings.purchase_value_scale)
            .ok_or(ValidationError::PurchaseValueOverflow(purchase_value))?;

        Ok(BTreeMap::from([
            (PURCHASE_COUNT_KEY.to_string(), self.settings.purchase_count_scale),
            (PURCHASE_VALUE_KEY.to_string(), scaled_value),
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurement::conversion::ConversionType;
    use crate::measurement::key_piece::{source_key_piece, trigger_key_piece};
    use crate::measurement::types::RegistrationHeader;
    use serde_json::json;

    fn builder() -> HeaderBuilder {
        HeaderBuilder::new("https://advertiser.example", MeasurementConfig::default())
    }

    fn checkout() -> TriggerParams {
        TriggerParams {
            conversion_type: ConversionType::CheckoutCompleted,
            product_category: "shoes".into(),
            purchase_value: Some(50),
            use_priorities: true,
            purchase_id: Some("ABC".into()),
            use_deduplication: true,
            debug_key: Some("777".into()),
        }
    }

    #[test]
    fn test_source_registration() {
        let params = SourceParams {
            debug_key: Some("12345".into()),
        };
        let source = builder().build_source_with_event_id(42, &params);

        assert_eq!(
            serde_json::to_value(&source).unwrap(),
            json!({
                "source_event_id": "42",
                "destination": "https://advertiser.example",
                "expiry": "604800",
                "debug_key": "12345",
                "filter_data": { "conversion_product_type": ["category_1"] },
                "aggregation_keys": {
                    "purchaseCount": source_key_piece("COUNT, CampaignID=12, GeoID=7"),
                    "purchaseValue": source_key_piece("VALUE, CampaignID=12, GeoID=7"),
                },
                "debug_reporting": true,
            })
        );
    }

    #[test]
    fn test_source_without_cookie_has_no_debug_key() {
        let source = builder().build_source(&SourceParams::default());
        assert_eq!(source.debug_key, None);
        assert!(!source.to_header_json().unwrap().contains("debug_key"));
    }

    #[test]
    fn test_source_event_id_in_range() {
        let b = builder();
        for _ in 0..100 {
            let source = b.build_source(&SourceParams::default());
            assert!(source.source_event_id < MAX_SOURCE_EVENT_ID);
        }
    }

    #[test]
    fn test_source_keys_follow_campaign_settings() {
        let settings = MeasurementConfig {
            campaign_id: 3,
            geo_id: 44,
            ..MeasurementConfig::default()
        };
        let source = HeaderBuilder::new("https://a.example", settings)
            .build_source(&SourceParams::default());

        assert_eq!(
            source.aggregation_keys[PURCHASE_COUNT_KEY].to_string(),
            source_key_piece("COUNT, CampaignID=3, GeoID=44")
        );
    }

    #[test]
    fn test_checkout_trigger() {
        let trigger = builder().build_trigger(&checkout()).unwrap();

        assert_eq!(
            serde_json::to_value(&trigger).unwrap(),
            json!({
                "filters": { "conversion_product_type": ["shoes"] },
                "event_trigger_data": [
                    { "trigger_data": "1", "priority": "100", "deduplication_key": "ABC" }
                ],
                "debug_key": "777",
                "debug_reporting": true,
                "aggregatable_trigger_data": [
                    {
                        "key_piece": trigger_key_piece("ProductCategory=shoes"),
                        "source_keys": ["purchaseCount", "purchaseValue"],
                    }
                ],
                "aggregatable_values": { "purchaseCount": 32768, "purchaseValue": 1100 },
            })
        );
    }

    #[test]
    fn test_dedup_requires_flag_and_key() {
        let params = TriggerParams {
            use_deduplication: false,
            ..checkout()
        };
        let trigger = builder().build_trigger(&params).unwrap();
        assert_eq!(trigger.event_trigger_data[0].deduplication_key, None);

        let params = TriggerParams {
            purchase_id: None,
            ..checkout()
        };
        let trigger = builder().build_trigger(&params).unwrap();
        assert_eq!(trigger.event_trigger_data[0].deduplication_key, None);
    }

    #[test]
    fn test_priority_only_when_enabled() {
        let params = TriggerParams {
            use_priorities: false,
            ..checkout()
        };
        let trigger = builder().build_trigger(&params).unwrap();
        assert_eq!(trigger.event_trigger_data[0].priority, None);

        let params = TriggerParams {
            conversion_type: ConversionType::AddToCart,
            purchase_value: None,
            ..checkout()
        };
        let trigger = builder().build_trigger(&params).unwrap();
        assert_eq!(trigger.event_trigger_data[0].priority, Some(0));
    }

    #[test]
    fn test_non_purchase_has_no_aggregatable_data() {
        let params = TriggerParams {
            conversion_type: ConversionType::SignupNewsletter,
            purchase_value: None,
            debug_key: None,
            ..checkout()
        };
        let trigger = builder().build_trigger(&params).unwrap();
        let json = trigger.to_header_json().unwrap();

        assert_eq!(trigger.event_trigger_data[0].trigger_data, 4);
        assert!(!json.contains("aggregatable_trigger_data"));
        assert!(!json.contains("aggregatable_values"));
        assert!(!json.contains("debug_key"));
    }

    #[test]
    fn test_purchase_without_value_is_rejected() {
        let params = TriggerParams {
            purchase_value: None,
            ..checkout()
        };
        assert_eq!(
            builder().build_trigger(&params).unwrap_err(),
            ValidationError::MissingParameter("purchase-value")
        );
    }

    #[test]
    fn test_purchase_value_overflow() {
        let params = TriggerParams {
            purchase_value: Some(u64::MAX),
            ..checkout()
        };
        assert_eq!(
            builder().build_trigger(&params).unwrap_err(),
            ValidationError::PurchaseValueOverflow(u64::MAX)
        );
    }

    #[test]
    fn test_source_and_trigger_keys_combine() {
        let source = builder().build_source(&SourceParams::default());
        let trigger = builder().build_trigger(&checkout()).unwrap();

        let source_piece = source.aggregation_keys[PURCHASE_VALUE_KEY];
        let trigger_piece = trigger.aggregatable_trigger_data.unwrap()[0].key_piece;
        let key = source_piece.combine(trigger_piece);

        assert_eq!(key.high(), source_piece.high());
        assert_eq!(key.low(), trigger_piece.low());
    }
}
