//! Request parameters consumed by the header builder.

use serde::Deserialize;

use crate::measurement::conversion::ConversionType;
use crate::measurement::types::{ValidationError, ValidationResult};

/// Inputs to a source registration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceParams {
    /// Value of the `__session` cookie, reused as the debug key.
    pub debug_key: Option<String>,
}

/// Raw `/conversion` query string.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TriggerQuery {
    pub conversion_type: Option<String>,
    pub product_category: Option<String>,
    pub purchase_value: Option<String>,
    pub prio_checkout: Option<String>,
    pub purchase_id: Option<String>,
    pub dedup: Option<String>,
}

/// Validated inputs to a trigger registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerParams {
    pub conversion_type: ConversionType,
    pub product_category: String,
    /// Only present (and required) for checkouts.
    pub purchase_value: Option<u64>,
    pub use_priorities: bool,
    /// Purchase id, used as the deduplication key when deduplication is on.
    pub purchase_id: Option<String>,
    pub use_deduplication: bool,
    pub debug_key: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Values copied into a response header must stay header-safe.
fn header_safe(value: Option<String>, name: &'static str) -> ValidationResult<Option<String>> {
    match value {
        Some(v) if v.chars().any(char::is_control) => Err(ValidationError::ControlCharacters(name)),
        other => Ok(other),
    }
}

fn flag(value: Option<&str>) -> bool {
    value == Some("true")
}

impl TriggerQuery {
    /// Validate the query and attach the debug key taken from the cookie.
    pub fn validate(self, debug_key: Option<String>) -> ValidationResult<TriggerParams> {
        let conversion_type: ConversionType = non_empty(self.conversion_type)
            .ok_or(ValidationError::MissingParameter("conversion-type"))?
            .parse()?;

        let product_category = header_safe(non_empty(self.product_category), "product-category")?
            .ok_or(ValidationError::MissingParameter("product-category"))?;
        let purchase_id = header_safe(non_empty(self.purchase_id), "purchase-id")?;

        let purchase_value = if conversion_type.is_purchase() {
            let raw = non_empty(self.purchase_value)
                .ok_or(ValidationError::MissingParameter("purchase-value"))?;
            let value = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ValidationError::InvalidPurchaseValue(raw.clone()))?;
            Some(value)
        } else {
            None
        };

        Ok(TriggerParams {
            conversion_type,
            product_category,
            purchase_value,
            use_priorities: flag(self.prio_checkout.as_deref()),
            purchase_id,
            use_deduplication: flag(self.dedup.as_deref()),
            debug_key,
        })
    }
}
