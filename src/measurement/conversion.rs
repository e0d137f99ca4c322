//! Conversion classification.
//!
//! Trigger data for view sources must be 0 or 1 (1 bit); for click sources
//! it must be 0..=7 (3 bits). Anything out of range is dropped by the browser,
//! so only the four known conversion types are accepted.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::measurement::types::ValidationError;

/// Priority assigned to checkouts when prioritization is enabled.
pub const CHECKOUT_PRIORITY: i64 = 100;

/// Kind of conversion reported by the advertiser site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConversionType {
    CheckoutCompleted,
    AddToCart,
    VisitProductPage,
    SignupNewsletter,
}

impl ConversionType {
    pub const ALL: [ConversionType; 4] = [
        ConversionType::CheckoutCompleted,
        ConversionType::AddToCart,
        ConversionType::VisitProductPage,
        ConversionType::SignupNewsletter,
    ];

    /// Event-level trigger data. Checkout is 1 so it is consistent across
    /// clicks and views.
    pub fn trigger_data(self) -> u8 {
        match self {
            ConversionType::CheckoutCompleted => 1,
            ConversionType::AddToCart => 2,
            ConversionType::VisitProductPage => 3,
            ConversionType::SignupNewsletter => 4,
        }
    }

    /// Two-tier priority: checkouts outrank everything else, but only when
    /// prioritization is on.
    pub fn priority(self, use_priorities: bool) -> i64 {
        if use_priorities && self == ConversionType::CheckoutCompleted {
            CHECKOUT_PRIORITY
        } else {
            0
        }
    }

    pub fn is_purchase(self) -> bool {
        self == ConversionType::CheckoutCompleted
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ConversionType::CheckoutCompleted => "checkout-completed",
            ConversionType::AddToCart => "add-to-cart",
            ConversionType::VisitProductPage => "visit-product-page",
            ConversionType::SignupNewsletter => "signup-newsletter",
        }
    }
}

impl fmt::Display for ConversionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConversionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConversionType::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownConversionType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_data_table() {
        assert_eq!(ConversionType::CheckoutCompleted.trigger_data(), 1);
        assert_eq!(ConversionType::AddToCart.trigger_data(), 2);
        assert_eq!(ConversionType::VisitProductPage.trigger_data(), 3);
        assert_eq!(ConversionType::SignupNewsletter.trigger_data(), 4);
    }

    #[test]
    fn test_trigger_data_fits_click_range() {
        for conversion in ConversionType::ALL {
            assert!(conversion.trigger_data() <= 7);
        }
    }

    #[test]
    fn test_priority_disabled_is_always_zero() {
        for conversion in ConversionType::ALL {
            assert_eq!(conversion.priority(false), 0);
        }
    }

    #[test]
    fn test_priority_enabled() {
        assert_eq!(ConversionType::CheckoutCompleted.priority(true), 100);
        assert_eq!(ConversionType::AddToCart.priority(true), 0);
        assert_eq!(ConversionType::VisitProductPage.priority(true), 0);
        assert_eq!(ConversionType::SignupNewsletter.priority(true), 0);
    }

    #[test]
    fn test_parse() {
        for conversion in ConversionType::ALL {
            assert_eq!(conversion.as_str().parse::<ConversionType>().unwrap(), conversion);
        }

        let err = "checkout".parse::<ConversionType>().unwrap_err();
        assert_eq!(err, ValidationError::UnknownConversionType("checkout".into()));
    }

    #[test]
    fn test_serde_names_match_query_values() {
        let json = serde_json::to_string(&ConversionType::VisitProductPage).unwrap();
        assert_eq!(json, "\"visit-product-page\"");
    }
}
