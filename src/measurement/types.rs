//! Registration header types and validation errors.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::measurement::key_piece::KeyPiece;

/// Response header instructing the browser to register a source.
pub const REGISTER_SOURCE_HEADER: &str = "Attribution-Reporting-Register-Source";

/// Response header instructing the browser to register a trigger.
pub const REGISTER_TRIGGER_HEADER: &str = "Attribution-Reporting-Register-Trigger";

/// Filter key shared by source `filter_data` and trigger `filters`.
pub const PRODUCT_TYPE_FILTER: &str = "conversion_product_type";

/// Source-side aggregation key names.
pub const PURCHASE_COUNT_KEY: &str = "purchaseCount";
pub const PURCHASE_VALUE_KEY: &str = "purchaseValue";

/// Errors raised while turning request parameters into a registration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required query parameter was absent or empty.
    #[error("missing required parameter `{0}`")]
    MissingParameter(&'static str),

    /// Conversion type outside the four known kinds.
    #[error("unknown conversion type `{0}`")]
    UnknownConversionType(String),

    /// Purchase value is not a non-negative integer.
    #[error("purchase value `{0}` is not a non-negative integer")]
    InvalidPurchaseValue(String),

    /// Scaled purchase value does not fit in an aggregatable value.
    #[error("purchase value {0} overflows when scaled")]
    PurchaseValueOverflow(u64),

    /// A value echoed into a registration header contains control characters.
    #[error("parameter `{0}` contains control characters")]
    ControlCharacters(&'static str),
}

/// Result type for registration building.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// The browser expects ids, expiry, trigger data and priority as decimal strings.
fn decimal_string<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: fmt::Display,
    S: Serializer,
{
    serializer.collect_str(value)
}

fn optional_decimal_string<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    T: fmt::Display,
    S: Serializer,
{
    match value {
        Some(v) => serializer.collect_str(v),
        None => serializer.serialize_none(),
    }
}

/// Body of `Attribution-Reporting-Register-Source`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceRegistration {
    #[serde(serialize_with = "decimal_string")]
    pub source_event_id: u64,
    pub destination: String,
    #[serde(serialize_with = "decimal_string")]
    pub expiry: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_key: Option<String>,
    pub filter_data: BTreeMap<String, Vec<String>>,
    pub aggregation_keys: BTreeMap<String, KeyPiece>,
    pub debug_reporting: bool,
}

/// Body of `Attribution-Reporting-Register-Trigger`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TriggerRegistration {
    pub filters: BTreeMap<String, Vec<String>>,
    pub event_trigger_data: Vec<EventTrigger>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_key: Option<String>,
    pub debug_reporting: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregatable_trigger_data: Option<Vec<AggregatableTriggerData>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregatable_values: Option<BTreeMap<String, u64>>,
}

/// Event-level trigger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventTrigger {
    #[serde(serialize_with = "decimal_string")]
    pub trigger_data: u8,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "optional_decimal_string"
    )]
    pub priority: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deduplication_key: Option<String>,
}

/// Adds a trigger-side key piece to each of the named source keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregatableTriggerData {
    pub key_piece: KeyPiece,
    pub source_keys: Vec<String>,
}

/// A registration that travels as a JSON response header.
pub trait RegistrationHeader: Serialize {
    const HEADER_NAME: &'static str;

    fn to_header_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl RegistrationHeader for SourceRegistration {
    const HEADER_NAME: &'static str = REGISTER_SOURCE_HEADER;
}

impl RegistrationHeader for TriggerRegistration {
    const HEADER_NAME: &'static str = REGISTER_TRIGGER_HEADER;
}
