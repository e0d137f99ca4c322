//! Report kinds and the record kept for each received report.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reports the browser sends to `/.well-known/attribution-reporting/...`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    EventLevel,
    EventLevelDebug,
    Aggregate,
    AggregateDebug,
    Verbose,
}

impl ReportKind {
    pub const ALL: [ReportKind; 5] = [
        ReportKind::EventLevel,
        ReportKind::EventLevelDebug,
        ReportKind::Aggregate,
        ReportKind::AggregateDebug,
        ReportKind::Verbose,
    ];

    /// Intake path for this kind.
    pub fn path(self) -> &'static str {
        match self {
            ReportKind::EventLevel => "/.well-known/attribution-reporting/report-event-attribution",
            ReportKind::EventLevelDebug => {
                "/.well-known/attribution-reporting/debug/report-event-attribution"
            }
            ReportKind::Aggregate => {
                "/.well-known/attribution-reporting/report-aggregate-attribution"
            }
            ReportKind::AggregateDebug => {
                "/.well-known/attribution-reporting/debug/report-aggregate-attribution"
            }
            ReportKind::Verbose => "/.well-known/attribution-reporting/debug/verbose",
        }
    }

    pub fn is_debug(self) -> bool {
        matches!(
            self,
            ReportKind::EventLevelDebug | ReportKind::AggregateDebug | ReportKind::Verbose
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReportKind::EventLevel => "event_level",
            ReportKind::EventLevelDebug => "event_level_debug",
            ReportKind::Aggregate => "aggregate",
            ReportKind::AggregateDebug => "aggregate_debug",
            ReportKind::Verbose => "verbose",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A report as received, with intake metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceivedReport {
    pub id: Uuid,
    pub kind: ReportKind,
    /// Unix time in milliseconds.
    pub received_at_ms: u64,
    /// Parsed JSON body, or the raw body as a string if it was not JSON.
    pub body: serde_json::Value,
}

impl ReceivedReport {
    pub fn new(kind: ReportKind, body: serde_json::Value) -> Self {
        let received_at_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;

        Self {
            id: Uuid::new_v4(),
            kind,
            received_at_ms,
            body,
        }
    }

    /// Build from raw bytes; never fails.
    pub fn from_bytes(kind: ReportKind, bytes: &[u8]) -> Self {
        let body = serde_json::from_slice(bytes).unwrap_or_else(|_| {
            serde_json::Value::String(String::from_utf8_lossy(bytes).into_owned())
        });
        Self::new(kind, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_paths_are_well_known() {
        for kind in ReportKind::ALL {
            assert!(kind.path().starts_with("/.well-known/attribution-reporting/"));
        }
        assert!(ReportKind::Verbose.is_debug());
        assert!(!ReportKind::Aggregate.is_debug());
    }

    #[test]
    fn test_json_body_is_parsed() {
        let report = ReceivedReport::from_bytes(
            ReportKind::EventLevel,
            br#"{"source_event_id":"42","trigger_data":"1"}"#,
        );
        assert_eq!(report.body, json!({ "source_event_id": "42", "trigger_data": "1" }));
        assert!(report.received_at_ms > 0);
    }

    #[test]
    fn test_non_json_body_is_kept_as_string() {
        let report = ReceivedReport::from_bytes(ReportKind::Verbose, b"not json");
        assert_eq!(report.body, json!("not json"));
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(ReportKind::AggregateDebug).unwrap(),
            json!("aggregate_debug")
        );
        assert_eq!(ReportKind::AggregateDebug.to_string(), "aggregate_debug");
    }
}
