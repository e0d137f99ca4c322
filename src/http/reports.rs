//! Report intake and listing.
//!
//! Intake always answers 200: delivery guarantees belong to the browser, and
//! a report we cannot parse is still worth seeing in the log.

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::http::server::AppState;
use crate::observability::metrics;
use crate::reports::{ReceivedReport, ReportKind};

pub async fn receive_report(kind: ReportKind, state: AppState, body: Bytes) -> StatusCode {
    let report = ReceivedReport::from_bytes(kind, &body);

    tracing::info!(
        kind = %kind,
        report_id = %report.id,
        debug = kind.is_debug(),
        body = %report.body,
        "Report received"
    );
    metrics::record_report(kind);

    state.reports.record(report);
    StatusCode::OK
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportFilter {
    pub kind: Option<ReportKind>,
}

/// All reports received since startup, oldest first. Always an array.
pub async fn list_reports(
    State(state): State<AppState>,
    Query(filter): Query<ReportFilter>,
) -> Json<Vec<ReceivedReport>> {
    let reports = match filter.kind {
        Some(kind) => state.reports.list_kind(kind),
        None => state.reports.list(),
    };
    Json(reports)
}

pub async fn clear_reports(State(state): State<AppState>) -> impl IntoResponse {
    let removed = state.reports.clear();
    tracing::info!(removed, "Report log cleared");
    Json(serde_json::json!({ "removed": removed }))
}
