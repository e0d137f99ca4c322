//! Received attribution reports.
//!
//! The browser posts event-level, aggregatable and debug reports to the
//! well-known endpoints. Each one is logged and kept in a bounded in-memory
//! log so `GET /reports` can show what arrived. Nothing is persisted.

pub mod store;
pub mod types;

pub use store::ReportStore;
pub use types::{ReceivedReport, ReportKind};
