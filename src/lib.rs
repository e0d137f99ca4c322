//! Attribution Reporting ad-tech demo server library.
//!
//! Registers sources and triggers through the
//! `Attribution-Reporting-Register-*` response headers, issues measurement
//! cookies, serves demo ads and logs the reports browsers send back.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod measurement;
pub mod observability;
pub mod reports;

pub use config::AdtechConfig;
pub use http::AdtechServer;
pub use lifecycle::Shutdown;
pub use measurement::HeaderBuilder;
