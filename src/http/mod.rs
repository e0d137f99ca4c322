//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID, request span)
//!     → cookies.rs (read __session / ar_debug, issue missing ones)
//!     → ads.rs | registration.rs | reports.rs
//!     → error.rs (validation failures → 400 JSON)
//!     → Send to client
//! ```

pub mod ads;
pub mod cookies;
pub mod error;
pub mod registration;
pub mod reports;
pub mod request;
pub mod server;

pub use cookies::MeasurementCookies;
pub use error::ApiError;
pub use request::{RequestIdExt, X_REQUEST_ID};
pub use server::{AdtechServer, AppState};
