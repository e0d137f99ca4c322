//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize, ADTECH_URL / ADVERTISER_URL overrides)
//!     → validation.rs (semantic checks)
//!     → AdtechConfig (validated, immutable)
//!     → shared via Arc to the header builder and handlers
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_from_env, ConfigError};
pub use schema::AdtechConfig;
pub use schema::ListenerConfig;
pub use schema::LogFormat;
pub use schema::MeasurementConfig;
pub use schema::ObservabilityConfig;
pub use schema::OriginsConfig;
