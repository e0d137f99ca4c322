//! Attribution registration headers.
//!
//! # Data Flow
//! ```text
//! /register-source-*  → SourceParams (cookie)        ┐
//!                                                    ├→ builder.rs → JSON header
//! /conversion         → TriggerQuery → TriggerParams ┘
//!                        (params.rs validates)
//!
//! key_piece.rs: SHA-256 → 64-bit hash → source (high) / trigger (low) half
//! conversion.rs: conversion type → trigger data, priority
//! ```
//!
//! # Design Decisions
//! - Pure functions; no I/O and no shared state
//! - Absent optional fields are omitted from the JSON

pub mod builder;
pub mod conversion;
pub mod key_piece;
pub mod params;
pub mod types;

pub use builder::HeaderBuilder;
pub use conversion::ConversionType;
pub use key_piece::{hash_as_64bit_hex, source_key_piece, trigger_key_piece, KeyPiece, KeySide};
pub use params::{SourceParams, TriggerParams, TriggerQuery};
pub use types::{
    RegistrationHeader, SourceRegistration, TriggerRegistration, ValidationError,
    REGISTER_SOURCE_HEADER, REGISTER_TRIGGER_HEADER,
};
