//! Aggregation key pieces.
//!
//! # Responsibilities
//! - Hash a descriptive string down to 64 bits (SHA-256, truncated)
//! - Place the hash in the source-side (high) or trigger-side (low) half
//!   of a 128-bit key
//! - Render keys as `0x`-prefixed, 32-digit lowercase hex
//!
//! # Design Decisions
//! - Source and trigger pieces never share a half, so the browser can OR a
//!   source piece with a trigger piece without either side knowing the
//!   other's input
//! - Stored as `u128` so the OR is a plain bit operation

use std::fmt;

use serde::{Serialize, Serializer};
use sha2::{Digest, Sha256};

/// Which half of the 128-bit key a piece occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySide {
    /// High 64 bits, set at source registration.
    Source,
    /// Low 64 bits, set at trigger registration.
    Trigger,
}

/// Hash `input` with SHA-256 and keep the first 16 hex characters (64 bits).
pub fn hash_as_64bit_hex(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    hex::encode(&digest[..8])
}

fn hash_as_u64(input: &str) -> u64 {
    let digest = Sha256::digest(input.as_bytes());
    let mut high = [0u8; 8];
    high.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(high)
}

/// A 128-bit aggregation key piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyPiece(u128);

impl KeyPiece {
    /// Build a piece for `input` on the given side.
    pub fn generate(side: KeySide, input: &str) -> Self {
        let hash = hash_as_u64(input) as u128;
        match side {
            KeySide::Source => Self(hash << 64),
            KeySide::Trigger => Self(hash),
        }
    }

    /// Source-side piece: hash in the high 64 bits.
    pub fn source(input: &str) -> Self {
        Self::generate(KeySide::Source, input)
    }

    /// Trigger-side piece: hash in the low 64 bits.
    pub fn trigger(input: &str) -> Self {
        Self::generate(KeySide::Trigger, input)
    }

    /// OR two pieces together, as the browser does when it builds the final key.
    pub fn combine(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub fn high(self) -> u64 {
        (self.0 >> 64) as u64
    }

    pub fn low(self) -> u64 {
        self.0 as u64
    }

    pub fn as_u128(self) -> u128 {
        self.0
    }
}

impl fmt::Display for KeyPiece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:032x}", self.0)
    }
}

impl Serialize for KeyPiece {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// `0x<hash>0000000000000000`
pub fn source_key_piece(input: &str) -> String {
    KeyPiece::source(input).to_string()
}

/// `0x0000000000000000<hash>`
pub fn trigger_key_piece(input: &str) -> String {
    KeyPiece::trigger(input).to_string()
}
