//! # Error Types
//!
//! Top-level error hierarchy shared by the rangeops crates. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! Parse failures carry the offending input so a bad backend row can be
//! located from the log line alone.

use thiserror::Error;

/// Top-level error type for rangeops.
#[derive(Error, Debug)]
pub enum RangeopsError {
    /// An identifier failed validation.
    #[error("invalid {kind} identifier: {value:?}")]
    InvalidIdentifier {
        /// Which identifier namespace was being parsed.
        kind: &'static str,
        /// The rejected input.
        value: String,
    },

    /// A role string is not one of the known membership roles.
    #[error("unknown membership role {0:?} (expected commander, member, or viewer)")]
    InvalidRole(String),

    /// A timestamp could not be parsed.
    #[error("invalid timestamp {value:?}: {reason}")]
    InvalidTimestamp {
        /// The rejected input.
        value: String,
        /// Parser message.
        reason: String,
    },

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
