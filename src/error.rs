//! Error types for the adaptive context layer
//!
//! Reducers and derivations are total; these errors only surface where text
//! enters the crate (event streams, config files, enum names).

use thiserror::Error;

/// Errors raised at the parse and configuration boundaries
#[derive(Debug, Error)]
pub enum ContextError {
    #[error("Failed to parse input: {0}")]
    ParseError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    ConfigError(#[from] toml::de::Error),

    #[error("Unknown {kind} value: {value}")]
    UnknownValue { kind: &'static str, value: String },

    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
