//! Error types for hast to mdast conversion.

use thiserror::Error;

/// Boxed error returned by downstream processors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for conversion operations.
pub type Result<T> = std::result::Result<T, ConversionError>;

/// Errors that can occur while transforming a tree.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// A handler refused or failed to produce output for a node.
    #[error("handler failed: {0}")]
    Handler(String),

    /// The downstream processor in bridge mode reported a failure.
    #[error("destination failed: {0}")]
    Destination(#[source] BoxError),

    /// Settings could not be interpreted.
    #[error("invalid settings: {0}")]
    Settings(String),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConversionError {
    /// Build a handler error from anything printable.
    pub fn handler(message: impl std::fmt::Display) -> Self {
        Self::Handler(message.to_string())
    }
}
