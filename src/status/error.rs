//! Status snapshot error types.

use thiserror::Error;

/// Errors that can occur while exporting a status snapshot
#[derive(Debug, Error)]
pub enum StatusError {
    /// Serialization to JSON failed
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Deserialization from JSON failed
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),
}
