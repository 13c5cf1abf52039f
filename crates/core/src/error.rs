//! Error types for Stowage.

use thiserror::Error;

/// Result type alias for Stowage operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while preparing or running a packing.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid item specification.
    #[error("Invalid item: {0}")]
    InvalidItem(String),

    /// Invalid container specification.
    #[error("Invalid container: {0}")]
    InvalidContainer(String),

    /// Malformed request (missing lists, non-positive counts, duplicate names).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A packing invariant was violated while packing one container.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Returns true for errors caused by the caller's input rather than the engine.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidItem(_)
                | Self::InvalidContainer(_)
                | Self::InvalidInput(_)
                | Self::ConfigError(_)
        )
    }
}
