//! Error types for scratch engine operations.

use thiserror::Error;

/// Result type for scratch engine operations.
pub type ScratchResult<T> = Result<T, ScratchError>;

/// Errors that can occur outside the erase/sample hot path.
///
/// Erasing, sampling and ticking never fail; only configuration and
/// frame export can.
#[derive(Debug, Error)]
pub enum ScratchError {
    /// Configuration value out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Frame could not be produced for display or export.
    #[error("Rendering error: {0}")]
    Render(String),
}
