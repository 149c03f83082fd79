//! Crate-level error types

use thiserror::Error;

/// Errors surfaced by dataset construction, training, and checkpoint I/O.
///
/// Failures are propagated to the caller unmodified; the trainer performs
/// no retries and no recovery.
#[derive(Debug, Error)]
pub enum Error {
    /// Array dimensions do not line up (features vs labels, model vs input)
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// A configuration value is out of its valid range
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Checkpoint state could not be encoded or decoded
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// Filesystem failure while persisting or loading a checkpoint
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type for all fallible operations in this crate
pub type Result<T> = std::result::Result<T, Error>;
