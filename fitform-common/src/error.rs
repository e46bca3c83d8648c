//! Common error types for FitForm

use thiserror::Error;

/// Common result type for FitForm operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy shared across the FitForm service
///
/// `Validation` and `NotFound` carry complete caller-facing sentences and are
/// returned verbatim. The remaining variants are logged in detail and
/// surfaced to callers as an opaque internal error.
#[derive(Error, Debug)]
pub enum Error {
    /// Bad, missing, or out-of-range input; always caller-fixable
    #[error("{0}")]
    Validation(String),

    /// Referenced parent/child pair absent
    #[error("{0}")]
    NotFound(String),

    /// Predictor model not loaded (operational/startup fault)
    #[error("Model not initialized")]
    ModelUnavailable,

    /// Store write failed
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
