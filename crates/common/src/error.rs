//! Common error types shared across crates.

use thiserror::Error;

/// Top-level error type of the asset ledger's record-lifecycle operations.
///
/// Each variant maps to a short machine-readable code reported to callers:
/// - [`ServiceError::NotFound`] → `not_found`
/// - [`ServiceError::Conflict`] → `conflict`
/// - [`ServiceError::BadRequest`] → `bad_request`
/// - [`ServiceError::EncryptionFailure`] → `encryption_failure`
/// - [`ServiceError::Unavailable`] → `unavailable`
/// - [`ServiceError::Internal`] → `internal_error`
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The named asset does not exist in the world state.
    #[error("not found: {0}")]
    NotFound(String),

    /// An asset with the same identifier already exists.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A stored value is not a record, or the input is invalid.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Encryption or decryption failed due to a crypto-layer error.
    #[error("encryption failure: {0}")]
    EncryptionFailure(String),

    /// Custody is not initialised or the key could not be reconstructed.
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// An unexpected internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Returns the machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::NotFound(_) => "not_found",
            ServiceError::Conflict(_) => "conflict",
            ServiceError::BadRequest(_) => "bad_request",
            ServiceError::EncryptionFailure(_) => "encryption_failure",
            ServiceError::Unavailable(_) => "unavailable",
            ServiceError::Internal(_) => "internal_error",
        }
    }
}
