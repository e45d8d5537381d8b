//! Deterministic, type-preserving encryption of single field values.
//!
//! This module is intentionally free of share and custody logic. It encrypts
//! one [`FieldValue`](crate::record::FieldValue) at a time under a
//! [`RecordKey`](crate::kdf::RecordKey).
//!
//! # Pipeline
//!
//! ```text
//! FieldValue -> {"t":<tag>,"v":<payload>} -> PKCS#7 pad (16) -> AES-256-GCM-SIV (synthetic nonce)
//! ```
//!
//! # Ciphertext format
//!
//! ```text
//! v1.<base64url-no-pad(nonce)>.<base64url-no-pad(ciphertext+tag)>
//! ```
//!
//! The `v1` prefix enables future algorithm or key-version migration without
//! breaking existing ciphertext.
//!
//! # Accepted leakage
//!
//! Encryption is deterministic: equal values under the same record key produce
//! equal ciphertexts, which lets the ledger compare and deduplicate sealed
//! fields. An observer learns which fields of a record hold equal values. This
//! is a deliberate trade-off, not a defect; there is no random IV.
//!
//! Field names are not bound into the ciphertext either. A value sealed under
//! one name opens cleanly under another name of the same record, so whoever
//! can rewrite the stored record can swap field values between names without
//! detection. Integrity of the name-to-value mapping is the ledger's job.

pub mod cipher;
pub mod field;
pub mod padding;

pub use cipher::KEY_LEN;
pub use field::{decrypt_value, encrypt_value};

use thiserror::Error;

/// Errors produced by the field cipher.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CipherError {
    /// The value could not be serialised into its tagged envelope.
    #[error("failed to encode field value: {0}")]
    Encoding(String),

    /// AES-GCM-SIV sealing failed.
    #[error("aead seal operation failed")]
    Seal,

    /// The ciphertext could not be parsed, authenticated, unpadded, or decoded.
    #[error("malformed ciphertext: {0}")]
    MalformedCiphertext(&'static str),

    /// The decrypted envelope carries an unknown type tag, or a payload that
    /// does not fit its tag.
    #[error("type tag mismatch: {0}")]
    TypeTagMismatch(String),
}
