//! Field-granular encryption of whole records.
//!
//! Every field value is sealed independently under the same
//! [`RecordKey`]. Field *names* stay in clear text: they are not confidential,
//! only values are. Names are not authenticated with their values; see the
//! accepted-leakage notes in [`crate::crypto`].
//!
//! Decryption is all-or-nothing; a single bad field fails the whole record and
//! no partial result escapes.

pub mod map;
pub mod value;

pub use map::FieldMap;
pub use value::FieldValue;

use serde_json::Value;
use thiserror::Error;

use crate::crypto::{decrypt_value, encrypt_value, CipherError};
use crate::kdf::RecordKey;

/// Plaintext record: field name to typed value.
pub type Record = FieldMap<FieldValue>;

/// Sealed record: field name to `v1.` ciphertext string.
pub type EncryptedRecord = FieldMap<String>;

/// Errors produced by the record codec.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// A field could not be encrypted.
    #[error("failed to encrypt field `{field}`: {source}")]
    FieldEncryption { field: String, source: CipherError },

    /// A field could not be decrypted; no other fields are returned.
    #[error("failed to decrypt field `{field}`: {source}")]
    FieldDecryptionFailure { field: String, source: CipherError },

    /// A JSON value that should describe a record is not an object.
    #[error("record must be a JSON object")]
    NotAnObject,
}

/// Encrypt every field of `record`, keeping names and order.
///
/// # Errors
///
/// Returns [`RecordError::FieldEncryption`] for the first field that fails.
pub fn encrypt_record(key: &RecordKey, record: &Record) -> Result<EncryptedRecord, RecordError> {
    let mut sealed = EncryptedRecord::with_capacity(record.len());
    for (name, value) in record.iter() {
        let ciphertext = encrypt_value(key, value).map_err(|source| RecordError::FieldEncryption {
            field: name.to_owned(),
            source,
        })?;
        sealed.insert(name, ciphertext);
    }
    Ok(sealed)
}

/// Decrypt every field of `record`.
///
/// # Errors
///
/// Returns [`RecordError::FieldDecryptionFailure`] naming the first field that
/// fails, wrapping its [`CipherError`].
pub fn decrypt_record(key: &RecordKey, record: &EncryptedRecord) -> Result<Record, RecordError> {
    let mut plain = Record::with_capacity(record.len());
    for (name, ciphertext) in record.iter() {
        let value = decrypt_value(key, ciphertext).map_err(|source| {
            RecordError::FieldDecryptionFailure {
                field: name.to_owned(),
                source,
            }
        })?;
        plain.insert(name, value);
    }
    Ok(plain)
}

impl FieldMap<FieldValue> {
    /// Build a record from a JSON object, keeping its key order.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::NotAnObject`] for any other JSON value.
    pub fn from_json_object(value: Value) -> Result<Self, RecordError> {
        match value {
            Value::Object(map) => Ok(map.into_iter().map(|(k, v)| (k, FieldValue::from(v))).collect()),
            _ => Err(RecordError::NotAnObject),
        }
    }

    /// Convert to a JSON object in field order.
    pub fn into_json_object(self) -> Value {
        Value::Object(self.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
    }
}
