//! `encrypt_value` / `decrypt_value`: one typed value in, one ciphertext string out.

use zeroize::Zeroizing;

use super::cipher::{open, seal, EncryptedField};
use super::padding::{pad, unpad};
use super::CipherError;
use crate::kdf::RecordKey;
use crate::record::FieldValue;

/// Encrypt `value` deterministically under `key`.
///
/// The value is serialised with its type tag, PKCS#7-padded, and sealed.
/// Repeated calls with the same `(key, value)` return the same string.
///
/// # Errors
///
/// Returns [`CipherError::Encoding`] if the value cannot be serialised and
/// [`CipherError::Seal`] if sealing fails.
pub fn encrypt_value(key: &RecordKey, value: &FieldValue) -> Result<String, CipherError> {
    let tagged = Zeroizing::new(
        value
            .to_tagged_bytes()
            .map_err(|e| CipherError::Encoding(e.to_string()))?,
    );
    let padded = Zeroizing::new(pad(&tagged));
    Ok(seal(&padded, key)?.to_string_repr())
}

/// Decrypt a string produced by [`encrypt_value`] under the same key.
///
/// # Errors
///
/// - [`CipherError::MalformedCiphertext`] if the string cannot be parsed,
///   authenticated, or unpadded, or the plaintext is not a tagged envelope.
/// - [`CipherError::TypeTagMismatch`] if the envelope's tag is unknown or its
///   payload does not fit the tag.
pub fn decrypt_value(key: &RecordKey, ciphertext: &str) -> Result<FieldValue, CipherError> {
    let field = EncryptedField::parse(ciphertext)?;
    let padded = open(&field, key)?;
    FieldValue::from_tagged_bytes(unpad(&padded)?)
}
