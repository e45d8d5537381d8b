//! Deterministic AES-256-GCM-SIV sealing of byte strings.
//!
//! **Algorithm choice:** AES-256-GCM-SIV (RFC 8452) is nonce-misuse-resistant,
//! so a nonce that repeats for repeated plaintext leaks only plaintext equality.
//! The nonce here is synthetic: the first 96 bits of
//! `HMAC-SHA256(key, plaintext)`. Identical plaintext + key therefore always
//! produces the same ciphertext, and opening re-derives the nonce to reject
//! ciphertexts whose nonce was swapped.
//!
//! Plain AES-256-GCM must not be used here: a deterministic nonce under GCM
//! exposes the authentication key and XORs of plaintexts.

use aes_gcm_siv::{
    aead::{Aead, AeadInPlace, KeyInit},
    Aes256GcmSiv, Nonce,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use zeroize::Zeroizing;

use super::CipherError;
use crate::kdf::RecordKey;

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Byte length of an AES-GCM-SIV nonce (12 bytes = 96 bits).
pub const NONCE_LEN: usize = 12;

/// Byte length of the GCM-SIV authentication tag.
pub const TAG_LEN: usize = 16;

/// SHA-256 block size; HMAC keys are padded to this length.
const HMAC_BLOCK_LEN: usize = 64;

/// Prefix that appears at the start of every encrypted field value.
pub const VERSION_PREFIX: &str = "v1";

/// A parsed, encrypted field value.
///
/// The string representation is `v1.<base64url(nonce)>.<base64url(ciphertext+tag)>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedField {
    /// Raw nonce bytes.
    pub nonce: [u8; NONCE_LEN],
    /// Raw ciphertext + authentication tag bytes.
    pub ciphertext: Vec<u8>,
}

impl EncryptedField {
    /// Encode this value to its canonical string representation.
    pub fn to_string_repr(&self) -> String {
        format!(
            "{}.{}.{}",
            VERSION_PREFIX,
            URL_SAFE_NO_PAD.encode(self.nonce),
            URL_SAFE_NO_PAD.encode(&self.ciphertext),
        )
    }

    /// Parse an encrypted field string back into an [`EncryptedField`].
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::MalformedCiphertext`] if the string does not match
    /// the expected `v1.<nonce>.<ciphertext>` structure.
    pub fn parse(s: &str) -> Result<Self, CipherError> {
        let parts: Vec<&str> = s.splitn(3, '.').collect();
        if parts.len() != 3 || parts[0] != VERSION_PREFIX {
            return Err(CipherError::MalformedCiphertext("unrecognised ciphertext encoding"));
        }
        let nonce_bytes = URL_SAFE_NO_PAD
            .decode(parts[1])
            .map_err(|_| CipherError::MalformedCiphertext("nonce is not base64url"))?;
        let nonce: [u8; NONCE_LEN] = nonce_bytes
            .try_into()
            .map_err(|_| CipherError::MalformedCiphertext("nonce has the wrong length"))?;

        let ciphertext = URL_SAFE_NO_PAD
            .decode(parts[2])
            .map_err(|_| CipherError::MalformedCiphertext("ciphertext is not base64url"))?;
        if ciphertext.len() < TAG_LEN {
            return Err(CipherError::MalformedCiphertext("ciphertext is shorter than the tag"));
        }

        Ok(Self { nonce, ciphertext })
    }
}

/// Seal `plaintext` under `key` with a synthetic nonce.
///
/// # Errors
///
/// Returns [`CipherError::Seal`] on an internal AEAD error (only reachable for
/// plaintexts beyond the GCM-SIV length limit).
pub fn seal(plaintext: &[u8], key: &RecordKey) -> Result<EncryptedField, CipherError> {
    let nonce = synthetic_nonce(plaintext, key);
    let ciphertext = build_cipher(key)
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|_| CipherError::Seal)?;
    Ok(EncryptedField { nonce, ciphertext })
}

/// Open an [`EncryptedField`] back to plaintext bytes.
///
/// Decryption happens in a zeroising buffer, so the plaintext is wiped on every
/// path, including the error returns.
///
/// # Errors
///
/// Returns [`CipherError::MalformedCiphertext`] if authentication fails (wrong
/// key or tampered data) or the nonce is not the one this key would derive.
pub fn open(field: &EncryptedField, key: &RecordKey) -> Result<Zeroizing<Vec<u8>>, CipherError> {
    let mut plaintext = Zeroizing::new(field.ciphertext.clone());
    build_cipher(key)
        .decrypt_in_place(Nonce::from_slice(&field.nonce), b"", &mut *plaintext)
        .map_err(|_| CipherError::MalformedCiphertext("authentication failed"))?;

    let mut mac = nonce_mac(key);
    mac.update(&plaintext);
    mac.verify_truncated_left(&field.nonce)
        .map_err(|_| CipherError::MalformedCiphertext("nonce does not match plaintext"))?;
    Ok(plaintext)
}

fn synthetic_nonce(plaintext: &[u8], key: &RecordKey) -> [u8; NONCE_LEN] {
    let mut mac = nonce_mac(key);
    mac.update(plaintext);
    let tag = mac.finalize().into_bytes();
    let mut nonce = [0u8; NONCE_LEN];
    nonce.copy_from_slice(&tag[..NONCE_LEN]);
    nonce
}

/// HMAC-SHA256 keyed with the record key.
///
/// HMAC zero-extends keys shorter than the hash block, so the 32-byte key is
/// laid into a 64-byte block up front and the infallible constructor is used.
fn nonce_mac(key: &RecordKey) -> Hmac<Sha256> {
    let mut block = Zeroizing::new([0u8; HMAC_BLOCK_LEN]);
    block[..KEY_LEN].copy_from_slice(key.as_bytes());
    <Hmac<Sha256> as KeyInit>::new((&*block).into())
}

fn build_cipher(key: &RecordKey) -> Aes256GcmSiv {
    Aes256GcmSiv::new(key.as_bytes().into())
}
