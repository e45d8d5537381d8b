//! Per-record key derivation.
//!
//! `RecordKey = SHA-256(secret ‖ record_id)`, with the secret bytes first and
//! the UTF-8 record identifier second, no separator. The key is recomputed on
//! every call and never stored.

use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::KEY_LEN;
use crate::secret::MasterSecret;

/// Symmetric key bound to one record identifier.
///
/// Zeroized on drop; `Debug` never prints key material.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct RecordKey([u8; KEY_LEN]);

impl RecordKey {
    /// Wrap raw key bytes. Intended for tests and key-import tooling.
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl std::fmt::Debug for RecordKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("RecordKey([REDACTED])")
    }
}

/// Derive the key for `record_id` from a reconstructed secret.
pub fn derive(secret: &MasterSecret, record_id: &str) -> RecordKey {
    let mut hasher = Sha256::new();
    hasher.update(secret.expose());
    hasher.update(record_id.as_bytes());
    RecordKey(hasher.finalize().into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret() -> MasterSecret {
        MasterSecret::from_slice(b"3t6w9z$C&F)J@NcRfUjXnZr4u7x!A%D*")
    }

    #[test]
    fn derive_is_deterministic() {
        assert_eq!(derive(&secret(), "asset1"), derive(&secret(), "asset1"));
    }

    #[test]
    fn record_id_changes_key() {
        assert_ne!(derive(&secret(), "asset1"), derive(&secret(), "asset2"));
    }

    #[test]
    fn secret_changes_key() {
        let other = MasterSecret::from_slice(b"another secret entirely");
        assert_ne!(derive(&secret(), "asset1"), derive(&other, "asset1"));
    }

    #[test]
    fn matches_plain_concatenation_digest() {
        let expected: [u8; KEY_LEN] = Sha256::digest(b"keyasset1").into();
        let key = derive(&MasterSecret::from_slice(b"key"), "asset1");
        assert_eq!(key.as_bytes(), &expected);
    }

    #[test]
    fn debug_is_redacted() {
        assert_eq!(format!("{:?}", derive(&secret(), "x")), "RecordKey([REDACTED])");
    }
}
