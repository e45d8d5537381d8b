//! [`SecretCommitment`]: lets a custodian check that a reconstruction is the
//! original secret without storing the secret.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::secret::MasterSecret;

const COMMITMENT_LABEL: &[u8] = b"share-custody/master-secret-commitment/v1";

/// `SHA-256(label ‖ secret)`.
///
/// Safe to keep next to the shares as long as the secret is high-entropy:
/// recovering the secret from it means inverting SHA-256.
#[derive(Clone)]
pub struct SecretCommitment([u8; 32]);

impl SecretCommitment {
    /// Commit to `secret`.
    pub fn new(secret: &MasterSecret) -> Self {
        Self(Self::digest(secret))
    }

    /// Restore a commitment persisted by the provisioning layer.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Constant-time check that `candidate` is the committed secret.
    pub fn verify(&self, candidate: &MasterSecret) -> bool {
        let digest = Self::digest(candidate);
        bool::from(digest[..].ct_eq(&self.0[..]))
    }

    fn digest(secret: &MasterSecret) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(COMMITMENT_LABEL);
        hasher.update(secret.expose());
        hasher.finalize().into()
    }
}

impl PartialEq for SecretCommitment {
    fn eq(&self, other: &Self) -> bool {
        bool::from(self.0[..].ct_eq(&other.0[..]))
    }
}

impl Eq for SecretCommitment {}

impl std::fmt::Debug for SecretCommitment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecretCommitment({:02x}{:02x}{:02x}{:02x}..)", self.0[0], self.0[1], self.0[2], self.0[3])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verifies_the_committed_secret() {
        let secret = MasterSecret::from_slice(b"a 32 byte secret for the tests!!");
        let c = SecretCommitment::new(&secret);
        assert!(c.verify(&secret));
    }

    #[test]
    fn rejects_a_different_secret() {
        let c = SecretCommitment::new(&MasterSecret::from_slice(b"one"));
        assert!(!c.verify(&MasterSecret::from_slice(b"two")));
    }

    #[test]
    fn rejects_a_commitment_one_bit_off() {
        let secret = MasterSecret::from_slice(b"k");
        for byte in [0, 15, 31] {
            let mut bytes = *SecretCommitment::new(&secret).as_bytes();
            bytes[byte] ^= 0x01;
            assert!(!SecretCommitment::from_bytes(bytes).verify(&secret));
        }
    }

    #[test]
    fn bytes_round_trip() {
        let c = SecretCommitment::new(&MasterSecret::from_slice(b"k"));
        assert_eq!(SecretCommitment::from_bytes(*c.as_bytes()), c);
    }
}
