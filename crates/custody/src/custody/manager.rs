//! [`CustodyManager`]: read-only holder of the share set and threshold policy.

use std::sync::{Arc, OnceLock};

use thiserror::Error;
use tracing::{debug, warn};

use super::commitment::SecretCommitment;
use crate::secret::MasterSecret;
use crate::shares::{self, Share, ShareError, ShareSet};

/// Errors produced by the custody layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CustodyError {
    /// Splitting or combining shares failed.
    #[error(transparent)]
    Share(#[from] ShareError),

    /// A requested share index is not held by this manager.
    #[error("no share with index {0} is held")]
    UnknownShare(u8),

    /// The reconstructed secret does not match the provisioning commitment.
    #[error("reconstructed secret does not match the commitment")]
    CommitmentMismatch,

    /// The process-wide manager was already installed.
    #[error("custody manager already initialised")]
    AlreadyInitialised,

    /// The process-wide manager has not been installed yet.
    #[error("custody manager not yet initialised")]
    NotInitialised,
}

static GLOBAL: OnceLock<Arc<CustodyManager>> = OnceLock::new();

/// Holds a [`ShareSet`] and, optionally, a [`SecretCommitment`].
///
/// Immutable after construction, so any number of threads may call
/// [`CustodyManager::reconstruct_key`] at once without locking.
///
/// # Safety of co-location
///
/// In production each share belongs to a different custodian and is never
/// co-located. Holding the whole set in one process, as this type does, lets
/// that process reconstruct the secret alone; it is a simplification for tests
/// and single-node demos and is unsafe to ship as-is.
#[derive(Debug)]
pub struct CustodyManager {
    shares: ShareSet,
    commitment: Option<SecretCommitment>,
}

impl CustodyManager {
    /// Hold an externally provisioned share set, without a commitment.
    pub fn new(shares: ShareSet) -> Self {
        Self {
            shares,
            commitment: None,
        }
    }

    /// Attach a commitment; reconstructions are verified against it.
    pub fn with_commitment(mut self, commitment: SecretCommitment) -> Self {
        self.commitment = Some(commitment);
        self
    }

    /// Split `secret`, commit to it, and drop it.
    ///
    /// # Errors
    ///
    /// Propagates [`ShareError`] from [`shares::split`].
    pub fn provision(
        secret: MasterSecret,
        share_count: usize,
        threshold: usize,
    ) -> Result<Self, CustodyError> {
        let shares = shares::split(secret.expose(), share_count, threshold)?;
        let commitment = SecretCommitment::new(&secret);
        drop(secret);
        warn!(
            share_count,
            threshold,
            "all shares are held in one process; this custody layout is not safe for production"
        );
        Ok(Self::new(shares).with_commitment(commitment))
    }

    pub fn threshold(&self) -> usize {
        self.shares.threshold()
    }

    pub fn share_count(&self) -> usize {
        self.shares.len()
    }

    pub fn commitment(&self) -> Option<&SecretCommitment> {
        self.commitment.as_ref()
    }

    /// Clone the held shares whose indices the caller names, in that order.
    ///
    /// Which shares to use is always the caller's decision.
    ///
    /// # Errors
    ///
    /// Returns [`CustodyError::UnknownShare`] for the first index not held.
    pub fn shares_at(&self, indices: &[u8]) -> Result<Vec<Share>, CustodyError> {
        indices
            .iter()
            .map(|&i| self.shares.get(i).cloned().ok_or(CustodyError::UnknownShare(i)))
            .collect()
    }

    /// Reconstruct the master secret from `subset` under the held threshold.
    ///
    /// The returned secret should be used for one key derivation and dropped.
    ///
    /// # Errors
    ///
    /// - [`CustodyError::Share`] wrapping [`ShareError::InsufficientShares`]
    ///   (fail closed) or [`ShareError::MalformedShare`].
    /// - [`CustodyError::CommitmentMismatch`] when a commitment is held and the
    ///   result does not match it.
    pub fn reconstruct_key(&self, subset: &[Share]) -> Result<MasterSecret, CustodyError> {
        let secret = shares::combine(subset, self.shares.threshold())?;
        if let Some(commitment) = &self.commitment {
            if !commitment.verify(&secret) {
                warn!(supplied = subset.len(), "reconstructed secret failed commitment check");
                return Err(CustodyError::CommitmentMismatch);
            }
        }
        debug!(supplied = subset.len(), "master secret reconstructed");
        Ok(secret)
    }
}

/// Install the process-wide manager. Succeeds once per process.
///
/// # Errors
///
/// Returns [`CustodyError::AlreadyInitialised`] on every call after the first.
pub fn install_global(manager: Arc<CustodyManager>) -> Result<(), CustodyError> {
    GLOBAL
        .set(manager)
        .map_err(|_| CustodyError::AlreadyInitialised)
}

/// The process-wide manager.
///
/// # Errors
///
/// Returns [`CustodyError::NotInitialised`] before [`install_global`].
pub fn global() -> Result<Arc<CustodyManager>, CustodyError> {
    GLOBAL.get().cloned().ok_or(CustodyError::NotInitialised)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provisioned() -> CustodyManager {
        CustodyManager::provision(MasterSecret::generate(32), 10, 2).unwrap()
    }

    #[test]
    fn reconstructs_from_selected_shares() {
        let secret = MasterSecret::generate(32);
        let expected = secret.clone();
        let manager = CustodyManager::provision(secret, 10, 2).unwrap();
        let subset = manager.shares_at(&[3, 4]).unwrap();
        assert_eq!(manager.reconstruct_key(&subset).unwrap(), expected);
    }

    #[test]
    fn too_few_shares_fail_closed() {
        let manager = provisioned();
        let subset = manager.shares_at(&[7]).unwrap();
        assert_eq!(
            manager.reconstruct_key(&subset).unwrap_err(),
            CustodyError::Share(ShareError::InsufficientShares { required: 2, supplied: 1 })
        );
    }

    #[test]
    fn unknown_share_index() {
        let manager = provisioned();
        assert_eq!(manager.shares_at(&[1, 11]).unwrap_err(), CustodyError::UnknownShare(11));
    }

    #[test]
    fn foreign_shares_fail_commitment() {
        let manager = provisioned();
        let other = provisioned();
        let subset = other.shares_at(&[1, 2]).unwrap();
        assert_eq!(manager.reconstruct_key(&subset).unwrap_err(), CustodyError::CommitmentMismatch);
    }

    #[test]
    fn without_commitment_foreign_shares_pass_silently() {
        let set = shares::split(b"first secret", 3, 2).unwrap();
        let manager = CustodyManager::new(set);
        let foreign = shares::split(b"other secret", 3, 2).unwrap();
        let recovered = manager.reconstruct_key(&foreign.as_slice()[..2]).unwrap();
        assert_eq!(recovered.expose(), b"other secret");
    }

    #[test]
    fn reports_policy() {
        let manager = provisioned();
        assert_eq!(manager.threshold(), 2);
        assert_eq!(manager.share_count(), 10);
        assert!(manager.commitment().is_some());
    }

    #[test]
    fn provision_rejects_bad_threshold() {
        let err = CustodyManager::provision(MasterSecret::generate(32), 3, 5).unwrap_err();
        assert!(matches!(err, CustodyError::Share(ShareError::InvalidThreshold { .. })));
    }

    #[test]
    fn global_installs_once() {
        // The only test in this binary that touches the global slot.
        assert_eq!(global().unwrap_err(), CustodyError::NotInitialised);
        let manager = Arc::new(provisioned());
        install_global(manager.clone()).unwrap();
        assert!(Arc::ptr_eq(&global().unwrap(), &manager));
        assert_eq!(
            install_global(Arc::new(provisioned())).unwrap_err(),
            CustodyError::AlreadyInitialised
        );
    }
}
