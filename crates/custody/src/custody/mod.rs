//! Process-wide custody of the share set.
//!
//! # Lifecycle
//!
//! 1. At startup the provisioning step either calls
//!    [`CustodyManager::provision`] with a freshly generated secret or hands an
//!    existing [`ShareSet`](crate::shares::ShareSet) to [`CustodyManager::new`].
//! 2. The manager is wrapped in an `Arc` and, when a process-wide instance is
//!    wanted, passed once to [`install_global`]. A second install fails.
//! 3. Callers pick the shares to combine from their own configuration, call
//!    [`CustodyManager::reconstruct_key`], derive a record key, and drop both.
//!
//! # Security invariants
//!
//! - The master secret is **never** stored by the manager, logged, or traced.
//! - Share selection is never hard-coded here; it is always caller input.
//! - Reconstruction with fewer shares than the threshold fails closed.

pub mod commitment;
pub mod manager;

pub use commitment::SecretCommitment;
pub use manager::{global, install_global, CustodyError, CustodyManager};
