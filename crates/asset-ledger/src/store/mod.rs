//! World state: the key-value store that holds one encrypted record per asset.
//!
//! # Store invariants
//!
//! - Values are opaque bytes. The store never sees plaintext field values;
//!   the contract layer encrypts before [`WorldState::put_state`].
//! - Range scans return entries in ascending key order.

pub mod memory;

pub use memory::MemoryWorldState;

use bytes::Bytes;
use thiserror::Error;

/// Errors produced by a world-state backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend could not serve the request.
    #[error("world state unavailable: {0}")]
    Unavailable(String),
}

/// Key-value world state with ordered range scans.
pub trait WorldState: Send + Sync {
    /// Value stored under `key`, if any.
    async fn get_state(&self, key: &str) -> Result<Option<Bytes>, StoreError>;

    /// Store (or replace) the value under `key`.
    async fn put_state(&self, key: &str, value: Bytes) -> Result<(), StoreError>;

    /// Remove `key`. Removing an absent key is not an error.
    async fn delete_state(&self, key: &str) -> Result<(), StoreError>;

    /// Entries with `start <= key < end`, in key order.
    ///
    /// An empty `start` or `end` leaves that side of the range open, so
    /// `("", "")` scans the whole state.
    async fn get_state_by_range(
        &self,
        start: &str,
        end: &str,
    ) -> Result<Vec<(String, Bytes)>, StoreError>;
}
