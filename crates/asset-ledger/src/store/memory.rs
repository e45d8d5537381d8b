//! [`MemoryWorldState`]: in-process world state for tests and single-node runs.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::RwLock;
use tracing::debug;

use super::{StoreError, WorldState};

/// Thread-safe in-memory world state.
///
/// Wraps an `Arc<RwLock<BTreeMap<_, _>>>`: clones share the same state, reads
/// proceed concurrently, and the ordered map gives range scans their key order.
#[derive(Clone, Debug, Default)]
pub struct MemoryWorldState {
    inner: Arc<RwLock<BTreeMap<String, Bytes>>>,
}

impl MemoryWorldState {
    /// Create a new, empty world state.
    pub fn new() -> Self {
        Self::default()
    }
}

impl WorldState for MemoryWorldState {
    async fn get_state(&self, key: &str) -> Result<Option<Bytes>, StoreError> {
        Ok(self.inner.read().await.get(key).cloned())
    }

    async fn put_state(&self, key: &str, value: Bytes) -> Result<(), StoreError> {
        debug!(key, bytes = value.len(), "put state");
        self.inner.write().await.insert(key.to_owned(), value);
        Ok(())
    }

    async fn delete_state(&self, key: &str) -> Result<(), StoreError> {
        debug!(key, "delete state");
        self.inner.write().await.remove(key);
        Ok(())
    }

    async fn get_state_by_range(
        &self,
        start: &str,
        end: &str,
    ) -> Result<Vec<(String, Bytes)>, StoreError> {
        let lower = if start.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Included(start)
        };
        let upper = if end.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Excluded(end)
        };
        if let (Bound::Included(s), Bound::Excluded(e)) = (lower, upper) {
            if s >= e {
                return Ok(Vec::new());
            }
        }

        let guard = self.inner.read().await;
        Ok(guard
            .range::<str, _>((lower, upper))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}
