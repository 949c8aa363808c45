// # Memory User Store
//
// In-memory implementation of UserStore.
//
// ## Purpose
//
// Provides a simple, fast store that doesn't persist across restarts.
// Useful for testing and for deployments where the local set can be
// rebuilt by the next run (losing it only means the next run creates
// everything again).
//
// ## When to Use
//
// - Testing environments
// - Container deployments where restart is acceptable

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::Error;
use crate::domain::{UserId, UserRecord};
use crate::traits::UserStore;

/// In-memory user store implementation
///
/// All state lives in a HashMap protected by a RwLock. `create` fails
/// on an existing identity and `update` fails on a missing one, so the
/// store enforces the same contract a relational store would.
#[derive(Debug, Clone, Default)]
pub struct MemoryUserStore {
    inner: Arc<RwLock<HashMap<UserId, UserRecord>>>,
}

impl MemoryUserStore {
    /// Create a new empty memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with records (test convenience)
    pub async fn with_records(records: impl IntoIterator<Item = UserRecord>) -> Self {
        let store = Self::new();
        {
            let mut guard = store.inner.write().await;
            for record in records {
                guard.insert(record.id(), record);
            }
        }
        store
    }

    /// Get the number of records in the store
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Check if the store is empty
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// Look up a single record by identity
    pub async fn get(&self, id: UserId) -> Option<UserRecord> {
        self.inner.read().await.get(&id).cloned()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn fetch_all(&self) -> Result<Vec<UserRecord>, Error> {
        let guard = self.inner.read().await;
        let mut records: Vec<UserRecord> = guard.values().cloned().collect();
        // HashMap iteration order is arbitrary; keep the snapshot
        // deterministic for reproducible runs.
        records.sort_by_key(|r| r.id());
        Ok(records)
    }

    async fn create(&self, record: &UserRecord) -> Result<(), Error> {
        let mut guard = self.inner.write().await;
        if guard.contains_key(&record.id()) {
            return Err(Error::store(format!(
                "user {} already exists",
                record.id()
            )));
        }
        guard.insert(record.id(), record.clone());
        Ok(())
    }

    async fn update(&self, record: &UserRecord) -> Result<(), Error> {
        let mut guard = self.inner.write().await;
        match guard.get_mut(&record.id()) {
            Some(existing) => {
                *existing = record.clone();
                Ok(())
            }
            None => Err(Error::store(format!(
                "user {} does not exist",
                record.id()
            ))),
        }
    }
}
