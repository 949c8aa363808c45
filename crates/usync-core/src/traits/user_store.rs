// # User Store Trait
//
// Defines the interface for local user persistence.
//
// ## Implementations
//
// - SQLite-backed: `usync-store-sqlite` crate
// - In-memory (tests, ephemeral deployments): `store::memory`
//
// ## Contract
//
// `fetch_all` is called once at the start of a run to take a single
// consistent snapshot; the engine never re-reads mid-run, so writes
// from outside the run are not reflected and may be overwritten
// (last-writer-wins, no optimistic-concurrency check).
//
// `create` and `update` are invoked per record. Any error they return
// is a **per-record** failure: the engine counts it and moves on to
// the next record. A `fetch_all` error, by contrast, aborts the run
// before the loop starts.
//
// Stores own persistence and nothing else: no comparison logic, no
// tally, no notification. Deletes are intentionally absent: local
// records with no remote counterpart are left untouched.

use async_trait::async_trait;

use crate::domain::UserRecord;
use crate::error::Result;

/// Trait for local user store implementations
///
/// # Thread Safety
///
/// All methods must be safe to call concurrently from multiple tasks.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Load the full local user set
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<UserRecord>)`: Every locally persisted record
    /// - `Err(Error)`: Storage error; aborts the run
    async fn fetch_all(&self) -> Result<Vec<UserRecord>>;

    /// Persist a new record
    ///
    /// The record's identity must not already exist in the store.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Successfully persisted
    /// - `Err(Error)`: Storage error; counted as a per-record failure
    async fn create(&self, record: &UserRecord) -> Result<()>;

    /// Replace an existing record's data fields
    ///
    /// The record's identity selects the row; the four data fields are
    /// written as a group.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Successfully persisted
    /// - `Err(Error)`: Storage error; counted as a per-record failure
    async fn update(&self, record: &UserRecord) -> Result<()>;
}
