// # Remote Source Trait
//
// Defines the interface for fetching the remote user snapshot.
//
// ## Implementations
//
// - HTTP/JSONPlaceholder-style: `usync-remote-http` crate
// - Test doubles: `tests/common/mod.rs`
//
// ## Contract
//
// The engine assumes `fetch_all` returns a **complete snapshot** per
// call, with no pagination and no streaming. Order must be deterministic per
// run (whatever order the source returns is the order records are
// processed in, which makes summaries reproducible).
//
// A fetch failure sits outside the per-record error boundary: without
// remote data there is nothing to reconcile, so the error propagates
// and aborts the whole run.
//
// Sources are I/O plumbing only. They must not decide what to create
// or update (owned by `SyncEngine`), must not touch the local store,
// and must not retry (the engine does not retry either; a failed run
// is simply reported to the caller).

use async_trait::async_trait;

use crate::domain::RemoteUser;
use crate::error::Result;

/// Trait for remote user source implementations
///
/// Implementations must be thread-safe and usable across async tasks.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    /// Fetch the complete remote user snapshot
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<RemoteUser>)`: The full remote set, already flattened
    ///   to the core's wire-independent shape
    /// - `Err(Error)`: Transport or parse failure; aborts the run
    async fn fetch_all(&self) -> Result<Vec<RemoteUser>>;

    /// Get the source name (for logging/debugging)
    fn source_name(&self) -> &'static str;
}
