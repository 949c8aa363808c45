//! Per-run outcome summary

use serde::{Deserialize, Serialize};

/// Outcome tally for one reconciliation run
///
/// The four counters accumulate monotonically while the run is in
/// flight and are frozen once [`crate::SyncEngine::run_once`] returns.
/// For every remote record processed, exactly one counter is
/// incremented, so `created + updated + skipped + errors` always equals
/// the number of remote records supplied to the run.
///
/// The summary is the primary observable contract of the system: it is
/// the HTTP response body and the payload handed to the notifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSummary {
    /// Users created in the local store
    pub created: u64,
    /// Users whose local data was replaced with remote values
    pub updated: u64,
    /// Users already data-equal to the remote snapshot (no store call)
    pub skipped: u64,
    /// Per-record failures (construction or store operation)
    pub errors: u64,
}

impl SyncSummary {
    /// Total number of remote records accounted for by this summary
    pub fn total(&self) -> u64 {
        self.created + self.updated + self.skipped + self.errors
    }

    /// True when no counter was incremented (empty remote set)
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

impl std::fmt::Display for SyncSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "created={} updated={} skipped={} errors={}",
            self.created, self.updated, self.skipped, self.errors
        )
    }
}
