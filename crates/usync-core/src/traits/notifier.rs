// # Sync Notifier Trait
//
// Defines the interface for delivering the completion summary.
//
// ## Implementations
//
// - SMTP email: `usync-notify-smtp` crate
// - Log-only (dev/testing): `notify::log`
//
// ## Contract
//
// Notification is strictly best-effort. The engine invokes the
// notifier exactly once per completed run (including runs with an
// all-zero summary) after all mutations are committed. A notifier
// failure is logged and surfaced as an engine event but:
//
// - it is never counted in the summary's `errors`,
// - it is never retried,
// - it never prevents the summary from being returned,
// - it never rolls back the mutations already applied.
//
// A downstream alerting outage must not mask real data convergence.

use async_trait::async_trait;

use crate::domain::SyncSummary;
use crate::error::Result;

/// Trait for completion notifier implementations
///
/// Implementations must be thread-safe and usable across async tasks.
#[async_trait]
pub trait SyncNotifier: Send + Sync {
    /// Deliver the completed run's summary
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Notification delivered
    /// - `Err(Error)`: Delivery failed; the engine swallows this
    async fn sync_completed(&self, summary: &SyncSummary) -> Result<()>;

    /// Get the notifier name (for logging/debugging)
    fn notifier_name(&self) -> &'static str;
}
