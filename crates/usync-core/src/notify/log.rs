//! Log-only completion notifier

use async_trait::async_trait;
use tracing::info;

use crate::domain::SyncSummary;
use crate::error::Result;
use crate::traits::SyncNotifier;

/// Notifier that writes the summary to the log and nothing else
///
/// The default notifier when no delivery channel is configured. It
/// cannot fail, which also makes it a convenient baseline in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl LogNotifier {
    /// Create a new log notifier
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SyncNotifier for LogNotifier {
    async fn sync_completed(&self, summary: &SyncSummary) -> Result<()> {
        info!(%summary, "user sync completed");
        Ok(())
    }

    fn notifier_name(&self) -> &'static str {
        "log"
    }
}
