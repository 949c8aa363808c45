//! Core sync engine
//!
//! The SyncEngine is responsible for:
//! - Fetching the remote user snapshot via RemoteSource
//! - Taking a single local snapshot via UserStore
//! - Deciding create/update/skip per record and applying mutations
//! - Delivering the completion summary via SyncNotifier (best-effort)
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐
//! │ RemoteSource │─── Vec<RemoteUser> ───┐
//! └──────────────┘                       │
//!                                        ▼
//!                               ┌──────────────┐
//!                               │  SyncEngine  │
//!                               └──────────────┘
//!                                        │
//!          ┌─────────────────────────────┼─────────────────────────┐
//!          │                             │                         │
//!          ▼                             ▼                         ▼
//! ┌──────────────┐             ┌──────────────┐           ┌──────────────┐
//! │  UserStore   │             │ SyncNotifier │           │    Events    │
//! │ (create/upd) │             │ (summary)    │           │ (observe)    │
//! └──────────────┘             └──────────────┘           └──────────────┘
//! ```
//!
//! ## Run Flow
//!
//! 1. Fetch remote snapshot (failure aborts the run)
//! 2. Load local snapshot once, index by identity (failure aborts)
//! 3. Per remote record, inside the per-record failure boundary:
//!    decide create/update/skip, apply, tally
//! 4. Freeze the summary
//! 5. Notify completion; a notifier failure is observability only
//!
//! Step 3 failures never abort the batch; steps 1-2 failures always do.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::config::EngineConfig;
use crate::domain::{RemoteUser, SyncSummary, UserId, UserRecord};
use crate::error::{Error, Result};
use crate::traits::{RemoteSource, SyncNotifier, UserStore};

/// Events emitted by the SyncEngine
///
/// Events are an observability side channel, not part of the summary
/// contract. Dropping the receiver (or a full channel) never affects a
/// run's outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// A run started after both snapshots were fetched
    RunStarted {
        remote_count: usize,
        local_count: usize,
    },

    /// A record absent locally was persisted
    RecordCreated { user_id: UserId },

    /// A record's local data was replaced with remote values
    RecordUpdated { user_id: UserId },

    /// A record was already data-equal; no store call was made
    RecordSkipped { user_id: UserId },

    /// A record failed construction or a store operation
    RecordFailed { user_id: UserId, error: String },

    /// The notifier failed; the summary is unaffected
    NotificationFailed { error: String },

    /// A run completed with its frozen summary
    RunCompleted { summary: SyncSummary },
}

/// Outcome of one record inside the per-record failure boundary
///
/// Modelled as data rather than control flow so the boundary is an
/// explicit, testable seam: `process_record` can only ever yield one of
/// these four outcomes, and `apply_outcome` maps each to exactly one
/// counter.
#[derive(Debug)]
enum RecordOutcome {
    Created,
    Updated,
    Skipped,
    Failed(Error),
}

/// Core sync engine
///
/// Orchestrates one reconciliation run per [`SyncEngine::run_once`]
/// call. The engine holds its collaborators as trait objects and owns
/// all decision logic; collaborators are I/O plumbing only.
///
/// ## Threading
///
/// A run owns its tallies exclusively, so no locks are needed. The
/// engine itself is `Send + Sync`; concurrent `run_once` calls execute
/// independent runs against the same collaborators.
pub struct SyncEngine {
    /// Remote snapshot source
    remote: Arc<dyn RemoteSource>,

    /// Local user store
    store: Arc<dyn UserStore>,

    /// Completion notifier
    notifier: Arc<dyn SyncNotifier>,

    /// Event sender for external monitoring
    event_tx: mpsc::Sender<EngineEvent>,
}

impl SyncEngine {
    /// Create a new sync engine
    ///
    /// # Returns
    ///
    /// A tuple of (engine, event_receiver) where event_receiver yields
    /// engine events for monitoring.
    pub fn new(
        remote: Arc<dyn RemoteSource>,
        store: Arc<dyn UserStore>,
        notifier: Arc<dyn SyncNotifier>,
        config: EngineConfig,
    ) -> (Self, mpsc::Receiver<EngineEvent>) {
        let (tx, rx) = mpsc::channel(config.event_channel_capacity);

        let engine = Self {
            remote,
            store,
            notifier,
            event_tx: tx,
        };

        (engine, rx)
    }

    /// The store this engine mutates
    ///
    /// Exposed for the read-side passthrough (listing local users) so
    /// the daemon can share one store between the engine and the read
    /// endpoint.
    pub fn store(&self) -> Arc<dyn UserStore> {
        Arc::clone(&self.store)
    }

    /// Execute one reconciliation run
    ///
    /// # Returns
    ///
    /// - `Ok(SyncSummary)`: The run completed; the summary is returned
    ///   whether or not the completion notification succeeded
    /// - `Err(Error)`: A fetch-stage failure aborted the run before the
    ///   per-record loop
    pub async fn run_once(&self) -> Result<SyncSummary> {
        self.run_internal(None).await
    }

    /// Internal run implementation that accepts an optional shutdown signal
    async fn run_internal(
        &self,
        shutdown_rx: Option<tokio::sync::oneshot::Receiver<()>>,
    ) -> Result<SyncSummary> {
        // Fetch stage: either snapshot failing aborts the run before
        // any counter exists.
        let remote_users = self.remote.fetch_all().await?;
        let local_users = self.store.fetch_all().await?;

        // Single consistent snapshot, indexed by identity. Never
        // refreshed or updated mid-run: duplicate remote identities
        // re-evaluate against this same index.
        let local_index: HashMap<UserId, UserRecord> = local_users
            .into_iter()
            .map(|record| (record.id(), record))
            .collect();

        self.emit_event(EngineEvent::RunStarted {
            remote_count: remote_users.len(),
            local_count: local_index.len(),
        });
        debug!(
            remote = remote_users.len(),
            local = local_index.len(),
            "sync run started"
        );

        let mut summary = SyncSummary::default();

        if let Some(mut rx) = shutdown_rx {
            // Test mode: a shutdown signal cancels between records.
            // Committed mutations stay committed; no summary is
            // produced and the notifier is not invoked.
            for remote in &remote_users {
                tokio::select! {
                    biased;

                    _ = &mut rx => {
                        info!("sync run cancelled");
                        return Err(Error::Cancelled);
                    }

                    outcome = self.process_record(remote, &local_index) => {
                        self.apply_outcome(remote, outcome, &mut summary);
                    }
                }
            }
        } else {
            for remote in &remote_users {
                let outcome = self.process_record(remote, &local_index).await;
                self.apply_outcome(remote, outcome, &mut summary);
            }
        }

        info!(%summary, "sync run completed");

        // Best-effort notification. Invoked exactly once, zero summary
        // included. A failure here must not alter the summary, must not
        // be retried, and must not roll back committed mutations.
        if let Err(e) = self.notifier.sync_completed(&summary).await {
            error!(
                notifier = self.notifier.notifier_name(),
                "failed to send sync completion notification: {e}"
            );
            self.emit_event(EngineEvent::NotificationFailed {
                error: e.to_string(),
            });
        }

        self.emit_event(EngineEvent::RunCompleted { summary });

        Ok(summary)
    }

    /// Decide and apply the action for one remote record
    ///
    /// Everything that can fail for a single record (domain
    /// construction and the store call) is confined here, so a bad
    /// payload or a failing store operation can only ever produce
    /// `RecordOutcome::Failed` and never escapes to abort the batch.
    async fn process_record(
        &self,
        remote: &RemoteUser,
        local_index: &HashMap<UserId, UserRecord>,
    ) -> RecordOutcome {
        let incoming = match UserRecord::from_remote(remote) {
            Ok(record) => record,
            Err(e) => return RecordOutcome::Failed(e),
        };

        match local_index.get(&incoming.id()) {
            None => match self.store.create(&incoming).await {
                Ok(()) => RecordOutcome::Created,
                Err(e) => RecordOutcome::Failed(e),
            },
            Some(existing) if existing.data_matches(&incoming) => RecordOutcome::Skipped,
            Some(existing) => {
                let replacement = existing.with_data(&incoming);
                match self.store.update(&replacement).await {
                    Ok(()) => RecordOutcome::Updated,
                    Err(e) => RecordOutcome::Failed(e),
                }
            }
        }
    }

    /// Map a record outcome onto exactly one summary counter
    fn apply_outcome(&self, remote: &RemoteUser, outcome: RecordOutcome, summary: &mut SyncSummary) {
        let user_id = UserId(remote.id);
        match outcome {
            RecordOutcome::Created => {
                summary.created += 1;
                debug!(%user_id, "user created");
                self.emit_event(EngineEvent::RecordCreated { user_id });
            }
            RecordOutcome::Updated => {
                summary.updated += 1;
                debug!(%user_id, "user updated");
                self.emit_event(EngineEvent::RecordUpdated { user_id });
            }
            RecordOutcome::Skipped => {
                summary.skipped += 1;
                debug!(%user_id, "user unchanged, skipped");
                self.emit_event(EngineEvent::RecordSkipped { user_id });
            }
            RecordOutcome::Failed(e) => {
                summary.errors += 1;
                error!(%user_id, "error synchronizing user: {e}");
                self.emit_event(EngineEvent::RecordFailed {
                    user_id,
                    error: e.to_string(),
                });
            }
        }
    }

    /// Emit an engine event
    fn emit_event(&self, event: EngineEvent) {
        // Non-blocking send; a full channel drops the event rather than
        // stalling the run.
        if self.event_tx.try_send(event).is_err() {
            warn!("event channel full, dropping engine event");
        }
    }

    /// Test-only helper to run the engine with a controlled shutdown signal
    ///
    /// Contract tests use this to cancel a run between records.
    /// Production callers should use [`SyncEngine::run_once`]; request
    /// cancellation there is handled by dropping the run future.
    pub async fn run_with_shutdown(
        &self,
        shutdown_rx: Option<tokio::sync::oneshot::Receiver<()>>,
    ) -> Result<SyncSummary> {
        self.run_internal(shutdown_rx).await
    }
}
