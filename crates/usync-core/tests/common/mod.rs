//! Test doubles and common utilities for engine contract tests
//!
//! These doubles verify the engine's observable contract (counters and
//! collaborator calls) without any real I/O.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::{Mutex, Notify};

use usync_core::error::{Error, Result};
use usync_core::traits::{RemoteSource, SyncNotifier, UserStore};
use usync_core::{EngineConfig, RemoteUser, SyncEngine, SyncSummary, UserId, UserRecord};

/// Build a valid remote payload
pub fn remote(id: i64, username: &str, name: &str, email: &str, city: &str) -> RemoteUser {
    RemoteUser {
        id,
        username: username.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        city: city.to_string(),
    }
}

/// Build a valid local record with the same field values a
/// corresponding `remote(...)` payload would produce
pub fn local(id: i64, username: &str, name: &str, email: &str, city: &str) -> UserRecord {
    UserRecord::new(UserId(id), username, name, email, city).expect("valid test record")
}

/// Wire an engine from doubles with the default config
pub fn engine_with(
    source: Arc<SnapshotRemoteSource>,
    store: Arc<RecordingStore>,
    notifier: Arc<RecordingNotifier>,
) -> SyncEngine {
    let (engine, _events) = SyncEngine::new(source, store, notifier, EngineConfig::default());
    engine
}

/// A remote source that serves a fixed snapshot
pub struct SnapshotRemoteSource {
    users: Vec<RemoteUser>,
    fail: bool,
    fetch_calls: AtomicUsize,
}

impl SnapshotRemoteSource {
    pub fn new(users: Vec<RemoteUser>) -> Arc<Self> {
        Arc::new(Self {
            users,
            fail: false,
            fetch_calls: AtomicUsize::new(0),
        })
    }

    /// A source whose fetch always fails (pre-loop abort path)
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            users: Vec::new(),
            fail: true,
            fetch_calls: AtomicUsize::new(0),
        })
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl RemoteSource for SnapshotRemoteSource {
    async fn fetch_all(&self) -> Result<Vec<RemoteUser>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(Error::remote_source("snapshot fetch failed"));
        }
        Ok(self.users.clone())
    }

    fn source_name(&self) -> &'static str {
        "snapshot"
    }
}

/// Mutation observed by [`RecordingStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Create(UserRecord),
    Update(UserRecord),
}

/// A user store double that records every mutation attempt
///
/// Failures are injected per identity, so a test can make record *k*
/// of *N* fail while the rest succeed.
pub struct RecordingStore {
    records: Mutex<HashMap<UserId, UserRecord>>,
    calls: Mutex<Vec<StoreCall>>,
    fail_creates: HashSet<UserId>,
    fail_updates: HashSet<UserId>,
    fail_fetch: bool,
    /// When set, mutation calls block until `release()` is invoked
    gate: Option<Arc<Notify>>,
}

impl RecordingStore {
    pub fn empty() -> Arc<Self> {
        Self::seeded([])
    }

    pub fn seeded(records: impl IntoIterator<Item = UserRecord>) -> Arc<Self> {
        Arc::new(Self {
            records: Mutex::new(
                records
                    .into_iter()
                    .map(|r| (r.id(), r))
                    .collect::<HashMap<_, _>>(),
            ),
            calls: Mutex::new(Vec::new()),
            fail_creates: HashSet::new(),
            fail_updates: HashSet::new(),
            fail_fetch: false,
            gate: None,
        })
    }

    /// A store whose snapshot load always fails (pre-loop abort path)
    pub fn failing_fetch() -> Arc<Self> {
        let mut store = Self::unwrapped([]);
        store.fail_fetch = true;
        Arc::new(store)
    }

    /// Seeded store that fails `create` for the given identities
    pub fn failing_creates(
        records: impl IntoIterator<Item = UserRecord>,
        ids: impl IntoIterator<Item = i64>,
    ) -> Arc<Self> {
        let mut store = Self::unwrapped(records);
        store.fail_creates = ids.into_iter().map(UserId).collect();
        Arc::new(store)
    }

    /// Seeded store that fails `update` for the given identities
    pub fn failing_updates(
        records: impl IntoIterator<Item = UserRecord>,
        ids: impl IntoIterator<Item = i64>,
    ) -> Arc<Self> {
        let mut store = Self::unwrapped(records);
        store.fail_updates = ids.into_iter().map(UserId).collect();
        Arc::new(store)
    }

    /// Store whose mutations block until [`RecordingStore::release`]
    pub fn gated(records: impl IntoIterator<Item = UserRecord>) -> Arc<Self> {
        let mut store = Self::unwrapped(records);
        store.gate = Some(Arc::new(Notify::new()));
        Arc::new(store)
    }

    fn unwrapped(records: impl IntoIterator<Item = UserRecord>) -> Self {
        Self {
            records: Mutex::new(records.into_iter().map(|r| (r.id(), r)).collect()),
            calls: Mutex::new(Vec::new()),
            fail_creates: HashSet::new(),
            fail_updates: HashSet::new(),
            fail_fetch: false,
            gate: None,
        }
    }

    /// Unblock a gated mutation
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    /// All mutation attempts, in order
    pub async fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().await.clone()
    }

    /// Number of mutation attempts (creates + updates)
    pub async fn mutation_count(&self) -> usize {
        self.calls.lock().await.len()
    }

    /// Current record for an identity, if persisted
    pub async fn get(&self, id: i64) -> Option<UserRecord> {
        self.records.lock().await.get(&UserId(id)).cloned()
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }
}

#[async_trait::async_trait]
impl UserStore for RecordingStore {
    async fn fetch_all(&self) -> Result<Vec<UserRecord>> {
        if self.fail_fetch {
            return Err(Error::store("local snapshot load failed"));
        }
        let guard = self.records.lock().await;
        let mut records: Vec<UserRecord> = guard.values().cloned().collect();
        records.sort_by_key(|r| r.id());
        Ok(records)
    }

    async fn create(&self, record: &UserRecord) -> Result<()> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.calls.lock().await.push(StoreCall::Create(record.clone()));
        if self.fail_creates.contains(&record.id()) {
            return Err(Error::store(format!("injected create failure for {}", record.id())));
        }
        let mut records = self.records.lock().await;
        if records.contains_key(&record.id()) {
            return Err(Error::store(format!("user {} already exists", record.id())));
        }
        records.insert(record.id(), record.clone());
        Ok(())
    }

    async fn update(&self, record: &UserRecord) -> Result<()> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.calls.lock().await.push(StoreCall::Update(record.clone()));
        if self.fail_updates.contains(&record.id()) {
            return Err(Error::store(format!("injected update failure for {}", record.id())));
        }
        self.records.lock().await.insert(record.id(), record.clone());
        Ok(())
    }
}

/// A notifier double that records invocations and can fail on demand
pub struct RecordingNotifier {
    calls: AtomicUsize,
    last_summary: Mutex<Option<SyncSummary>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            last_summary: Mutex::new(None),
            fail: false,
        })
    }

    /// A notifier whose delivery always fails
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            last_summary: Mutex::new(None),
            fail: true,
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn last_summary(&self) -> Option<SyncSummary> {
        *self.last_summary.lock().await
    }
}

#[async_trait::async_trait]
impl SyncNotifier for RecordingNotifier {
    async fn sync_completed(&self, summary: &SyncSummary) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_summary.lock().await = Some(*summary);
        if self.fail {
            return Err(Error::notify("injected notification failure"));
        }
        Ok(())
    }

    fn notifier_name(&self) -> &'static str {
        "recording"
    }
}
