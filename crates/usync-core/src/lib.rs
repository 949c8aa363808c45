// # usync-core
//
// Core library for the usync user reconciliation system.
//
// ## Architecture Overview
//
// This library provides the core functionality for converging a local
// user set to a remote snapshot:
//
// - **RemoteSource**: Trait for fetching the remote user snapshot
// - **UserStore**: Trait for local user persistence
// - **SyncNotifier**: Trait for delivering the completion summary
// - **SyncEngine**: Core engine that runs fetch → diff → apply → notify
// - **SyncSummary**: The four-counter outcome contract of a run
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Decision logic lives in the engine;
//    collaborators are I/O plumbing behind narrow traits
// 2. **Per-Record Failure Isolation**: One bad record never aborts the
//    batch; only the two fetch-stage errors abort a run
// 3. **Best-Effort Notification**: A notifier outage never masks or
//    erases real data convergence
// 4. **Library-First**: All core functionality can be used as a library;
//    the HTTP daemon is a thin integration layer

pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod notify;
pub mod store;
pub mod traits;

// Re-export core types for convenience
pub use config::{EngineConfig, NotifierConfig, RemoteSourceConfig, StoreConfig, SyncConfig};
pub use domain::{Email, RemoteUser, SyncSummary, UserId, UserRecord};
pub use engine::{EngineEvent, SyncEngine};
pub use error::{Error, Result};
pub use notify::LogNotifier;
pub use store::MemoryUserStore;
pub use traits::{RemoteSource, SyncNotifier, UserStore};
