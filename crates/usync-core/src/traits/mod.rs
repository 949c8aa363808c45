//! Core traits for the usync system
//!
//! This module defines the abstract interfaces the engine calls. The
//! engine holds these as trait objects and never a concrete
//! implementation, so in-memory fakes substitute cleanly in tests.
//!
//! - [`RemoteSource`]: Fetch the remote user snapshot
//! - [`UserStore`]: Load and mutate the local user set
//! - [`SyncNotifier`]: Deliver the completion summary

pub mod notifier;
pub mod remote_source;
pub mod user_store;

pub use notifier::SyncNotifier;
pub use remote_source::RemoteSource;
pub use user_store::UserStore;
