//! Domain model for user reconciliation
//!
//! This module defines the entity under reconciliation and the equality
//! rule that drives the update-vs-skip decision.
//!
//! - [`UserId`]: Opaque, externally-assigned identity key
//! - [`Email`]: Validated email value (non-empty, contains `@`)
//! - [`UserRecord`]: The user record as persisted locally
//! - [`RemoteUser`]: Flat, unvalidated wire payload from the remote source
//! - [`SyncSummary`]: Per-run outcome tally
//!
//! ## Design Principles
//!
//! 1. **Fail closed**: A `UserRecord` cannot exist with an empty
//!    username/full name/city or a malformed email. Construction errors
//!    are caught by the engine and counted as per-record failures.
//! 2. **Fixed identity**: The identity never changes after construction.
//!    The four data fields change only together via [`UserRecord::with_data`],
//!    which produces a new value rather than mutating in place.

pub mod summary;
pub mod user;

pub use summary::SyncSummary;
pub use user::{Email, RemoteUser, UserId, UserRecord};
