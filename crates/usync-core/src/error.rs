//! Error types for the usync system
//!
//! This module defines all error types used throughout the crate.
//!
//! The taxonomy mirrors the run lifecycle: the two fetch-stage errors
//! (`RemoteSource` on the snapshot fetch, `Store` on the local load)
//! abort a run; every failure raised inside the per-record loop is
//! downgraded by the engine to a counted outcome and never escapes
//! `SyncEngine::run_once`.

use thiserror::Error;

/// Result type alias for usync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the usync system
#[derive(Error, Debug)]
pub enum Error {
    /// Domain validation errors (record construction fails closed)
    #[error("invalid user record: {0}")]
    Domain(String),

    /// Remote source errors (fetch/transport/parse)
    #[error("remote source error: {0}")]
    RemoteSource(String),

    /// Local store errors
    #[error("user store error: {0}")]
    Store(String),

    /// Notifier errors (swallowed by the engine, surfaced as events)
    #[error("notifier error: {0}")]
    Notify(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// The run was cancelled before completion; no summary was produced
    #[error("sync run cancelled")]
    Cancelled,

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a domain validation error
    pub fn domain(msg: impl Into<String>) -> Self {
        Self::Domain(msg.into())
    }

    /// Create a remote source error
    pub fn remote_source(msg: impl Into<String>) -> Self {
        Self::RemoteSource(msg.into())
    }

    /// Create a user store error
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Create a notifier error
    pub fn notify(msg: impl Into<String>) -> Self {
        Self::Notify(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
