//! Built-in user store implementations
//!
//! Persistent stores live in their own crates (`usync-store-sqlite`);
//! this module only carries the in-memory store used for testing and
//! ephemeral deployments.

pub mod memory;

pub use memory::MemoryUserStore;
