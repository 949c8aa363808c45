//! Built-in notifier implementations
//!
//! Delivery-backed notifiers live in their own crates
//! (`usync-notify-smtp`); this module carries the log-only notifier
//! used in development and as the default when no SMTP settings are
//! configured.

pub mod log;

pub use log::LogNotifier;
