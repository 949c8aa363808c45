//! Configuration types for the usync system
//!
//! This module defines all configuration structures used throughout the crate.

use serde::{Deserialize, Serialize};

/// Main usync configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Remote source configuration
    pub remote: RemoteSourceConfig,

    /// Local store configuration
    pub store: StoreConfig,

    /// Notifier configuration
    pub notifier: NotifierConfig,

    /// Optional engine settings
    #[serde(default)]
    pub engine: EngineConfig,
}

impl SyncConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.remote.validate()?;
        self.store.validate()?;
        self.notifier.validate()?;
        Ok(())
    }
}

/// Remote source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RemoteSourceConfig {
    /// HTTP source serving a JSONPlaceholder-style `/users` endpoint
    Http {
        /// Base URL of the remote API (e.g., "https://jsonplaceholder.typicode.com")
        base_url: String,
        /// Request timeout in seconds
        #[serde(default = "default_remote_timeout_secs")]
        timeout_secs: u64,
    },
}

impl RemoteSourceConfig {
    /// Validate the remote source configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            RemoteSourceConfig::Http {
                base_url,
                timeout_secs,
            } => {
                if base_url.is_empty() {
                    return Err(crate::Error::config("remote base URL cannot be empty"));
                }
                if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
                    return Err(crate::Error::config(format!(
                        "remote base URL must use http or https scheme, got: {base_url}"
                    )));
                }
                if *timeout_secs == 0 {
                    return Err(crate::Error::config("remote timeout must be > 0"));
                }
                Ok(())
            }
        }
    }
}

fn default_remote_timeout_secs() -> u64 {
    30
}

/// Local store configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreConfig {
    /// SQLite-backed store
    Sqlite {
        /// Path to the database file
        path: String,
    },

    /// In-memory store (not persistent)
    #[default]
    Memory,
}

impl StoreConfig {
    /// Validate the store configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            StoreConfig::Sqlite { path } => {
                if path.is_empty() {
                    return Err(crate::Error::config("SQLite store path cannot be empty"));
                }
                Ok(())
            }
            StoreConfig::Memory => Ok(()),
        }
    }
}

/// Notifier configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotifierConfig {
    /// SMTP email notifier
    Smtp {
        /// SMTP host
        host: String,
        /// SMTP port
        #[serde(default = "default_smtp_port")]
        port: u16,
        /// SMTP username
        username: String,
        /// SMTP password
        password: String,
        /// Sender address
        from: String,
        /// Recipient address
        to: String,
        /// Whether to use STARTTLS
        #[serde(default = "default_starttls")]
        starttls: bool,
    },

    /// Log-only notifier (dev/testing)
    #[default]
    Log,
}

impl NotifierConfig {
    /// Validate the notifier configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            NotifierConfig::Smtp {
                host,
                port,
                from,
                to,
                ..
            } => {
                if host.is_empty() {
                    return Err(crate::Error::config("SMTP host cannot be empty"));
                }
                if *port == 0 {
                    return Err(crate::Error::config("SMTP port must be > 0"));
                }
                for (label, addr) in [("from", from), ("to", to)] {
                    if addr.is_empty() || !addr.contains('@') {
                        return Err(crate::Error::config(format!(
                            "SMTP {label} address is not a valid email: {addr:?}"
                        )));
                    }
                }
                Ok(())
            }
            NotifierConfig::Log => Ok(()),
        }
    }
}

fn default_smtp_port() -> u16 {
    587
}

fn default_starttls() -> bool {
    true
}

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Capacity of the engine event channel
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            event_channel_capacity: default_event_channel_capacity(),
        }
    }
}

fn default_event_channel_capacity() -> usize {
    64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn smtp(host: &str, from: &str, to: &str) -> NotifierConfig {
        NotifierConfig::Smtp {
            host: host.to_string(),
            port: 587,
            username: String::new(),
            password: String::new(),
            from: from.to_string(),
            to: to.to_string(),
            starttls: true,
        }
    }

    #[test]
    fn http_remote_requires_scheme() {
        let config = RemoteSourceConfig::Http {
            base_url: "jsonplaceholder.typicode.com".to_string(),
            timeout_secs: 30,
        };
        assert!(config.validate().is_err());

        let config = RemoteSourceConfig::Http {
            base_url: "https://jsonplaceholder.typicode.com".to_string(),
            timeout_secs: 30,
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn sqlite_store_requires_path() {
        assert!(StoreConfig::Sqlite { path: String::new() }.validate().is_err());
        assert!(StoreConfig::Memory.validate().is_ok());
    }

    #[test]
    fn smtp_notifier_requires_addresses() {
        assert!(smtp("mail.example.com", "a@x.com", "b@x.com")
            .validate()
            .is_ok());
        assert!(smtp("", "a@x.com", "b@x.com").validate().is_err());
        assert!(smtp("mail.example.com", "not-an-address", "b@x.com")
            .validate()
            .is_err());
    }

    #[test]
    fn notifier_config_deserializes_from_tagged_json() {
        let config: NotifierConfig = serde_json::from_str(r#"{"type": "log"}"#).unwrap();
        assert!(matches!(config, NotifierConfig::Log));
    }
}
