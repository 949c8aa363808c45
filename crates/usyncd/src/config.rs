//! Daemon configuration from environment variables
//!
//! All configuration is done via `USYNC_*` environment variables:
//!
//! ## Remote source
//! - `USYNC_REMOTE_URL`: Base URL of the remote user API (required)
//! - `USYNC_REMOTE_TIMEOUT_SECS`: Request timeout in seconds (default 30)
//!
//! ## Local store
//! - `USYNC_STORE_TYPE`: Store type (sqlite, memory; default sqlite)
//! - `USYNC_STORE_PATH`: Path to the database file (required for sqlite)
//!
//! ## Notifier
//! - `USYNC_NOTIFIER_TYPE`: Notifier type (smtp, log; default log)
//! - `USYNC_SMTP_HOST`, `USYNC_SMTP_PORT`, `USYNC_SMTP_USERNAME`,
//!   `USYNC_SMTP_PASSWORD`, `USYNC_SMTP_FROM`, `USYNC_SMTP_TO`,
//!   `USYNC_SMTP_STARTTLS` (required for smtp, credentials optional)
//!
//! ## Server
//! - `USYNC_BIND_ADDR`: Listen address (default 127.0.0.1:8080)
//! - `USYNC_LOG_LEVEL`: trace, debug, info, warn, error (default info)

use anyhow::Result;
use std::env;

use usync_core::{NotifierConfig, RemoteSourceConfig, StoreConfig};

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub remote_url: String,
    pub remote_timeout_secs: u64,
    pub store_type: String,
    pub store_path: Option<String>,
    pub notifier_type: String,
    pub smtp_host: Option<String>,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub smtp_from: Option<String>,
    pub smtp_to: Option<String>,
    pub smtp_starttls: bool,
    pub bind_addr: String,
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            remote_url: env::var("USYNC_REMOTE_URL").map_err(|_| {
                anyhow::anyhow!(
                    "USYNC_REMOTE_URL is required. \
                    Set it via: export USYNC_REMOTE_URL=https://jsonplaceholder.typicode.com"
                )
            })?,
            remote_timeout_secs: env::var("USYNC_REMOTE_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
            store_type: env::var("USYNC_STORE_TYPE").unwrap_or_else(|_| "sqlite".to_string()),
            store_path: env::var("USYNC_STORE_PATH").ok(),
            notifier_type: env::var("USYNC_NOTIFIER_TYPE").unwrap_or_else(|_| "log".to_string()),
            smtp_host: env::var("USYNC_SMTP_HOST").ok(),
            smtp_port: env::var("USYNC_SMTP_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(587),
            smtp_username: env::var("USYNC_SMTP_USERNAME").unwrap_or_default(),
            smtp_password: env::var("USYNC_SMTP_PASSWORD").unwrap_or_default(),
            smtp_from: env::var("USYNC_SMTP_FROM").ok(),
            smtp_to: env::var("USYNC_SMTP_TO").ok(),
            smtp_starttls: env::var("USYNC_SMTP_STARTTLS")
                .ok()
                .map(|s| s != "false" && s != "0")
                .unwrap_or(true),
            bind_addr: env::var("USYNC_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            log_level: env::var("USYNC_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.remote_url.is_empty() {
            anyhow::bail!("USYNC_REMOTE_URL cannot be empty");
        }
        if !self.remote_url.starts_with("https://") && !self.remote_url.starts_with("http://") {
            anyhow::bail!(
                "USYNC_REMOTE_URL must use HTTP or HTTPS scheme. Got: {}",
                self.remote_url
            );
        }
        if self.remote_timeout_secs == 0 || self.remote_timeout_secs > 300 {
            anyhow::bail!(
                "USYNC_REMOTE_TIMEOUT_SECS must be between 1 and 300. Got: {}",
                self.remote_timeout_secs
            );
        }

        match self.store_type.as_str() {
            "sqlite" => {
                if self.store_path.as_ref().is_none_or(|p| p.is_empty()) {
                    anyhow::bail!(
                        "USYNC_STORE_PATH is required when USYNC_STORE_TYPE=sqlite. \
                        Set it via: export USYNC_STORE_PATH=/var/lib/usync/users.db"
                    );
                }
            }
            "memory" => {}
            other => anyhow::bail!(
                "USYNC_STORE_TYPE '{}' is not supported. Supported types: sqlite, memory",
                other
            ),
        }

        match self.notifier_type.as_str() {
            "smtp" => {
                if self.smtp_host.as_ref().is_none_or(|h| h.is_empty()) {
                    anyhow::bail!("USYNC_SMTP_HOST is required when USYNC_NOTIFIER_TYPE=smtp");
                }
                for (var, value) in [
                    ("USYNC_SMTP_FROM", &self.smtp_from),
                    ("USYNC_SMTP_TO", &self.smtp_to),
                ] {
                    match value {
                        Some(addr) if addr.contains('@') => {}
                        _ => anyhow::bail!(
                            "{var} must be set to a valid email address when USYNC_NOTIFIER_TYPE=smtp"
                        ),
                    }
                }
            }
            "log" => {}
            other => anyhow::bail!(
                "USYNC_NOTIFIER_TYPE '{}' is not supported. Supported types: smtp, log",
                other
            ),
        }

        if self.bind_addr.parse::<std::net::SocketAddr>().is_err() {
            anyhow::bail!(
                "USYNC_BIND_ADDR is not a valid socket address. Got: {}",
                self.bind_addr
            );
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => anyhow::bail!(
                "USYNC_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                other
            ),
        }

        Ok(())
    }

    /// Remote source config section for the core
    pub fn remote_config(&self) -> RemoteSourceConfig {
        RemoteSourceConfig::Http {
            base_url: self.remote_url.clone(),
            timeout_secs: self.remote_timeout_secs,
        }
    }

    /// Store config section for the core
    pub fn store_config(&self) -> StoreConfig {
        match self.store_type.as_str() {
            "sqlite" => StoreConfig::Sqlite {
                path: self.store_path.clone().unwrap_or_default(),
            },
            _ => StoreConfig::Memory,
        }
    }

    /// Notifier config section for the core
    pub fn notifier_config(&self) -> NotifierConfig {
        match self.notifier_type.as_str() {
            "smtp" => NotifierConfig::Smtp {
                host: self.smtp_host.clone().unwrap_or_default(),
                port: self.smtp_port,
                username: self.smtp_username.clone(),
                password: self.smtp_password.clone(),
                from: self.smtp_from.clone().unwrap_or_default(),
                to: self.smtp_to.clone().unwrap_or_default(),
                starttls: self.smtp_starttls,
            },
            _ => NotifierConfig::Log,
        }
    }
}
