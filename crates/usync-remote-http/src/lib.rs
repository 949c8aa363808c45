// # HTTP Remote User Source
//
// This crate provides an HTTP-based RemoteSource implementation for the
// usync system, built for JSONPlaceholder-style APIs.
//
// ## Wire Format
//
// GET `{base_url}/users` returns a JSON array of users with the city
// nested under an address substructure:
//
// ```json
// [
//   {
//     "id": 1,
//     "username": "Bret",
//     "name": "Leanne Graham",
//     "email": "Sincere@april.biz",
//     "address": { "city": "Gwenborough" }
//   }
// ]
// ```
//
// The source flattens `address.city` before handing records to the
// core; the engine never sees wire-format nesting.
//
// ## Constraints
//
// - One HTTP request per `fetch_all` call (a complete snapshot; the
//   engine never paginates)
// - No retry logic (a failed fetch aborts the run, which is reported
//   to the caller)
// - No caching between calls

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use usync_core::config::RemoteSourceConfig;
use usync_core::{Error, RemoteUser, Result};
use usync_core::traits::RemoteSource;

/// Default HTTP timeout for snapshot requests
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP-based remote user source
pub struct HttpRemoteSource {
    /// Base URL of the remote API
    base_url: String,

    /// HTTP client for snapshot requests
    client: reqwest::Client,
}

/// Wire DTO for one remote user
#[derive(Debug, Deserialize)]
struct WireUser {
    id: i64,
    #[serde(default)]
    username: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    address: WireAddress,
}

/// Wire DTO for the address substructure
#[derive(Debug, Default, Deserialize)]
struct WireAddress {
    #[serde(default)]
    city: String,
}

impl From<WireUser> for RemoteUser {
    fn from(wire: WireUser) -> Self {
        RemoteUser {
            id: wire.id,
            username: wire.username,
            name: wire.name,
            email: wire.email,
            city: wire.address.city,
        }
    }
}

impl HttpRemoteSource {
    /// Create a new HTTP remote source
    ///
    /// # Parameters
    ///
    /// - `base_url`: Base URL of the remote API; `/users` is appended
    /// - `timeout`: Per-request timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into();
        if base_url.is_empty() {
            return Err(Error::config("remote base URL cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::remote_source(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Create a source from its config section
    pub fn from_config(config: &RemoteSourceConfig) -> Result<Self> {
        config.validate()?;
        match config {
            RemoteSourceConfig::Http {
                base_url,
                timeout_secs,
            } => Self::new(base_url.clone(), Duration::from_secs(*timeout_secs)),
        }
    }

    /// Decode the JSON snapshot payload into flattened remote users
    fn decode_snapshot(body: &[u8]) -> Result<Vec<RemoteUser>> {
        let wire: Vec<WireUser> = serde_json::from_slice(body)
            .map_err(|e| Error::remote_source(format!("malformed user payload: {e}")))?;
        Ok(wire.into_iter().map(RemoteUser::from).collect())
    }
}

#[async_trait]
impl RemoteSource for HttpRemoteSource {
    async fn fetch_all(&self) -> Result<Vec<RemoteUser>> {
        let url = format!("{}/users", self.base_url);
        debug!(%url, "fetching remote user snapshot");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::remote_source(format!("GET {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::remote_source(format!(
                "GET {url} returned HTTP {status}"
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::remote_source(format!("failed to read response body: {e}")))?;

        let users = Self::decode_snapshot(&body)?;
        debug!(count = users.len(), "remote snapshot fetched");
        Ok(users)
    }

    fn source_name(&self) -> &'static str {
        "http"
    }
}
