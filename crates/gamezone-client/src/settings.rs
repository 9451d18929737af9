//! Client configuration loaded via OrthoConfig.
//!
//! Values come from `GAMEZONE_CLIENT_*` environment variables, matching
//! command-line flags, or a configuration file.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use ortho_config::OrthoConfig;
use reqwest::Url;
use serde::Deserialize;

use crate::error::ClientError;
use crate::gateway::HttpGateway;
use crate::store::{FileSessionStore, MemorySessionStore, SessionStore};

const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Settings for the app shell.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "GAMEZONE_CLIENT")]
pub struct ClientSettings {
    /// Root URL of the GameZone service.
    #[ortho_config(default = DEFAULT_API_BASE_URL.to_owned())]
    pub api_base_url: String,
    /// Directory for the persisted session store. Memory is used when unset.
    pub session_dir: Option<PathBuf>,
    /// Per-request timeout in seconds.
    #[ortho_config(default = DEFAULT_REQUEST_TIMEOUT_SECS)]
    pub request_timeout_secs: u64,
}

impl ClientSettings {
    /// Parsed service URL, `http://localhost:8080` unless overridden.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] for a malformed override.
    pub fn api_base_url(&self) -> Result<Url, ClientError> {
        let raw = self.api_base_url.as_str();
        Url::parse(raw).map_err(|err| ClientError::Configuration {
            message: format!("api_base_url '{raw}': {err}"),
        })
    }

    /// Request timeout, ten seconds unless overridden.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Directory of the session store, if configured.
    pub fn session_dir(&self) -> Option<&Path> {
        self.session_dir.as_deref()
    }

    /// HTTP gateway for the configured service.
    ///
    /// # Errors
    ///
    /// Propagates URL and client construction failures.
    pub fn gateway(&self) -> Result<HttpGateway, ClientError> {
        HttpGateway::new(self.api_base_url()?, self.request_timeout())
    }

    /// File store in [`Self::session_dir`], or an in-memory store.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Store`] when the directory cannot be opened.
    pub fn session_store(&self) -> Result<Arc<dyn SessionStore>, ClientError> {
        match self.session_dir() {
            Some(dir) => Ok(Arc::new(FileSessionStore::open(dir)?)),
            None => Ok(Arc::new(MemorySessionStore::new())),
        }
    }
}
