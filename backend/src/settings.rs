//! Server configuration loaded via OrthoConfig.
//!
//! Values come from `GAMEZONE_*` environment variables, matching command-line
//! flags, or a configuration file, in OrthoConfig's usual precedence.

use std::net::{AddrParseError, SocketAddr};
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::outbound::persistence::PoolConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";

/// Process-wide server settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "GAMEZONE")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. In-memory repositories are used when absent.
    pub database_url: Option<String>,
    /// Pool size override for the database connection pool.
    pub db_max_connections: Option<u32>,
    /// File holding the session cookie key material.
    pub session_key_file: Option<PathBuf>,
    /// Drop the `Secure` flag from session cookies (plain HTTP development).
    #[ortho_config(default = false)]
    pub insecure_cookies: bool,
    /// `SameSite` policy for session cookies: `Strict`, `Lax` or `None`.
    pub same_site: Option<String>,
    /// Permit a generated session key when the key file cannot be read.
    #[ortho_config(default = false)]
    pub allow_ephemeral_key: bool,
}

impl ServerSettings {
    /// Parsed listen address, falling back to `0.0.0.0:8080`.
    ///
    /// # Errors
    ///
    /// Returns the parse error for a malformed override.
    pub fn bind_addr(&self) -> Result<SocketAddr, AddrParseError> {
        self.bind_addr
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .parse()
    }

    /// Session key path, falling back to the mounted secret location.
    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_FILE))
    }

    /// Whether session cookies carry the `Secure` flag.
    pub fn cookie_secure(&self) -> bool {
        !self.insecure_cookies
    }

    /// Pool configuration when a database URL is set.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        self.database_url.as_deref().map(|url| {
            let config = PoolConfig::new(url);
            match self.db_max_connections {
                Some(max) => config.with_max_size(max),
                None => config,
            }
        })
    }
}
