//! Server settings loaded via OrthoConfig.
//!
//! Precedence is CLI, then `INFUSION_*` environment variables, then the
//! defaults below.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::TokenPolicy;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_TOKEN_SECRET_FILE: &str = "/var/run/secrets/token_key";
const DEFAULT_TOKEN_LIFETIME_SECS: u64 = 60 * 60;
const DEFAULT_REMEMBER_ME_LIFETIME_SECS: u64 = 30 * 24 * 60 * 60;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Settings for the HTTP server and its adapters.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "INFUSION")]
pub struct AppSettings {
    /// PostgreSQL connection string. Required to serve requests.
    pub database_url: Option<String>,
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// File holding the token signing secret.
    pub token_secret_file: Option<PathBuf>,
    /// Permit a random per-process token secret when the file is unreadable.
    #[ortho_config(default = false)]
    pub token_allow_ephemeral: bool,
    /// Lifetime of an ordinary access token.
    pub token_lifetime_secs: Option<u64>,
    /// Lifetime of a remember-me access token.
    pub remember_me_lifetime_secs: Option<u64>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
}

/// Error raised when a configured value cannot be used.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("INFUSION_DATABASE_URL must be set")]
    MissingDatabaseUrl,
    #[error("invalid bind address '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
}

impl AppSettings {
    pub fn database_url(&self) -> Result<&str, SettingsError> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or(SettingsError::MissingDatabaseUrl)
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value
            .parse()
            .map_err(|source| SettingsError::InvalidBindAddr {
                value: value.to_owned(),
                source,
            })
    }

    pub fn token_secret_file(&self) -> PathBuf {
        self.token_secret_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TOKEN_SECRET_FILE))
    }

    /// Token lifetimes for ordinary and remember-me logins.
    pub fn token_policy(&self) -> TokenPolicy {
        TokenPolicy {
            lifetime: Duration::from_secs(
                self.token_lifetime_secs
                    .unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS),
            ),
            remember_me_lifetime: Duration::from_secs(
                self.remember_me_lifetime_secs
                    .unwrap_or(DEFAULT_REMEMBER_ME_LIFETIME_SECS),
            ),
        }
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }
}
