//! Server settings read from the environment.
//!
//! # Environment Variables
//!
//! - `HOST`: bind address (default: `0.0.0.0`)
//! - `PORT`: listening port (default: `3000`)
//! - `WORKER_THREADS`: tokio worker threads (default: logical CPU count)

use std::env;
use std::net::SocketAddr;

use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;

/// Errors in the server settings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServerConfigError {
    #[error("PORT='{0}' is not a valid port number")]
    InvalidPort(String),

    #[error("'{0}' is not a valid socket address")]
    InvalidAddress(String),
}

/// Where the HTTP server listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    /// Reads `HOST` and `PORT`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPort` if `PORT` is set but not a port number.
    pub fn from_env() -> Result<Self, ServerConfigError> {
        Self::from_values(env::var("HOST").ok().as_deref(), env::var("PORT").ok().as_deref())
    }

    /// Builds the settings from raw values. Blank values fall back to the
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPort` if `port` is not a port number.
    pub fn from_values(host: Option<&str>, port: Option<&str>) -> Result<Self, ServerConfigError> {
        let host = host
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_HOST)
            .to_string();
        let port = match port.map(str::trim).filter(|value| !value.is_empty()) {
            None => DEFAULT_PORT,
            Some(value) => value
                .parse()
                .map_err(|_| ServerConfigError::InvalidPort(value.to_string()))?,
        };
        Ok(Self { host, port })
    }

    /// The address to bind.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAddress` if `host` is not an IP address.
    pub fn socket_address(&self) -> Result<SocketAddr, ServerConfigError> {
        let address = format!("{}:{}", self.host, self.port);
        address
            .parse()
            .map_err(|_| ServerConfigError::InvalidAddress(address))
    }
}

/// Outcome of reading `WORKER_THREADS`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerThreads {
    /// Thread count to configure, or `None` for the runtime default.
    pub threads: Option<usize>,
    /// Set when the value was rejected or capped.
    pub warning: Option<String>,
}

/// Interprets a raw `WORKER_THREADS` value. Counts above four times
/// `available` are capped.
#[must_use]
pub fn parse_worker_threads(value: Option<&str>, available: usize) -> WorkerThreads {
    let Some(trimmed) = value.map(str::trim).filter(|value| !value.is_empty()) else {
        return WorkerThreads {
            threads: None,
            warning: None,
        };
    };

    match trimmed.parse::<usize>() {
        Ok(0) => WorkerThreads {
            threads: None,
            warning: Some("WORKER_THREADS=0 is invalid (must be > 0), using default".to_string()),
        },
        Ok(requested) => {
            let max_threads = available.saturating_mul(4);
            if requested > max_threads {
                WorkerThreads {
                    threads: Some(max_threads),
                    warning: Some(format!(
                        "WORKER_THREADS={requested} exceeds recommended limit ({max_threads}), capping to {max_threads}"
                    )),
                }
            } else {
                WorkerThreads {
                    threads: Some(requested),
                    warning: None,
                }
            }
        }
        Err(error) => WorkerThreads {
            threads: None,
            warning: Some(format!(
                "WORKER_THREADS='{trimmed}' is not a valid number ({error}), using default"
            )),
        },
    }
}
