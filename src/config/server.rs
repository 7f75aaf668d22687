//! Server configuration.

use std::net::SocketAddr;

use super::parse::{env_or, env_parse};
use super::ConfigError;

/// Default cap on buffered request body size (1 MiB). Request bodies are
/// irrelevant to the rewrite decision, so the server keeps them small.
const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Server configuration loaded from environment.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Listen address (LISTEN_ADDR).
    pub listen_addr: SocketAddr,
    /// Tokio worker threads (WORKERS, 0 = auto-detect).
    pub workers: usize,
    /// Maximum buffered request body size in bytes (MAX_BODY_BYTES).
    pub max_body_bytes: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let listen_raw = env_or("LISTEN_ADDR", "0.0.0.0:8080");
        let listen_addr: SocketAddr = listen_raw.parse().map_err(|e| ConfigError::Parse {
            key: "LISTEN_ADDR".into(),
            value: listen_raw,
            error: format!("{}", e),
        })?;

        Ok(Self {
            listen_addr,
            workers: env_parse("WORKERS", 0usize)?,
            max_body_bytes: env_parse("MAX_BODY_BYTES", DEFAULT_MAX_BODY_BYTES)?,
        })
    }

    /// Worker thread count with 0 resolved to the CPU count.
    pub fn worker_count(&self) -> usize {
        if self.workers == 0 {
            num_cpus::get()
        } else {
            self.workers
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: ([0, 0, 0, 0], 8080).into(),
            workers: 0,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}
