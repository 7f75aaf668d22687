//! Configuration module for tokio_rewrite.
//!
//! This module provides centralized configuration loading from environment
//! variables.
//!
//! # Example
//!
//! ```rust,ignore
//! use tokio_rewrite::config::Config;
//!
//! let config = Config::from_env()?;
//! println!("Listen address: {}", config.server.listen_addr);
//! println!("Routing extension: {}", config.rewrite.extension);
//! ```

mod error;
mod logging;
mod middleware;
mod parse;
mod rewrite;
mod server;

pub use error::ConfigError;
pub use logging::LoggingConfig;
pub use middleware::MiddlewareConfig;
pub use rewrite::RewriteConfig;
pub use server::ServerConfig;

/// Complete application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Rewrite engine configuration.
    pub rewrite: RewriteConfig,
    /// Middleware configuration.
    pub middleware: MiddlewareConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            server: ServerConfig::from_env()?,
            rewrite: RewriteConfig::from_env()?,
            middleware: MiddlewareConfig::from_env()?,
            logging: LoggingConfig::from_env()?,
        })
    }

    /// Print configuration summary to log.
    pub fn log_summary(&self) {
        use tracing::info;

        info!("Configuration loaded:");
        info!("  Listen: {}", self.server.listen_addr);
        info!("  Workers: {}", self.server.worker_count());
        info!("  Routing extension: {}", self.rewrite.extension);
        info!("  Index document: {}", self.rewrite.index_document);
        info!("  Max URL length: {}", self.rewrite.max_url_len);

        if !self.middleware.rewrite {
            info!("  URL rewriting: disabled");
        }

        if self.middleware.access_log {
            info!("  Access log: enabled");
        }
    }
}
