//! Middleware configuration.

use super::parse::env_bool;
use super::ConfigError;

/// Middleware configuration loaded from environment.
#[derive(Clone, Debug)]
pub struct MiddlewareConfig {
    /// URL rewrite stage enabled.
    pub rewrite: bool,
    /// Access logging enabled.
    pub access_log: bool,
}

impl MiddlewareConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            rewrite: env_bool("REWRITE", true),
            access_log: env_bool("ACCESS_LOG", false),
        })
    }
}

impl Default for MiddlewareConfig {
    fn default() -> Self {
        Self {
            rewrite: true,
            access_log: false,
        }
    }
}
