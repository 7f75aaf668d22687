//! Rewrite engine configuration.
//!
//! The suffix strings are configuration rather than hard-coded constants, so
//! deployments routing to a different extension mapping can reuse the engine
//! unchanged.

use crate::rewrite::{DEFAULT_EXTENSION_SUFFIX, DEFAULT_INDEX_DOCUMENT, DEFAULT_MAX_URL_LEN};

use super::parse::{env_or, env_parse};
use super::ConfigError;

/// Smallest acceptable URL length bound; anything lower cannot hold a
/// realistic request target.
const MIN_URL_LEN: usize = 16;

/// Rewrite engine configuration loaded from environment.
#[derive(Clone, Debug)]
pub struct RewriteConfig {
    /// Extension suffix appended to extension-less segments (e.g. ".rails").
    pub extension: String,
    /// Document name appended to directory references (e.g. "index.rails").
    pub index_document: String,
    /// Maximum accepted raw URL length in bytes.
    pub max_url_len: usize,
}

impl RewriteConfig {
    /// Load configuration from environment variables.
    ///
    /// - `REWRITE_EXTENSION`: must start with `.` and contain no `/`
    /// - `REWRITE_INDEX_DOCUMENT`: must be non-empty and contain no `/`
    /// - `MAX_URL_LENGTH`: bytes, at least 16
    pub fn from_env() -> Result<Self, ConfigError> {
        let extension = env_or("REWRITE_EXTENSION", DEFAULT_EXTENSION_SUFFIX);
        let index_document = env_or("REWRITE_INDEX_DOCUMENT", DEFAULT_INDEX_DOCUMENT);
        let max_url_len: usize = env_parse("MAX_URL_LENGTH", DEFAULT_MAX_URL_LEN)?;

        let config = Self {
            extension,
            index_document,
            max_url_len,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate field invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.extension.starts_with('.') || self.extension.len() < 2 {
            return Err(ConfigError::Invalid {
                key: "REWRITE_EXTENSION".into(),
                message: format!(
                    "'{}' must start with '.' and name an extension",
                    self.extension
                ),
            });
        }
        if self.extension.contains('/') || self.extension.contains('?') {
            return Err(ConfigError::Invalid {
                key: "REWRITE_EXTENSION".into(),
                message: "must not contain '/' or '?'".into(),
            });
        }
        if self.index_document.is_empty()
            || self.index_document.contains('/')
            || self.index_document.contains('?')
        {
            return Err(ConfigError::Invalid {
                key: "REWRITE_INDEX_DOCUMENT".into(),
                message: "must be a bare file name".into(),
            });
        }
        if self.max_url_len < MIN_URL_LEN {
            return Err(ConfigError::Invalid {
                key: "MAX_URL_LENGTH".into(),
                message: format!("must be at least {}", MIN_URL_LEN),
            });
        }
        Ok(())
    }

    /// The extension without its leading dot, as the dispatcher keys on it.
    pub fn extension_key(&self) -> &str {
        &self.extension[1..]
    }
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            extension: DEFAULT_EXTENSION_SUFFIX.to_string(),
            index_document: DEFAULT_INDEX_DOCUMENT.to_string(),
            max_url_len: DEFAULT_MAX_URL_LEN,
        }
    }
}
