//! Environment variable parsing utilities.

use std::str::FromStr;

use super::ConfigError;

/// Get environment variable with default value.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse environment variable as boolean.
/// Treats "1", "true" (case-insensitive) as true.
pub fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .map(|v| v == "1" || v.to_lowercase() == "true")
        .unwrap_or(default)
}

/// Parse environment variable with type conversion.
pub fn env_parse<T: FromStr>(key: &str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(v) if !v.is_empty() => v.parse().map_err(|e: T::Err| ConfigError::Parse {
            key: key.into(),
            value: v,
            error: e.to_string(),
        }),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_or() {
        std::env::remove_var("TOKIO_REWRITE_TEST_ENV_OR");
        assert_eq!(env_or("TOKIO_REWRITE_TEST_ENV_OR", "fallback"), "fallback");

        std::env::set_var("TOKIO_REWRITE_TEST_ENV_OR", "set");
        assert_eq!(env_or("TOKIO_REWRITE_TEST_ENV_OR", "fallback"), "set");
        std::env::remove_var("TOKIO_REWRITE_TEST_ENV_OR");
    }

    #[test]
    fn test_env_bool() {
        std::env::remove_var("TOKIO_REWRITE_TEST_ENV_BOOL");
        assert!(!env_bool("TOKIO_REWRITE_TEST_ENV_BOOL", false));
        assert!(env_bool("TOKIO_REWRITE_TEST_ENV_BOOL", true));

        std::env::set_var("TOKIO_REWRITE_TEST_ENV_BOOL", "1");
        assert!(env_bool("TOKIO_REWRITE_TEST_ENV_BOOL", false));

        std::env::set_var("TOKIO_REWRITE_TEST_ENV_BOOL", "TRUE");
        assert!(env_bool("TOKIO_REWRITE_TEST_ENV_BOOL", false));

        std::env::set_var("TOKIO_REWRITE_TEST_ENV_BOOL", "no");
        assert!(!env_bool("TOKIO_REWRITE_TEST_ENV_BOOL", false));
        std::env::remove_var("TOKIO_REWRITE_TEST_ENV_BOOL");
    }

    #[test]
    fn test_env_parse() {
        std::env::remove_var("TOKIO_REWRITE_TEST_ENV_PARSE");
        assert_eq!(env_parse("TOKIO_REWRITE_TEST_ENV_PARSE", 42u32).unwrap(), 42);

        std::env::set_var("TOKIO_REWRITE_TEST_ENV_PARSE", "7");
        assert_eq!(env_parse("TOKIO_REWRITE_TEST_ENV_PARSE", 42u32).unwrap(), 7);

        std::env::set_var("TOKIO_REWRITE_TEST_ENV_PARSE", "not-a-number");
        assert!(env_parse("TOKIO_REWRITE_TEST_ENV_PARSE", 42u32).is_err());
        std::env::remove_var("TOKIO_REWRITE_TEST_ENV_PARSE");
    }
}
