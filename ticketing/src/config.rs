//! Configuration management for the ticket purchase tool.
//!
//! Loads configuration from environment variables with sensible defaults.

use cinema_tickets_core::types::AccountId;
use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A variable was set to something unusable
    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        /// Environment variable name
        key: &'static str,
        /// Raw value
        value: String,
        /// What was wrong with it
        reason: String,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Logging configuration
    pub log: LogConfig,
    /// In-process gateway configuration
    pub gateway: GatewayConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// `EnvFilter` directive (trace, debug, info, warn, error, or per-target)
    pub level: String,
    /// Colourise output
    pub ansi: bool,
    /// Print the log target (module path) on each line
    pub with_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            ansi: true,
            with_target: false,
        }
    }
}

/// In-process gateway configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Accounts whose payments the development gateway declines
    pub declined_accounts: Vec<AccountId>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `RUST_LOG` | `info` |
    /// | `CINEMA_LOG_ANSI` | `true` |
    /// | `CINEMA_LOG_TARGET` | `false` |
    /// | `CINEMA_PAYMENT_DECLINE_ACCOUNTS` | empty (comma-separated ids) |
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if a boolean or account list
    /// cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// # Errors
    ///
    /// Same as [`Config::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = LogConfig::default();

        Ok(Self {
            log: LogConfig {
                level: lookup("RUST_LOG").unwrap_or(defaults.level),
                ansi: parse_bool(&lookup, "CINEMA_LOG_ANSI", defaults.ansi)?,
                with_target: parse_bool(&lookup, "CINEMA_LOG_TARGET", defaults.with_target)?,
            },
            gateway: GatewayConfig {
                declined_accounts: parse_accounts(&lookup, "CINEMA_PAYMENT_DECLINE_ACCOUNTS")?,
            },
        })
    }
}

fn parse_bool<F>(lookup: &F, key: &'static str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidValue {
                key,
                value,
                reason: "expected true or false".to_string(),
            }),
        },
    }
}

fn parse_accounts<F>(lookup: &F, key: &'static str) -> Result<Vec<AccountId>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = lookup(key) else {
        return Ok(Vec::new());
    };

    value
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| {
            id.parse().map_err(|e: cinema_tickets_core::error::ParseError| {
                ConfigError::InvalidValue {
                    key,
                    value: value.clone(),
                    reason: e.to_string(),
                }
            })
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.log.level, "info");
        assert!(config.log.ansi);
        assert!(config.gateway.declined_accounts.is_empty());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("RUST_LOG", "cinema_tickets=debug"),
            ("CINEMA_LOG_ANSI", "off"),
            ("CINEMA_LOG_TARGET", "TRUE"),
            ("CINEMA_PAYMENT_DECLINE_ACCOUNTS", "13, 42,"),
        ]))
        .unwrap();

        assert_eq!(config.log.level, "cinema_tickets=debug");
        assert!(!config.log.ansi);
        assert!(config.log.with_target);
        assert_eq!(
            config.gateway.declined_accounts,
            vec![AccountId::new(13).unwrap(), AccountId::new(42).unwrap()]
        );
    }

    #[test]
    fn test_invalid_bool() {
        let error = Config::from_lookup(lookup(&[("CINEMA_LOG_ANSI", "sometimes")])).unwrap_err();
        assert!(matches!(
            error,
            ConfigError::InvalidValue { key: "CINEMA_LOG_ANSI", .. }
        ));
    }

    #[test]
    fn test_invalid_account_list() {
        let error =
            Config::from_lookup(lookup(&[("CINEMA_PAYMENT_DECLINE_ACCOUNTS", "7,0")])).unwrap_err();
        assert!(matches!(
            error,
            ConfigError::InvalidValue { key: "CINEMA_PAYMENT_DECLINE_ACCOUNTS", .. }
        ));
    }
}
