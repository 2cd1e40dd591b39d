//! Runtime configuration for core callers.
//!
//! # Responsibility
//! - Resolve database location, logging and list defaults from environment
//!   variables with documented fallbacks.
//!
//! # Invariants
//! - Loading never touches the file system; paths are validated later by
//!   `db::open_db` and `logging::init_logging`.
//! - Every accepted value is normalized (trimmed, lowercased level, clamped
//!   limit).

use crate::logging::{default_log_level, normalize_level};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "VEHICLE_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "VEHICLE_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "VEHICLE_LOG_DIR";
pub const ENV_LIST_LIMIT: &str = "VEHICLE_LIST_LIMIT";

pub const DEFAULT_DB_FILE_NAME: &str = "vehicles.sqlite3";
pub const DEFAULT_LIST_LIMIT: u32 = 100;
pub const LIST_LIMIT_MAX: u32 = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidLogLevel(String),
    InvalidListLimit(String),
    EmptyValue(&'static str),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLogLevel(message) => write!(f, "{message}"),
            Self::InvalidListLimit(value) => write!(
                f,
                "invalid list limit `{value}`; expected an integer in 1..={LIST_LIMIT_MAX}"
            ),
            Self::EmptyValue(key) => write!(f, "`{key}` is set but empty"),
        }
    }
}

impl Error for ConfigError {}

/// Effective core configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoreConfig {
    /// SQLite database file.
    pub db_path: PathBuf,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: &'static str,
    /// Absolute directory for rolling log files; `None` disables file logging.
    pub log_dir: Option<PathBuf>,
    /// Page size used when a list call does not specify one.
    pub list_limit: u32,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level(),
            log_dir: None,
            list_limit: DEFAULT_LIST_LIMIT,
        }
    }
}

impl CoreConfig {
    /// Loads configuration from a key/value source keyed by the `ENV_*`
    /// names (the CLI passes flag and environment values through clap).
    ///
    /// Unset keys fall back to `CoreConfig::default()`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = non_empty(&lookup, ENV_DB_PATH)? {
            config.db_path = PathBuf::from(path);
        }
        if let Some(level) = non_empty(&lookup, ENV_LOG_LEVEL)? {
            config.log_level = normalize_level(&level).map_err(ConfigError::InvalidLogLevel)?;
        }
        if let Some(dir) = non_empty(&lookup, ENV_LOG_DIR)? {
            config.log_dir = Some(PathBuf::from(dir));
        }
        if let Some(limit) = non_empty(&lookup, ENV_LIST_LIMIT)? {
            config.list_limit = parse_list_limit(&limit)?;
        }

        Ok(config)
    }
}

/// Applies the configured default and upper bound to a requested page size.
pub fn normalize_list_limit(requested: Option<u32>, default_limit: u32) -> u32 {
    requested
        .unwrap_or(default_limit)
        .clamp(1, LIST_LIMIT_MAX)
}

fn non_empty<F>(lookup: &F, key: &'static str) -> Result<Option<String>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(value) if value.trim().is_empty() => Err(ConfigError::EmptyValue(key)),
        Some(value) => Ok(Some(value.trim().to_string())),
    }
}

fn parse_list_limit(value: &str) -> Result<u32, ConfigError> {
    match value.parse::<u32>() {
        Ok(limit) if (1..=LIST_LIMIT_MAX).contains(&limit) => Ok(limit),
        _ => Err(ConfigError::InvalidListLimit(value.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        normalize_list_limit, ConfigError, CoreConfig, DEFAULT_LIST_LIMIT, ENV_DB_PATH,
        ENV_LIST_LIMIT, ENV_LOG_DIR, ENV_LOG_LEVEL, LIST_LIMIT_MAX,
    };
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn load(pairs: &[(&str, &str)]) -> Result<CoreConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        CoreConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn unset_keys_use_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config, CoreConfig::default());
        assert_eq!(config.list_limit, DEFAULT_LIST_LIMIT);
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn values_are_trimmed_and_normalized() {
        let config = load(&[
            (ENV_DB_PATH, " /tmp/fleet.sqlite3 "),
            (ENV_LOG_LEVEL, "WARNING"),
            (ENV_LOG_DIR, "/var/log/vehicles"),
            (ENV_LIST_LIMIT, "25"),
        ])
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/fleet.sqlite3"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/vehicles")));
        assert_eq!(config.list_limit, 25);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            load(&[(ENV_LOG_LEVEL, "loud")]),
            Err(ConfigError::InvalidLogLevel(_))
        ));
        assert_eq!(
            load(&[(ENV_LIST_LIMIT, "0")]),
            Err(ConfigError::InvalidListLimit("0".to_string()))
        );
        assert_eq!(
            load(&[(ENV_DB_PATH, "  ")]),
            Err(ConfigError::EmptyValue(ENV_DB_PATH))
        );
    }

    #[test]
    fn list_limit_is_defaulted_and_clamped() {
        assert_eq!(normalize_list_limit(None, 10), 10);
        assert_eq!(normalize_list_limit(Some(0), 10), 1);
        assert_eq!(normalize_list_limit(Some(5000), 10), LIST_LIMIT_MAX);
    }
}
