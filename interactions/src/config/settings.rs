use std::env;
use std::path::PathBuf;

use interactions_controller::{ControllerConfig, CounterWriteMode};
use interactions_repository::StoreSource;

use crate::errors::ConfigError;

const DEFAULT_CAS_MAX_ATTEMPTS: u32 = 5;
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Which remote store backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreMode {
    Live,
    Mock,
}

/// Service settings read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub store: StoreMode,
    pub database_url: Option<String>,
    pub counter_mode: CounterWriteMode,
    pub cache_file: Option<PathBuf>,
    pub max_connections: u32,
}

fn var(name: &'static str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u32(name: &'static str, default: u32) -> Result<u32, ConfigError> {
    match var(name) {
        Some(value) => match value.trim().parse::<u32>() {
            Ok(parsed) if parsed > 0 => Ok(parsed),
            _ => Err(ConfigError::invalid(name, value)),
        },
        None => Ok(default),
    }
}

impl Settings {
    /// Reads the settings from the environment.
    ///
    /// # Environment Variables
    ///
    /// - `INTERACTIONS_STORE`: "live" or "mock" (default: live)
    /// - `DATABASE_URL`: PostgreSQL connection URL, required in live mode
    /// - `INTERACTIONS_COUNTER_MODE`: "atomic" or "cas" (default: atomic)
    /// - `INTERACTIONS_CAS_MAX_ATTEMPTS`: Compare-and-set attempts (default: 5)
    /// - `INTERACTIONS_CACHE_FILE`: Path of the JSON vote cache (default: in memory)
    /// - `INTERACTIONS_DB_MAX_CONNECTIONS`: Pool size (default: 10)
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - The parsed settings
    /// * `Err(ConfigError)` - If a variable is missing or malformed
    pub fn from_env() -> Result<Self, ConfigError> {
        let store = match var("INTERACTIONS_STORE").map(|v| v.trim().to_lowercase()) {
            None => StoreMode::Live,
            Some(v) if v == "live" => StoreMode::Live,
            Some(v) if v == "mock" => StoreMode::Mock,
            Some(v) => return Err(ConfigError::invalid("INTERACTIONS_STORE", v)),
        };

        let database_url = var("DATABASE_URL");
        if store == StoreMode::Live && database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        let counter_mode = match var("INTERACTIONS_COUNTER_MODE").map(|v| v.trim().to_lowercase()) {
            None => CounterWriteMode::Atomic,
            Some(v) if v == "atomic" => CounterWriteMode::Atomic,
            Some(v) if v == "cas" => CounterWriteMode::CompareAndSwap {
                max_attempts: parse_u32("INTERACTIONS_CAS_MAX_ATTEMPTS", DEFAULT_CAS_MAX_ATTEMPTS)?,
            },
            Some(v) => return Err(ConfigError::invalid("INTERACTIONS_COUNTER_MODE", v)),
        };

        Ok(Self {
            store,
            database_url,
            counter_mode,
            cache_file: var("INTERACTIONS_CACHE_FILE").map(PathBuf::from),
            max_connections: parse_u32("INTERACTIONS_DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?,
        })
    }

    /// Settings for an in-memory store, used by tests and local runs.
    pub fn mock() -> Self {
        Self {
            store: StoreMode::Mock,
            database_url: None,
            counter_mode: CounterWriteMode::Atomic,
            cache_file: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }

    pub fn store_source(&self) -> Result<StoreSource, ConfigError> {
        match (self.store, &self.database_url) {
            (StoreMode::Mock, _) => Ok(StoreSource::mock()),
            (StoreMode::Live, Some(url)) => {
                Ok(StoreSource::live(url.clone()).with_max_connections(self.max_connections))
            }
            (StoreMode::Live, None) => Err(ConfigError::Missing("DATABASE_URL")),
        }
    }

    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            counter_mode: self.counter_mode,
            ..ControllerConfig::default()
        }
    }
}
