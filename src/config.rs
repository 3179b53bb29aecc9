//! Runtime settings
//!
//! Read from the environment:
//! - `GAME_REVIEWS_DATABASE_URL`: `memory` or `:memory:` for an in-memory
//!   database, a `sqlite:` URL used as is, or a file path.
//!   Unset means the default file under the data directory (see `game-path`).
//! - `GAME_REVIEWS_LOG`: log level, `info` when unset.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::utils::logs::LogLevel;

pub const DATABASE_URL_ENV: &str = "GAME_REVIEWS_DATABASE_URL";
pub const LOG_LEVEL_ENV: &str = "GAME_REVIEWS_LOG";

/// Local SQLite needs a single connection.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 1;
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(8);

/// Where the database lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseTarget {
    Memory,
    File(PathBuf),
    Url(String),
}

impl DatabaseTarget {
    /// Interprets a configured value.
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();
        match value {
            "" => Err(Error::Config(format!("{} is empty", DATABASE_URL_ENV))),
            "memory" | ":memory:" => Ok(DatabaseTarget::Memory),
            url if url.starts_with("sqlite:") => Ok(DatabaseTarget::Url(url.to_string())),
            path => Ok(DatabaseTarget::File(PathBuf::from(path))),
        }
    }

    /// Default file under the platform data directory.
    pub fn default_file() -> Result<Self> {
        game_path::get_db_path()
            .map(DatabaseTarget::File)
            .map_err(Error::Config)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub database: DatabaseTarget,
    pub log_level: LogLevel,
    pub max_connections: u32,
    #[serde(with = "duration_secs")]
    pub connect_timeout: Duration,
}

impl Settings {
    /// Settings for a throwaway in-memory database.
    pub fn in_memory() -> Self {
        Self::for_target(DatabaseTarget::Memory)
    }

    pub fn for_target(database: DatabaseTarget) -> Self {
        Self {
            database,
            log_level: LogLevel::default(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from any key lookup, `from_env` uses the process
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database = match lookup(DATABASE_URL_ENV) {
            Some(value) => DatabaseTarget::parse(&value)?,
            None => DatabaseTarget::default_file()?,
        };

        let log_level = match lookup(LOG_LEVEL_ENV) {
            Some(value) => value.parse()?,
            None => LogLevel::default(),
        };

        Ok(Self {
            log_level,
            ..Self::for_target(database)
        })
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
