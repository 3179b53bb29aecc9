use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
    Off,
}

impl FromStr for LogLevel {
    type Err = Error;

    fn from_str(level: &str) -> Result<Self, Self::Err> {
        match level.trim().to_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            "off" => Ok(LogLevel::Off),
            other => Err(Error::Config(format!("invalid log level: {}", other))),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
            LogLevel::Off => "off",
        };
        f.write_str(name)
    }
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
            LogLevel::Off => log::LevelFilter::Off,
        }
    }
}

impl From<log::LevelFilter> for LogLevel {
    fn from(level: log::LevelFilter) -> Self {
        match level {
            log::LevelFilter::Error => LogLevel::Error,
            log::LevelFilter::Warn => LogLevel::Warn,
            log::LevelFilter::Info => LogLevel::Info,
            log::LevelFilter::Debug => LogLevel::Debug,
            log::LevelFilter::Trace => LogLevel::Trace,
            log::LevelFilter::Off => LogLevel::Off,
        }
    }
}

/// Installs the stderr logger.
///
/// The backend accepts every level; `level` only sets the global maximum, which
/// `set_log_level` can change later. A second call keeps the first logger.
pub fn init_logging(level: LogLevel) {
    let installed = env_logger::Builder::new()
        .filter_level(log::LevelFilter::Trace)
        .filter_module("sqlx", log::LevelFilter::Warn)
        .format_timestamp_millis()
        .try_init();
    if installed.is_err() {
        log::debug!("logger already installed");
    }
    log::set_max_level(level.into());
}

/// Change the log level at runtime (not persisted)
pub fn set_log_level(level: &str) -> Result<(), Error> {
    let level: LogLevel = level.parse()?;
    log::set_max_level(level.into());
    Ok(())
}

/// Current log level
pub fn current_log_level() -> LogLevel {
    log::max_level().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("WARN".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!(" trace ".parse::<LogLevel>().unwrap(), LogLevel::Trace);
        assert!("verbose".parse::<LogLevel>().is_err());
    }

    #[test]
    fn level_filter_conversion_is_symmetric() {
        for level in [
            LogLevel::Error,
            LogLevel::Warn,
            LogLevel::Info,
            LogLevel::Debug,
            LogLevel::Trace,
            LogLevel::Off,
        ] {
            let filter: log::LevelFilter = level.into();
            assert_eq!(LogLevel::from(filter), level);
            assert_eq!(level.to_string().parse::<LogLevel>().unwrap(), level);
        }
    }

    #[test]
    fn set_log_level_changes_current_level() {
        let before = current_log_level();
        assert!(matches!(set_log_level("chatty"), Err(Error::Config(_))));
        assert_eq!(current_log_level(), before);

        set_log_level("warn").unwrap();
        assert_eq!(current_log_level(), LogLevel::Warn);
        set_log_level("off").unwrap();
        assert_eq!(current_log_level(), LogLevel::Off);
    }
}
