use crate::common::{DomainError, DomainResult};
use chrono::Utc;
use log::LevelFilter;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for log::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Info => log::Level::Info,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Error => log::Level::Error,
        }
    }
}

/// Logging port injected into the coordinator, agents and services.
/// Non-fallible from the caller's side: a logger that cannot write drops the message.
pub trait DomainLogger: Send + Sync + 'static {
    fn info(&self, msg: &str);
    fn warn(&self, msg: &str);
    fn error(&self, msg: &str);

    fn log(&self, level: LogLevel, msg: &str) {
        match level {
            LogLevel::Info => self.info(msg),
            LogLevel::Warn => self.warn(msg),
            LogLevel::Error => self.error(msg),
        }
    }
}

pub type DynLogger = Arc<dyn DomainLogger>;

/// Writes through the `log` facade under a fixed target, so one `fast_log`
/// file can hold the coordinator and every agent apart.
pub struct FileLogger {
    target: String,
}

impl FileLogger {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
        }
    }

    /// Installs `fast_log` as the global `log` backend, appending to `path`.
    /// Only the first call in a process succeeds.
    pub fn install(path: &str, level: LevelFilter) -> DomainResult<()> {
        fast_log::init(fast_log::config::Config::new().file(path).level(level))
            .map(|_| ())
            .map_err(|e| {
                DomainError::InfrastructureError(format!(
                    "fast_log could not open {}: {}",
                    path, e
                ))
            })
    }

    fn write(&self, level: LogLevel, msg: &str) {
        log::log!(
            target: &self.target,
            log::Level::from(level),
            "{} {}",
            Utc::now().format("%H:%M:%S%.3f"),
            msg
        );
    }
}

impl DomainLogger for FileLogger {
    fn info(&self, msg: &str) {
        self.write(LogLevel::Info, msg);
    }

    fn warn(&self, msg: &str) {
        self.write(LogLevel::Warn, msg);
    }

    fn error(&self, msg: &str) {
        self.write(LogLevel::Error, msg);
    }
}

/// Parses a textual level such as `"info"` or `"WARN"`, falling back to `Info`.
pub fn parse_level(level: &str) -> LevelFilter {
    level.trim().parse().unwrap_or(LevelFilter::Info)
}
