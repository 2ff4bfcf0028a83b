pub use crate::domains::logger::LogLevel;
use crate::domains::logger::{DomainLogger, DynLogger};
use std::sync::{Arc, Mutex, PoisonError};

/// Keeps log lines in memory so a run can be inspected afterwards.
/// With `capture` off it discards everything.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    capture: bool,
    lines: Mutex<Vec<(LogLevel, String)>>,
}

impl MemoryLogger {
    pub fn capturing() -> Self {
        Self {
            capture: true,
            lines: Mutex::new(Vec::new()),
        }
    }

    pub fn lines(&self) -> Vec<(LogLevel, String)> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// True when some line at `level` contains `needle`.
    pub fn contains(&self, level: LogLevel, needle: &str) -> bool {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|(l, msg)| *l == level && msg.contains(needle))
    }

    fn push(&self, level: LogLevel, msg: &str) {
        if self.capture {
            self.lines
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push((level, msg.to_string()));
        }
    }
}

impl DomainLogger for MemoryLogger {
    fn info(&self, msg: &str) {
        self.push(LogLevel::Info, msg);
    }

    fn warn(&self, msg: &str) {
        self.push(LogLevel::Warn, msg);
    }

    fn error(&self, msg: &str) {
        self.push(LogLevel::Error, msg);
    }
}

/// Discarding logger for tests and headless runs
pub fn init_noop_logger() -> DynLogger {
    Arc::new(MemoryLogger::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capturing_logger_keeps_levels() {
        let logger = MemoryLogger::capturing();
        logger.info("queued m-1");
        logger.warn("dropping m-2");
        assert!(logger.contains(LogLevel::Warn, "m-2"));
        assert!(!logger.contains(LogLevel::Error, "m-2"));
        assert_eq!(logger.lines().len(), 2);
    }

    #[test]
    fn default_logger_discards() {
        let logger = MemoryLogger::default();
        logger.error("lost");
        assert!(logger.lines().is_empty());
    }
}
