use crate::domains::logger::{DomainLogger, DynLogger, LogLevel};
use std::sync::Arc;

/// Sends each line to every target, in the order they were given.
pub struct MultiLogger {
    targets: Vec<DynLogger>,
}

impl MultiLogger {
    pub fn new(targets: Vec<DynLogger>) -> Self {
        Self { targets }
    }

    fn fan_out(&self, level: LogLevel, msg: &str) {
        for target in &self.targets {
            target.log(level, msg);
        }
    }
}

impl DomainLogger for MultiLogger {
    fn info(&self, msg: &str) {
        self.fan_out(LogLevel::Info, msg);
    }

    fn warn(&self, msg: &str) {
        self.fan_out(LogLevel::Warn, msg);
    }

    fn error(&self, msg: &str) {
        self.fan_out(LogLevel::Error, msg);
    }
}

/// Console always; the `fast_log` file as well when `path` is set and it opens.
pub fn init_logger(path: Option<&str>, level: &str) -> DynLogger {
    let console = super::init_console_logger();
    let Some(path) = path else {
        return console;
    };
    match super::init_file_logger(path, level, env!("CARGO_PKG_NAME")) {
        Ok(file) => Arc::new(MultiLogger::new(vec![file, console])),
        Err(e) => {
            console.warn(&format!("{}; logging to console only", e));
            console
        }
    }
}
