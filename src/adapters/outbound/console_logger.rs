use crate::domains::logger::{DomainLogger, DynLogger};
use std::sync::Arc;

/// Forwards domain log lines to `tracing`, so they show up under the binary's subscriber.
struct TracingBridge;

impl DomainLogger for TracingBridge {
    fn info(&self, msg: &str) {
        tracing::info!(target: "fleet_dispatch", "{}", msg);
    }
    fn warn(&self, msg: &str) {
        tracing::warn!(target: "fleet_dispatch", "{}", msg);
    }
    fn error(&self, msg: &str) {
        tracing::error!(target: "fleet_dispatch", "{}", msg);
    }
}

/// Console-backed logger used when no log file is configured.
pub fn init_console_logger() -> DynLogger {
    Arc::new(TracingBridge)
}
