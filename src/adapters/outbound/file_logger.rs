use crate::common::DomainResult;
use crate::domains::logger::{parse_level, DynLogger, FileLogger};
use std::sync::Arc;

/// Starts `fast_log` at `path` and hands back a logger writing under `target`.
pub fn init_file_logger(path: &str, level: &str, target: &str) -> DomainResult<DynLogger> {
    FileLogger::install(path, parse_level(level))?;
    Ok(Arc::new(FileLogger::new(target)))
}
