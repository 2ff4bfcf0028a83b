pub mod adapters;
pub mod application;
pub mod common;
pub mod config;
pub mod domains;
pub mod messaging;

pub use config::Config;

// Re-export common types
pub use common::*;
