pub mod assignment;
pub mod coordinator;
pub mod event_apply;
pub mod types;

pub use coordinator::*;
pub use types::*;
