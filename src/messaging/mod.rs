//! In-process message delivery between the coordinator and the agents.

pub mod bus;
pub mod mailbox;

pub use bus::*;
pub use mailbox::*;
