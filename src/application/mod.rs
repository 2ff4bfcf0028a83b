pub mod agent_runtime;
pub mod clock;
pub mod coordinator_service;
pub mod simulation;

pub use agent_runtime::*;
pub use clock::*;
pub use coordinator_service::*;
pub use simulation::*;
