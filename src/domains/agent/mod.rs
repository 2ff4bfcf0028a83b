pub mod delivery_agent;
pub mod flight_controller;
pub mod state;
pub mod state_machine;

pub use delivery_agent::*;
pub use flight_controller::*;
pub use state::*;
pub use state_machine::*;
