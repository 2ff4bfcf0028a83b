pub mod agent;
pub mod coordinator;
pub mod flight_plan;
pub mod logger;
pub mod mission;
pub mod motion;

pub use logger::*;
