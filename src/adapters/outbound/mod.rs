pub mod buffered_logger;
pub mod console_logger;
pub mod file_logger;
pub mod kinematic_flight_controller;
pub mod memory_logger;
pub mod mission_log;
pub mod multi_logger;

pub use buffered_logger::*;
pub use console_logger::*;
pub use file_logger::*;
pub use kinematic_flight_controller::*;
pub use memory_logger::*;
pub use mission_log::*;
pub use multi_logger::*;
