pub mod planner;
pub mod profile;

pub use planner::*;
pub use profile::*;
