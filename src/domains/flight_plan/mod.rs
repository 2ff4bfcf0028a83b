pub mod step;
pub mod synthesis;

pub use step::*;
pub use synthesis::*;
