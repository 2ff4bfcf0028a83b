pub mod candidate_pool;

pub use candidate_pool::*;
