pub mod candidates;
pub mod codec;
pub mod generator;
pub mod ports;
pub mod types;

pub use candidates::*;
pub use codec::{
    decode_assignment, decode_mission, decode_new_mission, decode_status, encode_assignment,
    encode_mission, encode_new_mission, encode_status,
};
pub use generator::*;
pub use ports::*;
pub use types::*;
