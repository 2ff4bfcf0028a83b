use crate::common::Vec3;
use crate::domains::agent::AgentState;
use serde::{Deserialize, Serialize};

/// One entry of a flight plan: the state to be in, where to go, which way to face, how fast.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightStep {
    pub target_state: AgentState,
    pub target_position: Vec3,
    pub target_orientation: f64,
    pub max_velocity: f64,
}

impl FlightStep {
    pub fn new(
        target_state: AgentState,
        target_position: Vec3,
        target_orientation: f64,
        max_velocity: f64,
    ) -> Self {
        Self {
            target_state,
            target_position,
            target_orientation,
            max_velocity,
        }
    }
}
