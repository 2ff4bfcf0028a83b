use crate::domains::motion::ProfileKind;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AgentState {
    #[default]
    StandBy,
    TakeOff,
    MoveToCheckPoint,
    MoveToPickupPackage,
    MoveToDelivery,
    Land,
    PickUpPackage,
    DeliverPackage,
    ReturnToHub,
}

impl AgentState {
    /// How close the agent must be to the step target before the step counts as reached.
    pub fn tolerance(self) -> f64 {
        match self {
            AgentState::StandBy => 0.0,
            AgentState::TakeOff
            | AgentState::MoveToPickupPackage
            | AgentState::MoveToDelivery
            | AgentState::Land => 0.5,
            AgentState::MoveToCheckPoint => 5.0,
            AgentState::PickUpPackage | AgentState::DeliverPackage => 0.1,
            AgentState::ReturnToHub => 0.25,
        }
    }

    /// Motion profile for the state; `None` when the agent holds still.
    pub fn profile_kind(self) -> Option<ProfileKind> {
        match self {
            AgentState::StandBy => None,
            AgentState::TakeOff
            | AgentState::MoveToPickupPackage
            | AgentState::MoveToDelivery
            | AgentState::ReturnToHub => Some(ProfileKind::RouteToTarget),
            AgentState::MoveToCheckPoint => Some(ProfileKind::ThroughCheckPoint),
            AgentState::PickUpPackage | AgentState::DeliverPackage => Some(ProfileKind::PickDeliver),
            AgentState::Land => Some(ProfileKind::Land),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AgentState::StandBy => "StandBy",
            AgentState::TakeOff => "TakeOff",
            AgentState::MoveToCheckPoint => "MoveToCheckPoint",
            AgentState::MoveToPickupPackage => "MoveToPickupPackage",
            AgentState::MoveToDelivery => "MoveToDelivery",
            AgentState::Land => "Land",
            AgentState::PickUpPackage => "PickUpPackage",
            AgentState::DeliverPackage => "DeliverPackage",
            AgentState::ReturnToHub => "ReturnToHub",
        }
    }
}

impl fmt::Display for AgentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
