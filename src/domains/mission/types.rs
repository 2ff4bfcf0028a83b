use crate::common::Vec3;
use crate::domains::agent::AgentState;
use crate::domains::flight_plan::FlightStep;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A point plus heading. Longitude maps to local x, altitude to y, latitude to z.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    pub azimuth: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64, altitude: f64, azimuth: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude,
            azimuth,
        }
    }

    pub fn from_position(position: Vec3, azimuth: f64) -> Self {
        Self {
            latitude: position.z,
            longitude: position.x,
            altitude: position.y,
            azimuth,
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::new(self.longitude, self.altitude, self.latitude)
    }

    /// Same location with every component rounded to two decimals, as written to mission logs.
    pub fn rounded(&self) -> Location {
        Location {
            latitude: hundredths(self.latitude),
            longitude: hundredths(self.longitude),
            altitude: hundredths(self.altitude),
            azimuth: hundredths(self.azimuth),
        }
    }
}

pub fn hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AvoidZone {
    pub latitude: f64,
    pub longitude: f64,
    pub radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightPreferences {
    pub max_velocity: f64,
    pub max_altitude: f64,
    pub initial_path: Vec<Location>,
    #[serde(default)]
    pub avoid_zones: Vec<AvoidZone>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MissionAction {
    PickAndDelivery,
    ReturnToHub,
}

impl fmt::Display for MissionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissionAction::PickAndDelivery => write!(f, "PickAndDelivery"),
            MissionAction::ReturnToHub => write!(f, "ReturnToHub"),
        }
    }
}

/// Mission lifecycle. Transitions only ever move one step forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MissionStatus {
    Pending,
    InProgress,
    PackageDelivered,
    Completed,
}

impl MissionStatus {
    pub fn next(self) -> Option<MissionStatus> {
        match self {
            MissionStatus::Pending => Some(MissionStatus::InProgress),
            MissionStatus::InProgress => Some(MissionStatus::PackageDelivered),
            MissionStatus::PackageDelivered => Some(MissionStatus::Completed),
            MissionStatus::Completed => None,
        }
    }

    pub fn can_transition_to(self, target: MissionStatus) -> bool {
        self.next() == Some(target)
    }

    pub fn is_terminal(self) -> bool {
        self == MissionStatus::Completed
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MissionStatus::Pending => "Pending",
            MissionStatus::InProgress => "InProgress",
            MissionStatus::PackageDelivered => "PackageDelivered",
            MissionStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for MissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(MissionStatus::Pending),
            "InProgress" => Ok(MissionStatus::InProgress),
            "PackageDelivered" => Ok(MissionStatus::PackageDelivered),
            "Completed" => Ok(MissionStatus::Completed),
            other => Err(format!("unknown mission status '{}'", other)),
        }
    }
}

/// Generator output: a delivery request that has not been planned yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMission {
    pub mission_id: String,
    pub arrival_date_time: String,
    pub delivery_location: Location,
    pub package_weight: f64,
    pub priority: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mission {
    pub mission_id: String,
    pub arrival_date_time: String,
    pub action: MissionAction,
    #[serde(rename = "missionStatus")]
    pub status: MissionStatus,
    pub delivery_location: Location,
    pub package_weight: f64,
    pub priority: i32,
    // Pickup and preferences are chosen when the mission is assigned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pickup_location: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flight_preferences: Option<FlightPreferences>,
}

impl Mission {
    pub fn from_new(new_mission: NewMission) -> Self {
        Self {
            mission_id: new_mission.mission_id,
            arrival_date_time: new_mission.arrival_date_time,
            action: MissionAction::PickAndDelivery,
            status: MissionStatus::Pending,
            delivery_location: new_mission.delivery_location,
            package_weight: new_mission.package_weight,
            priority: new_mission.priority,
            pickup_location: None,
            flight_preferences: None,
        }
    }
}

/// What the coordinator sends to an agent: the mission plus its synthesized plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionAssignment {
    pub mission: Mission,
    pub flight_plan: Vec<FlightStep>,
}

/// Agent -> coordinator report. Mission fields are blank on the wire when the agent is idle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusMessage {
    #[serde(rename = "playerName")]
    pub agent_name: String,
    #[serde(rename = "currentTime")]
    pub timestamp: String,
    pub position_orientation: Location,
    pub battery_level: f64,
    pub current_state: AgentState,
    #[serde(default, with = "super::codec::blank_as_none")]
    pub mission_id: Option<String>,
    #[serde(default, with = "super::codec::blank_as_none")]
    pub mission_status: Option<MissionStatus>,
}
