use super::types::Location;
use serde::{Deserialize, Serialize};

/// A named point that can serve as a pickup pad or a delivery drop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidatePoint {
    pub name: String,
    pub location: Location,
}

impl CandidatePoint {
    pub fn new(name: impl Into<String>, location: Location) -> Self {
        Self {
            name: name.into(),
            location,
        }
    }
}

/// Port the mission domain depends on for its delivery and pickup points.
/// Adapters provide static lists or filesystem-backed pools.
pub trait CandidatePool: Send + Sync {
    fn delivery_points(&self) -> Vec<CandidatePoint>;
    fn pickup_points(&self) -> Vec<CandidatePoint>;
}

/// One flat record per status event, written by log sinks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionLogRecord {
    pub player_name: String,
    pub current_time: String,
    pub latitude: String,
    pub longitude: String,
    pub altitude: String,
    pub azimuth: String,
    pub battery: String,
    pub state: String,
    pub mission_id: String,
    pub mission_status: String,
    pub arrival_date_time: String,
    pub action: String,
    pub priority: String,
    pub package_weight: String,
}

impl MissionLogRecord {
    /// Placeholder used for mission fields when the mission is unknown to the coordinator.
    pub const MISSING: &'static str = "NaN";

    /// Column order used by line-oriented sinks.
    pub const HEADER: [&'static str; 14] = [
        "PlayerName",
        "CurrentTime",
        "Lat",
        "Lon",
        "Alt",
        "Azimuth",
        "Battery",
        "State",
        "MissionId",
        "MissionStatus",
        "arrivalDateTime",
        "action",
        "priority",
        "packageWeight",
    ];

    pub fn fields(&self) -> [&str; 14] {
        [
            &self.player_name,
            &self.current_time,
            &self.latitude,
            &self.longitude,
            &self.altitude,
            &self.azimuth,
            &self.battery,
            &self.state,
            &self.mission_id,
            &self.mission_status,
            &self.arrival_date_time,
            &self.action,
            &self.priority,
            &self.package_weight,
        ]
    }
}

/// Fire-and-forget destination for mission log records.
pub trait MissionLogSink: Send + Sync {
    fn record(&self, record: MissionLogRecord);
}
