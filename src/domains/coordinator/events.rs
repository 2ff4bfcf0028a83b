use super::aggregate::AgentCapabilities;
use crate::common::DomainEvent;
use crate::domains::agent::AgentState;
use crate::domains::flight_plan::FlightStep;
use crate::domains::mission::{FlightPreferences, Location, Mission, MissionStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CoordinatorEvent {
    CoordinatorCreated {
        coordinator_id: String,
        timestamp: DateTime<Utc>,
    },
    AgentRegistered {
        coordinator_id: String,
        agent_name: String,
        capabilities: AgentCapabilities,
        timestamp: DateTime<Utc>,
    },
    AgentDeregistered {
        coordinator_id: String,
        agent_name: String,
        timestamp: DateTime<Utc>,
    },
    AgentTelemetryUpdated {
        coordinator_id: String,
        agent_name: String,
        position: Location,
        battery_level: f64,
        state: AgentState,
        reported_at: String,
        timestamp: DateTime<Utc>,
    },
    MissionQueued {
        coordinator_id: String,
        mission: Mission,
        timestamp: DateTime<Utc>,
    },
    MissionAssigned {
        coordinator_id: String,
        mission_id: String,
        agent_name: String,
        pickup_location: Location,
        flight_preferences: FlightPreferences,
        flight_plan: Vec<FlightStep>,
        timestamp: DateTime<Utc>,
    },
    MissionStatusChanged {
        coordinator_id: String,
        mission_id: String,
        from: MissionStatus,
        to: MissionStatus,
        timestamp: DateTime<Utc>,
    },
    AgentReleased {
        coordinator_id: String,
        agent_name: String,
        mission_id: String,
        timestamp: DateTime<Utc>,
    },
    MissionArchived {
        coordinator_id: String,
        mission_id: String,
        timestamp: DateTime<Utc>,
    },
}

impl DomainEvent for CoordinatorEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CoordinatorEvent::CoordinatorCreated { .. } => "CoordinatorCreated",
            CoordinatorEvent::AgentRegistered { .. } => "AgentRegistered",
            CoordinatorEvent::AgentDeregistered { .. } => "AgentDeregistered",
            CoordinatorEvent::AgentTelemetryUpdated { .. } => "AgentTelemetryUpdated",
            CoordinatorEvent::MissionQueued { .. } => "MissionQueued",
            CoordinatorEvent::MissionAssigned { .. } => "MissionAssigned",
            CoordinatorEvent::MissionStatusChanged { .. } => "MissionStatusChanged",
            CoordinatorEvent::AgentReleased { .. } => "AgentReleased",
            CoordinatorEvent::MissionArchived { .. } => "MissionArchived",
        }
    }

    fn aggregate_id(&self) -> &str {
        match self {
            CoordinatorEvent::CoordinatorCreated { coordinator_id, .. }
            | CoordinatorEvent::AgentRegistered { coordinator_id, .. }
            | CoordinatorEvent::AgentDeregistered { coordinator_id, .. }
            | CoordinatorEvent::AgentTelemetryUpdated { coordinator_id, .. }
            | CoordinatorEvent::MissionQueued { coordinator_id, .. }
            | CoordinatorEvent::MissionAssigned { coordinator_id, .. }
            | CoordinatorEvent::MissionStatusChanged { coordinator_id, .. }
            | CoordinatorEvent::AgentReleased { coordinator_id, .. }
            | CoordinatorEvent::MissionArchived { coordinator_id, .. } => coordinator_id,
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            CoordinatorEvent::CoordinatorCreated { timestamp, .. }
            | CoordinatorEvent::AgentRegistered { timestamp, .. }
            | CoordinatorEvent::AgentDeregistered { timestamp, .. }
            | CoordinatorEvent::AgentTelemetryUpdated { timestamp, .. }
            | CoordinatorEvent::MissionQueued { timestamp, .. }
            | CoordinatorEvent::MissionAssigned { timestamp, .. }
            | CoordinatorEvent::MissionStatusChanged { timestamp, .. }
            | CoordinatorEvent::AgentReleased { timestamp, .. }
            | CoordinatorEvent::MissionArchived { timestamp, .. } => *timestamp,
        }
    }
}
