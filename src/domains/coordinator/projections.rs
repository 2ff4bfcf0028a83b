use super::events::CoordinatorEvent;
use crate::domains::mission::MissionStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Read model of the fleet: mission counts per status and which agents are busy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FleetOverview {
    pub coordinator_id: String,
    pub mission_statuses: HashMap<String, MissionStatus>,
    pub idle_agents: BTreeSet<String>,
    pub busy_agents: BTreeSet<String>,
    pub archived_missions: usize,
    pub last_activity: Option<DateTime<Utc>>,
}

impl FleetOverview {
    pub fn new(coordinator_id: String) -> Self {
        Self {
            coordinator_id,
            ..Self::default()
        }
    }

    pub fn count(&self, status: MissionStatus) -> usize {
        self.mission_statuses
            .values()
            .filter(|s| **s == status)
            .count()
    }

    pub fn apply_event(&mut self, event: &CoordinatorEvent) {
        match event {
            CoordinatorEvent::CoordinatorCreated { timestamp, .. } => {
                self.last_activity = Some(*timestamp);
            }
            CoordinatorEvent::AgentRegistered {
                agent_name,
                timestamp,
                ..
            } => {
                self.idle_agents.insert(agent_name.clone());
                self.last_activity = Some(*timestamp);
            }
            CoordinatorEvent::AgentDeregistered {
                agent_name,
                timestamp,
                ..
            } => {
                self.idle_agents.remove(agent_name);
                self.busy_agents.remove(agent_name);
                self.last_activity = Some(*timestamp);
            }
            CoordinatorEvent::MissionQueued { mission, timestamp, .. } => {
                self.mission_statuses
                    .insert(mission.mission_id.clone(), mission.status);
                self.last_activity = Some(*timestamp);
            }
            CoordinatorEvent::MissionAssigned {
                agent_name,
                timestamp,
                ..
            } => {
                self.idle_agents.remove(agent_name);
                self.busy_agents.insert(agent_name.clone());
                self.last_activity = Some(*timestamp);
            }
            CoordinatorEvent::MissionStatusChanged {
                mission_id,
                to,
                timestamp,
                ..
            } => {
                self.mission_statuses.insert(mission_id.clone(), *to);
                self.last_activity = Some(*timestamp);
            }
            CoordinatorEvent::AgentReleased {
                agent_name,
                timestamp,
                ..
            } => {
                self.busy_agents.remove(agent_name);
                self.idle_agents.insert(agent_name.clone());
                self.last_activity = Some(*timestamp);
            }
            CoordinatorEvent::MissionArchived {
                mission_id,
                timestamp,
                ..
            } => {
                if self.mission_statuses.remove(mission_id).is_some() {
                    self.archived_missions += 1;
                }
                self.last_activity = Some(*timestamp);
            }
            // telemetry does not change the overview
            CoordinatorEvent::AgentTelemetryUpdated { .. } => {}
        }
    }
}
