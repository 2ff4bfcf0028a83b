use super::coordinator::MissionCoordinator;
use super::types::{AgentRecord, StoredMission};
use crate::common::{AggregateRoot, DomainError, DomainResult};
use crate::domains::coordinator::events::CoordinatorEvent;

impl AggregateRoot for MissionCoordinator {
    type Event = CoordinatorEvent;

    fn aggregate_id(&self) -> &str {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) -> DomainResult<()> {
        match event {
            CoordinatorEvent::CoordinatorCreated { .. } => {}
            CoordinatorEvent::AgentRegistered {
                agent_name,
                capabilities,
                ..
            } => {
                self.retired_agents.remove(agent_name);
                self.agents
                    .push(AgentRecord::new(agent_name.clone(), *capabilities));
            }
            CoordinatorEvent::AgentDeregistered { agent_name, .. } => {
                self.agents.retain(|a| a.name != *agent_name);
                self.retired_agents.insert(agent_name.clone());
            }
            CoordinatorEvent::AgentTelemetryUpdated {
                agent_name,
                position,
                battery_level,
                state,
                reported_at,
                ..
            } => {
                if let Some(agent) = self.agents.iter_mut().find(|a| a.name == *agent_name) {
                    agent.last_position = Some(*position);
                    agent.battery_level = Some(*battery_level);
                    agent.state = *state;
                    agent.last_report_at = Some(reported_at.clone());
                }
            }
            CoordinatorEvent::MissionQueued { mission, .. } => {
                let stored = StoredMission {
                    mission: mission.clone(),
                    arrival_seq: self.next_arrival_seq,
                    assigned_agent: None,
                };
                self.next_arrival_seq += 1;
                self.missions.insert(mission.mission_id.clone(), stored);
            }
            CoordinatorEvent::MissionAssigned {
                mission_id,
                agent_name,
                pickup_location,
                flight_preferences,
                flight_plan,
                ..
            } => {
                let stored = self.missions.get_mut(mission_id).ok_or_else(|| {
                    DomainError::MissionNotFound {
                        id: mission_id.clone(),
                    }
                })?;
                stored.mission.pickup_location = Some(*pickup_location);
                stored.mission.flight_preferences = Some(flight_preferences.clone());
                stored.assigned_agent = Some(agent_name.clone());
                let status = stored.mission.status;
                if let Some(agent) = self.agents.iter_mut().find(|a| a.name == *agent_name) {
                    agent.current_mission_id = Some(mission_id.clone());
                    agent.current_mission_status = Some(status);
                    agent.pending_steps = flight_plan.clone();
                    agent.can_accept_new_mission = false;
                }
            }
            CoordinatorEvent::MissionStatusChanged {
                mission_id,
                from,
                to,
                ..
            } => {
                let stored = self.missions.get_mut(mission_id).ok_or_else(|| {
                    DomainError::MissionNotFound {
                        id: mission_id.clone(),
                    }
                })?;
                if stored.mission.status != *from || !from.can_transition_to(*to) {
                    return Err(DomainError::InvalidStatusTransition {
                        mission_id: mission_id.clone(),
                        from: stored.mission.status.to_string(),
                        to: to.to_string(),
                    });
                }
                stored.mission.status = *to;
                for agent in self
                    .agents
                    .iter_mut()
                    .filter(|a| a.current_mission_id.as_deref() == Some(mission_id.as_str()))
                {
                    agent.current_mission_status = Some(*to);
                }
            }
            CoordinatorEvent::AgentReleased { agent_name, .. } => {
                if let Some(agent) = self.agents.iter_mut().find(|a| a.name == *agent_name) {
                    agent.current_mission_id = None;
                    agent.current_mission_status = None;
                    agent.pending_steps.clear();
                    agent.can_accept_new_mission = true;
                }
            }
            CoordinatorEvent::MissionArchived { mission_id, .. } => {
                self.missions.remove(mission_id);
            }
        }
        self.version += 1;
        Ok(())
    }

    fn take_uncommitted_events(&mut self) -> Vec<Self::Event> {
        std::mem::take(&mut self.uncommitted_events)
    }

    fn add_event(&mut self, event: Self::Event) {
        self.uncommitted_events.push(event);
    }
}
