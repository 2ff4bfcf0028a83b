use super::coordinator::MissionCoordinator;
use super::types::AssignmentCandidate;
use crate::common::aggregate::AggregateRoot;
use crate::common::{DomainError, DomainResult};
use crate::domains::coordinator::events::CoordinatorEvent;
use crate::domains::flight_plan::{has_template, synthesize};
use crate::domains::mission::{Location, MissionAssignment, MissionStatus};
use chrono::Utc;

impl MissionCoordinator {
    fn has_idle_agent(&self) -> bool {
        self.agents.iter().any(|a| a.is_assignable())
    }

    fn has_pending_mission(&self) -> bool {
        self.missions
            .values()
            .any(|stored| stored.mission.status == MissionStatus::Pending)
    }

    /// Counts ticks on which pending work and an idle agent coexist.
    pub fn observe_tick(&mut self) {
        if self.has_pending_mission() && self.has_idle_agent() {
            self.debounce_counter = self.debounce_counter.saturating_add(1);
        }
    }

    /// Head of the priority queue and the first idle agent `reachable` accepts, once the
    /// debounce window has passed.
    pub fn next_assignment(&self, reachable: impl Fn(&str) -> bool) -> Option<AssignmentCandidate> {
        if self.debounce_counter <= self.settings.assignment_debounce_ticks {
            return None;
        }
        let agent = self
            .agents
            .iter()
            .find(|a| a.is_assignable() && reachable(&a.name))?;
        let mission = self.pending_missions().into_iter().next()?;
        Some(AssignmentCandidate {
            mission_id: mission.mission_id.clone(),
            agent_name: agent.name.clone(),
        })
    }

    /// Everything `assign_mission` needs except the pickup point, so a caller can
    /// check before spending one. Returns the agent's last position.
    pub fn check_assignable(&self, mission_id: &str, agent_name: &str) -> DomainResult<Location> {
        let agent = self
            .agent(agent_name)
            .ok_or_else(|| DomainError::AgentNotFound {
                name: agent_name.to_string(),
            })?;
        if !agent.can_accept_new_mission || agent.current_mission_id.is_some() {
            return Err(DomainError::InvalidCommand {
                reason: format!("Agent {} already holds a mission", agent_name),
            });
        }
        let origin = agent.last_position.ok_or_else(|| DomainError::MissingCollaborator {
            what: format!("position of agent {}", agent_name),
        })?;

        let mission = self
            .mission(mission_id)
            .ok_or_else(|| DomainError::MissionNotFound {
                id: mission_id.to_string(),
            })?;
        if mission.status != MissionStatus::Pending {
            return Err(DomainError::InvalidCommand {
                reason: format!(
                    "Mission {} is {} and cannot be assigned",
                    mission_id, mission.status
                ),
            });
        }
        if !has_template(mission.action) {
            return Err(DomainError::InvalidCommand {
                reason: format!("Mission {}: no plan template for {}", mission_id, mission.action),
            });
        }
        Ok(origin)
    }

    /// Binds a pending mission to an idle agent and synthesizes its plan from the agent's position.
    pub fn assign_mission(
        &mut self,
        mission_id: &str,
        agent_name: &str,
        pickup: Location,
    ) -> DomainResult<MissionAssignment> {
        let origin = self.check_assignable(mission_id, agent_name)?;
        let capabilities = self
            .agent(agent_name)
            .map(|agent| agent.capabilities)
            .ok_or_else(|| DomainError::AgentNotFound {
                name: agent_name.to_string(),
            })?;
        let mut mission = self
            .mission(mission_id)
            .cloned()
            .ok_or_else(|| DomainError::MissionNotFound {
                id: mission_id.to_string(),
            })?;
        mission.pickup_location = Some(pickup);
        let flight_plan = synthesize(
            &mut mission,
            &origin,
            capabilities.max_velocity,
            capabilities.max_altitude,
            &self.settings.plan,
        )?;
        let flight_preferences =
            mission
                .flight_preferences
                .clone()
                .ok_or_else(|| DomainError::InvalidCommand {
                    reason: format!("Mission {} has no flight preferences", mission_id),
                })?;

        self.record(CoordinatorEvent::MissionAssigned {
            coordinator_id: self.id.clone(),
            mission_id: mission_id.to_string(),
            agent_name: agent_name.to_string(),
            pickup_location: pickup,
            flight_preferences,
            flight_plan: flight_plan.clone(),
            timestamp: Utc::now(),
        })?;
        self.advance_mission_status(mission_id, MissionStatus::InProgress)?;
        self.debounce_counter = 0;

        mission.status = MissionStatus::InProgress;
        Ok(MissionAssignment {
            mission,
            flight_plan,
        })
    }
}
