use super::types::{
    AgentCapabilities, AgentRecord, CoordinatorSettings, ReportOutcome, StatusReportResult,
    StoredMission,
};
use crate::common::aggregate::AggregateRoot;
use crate::common::{DomainError, DomainResult};
use crate::domains::coordinator::events::CoordinatorEvent;
use crate::domains::mission::{Mission, MissionStatus, NewMission, StatusMessage};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Owns the mission store and the agent registry.
///
/// Every change goes through a [`CoordinatorEvent`]; commands validate, record the
/// event and let `apply` mutate state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionCoordinator {
    pub id: String,
    pub settings: CoordinatorSettings,
    pub(crate) missions: HashMap<String, StoredMission>,
    /// Registration order decides which idle agent is picked first.
    pub(crate) agents: Vec<AgentRecord>,
    /// Deregistered names. Their stale reports must not bring them back.
    pub(crate) retired_agents: BTreeSet<String>,
    pub(crate) next_arrival_seq: u64,
    pub(crate) debounce_counter: u32,
    pub version: u64,
    #[serde(skip)]
    pub(crate) uncommitted_events: Vec<CoordinatorEvent>,
}

impl MissionCoordinator {
    pub fn new(id: String, settings: CoordinatorSettings) -> Self {
        let mut coordinator = Self {
            id: id.clone(),
            settings,
            missions: HashMap::new(),
            agents: Vec::new(),
            retired_agents: BTreeSet::new(),
            next_arrival_seq: 0,
            debounce_counter: 0,
            version: 0,
            uncommitted_events: Vec::new(),
        };
        coordinator.add_event(CoordinatorEvent::CoordinatorCreated {
            coordinator_id: id,
            timestamp: Utc::now(),
        });
        coordinator
    }

    pub fn mission(&self, mission_id: &str) -> Option<&Mission> {
        self.missions.get(mission_id).map(|stored| &stored.mission)
    }

    pub fn missions(&self) -> impl Iterator<Item = &Mission> {
        self.missions.values().map(|stored| &stored.mission)
    }

    pub fn mission_count(&self) -> usize {
        self.missions.len()
    }

    pub fn assigned_agent(&self, mission_id: &str) -> Option<&str> {
        self.missions
            .get(mission_id)
            .and_then(|stored| stored.assigned_agent.as_deref())
    }

    pub fn agent(&self, name: &str) -> Option<&AgentRecord> {
        self.agents.iter().find(|a| a.name == name)
    }

    pub fn agents(&self) -> &[AgentRecord] {
        &self.agents
    }

    pub fn is_retired(&self, name: &str) -> bool {
        self.retired_agents.contains(name)
    }

    pub fn debounce_counter(&self) -> u32 {
        self.debounce_counter
    }

    /// Pending missions, most urgent first; equal priorities keep intake order.
    pub fn pending_missions(&self) -> Vec<&Mission> {
        let mut pending: Vec<&StoredMission> = self
            .missions
            .values()
            .filter(|stored| stored.mission.status == MissionStatus::Pending)
            .collect();
        pending.sort_by_key(|stored| (stored.mission.priority, stored.arrival_seq));
        pending.into_iter().map(|stored| &stored.mission).collect()
    }

    pub fn enqueue_mission(&mut self, new_mission: NewMission) -> DomainResult<()> {
        if self.missions.contains_key(&new_mission.mission_id) {
            return Err(DomainError::InvalidCommand {
                reason: format!("Mission {} is already known", new_mission.mission_id),
            });
        }
        self.record(CoordinatorEvent::MissionQueued {
            coordinator_id: self.id.clone(),
            mission: Mission::from_new(new_mission),
            timestamp: Utc::now(),
        })
    }

    pub fn register_agent(
        &mut self,
        agent_name: String,
        capabilities: AgentCapabilities,
    ) -> DomainResult<()> {
        if self.agent(&agent_name).is_some() {
            return Err(DomainError::InvalidCommand {
                reason: format!("Agent {} is already registered", agent_name),
            });
        }
        self.record(CoordinatorEvent::AgentRegistered {
            coordinator_id: self.id.clone(),
            agent_name,
            capabilities,
            timestamp: Utc::now(),
        })
    }

    /// Forgets an agent. Its mission, if any, stays in the store with its last status.
    /// Later reports under the same name are ignored until it is registered again.
    pub fn deregister_agent(&mut self, agent_name: &str) -> DomainResult<()> {
        if self.agent(agent_name).is_none() {
            return Err(DomainError::AgentNotFound {
                name: agent_name.to_string(),
            });
        }
        self.record(CoordinatorEvent::AgentDeregistered {
            coordinator_id: self.id.clone(),
            agent_name: agent_name.to_string(),
            timestamp: Utc::now(),
        })
    }

    /// Moves a mission exactly one step forward. Anything else is rejected.
    pub fn advance_mission_status(
        &mut self,
        mission_id: &str,
        to: MissionStatus,
    ) -> DomainResult<()> {
        let stored = self
            .missions
            .get(mission_id)
            .ok_or_else(|| DomainError::MissionNotFound {
                id: mission_id.to_string(),
            })?;
        let from = stored.mission.status;
        if !from.can_transition_to(to) {
            return Err(DomainError::InvalidStatusTransition {
                mission_id: mission_id.to_string(),
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        let agent_name = stored.assigned_agent.clone();
        self.record(CoordinatorEvent::MissionStatusChanged {
            coordinator_id: self.id.clone(),
            mission_id: mission_id.to_string(),
            from,
            to,
            timestamp: Utc::now(),
        })?;

        if to == MissionStatus::Completed {
            let holder = agent_name.filter(|name| {
                self.agent(name)
                    .map_or(false, |a| a.current_mission_id.as_deref() == Some(mission_id))
            });
            if let Some(agent_name) = holder {
                self.record(CoordinatorEvent::AgentReleased {
                    coordinator_id: self.id.clone(),
                    agent_name,
                    mission_id: mission_id.to_string(),
                    timestamp: Utc::now(),
                })?;
            }
        }
        Ok(())
    }

    /// Records telemetry and catches the named mission up to the reported status.
    ///
    /// Unknown agents are registered with the default capabilities, except deregistered ones.
    /// A report ahead of the stored status is applied as each intermediate transition; one
    /// behind it is ignored.
    pub fn handle_status_report(
        &mut self,
        report: &StatusMessage,
    ) -> DomainResult<StatusReportResult> {
        if self.is_retired(&report.agent_name) {
            return Ok(StatusReportResult {
                auto_registered: false,
                outcome: ReportOutcome::RetiredAgent,
            });
        }
        let auto_registered = self.agent(&report.agent_name).is_none();
        if auto_registered {
            self.register_agent(report.agent_name.clone(), self.settings.default_capabilities)?;
        }

        self.record(CoordinatorEvent::AgentTelemetryUpdated {
            coordinator_id: self.id.clone(),
            agent_name: report.agent_name.clone(),
            position: report.position_orientation,
            battery_level: report.battery_level,
            state: report.current_state,
            reported_at: report.timestamp.clone(),
            timestamp: Utc::now(),
        })?;

        let outcome = match (&report.mission_id, report.mission_status) {
            (Some(mission_id), Some(reported)) => {
                self.catch_up(&report.agent_name, mission_id, reported)?
            }
            _ => ReportOutcome::NoMission,
        };
        Ok(StatusReportResult {
            auto_registered,
            outcome,
        })
    }

    fn catch_up(
        &mut self,
        agent_name: &str,
        mission_id: &str,
        reported: MissionStatus,
    ) -> DomainResult<ReportOutcome> {
        let Some(stored) = self.missions.get(mission_id) else {
            return Ok(ReportOutcome::UnknownMission);
        };
        if stored.assigned_agent.as_deref() != Some(agent_name) {
            return Ok(ReportOutcome::NotAssignedToAgent);
        }
        let current = stored.mission.status;
        if reported < current {
            return Ok(ReportOutcome::Lagging {
                stored: current,
                reported,
            });
        }

        let mut applied = Vec::new();
        let mut status = current;
        while status < reported {
            let Some(next) = status.next() else { break };
            self.advance_mission_status(mission_id, next)?;
            applied.push(next);
            status = next;
        }
        Ok(ReportOutcome::Applied(applied))
    }

    /// Removes Completed missions from the store and hands them back.
    pub fn archive_completed(&mut self) -> DomainResult<Vec<Mission>> {
        let mut completed: Vec<(u64, String)> = self
            .missions
            .values()
            .filter(|stored| stored.mission.status.is_terminal())
            .map(|stored| (stored.arrival_seq, stored.mission.mission_id.clone()))
            .collect();
        completed.sort();

        let mut archived = Vec::with_capacity(completed.len());
        for (_, mission_id) in completed {
            if let Some(stored) = self.missions.get(&mission_id) {
                archived.push(stored.mission.clone());
            }
            self.record(CoordinatorEvent::MissionArchived {
                coordinator_id: self.id.clone(),
                mission_id,
                timestamp: Utc::now(),
            })?;
        }
        Ok(archived)
    }
}
