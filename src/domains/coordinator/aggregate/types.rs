use crate::domains::agent::AgentState;
use crate::domains::flight_plan::{FlightStep, PlanSettings};
use crate::domains::mission::{Location, Mission, MissionStatus};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentCapabilities {
    pub max_altitude: f64,
    pub max_velocity: f64,
}

impl Default for AgentCapabilities {
    fn default() -> Self {
        Self {
            max_altitude: 30.0,
            max_velocity: 19.0,
        }
    }
}

/// The coordinator's view of one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRecord {
    pub name: String,
    pub capabilities: AgentCapabilities,
    pub current_mission_id: Option<String>,
    pub current_mission_status: Option<MissionStatus>,
    /// Copy of the plan sent with the current assignment.
    pub pending_steps: Vec<FlightStep>,
    pub can_accept_new_mission: bool,
    pub last_position: Option<Location>,
    pub battery_level: Option<f64>,
    pub state: AgentState,
    pub last_report_at: Option<String>,
}

impl AgentRecord {
    pub fn new(name: String, capabilities: AgentCapabilities) -> Self {
        Self {
            name,
            capabilities,
            current_mission_id: None,
            current_mission_status: None,
            pending_steps: Vec::new(),
            can_accept_new_mission: true,
            last_position: None,
            battery_level: None,
            state: AgentState::StandBy,
            last_report_at: None,
        }
    }

    /// Free for work and located, so a plan can start from its position.
    pub fn is_assignable(&self) -> bool {
        self.can_accept_new_mission
            && self.current_mission_id.is_none()
            && self.last_position.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredMission {
    pub mission: Mission,
    /// Intake order, used to break priority ties.
    pub arrival_seq: u64,
    pub assigned_agent: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinatorSettings {
    /// Ticks with pending work and an idle agent needed before an assignment is made.
    pub assignment_debounce_ticks: u32,
    pub default_capabilities: AgentCapabilities,
    pub plan: PlanSettings,
}

impl Default for CoordinatorSettings {
    fn default() -> Self {
        Self {
            assignment_debounce_ticks: 5,
            default_capabilities: AgentCapabilities::default(),
            plan: PlanSettings::default(),
        }
    }
}

/// A head-of-queue mission paired with the agent that should fly it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentCandidate {
    pub mission_id: String,
    pub agent_name: String,
}

/// What a status report did to the mission it names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportOutcome {
    /// The agent reported no mission.
    NoMission,
    /// Transitions applied, in order. Empty when the report matched the stored status.
    Applied(Vec<MissionStatus>),
    /// The report is behind the stored status and was ignored.
    Lagging {
        stored: MissionStatus,
        reported: MissionStatus,
    },
    UnknownMission,
    /// The mission exists but is not the agent's current mission.
    NotAssignedToAgent,
    /// Sent before the agent was deregistered; dropped without telemetry.
    RetiredAgent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReportResult {
    pub auto_registered: bool,
    pub outcome: ReportOutcome,
}
