use super::flight_controller::FlightController;
use super::state::AgentState;
use super::state_machine::{AgentStateMachine, HandlingTimings, StateTransition};
use crate::common::{Countdown, DomainError, DomainResult};
use crate::domains::logger::DynLogger;
use crate::domains::mission::{Mission, MissionAssignment, MissionStatus, StatusMessage};
use crate::domains::motion::MotionProfiles;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const STATUS_TIME_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentSettings {
    pub status_interval_secs: f64,
    pub handling: HandlingTimings,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            status_interval_secs: 5.0,
            handling: HandlingTimings::default(),
        }
    }
}

/// Agent-side mission bookkeeping on top of the state machine.
///
/// Tracks the mission the agent is flying, notices when the package was dropped and
/// when the agent is back on its pad, and decides when a status report is due.
pub struct DeliveryAgent {
    name: String,
    machine: AgentStateMachine,
    mission: Option<Mission>,
    status_timer: Countdown,
    report_due: bool,
    logger: DynLogger,
}

impl DeliveryAgent {
    pub fn new(
        name: impl Into<String>,
        machine: AgentStateMachine,
        settings: AgentSettings,
        logger: DynLogger,
    ) -> Self {
        Self {
            name: name.into(),
            machine,
            mission: None,
            status_timer: Countdown::started(settings.status_interval_secs),
            // the first report goes out on the first tick
            report_due: true,
            logger,
        }
    }

    pub fn for_controller(
        name: impl Into<String>,
        controller: &dyn FlightController,
        profiles: MotionProfiles,
        settings: AgentSettings,
        logger: DynLogger,
    ) -> Self {
        let machine = AgentStateMachine::new(&controller.pose(), profiles, settings.handling);
        Self::new(name, machine, settings, logger)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> AgentState {
        self.machine.state()
    }

    pub fn state_machine(&self) -> &AgentStateMachine {
        &self.machine
    }

    pub fn mission(&self) -> Option<&Mission> {
        self.mission.as_ref()
    }

    pub fn is_idle(&self) -> bool {
        self.mission.is_none()
    }

    /// Loads the plan of an assignment. Only an idle agent accepts work.
    pub fn accept_assignment(
        &mut self,
        assignment: MissionAssignment,
        controller: &dyn FlightController,
    ) -> DomainResult<()> {
        if let Some(current) = &self.mission {
            return Err(DomainError::InvalidCommand {
                reason: format!(
                    "{} is busy with mission {}, dropping {}",
                    self.name, current.mission_id, assignment.mission.mission_id
                ),
            });
        }
        self.machine
            .load_plan(assignment.flight_plan, &controller.pose())?;
        let mut mission = assignment.mission;
        mission.status = MissionStatus::InProgress;
        self.logger.info(&format!(
            "{} accepted mission {} (priority {})",
            self.name, mission.mission_id, mission.priority
        ));
        self.mission = Some(mission);
        self.report_due = true;
        Ok(())
    }

    /// Advances the agent by `dt`. Returns a status report when one is due.
    pub fn tick(
        &mut self,
        controller: &mut dyn FlightController,
        dt: f64,
        now: DateTime<Utc>,
    ) -> Option<StatusMessage> {
        if let Some(transition) = self.machine.tick(controller, dt) {
            self.on_transition(transition);
        }

        self.status_timer.advance(dt);
        if self.status_timer.expired() {
            self.report_due = true;
        }
        if !self.report_due {
            return None;
        }

        self.report_due = false;
        self.status_timer.restart(self.status_timer.duration());
        let report = self.status_report(&*controller, now);

        if self
            .mission
            .as_ref()
            .map_or(false, |m| m.status == MissionStatus::Completed)
        {
            self.mission = None;
            self.machine.clear_plan();
        }
        Some(report)
    }

    pub fn status_report(&self, controller: &dyn FlightController, now: DateTime<Utc>) -> StatusMessage {
        StatusMessage {
            agent_name: self.name.clone(),
            timestamp: now.format(STATUS_TIME_FORMAT).to_string(),
            position_orientation: controller.pose(),
            battery_level: controller.battery_level(),
            current_state: self.machine.state(),
            mission_id: self.mission.as_ref().map(|m| m.mission_id.clone()),
            mission_status: self.mission.as_ref().map(|m| m.status),
        }
    }

    fn on_transition(&mut self, transition: StateTransition) {
        let finished = transition.to == AgentState::StandBy && self.machine.plan_finished();
        let Some(mission) = self.mission.as_mut() else {
            return;
        };
        if transition.from == AgentState::DeliverPackage && mission.status == MissionStatus::InProgress {
            mission.status = MissionStatus::PackageDelivered;
            self.report_due = true;
            self.logger.info(&format!(
                "{} delivered package for mission {}",
                self.name, mission.mission_id
            ));
        }
        if finished && mission.status != MissionStatus::Completed {
            mission.status = MissionStatus::Completed;
            self.report_due = true;
            self.logger.info(&format!(
                "{} completed mission {}",
                self.name, mission.mission_id
            ));
        }
    }
}
