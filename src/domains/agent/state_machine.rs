use super::flight_controller::FlightController;
use super::state::AgentState;
use crate::common::{Countdown, DomainError, DomainResult};
use crate::domains::flight_plan::FlightStep;
use crate::domains::mission::Location;
use crate::domains::motion::{MotionPlanner, MotionProfiles, MotionRequest};
use serde::{Deserialize, Serialize};

/// Maximum distance between agent and package for an attach attempt.
pub const ATTACH_RADIUS: f64 = 0.1;

/// Delays used once the agent sits on a pickup or delivery pad.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HandlingTimings {
    /// Seconds until the package is attached or released.
    pub action_delay_secs: f64,
    /// Seconds until the plan moves on to the next step.
    pub advance_delay_secs: f64,
}

impl Default for HandlingTimings {
    fn default() -> Self {
        Self {
            action_delay_secs: 2.0,
            advance_delay_secs: 4.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateTransition {
    pub from: AgentState,
    pub to: AgentState,
}

/// Walks a flight plan one tick at a time.
///
/// The plan is never modified after loading; only the cursor moves. While the agent
/// is in `StandBy` it adopts the state of the step under the cursor; in any other
/// state it drives the motion planner toward that step and advances when it is reached.
#[derive(Debug, Clone)]
pub struct AgentStateMachine {
    state: AgentState,
    plan: Vec<FlightStep>,
    cursor: usize,
    planner: MotionPlanner,
    profiles: MotionProfiles,
    action_timer: Countdown,
    advance_timer: Countdown,
    action_done: bool,
}

impl AgentStateMachine {
    pub fn new(start: &Location, profiles: MotionProfiles, timings: HandlingTimings) -> Self {
        Self {
            state: AgentState::StandBy,
            plan: Vec::new(),
            cursor: 0,
            planner: MotionPlanner::new(start.position(), start.azimuth),
            profiles,
            action_timer: Countdown::new(timings.action_delay_secs),
            advance_timer: Countdown::new(timings.advance_delay_secs),
            action_done: false,
        }
    }

    pub fn state(&self) -> AgentState {
        self.state
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn plan(&self) -> &[FlightStep] {
        &self.plan
    }

    pub fn has_plan(&self) -> bool {
        !self.plan.is_empty()
    }

    pub fn current_step(&self) -> Option<&FlightStep> {
        self.plan.get(self.cursor)
    }

    pub fn planner(&self) -> &MotionPlanner {
        &self.planner
    }

    /// True when the cursor has run off the plan or rests on a trailing `StandBy` step.
    pub fn plan_finished(&self) -> bool {
        if self.plan.is_empty() {
            return false;
        }
        match self.current_step() {
            None => true,
            Some(step) => {
                self.cursor + 1 == self.plan.len() && step.target_state == AgentState::StandBy
            }
        }
    }

    /// Starts a new plan from `start`. Rejected while another plan is loaded.
    pub fn load_plan(&mut self, plan: Vec<FlightStep>, start: &Location) -> DomainResult<()> {
        if self.has_plan() {
            return Err(DomainError::InvalidCommand {
                reason: "agent is already executing a flight plan".to_string(),
            });
        }
        if plan.is_empty() {
            return Err(DomainError::InvalidCommand {
                reason: "flight plan has no steps".to_string(),
            });
        }
        self.plan = plan;
        self.cursor = 0;
        self.state = AgentState::StandBy;
        self.planner.reset(start.position(), start.azimuth);
        self.reset_handling();
        Ok(())
    }

    pub fn clear_plan(&mut self) {
        self.plan.clear();
        self.cursor = 0;
        self.state = AgentState::StandBy;
        self.planner
            .reset(self.planner.position(), self.planner.heading());
        self.reset_handling();
    }

    pub fn tick(
        &mut self,
        controller: &mut dyn FlightController,
        dt: f64,
    ) -> Option<StateTransition> {
        let before = self.state;
        match self.state {
            AgentState::StandBy => {
                if let Some(step) = self.current_step() {
                    self.state = step.target_state;
                }
            }
            AgentState::PickUpPackage | AgentState::DeliverPackage => {
                self.tick_package_handling(controller, dt)
            }
            _ => {
                if self.drive(controller, dt) {
                    self.advance_cursor();
                }
            }
        }
        (before != self.state).then_some(StateTransition {
            from: before,
            to: self.state,
        })
    }

    /// Runs the planner for the current step. Returns true when the step is reached.
    fn drive(&mut self, controller: &mut dyn FlightController, dt: f64) -> bool {
        let (Some(step), Some(kind)) = (self.current_step().copied(), self.state.profile_kind())
        else {
            self.advance_cursor();
            return false;
        };
        let request = MotionRequest {
            target_position: step.target_position,
            target_heading: step.target_orientation,
            max_velocity: step.max_velocity,
            profile: self.profiles.get(kind),
            mode: kind.route_mode(),
            tolerance: self.state.tolerance(),
        };
        let reached = self
            .planner
            .advance(&request, controller.pose().position(), dt);
        controller.set_target_pose(self.planner.position(), self.planner.heading());
        reached
    }

    fn tick_package_handling(&mut self, controller: &mut dyn FlightController, dt: f64) {
        if !self.advance_timer.is_armed() {
            if self.drive(controller, dt) {
                self.action_timer.arm();
                self.advance_timer.arm();
            }
            return;
        }

        self.action_timer.advance(dt);
        self.advance_timer.advance(dt);

        if self.action_timer.expired() && !self.action_done {
            self.action_done = match self.state {
                AgentState::PickUpPackage => self.try_attach(controller),
                _ => {
                    controller.release_payload();
                    true
                }
            };
        }

        if self.advance_timer.expired() {
            self.reset_handling();
            self.advance_cursor();
        }
    }

    fn try_attach(&self, controller: &mut dyn FlightController) -> bool {
        let Some(step) = self.current_step() else {
            return false;
        };
        if controller.pose().position().distance(&step.target_position) > ATTACH_RADIUS {
            return false;
        }
        controller.attach_payload()
    }

    fn advance_cursor(&mut self) {
        if self.cursor < self.plan.len() {
            self.cursor += 1;
        }
        self.state = self
            .current_step()
            .map_or(AgentState::StandBy, |step| step.target_state);
    }

    fn reset_handling(&mut self) {
        self.action_timer.reset();
        self.advance_timer.reset();
        self.action_done = false;
    }
}
