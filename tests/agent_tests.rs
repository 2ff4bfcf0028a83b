use chrono::{TimeZone, Utc};
use fleet_dispatch::adapters::outbound::{init_noop_logger, KinematicFlightController, KinematicSettings};
use fleet_dispatch::common::{DomainError, Vec3};
use fleet_dispatch::domains::agent::*;
use fleet_dispatch::domains::flight_plan::{synthesize, FlightStep, PlanSettings};
use fleet_dispatch::domains::mission::{
    Location, Mission, MissionAssignment, MissionStatus, NewMission, StatusMessage,
};
use fleet_dispatch::domains::motion::MotionProfiles;

/// Sits wherever it was last told to be.
struct TeleportController {
    pose: Location,
    attach_ok: bool,
    attach_attempts: usize,
    releases: usize,
}

impl TeleportController {
    fn at(pose: Location, attach_ok: bool) -> Self {
        Self { pose, attach_ok, attach_attempts: 0, releases: 0 }
    }
}

impl FlightController for TeleportController {
    fn pose(&self) -> Location { self.pose }
    fn battery_level(&self) -> f64 { 100.0 }
    fn set_target_pose(&mut self, position: Vec3, heading: f64) {
        self.pose = Location::from_position(position, heading);
    }
    fn advance(&mut self, _dt: f64) {}
    fn attach_payload(&mut self) -> bool {
        self.attach_attempts += 1;
        self.attach_ok
    }
    fn release_payload(&mut self) { self.releases += 1; }
}

fn assignment(origin: &Location) -> MissionAssignment {
    let mut mission = Mission::from_new(NewMission {
        mission_id: "m-1".to_string(),
        arrival_date_time: "2024-01-01_10-00-00".to_string(),
        delivery_location: Location::new(20.0, 0.0, 0.0, 0.0),
        package_weight: 1.0,
        priority: 0,
    });
    mission.pickup_location = Some(Location::new(10.0, 0.0, 0.0, 0.0));
    let flight_plan = synthesize(&mut mission, origin, 10.0, 5.0, &PlanSettings::default()).unwrap();
    MissionAssignment { mission, flight_plan }
}

fn handling_plan(state: AgentState) -> Vec<FlightStep> {
    vec![
        FlightStep::new(state, Vec3::ZERO, 0.0, 0.3),
        FlightStep::new(AgentState::StandBy, Vec3::ZERO, 0.0, 0.0),
    ]
}

fn machine() -> AgentStateMachine {
    AgentStateMachine::new(&Location::default(), MotionProfiles::default(), HandlingTimings::default())
}

#[test]
fn agent_flies_the_whole_plan_and_lands_home() {
    let origin = Location::default();
    let mut controller = KinematicFlightController::new(origin, KinematicSettings::default());
    let mut agent = DeliveryAgent::for_controller(
        "drone-1",
        &controller,
        MotionProfiles::default(),
        AgentSettings::default(),
        init_noop_logger(),
    );
    agent.accept_assignment(assignment(&origin), &controller).unwrap();

    let now = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
    let dt = 0.05;
    let mut reports: Vec<StatusMessage> = Vec::new();
    let mut visited: Vec<AgentState> = Vec::new();
    let mut attached_seen = false;
    for _ in 0..40_000 {
        if let Some(report) = agent.tick(&mut controller, dt, now) {
            reports.push(report);
        }
        controller.advance(dt);
        attached_seen |= controller.payload_attached();
        if visited.last() != Some(&agent.state()) {
            visited.push(agent.state());
        }
        if agent.is_idle() {
            break;
        }
    }

    assert!(agent.is_idle(), "agent never finished; last state {}", agent.state());
    assert!(attached_seen);
    assert!(!controller.payload_attached());
    assert!(controller.pose().position().distance(&origin.position()) < 0.5);
    assert!(controller.battery_level() < 100.0);

    assert!(visited.contains(&AgentState::PickUpPackage));
    assert!(visited.contains(&AgentState::DeliverPackage));
    assert!(visited.contains(&AgentState::ReturnToHub));
    assert_eq!(visited.last(), Some(&AgentState::StandBy));

    let statuses: Vec<MissionStatus> = reports.iter().filter_map(|r| r.mission_status).collect();
    assert_eq!(statuses.first(), Some(&MissionStatus::InProgress));
    let delivered = statuses
        .iter()
        .position(|s| *s == MissionStatus::PackageDelivered)
        .expect("package delivered report");
    let completed = statuses
        .iter()
        .position(|s| *s == MissionStatus::Completed)
        .expect("completed report");
    assert!(delivered < completed);
    assert!(statuses.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(reports.last().unwrap().mission_id.as_deref(), Some("m-1"));
}

#[test]
fn busy_agent_rejects_a_second_assignment() {
    let origin = Location::default();
    let controller = TeleportController::at(origin, true);
    let mut agent = DeliveryAgent::for_controller(
        "drone-1",
        &controller,
        MotionProfiles::default(),
        AgentSettings::default(),
        init_noop_logger(),
    );
    agent.accept_assignment(assignment(&origin), &controller).unwrap();
    let err = agent.accept_assignment(assignment(&origin), &controller).unwrap_err();
    assert!(matches!(err, DomainError::InvalidCommand { .. }));
    assert_eq!(agent.mission().unwrap().status, MissionStatus::InProgress);
    assert_eq!(agent.state_machine().plan().len(), 15);
}

#[test]
fn idle_agent_reports_on_first_tick_then_every_interval() {
    let mut controller = TeleportController::at(Location::default(), true);
    let mut agent = DeliveryAgent::for_controller(
        "drone-1",
        &controller,
        MotionProfiles::default(),
        AgentSettings::default(),
        init_noop_logger(),
    );
    let now = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();

    let mut reported_on = Vec::new();
    for tick in 1..=21 {
        if let Some(report) = agent.tick(&mut controller, 0.5, now) {
            assert_eq!(report.agent_name, "drone-1");
            assert_eq!(report.timestamp, "2024-01-01_10-00-00");
            assert!(report.mission_id.is_none());
            assert_eq!(report.current_state, AgentState::StandBy);
            reported_on.push(tick);
        }
    }
    assert_eq!(reported_on, vec![1, 11, 21]);
}

#[test]
fn pickup_waits_for_action_delay_and_advances_after_four_seconds() {
    let mut machine = machine();
    machine
        .load_plan(handling_plan(AgentState::PickUpPackage), &Location::default())
        .unwrap();
    let mut controller = TeleportController::at(Location::default(), true);

    let first = machine.tick(&mut controller, 0.5).unwrap();
    assert_eq!(first.from, AgentState::StandBy);
    assert_eq!(first.to, AgentState::PickUpPackage);

    // settles on the pad and starts both timers
    assert!(machine.tick(&mut controller, 0.5).is_none());

    for _ in 0..3 {
        machine.tick(&mut controller, 0.5);
    }
    assert_eq!(controller.attach_attempts, 0);
    machine.tick(&mut controller, 0.5);
    assert_eq!(controller.attach_attempts, 1);

    for _ in 0..3 {
        machine.tick(&mut controller, 0.5);
    }
    assert_eq!(machine.state(), AgentState::PickUpPackage);
    let last = machine.tick(&mut controller, 0.5).unwrap();
    assert_eq!(last.to, AgentState::StandBy);
    assert_eq!(controller.attach_attempts, 1);
    assert!(machine.plan_finished());
}

#[test]
fn failed_attach_is_retried_until_the_step_moves_on() {
    let mut machine = machine();
    machine
        .load_plan(handling_plan(AgentState::PickUpPackage), &Location::default())
        .unwrap();
    let mut controller = TeleportController::at(Location::default(), false);

    for _ in 0..10 {
        machine.tick(&mut controller, 0.5);
    }
    assert_eq!(machine.state(), AgentState::StandBy);
    assert!(controller.attach_attempts > 1);
}

#[test]
fn attach_is_skipped_off_the_package() {
    let mut machine = AgentStateMachine::new(
        &Location::default(),
        MotionProfiles::default(),
        HandlingTimings::default(),
    );
    machine
        .load_plan(handling_plan(AgentState::PickUpPackage), &Location::default())
        .unwrap();

    /// Settles half a metre off whatever target it is given.
    struct Drifting(TeleportController);
    impl FlightController for Drifting {
        fn pose(&self) -> Location { self.0.pose() }
        fn battery_level(&self) -> f64 { 100.0 }
        fn set_target_pose(&mut self, position: Vec3, heading: f64) {
            self.0.set_target_pose(position + Vec3::new(0.5, 0.0, 0.0), heading);
        }
        fn advance(&mut self, _dt: f64) {}
        fn attach_payload(&mut self) -> bool { self.0.attach_payload() }
        fn release_payload(&mut self) { self.0.release_payload() }
    }

    let mut controller = Drifting(TeleportController::at(Location::default(), true));
    for _ in 0..10 {
        machine.tick(&mut controller, 0.5);
    }
    assert_eq!(controller.0.attach_attempts, 0);
    assert_eq!(machine.state(), AgentState::StandBy);
}

#[test]
fn delivery_releases_once() {
    let mut machine = machine();
    machine
        .load_plan(handling_plan(AgentState::DeliverPackage), &Location::default())
        .unwrap();
    let mut controller = TeleportController::at(Location::default(), true);
    for _ in 0..12 {
        machine.tick(&mut controller, 0.5);
    }
    assert_eq!(controller.releases, 1);
    assert_eq!(controller.attach_attempts, 0);
    assert_eq!(machine.state(), AgentState::StandBy);
}

#[test]
fn plans_cannot_be_stacked_or_empty() {
    let mut machine = machine();
    let err = machine.load_plan(Vec::new(), &Location::default()).unwrap_err();
    assert!(matches!(err, DomainError::InvalidCommand { .. }));

    machine
        .load_plan(handling_plan(AgentState::PickUpPackage), &Location::default())
        .unwrap();
    let err = machine
        .load_plan(handling_plan(AgentState::DeliverPackage), &Location::default())
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidCommand { .. }));

    machine.clear_plan();
    assert!(!machine.has_plan());
    assert!(!machine.plan_finished());
    machine
        .load_plan(handling_plan(AgentState::DeliverPackage), &Location::default())
        .unwrap();
    assert_eq!(machine.cursor(), 0);
}
