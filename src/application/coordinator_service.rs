use crate::common::{AggregateRoot, DomainError, DomainEvent, DomainResult};
use crate::domains::coordinator::{
    AgentCapabilities, CoordinatorEvent, CoordinatorSettings, FleetOverview, MissionCoordinator,
    ReportOutcome,
};
use crate::domains::logger::DynLogger;
use crate::domains::mission::{
    decode_new_mission, decode_status, encode_assignment, hundredths, CadenceMode, CandidatePool,
    GenerationCadence, GeneratorSettings, Mission, MissionGenerator, MissionLogRecord,
    MissionLogSink, MissionStatus, NewMission, RecentPicker, StatusMessage,
};
use crate::messaging::{Mailbox, MessageBus};
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct CoordinatorServiceSettings {
    /// Bus address of the coordinator; also the aggregate id.
    pub address: String,
    pub mailbox_capacity: usize,
    pub coordinator: CoordinatorSettings,
    pub generation_enabled: bool,
    pub cadence: CadenceMode,
    pub generator: GeneratorSettings,
    /// Generation pauses while open missions reach this many per registered agent.
    pub max_open_per_agent: Option<usize>,
    /// Drop Completed missions from the store at the end of every tick.
    pub archive_completed: bool,
    pub seed: Option<u64>,
}

impl Default for CoordinatorServiceSettings {
    fn default() -> Self {
        Self {
            address: "coordinator".to_string(),
            mailbox_capacity: 1000,
            coordinator: CoordinatorSettings::default(),
            generation_enabled: true,
            cadence: CadenceMode::default(),
            generator: GeneratorSettings::default(),
            max_open_per_agent: None,
            archive_completed: false,
            seed: None,
        }
    }
}

/// What one coordinator tick did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoordinatorTickSummary {
    pub generated: usize,
    pub queued: usize,
    pub reports: usize,
    /// `(mission_id, agent_name)` for every assignment sent this tick.
    pub assignments: Vec<(String, String)>,
    pub archived: usize,
}

/// Runs the coordinator side of a tick: generation, intake, status handling, assignment.
pub struct CoordinatorService {
    coordinator: MissionCoordinator,
    overview: FleetOverview,
    generator: MissionGenerator,
    cadence: GenerationCadence,
    generation_enabled: bool,
    max_open_per_agent: Option<usize>,
    archive_each_tick: bool,
    intake: VecDeque<String>,
    mailbox: Arc<Mailbox>,
    bus: Arc<MessageBus>,
    pool: Option<Arc<dyn CandidatePool>>,
    pickup_picker: RecentPicker,
    logger: DynLogger,
    log_sink: Arc<dyn MissionLogSink>,
}

impl CoordinatorService {
    pub fn new(
        settings: CoordinatorServiceSettings,
        bus: Arc<MessageBus>,
        pool: Option<Arc<dyn CandidatePool>>,
        logger: DynLogger,
        log_sink: Arc<dyn MissionLogSink>,
        now: DateTime<Utc>,
    ) -> Self {
        let mut coordinator = MissionCoordinator::new(settings.address.clone(), settings.coordinator);
        let mut overview = FleetOverview::new(settings.address.clone());
        for event in coordinator.take_uncommitted_events() {
            overview.apply_event(&event);
        }

        let mut generator = MissionGenerator::new(settings.generator, settings.seed);
        let cadence = GenerationCadence::new(settings.cadence, now, generator.rng_mut());

        let mailbox = Arc::new(Mailbox::new(settings.mailbox_capacity));
        bus.register(settings.address.clone(), mailbox.clone());

        Self {
            coordinator,
            overview,
            generator,
            cadence,
            generation_enabled: settings.generation_enabled,
            max_open_per_agent: settings.max_open_per_agent,
            archive_each_tick: settings.archive_completed,
            intake: VecDeque::new(),
            mailbox,
            bus,
            pool,
            pickup_picker: RecentPicker::new(),
            logger,
            log_sink,
        }
    }

    pub fn address(&self) -> &str {
        &self.coordinator.id
    }

    pub fn coordinator(&self) -> &MissionCoordinator {
        &self.coordinator
    }

    pub fn overview(&self) -> &FleetOverview {
        &self.overview
    }

    /// Queues an encoded `NewMission` for the next intake.
    pub fn submit(&mut self, payload: String) {
        self.intake.push_back(payload);
    }

    pub fn register_agent(&mut self, name: &str, capabilities: AgentCapabilities) -> DomainResult<()> {
        self.coordinator.register_agent(name.to_string(), capabilities)?;
        self.publish_events();
        Ok(())
    }

    pub fn deregister_agent(&mut self, name: &str) -> DomainResult<()> {
        self.coordinator.deregister_agent(name)?;
        self.publish_events();
        Ok(())
    }

    pub fn archive_completed(&mut self) -> DomainResult<Vec<Mission>> {
        let archived = self.coordinator.archive_completed()?;
        self.publish_events();
        Ok(archived)
    }

    pub fn tick(&mut self, dt: f64, now: DateTime<Utc>) -> CoordinatorTickSummary {
        let mut summary = CoordinatorTickSummary::default();
        if self.generate(dt, now) {
            summary.generated += 1;
        }
        summary.queued = self.drain_intake();
        summary.reports = self.drain_status_reports();
        self.coordinator.observe_tick();
        if let Some(assigned) = self.try_assign() {
            summary.assignments.push(assigned);
        }
        if self.archive_each_tick {
            match self.coordinator.archive_completed() {
                Ok(archived) => summary.archived = archived.len(),
                Err(e) => self.logger.error(&format!("Archiving failed: {}", e)),
            }
        }
        self.publish_events();
        summary
    }

    /// Missions in the store that have not reached Completed.
    pub fn open_missions(&self) -> usize {
        self.coordinator
            .missions()
            .filter(|m| m.status != MissionStatus::Completed)
            .count()
    }

    fn at_open_mission_limit(&self) -> bool {
        self.max_open_per_agent.map_or(false, |per_agent| {
            self.open_missions() + self.intake.len()
                >= per_agent.saturating_mul(self.coordinator.agents().len())
        })
    }

    fn generate(&mut self, dt: f64, now: DateTime<Utc>) -> bool {
        if !self.generation_enabled || !self.cadence.advance(dt, now, self.generator.rng_mut()) {
            return false;
        }
        if self.at_open_mission_limit() {
            return false;
        }
        let Some(pool) = self.pool.as_deref() else {
            self.logger
                .warn("No candidate pool configured; skipping mission generation");
            return false;
        };
        match self.generator.generate_encoded(pool, now) {
            Ok(Some(payload)) => {
                self.intake.push_back(payload);
                true
            }
            Ok(None) => false,
            Err(e) => {
                self.logger.warn(&format!("Mission generation skipped: {}", e));
                false
            }
        }
    }

    fn drain_intake(&mut self) -> usize {
        let mut queued = 0;
        while let Some(payload) = self.intake.pop_front() {
            let new_mission: NewMission = match decode_new_mission(&payload) {
                Ok(m) => m,
                Err(e) => {
                    self.logger.warn(&format!("Dropping mission: {}", e));
                    continue;
                }
            };
            let mission_id = new_mission.mission_id.clone();
            match self.coordinator.enqueue_mission(new_mission) {
                Ok(()) => {
                    queued += 1;
                    self.logger.info(&format!("Mission {} queued", mission_id));
                }
                Err(e) => self
                    .logger
                    .warn(&format!("Dropping mission {}: {}", mission_id, e)),
            }
        }
        queued
    }

    fn drain_status_reports(&mut self) -> usize {
        let mut handled = 0;
        for payload in self.mailbox.drain() {
            let report = match decode_status(&payload) {
                Ok(r) => r,
                Err(e) => {
                    self.logger.warn(&format!("Dropping status report: {}", e));
                    continue;
                }
            };
            handled += 1;
            match self.coordinator.handle_status_report(&report) {
                Ok(result) => {
                    if result.auto_registered {
                        self.logger.info(&format!(
                            "Registered unknown agent {} from its status report",
                            report.agent_name
                        ));
                    }
                    self.log_outcome(&report, &result.outcome);
                }
                Err(e) => self.logger.warn(&format!(
                    "Status report from {} rejected: {}",
                    report.agent_name, e
                )),
            }
            let mission = report
                .mission_id
                .as_deref()
                .and_then(|id| self.coordinator.mission(id));
            self.log_sink.record(mission_log_record(&report, mission));
        }
        handled
    }

    fn log_outcome(&self, report: &StatusMessage, outcome: &ReportOutcome) {
        let mission_id = report.mission_id.as_deref().unwrap_or_default();
        match outcome {
            ReportOutcome::Applied(transitions) => {
                for status in transitions {
                    self.logger.info(&format!(
                        "Mission {} is now {} ({})",
                        mission_id, status, report.agent_name
                    ));
                }
            }
            ReportOutcome::UnknownMission => self.logger.warn(&format!(
                "{} reported unknown mission {}",
                report.agent_name, mission_id
            )),
            ReportOutcome::NotAssignedToAgent => self.logger.warn(&format!(
                "{} reported mission {} which is not assigned to it",
                report.agent_name, mission_id
            )),
            ReportOutcome::RetiredAgent => self.logger.warn(&format!(
                "Ignoring report from deregistered agent {}",
                report.agent_name
            )),
            ReportOutcome::Lagging { .. } | ReportOutcome::NoMission => {}
        }
    }

    fn try_assign(&mut self) -> Option<(String, String)> {
        let bus = self.bus.clone();
        let candidate = self
            .coordinator
            .next_assignment(|name| bus.is_registered(name))?;
        if let Err(e) = self
            .coordinator
            .check_assignable(&candidate.mission_id, &candidate.agent_name)
        {
            self.logger.warn(&format!(
                "Could not assign mission {} to {}: {}",
                candidate.mission_id, candidate.agent_name, e
            ));
            return None;
        }
        let pickup = match self.choose_pickup() {
            Ok(pickup) => pickup,
            Err(e) => {
                self.logger.warn(&format!("Assignment skipped: {}", e));
                return None;
            }
        };
        let assignment = match self.coordinator.assign_mission(
            &candidate.mission_id,
            &candidate.agent_name,
            pickup,
        ) {
            Ok(a) => a,
            Err(e) => {
                self.logger.warn(&format!(
                    "Could not assign mission {} to {}: {}",
                    candidate.mission_id, candidate.agent_name, e
                ));
                return None;
            }
        };
        match encode_assignment(&assignment) {
            Ok(payload) => {
                if !self.bus.send(&candidate.agent_name, payload) {
                    self.logger.warn(&format!(
                        "Agent {} is unreachable; mission {} stays in progress",
                        candidate.agent_name, candidate.mission_id
                    ));
                }
            }
            Err(e) => self.logger.error(&format!(
                "Could not encode assignment for mission {}: {}",
                candidate.mission_id, e
            )),
        }
        self.logger.info(&format!(
            "Mission {} (priority {}) assigned to {}",
            candidate.mission_id, assignment.mission.priority, candidate.agent_name
        ));
        Some((candidate.mission_id, candidate.agent_name))
    }

    fn choose_pickup(&mut self) -> DomainResult<crate::domains::mission::Location> {
        let pool = self
            .pool
            .as_deref()
            .ok_or_else(|| DomainError::MissingCollaborator {
                what: "candidate pool".to_string(),
            })?;
        let pickups = pool.pickup_points();
        self.pickup_picker
            .pick(&pickups, self.generator.rng_mut())
            .map(|point| point.location)
            .ok_or_else(|| DomainError::MissingCollaborator {
                what: "pickup candidates".to_string(),
            })
    }

    fn publish_events(&mut self) {
        for event in self.coordinator.take_uncommitted_events() {
            self.overview.apply_event(&event);
            if let CoordinatorEvent::MissionArchived { mission_id, .. } = &event {
                self.logger
                    .info(&format!("Mission {} archived ({})", mission_id, event.summary()));
            }
        }
    }
}

/// Flattens a status report, and the mission it names when known, into one log row.
pub fn mission_log_record(report: &StatusMessage, mission: Option<&Mission>) -> MissionLogRecord {
    let pose = report.position_orientation.rounded();
    let missing = || MissionLogRecord::MISSING.to_string();
    MissionLogRecord {
        player_name: report.agent_name.clone(),
        current_time: report.timestamp.clone(),
        latitude: pose.latitude.to_string(),
        longitude: pose.longitude.to_string(),
        altitude: pose.altitude.to_string(),
        azimuth: pose.azimuth.to_string(),
        battery: hundredths(report.battery_level).to_string(),
        state: report.current_state.to_string(),
        mission_id: report.mission_id.clone().unwrap_or_else(missing),
        mission_status: report
            .mission_status
            .map(|s| s.to_string())
            .unwrap_or_else(missing),
        arrival_date_time: mission.map_or_else(missing, |m| m.arrival_date_time.clone()),
        action: mission.map_or_else(missing, |m| m.action.to_string()),
        priority: mission.map_or_else(missing, |m| m.priority.to_string()),
        package_weight: mission.map_or_else(missing, |m| hundredths(m.package_weight).to_string()),
    }
}
