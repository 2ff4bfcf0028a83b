use super::agent_runtime::AgentRuntime;
use super::clock::SimulationClock;
use super::coordinator_service::{CoordinatorService, CoordinatorServiceSettings, CoordinatorTickSummary};
use crate::common::{DomainError, DomainResult};
use crate::domains::agent::{AgentSettings, DeliveryAgent, FlightController};
use crate::domains::coordinator::AgentCapabilities;
use crate::domains::logger::DynLogger;
use crate::domains::mission::{CandidatePool, MissionLogSink};
use crate::domains::motion::MotionProfiles;
use crate::messaging::{Mailbox, MessageBus};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct SimulationSettings {
    pub tick_secs: f64,
    pub start: DateTime<Utc>,
    pub coordinator: CoordinatorServiceSettings,
    pub agent: AgentSettings,
    pub agent_mailbox_capacity: usize,
    pub motion: MotionProfiles,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            tick_secs: 0.05,
            start: Utc::now(),
            coordinator: CoordinatorServiceSettings::default(),
            agent: AgentSettings::default(),
            agent_mailbox_capacity: 1000,
            motion: MotionProfiles::default(),
        }
    }
}

/// Owns the bus, the coordinator and every agent, and advances them together.
///
/// Each tick runs the coordinator first and then the agents in name order, so a report
/// an agent sends is seen by the coordinator on the following tick.
pub struct FleetSimulation {
    bus: Arc<MessageBus>,
    clock: SimulationClock,
    coordinator: CoordinatorService,
    agents: BTreeMap<String, AgentRuntime>,
    agent_settings: AgentSettings,
    agent_mailbox_capacity: usize,
    motion: MotionProfiles,
    logger: DynLogger,
}

impl FleetSimulation {
    pub fn new(
        settings: SimulationSettings,
        pool: Option<Arc<dyn CandidatePool>>,
        logger: DynLogger,
        log_sink: Arc<dyn MissionLogSink>,
    ) -> Self {
        let bus = Arc::new(MessageBus::new());
        let clock = SimulationClock::new(settings.start, settings.tick_secs);
        let coordinator = CoordinatorService::new(
            settings.coordinator,
            bus.clone(),
            pool,
            logger.clone(),
            log_sink,
            clock.now(),
        );
        Self {
            bus,
            clock,
            coordinator,
            agents: BTreeMap::new(),
            agent_settings: settings.agent,
            agent_mailbox_capacity: settings.agent_mailbox_capacity,
            motion: settings.motion,
            logger,
        }
    }

    pub fn bus(&self) -> &Arc<MessageBus> {
        &self.bus
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn coordinator(&self) -> &CoordinatorService {
        &self.coordinator
    }

    pub fn coordinator_mut(&mut self) -> &mut CoordinatorService {
        &mut self.coordinator
    }

    pub fn agent(&self, name: &str) -> Option<&AgentRuntime> {
        self.agents.get(name)
    }

    pub fn agent_names(&self) -> Vec<String> {
        self.agents.keys().cloned().collect()
    }

    /// Creates an agent at the controller's current pose and registers it everywhere.
    pub fn add_agent(
        &mut self,
        name: &str,
        controller: Box<dyn FlightController>,
        capabilities: AgentCapabilities,
    ) -> DomainResult<()> {
        if self.agents.contains_key(name) {
            return Err(DomainError::InvalidCommand {
                reason: format!("Agent {} already exists", name),
            });
        }
        self.coordinator.register_agent(name, capabilities)?;

        let mailbox = Arc::new(Mailbox::new(self.agent_mailbox_capacity));
        self.bus.register(name, mailbox.clone());
        let agent = DeliveryAgent::for_controller(
            name,
            controller.as_ref(),
            self.motion,
            self.agent_settings,
            self.logger.clone(),
        );
        let runtime = AgentRuntime::new(
            agent,
            controller,
            mailbox,
            self.bus.clone(),
            self.coordinator.address().to_string(),
            self.logger.clone(),
        );
        self.agents.insert(name.to_string(), runtime);
        self.logger.info(&format!("Agent {} added", name));
        Ok(())
    }

    /// Drops the agent. Messages still addressed to it are lost; its mission keeps its status.
    pub fn remove_agent(&mut self, name: &str) -> DomainResult<()> {
        if self.agents.remove(name).is_none() {
            return Err(DomainError::AgentNotFound {
                name: name.to_string(),
            });
        }
        self.bus.unregister(name);
        if let Err(e) = self.coordinator.deregister_agent(name) {
            self.logger.warn(&format!("{}", e));
        }
        self.logger.info(&format!("Agent {} removed", name));
        Ok(())
    }

    pub fn tick(&mut self) -> CoordinatorTickSummary {
        let dt = self.clock.tick_secs();
        let now = self.clock.now();
        let summary = self.coordinator.tick(dt, now);
        for runtime in self.agents.values_mut() {
            runtime.tick(dt, now);
        }
        self.clock.advance();
        summary
    }

    pub fn run_ticks(&mut self, ticks: u64) -> Vec<CoordinatorTickSummary> {
        (0..ticks).map(|_| self.tick()).collect()
    }
}
