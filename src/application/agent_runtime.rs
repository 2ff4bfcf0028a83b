use crate::domains::agent::{DeliveryAgent, FlightController};
use crate::domains::logger::DynLogger;
use crate::domains::mission::{decode_assignment, encode_status};
use crate::messaging::{Mailbox, MessageBus};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// One agent wired to the bus: its mailbox, its controller and where it reports to.
pub struct AgentRuntime {
    agent: DeliveryAgent,
    controller: Box<dyn FlightController>,
    mailbox: Arc<Mailbox>,
    bus: Arc<MessageBus>,
    coordinator_address: String,
    logger: DynLogger,
}

impl AgentRuntime {
    pub fn new(
        agent: DeliveryAgent,
        controller: Box<dyn FlightController>,
        mailbox: Arc<Mailbox>,
        bus: Arc<MessageBus>,
        coordinator_address: String,
        logger: DynLogger,
    ) -> Self {
        Self {
            agent,
            controller,
            mailbox,
            bus,
            coordinator_address,
            logger,
        }
    }

    pub fn agent(&self) -> &DeliveryAgent {
        &self.agent
    }

    pub fn controller(&self) -> &dyn FlightController {
        self.controller.as_ref()
    }

    pub fn mailbox(&self) -> &Arc<Mailbox> {
        &self.mailbox
    }

    /// Reads assignments, steps the state machine and the controller, and reports if due.
    pub fn tick(&mut self, dt: f64, now: DateTime<Utc>) {
        for payload in self.mailbox.drain() {
            let assignment = match decode_assignment(&payload) {
                Ok(a) => a,
                Err(e) => {
                    self.logger
                        .warn(&format!("{}: dropping assignment: {}", self.agent.name(), e));
                    continue;
                }
            };
            if let Err(e) = self
                .agent
                .accept_assignment(assignment, self.controller.as_ref())
            {
                self.logger.warn(&format!("{}", e));
            }
        }

        let report = self.agent.tick(self.controller.as_mut(), dt, now);
        self.controller.advance(dt);

        let Some(report) = report else {
            return;
        };
        match encode_status(&report) {
            // an unregistered coordinator just misses the report
            Ok(payload) => {
                self.bus.send(&self.coordinator_address, payload);
            }
            Err(e) => self.logger.error(&format!(
                "{}: could not encode status report: {}",
                self.agent.name(),
                e
            )),
        }
    }
}
