use crate::common::{lerp_heading_degrees, Vec3};
use crate::domains::agent::FlightController;
use crate::domains::mission::Location;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KinematicSettings {
    /// Fraction of the remaining position and heading error closed per second.
    pub response_rate: f64,
    /// Battery percent used per metre flown.
    pub drain_per_meter: f64,
    /// Battery percent used per second regardless of motion.
    pub idle_drain_per_sec: f64,
}

impl Default for KinematicSettings {
    fn default() -> Self {
        Self {
            response_rate: 8.0,
            drain_per_meter: 0.01,
            idle_drain_per_sec: 0.001,
        }
    }
}

/// First-order follower standing in for a real flight stack: it eases toward the last
/// target pose and drains its battery with distance flown.
#[derive(Debug, Clone)]
pub struct KinematicFlightController {
    position: Vec3,
    heading: f64,
    target_position: Vec3,
    target_heading: f64,
    battery: f64,
    payload_attached: bool,
    settings: KinematicSettings,
}

impl KinematicFlightController {
    pub fn new(start: Location, settings: KinematicSettings) -> Self {
        Self {
            position: start.position(),
            heading: start.azimuth,
            target_position: start.position(),
            target_heading: start.azimuth,
            battery: 100.0,
            payload_attached: false,
            settings,
        }
    }

    pub fn payload_attached(&self) -> bool {
        self.payload_attached
    }
}

impl FlightController for KinematicFlightController {
    fn pose(&self) -> Location {
        Location::from_position(self.position, self.heading)
    }

    fn battery_level(&self) -> f64 {
        self.battery
    }

    fn set_target_pose(&mut self, position: Vec3, heading: f64) {
        self.target_position = position;
        self.target_heading = heading;
    }

    fn advance(&mut self, dt: f64) {
        let blend = (self.settings.response_rate * dt).clamp(0.0, 1.0);
        let step = (self.target_position - self.position) * blend;
        self.position = self.position + step;
        self.heading = lerp_heading_degrees(self.heading, self.target_heading, blend);
        let used = step.magnitude() * self.settings.drain_per_meter
            + self.settings.idle_drain_per_sec * dt;
        self.battery = (self.battery - used).max(0.0);
    }

    fn attach_payload(&mut self) -> bool {
        self.payload_attached = true;
        true
    }

    fn release_payload(&mut self) {
        self.payload_attached = false;
    }
}
