use crate::common::Vec3;
use crate::domains::mission::Location;

/// Port to the low-level controller that actually flies the agent.
///
/// The state machine only ever hands it a target pose; stabilization, physics and
/// payload mechanics live behind this trait.
pub trait FlightController: Send {
    /// Current position and heading.
    fn pose(&self) -> Location;

    fn battery_level(&self) -> f64;

    fn set_target_pose(&mut self, position: Vec3, heading: f64);

    /// Integrates the controller forward by `dt` seconds.
    fn advance(&mut self, dt: f64);

    /// Tries to grab the package under the agent. Returns true once it is held.
    fn attach_payload(&mut self) -> bool;

    fn release_payload(&mut self);
}
