use super::profile::{MotionProfile, RouteMode};
use crate::common::{lerp_heading_degrees, Vec3};
use serde::{Deserialize, Serialize};

/// Distance under which the moving point counts as sitting on the step target.
pub const ARRIVAL_RADIUS: f64 = 0.5;

/// The target a step is heading for, frozen on the step's first tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct Latch {
    position: Vec3,
    heading: f64,
}

/// One tick of input for [`MotionPlanner::advance`].
#[derive(Debug, Clone, Copy)]
pub struct MotionRequest {
    pub target_position: Vec3,
    pub target_heading: f64,
    pub max_velocity: f64,
    pub profile: MotionProfile,
    pub mode: RouteMode,
    pub tolerance: f64,
}

/// Drives a virtual waypoint toward each step target; the agent follows the waypoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionPlanner {
    position: Vec3,
    heading: f64,
    speed: f64,
    latch: Option<Latch>,
}

impl MotionPlanner {
    pub fn new(position: Vec3, heading: f64) -> Self {
        Self {
            position,
            heading,
            speed: 0.0,
            latch: None,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn heading(&self) -> f64 {
        self.heading
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn is_latched(&self) -> bool {
        self.latch.is_some()
    }

    /// Moves the waypoint to `position` and stops it. Used when a new plan starts.
    pub fn reset(&mut self, position: Vec3, heading: f64) {
        self.position = position;
        self.heading = heading;
        self.speed = 0.0;
        self.latch = None;
    }

    /// Advances the waypoint by `dt` seconds and reports whether the step is reached.
    pub fn advance(&mut self, request: &MotionRequest, agent_position: Vec3, dt: f64) -> bool {
        let latch = *self.latch.get_or_insert(Latch {
            position: request.target_position,
            heading: request.target_heading,
        });

        let distance = self.position.distance(&latch.position);
        let accelerate = match request.mode {
            RouteMode::ThroughCheckPoint => true,
            RouteMode::PointToPoint => distance > request.profile.braking_distance(self.speed),
        };
        let next_speed = if accelerate {
            self.speed + request.profile.acceleration * dt
        } else {
            self.speed - request.profile.deceleration * dt
        };
        self.speed = next_speed.clamp(0.0, request.max_velocity.max(0.0));

        self.position = self.position.move_towards(&latch.position, self.speed * dt);
        self.heading = lerp_heading_degrees(
            self.heading,
            latch.heading,
            request.profile.rotation_speed * dt,
        );

        let stopped = match request.mode {
            RouteMode::ThroughCheckPoint => true,
            RouteMode::PointToPoint => self.speed == 0.0,
        };
        let reached = distance < ARRIVAL_RADIUS
            && stopped
            && latch.position.distance(&agent_position) < request.tolerance;
        if reached {
            self.latch = None;
        }
        reached
    }
}
