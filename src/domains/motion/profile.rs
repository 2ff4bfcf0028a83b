use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionProfile {
    /// Fraction of the remaining heading error closed per second.
    pub rotation_speed: f64,
    pub acceleration: f64,
    pub deceleration: f64,
}

impl MotionProfile {
    pub const fn new(rotation_speed: f64, acceleration: f64, deceleration: f64) -> Self {
        Self {
            rotation_speed,
            acceleration,
            deceleration,
        }
    }

    /// Distance needed to brake from `speed` to a standstill.
    pub fn braking_distance(&self, speed: f64) -> f64 {
        if self.deceleration <= 0.0 {
            return 0.0;
        }
        speed * speed / (2.0 * self.deceleration)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RouteMode {
    /// Accelerate, then brake to a stop on the target.
    PointToPoint,
    /// Accelerate only; the target is passed through at speed.
    ThroughCheckPoint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProfileKind {
    RouteToTarget,
    ThroughCheckPoint,
    PickDeliver,
    Land,
}

impl ProfileKind {
    pub fn route_mode(self) -> RouteMode {
        match self {
            ProfileKind::ThroughCheckPoint => RouteMode::ThroughCheckPoint,
            _ => RouteMode::PointToPoint,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionProfiles {
    pub route_to_target: MotionProfile,
    pub through_check_point: MotionProfile,
    pub pick_deliver: MotionProfile,
    pub land: MotionProfile,
}

impl Default for MotionProfiles {
    fn default() -> Self {
        Self {
            route_to_target: MotionProfile::new(1.0, 1.5, 3.0),
            through_check_point: MotionProfile::new(1.0, 1.0, 0.0),
            pick_deliver: MotionProfile::new(1.0, 0.5, 0.5),
            land: MotionProfile::new(1.0, 2.0, 0.5),
        }
    }
}

impl MotionProfiles {
    pub fn get(&self, kind: ProfileKind) -> MotionProfile {
        match kind {
            ProfileKind::RouteToTarget => self.route_to_target,
            ProfileKind::ThroughCheckPoint => self.through_check_point,
            ProfileKind::PickDeliver => self.pick_deliver,
            ProfileKind::Land => self.land,
        }
    }
}
