use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

/// Local 3-D coordinates: x east (longitude), y up (altitude), z north (latitude).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn distance(&self, other: &Vec3) -> f64 {
        (*self - *other).magnitude()
    }

    pub fn midpoint(&self, other: &Vec3) -> Vec3 {
        (*self + *other) / 2.0
    }

    /// Same point with the altitude replaced.
    pub fn with_altitude(&self, altitude: f64) -> Vec3 {
        Vec3::new(self.x, altitude, self.z)
    }

    /// Moves toward `target` by at most `max_delta`, never overshooting.
    pub fn move_towards(&self, target: &Vec3, max_delta: f64) -> Vec3 {
        let delta = *target - *self;
        let distance = delta.magnitude();
        if distance <= max_delta || distance == 0.0 {
            return *target;
        }
        *self + delta * (max_delta / distance)
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Vec3;
    fn mul(self, rhs: f64) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Div<f64> for Vec3 {
    type Output = Vec3;
    fn div(self, rhs: f64) -> Vec3 {
        Vec3::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

/// Wraps any angle in degrees into `[0, 360)`.
pub fn normalize_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Navigation bearing (0 = +z, clockwise toward +x) of the direction `to -> from`.
pub fn azimuth_degrees(from: &Vec3, to: &Vec3) -> f64 {
    let delta = *from - *to;
    let angle = delta.z.atan2(delta.x);
    normalize_degrees(90.0 - angle.to_degrees())
}

/// Signed shortest rotation from `current` to `target`, in `[-180, 180)`.
pub fn shortest_arc_degrees(current: f64, target: f64) -> f64 {
    (target - current + 180.0).rem_euclid(360.0) - 180.0
}

/// Interpolates a heading along the shortest arc; `t` is clamped to `[0, 1]`.
pub fn lerp_heading_degrees(current: f64, target: f64, t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    normalize_degrees(current + shortest_arc_degrees(current, target) * t)
}
