use serde::{Deserialize, Serialize};

/// A cooperative delay kept as plain data: an armed flag plus accumulated simulation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Countdown {
    duration: f64,
    elapsed: f64,
    armed: bool,
}

impl Countdown {
    pub fn new(duration: f64) -> Self {
        Self {
            duration,
            elapsed: 0.0,
            armed: false,
        }
    }

    /// A countdown that is already running.
    pub fn started(duration: f64) -> Self {
        let mut countdown = Self::new(duration);
        countdown.arm();
        countdown
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Starts counting. Arming an armed countdown keeps its elapsed time.
    pub fn arm(&mut self) {
        self.armed = true;
    }

    pub fn reset(&mut self) {
        self.armed = false;
        self.elapsed = 0.0;
    }

    /// Resets and re-arms with a new duration.
    pub fn restart(&mut self, duration: f64) {
        self.duration = duration;
        self.elapsed = 0.0;
        self.armed = true;
    }

    pub fn advance(&mut self, dt: f64) {
        if self.armed {
            self.elapsed += dt;
        }
    }

    pub fn expired(&self) -> bool {
        self.armed && self.elapsed >= self.duration
    }
}
