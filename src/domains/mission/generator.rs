use super::candidates::RecentPicker;
use super::codec::encode_new_mission;
use super::ports::CandidatePool;
use super::types::{hundredths, NewMission};
use crate::common::{Countdown, DomainError, DomainResult};
use chrono::{DateTime, Timelike, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

pub const ARRIVAL_TIME_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorSettings {
    pub min_package_weight: f64,
    pub max_package_weight: f64,
    /// Priorities are drawn from `0..priority_levels`.
    pub priority_levels: i32,
    /// Stop generating once this many missions exist. `None` is unbounded.
    pub max_missions: Option<usize>,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            min_package_weight: 0.1,
            max_package_weight: 5.0,
            priority_levels: 3,
            max_missions: None,
        }
    }
}

/// Produces new delivery requests from the delivery candidates of a pool.
pub struct MissionGenerator {
    settings: GeneratorSettings,
    rng: StdRng,
    picker: RecentPicker,
    generated: usize,
}

impl MissionGenerator {
    /// A `seed` makes the sequence of missions reproducible.
    pub fn new(settings: GeneratorSettings, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            settings,
            rng,
            picker: RecentPicker::new(),
            generated: 0,
        }
    }

    pub fn generated_count(&self) -> usize {
        self.generated
    }

    pub fn limit_reached(&self) -> bool {
        self.settings
            .max_missions
            .map_or(false, |max| self.generated >= max)
    }

    pub fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Returns `Ok(None)` once the mission limit is reached.
    pub fn generate(
        &mut self,
        pool: &dyn CandidatePool,
        now: DateTime<Utc>,
    ) -> DomainResult<Option<NewMission>> {
        if self.limit_reached() {
            return Ok(None);
        }
        let candidates = pool.delivery_points();
        let delivery = self
            .picker
            .pick(&candidates, &mut self.rng)
            .ok_or_else(|| DomainError::MissingCollaborator {
                what: "delivery candidates".to_string(),
            })?;

        let weight_range = self.settings.min_package_weight..self.settings.max_package_weight;
        let package_weight = if weight_range.is_empty() {
            self.settings.min_package_weight
        } else {
            self.rng.gen_range(weight_range)
        };
        let priority = self.rng.gen_range(0..self.settings.priority_levels.max(1));
        let mission_id = uuid::Builder::from_random_bytes(self.rng.gen())
            .into_uuid()
            .to_string();

        self.generated += 1;
        Ok(Some(NewMission {
            mission_id,
            arrival_date_time: now.format(ARRIVAL_TIME_FORMAT).to_string(),
            delivery_location: delivery.location,
            package_weight,
            priority,
        }))
    }

    pub fn generate_encoded(
        &mut self,
        pool: &dyn CandidatePool,
        now: DateTime<Utc>,
    ) -> DomainResult<Option<String>> {
        match self.generate(pool, now)? {
            Some(new_mission) => Ok(Some(encode_new_mission(&new_mission)?)),
            None => Ok(None),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CadenceMode {
    /// Fire every `interval_secs`. Zero or less fires on every tick.
    Fixed { interval_secs: f64 },
    /// Interval drawn by hour of day after every firing.
    Dynamic,
}

impl Default for CadenceMode {
    fn default() -> Self {
        CadenceMode::Fixed { interval_secs: 5.0 }
    }
}

/// Interval in seconds for the dynamic cadence, rounded to hundredths.
pub fn dynamic_interval_secs<R: Rng + ?Sized>(hour: u32, rng: &mut R) -> f64 {
    let (low, high) = match hour {
        12..=13 => (2.0, 5.0),
        18..=20 => (3.0, 7.0),
        0..=5 => (20.0, 40.0),
        _ => (8.0, 15.0),
    };
    hundredths(rng.gen_range(low..high))
}

/// Paces the generator on simulation time.
#[derive(Debug, Clone)]
pub struct GenerationCadence {
    mode: CadenceMode,
    timer: Countdown,
}

impl GenerationCadence {
    pub fn new<R: Rng + ?Sized>(mode: CadenceMode, now: DateTime<Utc>, rng: &mut R) -> Self {
        let interval = Self::interval_for(mode, now, rng);
        Self {
            mode,
            timer: Countdown::started(interval),
        }
    }

    fn interval_for<R: Rng + ?Sized>(mode: CadenceMode, now: DateTime<Utc>, rng: &mut R) -> f64 {
        match mode {
            CadenceMode::Fixed { interval_secs } => interval_secs.max(0.0),
            CadenceMode::Dynamic => dynamic_interval_secs(now.hour(), rng),
        }
    }

    pub fn mode(&self) -> CadenceMode {
        self.mode
    }

    pub fn current_interval(&self) -> f64 {
        self.timer.duration()
    }

    /// Advances by `dt`; returns true when a mission is due and restarts the interval.
    pub fn advance<R: Rng + ?Sized>(&mut self, dt: f64, now: DateTime<Utc>, rng: &mut R) -> bool {
        self.timer.advance(dt);
        if !self.timer.expired() {
            return false;
        }
        let next = Self::interval_for(self.mode, now, rng);
        self.timer.restart(next);
        true
    }
}
