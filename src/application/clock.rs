use chrono::{DateTime, Duration, Utc};

/// Discrete simulation time. Every component reads the same `now` during a tick.
#[derive(Debug, Clone)]
pub struct SimulationClock {
    start: DateTime<Utc>,
    tick_secs: f64,
    ticks: u64,
}

impl SimulationClock {
    pub fn new(start: DateTime<Utc>, tick_secs: f64) -> Self {
        Self {
            start,
            tick_secs,
            ticks: 0,
        }
    }

    pub fn tick_secs(&self) -> f64 {
        self.tick_secs
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.ticks as f64 * self.tick_secs
    }

    pub fn now(&self) -> DateTime<Utc> {
        let millis = (self.elapsed_secs() * 1000.0).round() as i64;
        self.start + Duration::milliseconds(millis)
    }

    pub fn advance(&mut self) {
        self.ticks += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn now_moves_by_tick_length() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut clock = SimulationClock::new(start, 0.5);
        clock.advance();
        clock.advance();
        clock.advance();
        assert_eq!(clock.ticks(), 3);
        assert_eq!(clock.now(), start + Duration::milliseconds(1500));
    }
}
