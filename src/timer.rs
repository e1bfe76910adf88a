use std::time::{Duration, Instant};

pub const TIMER_DEC_PER_SECOND: u32 = 60;

/// 8-bit down-counter used for both the delay and the sound timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct Timer {
    pub count: u8,
}

impl Timer {
    pub fn new(init_count: u8) -> Self {
        Self { count: init_count }
    }

    pub fn set(&mut self, value: u8) {
        self.count = value;
    }

    /// One 60 Hz tick, saturating at zero.
    pub fn tick(&mut self) {
        self.count = self.count.saturating_sub(1);
    }

    pub fn is_active(&self) -> bool {
        self.count > 0
    }
}

/// Wall-clock gate that fires at a fixed rate.
#[derive(Debug)]
pub struct Pacer {
    interval: Duration,
    last_updated: Instant,
}

impl Pacer {
    pub fn new(rate_hz: u32, now: Instant) -> Self {
        Self {
            interval: Duration::from_secs(1) / rate_hz.max(1),
            last_updated: now,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// True once per elapsed interval.
    pub fn sync(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last_updated) >= self.interval {
            // past deadline
            self.last_updated = now;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_floors_at_zero() {
        let mut t = Timer::new(1);
        assert!(t.is_active());
        t.tick();
        assert_eq!(t.count, 0);
        t.tick();
        assert_eq!(t.count, 0);
        assert!(!t.is_active());
    }

    #[test]
    fn test_pacer() {
        let start = Instant::now();
        let mut p = Pacer::new(TIMER_DEC_PER_SECOND, start);
        assert_eq!(p.interval(), Duration::from_secs(1) / 60);
        assert!(!p.sync(start + Duration::from_millis(10)));
        assert!(p.sync(start + Duration::from_millis(17)));
        assert!(!p.sync(start + Duration::from_millis(20)));
        assert!(p.sync(start + Duration::from_millis(34)));
    }
}
