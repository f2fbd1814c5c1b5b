use std::time::Duration;

/// Tracks run time: a monotonic counter of processed operations and the
/// simulated wall-clock time that vitality pulses represent.
#[derive(Debug, Clone, Default)]
pub struct SimClock {
    tick: u64,
    elapsed: Duration,
}

impl SimClock {
    /// Create a new clock at tick 0 with no elapsed time.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock by one operation. Returns the new tick number.
    pub fn advance(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    /// Add simulated wall-clock time.
    pub fn add_elapsed(&mut self, by: Duration) {
        self.elapsed += by;
    }

    /// Return the current tick number.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Simulated time since the run started.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Elapsed time as `mm:ss`.
    pub fn elapsed_label(&self) -> String {
        let secs = self.elapsed.as_secs();
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_initial_state() {
        let clock = SimClock::new();
        assert_eq!(clock.tick(), 0);
        assert_eq!(clock.elapsed(), Duration::ZERO);
    }

    #[test]
    fn clock_advance_increments() {
        let mut clock = SimClock::new();
        clock.advance();
        clock.advance();
        assert_eq!(clock.advance(), 3);
        assert_eq!(clock.tick(), 3);
    }

    #[test]
    fn clock_elapsed_label_wraps_minutes() {
        let mut clock = SimClock::new();
        for _ in 0..125 {
            clock.add_elapsed(Duration::from_secs(1));
        }
        assert_eq!(clock.elapsed_label(), "02:05");
    }
}
