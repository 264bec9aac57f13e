use std::time::Duration;
use web_time::Instant;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
enum ClockState {
    #[default]
    Idle,
    Running(Instant),
    Paused,
    Stopped,
}

/// Game clock that can be paused while the player is away.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Stopwatch {
    state: ClockState,
    accumulated: Duration,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, ClockState::Running(_))
    }

    pub fn is_paused(&self) -> bool {
        matches!(self.state, ClockState::Paused)
    }

    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    pub fn pause(&mut self) {
        self.pause_at(Instant::now());
    }

    pub fn resume(&mut self) {
        self.resume_at(Instant::now());
    }

    pub fn stop(&mut self) {
        self.stop_at(Instant::now());
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed_at(Instant::now())
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Restarts from zero.
    pub fn start_at(&mut self, now: Instant) {
        self.accumulated = Duration::ZERO;
        self.state = ClockState::Running(now);
    }

    pub fn pause_at(&mut self, now: Instant) {
        if let ClockState::Running(since) = self.state {
            self.accumulated += now.saturating_duration_since(since);
            self.state = ClockState::Paused;
        }
    }

    pub fn resume_at(&mut self, now: Instant) {
        if self.is_paused() {
            self.state = ClockState::Running(now);
        }
    }

    /// Freezes the elapsed time for good, a stopped clock cannot be resumed.
    pub fn stop_at(&mut self, now: Instant) {
        match self.state {
            ClockState::Running(since) => {
                self.accumulated += now.saturating_duration_since(since);
                self.state = ClockState::Stopped;
            }
            ClockState::Paused => self.state = ClockState::Stopped,
            ClockState::Idle | ClockState::Stopped => {}
        }
    }

    pub fn elapsed_at(&self, now: Instant) -> Duration {
        match self.state {
            ClockState::Running(since) => self.accumulated + now.saturating_duration_since(since),
            _ => self.accumulated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEC: Duration = Duration::from_secs(1);

    #[test]
    fn idle_clock_reads_zero() {
        let clock = Stopwatch::new();

        assert_eq!(clock.elapsed(), Duration::ZERO);
        assert!(!clock.is_running());
    }

    #[test]
    fn paused_time_is_not_counted() {
        let t0 = Instant::now();
        let mut clock = Stopwatch::new();

        clock.start_at(t0);
        clock.pause_at(t0 + 2 * SEC);
        assert_eq!(clock.elapsed_at(t0 + 10 * SEC), 2 * SEC);

        clock.resume_at(t0 + 10 * SEC);
        assert_eq!(clock.elapsed_at(t0 + 13 * SEC), 5 * SEC);
    }

    #[test]
    fn stopped_clock_is_frozen() {
        let t0 = Instant::now();
        let mut clock = Stopwatch::new();

        clock.start_at(t0);
        clock.stop_at(t0 + 3 * SEC);
        clock.resume_at(t0 + 4 * SEC);

        assert_eq!(clock.elapsed_at(t0 + 60 * SEC), 3 * SEC);
        assert!(!clock.is_running());
    }

    #[test]
    fn resume_without_pause_does_nothing() {
        let t0 = Instant::now();
        let mut clock = Stopwatch::new();

        clock.resume_at(t0);
        assert!(!clock.is_running());

        clock.start_at(t0);
        clock.resume_at(t0 + 5 * SEC);
        assert_eq!(clock.elapsed_at(t0 + 6 * SEC), 6 * SEC);
    }

    #[test]
    fn restart_clears_previous_time() {
        let t0 = Instant::now();
        let mut clock = Stopwatch::new();

        clock.start_at(t0);
        clock.stop_at(t0 + 3 * SEC);
        clock.start_at(t0 + 5 * SEC);

        assert_eq!(clock.elapsed_at(t0 + 6 * SEC), SEC);
    }
}
