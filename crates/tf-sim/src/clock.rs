/// Tracks frames and elapsed simulated time.
#[derive(Debug, Clone, Default)]
pub struct SimClock {
    frame: u64,
    seconds: f64,
    delta: f64,
}

impl SimClock {
    /// Create a new clock at frame zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by one frame lasting `delta` seconds. Negative deltas count as zero.
    pub fn advance(&mut self, delta: f64) {
        let delta = delta.max(0.0);
        self.frame += 1;
        self.seconds += delta;
        self.delta = delta;
    }

    /// Frames advanced so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Total simulated seconds.
    pub fn seconds(&self) -> f64 {
        self.seconds
    }

    /// Duration of the most recent frame.
    pub fn delta(&self) -> f64 {
        self.delta
    }
}

/// A period timer measured against simulated time.
#[derive(Debug, Clone, PartialEq)]
pub struct Stopwatch {
    period: f64,
    started: Option<f64>,
}

impl Stopwatch {
    /// A stopped timer with the given period.
    pub fn new(period: f64) -> Self {
        Self {
            period,
            started: None,
        }
    }

    /// Start timing from `now`.
    pub fn start(&mut self, now: f64) {
        self.started = Some(now);
    }

    /// Stop timing. A stopped watch never reports elapsed periods.
    pub fn stop(&mut self) {
        self.started = None;
    }

    /// Whether the watch is stopped.
    pub fn is_stopped(&self) -> bool {
        self.started.is_none()
    }

    /// Length of one period in seconds.
    pub fn period(&self) -> f64 {
        self.period
    }

    /// Seconds since the timer started, zero when stopped.
    pub fn elapsed(&self, now: f64) -> f64 {
        self.started.map_or(0.0, |start| now - start)
    }

    /// Whether a running timer has reached its period.
    pub fn has_period_elapsed(&self, now: f64) -> bool {
        !self.is_stopped() && self.elapsed(now) >= self.period
    }
}

/// Converts variable frame durations into a whole number of fixed steps.
///
/// The step count depends only on total elapsed time, so the same span
/// yields the same number of steps however it is split into frames.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    hz: f64,
    elapsed: f64,
    steps: u64,
}

/// Slack, in steps, absorbing rounding in summed frame times.
const STEP_TOLERANCE: f64 = 1e-6;

impl FixedTimestep {
    /// A timestep running `hz` steps per simulated second.
    pub fn new(hz: u32) -> Self {
        Self {
            hz: f64::from(hz.max(1)),
            elapsed: 0.0,
            steps: 0,
        }
    }

    /// Length of one step in seconds.
    pub fn step_seconds(&self) -> f64 {
        1.0 / self.hz
    }

    /// Accumulate a frame and return how many steps are now due.
    pub fn advance(&mut self, delta: f64) -> u32 {
        self.elapsed += delta.max(0.0);
        let due = (self.elapsed * self.hz + STEP_TOLERANCE).floor() as u64;
        let steps = due.saturating_sub(self.steps);
        self.steps = self.steps.max(due);
        steps as u32
    }

    /// Total steps issued.
    pub fn steps(&self) -> u64 {
        self.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_advances() {
        let mut clock = SimClock::new();
        clock.advance(0.5);
        clock.advance(0.25);
        assert_eq!(clock.frame(), 2);
        assert!((clock.seconds() - 0.75).abs() < f64::EPSILON);
        assert!((clock.delta() - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn clock_ignores_negative_delta() {
        let mut clock = SimClock::new();
        clock.advance(-1.0);
        assert!(clock.seconds().abs() < f64::EPSILON);
    }

    #[test]
    fn stopwatch_period() {
        let mut watch = Stopwatch::new(0.5);
        assert!(watch.is_stopped());
        assert!(!watch.has_period_elapsed(10.0));
        watch.start(1.0);
        assert!(!watch.has_period_elapsed(1.4));
        assert!(watch.has_period_elapsed(1.5));
        watch.stop();
        assert!(watch.elapsed(3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn timestep_fires_zero_or_many_times() {
        let mut step = FixedTimestep::new(240);
        assert_eq!(step.advance(1.0 / 480.0), 0);
        assert_eq!(step.advance(1.0 / 480.0), 1);
        assert_eq!(step.advance(1.0 / 60.0), 4);
        assert_eq!(step.steps(), 5);
    }

    #[test]
    fn timestep_independent_of_frame_split() {
        let mut fast = FixedTimestep::new(240);
        let mut slow = FixedTimestep::new(240);
        let fast_total: u32 = (0..120).map(|_| fast.advance(1.0 / 60.0)).sum();
        let slow_total: u32 = (0..60).map(|_| slow.advance(1.0 / 30.0)).sum();
        assert_eq!(fast_total, 480);
        assert_eq!(slow_total, 480);
    }
}
