//! Rate limiting for scroll and resize handlers.
//!
//! Both types only look at the timestamps they are handed, so the browser
//! glue drives them with `performance.now()` and the tests drive them with
//! plain numbers. Times are milliseconds.

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThrottleDecision {
    RunNow,
    /// Suppressed; schedule one trailing run after this many milliseconds.
    Defer(f64),
    /// Suppressed; a trailing run is already scheduled.
    Skip,
}

/// Leading-edge throttle with a single trailing run, so the last event in a
/// burst is never lost.
#[derive(Debug, Clone)]
pub struct Throttle {
    interval: f64,
    last_run: Option<f64>,
    trailing_pending: bool,
}

impl Throttle {
    pub fn new(interval: f64) -> Self {
        Self { interval, last_run: None, trailing_pending: false }
    }

    /// Leading-edge check: true when a full interval has passed since the
    /// last run, which it then records.
    pub fn should_run(&mut self, now: f64) -> bool {
        let due = self.last_run.map_or(true, |last| now - last >= self.interval);
        if due {
            self.last_run = Some(now);
            self.trailing_pending = false;
        }
        due
    }

    pub fn hit(&mut self, now: f64) -> ThrottleDecision {
        if self.should_run(now) {
            return ThrottleDecision::RunNow;
        }
        if self.trailing_pending {
            return ThrottleDecision::Skip;
        }
        self.trailing_pending = true;
        let last = self.last_run.unwrap_or(now);
        ThrottleDecision::Defer(self.interval - (now - last))
    }

    pub fn fire_trailing(&mut self, now: f64) {
        self.trailing_pending = false;
        self.last_run = Some(now);
    }
}

/// Trailing debounce: fires once after input has been quiet for `wait`.
#[derive(Debug, Clone)]
pub struct Debounce {
    wait: f64,
    last_input: Option<f64>,
}

impl Debounce {
    pub fn new(wait: f64) -> Self {
        Self { wait, last_input: None }
    }

    pub fn input(&mut self, now: f64) {
        self.last_input = Some(now);
    }

    pub fn is_pending(&self) -> bool {
        self.last_input.is_some()
    }

    /// Milliseconds of quiet still needed before [`Debounce::poll`] fires.
    pub fn remaining(&self, now: f64) -> Option<f64> {
        self.last_input.map(|last| (self.wait - (now - last)).max(0.0))
    }

    /// True exactly once per quiet period.
    pub fn poll(&mut self, now: f64) -> bool {
        match self.last_input {
            Some(last) if now - last >= self.wait => {
                self.last_input = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn throttle_runs_the_leading_call() {
        let mut throttle = Throttle::new(16.0);
        assert_eq!(throttle.hit(0.0), ThrottleDecision::RunNow);
        assert_eq!(throttle.hit(16.0), ThrottleDecision::RunNow);
        assert_eq!(throttle.hit(40.0), ThrottleDecision::RunNow);
    }

    #[test]
    fn throttle_defers_once_per_window() {
        let mut throttle = Throttle::new(16.0);
        assert_eq!(throttle.hit(100.0), ThrottleDecision::RunNow);
        assert_eq!(throttle.hit(104.0), ThrottleDecision::Defer(12.0));
        assert_eq!(throttle.hit(108.0), ThrottleDecision::Skip);
        assert_eq!(throttle.hit(110.0), ThrottleDecision::Skip);

        throttle.fire_trailing(116.0);
        assert_eq!(throttle.hit(120.0), ThrottleDecision::Defer(12.0));
        assert_eq!(throttle.hit(132.0), ThrottleDecision::RunNow);
    }

    #[test]
    fn leading_run_cancels_a_pending_trailing_run() {
        let mut throttle = Throttle::new(16.0);
        assert!(throttle.should_run(0.0));
        assert_eq!(throttle.hit(4.0), ThrottleDecision::Defer(12.0));
        assert!(!throttle.should_run(8.0));
        assert!(throttle.should_run(20.0));
        assert_eq!(throttle.hit(24.0), ThrottleDecision::Defer(12.0));
    }

    #[test]
    fn throttle_bounds_runs_per_second() {
        let mut throttle = Throttle::new(16.0);
        let runs = (0..1000).filter(|ms| throttle.should_run(*ms as f64)).count();
        assert!(runs <= 63, "ran {} times", runs);
        assert!(runs >= 58, "ran {} times", runs);
    }

    #[test]
    fn debounce_waits_for_quiet() {
        let mut debounce = Debounce::new(250.0);
        assert!(!debounce.poll(0.0));

        debounce.input(0.0);
        debounce.input(100.0);
        debounce.input(200.0);
        assert!(!debounce.poll(250.0));
        assert!(!debounce.poll(449.0));
        assert!(debounce.poll(450.0));
    }

    #[test]
    fn debounce_fires_once_per_quiet_period() {
        let mut debounce = Debounce::new(250.0);
        debounce.input(0.0);
        assert!(debounce.poll(300.0));
        assert!(!debounce.poll(301.0));
        assert!(!debounce.is_pending());

        debounce.input(400.0);
        assert!(debounce.is_pending());
        assert_eq!(debounce.remaining(500.0), Some(150.0));
        assert_eq!(debounce.remaining(900.0), Some(0.0));
        assert!(debounce.poll(650.0));
    }
}
