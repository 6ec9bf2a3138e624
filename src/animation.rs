use std::collections::HashSet;

use crate::config::{COUNTER_DURATION_MS, SMOOTH_SCROLL_MAX_MS};

/// Keys of elements whose entrance animation already ran. Grows for the
/// whole session; only a resize recalculation clears it.
#[derive(Debug, Default)]
pub struct AnimatedElementSet {
    keys: HashSet<String>,
}

impl AnimatedElementSet {
    /// Returns true when `key` was not animated yet.
    pub fn insert(&mut self, key: &str) -> bool {
        if self.keys.contains(key) {
            return false;
        }
        self.keys.insert(key.to_owned())
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementRect {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

/// Whether `rect` reaches into the viewport shrunk by `threshold` of its
/// size on every side.
pub fn is_in_viewport(rect: &ElementRect, viewport: &Viewport, threshold: f64) -> bool {
    rect.top <= viewport.height * (1.0 - threshold)
        && rect.bottom >= viewport.height * threshold
        && rect.left <= viewport.width * (1.0 - threshold)
        && rect.right >= viewport.width * threshold
}

/// Quadratic in-out easing over `d` ms from `b` by `c`, evaluated at `t`.
pub fn ease_in_out_quad(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let mut t = t / (d / 2.0);
    if t < 1.0 {
        return c / 2.0 * t * t + b;
    }
    t -= 1.0;
    -c / 2.0 * (t * (t - 2.0) - 1.0) + b
}

pub fn ease_out_quart(progress: f64) -> f64 {
    1.0 - (1.0 - progress).powi(4)
}

/// Window scroll from `start` to `target`, taking half a millisecond per
/// pixel up to a one second cap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothScroll {
    start: f64,
    distance: f64,
    duration: f64,
}

impl SmoothScroll {
    pub fn new(start: f64, target: f64) -> Self {
        let distance = target - start;
        Self {
            start,
            distance,
            duration: (distance.abs() / 2.0).min(SMOOTH_SCROLL_MAX_MS),
        }
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn position_at(&self, elapsed: f64) -> f64 {
        if self.is_finished(elapsed) {
            return self.start + self.distance;
        }
        ease_in_out_quad(elapsed.max(0.0), self.start, self.distance, self.duration)
    }

    pub fn is_finished(&self, elapsed: f64) -> bool {
        elapsed >= self.duration
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CounterFrame {
    pub value: i64,
    pub progress: f64,
    pub done: bool,
}

/// Count-up from zero to `target` with quartic ease-out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CounterAnimation {
    target: i64,
    started_at: f64,
    duration: f64,
}

impl CounterAnimation {
    pub fn new(target: i64, started_at: f64) -> Self {
        Self { target, started_at, duration: COUNTER_DURATION_MS }
    }

    pub fn frame(&self, now: f64) -> CounterFrame {
        let progress = ((now - self.started_at) / self.duration).clamp(0.0, 1.0);
        if progress >= 1.0 {
            return CounterFrame { value: self.target, progress, done: true };
        }
        let value = (self.target as f64 * ease_out_quart(progress)).floor() as i64;
        CounterFrame { value, progress, done: false }
    }
}

/// Formats with en-US digit grouping, e.g. `12500` as `"12,500"`.
pub fn format_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn animated_set_is_append_only_until_cleared() {
        let mut set = AnimatedElementSet::default();
        assert!(set.insert("feature-speed"));
        assert!(!set.insert("feature-speed"));
        assert!(set.insert("stat-users"));
        assert_eq!(set.len(), 2);

        set.clear();
        assert!(set.is_empty());
        assert!(set.insert("feature-speed"));
    }

    #[test]
    fn viewport_check_applies_threshold_on_every_side() {
        let viewport = Viewport { width: 1000.0, height: 800.0 };
        let inside = ElementRect { top: 100.0, bottom: 300.0, left: 0.0, right: 1000.0 };
        assert!(is_in_viewport(&inside, &viewport, 0.1));

        let below = ElementRect { top: 730.0, bottom: 900.0, left: 0.0, right: 1000.0 };
        assert!(!is_in_viewport(&below, &viewport, 0.1));
        assert!(is_in_viewport(&below, &viewport, 0.0));

        let above = ElementRect { top: -400.0, bottom: 70.0, left: 0.0, right: 1000.0 };
        assert!(!is_in_viewport(&above, &viewport, 0.1));
    }

    #[test]
    fn quad_easing_hits_both_ends_and_midpoint() {
        assert_eq!(ease_in_out_quad(0.0, 0.0, 100.0, 500.0), 0.0);
        assert_eq!(ease_in_out_quad(250.0, 0.0, 100.0, 500.0), 50.0);
        assert_eq!(ease_in_out_quad(500.0, 0.0, 100.0, 500.0), 100.0);
    }

    #[test]
    fn smooth_scroll_duration_is_capped() {
        assert_eq!(SmoothScroll::new(0.0, 600.0).duration(), 300.0);
        assert_eq!(SmoothScroll::new(5000.0, 0.0).duration(), 1000.0);
    }

    #[test]
    fn smooth_scroll_lands_on_target() {
        let scroll = SmoothScroll::new(1200.0, 200.0);
        assert_eq!(scroll.position_at(0.0), 1200.0);
        assert_eq!(scroll.position_at(250.0), 700.0);
        assert_eq!(scroll.position_at(5000.0), 200.0);
        assert!(scroll.is_finished(500.0));
    }

    #[test]
    fn zero_distance_scroll_finishes_immediately() {
        let scroll = SmoothScroll::new(300.0, 300.0);
        assert!(scroll.is_finished(0.0));
        assert_eq!(scroll.position_at(0.0), 300.0);
    }

    #[test]
    fn counter_eases_up_and_stops_at_target() {
        let counter = CounterAnimation::new(10_000, 1_000.0);
        let first = counter.frame(1_000.0);
        assert_eq!(first.value, 0);
        assert!(!first.done);

        let middle = counter.frame(2_000.0);
        assert_eq!(middle.value, 9_375);
        assert!(!middle.done);

        let last = counter.frame(3_000.0);
        assert_eq!(last.value, 10_000);
        assert!(last.done);
        assert!(counter.frame(9_000.0).done);
    }

    #[test]
    fn counter_values_never_decrease() {
        let counter = CounterAnimation::new(98_765, 0.0);
        let mut last = 0;
        for ms in (0..=2_000).step_by(16) {
            let frame = counter.frame(ms as f64);
            assert!(frame.value >= last);
            last = frame.value;
        }
    }

    #[test]
    fn thousands_are_grouped() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1_000), "1,000");
        assert_eq!(format_thousands(12_500), "12,500");
        assert_eq!(format_thousands(1_234_567), "1,234,567");
        assert_eq!(format_thousands(-45_000), "-45,000");
    }
}
