use log::Level;

#[cfg(debug_assertions)]
pub fn log_level() -> Level {
    Level::Debug  // Verbose console output when running locally
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> Level {
    Level::Info
}

/// External payment page every `#demo` call-to-action opens.
pub const CHECKOUT_URL: &str = "https://buy.stripe.com/8wM6px5ycf9pgfK000";

// Scroll-driven view state
pub const HEADER_SCROLL_THRESHOLD: f64 = 50.0;
pub const ACTIVE_SECTION_PROBE_OFFSET: f64 = 100.0;
pub const DEFAULT_PARALLAX_SPEED: f64 = 0.5;
pub const HERO_PARALLAX_SPEED: f64 = 0.5;

// Rate limiting, in milliseconds
pub const SCROLL_THROTTLE_MS: f64 = 16.0; // ~60fps
pub const RESIZE_DEBOUNCE_MS: f64 = 250.0;

// Navigation
pub const MOBILE_BREAKPOINT: f64 = 768.0;
pub const ANCHOR_SCROLL_EXTRA_OFFSET: f64 = 20.0;
pub const SMOOTH_SCROLL_MAX_MS: f64 = 1000.0;

// Entrance animations
pub const COUNTER_DURATION_MS: f64 = 2000.0;
pub const REVEAL_THRESHOLD: f64 = 0.1;
pub const REVEAL_ROOT_MARGIN: &str = "0px 0px -50px 0px";

// Modal and notifications
pub const MODAL_FADE_MS: u32 = 300;
pub const FIRST_INPUT_FOCUS_DELAY_MS: u32 = 100;
pub const TOAST_LIFETIME_MS: u32 = 5000;
pub const TOAST_EXIT_MS: u32 = 300;
pub const SUBMISSION_DELAY_MS: u32 = 1500;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn throttle_interval_fits_one_frame() {
        assert!(SCROLL_THROTTLE_MS <= 1000.0 / 60.0);
    }

    #[test]
    fn checkout_url_is_https() {
        assert!(CHECKOUT_URL.starts_with("https://"));
    }

    #[test]
    fn exit_animations_match_their_timers() {
        assert_eq!(MODAL_FADE_MS, TOAST_EXIT_MS);
        assert!(TOAST_EXIT_MS < TOAST_LIFETIME_MS);
    }
}
