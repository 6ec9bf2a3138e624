//! Scroll-driven view state.
//!
//! Everything the page derives from the scroll position lives here as plain
//! data so it can be computed and tested without a browser. The DOM glue in
//! [`crate::dom`] samples the window, feeds [`ViewStateSynchronizer::sync`]
//! and writes back only what changed.

use std::collections::BTreeMap;

use crate::config::{
    ACTIVE_SECTION_PROBE_OFFSET, DEFAULT_PARALLAX_SPEED, HEADER_SCROLL_THRESHOLD,
};

/// One reading of the viewport, taken per scroll tick or animation frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollSample {
    pub scroll_top: f64,
    pub viewport_height: f64,
    pub document_height: f64,
    pub timestamp: f64,
}

/// Layout of a `section[id]`, captured at measurement time.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionGeometry {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

impl SectionGeometry {
    pub fn new(id: impl Into<String>, top: f64, height: f64) -> Self {
        Self { id: id.into(), top, height }
    }

    /// Half-open `[top, top + height)`.
    pub fn contains(&self, y: f64) -> bool {
        y >= self.top && y < self.top + self.height
    }
}

/// An element that moves against the scroll. `speed` falls back to
/// [`DEFAULT_PARALLAX_SPEED`] when the element declares none.
#[derive(Debug, Clone, PartialEq)]
pub struct ParallaxLayer {
    pub element_id: String,
    pub speed: Option<f64>,
}

impl ParallaxLayer {
    pub fn new(element_id: impl Into<String>, speed: Option<f64>) -> Self {
        Self { element_id: element_id.into(), speed }
    }

    pub fn offset(&self, scroll_top: f64) -> f64 {
        -(scroll_top * self.speed.unwrap_or(DEFAULT_PARALLAX_SPEED))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub is_header_scrolled: bool,
    pub active_section_id: Option<String>,
    pub scroll_progress: f64,
    pub parallax_offsets: BTreeMap<String, f64>,
}

impl ViewState {
    pub fn parallax_offset(&self, element_id: &str) -> f64 {
        self.parallax_offsets.get(element_id).copied().unwrap_or(0.0)
    }
}

/// Which parts of the view state moved during the last sync.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewUpdate {
    pub header_changed: bool,
    pub active_changed: bool,
    pub progress_changed: bool,
    pub parallax_changed: bool,
}

impl ViewUpdate {
    pub fn between(previous: &ViewState, next: &ViewState) -> Self {
        Self {
            header_changed: previous.is_header_scrolled != next.is_header_scrolled,
            active_changed: previous.active_section_id != next.active_section_id,
            progress_changed: previous.scroll_progress != next.scroll_progress,
            parallax_changed: previous.parallax_offsets != next.parallax_offsets,
        }
    }

    pub fn any(&self) -> bool {
        self.header_changed || self.active_changed || self.progress_changed || self.parallax_changed
    }
}

pub fn is_header_scrolled(scroll_top: f64) -> bool {
    scroll_top > HEADER_SCROLL_THRESHOLD
}

/// Fraction of the scrollable distance covered, clamped to `[0, 1]`. The
/// denominator never drops below 1 so short documents do not divide by zero.
pub fn scroll_progress(sample: &ScrollSample) -> f64 {
    let scrollable = (sample.document_height - sample.viewport_height).max(1.0);
    (sample.scroll_top / scrollable).clamp(0.0, 1.0)
}

/// First section, in document order, containing the probe line.
pub fn section_at(sections: &[SectionGeometry], probe: f64) -> Option<&SectionGeometry> {
    sections.iter().find(|section| section.contains(probe))
}

/// Derives the full view state for one sample.
///
/// When no section contains the probe line the previous active section is
/// kept, so the nav highlight does not flicker off between sections.
pub fn compute_view_state(
    sample: &ScrollSample,
    sections: &[SectionGeometry],
    header_height: f64,
    layers: &[ParallaxLayer],
    previous_active: Option<&str>,
) -> ViewState {
    let probe = sample.scroll_top + header_height + ACTIVE_SECTION_PROBE_OFFSET;
    let active_section_id = section_at(sections, probe)
        .map(|section| section.id.clone())
        .or_else(|| previous_active.map(str::to_owned));

    ViewState {
        is_header_scrolled: is_header_scrolled(sample.scroll_top),
        active_section_id,
        scroll_progress: scroll_progress(sample),
        parallax_offsets: layers
            .iter()
            .map(|layer| (layer.element_id.clone(), layer.offset(sample.scroll_top)))
            .collect(),
    }
}

/// Long-lived holder of the view state and the cached section geometry.
///
/// Each sync replaces the state wholesale; the only thing carried between
/// samples is the previous state, used to report what changed and to keep
/// the active section. Geometry is measured lazily: a resize invalidates it and the
/// caller re-measures before the next sample.
#[derive(Debug, Default)]
pub struct ViewStateSynchronizer {
    layers: Vec<ParallaxLayer>,
    sections: Option<Vec<SectionGeometry>>,
    state: ViewState,
}

impl ViewStateSynchronizer {
    pub fn new(layers: Vec<ParallaxLayer>) -> Self {
        Self {
            layers,
            sections: None,
            state: ViewState::default(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn needs_measurement(&self) -> bool {
        self.sections.is_none()
    }

    pub fn invalidate_geometry(&mut self) {
        self.sections = None;
    }

    pub fn set_geometry(&mut self, sections: Vec<SectionGeometry>) {
        self.sections = Some(sections);
    }

    /// Marks a section active ahead of the scroll that will reach it.
    pub fn set_active(&mut self, section_id: &str) -> bool {
        if self.state.active_section_id.as_deref() == Some(section_id) {
            return false;
        }
        self.state.active_section_id = Some(section_id.to_owned());
        true
    }

    pub fn sync(&mut self, sample: &ScrollSample, header_height: f64) -> ViewUpdate {
        let next = compute_view_state(
            sample,
            self.sections.as_deref().unwrap_or(&[]),
            header_height,
            &self.layers,
            self.state.active_section_id.as_deref(),
        );
        let update = ViewUpdate::between(&self.state, &next);
        self.state = next;
        update
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(scroll_top: f64) -> ScrollSample {
        ScrollSample {
            scroll_top,
            viewport_height: 800.0,
            document_height: 3000.0,
            timestamp: 0.0,
        }
    }

    fn two_sections() -> Vec<SectionGeometry> {
        vec![
            SectionGeometry::new("a", 0.0, 100.0),
            SectionGeometry::new("b", 100.0, 200.0),
        ]
    }

    #[test]
    fn header_threshold_is_exclusive() {
        assert!(!is_header_scrolled(0.0));
        assert!(!is_header_scrolled(50.0));
        assert!(is_header_scrolled(51.0));
        assert!(is_header_scrolled(50.5));
    }

    #[test]
    fn progress_is_zero_at_or_above_the_top() {
        assert_eq!(scroll_progress(&sample(0.0)), 0.0);
        assert_eq!(scroll_progress(&sample(-40.0)), 0.0);
    }

    #[test]
    fn progress_is_one_at_or_past_the_bottom() {
        assert_eq!(scroll_progress(&sample(2200.0)), 1.0);
        assert_eq!(scroll_progress(&sample(2500.0)), 1.0);
        assert_eq!(scroll_progress(&sample(1100.0)), 0.5);
    }

    #[test]
    fn progress_never_decreases_as_scroll_grows() {
        let mut last = 0.0;
        for step in 0..300 {
            let progress = scroll_progress(&sample(step as f64 * 10.0));
            assert!(progress >= last);
            last = progress;
        }
    }

    #[test]
    fn short_documents_do_not_divide_by_zero() {
        let short = ScrollSample {
            scroll_top: 0.0,
            viewport_height: 900.0,
            document_height: 600.0,
            timestamp: 0.0,
        };
        assert_eq!(scroll_progress(&short), 0.0);
        let flush = ScrollSample { scroll_top: 1.0, document_height: 900.0, ..short };
        assert_eq!(scroll_progress(&flush), 1.0);
    }

    #[test]
    fn probe_selects_the_section_below_the_header() {
        let state = compute_view_state(&sample(5.0), &two_sections(), 0.0, &[], None);
        assert_eq!(state.active_section_id.as_deref(), Some("b"));
    }

    #[test]
    fn header_height_pushes_the_probe_down() {
        let sections = two_sections();
        let state = compute_view_state(&sample(0.0), &sections, 0.0, &[], None);
        assert_eq!(state.active_section_id.as_deref(), Some("b"));

        let sections = vec![
            SectionGeometry::new("hero", 0.0, 150.0),
            SectionGeometry::new("features", 150.0, 500.0),
        ];
        let state = compute_view_state(&sample(0.0), &sections, 60.0, &[], None);
        assert_eq!(state.active_section_id.as_deref(), Some("features"));
    }

    #[test]
    fn overlapping_sections_resolve_to_document_order() {
        let sections = vec![
            SectionGeometry::new("first", 0.0, 500.0),
            SectionGeometry::new("second", 50.0, 500.0),
        ];
        let state = compute_view_state(&sample(0.0), &sections, 0.0, &[], None);
        assert_eq!(state.active_section_id.as_deref(), Some("first"));
    }

    #[test]
    fn gap_between_sections_keeps_previous_active() {
        let sections = vec![
            SectionGeometry::new("a", 0.0, 100.0),
            SectionGeometry::new("c", 1000.0, 100.0),
        ];
        let state = compute_view_state(&sample(400.0), &sections, 0.0, &[], Some("a"));
        assert_eq!(state.active_section_id.as_deref(), Some("a"));

        let state = compute_view_state(&sample(400.0), &sections, 0.0, &[], None);
        assert_eq!(state.active_section_id, None);
    }

    #[test]
    fn parallax_uses_declared_or_default_speed() {
        let layers = vec![
            ParallaxLayer::new("hero-content", None),
            ParallaxLayer::new("orb", Some(0.2)),
        ];
        let state = compute_view_state(&sample(100.0), &[], 0.0, &layers, None);
        assert_eq!(state.parallax_offset("hero-content"), -50.0);
        assert_eq!(state.parallax_offset("orb"), -20.0);
        assert_eq!(state.parallax_offset("missing"), 0.0);
    }

    #[test]
    fn identical_samples_give_identical_state() {
        let layers = vec![ParallaxLayer::new("hero-content", Some(0.35))];
        let first = compute_view_state(&sample(733.3), &two_sections(), 72.0, &layers, None);
        let second = compute_view_state(&sample(733.3), &two_sections(), 72.0, &layers, None);
        assert_eq!(first, second);
        assert_eq!(
            first.scroll_progress.to_bits(),
            second.scroll_progress.to_bits()
        );
    }

    #[test]
    fn sync_reports_only_what_changed() {
        let mut sync = ViewStateSynchronizer::new(vec![ParallaxLayer::new("hero-content", None)]);
        sync.set_geometry(two_sections());

        let first = sync.sync(&sample(60.0), 0.0);
        assert!(first.header_changed);
        assert!(first.progress_changed);
        assert!(first.parallax_changed);

        let repeat = sync.sync(&sample(60.0), 0.0);
        assert!(!repeat.any());

        let back_up = sync.sync(&sample(10.0), 0.0);
        assert!(back_up.header_changed);
        assert!(!sync.state().is_header_scrolled);
    }

    #[test]
    fn sync_agrees_with_compute_view_state() {
        let layers = vec![ParallaxLayer::new("hero-content", Some(0.3))];
        let mut sync = ViewStateSynchronizer::new(layers.clone());
        sync.set_geometry(two_sections());
        sync.sync(&sample(150.0), 20.0);

        let expected = compute_view_state(&sample(150.0), &two_sections(), 20.0, &layers, None);
        assert_eq!(sync.state(), &expected);
        assert_eq!(ViewUpdate::between(&expected, sync.state()), ViewUpdate::default());
    }

    #[test]
    fn sync_overwrites_instead_of_growing() {
        let mut sync = ViewStateSynchronizer::new(vec![
            ParallaxLayer::new("hero-content", None),
            ParallaxLayer::new("orb", Some(0.1)),
        ]);
        for step in 0..1000 {
            sync.sync(&sample(step as f64), 0.0);
        }
        assert_eq!(sync.state().parallax_offsets.len(), 2);
    }

    #[test]
    fn invalidated_geometry_keeps_previous_active_until_remeasured() {
        let mut sync = ViewStateSynchronizer::default();
        sync.set_geometry(two_sections());
        sync.sync(&sample(5.0), 0.0);
        assert_eq!(sync.state().active_section_id.as_deref(), Some("b"));

        sync.invalidate_geometry();
        assert!(sync.needs_measurement());
        let update = sync.sync(&sample(5.0), 0.0);
        assert!(!update.active_changed);
        assert_eq!(sync.state().active_section_id.as_deref(), Some("b"));

        sync.set_geometry(vec![SectionGeometry::new("z", 0.0, 1000.0)]);
        assert!(!sync.needs_measurement());
        assert!(sync.sync(&sample(5.0), 0.0).active_changed);
        assert_eq!(sync.state().active_section_id.as_deref(), Some("z"));
    }

    #[test]
    fn set_active_is_idempotent() {
        let mut sync = ViewStateSynchronizer::default();
        assert!(sync.set_active("pricing"));
        assert!(!sync.set_active("pricing"));
        assert_eq!(sync.state().active_section_id.as_deref(), Some("pricing"));
    }
}
