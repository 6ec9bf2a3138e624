//! Browser glue for the landing page.
//!
//! [`PageContext`] is built once when the landing page mounts and handed to
//! every handler. It owns the DOM handles, the view-state synchronizer, the
//! animated-element set and the rate limiters; the pure logic lives in
//! `view_state`, `timing` and `animation`.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use gloo_timers::callback::Timeout;
use log::{debug, error, info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::js_sys::{Array, Reflect};
use web_sys::{
    Document, Element, Event, EventTarget, HtmlElement, HtmlImageElement, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit, KeyboardEvent, Node, Window,
};
use yew::Callback;

use crate::animation::{
    format_thousands, is_in_viewport, AnimatedElementSet, CounterAnimation, ElementRect,
    SmoothScroll, Viewport,
};
use crate::config::{
    ANCHOR_SCROLL_EXTRA_OFFSET, MOBILE_BREAKPOINT, RESIZE_DEBOUNCE_MS, REVEAL_ROOT_MARGIN,
    REVEAL_THRESHOLD, SCROLL_THROTTLE_MS,
};
use crate::error::AppError;
use crate::timing::{Debounce, Throttle, ThrottleDecision};
use crate::view_state::{ParallaxLayer, ScrollSample, SectionGeometry, ViewState, ViewStateSynchronizer};

const REVEAL_SELECTOR: &str = "[data-reveal]";
const REVEALED_CLASS: &str = "revealed";

type ObserverCallback = Closure<dyn FnMut(Array, IntersectionObserver)>;

/// Event listener that unregisters itself when dropped.
pub struct EventListener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl EventListener {
    pub fn new<F>(target: &EventTarget, event: &'static str, handler: F) -> Result<Self, AppError>
    where
        F: FnMut(Event) + 'static,
    {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            event,
            callback,
        })
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}

pub fn window() -> Result<Window, AppError> {
    web_sys::window().ok_or(AppError::EnvironmentUnsupported("window"))
}

pub fn supports(window: &Window, capability: &'static str) -> bool {
    Reflect::has(window, &JsValue::from_str(capability)).unwrap_or(false)
}

fn request_frame<F>(window: &Window, frame: F) -> Result<i32, AppError>
where
    F: FnOnce(f64) + 'static,
{
    let callback = Closure::once_into_js(move |now: f64| frame(now));
    Ok(window.request_animation_frame(callback.unchecked_ref())?)
}

fn millis(ms: f64) -> u32 {
    ms.max(0.0).ceil() as u32
}

/// Adds or removes `scroll-locked` on `<body>` while an overlay is open.
pub fn set_scroll_locked(locked: bool) -> Result<(), AppError> {
    let body = window()?
        .document()
        .and_then(|document| document.body())
        .ok_or_else(|| AppError::MissingElement("body".into()))?;
    let classes = body.class_list();
    if locked {
        classes.add_1("scroll-locked")?;
    } else {
        classes.remove_1("scroll-locked")?;
    }
    Ok(())
}

/// Opens `url` in a new tab without giving it a handle back to this page.
pub fn open_external(url: &str) -> Result<(), AppError> {
    info!("Opening checkout: {}", url);
    window()?.open_with_url_and_target_and_features(url, "_blank", "noopener")?;
    Ok(())
}

pub struct PageContext {
    window: Window,
    document: Document,
    synchronizer: RefCell<ViewStateSynchronizer>,
    animated: RefCell<AnimatedElementSet>,
    scroll_throttle: RefCell<Throttle>,
    resize_debounce: RefCell<Debounce>,
    trailing_scroll: RefCell<Option<Timeout>>,
    resize_timer: RefCell<Option<Timeout>>,
    reveal_observer: RefCell<Option<(IntersectionObserver, ObserverCallback)>>,
    image_observer: RefCell<Option<(IntersectionObserver, ObserverCallback)>>,
    scroll_generation: Cell<u32>,
    on_view_state: Callback<ViewState>,
    on_close_menu: Callback<()>,
}

impl PageContext {
    pub fn new(
        layers: Vec<ParallaxLayer>,
        on_view_state: Callback<ViewState>,
        on_close_menu: Callback<()>,
    ) -> Result<Rc<Self>, AppError> {
        let window = window()?;
        let document = window
            .document()
            .ok_or(AppError::EnvironmentUnsupported("document"))?;
        if !supports(&window, "requestAnimationFrame") || !supports(&window, "IntersectionObserver") {
            warn!("Some features may not work in this browser");
        }
        Ok(Rc::new(Self {
            window,
            document,
            synchronizer: RefCell::new(ViewStateSynchronizer::new(layers)),
            animated: RefCell::new(AnimatedElementSet::default()),
            scroll_throttle: RefCell::new(Throttle::new(SCROLL_THROTTLE_MS)),
            resize_debounce: RefCell::new(Debounce::new(RESIZE_DEBOUNCE_MS)),
            trailing_scroll: RefCell::new(None),
            resize_timer: RefCell::new(None),
            reveal_observer: RefCell::new(None),
            image_observer: RefCell::new(None),
            scroll_generation: Cell::new(0),
            on_view_state,
            on_close_menu,
        }))
    }

    fn now(&self) -> f64 {
        self.window.performance().map(|p| p.now()).unwrap_or(0.0)
    }

    fn select_all(&self, selector: &str) -> Result<Vec<Element>, AppError> {
        let nodes = self.document.query_selector_all(selector)?;
        Ok((0..nodes.length())
            .filter_map(|i| nodes.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect())
    }

    fn header(&self) -> Option<HtmlElement> {
        self.document
            .query_selector(".header")
            .ok()
            .flatten()
            .and_then(|element| element.dyn_into::<HtmlElement>().ok())
    }

    fn header_height(&self) -> f64 {
        self.header().map(|header| header.offset_height() as f64).unwrap_or(0.0)
    }

    fn viewport(&self) -> Result<Viewport, AppError> {
        Ok(Viewport {
            width: self.window.inner_width()?.as_f64().unwrap_or(0.0),
            height: self.window.inner_height()?.as_f64().unwrap_or(0.0),
        })
    }

    fn sample(&self) -> Result<ScrollSample, AppError> {
        let document_height = self
            .document
            .body()
            .map(|body| body.scroll_height() as f64)
            .unwrap_or(0.0);
        Ok(ScrollSample {
            scroll_top: self.window.scroll_y()?,
            viewport_height: self.viewport()?.height,
            document_height,
            timestamp: self.now(),
        })
    }

    fn measure_sections(&self) -> Result<Vec<SectionGeometry>, AppError> {
        Ok(self
            .select_all("section[id]")?
            .into_iter()
            .filter_map(|element| element.dyn_into::<HtmlElement>().ok())
            .map(|section| {
                SectionGeometry::new(
                    section.id(),
                    section.offset_top() as f64,
                    section.offset_height() as f64,
                )
            })
            .collect())
    }

    /// Samples the viewport and pushes whatever changed to the page.
    pub fn sync_view(&self) -> Result<(), AppError> {
        if self.synchronizer.borrow().needs_measurement() {
            let sections = self.measure_sections()?;
            debug!("Measured {} sections", sections.len());
            self.synchronizer.borrow_mut().set_geometry(sections);
        }

        let sample = self.sample()?;
        let header_height = self.header_height();
        let (update, state) = {
            let mut synchronizer = self.synchronizer.borrow_mut();
            let update = synchronizer.sync(&sample, header_height);
            (update, update.any().then(|| synchronizer.state().clone()))
        };

        if update.progress_changed {
            if let Some(root) = self
                .document
                .document_element()
                .and_then(|root| root.dyn_into::<HtmlElement>().ok())
            {
                if let Some(state) = &state {
                    root.style()
                        .set_property("--scroll-progress", &state.scroll_progress.to_string())?;
                }
            }
        }
        if let Some(state) = state {
            self.on_view_state.emit(state);
        }

        if self.reveal_observer.borrow().is_none() {
            self.reveal_in_viewport()?;
        }
        Ok(())
    }

    fn on_scroll(self: &Rc<Self>) {
        let decision = self.scroll_throttle.borrow_mut().hit(self.now());
        match decision {
            ThrottleDecision::RunNow => {
                if let Err(e) = self.sync_view() {
                    error!("Scroll sync failed: {}", e);
                }
            }
            ThrottleDecision::Defer(wait) => {
                let context = Rc::downgrade(self);
                let timeout = Timeout::new(millis(wait), move || {
                    if let Some(context) = context.upgrade() {
                        context.scroll_throttle.borrow_mut().fire_trailing(context.now());
                        if let Err(e) = context.sync_view() {
                            error!("Scroll sync failed: {}", e);
                        }
                    }
                });
                *self.trailing_scroll.borrow_mut() = Some(timeout);
            }
            ThrottleDecision::Skip => {}
        }
    }

    fn on_resize(self: &Rc<Self>) {
        let mut debounce = self.resize_debounce.borrow_mut();
        if !debounce.is_pending() {
            debug!("Resize started, waiting for it to settle");
        }
        debounce.input(self.now());
        drop(debounce);
        self.schedule_resize(RESIZE_DEBOUNCE_MS);
    }

    fn schedule_resize(self: &Rc<Self>, wait: f64) {
        let context = Rc::downgrade(self);
        let timeout = Timeout::new(millis(wait), move || {
            let Some(context) = context.upgrade() else { return };
            let now = context.now();
            let quiet = context.resize_debounce.borrow_mut().poll(now);
            if quiet {
                if let Err(e) = context.handle_resize() {
                    error!("Resize recalculation failed: {}", e);
                }
            } else if let Some(remaining) = context.resize_debounce.borrow().remaining(now) {
                context.schedule_resize(remaining);
            }
        });
        // Replacing the handle cancels the previous timer.
        *self.resize_timer.borrow_mut() = Some(timeout);
    }

    fn handle_resize(&self) -> Result<(), AppError> {
        let viewport = self.viewport()?;
        debug!("Recalculating layout for {}x{}", viewport.width, viewport.height);
        if viewport.width > MOBILE_BREAKPOINT {
            self.on_close_menu.emit(());
        }
        self.synchronizer.borrow_mut().invalidate_geometry();
        self.recalculate_animations()?;
        self.sync_view()
    }

    fn recalculate_animations(&self) -> Result<(), AppError> {
        let mut animated = self.animated.borrow_mut();
        if !animated.is_empty() {
            debug!("Resetting {} entrance animations", animated.len());
        }
        animated.clear();
        drop(animated);
        let targets = self.select_all(REVEAL_SELECTOR)?;
        for element in &targets {
            element.class_list().remove_1(REVEALED_CLASS)?;
        }
        // Re-observing makes the observer report every target afresh.
        if let Some((observer, _)) = self.reveal_observer.borrow().as_ref() {
            observer.disconnect();
            for element in &targets {
                observer.observe(element);
            }
        }
        Ok(())
    }

    fn reveal(&self, element: &Element) {
        let Some(key) = element.get_attribute("data-reveal") else { return };
        if !self.animated.borrow_mut().insert(&key) {
            return;
        }
        if let Err(e) = element.class_list().add_1(REVEALED_CLASS) {
            error!("Failed to reveal {}: {:?}", key, e);
            return;
        }
        if let Some(target) = element
            .get_attribute("data-counter")
            .and_then(|raw| raw.replace(',', "").trim().parse::<i64>().ok())
        {
            run_counter(
                self.window.clone(),
                element.clone(),
                CounterAnimation::new(target, self.now()),
            );
        }
    }

    /// Reveal path for browsers without `IntersectionObserver`.
    fn reveal_in_viewport(&self) -> Result<(), AppError> {
        let viewport = self.viewport()?;
        for element in self.select_all(REVEAL_SELECTOR)? {
            let rect = element.get_bounding_client_rect();
            let rect = ElementRect {
                top: rect.top(),
                bottom: rect.bottom(),
                left: rect.left(),
                right: rect.right(),
            };
            if is_in_viewport(&rect, &viewport, REVEAL_THRESHOLD) {
                self.reveal(&element);
            }
        }
        Ok(())
    }

    /// Smooth-scrolls so the section sits just below the fixed header and
    /// highlights its nav link right away.
    pub fn scroll_to_section(self: &Rc<Self>, section_id: &str) -> Result<(), AppError> {
        let section = self
            .document
            .get_element_by_id(section_id)
            .and_then(|element| element.dyn_into::<HtmlElement>().ok())
            .ok_or_else(|| AppError::MissingElement(format!("#{}", section_id)))?;

        let target = section.offset_top() as f64 - (self.header_height() + ANCHOR_SCROLL_EXTRA_OFFSET);
        let scroll = SmoothScroll::new(self.window.scroll_y()?, target);
        debug!("Scrolling to #{} over {}ms", section_id, scroll.duration());
        let generation = self.scroll_generation.get().wrapping_add(1);
        self.scroll_generation.set(generation);
        run_smooth_scroll(Rc::downgrade(self), scroll, generation, None);

        let changed = self.synchronizer.borrow_mut().set_active(section_id);
        if changed {
            let state = self.synchronizer.borrow().state().clone();
            self.on_view_state.emit(state);
        }
        Ok(())
    }

    pub fn install_scroll_sync(self: &Rc<Self>) -> Result<Vec<EventListener>, AppError> {
        let on_scroll = {
            let context = self.clone();
            EventListener::new(&self.window, "scroll", move |_| context.on_scroll())?
        };
        let on_resize = {
            let context = self.clone();
            EventListener::new(&self.window, "resize", move |_| context.on_resize())?
        };
        self.sync_view()?;
        Ok(vec![on_scroll, on_resize])
    }

    pub fn install_reveal(self: &Rc<Self>) -> Result<(), AppError> {
        if !supports(&self.window, "IntersectionObserver") {
            // sync_view falls back to rectangle checks on every scroll tick.
            self.reveal_in_viewport()?;
            return Err(AppError::EnvironmentUnsupported("IntersectionObserver"));
        }

        let context = Rc::downgrade(self);
        let callback: ObserverCallback = Closure::wrap(Box::new(
            move |entries: Array, _observer: IntersectionObserver| {
                let Some(context) = context.upgrade() else { return };
                for entry in entries.iter() {
                    let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else { continue };
                    if entry.is_intersecting() {
                        context.reveal(&entry.target());
                    }
                }
            },
        ) as Box<dyn FnMut(Array, IntersectionObserver)>);

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(REVEAL_THRESHOLD));
        init.set_root_margin(REVEAL_ROOT_MARGIN);
        let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;

        let targets = self.select_all(REVEAL_SELECTOR)?;
        for element in &targets {
            observer.observe(element);
        }
        debug!("Observing {} reveal targets", targets.len());
        *self.reveal_observer.borrow_mut() = Some((observer, callback));
        Ok(())
    }

    pub fn install_lazy_images(&self) -> Result<(), AppError> {
        let images = self.select_all("img[data-src]")?;
        if !supports(&self.window, "IntersectionObserver") {
            images.iter().for_each(load_image);
            return Ok(());
        }

        let callback: ObserverCallback = Closure::wrap(Box::new(
            move |entries: Array, observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else { continue };
                    if entry.is_intersecting() {
                        let image = entry.target();
                        load_image(&image);
                        observer.unobserve(&image);
                    }
                }
            },
        ) as Box<dyn FnMut(Array, IntersectionObserver)>);
        let observer = IntersectionObserver::new(callback.as_ref().unchecked_ref())?;
        for image in &images {
            observer.observe(image);
        }
        *self.image_observer.borrow_mut() = Some((observer, callback));
        Ok(())
    }

    /// Shows focus rings only while the visitor is tabbing around.
    pub fn install_keyboard_navigation(&self) -> Result<Vec<EventListener>, AppError> {
        let body = self
            .document
            .body()
            .ok_or_else(|| AppError::MissingElement("body".into()))?;
        let on_keydown = {
            let body = body.clone();
            EventListener::new(&self.document, "keydown", move |event| {
                let is_tab = event
                    .dyn_ref::<KeyboardEvent>()
                    .map_or(false, |event| event.key() == "Tab");
                if is_tab {
                    let _ = body.class_list().add_1("keyboard-navigation");
                }
            })?
        };
        let on_mousedown = EventListener::new(&self.document, "mousedown", move |_| {
            let _ = body.class_list().remove_1("keyboard-navigation");
        })?;
        Ok(vec![on_keydown, on_mousedown])
    }

    /// Closes the mobile menu on any click outside the header.
    pub fn install_outside_click(self: &Rc<Self>) -> Result<EventListener, AppError> {
        if self.header().is_none() {
            return Err(AppError::MissingElement(".header".into()));
        }
        let context = self.clone();
        EventListener::new(&self.document, "click", move |event| {
            let Some(header) = context.header() else { return };
            let target = event.target().and_then(|target| target.dyn_into::<Node>().ok());
            if !header.contains(target.as_ref()) {
                context.on_close_menu.emit(());
            }
        })
    }

    /// Cancels timers and observers so nothing outlives the page.
    pub fn teardown(&self) {
        self.trailing_scroll.borrow_mut().take();
        self.resize_timer.borrow_mut().take();
        if let Some((observer, _)) = self.reveal_observer.borrow_mut().take() {
            observer.disconnect();
        }
        if let Some((observer, _)) = self.image_observer.borrow_mut().take() {
            observer.disconnect();
        }
        self.scroll_generation.set(self.scroll_generation.get().wrapping_add(1));
    }
}

fn load_image(image: &Element) {
    let Some(src) = image.get_attribute("data-src") else { return };
    if let Some(image) = image.dyn_ref::<HtmlImageElement>() {
        image.set_src(&src);
        let _ = image.remove_attribute("data-src");
        let _ = image.class_list().remove_1("lazy");
    }
}

fn run_counter(window: Window, element: Element, counter: CounterAnimation) {
    let next_window = window.clone();
    let scheduled = request_frame(&window, move |now| {
        if !element.is_connected() {
            debug!("Counter element detached, stopping");
            return;
        }
        let frame = counter.frame(now);
        element.set_text_content(Some(&format_thousands(frame.value)));
        if !frame.done {
            run_counter(next_window, element, counter);
        }
    });
    if let Err(e) = scheduled {
        error!("Failed to schedule counter frame: {}", e);
    }
}

fn run_smooth_scroll(
    context: Weak<PageContext>,
    scroll: SmoothScroll,
    generation: u32,
    started_at: Option<f64>,
) {
    let Some(page) = context.upgrade() else { return };
    let scheduled = request_frame(&page.window, move |now| {
        let Some(page) = context.upgrade() else { return };
        // A newer scroll request or teardown supersedes this one.
        if page.scroll_generation.get() != generation {
            return;
        }
        let started_at = started_at.unwrap_or(now);
        let elapsed = now - started_at;
        page.window.scroll_to_with_x_and_y(0.0, scroll.position_at(elapsed));
        if !scroll.is_finished(elapsed) {
            run_smooth_scroll(context, scroll, generation, Some(started_at));
        }
    });
    if let Err(e) = scheduled {
        error!("Failed to schedule scroll frame: {}", e);
    }
}
