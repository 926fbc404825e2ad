use crate::{
    counter::{CounterDriver, CounterSpec},
    delay::{Debounced, HoverIntent, HoverTransition},
    latch::{deliver, Disconnect, InViewOptions, IntersectionLatch, ObservationGuard},
    logging::{log_event, LogLevel},
    navigate::{navigate_to_section, ScrollHost},
    pointer::{element_relative, viewport_fraction, PointerPosition},
    scroll::{
        is_past_threshold, parallax_offset, scroll_progress, ActiveSectionTracker, SectionBounds,
    },
    storage::{LocalStore, PersistedValue},
    typing::TypingState,
    viewport::{viewport_size, ViewportSize},
};
use gloo_events::{EventListener, EventListenerOptions, EventListenerPhase};
use gloo_render::{request_animation_frame, AnimationFrame};
use gloo_timers::callback::{Interval, Timeout};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::json;
use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{
    window, Element, Event, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, MouseEvent, ScrollBehavior, ScrollToOptions, Window,
};
use yew::prelude::*;

fn window_listener<F>(event_type: &'static str, callback: F) -> Option<EventListener>
where
    F: FnMut(&Event) + 'static,
{
    let win = window()?;
    Some(EventListener::new_with_options(
        &win,
        event_type,
        EventListenerOptions {
            phase: EventListenerPhase::Bubble,
            passive: true,
        },
        callback,
    ))
}

fn scroll_y() -> f64 {
    window().and_then(|w| w.scroll_y().ok()).unwrap_or(0.0)
}

fn document_scroll_height() -> f64 {
    window()
        .and_then(|w| w.document())
        .and_then(|d| d.document_element())
        .map(|root| f64::from(root.scroll_height()))
        .unwrap_or(0.0)
}

fn current_scroll_progress() -> f64 {
    scroll_progress(scroll_y(), document_scroll_height(), viewport_size().height)
}

fn section_bounds(section_id: &str) -> Option<SectionBounds> {
    let rect = window()?
        .document()?
        .get_element_by_id(section_id)?
        .get_bounding_client_rect();

    Some(SectionBounds {
        top: rect.top(),
        bottom: rect.bottom(),
    })
}

impl Disconnect for IntersectionObserver {
    fn disconnect(&self) {
        IntersectionObserver::disconnect(self);
    }
}

struct InViewObservation {
    _guard: ObservationGuard<IntersectionObserver>,
    _callback: Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>,
}

fn observe_once(
    node: &NodeRef,
    options: &InViewOptions,
    latch: Rc<RefCell<IntersectionLatch>>,
    in_view: UseStateHandle<bool>,
) -> Option<InViewObservation> {
    let element = node.cast::<Element>()?;
    if !latch.borrow_mut().attach() {
        return None;
    }

    let callback = {
        let latch = latch.clone();
        Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
            move |entries: js_sys::Array, observer: IntersectionObserver| {
                let intersecting = entries
                    .iter()
                    .filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
                    .any(|entry| entry.is_intersecting());

                if deliver(&latch, &observer, intersecting) {
                    in_view.set(true);
                }
            },
        )
    };

    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(options.threshold()));
    init.set_root_margin(&options.root_margin().to_css());

    let observer =
        match IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init) {
            Ok(observer) => observer,
            Err(_) => {
                latch.borrow_mut().detach();
                log_event(
                    LogLevel::Warn,
                    "intersection_observer_unavailable",
                    json!({ "rootMargin": options.root_margin().to_css() }),
                );
                return None;
            }
        };
    observer.observe(&element);

    Some(InViewObservation {
        _guard: ObservationGuard::new(observer, latch),
        _callback: callback,
    })
}

/// Returns a ref to attach and a flag that turns `true` the first time the
/// element intersects the viewport, and stays `true`.
#[hook]
pub fn use_in_view(options: InViewOptions) -> (NodeRef, bool) {
    let node = use_node_ref();
    let in_view = use_state_eq(|| false);
    let latch = use_mut_ref(IntersectionLatch::new);

    {
        let node = node.clone();
        let in_view = in_view.clone();
        use_effect_with(options, move |options| {
            let observation = observe_once(&node, options, latch, in_view);
            move || drop(observation)
        });
    }

    (node, *in_view)
}

#[hook]
pub fn use_scrolled(threshold: f64) -> bool {
    let scrolled = use_state_eq(|| is_past_threshold(scroll_y(), threshold));

    {
        let scrolled = scrolled.clone();
        use_effect_with(threshold, move |threshold| {
            let threshold = *threshold;
            let listener = window_listener("scroll", move |_| {
                scrolled.set(is_past_threshold(scroll_y(), threshold));
            });
            move || drop(listener)
        });
    }

    *scrolled
}

#[hook]
pub fn use_active_section(
    sections: &'static [&'static str],
    reference_offset: f64,
) -> Option<AttrValue> {
    let active = use_state_eq(|| sections.first().map(|section| AttrValue::from(*section)));

    {
        let active = active.clone();
        use_effect_with(
            (sections, reference_offset),
            move |(sections, reference_offset)| {
                let mut tracker =
                    ActiveSectionTracker::new(sections.iter().copied(), *reference_offset);
                if let Some(current) = (*active).as_ref() {
                    tracker = tracker.with_initial(current.as_str());
                }

                let listener = window_listener("scroll", move |_| {
                    if tracker.update(section_bounds) {
                        active.set(tracker.active().map(|id| AttrValue::from(id.to_string())));
                    }
                });
                move || drop(listener)
            },
        );
    }

    (*active).clone()
}

#[hook]
pub fn use_scroll_progress() -> f64 {
    let progress = use_state_eq(current_scroll_progress);

    {
        let progress = progress.clone();
        use_effect_with((), move |_| {
            let listener = window_listener("scroll", move |_| {
                progress.set(current_scroll_progress());
            });
            move || drop(listener)
        });
    }

    *progress
}

#[hook]
pub fn use_parallax(speed: f64) -> (NodeRef, f64) {
    let node = use_node_ref();
    let offset = use_state_eq(|| 0.0);

    {
        let node = node.clone();
        let offset = offset.clone();
        use_effect_with(speed, move |speed| {
            let speed = *speed;
            let listener = window_listener("scroll", move |_| {
                let Some(element) = node.cast::<Element>() else {
                    return;
                };
                let top = element.get_bounding_client_rect().top();
                offset.set(parallax_offset(top, speed));
            });
            move || drop(listener)
        });
    }

    (node, *offset)
}

#[derive(Clone, PartialEq)]
pub enum PointerOrigin {
    Viewport,
    Element(NodeRef),
}

#[hook]
pub fn use_pointer(origin: PointerOrigin) -> PointerPosition {
    let position = use_state_eq(PointerPosition::default);

    {
        let position = position.clone();
        use_effect_with(origin, move |origin| {
            let origin = origin.clone();
            let listener = window_listener("mousemove", move |event| {
                let Some(event) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                let client_x = f64::from(event.client_x());
                let client_y = f64::from(event.client_y());

                let next = match &origin {
                    PointerOrigin::Viewport => {
                        let size = viewport_size();
                        viewport_fraction(client_x, client_y, size.width, size.height)
                    }
                    PointerOrigin::Element(node) => {
                        let Some(element) = node.cast::<Element>() else {
                            return;
                        };
                        let rect = element.get_bounding_client_rect();
                        element_relative(client_x, client_y, rect.left(), rect.top())
                    }
                };
                position.set(next);
            });
            move || drop(listener)
        });
    }

    *position
}

type FrameDriver = CounterDriver<AnimationFrame>;
type CountSink = Rc<dyn Fn(i64)>;

fn pump_frames(driver: &Rc<RefCell<FrameDriver>>, sink: &CountSink) {
    let mut inner = driver.borrow_mut();
    if !inner.take_frame_request() {
        return;
    }

    let weak = Rc::downgrade(driver);
    let sink = sink.clone();
    inner.arm(request_animation_frame(move |timestamp| {
        on_counter_frame(&weak, &sink, timestamp);
    }));
}

fn on_counter_frame(driver: &Weak<RefCell<FrameDriver>>, sink: &CountSink, timestamp: f64) {
    let Some(driver) = driver.upgrade() else {
        return;
    };

    let changed = driver.borrow_mut().on_frame(timestamp);
    pump_frames(&driver, sink);

    if let Some(value) = changed {
        sink(value);
    }
}

/// Changing any input restarts the animation.
#[hook]
pub fn use_counter(target: i64, duration_ms: f64, start: i64) -> i64 {
    let count = use_state_eq(|| start);
    let driver = use_mut_ref(|| FrameDriver::new(start));

    {
        let count = count.clone();
        use_effect_with(
            (target, duration_ms, start),
            move |&(target, duration_ms, start)| {
                let spec = CounterSpec::new(target)
                    .with_start(start)
                    .with_duration_ms(duration_ms);
                let sink: CountSink = Rc::new(move |value| count.set(value));
                let immediate = driver.borrow_mut().retarget(spec);
                pump_frames(&driver, &sink);

                if let Some(value) = immediate {
                    sink(value);
                }

                move || driver.borrow_mut().teardown()
            },
        );
    }

    *count
}

struct DocumentScrollHost {
    window: Window,
}

impl ScrollHost for DocumentScrollHost {
    fn section_top(&self, section_id: &str) -> Option<f64> {
        let element = self.window.document()?.get_element_by_id(section_id)?;
        Some(element.get_bounding_client_rect().top())
    }

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn smooth_scroll_to(&self, top: f64) {
        let options = ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(ScrollBehavior::Smooth);
        self.window.scroll_to_with_scroll_to_options(&options);
    }
}

#[hook]
pub fn use_section_navigator(header_offset: f64) -> Callback<AttrValue> {
    use_callback(header_offset, |section: AttrValue, header_offset| {
        let Some(window) = window() else {
            return;
        };
        navigate_to_section(&DocumentScrollHost { window }, &section, *header_offset);
    })
}

#[hook]
pub fn use_window_size() -> ViewportSize {
    let size = use_state_eq(viewport_size);

    {
        let size = size.clone();
        use_effect_with((), move |_| {
            let listener = window_listener("resize", move |_| size.set(viewport_size()));
            move || drop(listener)
        });
    }

    *size
}

#[hook]
pub fn use_debounce<T>(value: T, delay_ms: u32) -> T
where
    T: Clone + PartialEq + 'static,
{
    let settled = use_state_eq(|| value.clone());
    let debounced = use_mut_ref(|| Debounced::new(value.clone()));

    {
        let settled = settled.clone();
        use_effect_with((value, delay_ms), move |(value, delay_ms)| {
            let ticket = debounced.borrow_mut().propose(value.clone());
            let timeout = Timeout::new(*delay_ms, move || {
                let next = debounced.borrow_mut().settle(ticket);
                if let Some(next) = next {
                    settled.set(next);
                }
            });
            move || drop(timeout)
        });
    }

    (*settled).clone()
}

#[derive(Clone, PartialEq)]
pub struct TypingHandle {
    pub display_text: String,
    pub is_complete: bool,
}

#[hook]
pub fn use_typing(text: AttrValue, speed_ms: u32, start_delay_ms: u32) -> TypingHandle {
    let view = use_state_eq(|| TypingHandle {
        display_text: String::new(),
        is_complete: false,
    });

    {
        let view = view.clone();
        use_effect_with(
            (text, speed_ms, start_delay_ms),
            move |(text, speed_ms, start_delay_ms)| {
                view.set(TypingHandle {
                    display_text: String::new(),
                    is_complete: false,
                });

                let interval_slot: Rc<RefCell<Option<Interval>>> = Rc::default();
                let timeout = {
                    let slot = interval_slot.clone();
                    let text = text.clone();
                    let speed_ms = *speed_ms;
                    Timeout::new(*start_delay_ms, move || {
                        let mut typing = TypingState::new(&text);
                        let weak_slot = Rc::downgrade(&slot);
                        let interval = Interval::new(speed_ms, move || {
                            let more = typing.tick();
                            view.set(TypingHandle {
                                display_text: typing.display_text(),
                                is_complete: typing.is_complete(),
                            });
                            if !more {
                                if let Some(slot) = weak_slot.upgrade() {
                                    slot.borrow_mut().take();
                                }
                            }
                        });
                        *slot.borrow_mut() = Some(interval);
                    })
                };

                move || {
                    drop(timeout);
                    interval_slot.borrow_mut().take();
                }
            },
        );
    }

    (*view).clone()
}

#[derive(Clone, PartialEq)]
pub struct HoverHandle {
    pub hovered: bool,
    pub onmouseenter: Callback<MouseEvent>,
    pub onmouseleave: Callback<MouseEvent>,
}

struct HoverDriver {
    intent: HoverIntent,
    timer: Option<Timeout>,
}

fn schedule_hover(
    driver: &Rc<RefCell<HoverDriver>>,
    hovered: &UseStateHandle<bool>,
    transition: fn(&mut HoverIntent) -> HoverTransition,
) {
    let weak = Rc::downgrade(driver);
    let hovered = hovered.clone();
    let mut inner = driver.borrow_mut();
    let HoverTransition { ticket, delay_ms } = transition(&mut inner.intent);

    inner.timer = Some(Timeout::new(delay_ms, move || {
        let Some(driver) = weak.upgrade() else {
            return;
        };
        let next = driver.borrow_mut().intent.settle(ticket);
        if let Some(next) = next {
            hovered.set(next);
        }
    }));
}

#[hook]
pub fn use_hover_delay(enter_delay_ms: u32, leave_delay_ms: u32) -> HoverHandle {
    let hovered = use_state_eq(|| false);
    let driver = use_mut_ref(|| HoverDriver {
        intent: HoverIntent::new(enter_delay_ms, leave_delay_ms),
        timer: None,
    });

    {
        let driver = driver.clone();
        let hovered = hovered.clone();
        use_effect_with(
            (enter_delay_ms, leave_delay_ms),
            move |&(enter_delay_ms, leave_delay_ms)| {
                let mut inner = driver.borrow_mut();
                if inner.timer.is_some() || inner.intent.is_hovered() {
                    hovered.set(false);
                }
                inner.intent = HoverIntent::new(enter_delay_ms, leave_delay_ms);
                inner.timer = None;
                drop(inner);

                move || {
                    driver.borrow_mut().timer.take();
                }
            },
        );
    }

    let onmouseenter = {
        let driver = driver.clone();
        let hovered = hovered.clone();
        use_callback((enter_delay_ms, leave_delay_ms), move |_: MouseEvent, _| {
            schedule_hover(&driver, &hovered, HoverIntent::enter);
        })
    };
    let onmouseleave = {
        let driver = driver.clone();
        let hovered = hovered.clone();
        use_callback((enter_delay_ms, leave_delay_ms), move |_: MouseEvent, _| {
            schedule_hover(&driver, &hovered, HoverIntent::leave);
        })
    };

    HoverHandle {
        hovered: *hovered,
        onmouseenter,
        onmouseleave,
    }
}

#[derive(Clone, PartialEq)]
pub struct LocalStorageHandle<T> {
    value: T,
    setter: Callback<T>,
}

impl<T: Clone> LocalStorageHandle<T> {
    pub fn value(&self) -> T {
        self.value.clone()
    }

    pub fn set(&self, value: T) {
        self.setter.emit(value);
    }
}

/// State mirrored into `localStorage` as JSON under `key`. Storage problems
/// are logged; the page keeps working from memory.
#[hook]
pub fn use_local_storage<T, F>(key: &'static str, initial: F) -> LocalStorageHandle<T>
where
    T: Clone + PartialEq + Serialize + DeserializeOwned + 'static,
    F: FnOnce() -> T,
{
    let persisted = use_mut_ref(|| PersistedValue::load(LocalStore::open(), key, initial));
    let value = use_state_eq(|| persisted.borrow().get().clone());

    let setter = {
        let value = value.clone();
        use_callback((), move |next: T, _| {
            persisted.borrow_mut().set(next.clone());
            value.set(next);
        })
    };

    LocalStorageHandle {
        value: (*value).clone(),
        setter,
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use super::*;
    use gloo_timers::future::TimeoutFuture;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    async fn counter_teardown_stops_frame_callbacks() {
        let driver = Rc::new(RefCell::new(FrameDriver::new(0)));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink: CountSink = {
            let seen = seen.clone();
            Rc::new(move |value| seen.borrow_mut().push(value))
        };

        driver
            .borrow_mut()
            .retarget(CounterSpec::new(500).with_duration_ms(50.0));
        pump_frames(&driver, &sink);
        driver.borrow_mut().teardown();
        TimeoutFuture::new(200).await;

        assert!(seen.borrow().is_empty());
        assert!(!driver.borrow_mut().take_frame_request());
    }

    #[wasm_bindgen_test]
    fn navigator_ignores_unknown_section() {
        let Some(window) = window() else {
            return;
        };
        let before = window.scroll_y().unwrap_or(0.0);

        navigate_to_section(
            &DocumentScrollHost {
                window: window.clone(),
            },
            "no-such-section",
            80.0,
        );

        assert_eq!(window.scroll_y().unwrap_or(0.0), before);
    }
}
