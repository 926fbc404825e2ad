use std::{cell::RefCell, rc::Rc};

const DEFAULT_IN_VIEW_THRESHOLD: f64 = 0.1;

#[derive(Clone, Debug, PartialEq)]
pub enum RootMargin {
    Pixels(f64),
    Css(String),
}

impl RootMargin {
    pub fn to_css(&self) -> String {
        match self {
            Self::Pixels(value) => format!("{value}px"),
            Self::Css(value) => value.clone(),
        }
    }
}

impl Default for RootMargin {
    fn default() -> Self {
        Self::Pixels(0.0)
    }
}

impl From<f64> for RootMargin {
    fn from(value: f64) -> Self {
        Self::Pixels(value)
    }
}

impl From<&str> for RootMargin {
    fn from(value: &str) -> Self {
        Self::Css(value.to_string())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct InViewOptions {
    threshold: f64,
    root_margin: RootMargin,
}

impl Default for InViewOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_IN_VIEW_THRESHOLD,
            root_margin: RootMargin::default(),
        }
    }
}

impl InViewOptions {
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = if threshold.is_finite() {
            threshold.clamp(0.0, 1.0)
        } else {
            DEFAULT_IN_VIEW_THRESHOLD
        };
        self
    }

    pub fn with_root_margin(mut self, root_margin: impl Into<RootMargin>) -> Self {
        self.root_margin = root_margin.into();
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn root_margin(&self) -> &RootMargin {
        &self.root_margin
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LatchState {
    Unobserved,
    Observing,
    Fired,
}

/// `Fired` is terminal: nothing moves the latch out of it.
#[derive(Clone, Copy, Debug)]
pub struct IntersectionLatch {
    state: LatchState,
}

impl Default for IntersectionLatch {
    fn default() -> Self {
        Self::new()
    }
}

impl IntersectionLatch {
    pub fn new() -> Self {
        Self {
            state: LatchState::Unobserved,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> LatchState {
        self.state
    }

    pub fn is_in_view(&self) -> bool {
        matches!(self.state, LatchState::Fired)
    }

    /// Returns whether the caller should start observing.
    pub fn attach(&mut self) -> bool {
        match self.state {
            LatchState::Unobserved => {
                self.state = LatchState::Observing;
                true
            }
            LatchState::Observing => true,
            LatchState::Fired => false,
        }
    }

    pub fn detach(&mut self) {
        if self.state == LatchState::Observing {
            self.state = LatchState::Unobserved;
        }
    }

    /// Returns `true` only on the transition into `Fired`.
    pub fn observe(&mut self, is_intersecting: bool) -> bool {
        if self.state == LatchState::Observing && is_intersecting {
            self.state = LatchState::Fired;
            return true;
        }

        false
    }
}

pub trait Disconnect {
    fn disconnect(&self);
}

/// Routes one observer callback into the latch and disconnects the observer
/// when the latch fires. Returns whether it fired.
pub fn deliver(
    latch: &RefCell<IntersectionLatch>,
    observer: &impl Disconnect,
    is_intersecting: bool,
) -> bool {
    let fired = latch.borrow_mut().observe(is_intersecting);
    if fired {
        observer.disconnect();
    }
    fired
}

/// Owns a live observation. Dropping it disconnects the observer and lets an
/// unfired latch be attached again.
pub struct ObservationGuard<O: Disconnect> {
    observer: O,
    latch: Rc<RefCell<IntersectionLatch>>,
}

impl<O: Disconnect> ObservationGuard<O> {
    pub fn new(observer: O, latch: Rc<RefCell<IntersectionLatch>>) -> Self {
        Self { observer, latch }
    }
}

impl<O: Disconnect> Drop for ObservationGuard<O> {
    fn drop(&mut self) {
        self.observer.disconnect();
        self.latch.borrow_mut().detach();
    }
}
