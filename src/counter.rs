pub const DEFAULT_COUNTER_DURATION_MS: f64 = 2_000.0;

pub trait FrameScheduler {
    fn request_frame(&mut self);
    fn cancel_frame(&mut self);
}

pub fn ease_out_cubic(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CounterSpec {
    pub start: i64,
    pub target: i64,
    pub duration_ms: f64,
}

impl CounterSpec {
    pub fn new(target: i64) -> Self {
        Self {
            start: 0,
            target,
            duration_ms: DEFAULT_COUNTER_DURATION_MS,
        }
    }

    pub fn with_start(mut self, start: i64) -> Self {
        self.start = start;
        self
    }

    pub fn with_duration_ms(mut self, duration_ms: f64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn fraction_at(&self, elapsed_ms: f64) -> f64 {
        if self.duration_ms <= 0.0 || !self.duration_ms.is_finite() {
            return 1.0;
        }

        (elapsed_ms / self.duration_ms).clamp(0.0, 1.0)
    }

    /// Floors rather than rounds, so the exact target only shows once the
    /// full duration has elapsed.
    pub fn value_at(&self, elapsed_ms: f64) -> i64 {
        let fraction = self.fraction_at(elapsed_ms);
        if fraction >= 1.0 {
            return self.target;
        }

        let span = self.target as f64 - self.start as f64;
        (self.start as f64 + span * ease_out_cubic(fraction)).floor() as i64
    }
}

#[cfg(test)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CounterState {
    pub current_value: i64,
    pub target_value: i64,
    pub start_value: i64,
    pub elapsed_fraction: f64,
}

#[derive(Clone, Debug)]
pub struct CounterAnimator {
    spec: CounterSpec,
    origin_ms: Option<f64>,
    elapsed_fraction: f64,
    current: i64,
    running: bool,
}

impl CounterAnimator {
    pub fn new(start: i64) -> Self {
        Self {
            spec: CounterSpec::new(start).with_start(start),
            origin_ms: None,
            elapsed_fraction: 1.0,
            current: start,
            running: false,
        }
    }

    #[cfg(test)]
    pub fn current(&self) -> i64 {
        self.current
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[cfg(test)]
    pub fn state(&self) -> CounterState {
        CounterState {
            current_value: self.current,
            target_value: self.spec.target,
            start_value: self.spec.start,
            elapsed_fraction: self.elapsed_fraction,
        }
    }

    /// A spec that already ran to completion is left alone.
    pub fn retarget(
        &mut self,
        spec: CounterSpec,
        scheduler: &mut impl FrameScheduler,
    ) -> Option<i64> {
        if spec == self.spec && !self.running && self.current == spec.target {
            return None;
        }

        scheduler.cancel_frame();
        self.spec = spec;
        self.origin_ms = None;

        if spec.target == spec.start {
            self.running = false;
            self.elapsed_fraction = 1.0;
            return self.publish(spec.start);
        }

        self.running = true;
        self.elapsed_fraction = 0.0;
        scheduler.request_frame();
        None
    }

    /// The first frame after `retarget` becomes the time origin.
    pub fn on_frame(
        &mut self,
        timestamp_ms: f64,
        scheduler: &mut impl FrameScheduler,
    ) -> Option<i64> {
        if !self.running {
            return None;
        }

        let origin = *self.origin_ms.get_or_insert(timestamp_ms);
        let elapsed = timestamp_ms - origin;
        self.elapsed_fraction = self.spec.fraction_at(elapsed);
        let changed = self.publish(self.spec.value_at(elapsed));

        if self.elapsed_fraction < 1.0 {
            scheduler.request_frame();
        } else {
            self.running = false;
        }

        changed
    }

    pub fn stop(&mut self, scheduler: &mut impl FrameScheduler) {
        scheduler.cancel_frame();
        self.running = false;
        self.origin_ms = None;
    }

    fn publish(&mut self, value: i64) -> Option<i64> {
        if value == self.current {
            return None;
        }

        self.current = value;
        Some(value)
    }
}

/// At most one outstanding frame. `H` is the platform's frame handle, which
/// cancels the frame when dropped.
pub struct FrameSlot<H> {
    wanted: bool,
    pending: Option<H>,
}

impl<H> Default for FrameSlot<H> {
    fn default() -> Self {
        Self {
            wanted: false,
            pending: None,
        }
    }
}

impl<H> FrameScheduler for FrameSlot<H> {
    fn request_frame(&mut self) {
        self.wanted = true;
    }

    fn cancel_frame(&mut self) {
        self.wanted = false;
        self.pending = None;
    }
}

pub struct CounterDriver<H> {
    animator: CounterAnimator,
    frames: FrameSlot<H>,
}

impl<H> CounterDriver<H> {
    pub fn new(start: i64) -> Self {
        Self {
            animator: CounterAnimator::new(start),
            frames: FrameSlot::default(),
        }
    }

    pub fn retarget(&mut self, spec: CounterSpec) -> Option<i64> {
        self.animator.retarget(spec, &mut self.frames)
    }

    pub fn on_frame(&mut self, timestamp_ms: f64) -> Option<i64> {
        self.animator.on_frame(timestamp_ms, &mut self.frames)
    }

    pub fn teardown(&mut self) {
        self.animator.stop(&mut self.frames);
    }

    /// Takes the animator's frame request. The caller answers it with `arm`.
    pub fn take_frame_request(&mut self) -> bool {
        std::mem::take(&mut self.frames.wanted)
    }

    pub fn arm(&mut self, handle: H) {
        self.frames.pending = Some(handle);
    }

    #[cfg(test)]
    pub fn has_pending_frame(&self) -> bool {
        self.frames.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::RefCell, rc::Rc};

    #[derive(Default)]
    struct CountingScheduler {
        requested: usize,
        cancelled: usize,
        pending: bool,
    }

    impl FrameScheduler for CountingScheduler {
        fn request_frame(&mut self) {
            self.requested += 1;
            self.pending = true;
        }

        fn cancel_frame(&mut self) {
            self.cancelled += 1;
            self.pending = false;
        }
    }

    fn run_frame(
        animator: &mut CounterAnimator,
        scheduler: &mut CountingScheduler,
        timestamp_ms: f64,
    ) -> Option<i64> {
        assert!(scheduler.pending, "frame delivered without a request");
        scheduler.pending = false;
        animator.on_frame(timestamp_ms, scheduler)
    }

    #[test]
    fn easing_hits_both_endpoints() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert_eq!(ease_out_cubic(0.5), 0.875);
    }

    #[test]
    fn value_samples_match_floor_of_eased_progress() {
        let spec = CounterSpec::new(500);

        assert_eq!(spec.value_at(0.0), 0);
        assert_eq!(spec.value_at(1_000.0), 437);
        assert_eq!(spec.value_at(2_000.0), 500);
        assert_eq!(spec.value_at(9_000.0), 500);
    }

    #[test]
    fn counting_down_floors_towards_negative() {
        let spec = CounterSpec::new(0).with_start(10);

        assert_eq!(spec.value_at(0.0), 10);
        assert_eq!(spec.value_at(1_000.0), 1);
        assert_eq!(spec.value_at(2_000.0), 0);
    }

    #[test]
    fn equal_target_and_start_schedules_nothing() {
        let mut animator = CounterAnimator::new(0);
        let mut scheduler = CountingScheduler::default();

        animator.retarget(CounterSpec::new(0), &mut scheduler);

        assert_eq!(animator.current(), 0);
        assert_eq!(scheduler.requested, 0);
        assert!(!animator.is_running());
    }

    #[test]
    fn animation_runs_from_first_frame_to_target() {
        let mut animator = CounterAnimator::new(0);
        let mut scheduler = CountingScheduler::default();

        assert_eq!(animator.retarget(CounterSpec::new(500), &mut scheduler), None);
        assert_eq!(run_frame(&mut animator, &mut scheduler, 10_000.0), None);
        assert_eq!(animator.state().elapsed_fraction, 0.0);
        assert_eq!(run_frame(&mut animator, &mut scheduler, 11_000.0), Some(437));
        assert_eq!(run_frame(&mut animator, &mut scheduler, 12_016.0), Some(500));

        assert!(!animator.is_running());
        assert!(!scheduler.pending);
        assert_eq!(animator.state().elapsed_fraction, 1.0);
    }

    #[test]
    fn identical_integer_frames_are_not_republished() {
        let mut animator = CounterAnimator::new(0);
        let mut scheduler = CountingScheduler::default();
        animator.retarget(CounterSpec::new(3).with_duration_ms(1_000.0), &mut scheduler);

        run_frame(&mut animator, &mut scheduler, 0.0);
        assert_eq!(run_frame(&mut animator, &mut scheduler, 1.0), None);
        assert_eq!(run_frame(&mut animator, &mut scheduler, 2.0), None);
    }

    #[test]
    fn retarget_cancels_and_restarts_from_zero_elapsed() {
        let mut animator = CounterAnimator::new(0);
        let mut scheduler = CountingScheduler::default();
        animator.retarget(CounterSpec::new(100), &mut scheduler);
        run_frame(&mut animator, &mut scheduler, 0.0);
        run_frame(&mut animator, &mut scheduler, 1_500.0);
        let mid_flight = animator.current();
        assert!(mid_flight > 0 && mid_flight < 100);

        animator.retarget(CounterSpec::new(200), &mut scheduler);
        assert_eq!(scheduler.cancelled, 2);
        assert_eq!(animator.state().elapsed_fraction, 0.0);

        run_frame(&mut animator, &mut scheduler, 5_000.0);
        assert_eq!(animator.current(), 0);
        run_frame(&mut animator, &mut scheduler, 7_000.0);
        assert_eq!(animator.current(), 200);
    }

    #[test]
    fn stop_cancels_pending_frame() {
        let mut animator = CounterAnimator::new(0);
        let mut scheduler = CountingScheduler::default();
        animator.retarget(CounterSpec::new(50), &mut scheduler);

        animator.stop(&mut scheduler);

        assert!(!scheduler.pending);
        assert_eq!(animator.on_frame(100.0, &mut scheduler), None);
    }

    #[test]
    fn extreme_bounds_do_not_overflow() {
        let up = CounterSpec::new(i64::MAX).with_start(-10);
        let down = CounterSpec::new(i64::MIN).with_start(i64::MAX);

        assert!(up.value_at(1_000.0) > 0);
        assert_eq!(up.value_at(2_000.0), i64::MAX);
        assert_eq!(up.value_at(5_000.0), i64::MAX);
        assert!(down.value_at(1_000.0) < 0);
        assert_eq!(down.value_at(2_000.0), i64::MIN);
    }

    #[test]
    fn same_spec_after_completion_does_not_restart() {
        let mut animator = CounterAnimator::new(0);
        let mut scheduler = CountingScheduler::default();
        animator.retarget(CounterSpec::new(500), &mut scheduler);
        run_frame(&mut animator, &mut scheduler, 0.0);
        run_frame(&mut animator, &mut scheduler, 2_000.0);
        let requested = scheduler.requested;

        assert_eq!(animator.retarget(CounterSpec::new(500), &mut scheduler), None);
        assert_eq!(scheduler.requested, requested);
        assert!(!scheduler.pending);
        assert_eq!(animator.on_frame(2_100.0, &mut scheduler), None);
        assert_eq!(animator.current(), 500);
    }

    #[test]
    fn same_spec_mid_flight_restarts() {
        let mut animator = CounterAnimator::new(0);
        let mut scheduler = CountingScheduler::default();
        animator.retarget(CounterSpec::new(500), &mut scheduler);
        run_frame(&mut animator, &mut scheduler, 0.0);
        run_frame(&mut animator, &mut scheduler, 1_000.0);

        animator.retarget(CounterSpec::new(500), &mut scheduler);

        assert!(scheduler.pending);
        assert_eq!(animator.state().elapsed_fraction, 0.0);
    }

    #[derive(Clone)]
    struct FakeFrame {
        id: u32,
        cancelled: Rc<RefCell<Vec<u32>>>,
    }

    impl Drop for FakeFrame {
        fn drop(&mut self) {
            self.cancelled.borrow_mut().push(self.id);
        }
    }

    fn answer_request(
        driver: &mut CounterDriver<FakeFrame>,
        next_id: &mut u32,
        cancelled: &Rc<RefCell<Vec<u32>>>,
    ) -> bool {
        if !driver.take_frame_request() {
            return false;
        }
        *next_id += 1;
        driver.arm(FakeFrame {
            id: *next_id,
            cancelled: cancelled.clone(),
        });
        true
    }

    #[test]
    fn driver_teardown_cancels_the_outstanding_frame() {
        let cancelled = Rc::new(RefCell::new(Vec::new()));
        let mut next_id = 0;
        let mut driver = CounterDriver::new(0);

        driver.retarget(CounterSpec::new(500));
        assert!(answer_request(&mut driver, &mut next_id, &cancelled));
        driver.on_frame(0.0);
        assert!(answer_request(&mut driver, &mut next_id, &cancelled));
        assert_eq!(*cancelled.borrow(), vec![1]);

        driver.teardown();

        assert_eq!(*cancelled.borrow(), vec![1, 2]);
        assert!(!driver.has_pending_frame());
        assert!(!driver.take_frame_request());
    }

    #[test]
    fn late_frame_after_teardown_is_inert() {
        let cancelled = Rc::new(RefCell::new(Vec::new()));
        let mut next_id = 0;
        let mut driver = CounterDriver::new(0);
        driver.retarget(CounterSpec::new(50));
        answer_request(&mut driver, &mut next_id, &cancelled);

        driver.teardown();

        assert_eq!(driver.on_frame(1_000.0), None);
        assert!(!answer_request(&mut driver, &mut next_id, &cancelled));
    }

    #[test]
    fn equal_target_driver_never_arms() {
        let cancelled = Rc::new(RefCell::new(Vec::new()));
        let mut next_id = 0;
        let mut driver: CounterDriver<FakeFrame> = CounterDriver::new(0);

        assert_eq!(driver.retarget(CounterSpec::new(0)), None);
        assert!(!answer_request(&mut driver, &mut next_id, &cancelled));
        assert!(!driver.has_pending_frame());
    }

    #[test]
    fn zero_duration_jumps_straight_to_target() {
        let mut animator = CounterAnimator::new(0);
        let mut scheduler = CountingScheduler::default();
        animator.retarget(CounterSpec::new(42).with_duration_ms(0.0), &mut scheduler);

        assert_eq!(run_frame(&mut animator, &mut scheduler, 0.0), Some(42));
        assert!(!animator.is_running());
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn counting_up_is_non_decreasing(
                target in 1i64..1_000_000,
                mut samples in proptest::collection::vec(0.0..4_000.0_f64, 1..32)
            ) {
                samples.sort_by(f64::total_cmp);
                let spec = CounterSpec::new(target);
                let mut previous = spec.value_at(0.0);

                for elapsed in samples {
                    let value = spec.value_at(elapsed);
                    prop_assert!(value >= previous);
                    prop_assert!(value <= target);
                    previous = value;
                }

                prop_assert_eq!(spec.value_at(DEFAULT_COUNTER_DURATION_MS), target);
            }
        }
    }
}
