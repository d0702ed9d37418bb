//! Testing utilities and harness for Momentum.
//!
//! The engine's two injected capabilities — the frame clock and the pointer
//! source — are replaced here by hand-driven doubles: a [`ManualFrameDriver`]
//! that advances a virtual millisecond clock and drains frame callbacks on
//! demand, and a [`ScriptedPointerSource`] that emits normalized pointer
//! events from test code. [`GestureRobot`] composes the two into whole
//! gestures.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use momentum_core::{
    DefaultScheduler, FrameClock, FrameLoop, FrameLoopHandle, PointerEvent, PointerEventKind,
    PointerHandler, PointerId, PointerSource, SubscriberSet, Subscription, TouchScrollFix,
};

/// Frame loop plus a virtual clock, advanced explicitly by tests.
pub struct ManualFrameDriver {
    frame_loop: FrameLoop,
    now_ms: Cell<u64>,
}

impl Default for ManualFrameDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualFrameDriver {
    pub fn new() -> Self {
        Self {
            frame_loop: FrameLoop::new(Arc::new(DefaultScheduler)),
            now_ms: Cell::new(0),
        }
    }

    pub fn clock(&self) -> FrameClock {
        self.frame_loop.frame_clock()
    }

    pub fn handle(&self) -> FrameLoopHandle {
        self.frame_loop.handle()
    }

    /// Current virtual time in milliseconds.
    pub fn now_ms(&self) -> u64 {
        self.now_ms.get()
    }

    /// Whether any frame callback is waiting.
    pub fn needs_frame(&self) -> bool {
        self.frame_loop.needs_frame()
    }

    /// Advances the virtual clock by `step_ms` and runs one frame drain.
    pub fn advance(&self, step_ms: u64) {
        let now = self.now_ms.get() + step_ms;
        self.now_ms.set(now);
        self.frame_loop.handle().drain_frame_callbacks(now);
    }

    /// Runs `frames` drains, `step_ms` apart.
    pub fn advance_frames(&self, frames: usize, step_ms: u64) {
        for _ in 0..frames {
            self.advance(step_ms);
        }
    }

    /// Pumps frames until nothing is scheduled anymore (an animation has
    /// settled) or `max_frames` is hit. Returns the number of frames run.
    pub fn run_until_idle(&self, step_ms: u64, max_frames: usize) -> usize {
        let mut frames = 0;
        while self.frame_loop.needs_frame() && frames < max_frames {
            self.advance(step_ms);
            frames += 1;
        }
        frames
    }
}

/// A [`PointerSource`] whose events come from test code.
///
/// Also implements the [`TouchScrollFix`] capability with an install
/// counter, so workaround behavior is observable.
#[derive(Default)]
pub struct ScriptedPointerSource {
    press: SubscriberSet,
    motion: SubscriberSet,
    fix_installs: Cell<u32>,
}

impl ScriptedPointerSource {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Emits a down event on the press stream.
    pub fn press(&self, x: f32, y: f32, pointer: PointerId, time_ms: u64) {
        self.press
            .emit(&PointerEvent::new(PointerEventKind::Down, x, y, pointer, time_ms));
    }

    /// Emits a move event on the motion stream.
    pub fn move_to(&self, x: f32, y: f32, pointer: PointerId, time_ms: u64) {
        self.motion
            .emit(&PointerEvent::new(PointerEventKind::Move, x, y, pointer, time_ms));
    }

    /// Emits an up event on the motion stream.
    pub fn release(&self, x: f32, y: f32, pointer: PointerId, time_ms: u64) {
        self.motion
            .emit(&PointerEvent::new(PointerEventKind::Up, x, y, pointer, time_ms));
    }

    /// Emits a cancel event on the motion stream.
    pub fn cancel(&self, x: f32, y: f32, pointer: PointerId, time_ms: u64) {
        self.motion
            .emit(&PointerEvent::new(PointerEventKind::Cancel, x, y, pointer, time_ms));
    }

    pub fn press_subscribers(&self) -> usize {
        self.press.len()
    }

    pub fn motion_subscribers(&self) -> usize {
        self.motion.len()
    }

    /// How many times the scroll workaround was installed on this source.
    pub fn fix_installs(&self) -> u32 {
        self.fix_installs.get()
    }
}

impl PointerSource for ScriptedPointerSource {
    fn subscribe_press(&self, handler: PointerHandler) -> Subscription {
        self.press.subscribe(handler)
    }

    fn subscribe_motion(&self, handler: PointerHandler) -> Subscription {
        self.motion.subscribe(handler)
    }

    fn as_touch_scroll_fix(&self) -> Option<&dyn TouchScrollFix> {
        Some(self)
    }
}

impl TouchScrollFix for ScriptedPointerSource {
    fn install_workaround(&self) {
        self.fix_installs.set(self.fix_installs.get() + 1);
    }
}

/// Drives whole gestures through a scripted source and a manual driver.
pub struct GestureRobot<'a> {
    source: &'a ScriptedPointerSource,
    driver: &'a ManualFrameDriver,
}

impl<'a> GestureRobot<'a> {
    pub fn new(source: &'a ScriptedPointerSource, driver: &'a ManualFrameDriver) -> Self {
        Self { source, driver }
    }

    /// Press at `from`, move to `to` in `steps` linear increments over
    /// `duration_ms` (pumping one frame after each move so the engine's
    /// coalesced tick runs), then release at `to`.
    ///
    /// Uses touch contact 0; timestamps follow the driver's virtual clock.
    pub fn flick(&self, from: (f32, f32), to: (f32, f32), steps: usize, duration_ms: u64) {
        let pointer = PointerId::Touch(0);
        let step_ms = duration_ms / steps.max(1) as u64;

        self.source
            .press(from.0, from.1, pointer, self.driver.now_ms());
        for i in 1..=steps {
            let t = i as f32 / steps as f32;
            let x = from.0 + (to.0 - from.0) * t;
            let y = from.1 + (to.1 - from.1) * t;
            self.source.move_to(x, y, pointer, self.driver.now_ms());
            self.driver.advance(step_ms);
        }
        self.source
            .release(to.0, to.1, pointer, self.driver.now_ms());
    }

    /// Like [`flick`](Self::flick) but lets the animation run to rest
    /// afterwards. Returns the number of settle frames.
    pub fn flick_and_settle(
        &self,
        from: (f32, f32),
        to: (f32, f32),
        steps: usize,
        duration_ms: u64,
    ) -> usize {
        self.flick(from, to, steps, duration_ms);
        self.driver.run_until_idle(16, 10_000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn driver_advances_clock_and_drains() {
        let driver = ManualFrameDriver::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let seen_in_cb = Rc::clone(&seen);
        driver
            .handle()
            .register_frame_callback(move |now| seen_in_cb.borrow_mut().push(now));

        driver.advance(16);
        driver.advance(16);
        assert_eq!(*seen.borrow(), vec![16]);
        assert_eq!(driver.now_ms(), 32);
    }

    #[test]
    fn scripted_source_routes_streams_separately() {
        let source = ScriptedPointerSource::new();
        let presses = Rc::new(Cell::new(0));
        let motions = Rc::new(Cell::new(0));

        let presses_in_cb = Rc::clone(&presses);
        let _press_sub = source.subscribe_press(Rc::new(move |_| {
            presses_in_cb.set(presses_in_cb.get() + 1);
        }));
        let motions_in_cb = Rc::clone(&motions);
        let _motion_sub = source.subscribe_motion(Rc::new(move |_| {
            motions_in_cb.set(motions_in_cb.get() + 1);
        }));

        source.press(0.0, 0.0, PointerId::Mouse, 0);
        source.move_to(1.0, 0.0, PointerId::Mouse, 5);
        source.release(1.0, 0.0, PointerId::Mouse, 10);

        assert_eq!(presses.get(), 1);
        assert_eq!(motions.get(), 2);
        assert_eq!(source.press_subscribers(), 1);
        assert_eq!(source.motion_subscribers(), 1);
    }

    #[test]
    fn run_until_idle_stops_when_nothing_is_scheduled() {
        let driver = ManualFrameDriver::new();
        assert_eq!(driver.run_until_idle(16, 100), 0);
    }
}
