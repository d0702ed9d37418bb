//! The drag tracker and inertia/bounce integrator.
//!
//! A [`Momentum`] instance owns one target position and moves it through
//! two mutually exclusive regimes: directly under the pointer while a drag
//! is active, then under velocity decay (with optional elastic boundary
//! rebound) after release. All state lives on one thread; frame callbacks
//! and pointer handlers reach the instance through weak references and
//! check the current [`Phase`] before touching anything, so a callback that
//! fires after a pause or teardown is a no-op.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use momentum_core::{
    install_touch_scroll_fix, FrameCallbackRegistration, FrameClock, PointerEvent,
    PointerEventKind, PointerId, PointerSource, Subscription,
};

use crate::bounds::{self, overdrag_resistance, rebound_velocity, AxisBounds, Excess};
use crate::builder::{MomentumBuilder, MomentumError};
use crate::constants::{DECEL_TRIGGER_VELOCITY, STOP_THRESHOLD_BASE};
use crate::sink::UpdateSink;
use crate::tracking::SampleBuffer;

/// Lifecycle of an engine instance. Exactly one phase is active at a time;
/// the target position is only ever mutated by the phase that owns it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// No pointer tracked, no animation running.
    Idle,
    /// A pointer is down and the target follows it.
    Dragging,
    /// Released; the target is settling under velocity decay.
    Decelerating,
    /// Movement processing disabled until `resume`.
    Paused,
}

/// How to apply one component in [`Momentum::set_values`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PrevUpdate {
    /// Leave the stored value untouched.
    Keep,
    /// Reset to "never notified".
    Clear,
    /// Overwrite with a concrete value.
    Set(f32),
}

pub(crate) struct EngineInner {
    clock: FrameClock,
    source: Rc<dyn PointerSource>,
    sink: UpdateSink,
    bounce: bool,

    phase: Cell<Phase>,
    target_x: Cell<f32>,
    target_y: Cell<f32>,
    prev_x: Cell<Option<f32>>,
    prev_y: Cell<Option<f32>>,

    pointer_last_x: Cell<f32>,
    pointer_last_y: Cell<f32>,
    pointer_current_x: Cell<f32>,
    pointer_current_y: Cell<f32>,
    tracked_pointer: Cell<Option<PointerId>>,

    vel_x: Cell<f32>,
    vel_y: Cell<f32>,

    multiplier: Cell<f32>,
    friction: Cell<f32>,
    stop_threshold: Cell<f32>,
    bound_x: Cell<AxisBounds>,
    bound_y: Cell<AxisBounds>,

    /// Coalesces bursts of move events into one physics step per frame.
    ticking: Cell<bool>,
    samples: RefCell<SampleBuffer>,
    /// The single in-flight frame callback (drag tick or settle step).
    pending_frame: RefCell<Option<FrameCallbackRegistration>>,
    motion_sub: RefCell<Option<Subscription>>,
    press_sub: RefCell<Option<Subscription>>,
}

impl EngineInner {
    fn excess(&self) -> Excess {
        bounds::evaluate(
            self.target_x.get(),
            self.target_y.get(),
            self.bound_x.get(),
            self.bound_y.get(),
        )
    }

    fn emit_update(&self) {
        let x = self.target_x.get();
        let y = self.target_y.get();
        self.sink.update(x, y, self.prev_x.get(), self.prev_y.get());
        self.prev_x.set(Some(x));
        self.prev_y.set(Some(y));
    }

    fn emit_start(&self) {
        self.sink.start(
            self.target_x.get(),
            self.target_y.get(),
            self.prev_x.get(),
            self.prev_y.get(),
        );
    }

    fn emit_start_decelerating(&self) {
        self.sink.start_decelerating(
            self.target_x.get(),
            self.target_y.get(),
            self.prev_x.get(),
            self.prev_y.get(),
        );
    }

    fn emit_end_decelerating(&self) {
        self.sink.end_decelerating(
            self.target_x.get(),
            self.target_y.get(),
            self.prev_x.get(),
            self.prev_y.get(),
        );
    }

    /// Drops the in-flight frame callback and the coalescing flag.
    fn cancel_pending_frame(&self) {
        self.pending_frame.borrow_mut().take();
        self.ticking.set(false);
    }

    fn on_press(inner: &Rc<Self>, event: &PointerEvent) {
        match inner.phase.get() {
            // A press interrupts a running settle animation.
            Phase::Idle | Phase::Decelerating => {}
            Phase::Dragging | Phase::Paused => return,
        }
        inner.cancel_pending_frame();

        log::debug!("drag start: {:?} at ({}, {})", event.pointer, event.x, event.y);
        inner.emit_start();

        inner.phase.set(Phase::Dragging);
        inner.tracked_pointer.set(Some(event.pointer));
        inner.pointer_last_x.set(event.x);
        inner.pointer_last_y.set(event.y);
        inner.pointer_current_x.set(event.x);
        inner.pointer_current_y.set(event.y);
        {
            let mut samples = inner.samples.borrow_mut();
            samples.reset();
            samples.record(event.x, event.y, event.time_ms);
        }

        let weak = Rc::downgrade(inner);
        let subscription = inner.source.subscribe_motion(Rc::new(move |event| {
            if let Some(inner) = weak.upgrade() {
                EngineInner::on_motion(&inner, event);
            }
        }));
        *inner.motion_sub.borrow_mut() = Some(subscription);
    }

    fn on_motion(inner: &Rc<Self>, event: &PointerEvent) {
        match event.kind {
            PointerEventKind::Move => {
                if inner.phase.get() == Phase::Dragging
                    && inner.tracked_pointer.get() == Some(event.pointer)
                {
                    inner.pointer_current_x.set(event.x);
                    inner.pointer_current_y.set(event.y);
                    // Sample the position the pointer is leaving, not the
                    // one it arrived at; release velocity depends on this.
                    inner.samples.borrow_mut().record(
                        inner.pointer_last_x.get(),
                        inner.pointer_last_y.get(),
                        event.time_ms,
                    );
                    Self::request_tick(inner);
                }
            }
            PointerEventKind::Up => {
                if inner.phase.get() == Phase::Dragging
                    && inner.tracked_pointer.get() == Some(event.pointer)
                {
                    Self::stop_tracking(inner, event.time_ms);
                }
            }
            // Platform cancels end the drag no matter which pointer they
            // name.
            PointerEventKind::Cancel => {
                if inner.phase.get() == Phase::Dragging {
                    Self::stop_tracking(inner, event.time_ms);
                }
            }
            PointerEventKind::Down => {}
        }
    }

    /// Schedules one drag step for the next frame; a request while one is
    /// already pending is a no-op.
    fn request_tick(inner: &Rc<Self>) {
        if !inner.ticking.get() {
            let weak = Rc::downgrade(inner);
            let registration = inner.clock.with_frame_millis(move |_now| {
                if let Some(inner) = weak.upgrade() {
                    inner.drag_tick();
                }
            });
            *inner.pending_frame.borrow_mut() = Some(registration);
        }
        inner.ticking.set(true);
    }

    /// One coalesced drag step: apply the pointer delta, resist or clamp at
    /// the bounds, notify.
    fn drag_tick(&self) {
        if self.phase.get() != Phase::Dragging {
            // Paused or released between scheduling and the frame.
            return;
        }

        let delta_x = self.pointer_current_x.get() - self.pointer_last_x.get();
        let delta_y = self.pointer_current_y.get() - self.pointer_last_y.get();
        let multiplier = self.multiplier.get();

        self.target_x.set(self.target_x.get() + delta_x * multiplier);
        self.target_y.set(self.target_y.get() + delta_y * multiplier);

        if self.bounce {
            let excess = self.excess();
            if excess.x != 0.0 {
                self.target_x.set(
                    self.target_x.get()
                        - delta_x * overdrag_resistance(excess.x) * multiplier,
                );
            }
            if excess.y != 0.0 {
                self.target_y.set(
                    self.target_y.get()
                        - delta_y * overdrag_resistance(excess.y) * multiplier,
                );
            }
        } else {
            self.target_x.set(self.bound_x.get().clamp(self.target_x.get()));
            self.target_y.set(self.bound_y.get().clamp(self.target_y.get()));
        }

        self.emit_update();

        self.pointer_last_x.set(self.pointer_current_x.get());
        self.pointer_last_y.set(self.pointer_current_y.get());
        self.ticking.set(false);
    }

    /// Ends the drag: final sample, transient listeners off, hand the
    /// target to the settle animation.
    fn stop_tracking(inner: &Rc<Self>, now_ms: u64) {
        inner.samples.borrow_mut().record(
            inner.pointer_last_x.get(),
            inner.pointer_last_y.get(),
            now_ms,
        );
        inner.cancel_pending_frame();
        inner.motion_sub.borrow_mut().take();
        inner.tracked_pointer.set(None);
        Self::start_decelerating(inner);
    }

    fn start_decelerating(inner: &Rc<Self>) {
        let velocity = inner
            .samples
            .borrow()
            .release_velocity(inner.multiplier.get());
        inner.vel_x.set(velocity.x);
        inner.vel_y.set(velocity.y);

        let excess = inner.excess();
        log::debug!(
            "release: velocity ({:.2}, {:.2}), in_bounds {}",
            velocity.x,
            velocity.y,
            excess.in_bounds
        );

        inner.emit_start_decelerating();
        if velocity.x.abs() > DECEL_TRIGGER_VELOCITY
            || velocity.y.abs() > DECEL_TRIGGER_VELOCITY
            || !excess.in_bounds
        {
            inner.phase.set(Phase::Decelerating);
            Self::schedule_settle_step(inner);
        } else {
            inner.phase.set(Phase::Idle);
            inner.emit_end_decelerating();
        }
    }

    fn schedule_settle_step(inner: &Rc<Self>) {
        let weak = Rc::downgrade(inner);
        let registration = inner.clock.with_frame_millis(move |_now| {
            if let Some(inner) = weak.upgrade() {
                EngineInner::settle_step(&inner);
            }
        });
        *inner.pending_frame.borrow_mut() = Some(registration);
    }

    /// One settle step: decay, integrate, react to the bounds, notify.
    fn settle_step(inner: &Rc<Self>) {
        if inner.phase.get() != Phase::Decelerating {
            // Paused, destroyed, or interrupted by a new press.
            return;
        }

        let friction = inner.friction.get();
        let mut vel_x = inner.vel_x.get() * friction;
        let mut vel_y = inner.vel_y.get() * friction;
        inner.target_x.set(inner.target_x.get() + vel_x);
        inner.target_y.set(inner.target_y.get() + vel_y);

        let excess = inner.excess();
        let stop_threshold = inner.stop_threshold.get();
        let continuing = vel_x.abs() > stop_threshold
            || vel_y.abs() > stop_threshold
            || !excess.in_bounds;

        if continuing && !excess.in_bounds {
            if inner.bounce {
                if excess.x != 0.0 {
                    vel_x = rebound_velocity(vel_x, excess.x);
                }
                if excess.y != 0.0 {
                    vel_y = rebound_velocity(vel_y, excess.y);
                }
            } else {
                if excess.x != 0.0 {
                    inner
                        .target_x
                        .set(inner.bound_x.get().clamp(inner.target_x.get()));
                    vel_x = 0.0;
                }
                if excess.y != 0.0 {
                    inner
                        .target_y
                        .set(inner.bound_y.get().clamp(inner.target_y.get()));
                    vel_y = 0.0;
                }
            }
        }

        inner.vel_x.set(vel_x);
        inner.vel_y.set(vel_y);
        inner.emit_update();

        if continuing {
            Self::schedule_settle_step(inner);
        } else {
            inner.phase.set(Phase::Idle);
            log::debug!(
                "settled at ({:.2}, {:.2})",
                inner.target_x.get(),
                inner.target_y.get()
            );
            inner.emit_end_decelerating();
        }
    }
}

/// Flick-and-settle motion attached to a pointer source.
///
/// Created through [`Momentum::builder`]. The instance reports every change
/// of its 2D target position to the configured callbacks; consumers never
/// poll.
pub struct Momentum {
    inner: Rc<EngineInner>,
}

impl Momentum {
    pub fn builder() -> MomentumBuilder {
        MomentumBuilder::new()
    }

    pub(crate) fn from_builder(
        builder: MomentumBuilder,
        clock: FrameClock,
    ) -> Result<Self, MomentumError> {
        let source = builder.source.ok_or(MomentumError::SourceMissing)?;
        let on_update = builder
            .on_update
            .ok_or(MomentumError::UpdateCallbackMissing)?;

        if builder.touch_scroll_fix {
            if let Some(fix) = source.as_touch_scroll_fix() {
                install_touch_scroll_fix(fix);
            }
        }

        let inner = Rc::new(EngineInner {
            clock,
            source: Rc::clone(&source),
            sink: UpdateSink {
                on_update,
                on_start: builder.on_start,
                on_start_decelerating: builder.on_start_decelerating,
                on_end_decelerating: builder.on_end_decelerating,
            },
            bounce: builder.bounce,
            phase: Cell::new(Phase::Idle),
            target_x: Cell::new(0.0),
            target_y: Cell::new(0.0),
            prev_x: Cell::new(None),
            prev_y: Cell::new(None),
            pointer_last_x: Cell::new(0.0),
            pointer_last_y: Cell::new(0.0),
            pointer_current_x: Cell::new(0.0),
            pointer_current_y: Cell::new(0.0),
            tracked_pointer: Cell::new(None),
            vel_x: Cell::new(0.0),
            vel_y: Cell::new(0.0),
            multiplier: Cell::new(builder.multiplier),
            friction: Cell::new(builder.friction),
            stop_threshold: Cell::new(STOP_THRESHOLD_BASE * builder.multiplier),
            bound_x: Cell::new(builder.bound_x),
            bound_y: Cell::new(builder.bound_y),
            ticking: Cell::new(false),
            samples: RefCell::new(SampleBuffer::new()),
            pending_frame: RefCell::new(None),
            motion_sub: RefCell::new(None),
            press_sub: RefCell::new(None),
        });

        if let Some((x, y)) = builder.initial_values {
            inner.target_x.set(x);
            inner.target_y.set(y);
            inner.emit_update();
        }

        let weak = Rc::downgrade(&inner);
        let subscription = source.subscribe_press(Rc::new(move |event| {
            if event.kind != PointerEventKind::Down {
                return;
            }
            if let Some(inner) = weak.upgrade() {
                EngineInner::on_press(&inner, event);
            }
        }));
        *inner.press_sub.borrow_mut() = Some(subscription);

        Ok(Self { inner })
    }

    /// Detaches from the source and halts any pending callbacks. Safe to
    /// call any number of times.
    pub fn destroy(&self) {
        let inner = &self.inner;
        inner.phase.set(Phase::Idle);
        inner.tracked_pointer.set(None);
        inner.cancel_pending_frame();
        inner.motion_sub.borrow_mut().take();
        inner.press_sub.borrow_mut().take();
    }

    /// Hard-stops movement processing. An active drag or settle animation
    /// is abandoned where it stands; already-queued frame callbacks no-op.
    pub fn pause(&self) {
        let inner = &self.inner;
        inner.motion_sub.borrow_mut().take();
        inner.cancel_pending_frame();
        inner.tracked_pointer.set(None);
        inner.phase.set(Phase::Paused);
    }

    /// Re-enables presses. Does not resurrect motion abandoned by `pause`.
    pub fn resume(&self) {
        if self.inner.phase.get() == Phase::Paused {
            self.inner.phase.set(Phase::Idle);
        }
    }

    /// Re-fires `on_update` with the current values. Useful after
    /// [`set_values`](Self::set_values) to push the change out immediately.
    pub fn force_update(&self) {
        self.inner.emit_update();
    }

    /// Partially updates the current and previously-notified positions.
    /// `None`/[`PrevUpdate::Keep`] components stay untouched.
    pub fn set_values(
        &self,
        x: Option<f32>,
        y: Option<f32>,
        prev_x: PrevUpdate,
        prev_y: PrevUpdate,
    ) {
        let inner = &self.inner;
        if let Some(x) = x {
            inner.target_x.set(x);
        }
        if let Some(y) = y {
            inner.target_y.set(y);
        }
        match prev_x {
            PrevUpdate::Keep => {}
            PrevUpdate::Clear => inner.prev_x.set(None),
            PrevUpdate::Set(value) => inner.prev_x.set(Some(value)),
        }
        match prev_y {
            PrevUpdate::Keep => {}
            PrevUpdate::Clear => inner.prev_y.set(None),
            PrevUpdate::Set(value) => inner.prev_y.set(Some(value)),
        }
    }

    /// Updates the drag sensitivity and rescales the settle threshold.
    pub fn set_multiplier(&self, multiplier: f32) {
        self.inner.multiplier.set(multiplier);
        self.inner
            .stop_threshold
            .set(STOP_THRESHOLD_BASE * multiplier);
    }

    pub fn set_bound_x(&self, bounds: AxisBounds) {
        self.inner.bound_x.set(bounds);
    }

    pub fn set_bound_y(&self, bounds: AxisBounds) {
        self.inner.bound_y.set(bounds);
    }

    pub fn position(&self) -> (f32, f32) {
        (self.inner.target_x.get(), self.inner.target_y.get())
    }

    pub fn phase(&self) -> Phase {
        self.inner.phase.get()
    }
}

impl Drop for Momentum {
    fn drop(&mut self) {
        self.destroy();
    }
}
