//! Construction-time configuration.

use std::rc::Rc;

use momentum_core::{FrameClock, PointerSource};

use crate::bounds::AxisBounds;
use crate::constants::{DEFAULT_FRICTION, DEFAULT_MULTIPLIER};
use crate::engine::Momentum;
use crate::sink::PositionCallback;

/// Fatal construction-time failures. There is no runtime error channel:
/// once built, every numeric edge case is absorbed by the motion policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MomentumError {
    /// No pointer source was provided (or the host failed to resolve one).
    SourceMissing,
    /// The required `on_update` callback was not provided.
    UpdateCallbackMissing,
}

impl std::fmt::Display for MomentumError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MomentumError::SourceMissing => write!(f, "pointer source not found"),
            MomentumError::UpdateCallbackMissing => write!(f, "on_update callback not defined"),
        }
    }
}

impl std::error::Error for MomentumError {}

/// Configures and creates a [`Momentum`] instance.
///
/// Every option is independent; `source` and `on_update` are required and
/// their absence fails [`build`](Self::build) with no partial instance.
pub struct MomentumBuilder {
    pub(crate) source: Option<Rc<dyn PointerSource>>,
    pub(crate) on_update: Option<PositionCallback>,
    pub(crate) on_start: Option<PositionCallback>,
    pub(crate) on_start_decelerating: Option<PositionCallback>,
    pub(crate) on_end_decelerating: Option<PositionCallback>,
    pub(crate) multiplier: f32,
    pub(crate) friction: f32,
    pub(crate) initial_values: Option<(f32, f32)>,
    pub(crate) bound_x: AxisBounds,
    pub(crate) bound_y: AxisBounds,
    pub(crate) bounce: bool,
    pub(crate) touch_scroll_fix: bool,
}

impl Default for MomentumBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MomentumBuilder {
    pub fn new() -> Self {
        Self {
            source: None,
            on_update: None,
            on_start: None,
            on_start_decelerating: None,
            on_end_decelerating: None,
            multiplier: DEFAULT_MULTIPLIER,
            friction: DEFAULT_FRICTION,
            initial_values: None,
            bound_x: AxisBounds::UNBOUNDED,
            bound_y: AxisBounds::UNBOUNDED,
            bounce: true,
            touch_scroll_fix: true,
        }
    }

    /// The element to observe for presses. Required.
    pub fn source(mut self, source: Rc<dyn PointerSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Primary notification callback, fired on every target change. Required.
    pub fn on_update(mut self, callback: impl Fn(f32, f32, Option<f32>, Option<f32>) + 'static) -> Self {
        self.on_update = Some(Box::new(callback));
        self
    }

    /// Fired when a drag begins.
    pub fn on_start(mut self, callback: impl Fn(f32, f32, Option<f32>, Option<f32>) + 'static) -> Self {
        self.on_start = Some(Box::new(callback));
        self
    }

    /// Fired when a release hands the target to the settle animation.
    pub fn on_start_decelerating(
        mut self,
        callback: impl Fn(f32, f32, Option<f32>, Option<f32>) + 'static,
    ) -> Self {
        self.on_start_decelerating = Some(Box::new(callback));
        self
    }

    /// Fired once motion is negligible and in bounds.
    pub fn on_end_decelerating(
        mut self,
        callback: impl Fn(f32, f32, Option<f32>, Option<f32>) + 'static,
    ) -> Self {
        self.on_end_decelerating = Some(Box::new(callback));
        self
    }

    /// Drag sensitivity; also scales the settle threshold. Default 1.0.
    pub fn multiplier(mut self, multiplier: f32) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Per-frame velocity decay factor in (0, 1). Default 0.92.
    pub fn friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    /// Seed target position; emits one synchronous update at build time.
    pub fn initial_values(mut self, x: f32, y: f32) -> Self {
        self.initial_values = Some((x, y));
        self
    }

    pub fn bound_x(mut self, bounds: AxisBounds) -> Self {
        self.bound_x = bounds;
        self
    }

    pub fn bound_y(mut self, bounds: AxisBounds) -> Self {
        self.bound_y = bounds;
        self
    }

    /// Elastic rebound at the bounds (default) vs. hard clamping.
    pub fn bounce(mut self, bounce: bool) -> Self {
        self.bounce = bounce;
        self
    }

    /// Whether to install the process-wide touch scroll workaround if the
    /// source exposes that capability. Default true.
    pub fn touch_scroll_fix(mut self, install: bool) -> Self {
        self.touch_scroll_fix = install;
        self
    }

    /// Validates the configuration and attaches a live engine instance to
    /// the source, driven by `clock`.
    pub fn build(self, clock: FrameClock) -> Result<Momentum, MomentumError> {
        Momentum::from_builder(self, clock)
    }
}
