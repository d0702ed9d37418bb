//! Core primitives for Momentum: frame scheduling and pointer input.
//!
//! The engine in the `momentum` crate is deliberately platform-blind. It
//! consumes two capabilities that hosts (or tests) inject through this crate:
//!
//! - a per-frame scheduling primitive ([`FrameLoop`] + [`FrameClock`]), so
//!   the physics can run one step per animation frame without knowing
//!   whether frames come from a display callback or a timer fallback;
//! - a normalized pointer stream ([`PointerSource`] + [`PointerEvent`]),
//!   so touch/mouse shape differences never reach the physics.

pub mod events;
pub mod frame_clock;
pub mod frame_loop;
pub mod platform;
pub mod time;

pub use events::{
    PointerEvent, PointerEventKind, PointerHandler, PointerId, PointerSource, SubscriberSet,
    Subscription,
};
pub use frame_clock::{FrameCallbackRegistration, FrameClock};
pub use frame_loop::{DefaultScheduler, FrameCallbackId, FrameLoop, FrameLoopHandle};
pub use platform::{install_touch_scroll_fix, FrameScheduler, TouchScrollFix};
pub use time::{Clock, MonotonicClock};
