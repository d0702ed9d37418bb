//! Flick-and-settle motion for UI surfaces.
//!
//! Momentum tracks a pointer drag over an element, converts the gesture
//! into a 2D target position, and after release animates that position
//! through velocity decay with optional elastic boundary rebound. Widgets
//! (carousels, pannable canvases, custom scrollbars) consume a continuously
//! updated `(x, y)` pair through callbacks and never poll.
//!
//! The engine is platform-blind: pointer events arrive already normalized
//! through a [`momentum_core::PointerSource`], and per-frame steps run on
//! an injected [`momentum_core::FrameClock`]. See `momentum-testing` for a
//! harness that drives both by hand.
//!
//! ```no_run
//! use momentum::Momentum;
//! # fn demo(source: std::rc::Rc<dyn momentum_core::PointerSource>,
//! #         clock: momentum_core::FrameClock) {
//! let engine = Momentum::builder()
//!     .source(source)
//!     .on_update(|x, y, _prev_x, _prev_y| {
//!         // apply (x, y) to the widget
//!         let _ = (x, y);
//!     })
//!     .friction(0.92)
//!     .build(clock)
//!     .expect("source and on_update are set");
//! # let _ = engine;
//! # }
//! ```

pub mod bounds;
pub mod builder;
pub mod constants;
mod engine;
pub mod sink;
pub mod tracking;

#[cfg(test)]
mod tests;

pub use bounds::{overdrag_resistance, rebound_velocity, AxisBounds, Excess};
pub use builder::{MomentumBuilder, MomentumError};
pub use engine::{Momentum, Phase, PrevUpdate};
pub use sink::PositionCallback;
pub use tracking::{SampleBuffer, Velocity};
