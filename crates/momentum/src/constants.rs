//! Shared tuning constants for drag and settle behavior.
//!
//! These values are in logical pixels and milliseconds. They were tuned
//! together: the stop threshold scales with the drag multiplier so a more
//! sensitive surface also settles proportionally later, and the bounce
//! coefficients assume velocities produced by the release computation in
//! [`crate::tracking`].

/// Only pointer samples from the last 100 ms participate in the release
/// velocity. Older samples describe a part of the gesture the user has
/// already moved past and would dilute a late direction change.
pub const SAMPLE_WINDOW_MS: u64 = 100;

/// Divisor turning the sample window's elapsed milliseconds into the
/// per-frame time base of the integrator (one step ≈ 15 ms of gesture).
pub const VELOCITY_TIME_DIVISOR: f32 = 15.0;

/// Base stop threshold in pixels per frame; multiplied by the configured
/// drag multiplier to form the actual settle cutoff.
pub const STOP_THRESHOLD_BASE: f32 = 0.3;

/// Minimum release velocity (either axis, px per frame) that starts a
/// deceleration animation. Slower releases settle immediately.
pub const DECEL_TRIGGER_VELOCITY: f32 = 1.0;

/// Pull-back applied per frame while moving deeper into a violated bound,
/// proportional to the distance outside.
pub const BOUNCE_DECELERATION: f32 = 0.04;

/// Spring coefficient applied once motion at a violated bound has reversed,
/// producing the rebound kick toward the boundary.
pub const BOUNCE_ACCELERATION: f32 = 0.11;

/// Offset (px) added to the boundary distance when computing the rebound
/// kick, signed away from the boundary so small overshoots still rebound.
pub const REBOUND_ADJUST: f32 = 2.5;

/// Default drag sensitivity.
pub const DEFAULT_MULTIPLIER: f32 = 1.0;

/// Default per-frame velocity decay factor.
pub const DEFAULT_FRICTION: f32 = 0.92;
