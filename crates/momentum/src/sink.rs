//! Observer callbacks notified as the target position evolves.

/// Callback payload: current x/y plus the previously notified pair.
///
/// The previous values start as `None` and are advanced to the just-emitted
/// position immediately after every update, so observers can compute deltas
/// without holding their own copy of the state.
pub type PositionCallback = Box<dyn Fn(f32, f32, Option<f32>, Option<f32>)>;

/// The set of observer hooks for one engine instance.
///
/// `on_update` is the contract; the transition hooks are optional extras
/// fired at phase boundaries with the same payload.
pub struct UpdateSink {
    pub(crate) on_update: PositionCallback,
    pub(crate) on_start: Option<PositionCallback>,
    pub(crate) on_start_decelerating: Option<PositionCallback>,
    pub(crate) on_end_decelerating: Option<PositionCallback>,
}

impl UpdateSink {
    pub(crate) fn update(&self, x: f32, y: f32, prev_x: Option<f32>, prev_y: Option<f32>) {
        (self.on_update)(x, y, prev_x, prev_y);
    }

    pub(crate) fn start(&self, x: f32, y: f32, prev_x: Option<f32>, prev_y: Option<f32>) {
        if let Some(callback) = &self.on_start {
            callback(x, y, prev_x, prev_y);
        }
    }

    pub(crate) fn start_decelerating(&self, x: f32, y: f32, prev_x: Option<f32>, prev_y: Option<f32>) {
        if let Some(callback) = &self.on_start_decelerating {
            callback(x, y, prev_x, prev_y);
        }
    }

    pub(crate) fn end_decelerating(&self, x: f32, y: f32, prev_x: Option<f32>, prev_y: Option<f32>) {
        if let Some(callback) = &self.on_end_decelerating {
            callback(x, y, prev_x, prev_y);
        }
    }
}
