//! Clock façade over the frame loop with RAII callback registrations.

use crate::frame_loop::{FrameCallbackId, FrameLoopHandle};

/// Hands out single-frame callbacks tied to a [`FrameLoop`](crate::FrameLoop).
#[derive(Clone)]
pub struct FrameClock {
    handle: FrameLoopHandle,
}

impl FrameClock {
    pub fn new(handle: FrameLoopHandle) -> Self {
        Self { handle }
    }

    pub fn loop_handle(&self) -> FrameLoopHandle {
        self.handle.clone()
    }

    /// Schedules `callback` for the next frame, passing the frame time in
    /// milliseconds. Dropping the returned registration cancels it.
    pub fn with_frame_millis(
        &self,
        callback: impl FnOnce(u64) + 'static,
    ) -> FrameCallbackRegistration {
        match self.handle.register_frame_callback(callback) {
            Some(id) => FrameCallbackRegistration::new(self.handle.clone(), id),
            None => FrameCallbackRegistration::inactive(self.handle.clone()),
        }
    }
}

/// Keeps a scheduled frame callback alive; dropping it cancels the callback.
pub struct FrameCallbackRegistration {
    handle: FrameLoopHandle,
    id: Option<FrameCallbackId>,
}

impl FrameCallbackRegistration {
    fn new(handle: FrameLoopHandle, id: FrameCallbackId) -> Self {
        Self {
            handle,
            id: Some(id),
        }
    }

    fn inactive(handle: FrameLoopHandle) -> Self {
        Self { handle, id: None }
    }

    pub fn cancel(mut self) {
        if let Some(id) = self.id.take() {
            self.handle.cancel_frame_callback(id);
        }
    }
}

impl Drop for FrameCallbackRegistration {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            self.handle.cancel_frame_callback(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame_loop::{DefaultScheduler, FrameLoop};
    use std::cell::Cell;
    use std::rc::Rc;
    use std::sync::Arc;

    #[test]
    fn dropped_registration_cancels_callback() {
        let frame_loop = FrameLoop::new(Arc::new(DefaultScheduler));
        let clock = frame_loop.frame_clock();
        let fired = Rc::new(Cell::new(false));

        let fired_in_cb = Rc::clone(&fired);
        let registration = clock.with_frame_millis(move |_| fired_in_cb.set(true));
        drop(registration);

        frame_loop.handle().drain_frame_callbacks(16);
        assert!(!fired.get());
    }

    #[test]
    fn registration_after_fire_is_harmless_to_drop() {
        let frame_loop = FrameLoop::new(Arc::new(DefaultScheduler));
        let clock = frame_loop.frame_clock();
        let seen = Rc::new(Cell::new(0u64));

        let seen_in_cb = Rc::clone(&seen);
        let registration = clock.with_frame_millis(move |now| seen_in_cb.set(now));
        frame_loop.handle().drain_frame_callbacks(42);
        assert_eq!(seen.get(), 42);

        // The id now refers to a consumed entry; cancel must be a no-op.
        drop(registration);
    }
}
