//! Frame callback queue driven by an injected scheduler.
//!
//! The host owns the actual frame cadence: it calls
//! [`FrameLoopHandle::drain_frame_callbacks`] once per animation frame (or
//! per timer tick when no display callback is available) with the current
//! monotonic time in milliseconds. Registered callbacks are one-shot; code
//! that wants a callback every frame re-registers from inside the callback.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};
use std::sync::Arc;

use crate::frame_clock::FrameClock;
use crate::platform::FrameScheduler;

/// Identifier for a registered frame callback.
pub type FrameCallbackId = u64;

struct FrameCallbackEntry {
    id: FrameCallbackId,
    callback: Option<Box<dyn FnOnce(u64) + 'static>>,
}

struct FrameLoopInner {
    scheduler: Arc<dyn FrameScheduler>,
    needs_frame: Cell<bool>,
    frame_callbacks: RefCell<VecDeque<FrameCallbackEntry>>,
    next_frame_callback_id: Cell<u64>,
}

impl FrameLoopInner {
    fn new(scheduler: Arc<dyn FrameScheduler>) -> Self {
        Self {
            scheduler,
            needs_frame: Cell::new(false),
            frame_callbacks: RefCell::new(VecDeque::new()),
            next_frame_callback_id: Cell::new(1),
        }
    }

    fn schedule(&self) {
        self.needs_frame.set(true);
        self.scheduler.schedule_frame();
    }

    fn register_frame_callback(&self, callback: Box<dyn FnOnce(u64) + 'static>) -> FrameCallbackId {
        let id = self.next_frame_callback_id.get();
        self.next_frame_callback_id.set(id + 1);
        self.frame_callbacks
            .borrow_mut()
            .push_back(FrameCallbackEntry {
                id,
                callback: Some(callback),
            });
        self.schedule();
        id
    }

    fn cancel_frame_callback(&self, id: FrameCallbackId) {
        let mut callbacks = self.frame_callbacks.borrow_mut();
        if let Some(index) = callbacks.iter().position(|entry| entry.id == id) {
            callbacks.remove(index);
        }
        if callbacks.is_empty() {
            self.needs_frame.set(false);
        }
    }

    fn has_frame_callbacks(&self) -> bool {
        !self.frame_callbacks.borrow().is_empty()
    }

    fn drain_frame_callbacks(&self, now_ms: u64) {
        // Callbacks registered while draining run on the NEXT frame, so the
        // pending set is taken up front.
        let mut callbacks = self.frame_callbacks.borrow_mut();
        let mut pending: Vec<Box<dyn FnOnce(u64) + 'static>> = Vec::with_capacity(callbacks.len());
        while let Some(mut entry) = callbacks.pop_front() {
            if let Some(callback) = entry.callback.take() {
                pending.push(callback);
            }
        }
        drop(callbacks);
        for callback in pending {
            callback(now_ms);
        }
        if !self.has_frame_callbacks() {
            self.needs_frame.set(false);
        }
    }
}

/// Owner of the frame callback queue.
///
/// Hosts create one `FrameLoop`, keep it alive for the life of the surface,
/// and hand out [`FrameLoopHandle`]s to everything that needs per-frame
/// callbacks. Handles are weak: once the loop is dropped every operation on
/// a handle degrades to a no-op, so a stale callback can never observe a
/// torn-down loop.
pub struct FrameLoop {
    inner: Rc<FrameLoopInner>,
}

impl FrameLoop {
    pub fn new(scheduler: Arc<dyn FrameScheduler>) -> Self {
        Self {
            inner: Rc::new(FrameLoopInner::new(scheduler)),
        }
    }

    pub fn handle(&self) -> FrameLoopHandle {
        FrameLoopHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Whether any callback is waiting for a frame.
    pub fn needs_frame(&self) -> bool {
        self.inner.needs_frame.get()
    }

    pub fn frame_clock(&self) -> FrameClock {
        FrameClock::new(self.handle())
    }
}

/// Weak reference to a [`FrameLoop`].
#[derive(Clone)]
pub struct FrameLoopHandle {
    inner: Weak<FrameLoopInner>,
}

impl FrameLoopHandle {
    /// Registers a one-shot callback for the next frame drain.
    ///
    /// Returns `None` when the loop is gone.
    pub fn register_frame_callback(
        &self,
        callback: impl FnOnce(u64) + 'static,
    ) -> Option<FrameCallbackId> {
        self.inner
            .upgrade()
            .map(|inner| inner.register_frame_callback(Box::new(callback)))
    }

    pub fn cancel_frame_callback(&self, id: FrameCallbackId) {
        if let Some(inner) = self.inner.upgrade() {
            inner.cancel_frame_callback(id);
        }
    }

    /// Runs every pending callback with the current time in milliseconds.
    pub fn drain_frame_callbacks(&self, now_ms: u64) {
        if let Some(inner) = self.inner.upgrade() {
            inner.drain_frame_callbacks(now_ms);
        }
    }

    pub fn has_frame_callbacks(&self) -> bool {
        self.inner
            .upgrade()
            .map(|inner| inner.has_frame_callbacks())
            .unwrap_or(false)
    }

    pub fn frame_clock(&self) -> FrameClock {
        FrameClock::new(self.clone())
    }
}

/// Scheduler for hosts that poll [`FrameLoop::needs_frame`] themselves.
#[derive(Default)]
pub struct DefaultScheduler;

impl FrameScheduler for DefaultScheduler {
    fn schedule_frame(&self) {}
}
