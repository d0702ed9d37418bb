//! Normalized pointer events and the source collaborator trait.
//!
//! Hosts translate their native input (touch, mouse, pointer events) into
//! this shape before the engine sees anything. The engine never branches on
//! the input device; the only device-derived fact it keeps is the
//! [`PointerId`] used to ignore secondary touch points.

use smallvec::SmallVec;
use std::cell::RefCell;
use std::rc::Rc;

/// Identity of the pointer that produced an event.
///
/// Mouse events all share one identity; each touch contact carries the
/// host-assigned identifier of that contact.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerId {
    Mouse,
    Touch(u64),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEventKind {
    Down,
    Move,
    Up,
    Cancel,
}

/// A normalized pointer observation.
#[derive(Clone, Copy, Debug)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub x: f32,
    pub y: f32,
    pub pointer: PointerId,
    /// Monotonic timestamp in milliseconds, stamped by the host.
    pub time_ms: u64,
}

impl PointerEvent {
    pub fn new(kind: PointerEventKind, x: f32, y: f32, pointer: PointerId, time_ms: u64) -> Self {
        Self {
            kind,
            x,
            y,
            pointer,
            time_ms,
        }
    }
}

/// Handler invoked for each delivered pointer event.
pub type PointerHandler = Rc<dyn Fn(&PointerEvent)>;

/// The element (and its surrounding window) the engine observes.
///
/// Press events are scoped to the element itself; the motion stream is the
/// wider window-level move/up/cancel feed that a drag follows even after
/// the pointer leaves the element. Subscriptions are transient by design:
/// the engine only holds a motion subscription while a drag is active.
pub trait PointerSource {
    /// Subscribe to down events on the source element.
    fn subscribe_press(&self, handler: PointerHandler) -> Subscription;

    /// Subscribe to the window-scoped move/up/cancel stream.
    fn subscribe_motion(&self, handler: PointerHandler) -> Subscription;

    /// Capability cast for the global scroll-prevention workaround.
    fn as_touch_scroll_fix(&self) -> Option<&dyn crate::platform::TouchScrollFix> {
        None
    }
}

/// Unsubscribes the associated handler when dropped.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A subscription with nothing to tear down.
    pub fn inactive() -> Self {
        Self { cancel: None }
    }

    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

/// Dispatch helper for [`PointerSource`] implementors.
///
/// An engine instance holds at most one press and one motion subscription,
/// so the inline capacity covers the common case without heap allocation.
#[derive(Clone, Default)]
pub struct SubscriberSet {
    inner: Rc<RefCell<SubscriberSetInner>>,
}

#[derive(Default)]
struct SubscriberSetInner {
    entries: SmallVec<[(u64, PointerHandler); 2]>,
    next_id: u64,
}

impl SubscriberSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a handler and returns a guard that removes it again.
    pub fn subscribe(&self, handler: PointerHandler) -> Subscription {
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.entries.push((id, handler));
            id
        };
        let weak = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.borrow_mut().entries.retain(|(entry_id, _)| *entry_id != id);
            }
        })
    }

    /// Delivers an event to every current subscriber.
    pub fn emit(&self, event: &PointerEvent) {
        // Snapshot so a handler may unsubscribe (or subscribe) re-entrantly.
        let handlers: SmallVec<[PointerHandler; 2]> = self
            .inner
            .borrow()
            .entries
            .iter()
            .map(|(_, handler)| Rc::clone(handler))
            .collect();
        for handler in handlers {
            handler(event);
        }
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().entries.is_empty()
    }
}
