//! Platform abstraction traits for Momentum's runtime services.
//!
//! These traits let Momentum delegate frame scheduling and platform
//! workarounds to the host, enabling integration with different
//! environments (display-driven frame callbacks, timer fallbacks, test
//! drivers) without depending on any of them directly.

use std::sync::atomic::{AtomicBool, Ordering};

/// Schedules frame processing on behalf of Momentum.
///
/// Implementations are responsible for arranging that
/// [`FrameLoopHandle::drain_frame_callbacks`](crate::FrameLoopHandle::drain_frame_callbacks)
/// gets called again. They must be safe to use from multiple threads.
pub trait FrameScheduler: Send + Sync {
    /// Request that the host schedule a new frame.
    fn schedule_frame(&self);
}

/// Host capability for the mobile-browser scroll-prevention workaround.
///
/// Some touch hosts swallow `preventDefault` on move events unless a passive
/// no-op listener is registered at the top level first. The listener is
/// harmless but global, so it is installed at most once per process no
/// matter how many engine instances are created.
pub trait TouchScrollFix {
    /// Register the passive no-op move listener on the host.
    fn install_workaround(&self);
}

static TOUCH_SCROLL_FIX_INSTALLED: AtomicBool = AtomicBool::new(false);

/// Installs the scroll-prevention workaround exactly once per process.
///
/// Returns `true` if this call performed the install, `false` if a previous
/// call (from any instance) already did.
pub fn install_touch_scroll_fix(fix: &dyn TouchScrollFix) -> bool {
    if TOUCH_SCROLL_FIX_INSTALLED.swap(true, Ordering::SeqCst) {
        return false;
    }
    fix.install_workaround();
    log::debug!("touch scroll workaround installed");
    true
}
