//! Headless Momentum demo.
//!
//! Builds an engine over a synthetic pointer surface, performs one flick
//! across a bounded canvas, and pumps the frame loop in real time (timer
//! fallback, ~60 fps) until the target settles. The trajectory is logged.

use std::rc::Rc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::Result;

use momentum::{AxisBounds, Momentum, Phase};
use momentum_core::{
    Clock, DefaultScheduler, FrameLoop, MonotonicClock, PointerEvent, PointerEventKind,
    PointerHandler, PointerId, PointerSource, SubscriberSet, Subscription,
};

/// A stand-in for a real input surface: events are produced by the demo
/// script instead of a windowing system.
#[derive(Default)]
struct DemoSurface {
    press: SubscriberSet,
    motion: SubscriberSet,
}

impl DemoSurface {
    fn emit(&self, kind: PointerEventKind, x: f32, y: f32, time_ms: u64) {
        let event = PointerEvent::new(kind, x, y, PointerId::Mouse, time_ms);
        match kind {
            PointerEventKind::Down => self.press.emit(&event),
            _ => self.motion.emit(&event),
        }
    }
}

impl PointerSource for DemoSurface {
    fn subscribe_press(&self, handler: PointerHandler) -> Subscription {
        self.press.subscribe(handler)
    }

    fn subscribe_motion(&self, handler: PointerHandler) -> Subscription {
        self.motion.subscribe(handler)
    }
}

const FRAME: Duration = Duration::from_millis(16);

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let clock = MonotonicClock::new();
    let frame_loop = FrameLoop::new(Arc::new(DefaultScheduler));
    let surface: Rc<DemoSurface> = Rc::new(DemoSurface::default());

    let engine = Momentum::builder()
        .source(surface.clone())
        .bound_x(AxisBounds::new(0.0, 400.0))
        .bound_y(AxisBounds::new(0.0, 300.0))
        .initial_values(200.0, 150.0)
        .on_update(|x, y, prev_x, prev_y| {
            let dx = prev_x.map(|prev| x - prev).unwrap_or(0.0);
            let dy = prev_y.map(|prev| y - prev).unwrap_or(0.0);
            log::info!("target ({x:7.2}, {y:7.2})  delta ({dx:+6.2}, {dy:+6.2})");
        })
        .on_start(|_, _, _, _| log::info!("drag started"))
        .on_start_decelerating(|_, _, _, _| log::info!("released, settling"))
        .on_end_decelerating(|x, y, _, _| log::info!("settled at ({x:.2}, {y:.2})"))
        .build(frame_loop.frame_clock())?;

    // Flick: press, sweep right-and-down over ~5 frames, release.
    let handle = frame_loop.handle();
    surface.emit(PointerEventKind::Down, 100.0, 100.0, clock.now_ms());
    for step in 1..=5 {
        let x = 100.0 + 30.0 * step as f32;
        let y = 100.0 + 10.0 * step as f32;
        surface.emit(PointerEventKind::Move, x, y, clock.now_ms());
        thread::sleep(FRAME);
        handle.drain_frame_callbacks(clock.now_ms());
    }
    surface.emit(PointerEventKind::Up, 250.0, 150.0, clock.now_ms());

    // Timer-fallback frame pump until the animation rests.
    while frame_loop.needs_frame() {
        thread::sleep(FRAME);
        handle.drain_frame_callbacks(clock.now_ms());
    }

    debug_assert_eq!(engine.phase(), Phase::Idle);
    let (x, y) = engine.position();
    log::info!("final position ({x:.2}, {y:.2})");
    engine.destroy();

    Ok(())
}
