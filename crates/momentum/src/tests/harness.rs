//! Shared rig for engine tests: scripted source, manual frames, and a
//! recorder capturing every callback invocation.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use momentum_testing::{ManualFrameDriver, ScriptedPointerSource};

use crate::builder::MomentumBuilder;
use crate::engine::Momentum;

#[derive(Default)]
pub struct Recorder {
    pub updates: RefCell<Vec<(f32, f32, Option<f32>, Option<f32>)>>,
    pub starts: Cell<u32>,
    pub decel_starts: Cell<u32>,
    pub decel_ends: Cell<u32>,
}

impl Recorder {
    pub fn update_xs(&self) -> Vec<f32> {
        self.updates.borrow().iter().map(|(x, _, _, _)| *x).collect()
    }

    pub fn last_update(&self) -> Option<(f32, f32, Option<f32>, Option<f32>)> {
        self.updates.borrow().last().copied()
    }
}

pub struct Rig {
    pub source: Rc<ScriptedPointerSource>,
    pub driver: ManualFrameDriver,
    pub recorder: Rc<Recorder>,
    pub engine: Momentum,
}

/// Builds an engine wired to fresh test doubles. The workaround install is
/// disabled here because its guard is process-wide; the one test that
/// covers it opts back in.
pub fn rig_with(configure: impl FnOnce(MomentumBuilder) -> MomentumBuilder) -> Rig {
    let source = ScriptedPointerSource::new();
    let driver = ManualFrameDriver::new();
    let recorder = Rc::new(Recorder::default());

    let on_update_rec = Rc::clone(&recorder);
    let on_start_rec = Rc::clone(&recorder);
    let decel_start_rec = Rc::clone(&recorder);
    let decel_end_rec = Rc::clone(&recorder);

    let builder = Momentum::builder()
        .source(source.clone())
        .touch_scroll_fix(false)
        .on_update(move |x, y, prev_x, prev_y| {
            on_update_rec.updates.borrow_mut().push((x, y, prev_x, prev_y));
        })
        .on_start(move |_, _, _, _| on_start_rec.starts.set(on_start_rec.starts.get() + 1))
        .on_start_decelerating(move |_, _, _, _| {
            decel_start_rec
                .decel_starts
                .set(decel_start_rec.decel_starts.get() + 1)
        })
        .on_end_decelerating(move |_, _, _, _| {
            decel_end_rec
                .decel_ends
                .set(decel_end_rec.decel_ends.get() + 1)
        });

    let engine = configure(builder)
        .build(driver.clock())
        .expect("rig configuration is valid");

    Rig {
        source,
        driver,
        recorder,
        engine,
    }
}

pub fn rig() -> Rig {
    rig_with(|builder| builder)
}
