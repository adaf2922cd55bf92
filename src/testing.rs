// Test doubles: a scheduler driven by a virtual clock and a surface that
// records draw calls instead of painting.

use crate::color::Color;
use crate::scheduler::Scheduler;
use crate::surface::{Surface, Viewport};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use vecmath::Vector2;

type Callback = Box<dyn FnOnce()>;

#[derive(Default)]
pub struct ManualScheduler {
    now: Cell<u64>,
    next_id: Cell<u64>,
    frames: RefCell<Vec<(u64, Callback)>>,
    timers: RefCell<Vec<(u64, u64, Callback)>>,
    requested_frames: Cell<usize>,
    cancelled_frames: Cell<usize>,
    cleared_timers: Cell<usize>,
}

impl ManualScheduler {
    fn next_id(&self) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }

    /// Runs every frame callback queued so far. Frames requested by those
    /// callbacks wait for the next call.
    pub fn run_frame(&self) -> usize {
        let due: Vec<_> = self.frames.borrow_mut().drain(..).collect();
        let count = due.len();
        for (_, callback) in due {
            callback();
        }
        count
    }

    /// Moves the clock forward, firing timers as they come due.
    pub fn advance(&self, millis: u64) {
        let target = self.now.get() + millis;
        loop {
            let next = {
                let mut timers = self.timers.borrow_mut();
                let idx = timers
                    .iter()
                    .enumerate()
                    .filter(|(_, (_, due, _))| *due <= target)
                    .min_by_key(|(_, (_, due, _))| *due)
                    .map(|(idx, _)| idx);
                idx.map(|idx| timers.remove(idx))
            };
            match next {
                Some((_, due, callback)) => {
                    self.now.set(due);
                    callback();
                }
                None => break,
            }
        }
        self.now.set(target);
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.borrow().len()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.borrow().len()
    }

    pub fn requested_frames(&self) -> usize {
        self.requested_frames.get()
    }

    pub fn cancelled_frames(&self) -> usize {
        self.cancelled_frames.get()
    }

    pub fn cleared_timers(&self) -> usize {
        self.cleared_timers.get()
    }
}

impl Scheduler for ManualScheduler {
    type Frame = u64;
    type Timer = u64;

    fn request_frame(&self, callback: Callback) -> u64 {
        let id = self.next_id();
        self.requested_frames.set(self.requested_frames.get() + 1);
        self.frames.borrow_mut().push((id, callback));
        id
    }

    fn cancel_frame(&self, frame: u64) {
        self.cancelled_frames.set(self.cancelled_frames.get() + 1);
        self.frames.borrow_mut().retain(|(id, _)| *id != frame);
    }

    fn set_timeout(&self, millis: u32, callback: Callback) -> u64 {
        let id = self.next_id();
        let due = self.now.get() + millis as u64;
        self.timers.borrow_mut().push((id, due, callback));
        id
    }

    fn clear_timeout(&self, timer: u64) {
        self.cleared_timers.set(self.cleared_timers.get() + 1);
        self.timers.borrow_mut().retain(|(id, _, _)| *id != timer);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
    Clear(f64, f64),
    Line {
        from: Vector2<f64>,
        to: Vector2<f64>,
        color: Color,
        line_width: f64,
    },
    Circle {
        center: Vector2<f64>,
        radius: f64,
        color: Color,
    },
}

/// Cloneable handle; clones share the viewport and the call log.
#[derive(Clone)]
pub struct RecordingSurface {
    viewport: Rc<Cell<Viewport>>,
    calls: Rc<RefCell<Vec<DrawCall>>>,
    resizes: Rc<Cell<usize>>,
}

impl RecordingSurface {
    pub fn new(width: f64, height: f64) -> Self {
        RecordingSurface {
            viewport: Rc::new(Cell::new(Viewport {
                width,
                height,
                pixel_ratio: 1.0,
            })),
            calls: Rc::new(RefCell::new(Vec::new())),
            resizes: Rc::new(Cell::new(0)),
        }
    }

    pub fn set_size(&self, width: f64, height: f64) {
        let mut viewport = self.viewport.get();
        viewport.width = width;
        viewport.height = height;
        self.viewport.set(viewport);
    }

    pub fn take_calls(&self) -> Vec<DrawCall> {
        self.calls.borrow_mut().drain(..).collect()
    }

    pub fn resizes(&self) -> usize {
        self.resizes.get()
    }
}

impl Surface for RecordingSurface {
    fn measure(&self) -> Viewport {
        self.viewport.get()
    }

    fn resize_backing(&mut self, _viewport: Viewport) {
        self.resizes.set(self.resizes.get() + 1);
    }

    fn clear(&mut self, width: f64, height: f64) {
        self.calls.borrow_mut().push(DrawCall::Clear(width, height));
    }

    fn stroke_line(&mut self, from: Vector2<f64>, to: Vector2<f64>, color: Color, line_width: f64) {
        self.calls.borrow_mut().push(DrawCall::Line {
            from,
            to,
            color,
            line_width,
        });
    }

    fn fill_circle(&mut self, center: Vector2<f64>, radius: f64, color: Color) {
        self.calls.borrow_mut().push(DrawCall::Circle {
            center,
            radius,
            color,
        });
    }
}
