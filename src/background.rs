// The mountable particle background: owns one surface, one field and one
// frame loop. All state lives in the instance, two mounted backgrounds share
// nothing.

use crate::field::ParticleField;
use crate::scheduler::{Debounce, Scheduler};
use crate::surface::Surface;
use rand::Rng;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::{debug, trace_span};

pub const RESIZE_DEBOUNCE_MS: u32 = 100;

struct State<Sf, S: Scheduler, R> {
    surface: Sf,
    rng: R,
    field: ParticleField,
    frame: Option<S::Frame>,
    resize: Debounce<S>,
    cancelled: bool,
    layouts: usize,
}

struct Shared<Sf, S: Scheduler, R> {
    scheduler: S,
    state: RefCell<State<Sf, S, R>>,
}

/// Handle to a mounted background. Clones refer to the same instance.
pub struct ParticleBackground<Sf, S: Scheduler, R> {
    shared: Rc<Shared<Sf, S, R>>,
}

impl<Sf, S: Scheduler, R> Clone for ParticleBackground<Sf, S, R> {
    fn clone(&self) -> Self {
        ParticleBackground {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<Sf, S, R> ParticleBackground<Sf, S, R>
where
    Sf: Surface + 'static,
    S: Scheduler + 'static,
    R: Rng + 'static,
{
    /// Lays out the field for the surface's current size and starts the frame loop.
    pub fn mount(surface: Sf, scheduler: S, rng: R) -> Self {
        let shared = Rc::new(Shared {
            scheduler,
            state: RefCell::new(State {
                surface,
                rng,
                field: ParticleField::new(),
                frame: None,
                resize: Debounce::new(RESIZE_DEBOUNCE_MS),
                cancelled: false,
                layouts: 0,
            }),
        });
        shared.layout();
        Shared::request_frame(&shared);
        debug!("particle background mounted");

        ParticleBackground { shared }
    }

    /// Viewport changed. The field is rebuilt once things have been quiet for
    /// `RESIZE_DEBOUNCE_MS`.
    pub fn resized(&self) {
        let weak: Weak<Shared<Sf, S, R>> = Rc::downgrade(&self.shared);
        let mut state = self.shared.state.borrow_mut();
        if state.cancelled {
            return;
        }
        state.resize.trigger(
            &self.shared.scheduler,
            Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    shared.resize_elapsed();
                }
            }),
        );
    }

    /// Pointer position relative to the surface's top-left corner.
    pub fn pointer_moved(&self, x: f64, y: f64) {
        self.shared.state.borrow_mut().field.pointer_moved(x, y);
    }

    pub fn pointer_left(&self) {
        self.shared.state.borrow_mut().field.pointer_left();
    }

    /// Stops the loop and drops any pending resize. After this returns no
    /// frame or timer callback will touch the instance again.
    pub fn unmount(&self) {
        let mut state = self.shared.state.borrow_mut();
        if state.cancelled {
            return;
        }
        state.cancelled = true;
        if let Some(frame) = state.frame.take() {
            self.shared.scheduler.cancel_frame(frame);
        }
        state.resize.cancel(&self.shared.scheduler);
        debug!("particle background unmounted");
    }

    pub fn is_running(&self) -> bool {
        !self.shared.state.borrow().cancelled
    }

    pub fn particle_count(&self) -> usize {
        self.shared.state.borrow().field.particles().len()
    }

    /// How many times the field has been laid out (mount plus settled resizes).
    pub fn layouts(&self) -> usize {
        self.shared.state.borrow().layouts
    }
}

impl<Sf, S, R> Shared<Sf, S, R>
where
    Sf: Surface + 'static,
    S: Scheduler + 'static,
    R: Rng + 'static,
{
    fn layout(&self) {
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        let viewport = state.surface.measure();
        state.surface.resize_backing(viewport);
        state.field.populate(viewport.width, viewport.height, &mut state.rng);
        state.layouts += 1;
    }

    fn resize_elapsed(&self) {
        {
            let mut state = self.state.borrow_mut();
            if state.cancelled {
                return;
            }
            state.resize.elapsed();
        }
        self.layout();
    }

    fn request_frame(this: &Rc<Self>) {
        let mut state = this.state.borrow_mut();
        if state.cancelled {
            return;
        }
        let weak = Rc::downgrade(this);
        let frame = this.scheduler.request_frame(Box::new(move || {
            if let Some(shared) = weak.upgrade() {
                Shared::tick(&shared);
            }
        }));
        state.frame = Some(frame);
    }

    // One iteration of the loop: bail if cancelled, update + draw, ask for the next frame
    fn tick(this: &Rc<Self>) {
        {
            let mut guard = this.state.borrow_mut();
            if guard.cancelled {
                return;
            }
            guard.frame = None;

            let _span = trace_span!("frame").entered();
            let state = &mut *guard;
            let viewport = state.surface.measure();
            state.field.set_bounds(viewport.width, viewport.height);
            state.field.draw_frame(&mut state.surface, &mut state.rng);
        }
        Shared::request_frame(this);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{DrawCall, ManualScheduler, RecordingSurface};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    type TestBackground = ParticleBackground<RecordingSurface, Rc<ManualScheduler>, StdRng>;

    fn mounted(width: f64, height: f64) -> (TestBackground, RecordingSurface, Rc<ManualScheduler>) {
        let surface = RecordingSurface::new(width, height);
        let scheduler = Rc::new(ManualScheduler::default());
        let background = ParticleBackground::mount(
            surface.clone(),
            scheduler.clone(),
            StdRng::seed_from_u64(9),
        );
        (background, surface, scheduler)
    }

    #[test]
    fn mount_lays_out_and_schedules_one_frame() {
        let (background, surface, scheduler) = mounted(1000.0, 1000.0);
        assert_eq!(background.particle_count(), 66);
        assert_eq!(background.layouts(), 1);
        assert_eq!(surface.resizes(), 1);
        assert_eq!(scheduler.pending_frames(), 1);
        assert!(background.is_running());
    }

    #[test]
    fn each_frame_draws_and_requests_the_next() {
        let (background, surface, scheduler) = mounted(800.0, 600.0);
        for _ in 0..3 {
            assert_eq!(scheduler.run_frame(), 1);
        }
        assert_eq!(scheduler.pending_frames(), 1);
        assert_eq!(scheduler.requested_frames(), 4);

        let calls = surface.take_calls();
        let clears = calls
            .iter()
            .filter(|call| matches!(call, DrawCall::Clear(..)))
            .count();
        let circles = calls
            .iter()
            .filter(|call| matches!(call, DrawCall::Circle { .. }))
            .count();
        assert_eq!(clears, 3);
        assert_eq!(circles, 3 * 2 * background.particle_count());
    }

    #[test]
    fn rapid_resizes_rebuild_once() {
        let (background, surface, scheduler) = mounted(1000.0, 1000.0);
        surface.set_size(600.0, 500.0);
        background.resized();
        scheduler.advance(50);
        background.resized();
        scheduler.advance(99);
        assert_eq!(background.layouts(), 1);
        assert_eq!(background.particle_count(), 66);

        scheduler.advance(1);
        assert_eq!(background.layouts(), 2);
        assert_eq!(background.particle_count(), 20);
        assert_eq!(surface.resizes(), 2);

        scheduler.advance(1000);
        assert_eq!(background.layouts(), 2);
    }

    #[test]
    fn unmount_cancels_the_pending_frame_once() {
        let (background, _surface, scheduler) = mounted(800.0, 600.0);
        scheduler.run_frame();
        background.unmount();
        background.unmount();

        assert_eq!(scheduler.cancelled_frames(), 1);
        assert_eq!(scheduler.pending_frames(), 0);
        assert!(!background.is_running());
        assert_eq!(scheduler.run_frame(), 0);
    }

    #[test]
    fn unmount_drops_pending_resize() {
        let (background, surface, scheduler) = mounted(800.0, 600.0);
        surface.set_size(300.0, 300.0);
        background.resized();
        background.unmount();
        scheduler.advance(500);

        assert_eq!(scheduler.cleared_timers(), 1);
        assert_eq!(scheduler.pending_timers(), 0);
        assert_eq!(background.layouts(), 1);

        background.resized();
        assert_eq!(scheduler.pending_timers(), 0);
    }

    #[test]
    fn instances_are_independent() {
        let (first, _, first_scheduler) = mounted(1000.0, 1000.0);
        let (second, _, second_scheduler) = mounted(300.0, 300.0);
        first.pointer_moved(5.0, 5.0);
        first.unmount();

        assert!(second.is_running());
        assert_eq!(second.particle_count(), 6);
        assert_eq!(first_scheduler.pending_frames(), 0);
        assert_eq!(second_scheduler.run_frame(), 1);
    }
}
