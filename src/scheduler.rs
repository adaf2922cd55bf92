// Frame and timer scheduling. The background only talks to `Scheduler`, so the
// browser's requestAnimationFrame/setTimeout can be swapped for a manual clock.

use gloo::render::{request_animation_frame, AnimationFrame};
use gloo::timers::callback::Timeout;
use std::rc::Rc;

pub trait Scheduler {
    type Frame;
    type Timer;

    fn request_frame(&self, callback: Box<dyn FnOnce()>) -> Self::Frame;

    fn cancel_frame(&self, frame: Self::Frame);

    fn set_timeout(&self, millis: u32, callback: Box<dyn FnOnce()>) -> Self::Timer;

    fn clear_timeout(&self, timer: Self::Timer);
}

impl<S: Scheduler + ?Sized> Scheduler for Rc<S> {
    type Frame = S::Frame;
    type Timer = S::Timer;

    fn request_frame(&self, callback: Box<dyn FnOnce()>) -> Self::Frame {
        (**self).request_frame(callback)
    }

    fn cancel_frame(&self, frame: Self::Frame) {
        (**self).cancel_frame(frame)
    }

    fn set_timeout(&self, millis: u32, callback: Box<dyn FnOnce()>) -> Self::Timer {
        (**self).set_timeout(millis, callback)
    }

    fn clear_timeout(&self, timer: Self::Timer) {
        (**self).clear_timeout(timer)
    }
}

/// Browser scheduling through `gloo`; dropping either handle cancels it.
#[derive(Copy, Clone, Debug, Default)]
pub struct BrowserScheduler;

impl Scheduler for BrowserScheduler {
    type Frame = AnimationFrame;
    type Timer = Timeout;

    fn request_frame(&self, callback: Box<dyn FnOnce()>) -> AnimationFrame {
        request_animation_frame(move |_timestamp| callback())
    }

    fn cancel_frame(&self, frame: AnimationFrame) {
        drop(frame);
    }

    fn set_timeout(&self, millis: u32, callback: Box<dyn FnOnce()>) -> Timeout {
        Timeout::new(millis, callback)
    }

    fn clear_timeout(&self, timer: Timeout) {
        drop(timer);
    }
}

/// Single-slot deferred action. Every `trigger` replaces the pending timer, so
/// a burst of triggers runs the action once, `delay_ms` after the last one.
pub struct Debounce<S: Scheduler> {
    delay_ms: u32,
    pending: Option<S::Timer>,
}

impl<S: Scheduler> Debounce<S> {
    pub fn new(delay_ms: u32) -> Self {
        Debounce {
            delay_ms,
            pending: None,
        }
    }

    pub fn trigger(&mut self, scheduler: &S, action: Box<dyn FnOnce()>) {
        self.cancel(scheduler);
        self.pending = Some(scheduler.set_timeout(self.delay_ms, action));
    }

    /// Called from the action once the timer has fired.
    pub fn elapsed(&mut self) {
        self.pending = None;
    }

    pub fn cancel(&mut self, scheduler: &S) {
        if let Some(timer) = self.pending.take() {
            scheduler.clear_timeout(timer);
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ManualScheduler;
    use std::cell::Cell;

    #[test]
    fn burst_of_triggers_fires_once() {
        let scheduler = Rc::new(ManualScheduler::default());
        let mut debounce = Debounce::<Rc<ManualScheduler>>::new(100);
        let fired = Rc::new(Cell::new(0));

        for _ in 0..3 {
            let fired = fired.clone();
            debounce.trigger(&scheduler, Box::new(move || fired.set(fired.get() + 1)));
            scheduler.advance(40);
        }
        assert_eq!(fired.get(), 0);
        assert_eq!(scheduler.cleared_timers(), 2);

        scheduler.advance(60);
        assert_eq!(fired.get(), 1);
        scheduler.advance(1000);
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn cancel_clears_pending_timer() {
        let scheduler = Rc::new(ManualScheduler::default());
        let mut debounce = Debounce::<Rc<ManualScheduler>>::new(100);
        let fired = Rc::new(Cell::new(false));
        let flag = fired.clone();
        debounce.trigger(&scheduler, Box::new(move || flag.set(true)));
        assert!(debounce.is_pending());

        debounce.cancel(&scheduler);
        assert!(!debounce.is_pending());
        scheduler.advance(500);
        assert!(!fired.get());
        assert_eq!(scheduler.pending_timers(), 0);
    }
}
