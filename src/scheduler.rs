//! Frame scheduling and time sources.
//!
//! The engine never touches `requestAnimationFrame` or `performance.now()`
//! directly. It talks to a [`FrameScheduler`] and a [`Clock`], which the
//! browser shell implements for real and tests implement by hand with
//! [`ManualScheduler`] and [`ManualClock`].
//!
//! [`FrameLoop`] owns the scheduler and enforces the one rule that matters:
//! at most one frame callback is ever pending.

#[cfg(test)]
#[path = "scheduler_test.rs"]
mod scheduler_test;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::warn;

/// Monotonic millisecond time source.
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Opaque id of a requested frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub i32);

/// Requests and cancels one-shot "next frame" callbacks.
///
/// When a requested frame fires, the host calls the engine's `tick`.
pub trait FrameScheduler {
    /// Ask for a callback on the next frame. `None` means the host refused.
    fn request(&mut self) -> Option<FrameHandle>;
    fn cancel(&mut self, handle: FrameHandle);
}

// =============================================================================
// FRAME LOOP
// =============================================================================

/// A cancellable repeating task driven one frame at a time.
pub struct FrameLoop {
    scheduler: Box<dyn FrameScheduler>,
    pending: Option<FrameHandle>,
}

impl FrameLoop {
    #[must_use]
    pub fn new(scheduler: Box<dyn FrameScheduler>) -> Self {
        Self { scheduler, pending: None }
    }

    /// Make sure a frame is pending. Returns `false` if the host refused.
    pub fn schedule(&mut self) -> bool {
        if self.pending.is_some() {
            return true;
        }
        match self.scheduler.request() {
            Some(handle) => {
                self.pending = Some(handle);
                true
            }
            None => {
                warn!("frame request refused by host");
                false
            }
        }
    }

    /// Record that the pending frame fired.
    ///
    /// Returns `false` for a callback that arrives with nothing pending,
    /// which happens when a frame races a cancel.
    pub fn fired(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Cancel the pending frame, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel(handle);
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

// =============================================================================
// MANUAL DRIVERS
// =============================================================================

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    #[must_use]
    pub fn new(start_ms: f64) -> Self {
        Self { now: Rc::new(Cell::new(start_ms)) }
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

#[derive(Debug, Default)]
struct ManualFrames {
    next_id: i32,
    pending: Vec<FrameHandle>,
    requested: usize,
    cancelled: Vec<FrameHandle>,
    refuse: bool,
}

/// Scheduler that records requests and lets the caller fire them.
/// Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    frames: Rc<RefCell<ManualFrames>>,
}

impl ManualScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire the oldest pending frame, as the browser would on vsync.
    pub fn fire(&self) -> Option<FrameHandle> {
        let mut frames = self.frames.borrow_mut();
        if frames.pending.is_empty() {
            return None;
        }
        Some(frames.pending.remove(0))
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.frames.borrow().pending.len()
    }

    #[must_use]
    pub fn requested_count(&self) -> usize {
        self.frames.borrow().requested
    }

    #[must_use]
    pub fn cancelled(&self) -> Vec<FrameHandle> {
        self.frames.borrow().cancelled.clone()
    }

    /// Make every later request fail.
    pub fn refuse_requests(&self, refuse: bool) {
        self.frames.borrow_mut().refuse = refuse;
    }
}

impl FrameScheduler for ManualScheduler {
    fn request(&mut self) -> Option<FrameHandle> {
        let mut frames = self.frames.borrow_mut();
        if frames.refuse {
            return None;
        }
        frames.next_id += 1;
        frames.requested += 1;
        let handle = FrameHandle(frames.next_id);
        frames.pending.push(handle);
        Some(handle)
    }

    fn cancel(&mut self, handle: FrameHandle) {
        let mut frames = self.frames.borrow_mut();
        frames.pending.retain(|h| *h != handle);
        frames.cancelled.push(handle);
    }
}
