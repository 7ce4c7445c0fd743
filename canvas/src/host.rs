//! Browser implementations of the engine's time and frame seams.

use std::cell::RefCell;
use std::rc::Rc;

use ballcatch::scheduler::{Clock, FrameHandle, FrameScheduler};
use tracing::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{Performance, Window};

/// `performance.now()`, falling back to `Date.now()` where the Performance
/// API is missing.
pub struct PerformanceClock {
    performance: Option<Performance>,
}

impl PerformanceClock {
    #[must_use]
    pub fn new(window: &Window) -> Self {
        Self { performance: window.performance() }
    }
}

impl Clock for PerformanceClock {
    fn now_ms(&self) -> f64 {
        match &self.performance {
            Some(p) => p.now(),
            None => js_sys::Date::now(),
        }
    }
}

/// Callback run when a requested frame fires. Installed after the widget
/// that owns the scheduler has been built.
pub type FrameHook = Rc<RefCell<Option<Rc<dyn Fn()>>>>;

/// `requestAnimationFrame` / `cancelAnimationFrame`.
pub struct RafScheduler {
    window: Window,
    hook: FrameHook,
}

impl RafScheduler {
    #[must_use]
    pub fn new(window: Window, hook: FrameHook) -> Self {
        Self { window, hook }
    }
}

impl FrameScheduler for RafScheduler {
    fn request(&mut self) -> Option<FrameHandle> {
        let hook = Rc::clone(&self.hook);
        // One-shot closure; wasm-bindgen frees it after the call.
        let cb = Closure::once_into_js(move |_ts: f64| {
            let current = hook.borrow().clone();
            if let Some(on_frame) = current {
                on_frame();
            }
        });
        match self.window.request_animation_frame(cb.unchecked_ref()) {
            Ok(id) => Some(FrameHandle(id)),
            Err(e) => {
                warn!(error = ?e, "requestAnimationFrame failed");
                None
            }
        }
    }

    fn cancel(&mut self, handle: FrameHandle) {
        if let Err(e) = self.window.cancel_animation_frame(handle.0) {
            warn!(error = ?e, id = handle.0, "cancelAnimationFrame failed");
        }
    }
}
