//! Browser shell for the ball-catch CAPTCHA.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It wires
//! the platform-free [`ballcatch::engine::GameCore`] to a real canvas:
//! `requestAnimationFrame` drives the frame loop, `performance.now()` is the
//! clock, `fetch` talks to the validation proxy, and the page receives every
//! UI [`ballcatch::engine::Action`] as JSON through a callback.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`widget`] | `CaptchaWidget`, the `wasm_bindgen` entry point |
//! | [`render`] | Draws a [`ballcatch::engine::Scene`] to a 2D context |
//! | [`host`] | `requestAnimationFrame` scheduler and performance clock |
//! | [`transport`] | `gloo-net` transport and `gloo-timers` sleeper |
#![cfg(target_arch = "wasm32")]

pub mod host;
pub mod render;
pub mod transport;
pub mod widget;

use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&JsValue::from_str("logger already initialized"));
    }
}
