//! Game engine for a ball-catch CAPTCHA.
//!
//! A ball moves across a small canvas (falling, bouncing, or flying a
//! parabola) and the player has to click it three times. This crate holds
//! everything that does not need a browser: the motion models, hit-testing,
//! the session state machine, and the client for the validation service.
//! The `canvas` crate wraps it for WebAssembly and the `cli` crate drives it
//! headlessly.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Session controller [`engine::GameCore`] and the [`engine::Action`]s it emits |
//! | [`session`] | Per-attempt state and async request tickets |
//! | [`physics`] | Drop, bounce, and parabolic motion models |
//! | [`input`] | Click location, judging, and the claim gate |
//! | [`hit`] | Distance hit test and provisional / authoritative verdicts |
//! | [`mode`] | Game modes and the policies that pick them |
//! | [`scheduler`] | Frame loop, clock, and manual drivers for tests |
//! | [`viewport`] | Canvas size and client-to-canvas mapping |
//! | [`net`] | Generate / validate client with fixed-delay retry |
//! | [`consts`] | Shared numeric constants |

pub mod consts;
pub mod engine;
pub mod hit;
pub mod input;
pub mod mode;
pub mod net;
pub mod physics;
pub mod scheduler;
pub mod session;
pub mod viewport;
