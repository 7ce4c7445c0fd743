//! Network client for the generation / validation service.
//!
//! - `types`: wire structs, parsing, [`NetError`]
//! - `config`: [`NetConfig`] from env
//! - `retry`: [`with_retry`] and the [`Sleeper`] seam
//! - `http`: [`CaptchaApi`] over a [`Transport`]

pub mod config;
pub mod http;
pub mod retry;
pub mod types;

pub use config::NetConfig;
#[cfg(not(target_arch = "wasm32"))]
pub use http::ReqwestTransport;
pub use http::{CaptchaApi, Transport};
#[cfg(not(target_arch = "wasm32"))]
pub use retry::TokioSleeper;
pub use retry::{RetryNotice, RetryPolicy, Sleeper, with_retry};
pub use types::{ClickClaim, NetError, PhysicsParams, ServerMode, ValidateResponse};
