//! Wire types for the generation / validation service, and the error type
//! shared by every network call.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

use crate::physics::{Launch, LaunchSite};

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by network client operations.
#[derive(Debug, thiserror::Error)]
pub enum NetError {
    /// The request never got a response (DNS, connect, timeout, CORS...).
    #[error("request failed: {0}")]
    Request(String),

    /// The service answered with a non-success HTTP status.
    #[error("server responded with status {status}")]
    Status { status: u16, body: String },

    /// The response body was not the JSON we expected.
    #[error("response parse failed: {0}")]
    Parse(String),

    /// A request body could not be serialized.
    #[error("request encode failed: {0}")]
    Encode(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    ClientBuild(String),
}

impl NetError {
    /// Failures worth another attempt. Any HTTP status counts: a cold
    /// service answers 502/503 until it has woken up.
    #[must_use]
    pub fn retryable(&self) -> bool {
        matches!(self, Self::Request(_) | Self::Status { .. })
    }
}

// =============================================================================
// GENERATE
// =============================================================================

/// Motion family the service picked for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerMode {
    Bounce,
    Drop,
    #[serde(other)]
    Unknown,
}

/// Per-session launch parameters from `GET /proxy/generate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicsParams {
    pub velocity: f64,
    pub angle: f64,
    pub friction: f64,
    pub gravity: f64,
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_mode: Option<ServerMode>,
}

impl PhysicsParams {
    #[must_use]
    pub fn launch(&self) -> Launch {
        Launch {
            velocity: self.velocity,
            angle: self.angle,
            friction: self.friction,
            gravity: self.gravity,
        }
    }

    /// Drop sessions release the ball from the top edge; everything else is
    /// thrown from the ground.
    #[must_use]
    pub fn launch_site(&self) -> LaunchSite {
        match self.game_mode {
            Some(ServerMode::Drop) => LaunchSite::Top,
            _ => LaunchSite::Ground,
        }
    }
}

// =============================================================================
// VALIDATE
// =============================================================================

/// Body of `POST /proxy/validate`: where the player clicked, in physics
/// space, and how far into the flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClickClaim {
    pub session_id: String,
    pub click_x: f64,
    pub click_y: f64,
    /// Seconds since the flight started.
    pub time: f64,
}

/// The service's verdict on a [`ClickClaim`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateResponse {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catch_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// =============================================================================
// PARSING
// =============================================================================

/// Parse a generate response. Only field presence is checked.
///
/// # Errors
///
/// Returns [`NetError::Parse`] if a required field is missing or mistyped.
pub fn parse_params(body: &str) -> Result<PhysicsParams, NetError> {
    serde_json::from_str(body).map_err(|e| NetError::Parse(e.to_string()))
}

/// Parse a validate response.
///
/// # Errors
///
/// Returns [`NetError::Parse`] if `valid` is missing or the body is not JSON.
pub fn parse_verdict(body: &str) -> Result<ValidateResponse, NetError> {
    serde_json::from_str(body).map_err(|e| NetError::Parse(e.to_string()))
}

/// Serialize a claim for the request body.
///
/// # Errors
///
/// Returns [`NetError::Encode`] if a coordinate is not a finite number.
pub fn encode_claim(claim: &ClickClaim) -> Result<String, NetError> {
    if !(claim.click_x.is_finite() && claim.click_y.is_finite() && claim.time.is_finite()) {
        return Err(NetError::Encode("claim contains a non-finite number".into()));
    }
    serde_json::to_string(claim).map_err(|e| NetError::Encode(e.to_string()))
}
