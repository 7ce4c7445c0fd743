//! Client for the `/proxy/generate` and `/proxy/validate` endpoints.
//!
//! [`CaptchaApi`] owns the retry loop and the JSON handling. Moving bytes is
//! delegated to a [`Transport`]: reqwest on native targets, `gloo-net` in the
//! browser shell, a scripted fake in tests.

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::config::NetConfig;
use super::retry::{RetryNotice, Sleeper, with_retry};
use super::types::{ClickClaim, NetError, PhysicsParams, ValidateResponse, encode_claim, parse_params, parse_verdict};

/// One HTTP round trip. Implementations map non-2xx answers to
/// [`NetError::Status`] and return the raw body otherwise.
#[async_trait(?Send)]
pub trait Transport {
    async fn get(&self, url: &str) -> Result<String, NetError>;
    async fn post_json(&self, url: &str, body: &str) -> Result<String, NetError>;
}

// =============================================================================
// API
// =============================================================================

pub struct CaptchaApi<T, S> {
    transport: T,
    sleeper: S,
    config: NetConfig,
}

impl<T: Transport, S: Sleeper> CaptchaApi<T, S> {
    #[must_use]
    pub fn new(transport: T, sleeper: S, config: NetConfig) -> Self {
        Self { transport, sleeper, config }
    }

    #[must_use]
    pub fn config(&self) -> &NetConfig {
        &self.config
    }

    /// Touch the generate endpoint so a sleeping backend starts waking up
    /// before the player presses start. The body is ignored and failure is
    /// only logged.
    pub async fn warmup(&self, notify: &mut dyn FnMut(RetryNotice)) -> bool {
        let url = self.config.generate_url();
        match with_retry(self.config.retry, &self.sleeper, notify, || self.transport.get(&url)).await {
            Ok(_) => {
                info!(%url, "backend warm");
                true
            }
            Err(e) => {
                warn!(error = %e, %url, "warmup failed");
                false
            }
        }
    }

    /// Fetch launch parameters for a new session.
    ///
    /// # Errors
    ///
    /// Returns the last transport error once retries are exhausted, or
    /// [`NetError::Parse`] for a malformed body.
    pub async fn generate(&self, notify: &mut dyn FnMut(RetryNotice)) -> Result<PhysicsParams, NetError> {
        let url = self.config.generate_url();
        let body = with_retry(self.config.retry, &self.sleeper, notify, || self.transport.get(&url)).await?;
        let params = parse_params(&body)?;
        debug!(session_id = %params.session_id, game_mode = ?params.game_mode, "physics params received");
        Ok(params)
    }

    /// Submit a click for server-side validation.
    ///
    /// # Errors
    ///
    /// Returns [`NetError::Encode`] before any request for a non-finite
    /// claim, otherwise as [`CaptchaApi::generate`].
    pub async fn validate(
        &self,
        claim: &ClickClaim,
        notify: &mut dyn FnMut(RetryNotice),
    ) -> Result<ValidateResponse, NetError> {
        let url = self.config.validate_url();
        let body = encode_claim(claim)?;
        let text =
            with_retry(self.config.retry, &self.sleeper, notify, || self.transport.post_json(&url, &body)).await?;
        let verdict = parse_verdict(&text)?;
        debug!(session_id = %claim.session_id, valid = verdict.valid, catch_count = ?verdict.catch_count, "claim validated");
        Ok(verdict)
    }
}

// =============================================================================
// REQWEST TRANSPORT
// =============================================================================

#[cfg(not(target_arch = "wasm32"))]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

#[cfg(not(target_arch = "wasm32"))]
impl ReqwestTransport {
    /// # Errors
    ///
    /// Returns [`NetError::ClientBuild`] if the TLS backend fails to
    /// initialize.
    pub fn new(config: &NetConfig) -> Result<Self, NetError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| NetError::ClientBuild(e.to_string()))?;
        Ok(Self { http })
    }

    async fn finish(response: reqwest::Response) -> Result<String, NetError> {
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| NetError::Request(e.to_string()))?;
        if !(200..300).contains(&status) {
            return Err(NetError::Status { status, body: text });
        }
        Ok(text)
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[async_trait(?Send)]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<String, NetError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| NetError::Request(e.to_string()))?;
        Self::finish(response).await
    }

    async fn post_json(&self, url: &str, body: &str) -> Result<String, NetError> {
        let response = self
            .http
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body.to_string())
            .send()
            .await
            .map_err(|e| NetError::Request(e.to_string()))?;
        Self::finish(response).await
    }
}
