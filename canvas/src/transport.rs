//! Browser networking: `fetch` via `gloo-net`, waits via `gloo-timers`.

use std::time::Duration;

use async_trait::async_trait;
use ballcatch::net::{NetError, Sleeper, Transport};
use gloo_net::http::{Request, Response};

pub struct FetchTransport;

impl FetchTransport {
    async fn finish(response: Response) -> Result<String, NetError> {
        let status = response.status();
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

#[async_trait(?Send)]
impl Transport for FetchTransport {
    async fn get(&self, url: &str) -> Result<String, NetError> {
        let response = Request::get(url)
            .send()
            .await
            .map_err(|e| NetError::Request(e.to_string()))?;
        Self::finish(response).await
    }

    async fn post_json(&self, url: &str, body: &str) -> Result<String, NetError> {
        let request = Request::post(url)
            .header("Content-Type", "application/json")
            .body(body.to_string())
            .map_err(|e| NetError::Encode(e.to_string()))?;
        let response = request
            .send()
            .await
            .map_err(|e| NetError::Request(e.to_string()))?;
        Self::finish(response).await
    }
}

pub struct TimerSleeper;

#[async_trait(?Send)]
impl Sleeper for TimerSleeper {
    async fn sleep(&self, delay: Duration) {
        gloo_timers::future::sleep(delay).await;
    }
}
