#![allow(clippy::float_cmp)]

use std::cell::Cell;
use std::time::Duration;

use async_trait::async_trait;
use ballcatch::engine::{
    CHECKING_MESSAGE, MISSED_CLOSER_MESSAGE, MISSED_MESSAGE, SERVER_ERROR_MESSAGE, SUCCESS_MESSAGE, WAKING_MESSAGE,
};
use ballcatch::net::{NetConfig, NetError, RetryPolicy};

use super::*;

/// Backend that answers generate with fixed params and accepts every claim,
/// counting catches server-side.
#[derive(Default)]
struct FriendlyBackend {
    catches: Cell<u32>,
}

#[async_trait(?Send)]
impl Transport for FriendlyBackend {
    async fn get(&self, _url: &str) -> Result<String, NetError> {
        Ok(r#"{"velocity":120,"angle":0.9,"friction":0,"gravity":60,"session_id":"sim-1","game_mode":"bounce"}"#.into())
    }

    async fn post_json(&self, _url: &str, _body: &str) -> Result<String, NetError> {
        self.catches.set(self.catches.get() + 1);
        Ok(format!(r#"{{"valid":true,"catch_count":{}}}"#, self.catches.get()))
    }
}

struct Offline;

#[async_trait(?Send)]
impl Transport for Offline {
    async fn get(&self, _url: &str) -> Result<String, NetError> {
        Err(NetError::Request("connection refused".into()))
    }

    async fn post_json(&self, _url: &str, _body: &str) -> Result<String, NetError> {
        Err(NetError::Request("connection refused".into()))
    }
}

struct NoWait;

#[async_trait(?Send)]
impl Sleeper for NoWait {
    async fn sleep(&self, _delay: Duration) {}
}

fn api<T: Transport>(transport: T) -> CaptchaApi<T, NoWait> {
    let config = NetConfig {
        retry: RetryPolicy { max_retries: 3, delay: Duration::from_millis(2000) },
        ..NetConfig::default()
    };
    CaptchaApi::new(transport, NoWait, config)
}

fn statuses(report: &SimReport) -> Vec<String> {
    report
        .actions
        .iter()
        .filter_map(|a| match a {
            Action::SetStatus { message, .. } if !message.is_empty() => Some(message.clone()),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn steady_hand_catches_three_drops() {
    let report = run(&SimOptions::default(), &api(Offline)).await;
    assert!(report.success);
    assert_eq!(report.clicks, 3);
    assert_eq!(report.final_status.as_deref(), Some(SUCCESS_MESSAGE));
    assert_eq!(report.completion, Some(Completion::Reload));
}

#[tokio::test]
async fn wide_click_ends_a_drop_session() {
    let options = SimOptions { aim_offset: 100.0, ..SimOptions::default() };
    let report = run(&options, &api(Offline)).await;
    assert!(!report.success);
    assert_eq!(report.clicks, 1);
    assert_eq!(report.final_status.as_deref(), Some(MISSED_MESSAGE));
}

#[tokio::test]
async fn steady_hand_catches_three_bounces() {
    let options = SimOptions { mode: Mode::Projectile, ..SimOptions::default() };
    let report = run(&options, &api(Offline)).await;
    assert!(report.success);
    assert_eq!(report.clicks, 3);
}

#[tokio::test]
async fn wide_clicks_on_a_bounce_keep_the_session_alive() {
    let options = SimOptions { mode: Mode::Projectile, aim_offset: 100.0, ..SimOptions::default() };
    let report = run(&options, &api(Offline)).await;
    assert!(!report.success);
    assert!(report.clicks > 1);
    assert!(statuses(&report).iter().any(|s| s == MISSED_CLOSER_MESSAGE));
}

#[tokio::test]
async fn validated_run_succeeds_on_server_counts() {
    let options = SimOptions { mode: Mode::Projectile, validated: true, reaction_ms: 100.0, ..SimOptions::default() };
    let backend = api(FriendlyBackend::default());
    let report = run(&options, &backend).await;
    assert!(report.success);
    assert_eq!(report.clicks, 3);
    assert_eq!(statuses(&report).iter().filter(|s| *s == CHECKING_MESSAGE).count(), 3);
}

#[tokio::test]
async fn validated_run_gives_up_when_backend_is_down() {
    let options = SimOptions { mode: Mode::Projectile, validated: true, ..SimOptions::default() };
    let report = run(&options, &api(Offline)).await;
    assert!(!report.success);
    assert_eq!(report.clicks, 0);
    assert_eq!(report.final_status.as_deref(), Some(SERVER_ERROR_MESSAGE));
    assert_eq!(statuses(&report).iter().filter(|s| *s == WAKING_MESSAGE).count(), 3);
}
