use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;

use super::*;
use crate::net::retry::RetryPolicy;

#[derive(Default)]
struct ScriptedTransport {
    replies: RefCell<VecDeque<Result<String, NetError>>>,
    calls: RefCell<Vec<(String, Option<String>)>>,
}

impl ScriptedTransport {
    fn with(replies: Vec<Result<String, NetError>>) -> Self {
        Self { replies: RefCell::new(replies.into()), calls: RefCell::default() }
    }

    fn next(&self) -> Result<String, NetError> {
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(NetError::Request("script exhausted".into())))
    }
}

#[async_trait(?Send)]
impl Transport for ScriptedTransport {
    async fn get(&self, url: &str) -> Result<String, NetError> {
        self.calls.borrow_mut().push((url.to_string(), None));
        self.next()
    }

    async fn post_json(&self, url: &str, body: &str) -> Result<String, NetError> {
        self.calls.borrow_mut().push((url.to_string(), Some(body.to_string())));
        self.next()
    }
}

struct NoWait;

#[async_trait(?Send)]
impl Sleeper for NoWait {
    async fn sleep(&self, _delay: Duration) {}
}

fn api(replies: Vec<Result<String, NetError>>) -> CaptchaApi<ScriptedTransport, NoWait> {
    let config = NetConfig {
        base_url: "http://backend.test".into(),
        retry: RetryPolicy { max_retries: 3, delay: Duration::from_millis(2000) },
        timeout: Duration::from_secs(10),
    };
    CaptchaApi::new(ScriptedTransport::with(replies), NoWait, config)
}

fn bad_gateway() -> Result<String, NetError> {
    Err(NetError::Status { status: 502, body: String::new() })
}

const PARAMS: &str = r#"{"session_id":"42","game_mode":"bounce","gravity":300,"velocity":250,"angle":0.8,"friction":0.1,"startTime":1,"catch_count":0}"#;

// =============================================================================
// warmup
// =============================================================================

#[tokio::test]
async fn warmup_ignores_body() {
    let api = api(vec![Ok("not json at all".into())]);
    assert!(api.warmup(&mut |_| {}).await);
    assert_eq!(api.transport.calls.borrow()[0].0, "http://backend.test/proxy/generate");
}

#[tokio::test]
async fn warmup_failure_is_reported_not_raised() {
    let api = api(vec![bad_gateway(), bad_gateway(), bad_gateway(), bad_gateway()]);
    let mut notices = 0;
    assert!(!api.warmup(&mut |_| notices += 1).await);
    assert_eq!(notices, 3);
    assert_eq!(api.transport.calls.borrow().len(), 4);
}

// =============================================================================
// generate
// =============================================================================

#[tokio::test]
async fn generate_parses_params_after_cold_start() {
    let api = api(vec![bad_gateway(), bad_gateway(), Ok(PARAMS.into())]);
    let mut notices = Vec::new();
    let params = api.generate(&mut |n| notices.push(n.attempt)).await;
    let params = params.unwrap_or_else(|e| panic!("generate failed: {e}"));
    assert_eq!(params.session_id, "42");
    assert_eq!(notices, vec![1, 2]);
}

#[tokio::test]
async fn generate_malformed_body_is_not_retried() {
    let api = api(vec![Ok(r#"{"velocity":1}"#.into()), Ok(PARAMS.into())]);
    let result = api.generate(&mut |_| {}).await;
    assert!(matches!(result, Err(NetError::Parse(_))));
    assert_eq!(api.transport.calls.borrow().len(), 1);
}

#[tokio::test]
async fn generate_exhausted_surfaces_last_error() {
    let api = api(vec![
        Err(NetError::Request("refused".into())),
        Err(NetError::Request("refused".into())),
        Err(NetError::Request("refused".into())),
        bad_gateway(),
    ]);
    let result = api.generate(&mut |_| {}).await;
    assert!(matches!(result, Err(NetError::Status { status: 502, .. })));
}

// =============================================================================
// validate
// =============================================================================

#[tokio::test]
async fn validate_posts_claim_and_parses_verdict() {
    let api = api(vec![Ok(r#"{"valid":true,"catch_count":1}"#.into())]);
    let claim = ClickClaim { session_id: "42".into(), click_x: 100.0, click_y: 50.0, time: 1.25 };
    let verdict = api
        .validate(&claim, &mut |_| {})
        .await
        .unwrap_or_else(|e| panic!("validate failed: {e}"));
    assert!(verdict.valid);
    assert_eq!(verdict.catch_count, Some(1));

    let calls = api.transport.calls.borrow();
    assert_eq!(calls[0].0, "http://backend.test/proxy/validate");
    let body: serde_json::Value = serde_json::from_str(calls[0].1.as_deref().unwrap_or_default()).unwrap_or_default();
    assert_eq!(body["session_id"], "42");
    assert_eq!(body["time"], 1.25);
}

#[tokio::test]
async fn validate_rejects_non_finite_claim_without_request() {
    let api = api(vec![]);
    let claim = ClickClaim { session_id: "42".into(), click_x: f64::INFINITY, click_y: 0.0, time: 0.0 };
    let result = api.validate(&claim, &mut |_| {}).await;
    assert!(matches!(result, Err(NetError::Encode(_))));
    assert!(api.transport.calls.borrow().is_empty());
}

#[tokio::test]
async fn validate_retries_same_body() {
    let api = api(vec![bad_gateway(), Ok(r#"{"valid":false}"#.into())]);
    let claim = ClickClaim { session_id: "9".into(), click_x: 1.0, click_y: 2.0, time: 0.5 };
    let verdict = api.validate(&claim, &mut |_| {}).await;
    assert_eq!(verdict.ok().map(|v| v.valid), Some(false));
    let calls = api.transport.calls.borrow();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].1, calls[1].1);
}
