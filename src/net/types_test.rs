#![allow(clippy::float_cmp)]

use super::*;

// =============================================================================
// NetError::retryable
// =============================================================================

#[test]
fn retryable_request() {
    assert!(NetError::Request("connection refused".into()).retryable());
}

#[test]
fn retryable_any_status() {
    assert!(NetError::Status { status: 503, body: String::new() }.retryable());
    assert!(NetError::Status { status: 429, body: String::new() }.retryable());
    assert!(NetError::Status { status: 400, body: String::new() }.retryable());
}

#[test]
fn not_retryable_parse_encode_build() {
    assert!(!NetError::Parse("eof".into()).retryable());
    assert!(!NetError::Encode("nan".into()).retryable());
    assert!(!NetError::ClientBuild("tls".into()).retryable());
}

#[test]
fn status_error_message_names_code() {
    let err = NetError::Status { status: 502, body: "bad gateway".into() };
    assert_eq!(err.to_string(), "server responded with status 502");
}

// =============================================================================
// parse_params
// =============================================================================

#[test]
fn parse_params_full_body() {
    let body = r#"{
        "session_id": "1700000000000",
        "game_mode": "bounce",
        "gravity": 312.5,
        "velocity": 240.0,
        "angle": 0.9,
        "friction": 0.12,
        "startTime": 1700000000000,
        "catch_count": 0
    }"#;
    let params = parse_params(body).unwrap_or_else(|e| panic!("parse failed: {e}"));
    assert_eq!(params.session_id, "1700000000000");
    assert_eq!(params.game_mode, Some(ServerMode::Bounce));
    assert_eq!(params.gravity, 312.5);
    assert_eq!(params.velocity, 240.0);
    assert_eq!(params.angle, 0.9);
    assert_eq!(params.friction, 0.12);
}

#[test]
fn parse_params_without_game_mode() {
    let body = r#"{"session_id":"s","gravity":1,"velocity":2,"angle":3,"friction":0.1}"#;
    let params = parse_params(body).unwrap_or_else(|e| panic!("parse failed: {e}"));
    assert_eq!(params.game_mode, None);
}

#[test]
fn parse_params_unknown_game_mode() {
    let body = r#"{"session_id":"s","gravity":1,"velocity":2,"angle":3,"friction":0.1,"game_mode":"spiral"}"#;
    let params = parse_params(body).unwrap_or_else(|e| panic!("parse failed: {e}"));
    assert_eq!(params.game_mode, Some(ServerMode::Unknown));
}

#[test]
fn parse_params_missing_session_id_fails() {
    let body = r#"{"gravity":1,"velocity":2,"angle":3,"friction":0.1}"#;
    assert!(matches!(parse_params(body), Err(NetError::Parse(_))));
}

#[test]
fn parse_params_empty_body_fails() {
    assert!(matches!(parse_params(""), Err(NetError::Parse(_))));
}

#[test]
fn params_launch_copies_fields() {
    let params = PhysicsParams {
        velocity: 250.0,
        angle: 1.1,
        friction: 0.14,
        gravity: 220.0,
        session_id: "x".into(),
        game_mode: None,
    };
    let launch = params.launch();
    assert_eq!(launch.velocity, 250.0);
    assert_eq!(launch.angle, 1.1);
    assert_eq!(launch.friction, 0.14);
    assert_eq!(launch.gravity, 220.0);
}

#[test]
fn drop_sessions_launch_from_the_top() {
    let mut params = PhysicsParams {
        velocity: 0.0,
        angle: 0.0,
        friction: 0.0,
        gravity: 200.0,
        session_id: "x".into(),
        game_mode: Some(ServerMode::Drop),
    };
    assert_eq!(params.launch_site(), LaunchSite::Top);
    params.game_mode = Some(ServerMode::Bounce);
    assert_eq!(params.launch_site(), LaunchSite::Ground);
    params.game_mode = None;
    assert_eq!(params.launch_site(), LaunchSite::Ground);
}

// =============================================================================
// parse_verdict
// =============================================================================

#[test]
fn parse_verdict_minimal() {
    let verdict = parse_verdict(r#"{"valid":true}"#).unwrap_or_else(|e| panic!("parse failed: {e}"));
    assert!(verdict.valid);
    assert_eq!(verdict.catch_count, None);
}

#[test]
fn parse_verdict_with_catch_count() {
    let verdict = parse_verdict(r#"{"valid":false,"catch_count":2}"#).unwrap_or_else(|e| panic!("parse failed: {e}"));
    assert!(!verdict.valid);
    assert_eq!(verdict.catch_count, Some(2));
}

#[test]
fn parse_verdict_missing_valid_fails() {
    assert!(matches!(parse_verdict(r#"{"catch_count":1}"#), Err(NetError::Parse(_))));
}

// =============================================================================
// encode_claim
// =============================================================================

#[test]
fn encode_claim_uses_wire_field_names() {
    let claim = ClickClaim { session_id: "abc".into(), click_x: 12.5, click_y: -3.0, time: 0.75 };
    let body = encode_claim(&claim).unwrap_or_else(|e| panic!("encode failed: {e}"));
    let value: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    assert_eq!(value["session_id"], "abc");
    assert_eq!(value["click_x"], 12.5);
    assert_eq!(value["click_y"], -3.0);
    assert_eq!(value["time"], 0.75);
}

#[test]
fn encode_claim_rejects_nan() {
    let claim = ClickClaim { session_id: "abc".into(), click_x: f64::NAN, click_y: 0.0, time: 0.0 };
    assert!(matches!(encode_claim(&claim), Err(NetError::Encode(_))));
}
