#![allow(clippy::float_cmp)]

use super::*;

// =============================================================
// hit_test
// =============================================================

#[test]
fn click_on_center_is_catch() {
    let hit = hit_test(Point::new(100.0, 100.0), Point::new(100.0, 100.0), 20.0);
    assert_eq!(hit.distance, 0.0);
    assert!(hit.is_catch());
}

#[test]
fn click_exactly_on_tolerance_axis_is_catch() {
    let hit = hit_test(Point::new(120.0, 100.0), Point::new(100.0, 100.0), 20.0);
    assert_eq!(hit.distance, 20.0);
    assert!(hit.is_catch());
}

#[test]
fn click_exactly_on_tolerance_diagonal_is_catch() {
    // 12-16-20 triangle.
    let hit = hit_test(Point::new(112.0, 116.0), Point::new(100.0, 100.0), 20.0);
    assert_eq!(hit.distance, 20.0);
    assert!(hit.is_catch());
}

#[test]
fn click_just_beyond_tolerance_is_miss() {
    let hit = hit_test(Point::new(120.000_001, 100.0), Point::new(100.0, 100.0), 20.0);
    assert!(hit.distance > 20.0);
    assert!(!hit.is_catch());
}

#[test]
fn bounce_tolerance_admits_wider_clicks() {
    let ball = Point::new(50.0, 50.0);
    let click = Point::new(71.0, 50.0);
    assert!(!hit_test(click, ball, 20.0).is_catch());
    assert!(hit_test(click, ball, 22.0).is_catch());
}

#[test]
fn hit_records_tolerance() {
    let hit = hit_test(Point::new(0.0, 0.0), Point::new(3.0, 4.0), 22.0);
    assert_eq!(hit.tolerance, 22.0);
    assert_eq!(hit.distance, 5.0);
}

// =============================================================
// Verdict
// =============================================================

#[test]
fn provisional_verdict_decides_until_server_answers() {
    assert!(Verdict::provisional(true).is_catch());
    assert!(!Verdict::provisional(false).is_catch());
    assert!(!Verdict::provisional(true).overruled());
}

#[test]
fn authoritative_verdict_overrides_provisional_hit() {
    let v = Verdict::provisional(true).with_authoritative(false);
    assert!(!v.is_catch());
    assert!(v.overruled());
}

#[test]
fn authoritative_verdict_overrides_provisional_miss() {
    let v = Verdict::provisional(false).with_authoritative(true);
    assert!(v.is_catch());
    assert!(v.overruled());
}

#[test]
fn agreeing_verdicts_are_not_overruled() {
    let v = Verdict::provisional(true).with_authoritative(true);
    assert!(v.is_catch());
    assert!(!v.overruled());
}
