#![allow(clippy::float_cmp)]

use super::*;
use crate::physics::{DropCatch, Tuning};

fn ticket(serial: u32) -> Ticket {
    Ticket { session: 1, serial }
}

#[test]
fn new_session_is_announcing() {
    let s = Session::new(1, Mode::DropCatch, 1800.0, ParamsState::NotNeeded);
    assert!(!s.is_running());
    assert_eq!(s.success_count, 0);
    assert!(s.motion.is_none());
}

#[test]
fn ready_to_play_waits_for_banner() {
    let s = Session::new(1, Mode::DropCatch, 1800.0, ParamsState::NotNeeded);
    assert!(!s.ready_to_play(1799.0));
    assert!(s.ready_to_play(1800.0));
}

#[test]
fn ready_to_play_waits_for_params() {
    let mut s = Session::new(1, Mode::Projectile, 1800.0, ParamsState::Pending(ticket(1)));
    assert!(!s.ready_to_play(5000.0));
    assert!(s.awaits_params(ticket(1)));
    assert!(!s.awaits_params(ticket(2)));
    s.params_arrived();
    assert!(!s.awaits_params(ticket(1)));
    assert!(s.ready_to_play(5000.0));
}

#[test]
fn begin_play_sets_cycle_origin() {
    let mut s = Session::new(1, Mode::DropCatch, 1800.0, ParamsState::NotNeeded);
    let motion = Motion::Drop(DropCatch::new(Tuning::unit()));
    s.begin_play(motion, BallState { x: 50.0, y: 10.0, velocity: 0.1 }, 2000.0);
    assert!(s.is_running());
    assert!(!s.ready_to_play(9000.0));
    assert_eq!(s.elapsed_secs(3500.0), 1.5);
    s.restart_cycle(3500.0);
    assert_eq!(s.elapsed_secs(3500.0), 0.0);
}

#[test]
fn catches_count_down_to_complete() {
    let mut s = Session::new(1, Mode::DropCatch, 0.0, ParamsState::NotNeeded);
    assert_eq!(s.remaining(), 3);
    assert_eq!(s.record_catch(), 1);
    assert_eq!(s.record_catch(), 2);
    assert!(!s.is_complete());
    assert_eq!(s.record_catch(), 3);
    assert!(s.is_complete());
    assert_eq!(s.remaining(), 0);
    assert_eq!(s.record_catch(), 3);
}

#[test]
fn sync_catches_clamps_server_count() {
    let mut s = Session::new(1, Mode::Projectile, 0.0, ParamsState::NotNeeded);
    assert_eq!(s.sync_catches(2), 2);
    assert_eq!(s.sync_catches(9), 3);
}
