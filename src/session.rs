//! Per-attempt session state.
//!
//! A [`Session`] exists from the moment the player presses start until the
//! controller's exit handler runs. It is owned by exactly one
//! [`crate::engine::GameCore`] and never outlives the attempt.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use serde::{Deserialize, Serialize};

use crate::consts::REQUIRED_CATCHES;
use crate::hit::Verdict;
use crate::mode::Mode;
use crate::physics::{BallState, Motion};

/// Correlates an async reply with the request that caused it.
///
/// `session` is the sequence number of the session that issued the request;
/// replies carrying an older number are dropped. `serial` distinguishes
/// requests within one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ticket {
    pub session: u64,
    pub serial: u32,
}

/// Whether play is still waiting on launch parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamsState {
    NotNeeded,
    Pending(Ticket),
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    /// Mode banner is up; input is ignored until `until_ms` has passed and
    /// any required params have arrived.
    Announcing { until_ms: f64, params: ParamsState },
    /// Ball is moving and clicks count.
    Running,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub seq: u64,
    pub mode: Mode,
    pub phase: Phase,
    /// `None` until launch params arrive or play begins.
    pub motion: Option<Motion>,
    pub ball: BallState,
    /// Time origin for the timer and the closed-form models. Projectile
    /// catches move it forward; drop catches do not.
    pub cycle_started_at: f64,
    pub success_count: u32,
    /// Assigned by the validation service.
    pub session_id: Option<String>,
    /// Opinions on the most recent click.
    pub last_verdict: Option<Verdict>,
}

impl Session {
    #[must_use]
    pub fn new(seq: u64, mode: Mode, announce_until_ms: f64, params: ParamsState) -> Self {
        Self {
            seq,
            mode,
            phase: Phase::Announcing { until_ms: announce_until_ms, params },
            motion: None,
            ball: BallState::default(),
            cycle_started_at: announce_until_ms,
            success_count: 0,
            session_id: None,
            last_verdict: None,
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Running)
    }

    /// True once the banner has had its time and nothing is outstanding.
    #[must_use]
    pub fn ready_to_play(&self, now_ms: f64) -> bool {
        match self.phase {
            Phase::Announcing { until_ms, params } => now_ms >= until_ms && !matches!(params, ParamsState::Pending(_)),
            Phase::Running => false,
        }
    }

    /// Whether `ticket` is the params request this session is waiting on.
    #[must_use]
    pub fn awaits_params(&self, ticket: Ticket) -> bool {
        matches!(self.phase, Phase::Announcing { params: ParamsState::Pending(t), .. } if t == ticket)
    }

    pub fn params_arrived(&mut self) {
        if let Phase::Announcing { params, .. } = &mut self.phase {
            *params = ParamsState::Ready;
        }
    }

    /// Leave the banner and put the ball in play.
    pub fn begin_play(&mut self, motion: Motion, ball: BallState, now_ms: f64) {
        self.motion = Some(motion);
        self.ball = ball;
        self.cycle_started_at = now_ms;
        self.phase = Phase::Running;
    }

    /// Seconds into the current cycle.
    #[must_use]
    pub fn elapsed_secs(&self, now_ms: f64) -> f64 {
        (now_ms - self.cycle_started_at) / 1000.0
    }

    pub fn restart_cycle(&mut self, now_ms: f64) {
        self.cycle_started_at = now_ms;
    }

    /// Count a catch and return the new total.
    pub fn record_catch(&mut self) -> u32 {
        self.success_count = (self.success_count + 1).min(REQUIRED_CATCHES);
        self.success_count
    }

    /// Take the server's count when it reports one.
    pub fn sync_catches(&mut self, server_count: u32) -> u32 {
        self.success_count = server_count.min(REQUIRED_CATCHES);
        self.success_count
    }

    #[must_use]
    pub fn remaining(&self) -> u32 {
        REQUIRED_CATCHES.saturating_sub(self.success_count)
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.success_count >= REQUIRED_CATCHES
    }
}
