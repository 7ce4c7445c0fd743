//! Input model: how a click is located, judged, and gated.
//!
//! Locating maps a pointer event from client (CSS) pixels into canvas pixels.
//! Judging measures it against the ball with the tolerance of the active
//! motion model. [`ClickRule`] decides what a miss or a catch does to the
//! session, and [`ClaimGate`] drops clicks while a server verdict is
//! outstanding.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use tracing::debug;

use crate::hit::{Hit, hit_test};
use crate::physics::{BallState, Motion};
use crate::session::Ticket;
use crate::viewport::{ClientRect, Point, Viewport};

/// Map a click from the page into canvas coordinates.
#[must_use]
pub fn locate(viewport: Viewport, client: Point, rect: ClientRect) -> Point {
    viewport.client_to_canvas(client, rect)
}

/// Measure a located click against the ball.
#[must_use]
pub fn judge(motion: &Motion, click: Point, ball: &BallState) -> Hit {
    hit_test(click, ball.center(), motion.tolerance())
}

/// What a click means for the session, per motion model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickRule {
    /// Drop-catch: a miss ends the session; a catch drops a new ball.
    EndOnMiss,
    /// Bounce: a miss only updates the status; a catch restarts the cycle.
    StatusOnMiss,
    /// Parabolic: the validation service has the final word.
    ServerDecides,
}

impl ClickRule {
    #[must_use]
    pub fn for_motion(motion: &Motion) -> Self {
        match motion {
            Motion::Drop(_) => Self::EndOnMiss,
            Motion::Bounce(_) => Self::StatusOnMiss,
            Motion::Parabolic(_) => Self::ServerDecides,
        }
    }
}

/// Allows one outstanding claim at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClaimGate {
    outstanding: Option<Ticket>,
}

impl ClaimGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the gate for `ticket`. Returns `false` if a claim is already
    /// waiting for its verdict.
    #[must_use]
    pub fn try_open(&mut self, ticket: Ticket) -> bool {
        if let Some(waiting) = self.outstanding {
            debug!(?waiting, "click ignored; claim outstanding");
            return false;
        }
        self.outstanding = Some(ticket);
        true
    }

    /// Release the gate if `ticket` is the claim it was held for.
    pub fn settle(&mut self, ticket: Ticket) -> bool {
        if self.holds(ticket) {
            self.outstanding = None;
            true
        } else {
            false
        }
    }

    /// Whether `ticket` is the claim still waiting for its verdict.
    #[must_use]
    pub fn holds(&self, ticket: Ticket) -> bool {
        self.outstanding == Some(ticket)
    }

    pub fn clear(&mut self) {
        self.outstanding = None;
    }
}
