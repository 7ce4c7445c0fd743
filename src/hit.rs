#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::viewport::Point;

/// Result of testing a click against the ball.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Distance from the click to the ball center, in canvas pixels.
    pub distance: f64,
    /// The tolerance the distance was compared against.
    pub tolerance: f64,
}

impl Hit {
    /// A click at exactly `tolerance` still counts.
    #[must_use]
    pub fn is_catch(&self) -> bool {
        self.distance <= self.tolerance
    }
}

/// Measure `click` against `ball_center`.
#[must_use]
pub fn hit_test(click: Point, ball_center: Point, tolerance: f64) -> Hit {
    Hit { distance: click.distance_to(ball_center), tolerance }
}

/// The two independent opinions on whether a click caught the ball.
///
/// `provisional` comes from the local hit test and drives immediate UI
/// feedback. `authoritative` is filled in when the validation service
/// answers; when present it decides the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub provisional: bool,
    pub authoritative: Option<bool>,
}

impl Verdict {
    #[must_use]
    pub fn provisional(hit: bool) -> Self {
        Self { provisional: hit, authoritative: None }
    }

    #[must_use]
    pub fn with_authoritative(self, valid: bool) -> Self {
        Self { authoritative: Some(valid), ..self }
    }

    /// The final answer: the server's when known, otherwise the local one.
    #[must_use]
    pub fn is_catch(&self) -> bool {
        self.authoritative.unwrap_or(self.provisional)
    }

    /// Whether the server overruled the local hit test.
    #[must_use]
    pub fn overruled(&self) -> bool {
        self.authoritative.is_some_and(|valid| valid != self.provisional)
    }
}
