//! Motion models for the ball.
//!
//! Three interchangeable models share one contract: given the elapsed seconds
//! of the current cycle, update the [`BallState`] and report whether the cycle
//! has reached a terminal condition.
//!
//! - [`DropCatch`] integrates velocity once per frame, so its trajectory
//!   depends on the frame rate. The tuning presets are calibrated per frame.
//! - [`Bounce`] and [`Parabolic`] are closed-form functions of time and are
//!   re-evaluated from scratch every frame.

#[cfg(test)]
#[path = "physics_test.rs"]
mod physics_test;

use std::f64::consts::PI;

use rand::{Rng, RngCore};

use crate::consts::{
    BALL_RADIUS, BOUNCE_ESCAPE_X_RATIO, BOUNCE_FLOOR_OFFSET, BOUNCE_HORIZONTAL_SPEED, BOUNCE_START_X_RATIO,
    BOUNCE_TIME_BUDGET_SECS, BOUNCE_TOLERANCE_RADII, DROP_INITIAL_VELOCITY, DROP_TIME_BUDGET_SECS,
    DROP_TOLERANCE_RADII, DROP_VELOCITY_INCREMENT, NOMINAL_FPS, PARABOLIC_MIN_HORIZONTAL_SPEED,
    PARABOLIC_DROP_ORIGIN_X_RATIO, PARABOLIC_ORIGIN_X_RATIO, PARABOLIC_TIME_BUDGET_SECS, PARABOLIC_TOLERANCE_RADII,
};
use crate::viewport::{Point, Viewport};

// =============================================================================
// TUNING
// =============================================================================

/// Device-dependent speed knobs. The host picks the preset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tuning {
    /// Scales drop displacement and bounce horizontal speed.
    pub speed: f64,
    /// Scales the drop's per-frame velocity increment.
    pub gravity: f64,
    /// Seconds per bounce arc.
    pub bounce_period: f64,
    /// Bounce height as a fraction of canvas height.
    pub amplitude_ratio: f64,
}

impl Tuning {
    #[must_use]
    pub fn desktop() -> Self {
        Self { speed: 0.85, gravity: 0.75, bounce_period: 2.0, amplitude_ratio: 0.5 }
    }

    #[must_use]
    pub fn mobile() -> Self {
        Self { speed: 0.35, gravity: 0.4, bounce_period: 2.5, amplitude_ratio: 0.4 }
    }

    /// No scaling at all; handy for reasoning about raw per-frame numbers.
    #[must_use]
    pub fn unit() -> Self {
        Self { speed: 1.0, gravity: 1.0, bounce_period: 2.0, amplitude_ratio: 0.5 }
    }
}

impl Default for Tuning {
    fn default() -> Self {
        Self::desktop()
    }
}

// =============================================================================
// BALL STATE
// =============================================================================

/// Current ball position in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BallState {
    pub x: f64,
    pub y: f64,
    /// Fall velocity in px/frame. Only the drop model uses it.
    pub velocity: f64,
}

impl BallState {
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Why a motion cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminal {
    /// The cycle ran past its time budget.
    TimeExpired,
    /// The bouncing ball left through the right edge.
    Escaped,
    /// A falling ball or a projectile reached the ground strip.
    Grounded,
    /// The projectile's horizontal speed decayed away.
    Stalled,
}

// =============================================================================
// DROP-CATCH
// =============================================================================

/// Falling ball accelerated by a fixed increment every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropCatch {
    /// Velocity the ball starts each drop with.
    pub initial_velocity: f64,
    /// Added to the velocity once per frame.
    pub increment: f64,
    /// Multiplies velocity into per-frame displacement.
    pub speed: f64,
}

impl DropCatch {
    #[must_use]
    pub fn new(tuning: Tuning) -> Self {
        Self {
            initial_velocity: DROP_INITIAL_VELOCITY * tuning.speed,
            increment: DROP_VELOCITY_INCREMENT * tuning.gravity,
            speed: tuning.speed,
        }
    }

    /// Place a fresh ball at a random x near the top edge.
    ///
    /// x is drawn from `[2r, W - 2r)` so the ball never spawns half off-canvas.
    pub fn spawn(&self, viewport: Viewport, rng: &mut dyn RngCore) -> BallState {
        let span = (viewport.width - BALL_RADIUS * 4.0).max(0.0);
        BallState {
            x: rng.random::<f64>() * span + BALL_RADIUS * 2.0,
            y: BALL_RADIUS,
            velocity: self.initial_velocity,
        }
    }

    /// Advance one frame: accelerate, then move.
    pub fn step(&self, ball: &mut BallState) {
        ball.velocity += self.increment;
        ball.y += ball.velocity * self.speed;
    }

    /// Whether the ball has sunk into the ground strip.
    #[must_use]
    pub fn is_grounded(&self, ball: &BallState, viewport: Viewport) -> bool {
        ball.y > viewport.ground_top() - BALL_RADIUS
    }
}

// =============================================================================
// BOUNCE
// =============================================================================

/// Ball drifting right while bouncing along a `|sin|` arc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounce {
    pub period: f64,
    pub amplitude_ratio: f64,
    /// Horizontal speed in px/s.
    pub horizontal_speed: f64,
}

impl Bounce {
    #[must_use]
    pub fn new(tuning: Tuning) -> Self {
        Self {
            period: tuning.bounce_period,
            amplitude_ratio: tuning.amplitude_ratio,
            horizontal_speed: BOUNCE_HORIZONTAL_SPEED * tuning.speed * NOMINAL_FPS,
        }
    }

    /// Ball position `t` seconds into the cycle.
    #[must_use]
    pub fn position(&self, t: f64, viewport: Viewport) -> BallState {
        let amplitude = viewport.height * self.amplitude_ratio;
        let lift = (t * PI / self.period).sin().abs() * amplitude;
        BallState {
            x: viewport.width * BOUNCE_START_X_RATIO + t * self.horizontal_speed,
            y: (viewport.height - BOUNCE_FLOOR_OFFSET) - lift,
            velocity: 0.0,
        }
    }

    #[must_use]
    pub fn has_escaped(&self, ball: &BallState, viewport: Viewport) -> bool {
        ball.x > viewport.width * BOUNCE_ESCAPE_X_RATIO
    }
}

// =============================================================================
// PARABOLIC
// =============================================================================

/// Launch parameters for a parabolic flight, in physics space (px, s, rad).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Launch {
    pub velocity: f64,
    pub angle: f64,
    pub friction: f64,
    pub gravity: f64,
}

/// Where a parabolic flight starts on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LaunchSite {
    /// Thrown up from the ground line near the left edge.
    #[default]
    Ground,
    /// Released from the top edge, mid-canvas, and left to fall.
    Top,
}

/// Projectile with horizontal drag, evaluated in closed form.
///
/// Physics space has its origin at the launch point with y pointing up.
/// A [`LaunchSite::Ground`] flight starts at `(0.1·W, ground_top - r)`, a
/// [`LaunchSite::Top`] one at `(0.5·W, r)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parabolic {
    pub launch: Launch,
    pub site: LaunchSite,
}

impl Parabolic {
    #[must_use]
    pub fn new(launch: Launch) -> Self {
        Self { launch, site: LaunchSite::Ground }
    }

    #[must_use]
    pub fn from_site(launch: Launch, site: LaunchSite) -> Self {
        Self { launch, site }
    }

    /// `x(t) = v·cosθ·t·(1 - f·t)`, `y(t) = v·sinθ·t - ½·g·t²`.
    #[must_use]
    pub fn physics_position(&self, t: f64) -> Point {
        let Launch { velocity, angle, friction, gravity } = self.launch;
        Point {
            x: velocity * angle.cos() * t * (1.0 - friction * t),
            y: velocity * angle.sin() * t - 0.5 * gravity * t * t,
        }
    }

    /// Derivative of `x(t)`.
    #[must_use]
    pub fn horizontal_speed(&self, t: f64) -> f64 {
        let Launch { velocity, angle, friction, .. } = self.launch;
        velocity * angle.cos() * (1.0 - 2.0 * friction * t)
    }

    /// True once a flight that started moving sideways has slowed to a crawl.
    #[must_use]
    pub fn is_stalled(&self, t: f64) -> bool {
        self.horizontal_speed(0.0) > PARABOLIC_MIN_HORIZONTAL_SPEED
            && self.horizontal_speed(t) <= PARABOLIC_MIN_HORIZONTAL_SPEED
    }

    #[must_use]
    pub fn origin(&self, viewport: Viewport) -> Point {
        match self.site {
            LaunchSite::Ground => {
                Point::new(viewport.width * PARABOLIC_ORIGIN_X_RATIO, viewport.ground_top() - BALL_RADIUS)
            }
            LaunchSite::Top => Point::new(viewport.width * PARABOLIC_DROP_ORIGIN_X_RATIO, BALL_RADIUS),
        }
    }

    #[must_use]
    pub fn position(&self, t: f64, viewport: Viewport) -> BallState {
        let p = self.physics_position(t);
        let origin = self.origin(viewport);
        BallState { x: origin.x + p.x, y: origin.y - p.y, velocity: 0.0 }
    }

    /// Whether the ball has come down through the ground line.
    #[must_use]
    pub fn has_landed(&self, ball: &BallState, viewport: Viewport) -> bool {
        ball.y > viewport.ground_top() - BALL_RADIUS
    }

    /// Map a canvas point into physics space, as the validation service expects.
    #[must_use]
    pub fn canvas_to_physics(&self, canvas: Point, viewport: Viewport) -> Point {
        let origin = self.origin(viewport);
        Point::new(canvas.x - origin.x, origin.y - canvas.y)
    }
}

// =============================================================================
// MOTION
// =============================================================================

/// The motion model driving the current session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    Drop(DropCatch),
    Bounce(Bounce),
    Parabolic(Parabolic),
}

impl Motion {
    /// Seconds a single cycle may last.
    #[must_use]
    pub fn budget_secs(&self) -> f64 {
        match self {
            Self::Drop(_) => DROP_TIME_BUDGET_SECS,
            Self::Bounce(_) => BOUNCE_TIME_BUDGET_SECS,
            Self::Parabolic(_) => PARABOLIC_TIME_BUDGET_SECS,
        }
    }

    /// Maximum click-to-center distance that counts as a catch.
    #[must_use]
    pub fn tolerance(&self) -> f64 {
        let radii = match self {
            Self::Drop(_) => DROP_TOLERANCE_RADII,
            Self::Bounce(_) => BOUNCE_TOLERANCE_RADII,
            Self::Parabolic(_) => PARABOLIC_TOLERANCE_RADII,
        };
        BALL_RADIUS * radii
    }

    /// Initial ball placement for a new cycle.
    pub fn spawn(&self, viewport: Viewport, rng: &mut dyn RngCore) -> BallState {
        match self {
            Self::Drop(m) => m.spawn(viewport, rng),
            Self::Bounce(m) => m.position(0.0, viewport),
            Self::Parabolic(m) => m.position(0.0, viewport),
        }
    }

    /// Update `ball` for a frame `t` seconds into the cycle.
    ///
    /// The time budget is checked before anything moves, so an expired cycle
    /// leaves the ball where the last frame put it.
    pub fn advance(&self, ball: &mut BallState, t: f64, viewport: Viewport) -> Option<Terminal> {
        if t > self.budget_secs() {
            return Some(Terminal::TimeExpired);
        }
        match self {
            Self::Drop(m) => {
                m.step(ball);
                m.is_grounded(ball, viewport).then_some(Terminal::Grounded)
            }
            Self::Bounce(m) => {
                *ball = m.position(t, viewport);
                m.has_escaped(ball, viewport).then_some(Terminal::Escaped)
            }
            Self::Parabolic(m) => {
                if m.is_stalled(t) {
                    return Some(Terminal::Stalled);
                }
                *ball = m.position(t, viewport);
                m.has_landed(ball, viewport).then_some(Terminal::Grounded)
            }
        }
    }
}
