//! Shared numeric constants for the game engine.

// ── Scene ───────────────────────────────────────────────────────

/// Ball radius in canvas pixels.
pub const BALL_RADIUS: f64 = 10.0;

/// Height of the ground strip drawn along the bottom edge.
pub const GROUND_HEIGHT: f64 = 25.0;

/// Vertical offset of the drop shadow below the ball.
pub const SHADOW_OFFSET: f64 = 3.0;

// ── Hit-testing ─────────────────────────────────────────────────

/// Drop-catch tolerance as a multiple of the ball radius.
pub const DROP_TOLERANCE_RADII: f64 = 2.0;

/// Bounce tolerance as a multiple of the ball radius.
pub const BOUNCE_TOLERANCE_RADII: f64 = 2.2;

/// Parabolic tolerance; matches the validation service's 20 px threshold.
pub const PARABOLIC_TOLERANCE_RADII: f64 = 2.0;

// ── Drop-catch ──────────────────────────────────────────────────

/// Initial fall velocity before the speed multiplier.
pub const DROP_INITIAL_VELOCITY: f64 = 0.1;

/// Per-frame velocity increment before the gravity multiplier.
pub const DROP_VELOCITY_INCREMENT: f64 = 0.05;

/// Seconds allowed for a drop-catch session.
pub const DROP_TIME_BUDGET_SECS: f64 = 5.0;

// ── Bounce ──────────────────────────────────────────────────────

/// Seconds allowed per bounce cycle.
pub const BOUNCE_TIME_BUDGET_SECS: f64 = 5.0;

/// Launch x as a fraction of canvas width.
pub const BOUNCE_START_X_RATIO: f64 = 0.2;

/// The ball escapes once x passes this fraction of canvas width.
pub const BOUNCE_ESCAPE_X_RATIO: f64 = 0.8;

/// Resting line of the bounce, measured up from the bottom edge.
pub const BOUNCE_FLOOR_OFFSET: f64 = 40.0;

/// Horizontal speed in pixels per frame before the speed multiplier.
pub const BOUNCE_HORIZONTAL_SPEED: f64 = 1.2;

/// Nominal frame rate used to turn per-frame speed into per-second speed.
pub const NOMINAL_FPS: f64 = 60.0;

// ── Parabolic ───────────────────────────────────────────────────

/// Seconds allowed per parabolic flight.
pub const PARABOLIC_TIME_BUDGET_SECS: f64 = 3.0;

/// Launch x as a fraction of canvas width.
pub const PARABOLIC_ORIGIN_X_RATIO: f64 = 0.1;

/// Release x, as a fraction of canvas width, for flights dropped from the top.
pub const PARABOLIC_DROP_ORIGIN_X_RATIO: f64 = 0.5;

/// Flight is over once horizontal speed falls to this many px/s.
pub const PARABOLIC_MIN_HORIZONTAL_SPEED: f64 = 1.0;

// ── Session ─────────────────────────────────────────────────────

/// Catches needed to pass.
pub const REQUIRED_CATCHES: u32 = 3;

/// How long the mode banner is shown before play starts, fade included.
pub const MODE_ANNOUNCE_MS: f64 = 1800.0;

/// Delay between the success overlay and the page transition.
pub const COMPLETION_DELAY_MS: u32 = 2000;
