//! Rendering: draws a [`Scene`] to a 2D context.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! It receives a read-only scene description and produces pixels; it does not
//! mutate any game state.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.
//! The caller ([`crate::widget`]) logs the result.

use std::f64::consts::PI;

use ballcatch::consts::{BALL_RADIUS, GROUND_HEIGHT, SHADOW_OFFSET};
use ballcatch::engine::{BallSprite, Scene};
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

const GROUND_FILL: &str = "#e9ecef";
const BALL_FILL: &str = "#dc3545";
const SHADOW_FILL: &str = "rgba(0, 0, 0, 0.2)";

/// Draw the full scene: ground strip, then the ball (shadow first).
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails.
pub fn draw(ctx: &CanvasRenderingContext2d, scene: &Scene) -> Result<(), JsValue> {
    let Scene { viewport, ball } = *scene;
    ctx.clear_rect(0.0, 0.0, viewport.width, viewport.height);

    ctx.save();
    ctx.set_fill_style_str(GROUND_FILL);
    ctx.fill_rect(0.0, viewport.ground_top(), viewport.width, GROUND_HEIGHT);
    ctx.restore();

    if let Some(ball) = ball {
        draw_ball(ctx, ball)?;
    }
    Ok(())
}

fn draw_ball(ctx: &CanvasRenderingContext2d, ball: BallSprite) -> Result<(), JsValue> {
    if ball.shadow {
        fill_circle(ctx, ball.center.x, ball.center.y + SHADOW_OFFSET, SHADOW_FILL)?;
    }
    fill_circle(ctx, ball.center.x, ball.center.y, BALL_FILL)
}

fn fill_circle(ctx: &CanvasRenderingContext2d, x: f64, y: f64, fill: &str) -> Result<(), JsValue> {
    ctx.save();
    ctx.begin_path();
    ctx.arc(x, y, BALL_RADIUS, 0.0, 2.0 * PI)?;
    ctx.set_fill_style_str(fill);
    ctx.fill();
    ctx.restore();
    Ok(())
}
