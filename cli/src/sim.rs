//! Headless playthrough of one CAPTCHA session.
//!
//! Drives a [`GameCore`] with a manual clock at a fixed frame rate and clicks
//! wherever the ball is drawn once it has been visible for the reaction time.
//! Network actions are carried out inline against a real [`CaptchaApi`], so a
//! validated run exercises the backend end to end.

#[cfg(test)]
#[path = "sim_test.rs"]
mod sim_test;

use std::collections::VecDeque;

use ballcatch::engine::{Action, Completion, GameConfig, GameCore};
use ballcatch::mode::{FixedPolicy, Mode};
use ballcatch::net::{CaptchaApi, RetryNotice, Sleeper, Transport};
use ballcatch::physics::Tuning;
use ballcatch::scheduler::{Clock, ManualClock, ManualScheduler};
use ballcatch::viewport::{ClientRect, Point, Viewport};
use serde::Serialize;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy)]
pub struct SimOptions {
    pub mode: Mode,
    pub validated: bool,
    pub seed: u64,
    pub viewport: Viewport,
    pub fps: f64,
    /// How long the ball must be on screen before the next click.
    pub reaction_ms: f64,
    /// Horizontal error added to every click.
    pub aim_offset: f64,
    /// Hard stop for the simulated wall clock.
    pub max_secs: f64,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            mode: Mode::DropCatch,
            validated: false,
            seed: 1,
            viewport: Viewport::new(400.0, 280.0),
            fps: 60.0,
            reaction_ms: 300.0,
            aim_offset: 0.0,
            max_secs: 30.0,
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct SimReport {
    pub success: bool,
    pub frames: u64,
    pub clicks: u32,
    pub final_status: Option<String>,
    pub completion: Option<Completion>,
    /// Every UI action in order, minus renders and timer ticks.
    pub actions: Vec<Action>,
}

pub async fn run<T: Transport, S: Sleeper>(options: &SimOptions, api: &CaptchaApi<T, S>) -> SimReport {
    let SimOptions { mode, validated, seed, viewport, .. } = *options;
    let clock = ManualClock::new(0.0);
    let frames = ManualScheduler::new();
    let config = GameConfig { tuning: Tuning::desktop(), viewport, server_validation: validated, return_url: None };
    let mut core =
        GameCore::new(config, Box::new(clock.clone()), Box::new(frames.clone()), Box::new(FixedPolicy(mode)), seed);

    let rect = ClientRect { left: 0.0, top: 0.0, width: viewport.width, height: viewport.height };
    let frame_ms = 1000.0 / options.fps.max(1.0);
    let max_ms = options.max_secs * 1000.0;
    let mut report = SimReport::default();
    let mut visible_since: Option<f64> = None;

    let actions = core.start();
    drain(&mut core, api, actions, &mut report).await;

    while core.is_active() && clock.now_ms() < max_ms {
        if frames.fire().is_none() {
            debug!("no frame pending; stopping");
            break;
        }
        clock.advance(frame_ms);
        report.frames += 1;
        let actions = core.tick();
        drain(&mut core, api, actions, &mut report).await;

        let Some(ball) = core.scene().ball else {
            visible_since = None;
            continue;
        };
        let now = clock.now_ms();
        let since = *visible_since.get_or_insert(now);
        if now - since < options.reaction_ms {
            continue;
        }

        report.clicks += 1;
        let target = Point::new(ball.center.x + options.aim_offset, ball.center.y);
        let actions = core.handle_click(target, rect);
        drain(&mut core, api, actions, &mut report).await;
        visible_since = None;
    }

    if core.is_active() {
        let actions = core.stop();
        drain(&mut core, api, actions, &mut report).await;
    }
    report.success = report.completion.is_some();
    info!(success = report.success, frames = report.frames, clicks = report.clicks, "simulation finished");
    report
}

/// Apply `actions`, performing network calls inline and feeding their
/// results back into the core until nothing is left.
async fn drain<T: Transport, S: Sleeper>(
    core: &mut GameCore,
    api: &CaptchaApi<T, S>,
    actions: Vec<Action>,
    report: &mut SimReport,
) {
    let mut queue: VecDeque<Action> = actions.into();
    while let Some(action) = queue.pop_front() {
        match &action {
            Action::RenderNeeded | Action::SetTimer { .. } => continue,
            Action::FetchParams { ticket } => {
                let mut notices = Vec::new();
                let result = api.generate(&mut |notice: RetryNotice| notices.push(notice)).await;
                for notice in notices {
                    queue.extend(core.notice_retry(Some(*ticket), notice));
                }
                queue.extend(core.params_ready(*ticket, result));
            }
            Action::SubmitClaim { ticket, claim } => {
                let mut notices = Vec::new();
                let result = api.validate(claim, &mut |notice: RetryNotice| notices.push(notice)).await;
                for notice in notices {
                    queue.extend(core.notice_retry(Some(*ticket), notice));
                }
                queue.extend(core.apply_verdict(*ticket, result));
            }
            Action::SetStatus { message, .. } if !message.is_empty() => {
                report.final_status = Some(message.clone());
            }
            Action::ScheduleCompletion { target, .. } => report.completion = Some(target.clone()),
            _ => {}
        }
        report.actions.push(action);
    }
}
