//! Game state controller.
//!
//! [`GameCore`] owns the session lifecycle
//! `Idle → Announcing → Running → {Success | Failure} → Idle` and nothing
//! else. It never touches the DOM, the network, or a real clock: time comes
//! from an injected [`Clock`], frames from an injected [`FrameScheduler`], and
//! every visible effect is returned to the host as an [`Action`].
//!
//! Async work (params fetch, claim validation) is requested through actions
//! carrying a [`Ticket`]; the host hands the result back via
//! [`GameCore::params_ready`] / [`GameCore::apply_verdict`]. Replies whose
//! ticket no longer matches the live session are dropped.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::consts::{COMPLETION_DELAY_MS, MODE_ANNOUNCE_MS};
use crate::hit::{Hit, Verdict};
use crate::input::{self, ClaimGate, ClickRule};
use crate::mode::{Mode, ModePolicy};
use crate::net::{ClickClaim, NetError, PhysicsParams, RetryNotice, ServerMode, ValidateResponse};
use crate::physics::{Bounce, DropCatch, LaunchSite, Motion, Parabolic, Terminal, Tuning};
use crate::scheduler::{Clock, FrameLoop, FrameScheduler};
use crate::session::{ParamsState, Session, Ticket};
use crate::viewport::{ClientRect, Point, Viewport};

// ── Labels and messages ─────────────────────────────────────────

pub const START_LABEL: &str = "Start Verification";
pub const BUSY_LABEL: &str = "Verifying...";

pub const TIME_EXPIRED_MESSAGE: &str = "Time expired! Try again.";
pub const ESCAPED_MESSAGE: &str = "Ball escaped! Try again.";
pub const MISSED_MESSAGE: &str = "Missed! Try again.";
pub const MISSED_CLOSER_MESSAGE: &str = "Missed! Try clicking closer to the ball.";
pub const CHECKING_MESSAGE: &str = "Checking...";
pub const SUCCESS_MESSAGE: &str = "Success! You caught the ball 3 times!";
pub const WAKING_MESSAGE: &str = "Waking up server... Please wait.";
pub const SERVER_ERROR_MESSAGE: &str = "Could not reach the verification server. Try again.";
pub const FRAME_ERROR_MESSAGE: &str = "Animation unavailable. Try again.";

// =============================================================================
// ACTIONS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Neutral,
    Success,
    Error,
}

/// Where the page goes after a successful verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Completion {
    Redirect { url: String },
    Reload,
}

/// Effects returned to the host for processing, in order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    SetStatus { message: String, tone: Tone },
    ShowMode { text: String },
    HideMode,
    /// Remaining time, already formatted (`"3.2s"`).
    SetTimer { text: String },
    HideTimer,
    SetProgress { text: String },
    SetStartControl { enabled: bool, label: String },
    /// Fetch launch params and report back through `params_ready`.
    FetchParams { ticket: Ticket },
    /// Validate a click and report back through `apply_verdict`.
    SubmitClaim { ticket: Ticket, claim: ClickClaim },
    ScheduleCompletion { delay_ms: u32, target: Completion },
    RenderNeeded,
}

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure(String),
    /// Stopped by the host; nothing is announced.
    Cancelled,
}

// =============================================================================
// SCENE
// =============================================================================

/// What the renderer should draw this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scene {
    pub viewport: Viewport,
    /// `None` outside of play.
    pub ball: Option<BallSprite>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallSprite {
    pub center: Point,
    /// Falling balls cast a shadow: drop-catch and top-launched flights.
    pub shadow: bool,
}

// =============================================================================
// CONFIG
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameConfig {
    pub tuning: Tuning,
    pub viewport: Viewport,
    /// Fly projectiles from server params and let the server judge clicks.
    pub server_validation: bool,
    /// Redirect target on success; the page reloads when absent.
    pub return_url: Option<String>,
}

// =============================================================================
// CONTROLLER
// =============================================================================

pub struct GameCore {
    config: GameConfig,
    clock: Box<dyn Clock>,
    frames: FrameLoop,
    policy: Box<dyn ModePolicy>,
    rng: StdRng,
    session: Option<Session>,
    gate: ClaimGate,
    next_seq: u64,
    next_serial: u32,
}

impl GameCore {
    #[must_use]
    pub fn new(
        config: GameConfig,
        clock: Box<dyn Clock>,
        scheduler: Box<dyn FrameScheduler>,
        policy: Box<dyn ModePolicy>,
        seed: u64,
    ) -> Self {
        Self {
            config,
            clock,
            frames: FrameLoop::new(scheduler),
            policy,
            rng: StdRng::seed_from_u64(seed),
            session: None,
            gate: ClaimGate::new(),
            next_seq: 0,
            next_serial: 0,
        }
    }

    // --- Lifecycle ---

    /// Begin a new attempt. Ignored while one is already in progress.
    pub fn start(&mut self) -> Vec<Action> {
        if self.session.is_some() {
            debug!("start ignored; session in progress");
            return Vec::new();
        }

        let mode = self.policy.choose(&mut self.rng);
        self.next_seq += 1;
        let seq = self.next_seq;
        let now = self.clock.now_ms();

        let mut actions = vec![
            Action::SetStartControl { enabled: false, label: BUSY_LABEL.into() },
            status("", Tone::Neutral),
            Action::ShowMode { text: mode.announcement().into() },
        ];

        let params = if self.config.server_validation && mode == Mode::Projectile {
            let ticket = self.issue_ticket(seq);
            actions.push(Action::FetchParams { ticket });
            ParamsState::Pending(ticket)
        } else {
            ParamsState::NotNeeded
        };

        self.gate.clear();
        self.session = Some(Session::new(seq, mode, now + MODE_ANNOUNCE_MS, params));
        info!(session = seq, ?mode, validated = self.config.server_validation, "session started");

        self.keep_going(actions)
    }

    /// Handle a fired frame callback.
    pub fn tick(&mut self) -> Vec<Action> {
        if !self.frames.fired() {
            debug!("stale frame ignored");
            return Vec::new();
        }
        let now = self.clock.now_ms();
        let (running, ready) = match &self.session {
            Some(session) => (session.is_running(), session.ready_to_play(now)),
            None => return Vec::new(),
        };
        if running {
            self.advance(now)
        } else if ready {
            self.begin_play(now)
        } else {
            self.keep_going(Vec::new())
        }
    }

    /// Abort the current attempt without announcing an outcome.
    pub fn stop(&mut self) -> Vec<Action> {
        if self.session.is_none() {
            self.frames.cancel();
            return Vec::new();
        }
        self.finish(Outcome::Cancelled)
    }

    // --- Input ---

    /// Handle a click at `client` (CSS pixels) on a canvas laid out at `rect`.
    pub fn handle_click(&mut self, client: Point, rect: ClientRect) -> Vec<Action> {
        let now = self.clock.now_ms();
        let viewport = self.config.viewport;
        let Some(session) = self.session.as_ref() else {
            debug!("click ignored; no session");
            return Vec::new();
        };
        let (true, Some(motion)) = (session.is_running(), session.motion) else {
            debug!(session = session.seq, "click ignored; not running");
            return Vec::new();
        };

        let click = input::locate(viewport, client, rect);
        let hit = input::judge(&motion, click, &session.ball);
        debug!(session = session.seq, distance = hit.distance, tolerance = hit.tolerance, "click");

        match ClickRule::for_motion(&motion) {
            ClickRule::EndOnMiss => self.drop_click(hit),
            ClickRule::StatusOnMiss => self.bounce_click(hit, now),
            ClickRule::ServerDecides => self.claim_click(click, hit, now),
        }
    }

    // --- Async replies ---

    /// Deliver the result of a [`Action::FetchParams`] request.
    pub fn params_ready(&mut self, ticket: Ticket, result: Result<PhysicsParams, NetError>) -> Vec<Action> {
        let Some(session) = self.session.as_mut().filter(|s| s.awaits_params(ticket)) else {
            debug!(?ticket, "stale params reply dropped");
            return Vec::new();
        };
        match result {
            Ok(params) => {
                if params.game_mode == Some(ServerMode::Unknown) {
                    debug!("unrecognized server game mode; launching from the ground");
                }
                let flight = Parabolic::from_site(params.launch(), params.launch_site());
                debug!(site = ?flight.site, "flight configured");
                session.motion = Some(Motion::Parabolic(flight));
                session.session_id = Some(params.session_id);
                session.params_arrived();
                Vec::new()
            }
            Err(e) => {
                warn!(error = %e, session = ticket.session, "params fetch failed");
                self.finish(Outcome::Failure(SERVER_ERROR_MESSAGE.into()))
            }
        }
    }

    /// Deliver the result of a [`Action::SubmitClaim`] request.
    pub fn apply_verdict(&mut self, ticket: Ticket, result: Result<ValidateResponse, NetError>) -> Vec<Action> {
        let live = self.session.as_ref().is_some_and(|s| s.seq == ticket.session);
        if !live || !self.gate.settle(ticket) {
            debug!(?ticket, "stale verdict dropped");
            return Vec::new();
        }

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, session = ticket.session, "claim validation failed");
                return self.finish(Outcome::Failure(SERVER_ERROR_MESSAGE.into()));
            }
        };
        if let Some(note) = &response.error {
            debug!(note = %note, "validation service note");
        }

        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };
        let verdict = session
            .last_verdict
            .unwrap_or(Verdict::provisional(false))
            .with_authoritative(response.valid);
        if verdict.overruled() {
            warn!(
                session = session.seq,
                provisional = verdict.provisional,
                authoritative = response.valid,
                "server overruled local hit test"
            );
        }
        session.last_verdict = Some(verdict);

        if verdict.is_catch() {
            let now = self.clock.now_ms();
            self.projectile_catch(response.catch_count, now)
        } else {
            vec![status(MISSED_CLOSER_MESSAGE, Tone::Error)]
        }
    }

    /// A network call is waiting to retry.
    ///
    /// `ticket` is the request the notice belongs to, `None` for the warmup.
    /// Notices for requests the live session no longer waits on are dropped,
    /// and warmup notices only show while no session is running.
    pub fn notice_retry(&self, ticket: Option<Ticket>, notice: RetryNotice) -> Vec<Action> {
        if !self.is_current(ticket) {
            debug!(?ticket, attempt = notice.attempt, "stale retry notice dropped");
            return Vec::new();
        }
        debug!(?ticket, attempt = notice.attempt, total = notice.max_attempts, "retry pending");
        vec![status(WAKING_MESSAGE, Tone::Neutral)]
    }

    /// Whether a reply to `ticket` would still be used. The host may stop
    /// retrying a request once this turns false.
    #[must_use]
    pub fn is_current(&self, ticket: Option<Ticket>) -> bool {
        match (ticket, &self.session) {
            (None, session) => session.is_none(),
            (Some(_), None) => false,
            (Some(ticket), Some(session)) => session.awaits_params(ticket) || self.gate.holds(ticket),
        }
    }

    // --- Viewport ---

    /// Resize the play area. A ball in flight keeps its relative position;
    /// the closed-form models recompute from the new size on the next frame.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        let old = self.config.viewport;
        self.config.viewport = viewport;
        if let Some(session) = self.session.as_mut() {
            if old.width > 0.0 && old.height > 0.0 {
                session.ball.x *= viewport.width / old.width;
                session.ball.y *= viewport.height / old.height;
            }
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn scene(&self) -> Scene {
        let ball = self.session.as_ref().filter(|s| s.is_running()).map(|s| BallSprite {
            center: s.ball.center(),
            shadow: matches!(
                s.motion,
                Some(Motion::Drop(_) | Motion::Parabolic(Parabolic { site: LaunchSite::Top, .. }))
            ),
        });
        Scene { viewport: self.config.viewport, ball }
    }

    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    fn issue_ticket(&mut self, session: u64) -> Ticket {
        self.next_serial += 1;
        Ticket { session, serial: self.next_serial }
    }

    fn begin_play(&mut self, now: f64) -> Vec<Action> {
        let viewport = self.config.viewport;
        let tuning = self.config.tuning;
        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };
        let motion = session.motion.unwrap_or(match session.mode {
            Mode::Projectile => Motion::Bounce(Bounce::new(tuning)),
            Mode::DropCatch => Motion::Drop(DropCatch::new(tuning)),
        });
        let ball = motion.spawn(viewport, &mut self.rng);
        session.begin_play(motion, ball, now);
        info!(session = session.seq, motion = motion_name(&motion), "play started");

        let actions = vec![Action::HideMode, Action::SetTimer { text: timer_text(motion.budget_secs(), 0.0) }];
        self.keep_going(actions)
    }

    fn advance(&mut self, now: f64) -> Vec<Action> {
        let viewport = self.config.viewport;
        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };
        let Some(motion) = session.motion else {
            return Vec::new();
        };
        let t = session.elapsed_secs(now);
        if let Some(terminal) = motion.advance(&mut session.ball, t, viewport) {
            debug!(session = session.seq, ?terminal, t, "cycle ended");
            return self.finish(Outcome::Failure(terminal_message(terminal).into()));
        }
        let timer = Action::SetTimer { text: timer_text(motion.budget_secs(), t) };
        self.keep_going(vec![timer])
    }

    /// Request the next frame and ask for a render. Ends the session if the
    /// host will not give us a frame.
    fn keep_going(&mut self, mut actions: Vec<Action>) -> Vec<Action> {
        actions.push(Action::RenderNeeded);
        if !self.frames.schedule() {
            actions.extend(self.finish(Outcome::Failure(FRAME_ERROR_MESSAGE.into())));
        }
        actions
    }

    fn drop_click(&mut self, hit: Hit) -> Vec<Action> {
        let viewport = self.config.viewport;
        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };
        session.last_verdict = Some(Verdict::provisional(hit.is_catch()));
        if !hit.is_catch() {
            return self.finish(Outcome::Failure(MISSED_MESSAGE.into()));
        }

        session.record_catch();
        let progress = progress(session.remaining());
        if session.is_complete() {
            let mut actions = vec![progress];
            actions.extend(self.finish(Outcome::Success));
            return actions;
        }
        if let Some(motion) = session.motion {
            session.ball = motion.spawn(viewport, &mut self.rng);
        }
        let message = format!("Good catch! {} more to go.", session.remaining());
        vec![progress, status(message, Tone::Neutral)]
    }

    fn bounce_click(&mut self, hit: Hit, now: f64) -> Vec<Action> {
        if let Some(session) = self.session.as_mut() {
            session.last_verdict = Some(Verdict::provisional(hit.is_catch()));
        }
        if !hit.is_catch() {
            return vec![status(MISSED_CLOSER_MESSAGE, Tone::Error)];
        }
        self.projectile_catch(None, now)
    }

    fn claim_click(&mut self, click: Point, hit: Hit, now: f64) -> Vec<Action> {
        let viewport = self.config.viewport;
        let Some(session) = self.session.as_ref() else {
            return Vec::new();
        };
        let Some(session_id) = session.session_id.clone() else {
            warn!(session = session.seq, "parabolic flight without a session id");
            return Vec::new();
        };
        let Some(Motion::Parabolic(flight)) = session.motion else {
            return Vec::new();
        };
        let seq = session.seq;
        let t = session.elapsed_secs(now);

        let ticket = self.issue_ticket(seq);
        if !self.gate.try_open(ticket) {
            return Vec::new();
        }
        let physics = flight.canvas_to_physics(click, viewport);
        let claim = ClickClaim { session_id, click_x: physics.x, click_y: physics.y, time: t };
        if let Some(session) = self.session.as_mut() {
            session.last_verdict = Some(Verdict::provisional(hit.is_catch()));
        }
        debug!(session = seq, ?ticket, provisional = hit.is_catch(), t, "claim submitted");

        let feedback = if hit.is_catch() {
            status(CHECKING_MESSAGE, Tone::Neutral)
        } else {
            status(MISSED_CLOSER_MESSAGE, Tone::Error)
        };
        vec![feedback, Action::SubmitClaim { ticket, claim }]
    }

    /// Count a projectile catch. The server's count wins when it sends one.
    fn projectile_catch(&mut self, server_count: Option<u32>, now: f64) -> Vec<Action> {
        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };
        match server_count {
            Some(count) => session.sync_catches(count),
            None => session.record_catch(),
        };
        let progress = progress(session.remaining());
        if session.is_complete() {
            let mut actions = vec![progress];
            actions.extend(self.finish(Outcome::Success));
            return actions;
        }
        session.restart_cycle(now);
        let message = format!("Good! {} more to go!", session.remaining());
        vec![progress, status(message, Tone::Success)]
    }

    /// The single exit path. Stops the loop, drops the session, and hands the
    /// start control back.
    fn finish(&mut self, outcome: Outcome) -> Vec<Action> {
        self.frames.cancel();
        self.gate.clear();
        let ended = self.session.take();
        info!(
            session = ended.as_ref().map(|s| s.seq),
            catches = ended.as_ref().map_or(0, |s| s.success_count),
            ?outcome,
            "session ended"
        );

        let mut actions = vec![Action::HideMode, Action::HideTimer];
        match outcome {
            Outcome::Success => {
                actions.push(status(SUCCESS_MESSAGE, Tone::Success));
                actions.push(Action::ScheduleCompletion { delay_ms: COMPLETION_DELAY_MS, target: self.completion() });
            }
            Outcome::Failure(message) => actions.push(status(message, Tone::Error)),
            Outcome::Cancelled => {}
        }
        actions.push(Action::SetStartControl { enabled: true, label: START_LABEL.into() });
        actions
    }

    fn completion(&self) -> Completion {
        match self.config.return_url.as_deref().filter(|url| !url.is_empty()) {
            Some(url) => Completion::Redirect { url: url.to_string() },
            None => Completion::Reload,
        }
    }
}

fn status(message: impl Into<String>, tone: Tone) -> Action {
    Action::SetStatus { message: message.into(), tone }
}

fn progress(remaining: u32) -> Action {
    Action::SetProgress { text: format!("{remaining} more to go!") }
}

fn timer_text(budget_secs: f64, elapsed_secs: f64) -> String {
    format!("{:.1}s", (budget_secs - elapsed_secs).max(0.0))
}

fn terminal_message(terminal: Terminal) -> &'static str {
    match terminal {
        Terminal::TimeExpired => TIME_EXPIRED_MESSAGE,
        Terminal::Escaped | Terminal::Stalled => ESCAPED_MESSAGE,
        Terminal::Grounded => MISSED_MESSAGE,
    }
}

fn motion_name(motion: &Motion) -> &'static str {
    match motion {
        Motion::Drop(_) => "drop",
        Motion::Bounce(_) => "bounce",
        Motion::Parabolic(_) => "parabolic",
    }
}
