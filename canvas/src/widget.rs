//! `CaptchaWidget`: the JavaScript-facing shell around [`GameCore`].
//!
//! The widget owns the canvas, feeds DOM events into the engine, and carries
//! out the [`Action`]s it returns: drawing, network calls, and the final
//! redirect. Every action except `RenderNeeded` is also forwarded to the
//! host page's callback as JSON so the page can update its own DOM (status
//! line, timer, progress, start button).

use std::cell::RefCell;
use std::rc::Rc;

use ballcatch::consts::BALL_RADIUS;
use ballcatch::engine::{Action, Completion, GameConfig, GameCore};
use ballcatch::mode::BalancedPolicy;
use ballcatch::net::{CaptchaApi, ClickClaim, NetConfig, RetryNotice};
use ballcatch::physics::Tuning;
use ballcatch::session::Ticket;
use ballcatch::viewport::{ClientRect, Point, Viewport};
use gloo_timers::callback::Timeout;
use tracing::{info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, UrlSearchParams, Window};

use crate::host::{FrameHook, PerformanceClock, RafScheduler};
use crate::render;
use crate::transport::{FetchTransport, TimerSleeper};

const MAX_WIDTH: f64 = 400.0;
const MAX_HEIGHT: f64 = 280.0;
const CONTAINER_PADDING: f64 = 20.0;
const HEIGHT_RATIO: f64 = 0.35;

type Api = CaptchaApi<FetchTransport, TimerSleeper>;

struct Inner {
    core: GameCore,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    on_action: js_sys::Function,
}

type Shared = Rc<RefCell<Inner>>;

#[wasm_bindgen]
pub struct CaptchaWidget {
    shared: Shared,
    api: Rc<Api>,
}

#[wasm_bindgen]
impl CaptchaWidget {
    /// Mount on `canvas`. `on_action` receives one JSON string per action.
    ///
    /// # Errors
    ///
    /// Fails outside a browser window or when the canvas has no 2D context.
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas: HtmlCanvasElement,
        on_action: js_sys::Function,
        mobile: bool,
        server_validation: bool,
    ) -> Result<CaptchaWidget, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        let viewport = fit_canvas(&window, &canvas);
        let config = GameConfig {
            tuning: if mobile { Tuning::mobile() } else { Tuning::desktop() },
            viewport,
            server_validation,
            return_url: return_url(&window),
        };

        let hook: FrameHook = Rc::default();
        let core = GameCore::new(
            config,
            Box::new(PerformanceClock::new(&window)),
            Box::new(RafScheduler::new(window, Rc::clone(&hook))),
            Box::new(BalancedPolicy::default()),
            seed(),
        );
        let shared = Rc::new(RefCell::new(Inner { core, canvas, ctx, on_action }));
        let api = Rc::new(CaptchaApi::new(FetchTransport, TimerSleeper, NetConfig::same_origin()));

        let weak = Rc::downgrade(&shared);
        let api_for_frames = Rc::clone(&api);
        *hook.borrow_mut() = Some(Rc::new(move || {
            if let Some(shared) = weak.upgrade() {
                let actions = shared.borrow_mut().core.tick();
                dispatch(&shared, &api_for_frames, actions);
            }
        }));

        info!(width = viewport.width, height = viewport.height, mobile, server_validation, "captcha mounted");
        render_scene(&shared);
        Ok(Self { shared, api })
    }

    /// Wake the backend ahead of the first start. Failure is only logged.
    pub fn warmup(&self) {
        let shared = Rc::clone(&self.shared);
        let api = Rc::clone(&self.api);
        spawn_local(async move {
            let mut notify = |notice: RetryNotice| retry_notice(&shared, &api, None, notice);
            api.warmup(&mut notify).await;
        });
    }

    pub fn start(&self) {
        let actions = self.shared.borrow_mut().core.start();
        dispatch(&self.shared, &self.api, actions);
    }

    pub fn stop(&self) {
        let actions = self.shared.borrow_mut().core.stop();
        dispatch(&self.shared, &self.api, actions);
    }

    /// Forward a click at client (CSS pixel) coordinates.
    pub fn click(&self, client_x: f64, client_y: f64) {
        let actions = {
            let mut inner = self.shared.borrow_mut();
            let r = inner.canvas.get_bounding_client_rect();
            let rect = ClientRect { left: r.left(), top: r.top(), width: r.width(), height: r.height() };
            inner.core.handle_click(Point::new(client_x, client_y), rect)
        };
        dispatch(&self.shared, &self.api, actions);
    }

    /// Refit the canvas to its container, e.g. on window resize.
    pub fn resize(&self) {
        let Some(window) = web_sys::window() else {
            return;
        };
        {
            let mut inner = self.shared.borrow_mut();
            let viewport = fit_canvas(&window, &inner.canvas);
            inner.core.set_viewport(viewport);
        }
        render_scene(&self.shared);
    }
}

// =============================================================================
// ACTION DISPATCH
// =============================================================================

fn dispatch(shared: &Shared, api: &Rc<Api>, actions: Vec<Action>) {
    for action in actions {
        match &action {
            Action::RenderNeeded => {
                render_scene(shared);
                continue;
            }
            Action::FetchParams { ticket } => spawn_fetch(shared, api, *ticket),
            Action::SubmitClaim { ticket, claim } => spawn_claim(shared, api, *ticket, claim.clone()),
            Action::ScheduleCompletion { delay_ms, target } => schedule_completion(*delay_ms, target.clone()),
            _ => {}
        }
        notify_host(shared, &action);
    }
}

fn render_scene(shared: &Shared) {
    let inner = shared.borrow();
    if let Err(e) = render::draw(&inner.ctx, &inner.core.scene()) {
        warn!(error = ?e, "render failed");
    }
}

fn notify_host(shared: &Shared, action: &Action) {
    let json = match serde_json::to_string(action) {
        Ok(json) => json,
        Err(e) => {
            warn!(error = %e, "action encode failed");
            return;
        }
    };
    // Cloned out so the page may call back into the widget from its handler.
    let callback = shared.borrow().on_action.clone();
    if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_str(&json)) {
        warn!(error = ?e, "host action callback threw");
    }
}

fn retry_notice(shared: &Shared, api: &Rc<Api>, ticket: Option<Ticket>, notice: RetryNotice) {
    let actions = shared.borrow().core.notice_retry(ticket, notice);
    dispatch(shared, api, actions);
}

fn spawn_fetch(shared: &Shared, api: &Rc<Api>, ticket: Ticket) {
    let shared = Rc::clone(shared);
    let api = Rc::clone(api);
    spawn_local(async move {
        let result = {
            let mut notify = |notice: RetryNotice| retry_notice(&shared, &api, Some(ticket), notice);
            api.generate(&mut notify).await
        };
        let actions = shared.borrow_mut().core.params_ready(ticket, result);
        dispatch(&shared, &api, actions);
    });
}

fn spawn_claim(shared: &Shared, api: &Rc<Api>, ticket: Ticket, claim: ClickClaim) {
    let shared = Rc::clone(shared);
    let api = Rc::clone(api);
    spawn_local(async move {
        let result = {
            let mut notify = |notice: RetryNotice| retry_notice(&shared, &api, Some(ticket), notice);
            api.validate(&claim, &mut notify).await
        };
        let actions = shared.borrow_mut().core.apply_verdict(ticket, result);
        dispatch(&shared, &api, actions);
    });
}

fn schedule_completion(delay_ms: u32, target: Completion) {
    Timeout::new(delay_ms, move || {
        let Some(window) = web_sys::window() else {
            return;
        };
        let location = window.location();
        let result = match &target {
            Completion::Redirect { url } => location.set_href(url),
            Completion::Reload => location.reload(),
        };
        if let Err(e) = result {
            warn!(error = ?e, "page transition failed");
        }
    })
    .forget();
}

// =============================================================================
// PAGE HELPERS
// =============================================================================

/// Size the canvas backing store to its container and return the new
/// logical viewport.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn fit_canvas(window: &Window, canvas: &HtmlCanvasElement) -> Viewport {
    let container_width = canvas
        .parent_element()
        .map_or(MAX_WIDTH + CONTAINER_PADDING, |p| f64::from(p.client_width()));
    let inner_height = match window.inner_height() {
        Ok(h) => h.as_f64().unwrap_or(MAX_HEIGHT / HEIGHT_RATIO),
        Err(_) => MAX_HEIGHT / HEIGHT_RATIO,
    };

    let min_side = BALL_RADIUS * 4.0;
    let width = (container_width - CONTAINER_PADDING).min(MAX_WIDTH).max(min_side).floor();
    let height = (inner_height * HEIGHT_RATIO).min(MAX_HEIGHT).max(min_side).floor();
    canvas.set_width(width as u32);
    canvas.set_height(height as u32);
    Viewport::new(width, height)
}

/// The `return_url` query parameter of the current page, if any.
fn return_url(window: &Window) -> Option<String> {
    let search = match window.location().search() {
        Ok(search) => search,
        Err(e) => {
            warn!(error = ?e, "location.search unavailable");
            return None;
        }
    };
    match UrlSearchParams::new_with_str(&search) {
        Ok(params) => params.get("return_url").filter(|url| !url.is_empty()),
        Err(e) => {
            warn!(error = ?e, "query string parse failed");
            None
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn seed() -> u64 {
    (js_sys::Math::random() * 9_007_199_254_740_992.0) as u64
}
