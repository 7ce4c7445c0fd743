mod sim;

use std::time::Duration;

use ballcatch::mode::Mode;
use ballcatch::net::{CaptchaApi, ClickClaim, NetConfig, NetError, ReqwestTransport, RetryNotice, TokioSleeper};
use ballcatch::viewport::Viewport;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::info;

use crate::sim::SimOptions;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Net(#[from] NetError),
    #[error("backend did not answer the warmup request")]
    Cold,
    #[error("simulation did not pass: {0}")]
    Failed(String),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "ballcatch", about = "Ball-catch CAPTCHA backend client and headless player")]
struct Cli {
    /// Overrides BALLCATCH_BASE_URL.
    #[arg(long)]
    base_url: Option<String>,

    /// Overrides BALLCATCH_MAX_RETRIES.
    #[arg(long)]
    max_retries: Option<u32>,

    /// Overrides BALLCATCH_RETRY_DELAY_MS.
    #[arg(long)]
    retry_delay_ms: Option<u64>,

    /// Overrides BALLCATCH_TIMEOUT_SECS.
    #[arg(long)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Touch the generate endpoint so a sleeping backend wakes up.
    Warmup,
    /// Fetch launch parameters for a new session.
    Generate,
    /// Submit one click for validation.
    Validate(ValidateArgs),
    /// Play a full session headlessly and report the outcome.
    Simulate(SimulateArgs),
}

#[derive(Args, Debug)]
struct ValidateArgs {
    #[arg(long)]
    session_id: String,
    /// Click x in physics space.
    #[arg(long)]
    x: f64,
    /// Click y in physics space.
    #[arg(long)]
    y: f64,
    /// Seconds since launch.
    #[arg(long)]
    time: f64,
}

#[derive(Args, Debug)]
struct SimulateArgs {
    #[arg(long, value_enum, default_value_t = ModeArg::Drop)]
    mode: ModeArg,

    /// Fly server-issued projectiles and let the backend judge clicks.
    #[arg(long, default_value_t = false)]
    validated: bool,

    #[arg(long, default_value_t = 1)]
    seed: u64,

    #[arg(long, default_value_t = 400.0)]
    width: f64,

    #[arg(long, default_value_t = 280.0)]
    height: f64,

    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    #[arg(long, default_value_t = 300.0)]
    reaction_ms: f64,

    /// Horizontal click error in canvas pixels.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    aim_offset: f64,

    #[arg(long, default_value_t = 30.0)]
    max_secs: f64,

    /// Print every UI action, not just the summary.
    #[arg(long, default_value_t = false)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Drop,
    Projectile,
}

impl From<ModeArg> for Mode {
    fn from(value: ModeArg) -> Self {
        match value {
            ModeArg::Drop => Self::DropCatch,
            ModeArg::Projectile => Self::Projectile,
        }
    }
}

type Api = CaptchaApi<ReqwestTransport, TokioSleeper>;

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = net_config(&cli);
    info!(base_url = %config.base_url, max_retries = config.retry.max_retries, "client configured");
    let transport = ReqwestTransport::new(&config)?;
    let api = CaptchaApi::new(transport, TokioSleeper, config);

    match cli.command {
        Command::Warmup => run_warmup(&api).await,
        Command::Generate => run_generate(&api).await,
        Command::Validate(args) => run_validate(&api, args).await,
        Command::Simulate(args) => run_simulate(&api, args).await,
    }
}

/// Environment first, then explicit flags on top.
fn net_config(cli: &Cli) -> NetConfig {
    let mut config = NetConfig::from_env();
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url);
    }
    if let Some(max_retries) = cli.max_retries {
        config.retry.max_retries = max_retries;
    }
    if let Some(delay_ms) = cli.retry_delay_ms {
        config.retry.delay = Duration::from_millis(delay_ms);
    }
    if let Some(secs) = cli.timeout_secs {
        config.timeout = Duration::from_secs(secs);
    }
    config
}

fn report_retry(notice: RetryNotice) {
    eprintln!(
        "waiting for server ({}/{}), retrying in {}ms",
        notice.attempt,
        notice.max_attempts,
        notice.delay.as_millis()
    );
}

async fn run_warmup(api: &Api) -> Result<(), CliError> {
    if !api.warmup(&mut report_retry).await {
        return Err(CliError::Cold);
    }
    println!("ok");
    Ok(())
}

async fn run_generate(api: &Api) -> Result<(), CliError> {
    let params = api.generate(&mut report_retry).await?;
    print_json(&params)
}

async fn run_validate(api: &Api, args: ValidateArgs) -> Result<(), CliError> {
    let claim = ClickClaim { session_id: args.session_id, click_x: args.x, click_y: args.y, time: args.time };
    let verdict = api.validate(&claim, &mut report_retry).await?;
    print_json(&verdict)
}

async fn run_simulate(api: &Api, args: SimulateArgs) -> Result<(), CliError> {
    let options = SimOptions {
        mode: args.mode.into(),
        validated: args.validated,
        seed: args.seed,
        viewport: Viewport::new(args.width, args.height),
        fps: args.fps,
        reaction_ms: args.reaction_ms,
        aim_offset: args.aim_offset,
        max_secs: args.max_secs,
    };
    let mut report = sim::run(&options, api).await;
    if !args.verbose {
        report.actions.clear();
    }
    print_json(&report)?;

    if report.success {
        Ok(())
    } else {
        Err(CliError::Failed(report.final_status.unwrap_or_else(|| "no outcome".to_owned())))
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
