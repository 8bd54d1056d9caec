use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use render_services::batch::run_batch;
use render_services::config::{Config, Overrides, Settings};
use render_services::render::{Action, RenderClient, SuccessPolicy};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Suspend or resume Render services and databases
#[derive(Parser, Debug)]
#[command(name = "render-services", version, about, long_about = None)]
struct Args {
    /// Action to apply to every resource (`unsuspend` is an alias of `resume`)
    #[arg(value_enum)]
    action: Action,

    /// Render API key
    #[arg(long, env = "RENDER_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Comma-separated service and database IDs
    #[arg(long, env = "RENDER_SERVICE_IDS")]
    service_ids: Option<String>,

    /// Render API root
    #[arg(long, env = "RENDER_API_URL")]
    base_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Which HTTP statuses count as success
    #[arg(long, value_enum)]
    success_policy: Option<SuccessPolicy>,

    /// Directory for per-run log files
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Only log to the console
    #[arg(long)]
    no_log_file: bool,

    /// Console log level; the per-run log file records at `info` or more
    /// verbose even with `off`. `RUST_LOG` directives refine both
    #[arg(long, value_enum, default_value = "info")]
    log_level: LogLevel,

    /// Print the endpoints that would be called without calling them
    #[arg(long)]
    dry_run: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

/// Flag level as the default, refined by `RUST_LOG`-style directives
fn log_filter(level: Level, directives: Option<&str>) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .parse_lossy(directives.unwrap_or_default())
}

/// The per-run file keeps at least `info`, even when the console is silenced
fn file_level(level: LogLevel) -> Level {
    level
        .to_tracing_level()
        .map_or(Level::INFO, |l| l.max(Level::INFO))
}

/// Log to the console and, when `log_file` is set, to that file as well
fn setup_logging(
    level: LogLevel,
    log_file: Option<&Path>,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let directives = std::env::var("RUST_LOG").ok();

    let console = level.to_tracing_level().map(|tracing_level| {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_filter(log_filter(tracing_level, directives.as_deref()))
    });

    let (file_layer, guard) = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create log directory {:?}", parent))?;
            }

            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {:?}", path))?;

            let (non_blocking, guard) = tracing_appender::non_blocking(file);

            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true)
                .with_filter(log_filter(file_level(level), directives.as_deref()));

            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    if console.is_none() && file_layer.is_none() {
        return Ok(None);
    }

    tracing_subscriber::registry()
        .with(console)
        .with(file_layer)
        .init();

    if let Some(path) = log_file {
        tracing::debug!("Log file: {:?}", path);
    }

    Ok(guard)
}

/// `<dir>/<action>_<YYYY-MM-DD_HH-MM-SS>.log`
fn log_file_path(dir: &Path, action: Action, now: chrono::DateTime<chrono::Local>) -> PathBuf {
    dir.join(format!("{}_{}.log", action, now.format("%Y-%m-%d_%H-%M-%S")))
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let loaded = Config::load();
    let config = loaded.as_ref().cloned().unwrap_or_default();

    let log_file = (!args.no_log_file).then(|| {
        log_file_path(
            &config.log_dir(args.log_dir.clone()),
            args.action,
            chrono::Local::now(),
        )
    });

    let _log_guard = match setup_logging(args.log_level, log_file.as_deref()) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("Error initializing logger: {:#}", err);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = &loaded {
        tracing::warn!("Ignoring config file: {:#}", e);
    }

    match run(args, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args, config: Config) -> Result<()> {
    tracing::info!("Starting {} operation...", args.action);

    let overrides = Overrides {
        api_key: args.api_key,
        service_ids: args.service_ids,
        base_url: args.base_url,
        timeout_secs: args.timeout,
        success_policy: args.success_policy,
    };
    let settings = Settings::resolve(overrides, config)?;

    let client = RenderClient::with_options(settings.api_key, settings.client)?;
    tracing::debug!(
        "Using {} with {} success policy",
        client.base_url(),
        client.success_policy().as_str()
    );

    let ids = &settings.resource_ids;
    tracing::info!(
        "Processing {} resources: {}",
        ids.len(),
        ids.iter().map(|id| id.as_str()).collect::<Vec<_>>().join(", ")
    );

    if args.dry_run {
        for id in ids {
            let url = client.endpoint(args.action, id)?;
            tracing::info!("[dry-run] POST {}", url);
        }
        return Ok(());
    }

    let report = run_batch(&client, args.action, ids).await;

    if report.is_success() {
        tracing::info!(
            "Operation completed: {} {}",
            report.succeeded(),
            report.action().past_tense()
        );
    } else {
        tracing::warn!(
            "Operation completed: {} {}, {} failed",
            report.succeeded(),
            report.action().past_tense(),
            report.failed()
        );
    }

    Ok(())
}
