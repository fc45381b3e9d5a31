//! linewin entrypoint: replay a buffer change script against a rendered-line window.
use anyhow::{Context, Result, ensure};
use clap::Parser;
use core_config::{Config, ConfigContext, load_from};
use core_events::{MAX_LINE_NUMBER, parse_script};
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

mod replay;

use replay::ReplaySettings;

const LOG_FILE_NAME: &str = "linewin.log";

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(
    name = "linewin",
    version,
    about = "Replay buffer edits against a rendered-line window"
)]
struct Args {
    /// Change script, one event per line: `delete A B`, `insert A B`,
    /// `change FROM COUNT`, `tokens A-B [C-D ...]`, `flush`.
    pub script: PathBuf,
    /// Optional configuration file path (overrides discovery of `linewin.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// First line number of the initial window (overrides `[window] start_line`).
    #[arg(long)]
    pub start: Option<usize>,
    /// Number of handles in the initial window (overrides `[window] capacity`).
    #[arg(long)]
    pub capacity: Option<usize>,
    /// Viewport rows the configured capacity is clamped to; 0 leaves it unclamped.
    #[arg(long, default_value_t = 0)]
    pub rows: u16,
    /// Rows of `--rows` taken by non-text chrome (status line and the like).
    #[arg(long, default_value_t = 0)]
    pub status_rows: u16,
    /// Emit line-delimited JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

impl Args {
    /// Merge CLI overrides over the (already viewport-clamped) config.
    fn settings(&self, config: &Config) -> Result<ReplaySettings> {
        let start_line = self.start.unwrap_or(config.effective_start_line);
        ensure!(
            start_line >= 1,
            "--start must be at least 1 (line numbers are 1-based)"
        );
        let capacity = self.capacity.unwrap_or(config.effective_capacity);
        ensure!(
            start_line
                .checked_add(capacity)
                .is_some_and(|end| end - 1 <= MAX_LINE_NUMBER),
            "window {start_line}+{capacity} reaches past line {MAX_LINE_NUMBER}"
        );
        Ok(ReplaySettings {
            start_line,
            capacity,
            json: self.json || config.file.output.json,
        })
    }
}

fn configure_logging() -> Option<WorkerGuard> {
    let log_dir = Path::new(".");
    let log_path = log_dir.join(LOG_FILE_NAME);
    if log_path.exists() {
        let _ = std::fs::remove_file(&log_path);
    }

    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    match tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_ansi(false)
        .with_writer(nb_writer)
        .try_init()
    {
        Ok(_) => Some(guard),
        // Global subscriber already installed; drop guard so writer shuts down.
        Err(_err) => None,
    }
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = configure_logging();
    install_panic_hook();
    info!(target: "runtime", "startup");

    let mut config = load_from(args.config.clone())?;
    config.apply_context(ConfigContext::new(args.rows, args.status_rows));
    let settings = args.settings(&config)?;

    let src = std::fs::read_to_string(&args.script)
        .with_context(|| format!("reading script {}", args.script.display()))?;
    let events = parse_script(&src)
        .with_context(|| format!("parsing script {}", args.script.display()))?;
    info!(
        target: "runtime.startup",
        script = %args.script.display(),
        events = events.len(),
        start_line = settings.start_line,
        capacity = settings.capacity,
        json = settings.json,
        config_override = args.config.is_some(),
        "bootstrap_complete"
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let metrics = replay::run(&settings, &events, &mut out)?;
    info!(
        target: "runtime",
        created = metrics.handles_created,
        evicted = metrics.handles_evicted,
        "shutdown"
    );
    Ok(())
}
