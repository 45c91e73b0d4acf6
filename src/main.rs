//! Spike timer console shell
//!
//! Connects the game event feed (or the demo source) to the countdown and
//! renders the overlay messages on stdout.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use sysinfo::System;

use spike_timer::error::{AppResult, HotkeyError};
use spike_timer::hotkeys;
use spike_timer::overlay::{ConsolePresenter, JsonLinesPresenter, Presenter};
use spike_timer::platform;
use spike_timer::timer::IntervalScheduler;
use spike_timer::{App, AppConfig, AppMessage};

const LOG_TARGET_STARTUP: &str = "spike_timer::startup";

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    /// Human readable countdown lines
    #[default]
    Console,
    /// One JSON message per line, for an external overlay window
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "spike-timer")]
#[command(about = "Countdown overlay that starts when the spike is planted")]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to config/config.json next to the executable)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Game event feed: a file of JSON lines, or `-` for stdin
    #[arg(long, value_name = "PATH|-")]
    feed: Option<String>,

    /// Use the demo event source even if a feed is given
    #[arg(long)]
    demo: bool,

    /// Do not register global hotkeys
    #[arg(long)]
    no_hotkeys: bool,

    /// How overlay messages are written to stdout
    #[arg(long, value_enum, default_value_t = OutputFormat::Console)]
    output: OutputFormat,
}

fn initialize_tracing() {
    use tracing_appender::rolling;
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    // Get log directory in user config folder
    let log_dir = dirs::config_dir()
        .map(|dir| dir.join("SpikeTimer").join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"));

    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("Warning: Failed to create log directory: {}", e);
    }

    let file_appender = rolling::daily(&log_dir, "spike-timer.log");

    // Configure filter (info level by default)
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true);

    // In debug builds, also log to the terminal. Stdout carries overlay output.
    #[cfg(debug_assertions)]
    {
        let console_layer = fmt::layer()
            .with_writer(io::stderr)
            .with_ansi(true)
            .with_target(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .with(console_layer)
            .init();
    }

    #[cfg(not(debug_assertions))]
    {
        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();
    }

    tracing::info!("Log directory: {}", log_dir.display());
}

fn log_runtime_environment() {
    let system = System::new_all();

    let version = env!("CARGO_PKG_VERSION");
    let os_name = System::long_os_version()
        .or_else(System::name)
        .unwrap_or_else(|| "Unknown OS".to_string());
    let kernel = System::kernel_version().unwrap_or_else(|| "Unknown Kernel".to_string());
    let architecture = std::env::consts::ARCH;

    tracing::info!(
        target: LOG_TARGET_STARTUP,
        "Starting Spike Timer v{} on ({})",
        version,
        architecture
    );
    tracing::info!(target: LOG_TARGET_STARTUP, "Operating System: {} (kernel {})", os_name, kernel);
    tracing::debug!(target: LOG_TARGET_STARTUP, "CPUs: {}", system.cpus().len());
}

fn start_hotkeys(app: &App, config: &AppConfig) -> Option<hotkeys::HotkeyHandle> {
    match hotkeys::spawn(&config.hotkeys, app.sender()) {
        Ok(handle) => Some(handle),
        Err(e @ HotkeyError::Unsupported(_)) => {
            tracing::warn!("{}. Use the demo console `overlay` and `settings` commands instead", e);
            None
        }
        Err(e) => {
            tracing::warn!("Global hotkeys unavailable: {:#}", anyhow::Error::from(e));
            None
        }
    }
}

fn main() -> AppResult<()> {
    let cli = Cli::parse();

    initialize_tracing();
    log_runtime_environment();

    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    let presenter: Arc<dyn Presenter> = match cli.output {
        OutputFormat::Console => Arc::new(ConsolePresenter::new(io::stdout())),
        OutputFormat::Json => Arc::new(JsonLinesPresenter::new(io::stdout())),
    };
    let mut app = App::new(&config, presenter, Arc::new(IntervalScheduler));

    let shutdown = app.sender();
    ctrlc::set_handler(move || {
        let _ = shutdown.send(AppMessage::Shutdown);
    })
    .context("Failed to set Ctrl+C handler")?;

    // Kept alive until the loop ends so the bindings stay registered
    let _hotkeys = if cli.no_hotkeys {
        tracing::info!("Global hotkeys disabled");
        None
    } else {
        start_hotkeys(&app, &config)
    };

    let source =
        platform::select_source(cli.feed.as_deref(), cli.demo, config.demo.auto_start_delay());
    let source_name = source.name();
    match source.start(app.sender()) {
        Ok(_) => tracing::info!("✓ Event source '{}' started", source_name),
        Err(e) => tracing::error!(
            "Event source '{}' failed to start: {:#}",
            source_name,
            anyhow::Error::from(e)
        ),
    }

    app.run();

    tracing::info!("Spike timer stopped");
    Ok(())
}
