//! region-watch — application entry point.
//!
//! This is the app shell that wires together:
//! - Command-line arguments (cli.rs) and the saved session (config/)
//! - Region selection (select/)
//! - The change-detection loop (detect/) over live capture (capture/)
//!   and the snapshot writer (snapshot.rs)

pub mod capture;
pub mod cli;
pub mod config;
pub mod detect;
pub mod prompt;
pub mod select;
pub mod snapshot;

use capture::{Rectangle, ScreenRegion};
use clap::Parser;
use config::{ParamError, PersistedConfig, SessionParams};
use detect::{ChangeWatcher, DetectError, SessionStats};
use select::SelectionError;
use snapshot::SnapshotWriter;
use std::path::PathBuf;
use std::process::ExitCode;

/// How a run ended without error.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Operator said no at the confirmation prompt.
    Declined,
    /// Monitoring ran until interrupted.
    Interrupted(SessionStats),
}

/// Everything that makes the process exit non-zero.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Params(#[from] ParamError),

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error("No saved session at {}; run once without --continuous first", .0.display())]
    NoSavedSession(PathBuf),

    #[error("Console prompt failed: {0}")]
    Prompt(std::io::Error),

    #[error("Failed to start async runtime: {0}")]
    Runtime(std::io::Error),

    #[error(transparent)]
    Detect(#[from] DetectError),
}

/// Entry point — called by `main`.
pub fn run() -> ExitCode {
    let _ = dotenvy::dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = cli::Args::parse();

    match start(&args) {
        Ok(RunOutcome::Declined) => {
            println!("Cancelled.");
            ExitCode::SUCCESS
        }
        Ok(RunOutcome::Interrupted(stats)) => {
            println!("Monitoring stopped. {} snapshot(s) saved.", stats.snapshots);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Resolves the session, asks for confirmation, persists it, and runs the
/// monitoring loop until Ctrl-C.
///
/// Every startup failure is returned before anything is captured.
pub fn start(args: &cli::Args) -> Result<RunOutcome, AppError> {
    log::info!("region-watch starting up");

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(config::default_config_path);
    let saved = PersistedConfig::load(&config_path);

    let params = SessionParams::resolve(
        &args.overrides(),
        saved.as_ref(),
        args.continuous,
        chrono::Local::now(),
    )?;

    let area = if args.continuous {
        let saved = saved
            .as_ref()
            .ok_or_else(|| AppError::NoSavedSession(config_path.clone()))?;
        let area = select::reuse_region(saved.monitor_area)?;
        if args.confirm_area {
            select::preview_or_warn(&area);
        }
        area
    } else {
        let area = select::select_interactively()?;
        if !args.yes && ask("Preview the selected region?", false)? {
            select::preview_or_warn(&area);
        }
        area
    };

    println!("Region: {} ({}x{})", area, area.width(), area.height());
    println!("Settings: {}", params);

    if !args.yes && !ask("Start monitoring?", true)? {
        log::info!("Session declined by operator");
        return Ok(RunOutcome::Declined);
    }

    // The saved record only feeds the next --continuous run.
    if let Err(e) = PersistedConfig::from_session(area, &params).save(&config_path) {
        log::warn!("[CONFIG] {}", e);
    }

    let stats = monitor(area, &params)?;
    Ok(RunOutcome::Interrupted(stats))
}

fn ask(question: &str, default: bool) -> Result<bool, AppError> {
    prompt::confirm(question, default).map_err(AppError::Prompt)
}

/// Runs the detection loop on a single-threaded runtime until Ctrl-C.
fn monitor(area: Rectangle, params: &SessionParams) -> Result<SessionStats, AppError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(AppError::Runtime)?;

    let watcher = ChangeWatcher::new(
        ScreenRegion::new(area),
        SnapshotWriter::new(params.directory(), params.prefix()),
        params.threshold(),
        params.interval(),
    );

    println!("Monitoring {}. Press Ctrl-C to stop.", area);
    Ok(runtime.block_on(async move {
        // Installed before the first capture so an early Ctrl-C is not fatal.
        let shutdown = interrupted(interrupt_listener());
        watcher.run_until(shutdown).await
    })?)
}

#[cfg(unix)]
type InterruptListener = tokio::signal::unix::Signal;

#[cfg(windows)]
type InterruptListener = tokio::signal::windows::CtrlC;

/// Registers the Ctrl-C handler immediately, replacing the default one.
#[cfg(unix)]
fn interrupt_listener() -> std::io::Result<InterruptListener> {
    use tokio::signal::unix::{signal, SignalKind};
    signal(SignalKind::interrupt())
}

#[cfg(windows)]
fn interrupt_listener() -> std::io::Result<InterruptListener> {
    tokio::signal::windows::ctrl_c()
}

/// Resolves on the first Ctrl-C. If the handler could not be installed the
/// loop runs until killed.
async fn interrupted(listener: std::io::Result<InterruptListener>) {
    match listener {
        Ok(mut listener) => {
            listener.recv().await;
        }
        Err(e) => {
            log::error!("[DETECT] Cannot listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn interrupt_arriving_before_first_poll_is_caught() {
        let listener = interrupt_listener().unwrap();

        // Signal ourselves before the shutdown future is ever polled.
        let status = std::process::Command::new("kill")
            .args(["-INT", &std::process::id().to_string()])
            .status()
            .unwrap();
        assert!(status.success());

        tokio::time::timeout(Duration::from_secs(5), interrupted(Ok(listener)))
            .await
            .expect("interrupt was not delivered to the listener");
    }
}
