// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! logplus daemon (lpd)
//!
//! Records one chat room into daily plaintext and HTML transcripts.
//!
//! Architecture:
//! - Reader Task: parses host events from stdin, forwards them over a channel
//! - Scheduler Task: checks for a day change on a fixed interval
//! - Main Loop: records events in arrival order, handles signals

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

use std::path::Path;

use lp_core::SystemClock;
use lp_daemon::config::Config;
use lp_daemon::lifecycle::{Daemon, LifecycleError};
use lp_daemon::protocol::forward_events;
use tokio::io::BufReader;
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Host events buffered between the reader and the main loop
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Startup marker prefix written to log before anything else.
/// Full format: "--- lpd: starting (pid: 12345) ---"
pub const STARTUP_MARKER_PREFIX: &str = "--- lpd: starting (pid: ";

#[tokio::main]
async fn main() {
    // Handle info flags before touching config
    if let Some(arg) = std::env::args().nth(1) {
        match arg.as_str() {
            "--version" | "-V" | "-v" => {
                println!("lpd {}", env!("CARGO_PKG_VERSION"));
                return;
            }
            "--help" | "-h" | "help" => {
                println!("lpd {}", env!("CARGO_PKG_VERSION"));
                println!("logplus daemon - dual-format chat transcript logger");
                println!();
                println!("USAGE:");
                println!("    lpd < events.jsonl");
                println!();
                println!("Reads host events (one JSON object per line) from stdin and");
                println!("appends each message to YYYY-MM-DD.log and YYYY-MM-DD.log.html.");
                println!("Configuration is read from $LP_CONFIG or");
                println!("$XDG_CONFIG_HOME/logplus/config.toml.");
                println!();
                println!("OPTIONS:");
                println!("    -h, --help       Print help information");
                println!("    -v, --version    Print version information");
                return;
            }
            _ => {
                eprintln!("error: unexpected argument '{arg}'");
                eprintln!("Usage: lpd [--help | --version]");
                std::process::exit(1);
            }
        }
    }

    // Config errors happen before logging exists: report on stderr
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("lpd: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = write_startup_marker(&config.log_path) {
        eprintln!("lpd: cannot write {}: {e}", config.log_path.display());
        std::process::exit(1);
    }

    let log_guard = match setup_logging(&config.log_path) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("lpd: failed to set up logging: {e}");
            std::process::exit(1);
        }
    };

    let result = run(config).await;
    if let Err(e) = &result {
        error!(error = %e, "daemon stopped with error");
        eprintln!("lpd: {e}");
    }
    drop(log_guard);

    // The stdin reader blocks on a thread that cannot be cancelled, so
    // exit here rather than waiting for the runtime to wind down.
    std::process::exit(if result.is_ok() { 0 } else { 1 });
}

async fn run(config: Config) -> Result<(), LifecycleError> {
    info!(
        plaintext_dir = %config.session.plaintext_dir.display(),
        html_dir = %config.session.html_dir.display(),
        room = %config.session.room,
        "starting lpd"
    );

    let mut daemon = Daemon::new(config, SystemClock);
    let fatal = daemon.fatal();

    let (event_tx, mut event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    tokio::spawn(async move {
        match forward_events(BufReader::new(tokio::io::stdin()), event_tx).await {
            Ok(count) => info!(count, "host input closed"),
            Err(e) => warn!(error = %e, "failed to read host input"),
        }
    });

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    let mut failure = None;
    loop {
        tokio::select! {
            event = event_rx.recv() => {
                let Some(event) = event else {
                    info!("host input closed, shutting down...");
                    break;
                };
                if let Err(e) = daemon.handle_event(event).await {
                    error!(error = %e, "failed to record event");
                    failure = Some(e);
                    break;
                }
            }

            _ = fatal.notified() => {
                failure = Some(LifecycleError::RolloverFailed);
                break;
            }

            _ = sigterm.recv() => {
                info!("Received SIGTERM, shutting down...");
                break;
            }

            _ = sigint.recv() => {
                info!("Received SIGINT, shutting down...");
                break;
            }
        }
    }

    // Every exit path closes the transcripts
    let closed = daemon.shutdown();
    info!("lpd stopped");
    match failure {
        Some(e) => Err(e),
        None => closed,
    }
}

/// Append the startup marker to the daemon log (creating it if needed)
fn write_startup_marker(log_path: &Path) -> std::io::Result<()> {
    use std::io::Write;

    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;
    writeln!(file, "{}{}) ---", STARTUP_MARKER_PREFIX, std::process::id())?;

    Ok(())
}

fn setup_logging(
    log_path: &Path,
) -> std::io::Result<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let invalid = || std::io::Error::new(std::io::ErrorKind::InvalidInput, "invalid log path");
    let dir = log_path.parent().ok_or_else(invalid)?;
    let file_name = log_path.file_name().ok_or_else(invalid)?;
    std::fs::create_dir_all(dir)?;

    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(guard)
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
