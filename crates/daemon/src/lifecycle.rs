// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle: session start on connect, recording, shutdown.

use std::sync::Arc;

use lp_core::Clock;
use lp_storage::{LogSession, SessionError};
use thiserror::Error;
use tokio::sync::Notify;
use tokio::task::{self, JoinError, JoinHandle};
use tracing::{debug, info};

use crate::config::Config;
use crate::protocol::HostEvent;
use crate::scheduler::RolloverScheduler;

/// Errors that end the daemon
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("log session error: {0}")]
    Session(#[from] SessionError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("log writer task failed: {0}")]
    Task(#[from] JoinError),
    #[error("day rollover failed")]
    RolloverFailed,
}

/// Live session plus the task polling it for day changes.
struct Running {
    session: Arc<LogSession>,
    scheduler: JoinHandle<()>,
}

/// Daemon state during operation.
///
/// Owns the log session explicitly: it is created on the first connect (or
/// message) and closed by [`Daemon::shutdown`], which every exit path must
/// reach. Dropping the daemon aborts the scheduler; the session's own drop
/// then writes the footer if shutdown was skipped.
pub struct Daemon<C: Clock + Clone + 'static> {
    config: Config,
    clock: C,
    running: Option<Running>,
    /// Notified when the scheduler hits an unrecoverable error
    fatal: Arc<Notify>,
}

impl<C: Clock + Clone + 'static> Daemon<C> {
    pub fn new(config: Config, clock: C) -> Self {
        Self {
            config,
            clock,
            running: None,
            fatal: Arc::new(Notify::new()),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Signal raised by background tasks that need the daemon to stop.
    pub fn fatal(&self) -> Arc<Notify> {
        Arc::clone(&self.fatal)
    }

    pub fn session(&self) -> Option<&Arc<LogSession>> {
        self.running.as_ref().map(|r| &r.session)
    }

    /// Handle one host notification.
    ///
    /// File writes run on the blocking pool. Errors are fatal for the
    /// daemon: a failed write means both transcripts can no longer be kept
    /// in lockstep.
    pub async fn handle_event(&mut self, event: HostEvent) -> Result<(), LifecycleError> {
        match event {
            HostEvent::Connected => {
                if self.running.is_some() {
                    info!("reconnected, keeping current log session");
                } else {
                    info!("connected, starting log session");
                    self.ensure_started().await?;
                }
            }
            HostEvent::Message(message) => {
                let session = self.ensure_started().await?;
                let sender = message.sender.clone();
                let seq = task::spawn_blocking(move || session.record(&message)).await??;
                debug!(seq, %sender, "recorded message");
            }
        }
        Ok(())
    }

    async fn ensure_started(&mut self) -> Result<Arc<LogSession>, LifecycleError> {
        if let Some(running) = &self.running {
            return Ok(Arc::clone(&running.session));
        }

        let config = self.config.session.clone();
        let now = self.clock.now();
        let started = task::spawn_blocking(move || LogSession::start(config, now)).await??;
        let session = Arc::new(started);
        let scheduler = RolloverScheduler::new(Arc::clone(&session), self.clock.clone())
            .spawn(self.config.rollover_check, Arc::clone(&self.fatal));
        info!(
            room = %self.config.session.room,
            interval_ms = self.config.rollover_check.as_millis() as u64,
            "log session started"
        );

        self.running = Some(Running {
            session: Arc::clone(&session),
            scheduler,
        });
        Ok(session)
    }

    /// Stop the scheduler and close the session (footer written once).
    ///
    /// Safe to call when no session was ever started, and more than once.
    pub fn shutdown(&mut self) -> Result<(), LifecycleError> {
        let Some(running) = self.running.take() else {
            info!("no log session to close");
            return Ok(());
        };
        running.scheduler.abort();
        running.session.shutdown()?;
        info!("log session closed");
        Ok(())
    }
}

impl<C: Clock + Clone + 'static> Drop for Daemon<C> {
    fn drop(&mut self) {
        if let Some(running) = &self.running {
            running.scheduler.abort();
        }
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
