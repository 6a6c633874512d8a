// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Periodic day-change check.
//!
//! An idle room must still roll over shortly after midnight, so the check
//! runs on a fixed interval independent of message traffic. Rollover lags
//! the day boundary by at most one interval.

use std::sync::Arc;
use std::time::Duration;

use lp_core::Clock;
use lp_storage::{LogSession, SessionError};
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

/// Asks the session whether the calendar day changed.
pub struct RolloverScheduler<C: Clock> {
    session: Arc<LogSession>,
    clock: C,
}

impl<C: Clock + 'static> RolloverScheduler<C> {
    pub fn new(session: Arc<LogSession>, clock: C) -> Self {
        Self { session, clock }
    }

    /// Run one check against the clock's current time.
    ///
    /// Returns whether the session rolled over.
    pub fn tick(&self) -> Result<bool, SessionError> {
        let now = self.clock.now();
        let rolled = self.session.check_rollover(now)?;
        if rolled {
            info!(day = %now.date(), "rolled over to new logfiles");
        }
        Ok(rolled)
    }

    /// Spawn the periodic check.
    ///
    /// Each check runs on the blocking pool since a rollover syncs files to
    /// disk. A failed rollover is fatal: it is logged, `fatal` is notified,
    /// and the task ends.
    pub fn spawn(self, period: Duration, fatal: Arc<Notify>) -> JoinHandle<()> {
        let scheduler = Arc::new(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;

                let check = Arc::clone(&scheduler);
                let failed = match tokio::task::spawn_blocking(move || check.tick()).await {
                    Ok(Ok(_)) => continue,
                    Ok(Err(e)) => e.to_string(),
                    Err(e) => e.to_string(),
                };
                error!(error = %failed, "failed to roll over logfiles");
                fatal.notify_one();
                return;
            }
        })
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
