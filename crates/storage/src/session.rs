// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The live pair of transcript files for the current calendar day.
//!
//! `LogSession` is the single serialization point for every write: a
//! message's plaintext line and HTML row, day rollover, and shutdown all
//! happen under one lock, so the two files stay in lockstep and the HTML
//! document is never torn between open, rows and footer.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use lp_core::{Badge, Message, TimeFormat};
use parking_lot::Mutex;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::html::{HtmlDocument, HtmlHeader, Markup, DEFAULT_EXTRA_HEAD};
use crate::{paths, plaintext};

/// Errors that can occur in LogSession operations
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("missing {0} log directory")]
    MissingDirectory(&'static str),
    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("log session for {0} is compromised by an earlier write failure")]
    Compromised(NaiveDate),
    #[error("log session is shut down")]
    Closed,
}

/// Where and how a session writes its transcripts.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Directory for `YYYY-MM-DD.log` files
    pub plaintext_dir: PathBuf,
    /// Directory for `YYYY-MM-DD.log.html` files
    pub html_dir: PathBuf,
    /// Room name shown in the HTML title and heading
    pub room: String,
    pub time_format: TimeFormat,
    /// Trusted markup inserted into each HTML document's `<head>`
    pub extra_head: String,
    pub markup: Markup,
}

impl SessionConfig {
    /// Config with the default time format, stylesheet and escaping.
    pub fn new(
        plaintext_dir: impl Into<PathBuf>,
        html_dir: impl Into<PathBuf>,
        room: impl Into<String>,
    ) -> Self {
        Self {
            plaintext_dir: plaintext_dir.into(),
            html_dir: html_dir.into(),
            room: room.into(),
            time_format: TimeFormat::default(),
            extra_head: DEFAULT_EXTRA_HEAD.to_string(),
            markup: Markup::default(),
        }
    }

    pub fn time_format(mut self, time_format: TimeFormat) -> Self {
        self.time_format = time_format;
        self
    }

    pub fn extra_head(mut self, extra_head: impl Into<String>) -> Self {
        self.extra_head = extra_head.into();
        self
    }

    pub fn markup(mut self, markup: Markup) -> Self {
        self.markup = markup;
        self
    }

    fn validate(&self) -> Result<(), SessionError> {
        if self.plaintext_dir.as_os_str().is_empty() {
            return Err(SessionError::MissingDirectory("plaintext"));
        }
        if self.html_dir.as_os_str().is_empty() {
            return Err(SessionError::MissingDirectory("html"));
        }
        Ok(())
    }
}

/// Open file pair for one calendar day.
struct DayLogs {
    day: NaiveDate,
    plaintext: File,
    html: HtmlDocument<File>,
    /// Id of the last recorded message; 0 right after opening
    seq: u64,
}

impl DayLogs {
    fn open(config: &SessionConfig, day: NaiveDate) -> Result<Self, SessionError> {
        let plaintext_path = paths::plaintext_log_path(&config.plaintext_dir, day);
        let html_path = paths::html_log_path(&config.html_dir, day);
        info!(
            %day,
            plaintext = %plaintext_path.display(),
            html = %html_path.display(),
            "opening new logfiles"
        );

        // Plaintext continues an existing day; the HTML document cannot be
        // resumed, so it starts over.
        let plaintext = open_log(&plaintext_path, OpenOptions::new().create(true).append(true))?;
        let html_file = open_log(
            &html_path,
            OpenOptions::new().create(true).write(true).truncate(true),
        )?;

        let header = HtmlHeader {
            room: &config.room,
            day,
            extra_head: &config.extra_head,
        };
        let html = HtmlDocument::open(html_file, &header, config.markup).map_err(|source| {
            SessionError::Open {
                path: html_path,
                source,
            }
        })?;

        Ok(Self {
            day,
            plaintext,
            html,
            seq: 0,
        })
    }

    fn record(
        &mut self,
        message: &Message,
        time_format: &TimeFormat,
    ) -> Result<u64, WriteFailure> {
        self.seq += 1;
        plaintext::append_line(&mut self.plaintext, message, time_format)
            .map_err(WriteFailure::Plaintext)?;
        let badge = Badge::classify(&message.roles);
        self.html
            .append_row(self.seq, message, badge, time_format)
            .map_err(WriteFailure::Html)?;
        Ok(self.seq)
    }

    /// Write the HTML footer and release both files.
    fn close(self) -> Result<(), SessionError> {
        let DayLogs {
            day,
            plaintext,
            html,
            seq,
        } = self;
        let html_file = html.close()?;
        html_file.sync_all()?;
        plaintext.sync_all()?;
        info!(%day, messages = seq, "closed logfiles");
        Ok(())
    }

    /// Release the plaintext file after a failed write.
    ///
    /// The HTML document survives only when the failure left it untouched;
    /// a document with a torn row is abandoned without a footer.
    fn salvage(self, failure: &WriteFailure) -> Option<HtmlDocument<File>> {
        match failure {
            WriteFailure::Plaintext(_) => Some(self.html),
            WriteFailure::Html(_) => {
                let _ = self.html.abandon();
                None
            }
        }
    }
}

/// Which half of a message failed to reach disk.
#[derive(Debug)]
enum WriteFailure {
    /// Nothing was written to the HTML document yet
    Plaintext(io::Error),
    Html(io::Error),
}

impl WriteFailure {
    fn file(&self) -> &'static str {
        match self {
            WriteFailure::Plaintext(_) => "plaintext",
            WriteFailure::Html(_) => "html",
        }
    }

    fn into_error(self) -> io::Error {
        match self {
            WriteFailure::Plaintext(e) | WriteFailure::Html(e) => e,
        }
    }
}

/// Write the footer of a document salvaged from a compromised day.
fn close_salvaged(day: NaiveDate, html: HtmlDocument<File>) -> Result<(), SessionError> {
    let html_file = html.close()?;
    html_file.sync_all()?;
    info!(%day, "closed html document of compromised day");
    Ok(())
}

fn open_log(path: &Path, options: &OpenOptions) -> Result<File, SessionError> {
    let open = || -> io::Result<File> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        options.open(path)
    };
    open().map_err(|source| SessionError::Open {
        path: path.to_owned(),
        source,
    })
}

enum State {
    Open(DayLogs),
    /// A write failed on this day; nothing more is written until rollover.
    /// An HTML document the failure never touched still gets its footer.
    Compromised {
        day: NaiveDate,
        html: Option<HtmlDocument<File>>,
    },
    Closed,
}

impl State {
    fn compromised(day: NaiveDate) -> Self {
        State::Compromised { day, html: None }
    }

    /// Whether anything still needs a footer.
    fn holds_document(&self) -> bool {
        matches!(
            self,
            State::Open(_) | State::Compromised { html: Some(_), .. }
        )
    }
}

/// Owner of the current day's transcript files.
///
/// Share across threads/tasks behind an `Arc`. Dropping a session that was
/// never shut down performs the shutdown.
pub struct LogSession {
    config: SessionConfig,
    state: Mutex<State>,
}

impl LogSession {
    /// Open the transcript files for `now`'s calendar day.
    pub fn start(config: SessionConfig, now: NaiveDateTime) -> Result<Self, SessionError> {
        config.validate()?;
        let logs = DayLogs::open(&config, now.date())?;
        Ok(Self {
            config,
            state: Mutex::new(State::Open(logs)),
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Record one message in both files.
    ///
    /// Returns the message's row id within today's HTML document. Any write
    /// failure compromises the session for the rest of the day.
    pub fn record(&self, message: &Message) -> Result<u64, SessionError> {
        let mut state = self.state.lock();
        let logs = match &mut *state {
            State::Open(logs) => logs,
            State::Compromised { day, .. } => return Err(SessionError::Compromised(*day)),
            State::Closed => return Err(SessionError::Closed),
        };

        match logs.record(message, &self.config.time_format) {
            Ok(seq) => Ok(seq),
            Err(failure) => {
                let day = logs.day;
                let failed = failure.file();
                if let State::Open(logs) = std::mem::replace(&mut *state, State::compromised(day)) {
                    let html = logs.salvage(&failure);
                    *state = State::Compromised { day, html };
                }
                let e = failure.into_error();
                error!(
                    %day,
                    file = failed,
                    error = %e,
                    "failed to record message, transcript compromised for the day"
                );
                Err(e.into())
            }
        }
    }

    /// Roll over to `now`'s day if it differs from the current one.
    ///
    /// Returns whether a rollover happened. A no-op on the same day and
    /// after shutdown.
    pub fn check_rollover(&self, now: NaiveDateTime) -> Result<bool, SessionError> {
        let mut state = self.state.lock();
        let current = match &*state {
            State::Open(logs) => logs.day,
            State::Compromised { day, .. } => *day,
            State::Closed => return Ok(false),
        };
        let today = now.date();
        if current == today {
            return Ok(false);
        }
        info!(from = %current, to = %today, "day changed, rolling over logfiles");
        self.rollover_locked(&mut state, today)?;
        Ok(true)
    }

    /// Close the current files and open a fresh pair for `now`'s day.
    pub fn rollover(&self, now: NaiveDateTime) -> Result<(), SessionError> {
        let mut state = self.state.lock();
        self.rollover_locked(&mut state, now.date())
    }

    fn rollover_locked(&self, state: &mut State, day: NaiveDate) -> Result<(), SessionError> {
        match std::mem::replace(state, State::Closed) {
            State::Open(logs) => {
                let previous = logs.day;
                if let Err(e) = logs.close() {
                    *state = State::compromised(previous);
                    return Err(e);
                }
            }
            State::Compromised {
                day: previous,
                html,
            } => {
                warn!(%previous, "leaving compromised logfiles behind");
                if let Some(html) = html {
                    if let Err(e) = close_salvaged(previous, html) {
                        *state = State::compromised(previous);
                        return Err(e);
                    }
                }
            }
            State::Closed => return Err(SessionError::Closed),
        }

        match DayLogs::open(&self.config, day) {
            Ok(logs) => {
                *state = State::Open(logs);
                Ok(())
            }
            Err(e) => {
                *state = State::compromised(day);
                Err(e)
            }
        }
    }

    /// Write the HTML footer and close both files.
    ///
    /// Later `record`/`rollover` calls fail with [`SessionError::Closed`];
    /// a second shutdown is a no-op.
    pub fn shutdown(&self) -> Result<(), SessionError> {
        let mut state = self.state.lock();
        match std::mem::replace(&mut *state, State::Closed) {
            State::Open(logs) => logs.close(),
            State::Compromised {
                day,
                html: Some(html),
            } => close_salvaged(day, html),
            State::Compromised { html: None, .. } | State::Closed => Ok(()),
        }
    }

    /// Calendar day of the open (or compromised) files; `None` after shutdown.
    pub fn current_day(&self) -> Option<NaiveDate> {
        match &*self.state.lock() {
            State::Open(logs) => Some(logs.day),
            State::Compromised { day, .. } => Some(*day),
            State::Closed => None,
        }
    }

    /// Id of the last recorded message today, 0 if none.
    pub fn sequence(&self) -> u64 {
        match &*self.state.lock() {
            State::Open(logs) => logs.seq,
            State::Compromised { .. } | State::Closed => 0,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(&*self.state.lock(), State::Open(_))
    }

    pub fn is_compromised(&self) -> bool {
        matches!(&*self.state.lock(), State::Compromised { .. })
    }
}

impl Drop for LogSession {
    fn drop(&mut self) {
        if !self.state.get_mut().holds_document() {
            return;
        }
        warn!("log session dropped without shutdown, closing logfiles");
        if let Err(e) = self.shutdown() {
            error!(error = %e, "failed to close logfiles");
        }
    }
}

#[cfg(test)]
#[path = "session_tests/mod.rs"]
mod tests;
