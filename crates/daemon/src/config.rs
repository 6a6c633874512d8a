// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon configuration.
//!
//! Read from a TOML file:
//!
//! ```toml
//! plaintext_log_dir = "/var/log/chat/plain"   # required
//! html_log_dir = "/srv/www/chatlogs"          # required
//! room = "#rust"
//! time_log_format = "%H:%M"
//! markup = "escape"                           # or "verbatim"
//! rollover_check_secs = 5
//! # extra_head = "<link rel=\"stylesheet\" href=\"chat.css\"/>"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use lp_core::TimeFormat;
use lp_storage::{html::DEFAULT_EXTRA_HEAD, Markup, SessionConfig};
use serde::Deserialize;
use thiserror::Error;

use crate::env;

/// Default room name when none is configured.
pub const DEFAULT_ROOM: &str = "#chat";

/// Default rollover check interval.
pub const DEFAULT_ROLLOVER_CHECK: Duration = Duration::from_secs(5);

/// Errors from loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot locate config file: set LP_CONFIG or HOME")]
    NoConfigPath,
    #[error("cannot locate state directory: set LP_STATE_DIR or HOME")]
    NoStateDir,
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("missing required option `{0}`")]
    Missing(&'static str),
    #[error("rollover_check_secs must be greater than zero")]
    ZeroInterval,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
enum MarkupOption {
    #[default]
    Escape,
    Verbatim,
}

impl From<MarkupOption> for Markup {
    fn from(option: MarkupOption) -> Self {
        match option {
            MarkupOption::Escape => Markup::Escape,
            MarkupOption::Verbatim => Markup::Verbatim,
        }
    }
}

/// On-disk layout of the config file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    plaintext_log_dir: Option<PathBuf>,
    html_log_dir: Option<PathBuf>,
    room: Option<String>,
    #[serde(default)]
    time_log_format: TimeFormat,
    extra_head: Option<String>,
    #[serde(default)]
    markup: MarkupOption,
    rollover_check_secs: Option<u64>,
}

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Where and how transcripts are written
    pub session: SessionConfig,
    /// How often to check for a day change
    pub rollover_check: Duration,
    /// Daemon state directory (e.g. ~/.local/state/logplus)
    pub state_dir: PathBuf,
    /// Path to the daemon's own log file
    pub log_path: PathBuf,
}

impl Config {
    /// Load configuration from the file and state directory resolved from
    /// the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let path = env::config_path()?;
        let state_dir = env::state_dir()?;
        let mut config = Self::from_file(&path, state_dir)?;
        if let Some(interval) = env::rollover_check_ms() {
            config.rollover_check = interval;
        }
        Ok(config)
    }

    pub fn from_file(path: &Path, state_dir: PathBuf) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        let file: ConfigFile = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })?;
        Self::from_parts(file, state_dir)
    }

    fn from_parts(file: ConfigFile, state_dir: PathBuf) -> Result<Self, ConfigError> {
        let plaintext_dir = required(file.plaintext_log_dir, "plaintext_log_dir")?;
        let html_dir = required(file.html_log_dir, "html_log_dir")?;

        let rollover_check = match file.rollover_check_secs {
            Some(0) => return Err(ConfigError::ZeroInterval),
            Some(secs) => Duration::from_secs(secs),
            None => DEFAULT_ROLLOVER_CHECK,
        };

        let session = SessionConfig::new(
            plaintext_dir,
            html_dir,
            file.room.unwrap_or_else(|| DEFAULT_ROOM.to_string()),
        )
        .time_format(file.time_log_format)
        .extra_head(
            file.extra_head
                .unwrap_or_else(|| DEFAULT_EXTRA_HEAD.to_string()),
        )
        .markup(file.markup.into());

        Ok(Self {
            session,
            rollover_check,
            log_path: state_dir.join("lpd.log"),
            state_dir,
        })
    }
}

fn required(value: Option<PathBuf>, name: &'static str) -> Result<PathBuf, ConfigError> {
    match value {
        Some(path) if !path.as_os_str().is_empty() => Ok(path),
        _ => Err(ConfigError::Missing(name)),
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
