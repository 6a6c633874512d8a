// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::path::PathBuf;
use std::time::Duration;

use crate::config::ConfigError;

/// Resolve config file: LP_CONFIG > XDG_CONFIG_HOME/logplus/config.toml > ~/.config/logplus/config.toml
pub fn config_path() -> Result<PathBuf, ConfigError> {
    if let Ok(path) = std::env::var("LP_CONFIG") {
        return Ok(PathBuf::from(path));
    }
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg).join("logplus/config.toml"));
    }
    let home = std::env::var("HOME").map_err(|_| ConfigError::NoConfigPath)?;
    Ok(PathBuf::from(home).join(".config/logplus/config.toml"))
}

/// Resolve state directory: LP_STATE_DIR > XDG_STATE_HOME/logplus > ~/.local/state/logplus
pub fn state_dir() -> Result<PathBuf, ConfigError> {
    if let Ok(dir) = std::env::var("LP_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("logplus"));
    }
    let home = std::env::var("HOME").map_err(|_| ConfigError::NoStateDir)?;
    Ok(PathBuf::from(home).join(".local/state/logplus"))
}

/// Rollover check interval override
pub fn rollover_check_ms() -> Option<Duration> {
    std::env::var("LP_ROLLOVER_CHECK_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .filter(|ms| *ms > 0)
        .map(Duration::from_millis)
}
