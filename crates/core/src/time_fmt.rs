// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared time formatting for log lines, rows and file names.

use std::fmt::Write;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default per-message time format (24-hour `HH:MM`).
pub const DEFAULT_TIME_FORMAT: &str = "%H:%M";

/// Errors from parsing a time format pattern
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimeFormatError {
    #[error("time format is empty")]
    Empty,
    #[error("invalid time format specifier in {0:?}")]
    Invalid(String),
}

/// A validated strftime pattern.
///
/// Validation happens once at construction by rendering a probe time:
/// chrono panics when `to_string` hits an invalid specifier (or a zone
/// specifier on a naive time), so a bad pattern must be rejected up front.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeFormat(String);

impl TimeFormat {
    pub fn parse(pattern: &str) -> Result<Self, TimeFormatError> {
        if pattern.is_empty() {
            return Err(TimeFormatError::Empty);
        }
        let probe = NaiveDate::from_ymd_opt(2000, 1, 1).and_then(|d| d.and_hms_opt(0, 0, 0));
        let mut rendered = String::new();
        match probe {
            Some(time) if write!(rendered, "{}", time.format(pattern)).is_ok() => {}
            _ => return Err(TimeFormatError::Invalid(pattern.to_string())),
        }
        Ok(Self(pattern.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Format a timestamp with this pattern.
    pub fn format(&self, time: &NaiveDateTime) -> String {
        time.format(&self.0).to_string()
    }
}

impl Default for TimeFormat {
    fn default() -> Self {
        Self(DEFAULT_TIME_FORMAT.to_string())
    }
}

impl TryFrom<String> for TimeFormat {
    type Error = TimeFormatError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TimeFormat> for String {
    fn from(format: TimeFormat) -> Self {
        format.0
    }
}

/// Format a calendar day as `YYYY-MM-DD`.
pub fn day_stamp(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
#[path = "time_fmt_tests.rs"]
mod tests;
