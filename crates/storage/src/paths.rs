// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Path builders for per-day transcript files.
//!
//! One pair of files per calendar day:
//!   `<plaintext_dir>/YYYY-MM-DD.log`
//!   `<html_dir>/YYYY-MM-DD.log.html`

use chrono::NaiveDate;
use lp_core::day_stamp;
use std::path::{Path, PathBuf};

/// Build the path to a day's plaintext log.
///
/// Structure: `{plaintext_dir}/{YYYY-MM-DD}.log`
pub fn plaintext_log_path(plaintext_dir: &Path, day: NaiveDate) -> PathBuf {
    plaintext_dir.join(format!("{}.log", day_stamp(day)))
}

/// Build the path to a day's HTML log.
///
/// Structure: `{html_dir}/{YYYY-MM-DD}.log.html`
pub fn html_log_path(html_dir: &Path, day: NaiveDate) -> PathBuf {
    html_dir.join(format!("{}.log.html", day_stamp(day)))
}

#[cfg(test)]
#[path = "paths_tests.rs"]
mod tests;
