// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Plaintext transcript lines.
//!
//! Format: `{time} {sender} | {text}\n`, written verbatim with no escaping.

use std::io;

use lp_core::{Message, TimeFormat};

use crate::sink::SyncWrite;

/// Render one transcript line, including the trailing newline.
pub fn format_line(message: &Message, time_format: &TimeFormat) -> String {
    format!(
        "{} {} | {}\n",
        time_format.format(&message.timestamp),
        message.sender,
        message.text
    )
}

/// Append one line and sync it to stable storage before returning.
///
/// The line is handed to the writer in a single `write_all` so concurrent
/// appenders serialized by the caller never produce partial lines.
pub fn append_line<W: SyncWrite + ?Sized>(
    out: &mut W,
    message: &Message,
    time_format: &TimeFormat,
) -> io::Result<()> {
    let line = format_line(message, time_format);
    out.write_all(line.as_bytes())?;
    out.sync()
}

#[cfg(test)]
#[path = "plaintext_tests.rs"]
mod tests;
