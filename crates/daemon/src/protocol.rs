// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Host event protocol.
//!
//! The chat layer notifies the daemon with one JSON object per line:
//!
//! ```text
//! {"event":"connected"}
//! {"event":"message","timestamp":"2024-01-05T14:05:00","sender":"alice","roles":["operator"],"text":"hello"}
//! ```
//!
//! Blank lines are ignored. EOF ends the stream.

use lp_core::Message;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// A notification from the host chat layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HostEvent {
    /// Connection to the chat network established
    Connected,
    /// Public message in the logged room
    Message(Message),
}

/// Decode one line. Blank lines decode to `None`.
pub fn decode_line(line: &str) -> Result<Option<HostEvent>, serde_json::Error> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(trimmed).map(Some)
}

/// Encode an event as a single line (without newline).
pub fn encode_line(event: &HostEvent) -> Result<String, serde_json::Error> {
    serde_json::to_string(event)
}

/// Forward host events from `reader` until EOF or until the receiver is
/// dropped. Malformed lines, including ones that are not UTF-8, are logged
/// and skipped.
///
/// Returns the number of events forwarded.
pub async fn forward_events<R>(
    mut reader: R,
    tx: mpsc::Sender<HostEvent>,
) -> std::io::Result<u64>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    let mut forwarded = 0u64;
    let mut line_no = 0u64;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        line_no += 1;
        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line,
            Err(e) => {
                warn!(line = line_no, error = %e, "skipping malformed host event");
                continue;
            }
        };
        let event = match decode_line(line) {
            Ok(Some(event)) => event,
            Ok(None) => continue,
            Err(e) => {
                warn!(line = line_no, error = %e, "skipping malformed host event");
                continue;
            }
        };
        if tx.send(event).await.is_err() {
            debug!("event receiver dropped, stopping host reader");
            break;
        }
        forwarded += 1;
    }

    Ok(forwarded)
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
