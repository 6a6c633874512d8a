// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Storage layer for logplus: daily plaintext and HTML transcripts

pub mod html;
pub mod paths;
pub mod plaintext;
mod session;
mod sink;

pub use html::{HtmlDocument, HtmlHeader, Markup};
pub use session::{LogSession, SessionConfig, SessionError};
pub use sink::SyncWrite;
