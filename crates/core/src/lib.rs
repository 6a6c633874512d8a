// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! lp-core: Core types for the logplus chat transcript logger

pub mod badge;
pub mod clock;
pub mod message;
pub mod time_fmt;

pub use badge::Badge;
#[cfg(any(test, feature = "test-support"))]
pub use clock::FakeClock;
pub use clock::{Clock, SystemClock};
pub use message::{Message, Role, RoleFlags};
pub use time_fmt::{day_stamp, TimeFormat, TimeFormatError, DEFAULT_TIME_FORMAT};
