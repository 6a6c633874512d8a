// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! logplus daemon library
//!
//! Configuration, host event protocol, rollover scheduling and the daemon
//! lifecycle used by the `lpd` binary.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod config;
pub mod env;
pub mod lifecycle;
pub mod protocol;
pub mod scheduler;

pub use config::{Config, ConfigError};
pub use lifecycle::{Daemon, LifecycleError};
pub use protocol::HostEvent;
pub use scheduler::RolloverScheduler;
