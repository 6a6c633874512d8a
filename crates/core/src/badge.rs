// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Display badge shown next to a sender's nick.

use crate::message::{Role, RoleFlags};

/// The single highest-precedence role of a sender.
///
/// Precedence: operator > half-operator > voiced > none. Lower roles held
/// alongside a higher one are not represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Badge {
    Operator,
    HalfOperator,
    Voiced,
    None,
}

impl Badge {
    /// All badges in legend order, with their legend descriptions.
    pub const LEGEND: [(Badge, &'static str); 4] = [
        (Badge::Operator, "Channel operator (+o)"),
        (Badge::HalfOperator, "Channel half-operator (+h)"),
        (Badge::Voiced, "Nick is voiced (+v)"),
        (Badge::None, "Normal nick"),
    ];

    /// Classify a sender's role flags.
    pub fn classify(roles: &RoleFlags) -> Self {
        if roles.contains(Role::Operator) {
            Badge::Operator
        } else if roles.contains(Role::HalfOperator) {
            Badge::HalfOperator
        } else if roles.contains(Role::Voiced) {
            Badge::Voiced
        } else {
            Badge::None
        }
    }

    /// CSS class name for the nick cell. Empty for [`Badge::None`].
    pub fn css_class(self) -> &'static str {
        match self {
            Badge::Operator => "opped",
            Badge::HalfOperator => "halfopped",
            Badge::Voiced => "voiced",
            Badge::None => "",
        }
    }
}

#[cfg(test)]
#[path = "badge_tests.rs"]
mod tests;
