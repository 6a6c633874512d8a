// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Chat messages as delivered by the host chat layer.
//!
//! A message carries the sender's channel role flags at the time it was
//! sent. The host computes these; the logger trusts them as given.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A channel permission held by a message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Channel operator (+o)
    Operator,
    /// Channel half-operator (+h)
    HalfOperator,
    /// Voiced (+v)
    Voiced,
}

/// Set of roles held by a sender. A sender may hold several at once.
///
/// Serializes as an array of role names: `["operator", "voiced"]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Role>", into = "Vec<Role>")]
pub struct RoleFlags {
    operator: bool,
    half_operator: bool,
    voiced: bool,
}

impl RoleFlags {
    /// No roles.
    pub const fn none() -> Self {
        Self {
            operator: false,
            half_operator: false,
            voiced: false,
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, role: Role) -> Self {
        self.insert(role);
        self
    }

    pub fn insert(&mut self, role: Role) {
        match role {
            Role::Operator => self.operator = true,
            Role::HalfOperator => self.half_operator = true,
            Role::Voiced => self.voiced = true,
        }
    }

    pub fn contains(&self, role: Role) -> bool {
        match role {
            Role::Operator => self.operator,
            Role::HalfOperator => self.half_operator,
            Role::Voiced => self.voiced,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.operator || self.half_operator || self.voiced)
    }
}

impl FromIterator<Role> for RoleFlags {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        let mut flags = Self::none();
        for role in iter {
            flags.insert(role);
        }
        flags
    }
}

impl From<Vec<Role>> for RoleFlags {
    fn from(roles: Vec<Role>) -> Self {
        roles.into_iter().collect()
    }
}

impl From<RoleFlags> for Vec<Role> {
    fn from(flags: RoleFlags) -> Self {
        [Role::Operator, Role::HalfOperator, Role::Voiced]
            .into_iter()
            .filter(|role| flags.contains(*role))
            .collect()
    }
}

/// One public chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Local wall-clock time the message was received
    pub timestamp: NaiveDateTime,
    /// Sender's nick
    pub sender: String,
    /// Sender's roles in the channel
    #[serde(default)]
    pub roles: RoleFlags,
    /// Message body, verbatim
    pub text: String,
}

impl Message {
    /// Create a message from a sender with no roles.
    pub fn new(timestamp: NaiveDateTime, sender: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            timestamp,
            sender: sender.into(),
            roles: RoleFlags::none(),
            text: text.into(),
        }
    }

    pub fn with_roles(mut self, roles: RoleFlags) -> Self {
        self.roles = roles;
        self
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
