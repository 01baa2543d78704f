//! # Membership Roles
//!
//! The closed set of roles a user can hold directly on an organization.
//! Only `Commander` carries management authority, and only `Commander`
//! propagates down the organization tree.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RangeopsError;

/// A direct membership role.
///
/// Variants are ordered by authority: `Viewer < Member < Commander`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// May see the organization.
    Viewer,
    /// Participates in the organization's sessions.
    Member,
    /// Manages the organization and everything beneath it.
    Commander,
}

impl Role {
    /// All roles, lowest authority first.
    pub const ALL: [Role; 3] = [Role::Viewer, Role::Member, Role::Commander];

    /// Whether this role grants management rights.
    pub fn grants_full_permission(&self) -> bool {
        matches!(self, Self::Commander)
    }

    /// The lowercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Viewer => "viewer",
            Self::Member => "member",
            Self::Commander => "commander",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = RangeopsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "viewer" => Ok(Self::Viewer),
            "member" => Ok(Self::Member),
            "commander" => Ok(Self::Commander),
            _ => Err(RangeopsError::InvalidRole(s.to_string())),
        }
    }
}
