//! # Identifier Newtypes
//!
//! Newtype wrappers for the identifiers that cross the resolver boundary.
//! These prevent accidental identifier confusion: you cannot pass a
//! `UserId` where an `OrgId` is expected.
//!
//! Organization ids are opaque strings issued by the backend (usually UUID
//! text, but the resolver never relies on that). User ids are UUIDs.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::RangeopsError;

/// Unique identifier for an organization node.
///
/// Ordered lexicographically; the ordering is used as the final tie-breaker
/// when flattening the access view.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OrgId(String);

impl OrgId {
    /// Create an organization id, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`RangeopsError::InvalidIdentifier`] for empty or
    /// whitespace-only input.
    pub fn new(value: impl Into<String>) -> Result<Self, RangeopsError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(RangeopsError::InvalidIdentifier {
                kind: "organization",
                value,
            });
        }
        if trimmed.len() == value.len() {
            Ok(Self(value))
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for OrgId {
    type Error = RangeopsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<OrgId> for String {
    fn from(id: OrgId) -> Self {
        id.0
    }
}

impl std::str::FromStr for OrgId {
    type Err = RangeopsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for OrgId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique identifier for a user whose access is being resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user identifier from its hyphenated UUID form.
    pub fn parse(s: &str) -> Result<Self, RangeopsError> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| RangeopsError::InvalidIdentifier {
                kind: "user",
                value: s.to_string(),
            })
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn org_id_trims_whitespace() {
        let id = OrgId::new("  alpha-company ").unwrap();
        assert_eq!(id.as_str(), "alpha-company");
    }

    #[test]
    fn org_id_rejects_blank() {
        assert!(OrgId::new("").is_err());
        assert!(OrgId::new("   ").is_err());
    }

    #[test]
    fn org_id_deserialize_validates() {
        let ok: OrgId = serde_json::from_str("\"b-platoon\"").unwrap();
        assert_eq!(ok.to_string(), "b-platoon");
        assert!(serde_json::from_str::<OrgId>("\"  \"").is_err());
    }

    #[test]
    fn org_id_serializes_as_plain_string() {
        let id = OrgId::new("hq").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"hq\"");
    }

    #[test]
    fn org_id_ordering_is_lexicographic() {
        let a = OrgId::new("a").unwrap();
        let b = OrgId::new("b").unwrap();
        assert!(a < b);
    }

    #[test]
    fn user_id_parse_roundtrip() {
        let user = UserId::new();
        let parsed = UserId::parse(&user.to_string()).unwrap();
        assert_eq!(user, parsed);
    }

    #[test]
    fn user_id_parse_rejects_garbage() {
        let err = UserId::parse("not-a-uuid").unwrap_err();
        assert!(matches!(err, RangeopsError::InvalidIdentifier { kind: "user", .. }));
    }
}
