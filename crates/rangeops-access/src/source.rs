//! # Directory Source — Data-Access Contract
//!
//! The resolver never talks to the backend itself. A [`DirectorySource`]
//! supplies the two snapshots it needs (the user's memberships and the
//! organization list) and, optionally, precomputed child counts.
//!
//! Errors from a source are the source's own type and reach the caller of
//! [`AccessResolver::resolve_for_user`](crate::AccessResolver::resolve_for_user)
//! unchanged. Nothing here retries.
//!
//! [`SnapshotSource`] is the in-memory implementation, used by the CLI and
//! by tests.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use rangeops_core::{OrgId, RangeopsError, UserId};

use crate::model::{Membership, OrganizationNode};

/// Supplies the snapshot a resolution runs over.
pub trait DirectorySource {
    /// Failure type of the underlying store.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Direct memberships held by `user`.
    fn fetch_user_memberships(&self, user: &UserId) -> Result<Vec<Membership>, Self::Error>;

    /// Every organization the caller may fetch.
    fn fetch_all_organizations(&self) -> Result<Vec<OrganizationNode>, Self::Error>;

    /// Direct child counts for `ids`, if the store can provide them cheaply.
    ///
    /// `Ok(None)` means the resolver derives counts from the organization
    /// list.
    fn fetch_child_counts(
        &self,
        ids: &[OrgId],
    ) -> Result<Option<HashMap<OrgId, usize>>, Self::Error> {
        let _ = ids;
        Ok(None)
    }
}

/// Errors from [`SnapshotSource`].
#[derive(Error, Debug)]
pub enum SourceError {
    /// The snapshot has no membership list for this user.
    #[error("user {0} is not present in the snapshot")]
    UnknownUser(UserId),

    /// The snapshot document could not be decoded.
    #[error("malformed snapshot: {0}")]
    Malformed(#[from] RangeopsError),
}

/// A self-contained organization and membership snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// The full organization list.
    pub organizations: Vec<OrganizationNode>,
    /// Direct memberships per user.
    #[serde(default)]
    pub memberships: BTreeMap<UserId, Vec<Membership>>,
    /// Precomputed direct child counts, if the exporter included them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_counts: Option<HashMap<OrgId, usize>>,
}

/// In-memory [`DirectorySource`] over a [`Snapshot`].
#[derive(Debug, Clone, Default)]
pub struct SnapshotSource {
    snapshot: Snapshot,
}

impl SnapshotSource {
    /// Wrap an already-decoded snapshot.
    pub fn new(snapshot: Snapshot) -> Self {
        Self { snapshot }
    }

    /// Decode a JSON snapshot document.
    pub fn from_json(json: &str) -> Result<Self, SourceError> {
        let snapshot: Snapshot = serde_json::from_str(json).map_err(RangeopsError::from)?;
        Ok(Self::new(snapshot))
    }

    /// The wrapped snapshot.
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Users present in the snapshot, in id order.
    pub fn users(&self) -> impl Iterator<Item = &UserId> {
        self.snapshot.memberships.keys()
    }
}

impl DirectorySource for SnapshotSource {
    type Error = SourceError;

    fn fetch_user_memberships(&self, user: &UserId) -> Result<Vec<Membership>, SourceError> {
        self.snapshot
            .memberships
            .get(user)
            .cloned()
            .ok_or(SourceError::UnknownUser(*user))
    }

    fn fetch_all_organizations(&self) -> Result<Vec<OrganizationNode>, SourceError> {
        Ok(self.snapshot.organizations.clone())
    }

    fn fetch_child_counts(
        &self,
        ids: &[OrgId],
    ) -> Result<Option<HashMap<OrgId, usize>>, SourceError> {
        Ok(self.snapshot.child_counts.as_ref().map(|counts| {
            ids.iter()
                .filter_map(|id| counts.get(id).map(|&n| (id.clone(), n)))
                .collect()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rangeops_core::Role;

    const USER: &str = "6f1c1f7e-2f0a-4c59-9d1e-3b2f0a9c7d11";

    fn snapshot_json() -> String {
        format!(
            r#"{{
                "organizations": [
                    {{"id": "hq", "name": "HQ", "org_type": "range", "parent_id": null, "created_at": "2025-01-01T00:00:00Z"}},
                    {{"id": "alpha", "name": "Alpha", "org_type": "team", "parent_id": "hq", "created_at": "2025-01-02T00:00:00+00:00"}}
                ],
                "memberships": {{
                    "{USER}": [{{"org_id": "alpha", "role": "member", "depth": 1, "full_path": "HQ → Alpha"}}]
                }},
                "child_counts": {{"hq": 1}}
            }}"#
        )
    }

    #[test]
    fn decodes_snapshot_document() {
        let source = SnapshotSource::from_json(&snapshot_json()).unwrap();
        assert_eq!(source.snapshot().organizations.len(), 2);
        assert_eq!(source.users().count(), 1);

        let user = UserId::parse(USER).unwrap();
        let memberships = source.fetch_user_memberships(&user).unwrap();
        assert_eq!(memberships.len(), 1);
        assert_eq!(memberships[0].role, Role::Member);
        assert_eq!(memberships[0].full_path.as_deref(), Some("HQ → Alpha"));
    }

    #[test]
    fn unknown_user_is_an_error() {
        let source = SnapshotSource::from_json(&snapshot_json()).unwrap();
        let err = source.fetch_user_memberships(&UserId::new()).unwrap_err();
        assert!(matches!(err, SourceError::UnknownUser(_)));
    }

    #[test]
    fn child_counts_are_restricted_to_requested_ids() {
        let source = SnapshotSource::from_json(&snapshot_json()).unwrap();
        let counts = source
            .fetch_child_counts(&[OrgId::new("hq").unwrap(), OrgId::new("alpha").unwrap()])
            .unwrap()
            .unwrap();
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[&OrgId::new("hq").unwrap()], 1);
    }

    #[test]
    fn missing_child_counts_means_derive() {
        let source = SnapshotSource::new(Snapshot::default());
        assert!(source.fetch_child_counts(&[]).unwrap().is_none());
    }

    #[test]
    fn malformed_document_is_rejected() {
        let err = SnapshotSource::from_json(r#"{"organizations": [{"id": ""}]}"#).unwrap_err();
        assert!(matches!(err, SourceError::Malformed(_)));
    }
}
