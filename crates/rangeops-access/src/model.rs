//! # Organization Records
//!
//! The value types flowing through a resolution: the organization nodes and
//! memberships fetched from the backend, and the flattened records handed to
//! the UI layer.
//!
//! Wire field names follow the backend rows (`org_type`, `parent_id`,
//! `org_id`, `full_path`). Everything here is plain owned data; a
//! resolution call never shares these across threads or calls.

use serde::{Deserialize, Serialize};

use rangeops_core::{OrgId, Role, Timestamp};

// ─── Inputs ──────────────────────────────────────────────────────────

/// One organization in the forest.
///
/// A `None` parent marks a root. The parent graph is assumed to be a forest;
/// violations are tolerated and reported, never trusted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationNode {
    /// Organization identifier.
    pub id: OrgId,
    /// Display name, used for breadcrumbs.
    pub name: String,
    /// Free-form category tag (range, battalion, team, ...).
    #[serde(alias = "type")]
    pub org_type: String,
    /// Parent organization, `None` for roots.
    #[serde(default)]
    pub parent_id: Option<OrgId>,
    /// When the organization was created.
    pub created_at: Timestamp,
}

impl OrganizationNode {
    /// Build a node with the given attributes.
    pub fn new(
        id: OrgId,
        name: impl Into<String>,
        org_type: impl Into<String>,
        parent_id: Option<OrgId>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            org_type: org_type.into(),
            parent_id,
            created_at,
        }
    }

    /// Whether this node has no parent.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// A direct role grant held by the user on exactly one organization.
///
/// `depth` and `full_path` are filled in by the backend's path-aware query
/// when available. They are an optimization only: the projector walks the
/// index itself when they are absent.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Membership {
    /// The organization the role is held on.
    pub org_id: OrgId,
    /// The role held.
    pub role: Role,
    /// Depth of the organization as reported by the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<usize>,
    /// Precomputed breadcrumb string, root first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_path: Option<String>,
}

impl Membership {
    /// A membership without precomputed path information.
    pub fn new(org_id: OrgId, role: Role) -> Self {
        Self {
            org_id,
            role,
            depth: None,
            full_path: None,
        }
    }

    /// Attach the backend's precomputed depth and breadcrumb path.
    pub fn with_path(mut self, depth: usize, full_path: impl Into<String>) -> Self {
        self.depth = Some(depth);
        self.full_path = Some(full_path.into());
        self
    }
}

// ─── Output ──────────────────────────────────────────────────────────

/// One visible organization, ready for rendering.
///
/// Produced once per visible organization and never mutated afterwards.
/// `depth == breadcrumb.len() - 1` holds for every record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatOrganization {
    /// Organization identifier.
    pub id: OrgId,
    /// Display name.
    pub name: String,
    /// Category tag.
    pub org_type: String,
    /// Parent organization, `None` for roots.
    pub parent_id: Option<OrgId>,
    /// Number of hops from the root.
    pub depth: usize,
    /// Effective role for this user.
    pub role: Role,
    /// Whether the organization has no parent.
    pub is_root: bool,
    /// Ancestor names from the root to this organization, inclusive.
    pub breadcrumb: Vec<String>,
    /// Number of direct children in the full forest.
    pub child_count: usize,
    /// When the organization was created.
    pub created_at: Timestamp,
    /// The user may manage this organization.
    pub has_full_permission: bool,
    /// Shown for orientation only.
    pub is_context_only: bool,
    /// Full permission comes from a commander grant on an ancestor.
    pub inherited: bool,
}

impl FlatOrganization {
    /// The breadcrumb joined with `separator`.
    pub fn breadcrumb_label(&self, separator: &str) -> String {
        self.breadcrumb.join(separator)
    }
}
