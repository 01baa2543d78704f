//! # Resolution Diagnostics
//!
//! Data anomalies found while resolving are never fatal. The resolver
//! computes a best-effort view and hands these back alongside it, so the
//! caller decides whether a malformed snapshot is worth surfacing.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use rangeops_core::OrgId;

/// How seriously a caller should take an anomaly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The view is complete but built from questionable data.
    Warning,
    /// The view may be missing or mis-attributing organizations.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => f.write_str("warning"),
            Self::Error => f.write_str("error"),
        }
    }
}

/// A data anomaly observed during index construction or traversal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Anomaly {
    /// The same id appeared more than once in the organization list.
    /// The last occurrence replaced the earlier ones.
    DuplicateOrganization {
        /// The repeated id.
        id: OrgId,
    },
    /// A node points at a parent that is not in the index.
    DanglingParent {
        /// The node holding the pointer.
        id: OrgId,
        /// The missing parent.
        parent_id: OrgId,
    },
    /// A parent walk came back to a node it had already visited.
    ParentCycle {
        /// The first node seen twice.
        id: OrgId,
    },
    /// A descendant traversal was cut off at the ceiling.
    TraversalLimitReached {
        /// Where the traversal started.
        start: OrgId,
        /// The ceiling that was hit.
        limit: usize,
    },
    /// A membership names an organization absent from the index.
    UnknownOrganization {
        /// The missing organization.
        id: OrgId,
    },
    /// The backend-reported depth disagrees with the supplied path.
    PathDepthMismatch {
        /// The organization.
        id: OrgId,
        /// Depth as reported by the backend.
        reported: usize,
        /// Depth derived from the path segments.
        computed: usize,
    },
    /// A precomputed path does not describe the organization's own chain
    /// and was replaced by the walked breadcrumb.
    PathRejected {
        /// The organization.
        id: OrgId,
        /// The path as supplied.
        path: String,
    },
    /// An organization sits deeper than the configured nesting limit.
    DepthLimitExceeded {
        /// The organization.
        id: OrgId,
        /// Its depth.
        depth: usize,
        /// The configured limit.
        limit: usize,
    },
}

impl Anomaly {
    /// Severity of this anomaly.
    pub fn severity(&self) -> Severity {
        match self {
            Self::DuplicateOrganization { .. }
            | Self::ParentCycle { .. }
            | Self::TraversalLimitReached { .. } => Severity::Error,
            Self::DanglingParent { .. }
            | Self::UnknownOrganization { .. }
            | Self::PathDepthMismatch { .. }
            | Self::PathRejected { .. }
            | Self::DepthLimitExceeded { .. } => Severity::Warning,
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::DuplicateOrganization { .. } => "duplicate_organization",
            Self::DanglingParent { .. } => "dangling_parent",
            Self::ParentCycle { .. } => "parent_cycle",
            Self::TraversalLimitReached { .. } => "traversal_limit_reached",
            Self::UnknownOrganization { .. } => "unknown_organization",
            Self::PathDepthMismatch { .. } => "path_depth_mismatch",
            Self::PathRejected { .. } => "path_rejected",
            Self::DepthLimitExceeded { .. } => "depth_limit_exceeded",
        }
    }

    /// The organization the anomaly is about.
    pub fn org_id(&self) -> &OrgId {
        match self {
            Self::DuplicateOrganization { id }
            | Self::DanglingParent { id, .. }
            | Self::ParentCycle { id }
            | Self::UnknownOrganization { id }
            | Self::PathDepthMismatch { id, .. }
            | Self::PathRejected { id, .. }
            | Self::DepthLimitExceeded { id, .. } => id,
            Self::TraversalLimitReached { start, .. } => start,
        }
    }
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateOrganization { id } => {
                write!(f, "organization {id} appears more than once; last entry kept")
            }
            Self::DanglingParent { id, parent_id } => {
                write!(f, "organization {id} references missing parent {parent_id}")
            }
            Self::ParentCycle { id } => write!(f, "parent chain cycles through {id}"),
            Self::TraversalLimitReached { start, limit } => {
                write!(f, "descendant traversal from {start} stopped after {limit} nodes")
            }
            Self::UnknownOrganization { id } => {
                write!(f, "membership references unknown organization {id}")
            }
            Self::PathDepthMismatch {
                id,
                reported,
                computed,
            } => write!(
                f,
                "organization {id} reported depth {reported} but its path implies {computed}"
            ),
            Self::PathRejected { id, path } => {
                write!(f, "path {path:?} does not match the ancestry of {id}; walked instead")
            }
            Self::DepthLimitExceeded { id, depth, limit } => {
                write!(f, "organization {id} is at depth {depth}, limit is {limit}")
            }
        }
    }
}

/// De-duplicating collector for anomalies found during one resolution.
///
/// Each distinct anomaly is logged once, when first reported.
#[derive(Debug, Default)]
pub struct Diagnostics {
    seen: HashSet<Anomaly>,
    items: Vec<Anomaly>,
}

impl Diagnostics {
    /// An empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an anomaly unless an identical one was already recorded.
    pub fn report(&mut self, anomaly: Anomaly) {
        if self.seen.contains(&anomaly) {
            return;
        }
        tracing::warn!(
            code = anomaly.code(),
            severity = %anomaly.severity(),
            org_id = %anomaly.org_id(),
            "{anomaly}"
        );
        self.seen.insert(anomaly.clone());
        self.items.push(anomaly);
    }

    /// Record an anomaly if one is present.
    pub fn report_opt(&mut self, anomaly: Option<Anomaly>) {
        if let Some(anomaly) = anomaly {
            self.report(anomaly);
        }
    }

    /// Number of distinct anomalies recorded.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Consume the collector, returning anomalies in a stable order.
    ///
    /// Sorting makes the result independent of membership processing order.
    pub fn into_sorted(mut self) -> Vec<Anomaly> {
        self.items.sort();
        self.items
    }
}
