//! # rangeops-access — Hierarchical Organization Access
//!
//! Given a forest of organizations and a user's direct role memberships,
//! computes exactly which organizations the user may see, with what
//! authority, and in what order the client should list them.
//!
//! ## Pipeline
//!
//! - **Index** (`index.rs`): arena of nodes with id and parent lookups.
//!   Duplicate ids are last-write-wins and reported.
//!
//! - **Navigation** (`navigator.rs`): root, breadth-first descendants, and
//!   siblings. Walks terminate on cyclic input.
//!
//! - **Visibility** (`visibility.rs`): commander authority flows down
//!   subtrees; roots and commander siblings become context. Entries merge by
//!   strength, so membership order never changes the result.
//!
//! - **Projection** (`projection.rs`): depth, breadcrumb, and child count per
//!   visible organization.
//!
//! - **Ordering** (`ordering.rs`): roots first, then by breadcrumb, then id.
//!
//! ## Failure Model
//!
//! Resolution is pure and infallible. Malformed snapshots produce a
//! best-effort view plus [`Anomaly`] diagnostics. Only the data-access
//! collaborator ([`DirectorySource`]) can fail, and its errors pass through
//! untouched.

pub mod config;
pub mod diagnostics;
pub mod index;
pub mod model;
pub mod navigator;
pub mod ordering;
pub mod projection;
pub mod resolver;
pub mod source;
pub mod visibility;

// ─── Pipeline re-exports ────────────────────────────────────────────

pub use index::OrgIndex;
pub use navigator::{Ancestry, Descendants, TreeNavigator};
pub use ordering::flatten;
pub use projection::{split_path, ViewProjector};
pub use resolver::{AccessResolver, AccessView};
pub use visibility::{VisibilityEntry, VisibilityMap, VisibilityResolver};

// ─── Data re-exports ────────────────────────────────────────────────

pub use config::{ConfigError, ResolverConfig, DEFAULT_BREADCRUMB_SEPARATOR};
pub use diagnostics::{Anomaly, Diagnostics, Severity};
pub use model::{FlatOrganization, Membership, OrganizationNode};
pub use source::{DirectorySource, Snapshot, SnapshotSource, SourceError};
