//! # Access Resolver
//!
//! Runs the full pipeline over one snapshot:
//!
//! ```text
//! organizations ──▶ OrgIndex ──▶ TreeNavigator
//!                                     │
//! memberships ──▶ VisibilityResolver ◀┘
//!                        │
//!                        ▼
//!                  ViewProjector ──▶ flatten ──▶ AccessView
//! ```
//!
//! Every call starts from scratch: no state survives between calls, so one
//! resolver can be shared freely across threads.

use std::collections::HashMap;

use serde::Serialize;

use rangeops_core::{OrgId, UserId};

use crate::config::ResolverConfig;
use crate::diagnostics::{Anomaly, Diagnostics, Severity};
use crate::index::OrgIndex;
use crate::model::{FlatOrganization, Membership, OrganizationNode};
use crate::navigator::TreeNavigator;
use crate::ordering::flatten;
use crate::projection::ViewProjector;
use crate::source::DirectorySource;
use crate::visibility::VisibilityResolver;

/// The permission-scoped, ordered view for one user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AccessView {
    /// Visible organizations in display order.
    pub organizations: Vec<FlatOrganization>,
    /// Data anomalies met along the way, in a stable order.
    pub diagnostics: Vec<Anomaly>,
}

impl AccessView {
    /// The record for `id`, if visible.
    pub fn get(&self, id: &OrgId) -> Option<&FlatOrganization> {
        self.organizations.iter().find(|o| &o.id == id)
    }

    /// Visible root organizations.
    pub fn roots(&self) -> impl Iterator<Item = &FlatOrganization> {
        self.organizations.iter().filter(|o| o.is_root)
    }

    /// Ids the user may manage.
    pub fn full_permission_ids(&self) -> Vec<&OrgId> {
        self.organizations
            .iter()
            .filter(|o| o.has_full_permission)
            .map(|o| &o.id)
            .collect()
    }

    /// Whether any error-severity anomaly was found.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|a| a.severity() == Severity::Error)
    }

    /// Number of visible organizations.
    pub fn len(&self) -> usize {
        self.organizations.len()
    }

    /// Whether nothing is visible.
    pub fn is_empty(&self) -> bool {
        self.organizations.is_empty()
    }
}

/// Entry point for access resolution.
#[derive(Debug, Clone, Default)]
pub struct AccessResolver {
    config: ResolverConfig,
}

impl AccessResolver {
    /// A resolver with the given configuration.
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve `memberships` against `organizations`.
    pub fn resolve(
        &self,
        organizations: Vec<OrganizationNode>,
        memberships: &[Membership],
    ) -> AccessView {
        self.run(organizations, memberships, None)
    }

    /// Resolve using externally supplied child counts.
    pub fn resolve_with_child_counts(
        &self,
        organizations: Vec<OrganizationNode>,
        memberships: &[Membership],
        child_counts: HashMap<OrgId, usize>,
    ) -> AccessView {
        self.run(organizations, memberships, Some(child_counts))
    }

    /// Fetch the snapshot for `user` from `source` and resolve it.
    ///
    /// # Errors
    ///
    /// Returns the source's error unchanged if any fetch fails.
    pub fn resolve_for_user<S: DirectorySource>(
        &self,
        source: &S,
        user: &UserId,
    ) -> Result<AccessView, S::Error> {
        let memberships = source.fetch_user_memberships(user)?;
        let organizations = source.fetch_all_organizations()?;
        let org_ids: Vec<OrgId> = organizations.iter().map(|o| o.id.clone()).collect();
        let view = match source.fetch_child_counts(&org_ids)? {
            Some(counts) => self.resolve_with_child_counts(organizations, &memberships, counts),
            None => self.resolve(organizations, &memberships),
        };
        tracing::info!(
            user = %user,
            visible = view.len(),
            anomalies = view.diagnostics.len(),
            "resolved organization access"
        );
        Ok(view)
    }

    fn run(
        &self,
        organizations: Vec<OrganizationNode>,
        memberships: &[Membership],
        child_counts: Option<HashMap<OrgId, usize>>,
    ) -> AccessView {
        let mut diagnostics = Diagnostics::new();

        let index = OrgIndex::build(organizations);
        for id in index.duplicates() {
            diagnostics.report(Anomaly::DuplicateOrganization { id: id.clone() });
        }

        let navigator = TreeNavigator::new(&index, &self.config);
        let map = VisibilityResolver::new(navigator).resolve(memberships, &mut diagnostics);
        tracing::debug!(
            organizations = index.len(),
            memberships = memberships.len(),
            visible = map.len(),
            "visibility resolved"
        );

        let mut projector = ViewProjector::new(navigator, &self.config);
        if let Some(counts) = child_counts {
            projector = projector.with_child_counts(counts);
        }
        let projected = projector.project(map, &mut diagnostics);

        AccessView {
            organizations: flatten(projected, &self.config.breadcrumb_separator),
            diagnostics: diagnostics.into_sorted(),
        }
    }
}
