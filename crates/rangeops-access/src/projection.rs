//! # View Projection
//!
//! Builds one [`FlatOrganization`] per visible organization: static
//! attributes from the index, permission flags from the visibility entry,
//! and computed depth, breadcrumb, and child count.
//!
//! Breadcrumbs come from the membership's precomputed `full_path` when it
//! agrees with the index: same length as the walked chain, ending at the
//! organization's own name, and matching any reported depth. Otherwise the
//! projector uses the walked chain. Either way `depth` is
//! `breadcrumb.len() - 1`.

use std::collections::HashMap;

use rangeops_core::OrgId;

use crate::config::ResolverConfig;
use crate::diagnostics::{Anomaly, Diagnostics};
use crate::model::{FlatOrganization, Membership};
use crate::navigator::TreeNavigator;
use crate::visibility::{VisibilityEntry, VisibilityMap};

/// Projects visibility entries into UI-ready records.
#[derive(Debug, Clone)]
pub struct ViewProjector<'a> {
    navigator: TreeNavigator<'a>,
    config: &'a ResolverConfig,
    child_counts: Option<HashMap<OrgId, usize>>,
}

impl<'a> ViewProjector<'a> {
    /// A projector over `navigator`'s index.
    pub fn new(navigator: TreeNavigator<'a>, config: &'a ResolverConfig) -> Self {
        Self {
            navigator,
            config,
            child_counts: None,
        }
    }

    /// Use externally supplied child counts. Ids missing from `counts` fall
    /// back to the index.
    pub fn with_child_counts(mut self, counts: HashMap<OrgId, usize>) -> Self {
        self.child_counts = Some(counts);
        self
    }

    /// Project every visible organization, in id order.
    ///
    /// Entries whose organization is not in the index are skipped.
    pub fn project(
        &self,
        map: VisibilityMap,
        diagnostics: &mut Diagnostics,
    ) -> Vec<FlatOrganization> {
        let counts = self.count_children(&map);
        map.into_iter()
            .filter_map(|(id, entry)| {
                let child_count = counts.get(&id).copied().unwrap_or(0);
                self.project_one(id, entry, child_count, diagnostics)
            })
            .collect()
    }

    /// Direct child counts for every visible organization, from one pass
    /// over the index unless the caller supplied counts.
    fn count_children(&self, map: &VisibilityMap) -> HashMap<OrgId, usize> {
        let mut counts: HashMap<OrgId, usize> = HashMap::with_capacity(map.len());
        for node in self.navigator.index().iter() {
            if let Some(parent) = &node.parent_id {
                if map.contains(parent) {
                    *counts.entry(parent.clone()).or_insert(0) += 1;
                }
            }
        }
        if let Some(supplied) = &self.child_counts {
            for (id, count) in supplied {
                if map.contains(id) {
                    counts.insert(id.clone(), *count);
                }
            }
        }
        counts
    }

    fn project_one(
        &self,
        id: OrgId,
        entry: VisibilityEntry,
        child_count: usize,
        diagnostics: &mut Diagnostics,
    ) -> Option<FlatOrganization> {
        let node = self.navigator.index().get(&id)?;

        let ancestry = self.navigator.ancestry(&id);
        diagnostics.report_opt(ancestry.anomaly.clone());
        let walked = ancestry.names_root_first();
        let walked_len = walked.len();

        let breadcrumb = entry
            .membership
            .as_ref()
            .and_then(|m| self.path_from(m, &node.name, walked_len, diagnostics))
            .unwrap_or(walked);
        let depth = breadcrumb.len().saturating_sub(1);

        if let Some(limit) = self.config.max_nesting_depth {
            if depth > limit {
                diagnostics.report(Anomaly::DepthLimitExceeded {
                    id: id.clone(),
                    depth,
                    limit,
                });
            }
        }

        Some(FlatOrganization {
            name: node.name.clone(),
            org_type: node.org_type.clone(),
            parent_id: node.parent_id.clone(),
            depth,
            role: entry.role,
            is_root: node.is_root(),
            breadcrumb,
            child_count,
            created_at: node.created_at,
            has_full_permission: entry.has_full_permission,
            is_context_only: entry.is_context_only,
            inherited: entry.inherited,
            id,
        })
    }

    /// Breadcrumb from the membership's precomputed path, if it has at
    /// least one name and describes a chain of `walked_len` nodes ending at
    /// `name`.
    fn path_from(
        &self,
        membership: &Membership,
        name: &str,
        walked_len: usize,
        diagnostics: &mut Diagnostics,
    ) -> Option<Vec<String>> {
        let path = membership.full_path.as_deref()?;
        let primary = split_path(path, &self.config.path_delimiters);
        if primary.is_empty() {
            return None;
        }

        // A single dotted name and a dot-delimited path look alike, so take
        // the first reading that agrees with the index.
        let accepted = self
            .config
            .path_delimiters
            .iter()
            .map(String::as_str)
            .filter(|d| !d.is_empty() && path.contains(d))
            .map(|d| segments(path, Some(d)))
            .chain(std::iter::once(segments(path, None)))
            .find(|names| {
                names.len() == walked_len && names.last().map(String::as_str) == Some(name)
            });

        let computed = accepted.as_ref().unwrap_or(&primary).len() - 1;
        if let Some(reported) = membership.depth {
            if reported != computed {
                diagnostics.report(Anomaly::PathDepthMismatch {
                    id: membership.org_id.clone(),
                    reported,
                    computed,
                });
                return None;
            }
        }
        if accepted.is_none() {
            diagnostics.report(Anomaly::PathRejected {
                id: membership.org_id.clone(),
                path: path.to_string(),
            });
        }
        accepted
    }
}

/// Split a precomputed path into trimmed, non-empty names.
///
/// `delimiters` are in priority order and only the first one present in
/// `path` is split on, so `"St. Louis → Team 1"` keeps the dot inside the
/// first name. A path containing no delimiter is a single name.
pub fn split_path(path: &str, delimiters: &[String]) -> Vec<String> {
    let delimiter = delimiters
        .iter()
        .map(String::as_str)
        .find(|d| !d.is_empty() && path.contains(d));
    segments(path, delimiter)
}

fn segments(path: &str, delimiter: Option<&str>) -> Vec<String> {
    let parts: Vec<&str> = match delimiter {
        Some(d) => path.split(d).collect(),
        None => vec![path],
    };
    parts
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
