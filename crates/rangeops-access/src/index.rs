//! # Organization Index
//!
//! Arena of organization nodes with id and parent lookups. Nodes live in a
//! single `Vec`; both maps hold arena positions, so the forest is expressed
//! without any node referencing another.
//!
//! Duplicate ids are last-write-wins: the later record replaces the earlier
//! one in place (keeping the first position) and the id is remembered so the
//! resolver can report it.

use std::collections::HashMap;

use rangeops_core::OrgId;

use crate::config::ResolverConfig;
use crate::diagnostics::{Anomaly, Diagnostics};
use crate::model::OrganizationNode;
use crate::navigator::TreeNavigator;

/// Lookup structures over one organization snapshot.
#[derive(Debug, Clone, Default)]
pub struct OrgIndex {
    nodes: Vec<OrganizationNode>,
    by_id: HashMap<OrgId, usize>,
    children: HashMap<OrgId, Vec<usize>>,
    duplicates: Vec<OrgId>,
}

impl OrgIndex {
    /// Build the index in one pass over the input, plus one pass over the
    /// de-duplicated arena for the parent map.
    ///
    /// Children are listed in input order.
    pub fn build(nodes: impl IntoIterator<Item = OrganizationNode>) -> Self {
        let mut arena: Vec<OrganizationNode> = Vec::new();
        let mut by_id: HashMap<OrgId, usize> = HashMap::new();
        let mut duplicates: Vec<OrgId> = Vec::new();

        for node in nodes {
            match by_id.get(&node.id) {
                Some(&slot) => {
                    if !duplicates.contains(&node.id) {
                        duplicates.push(node.id.clone());
                    }
                    arena[slot] = node;
                }
                None => {
                    by_id.insert(node.id.clone(), arena.len());
                    arena.push(node);
                }
            }
        }

        let mut children: HashMap<OrgId, Vec<usize>> = HashMap::new();
        for (slot, node) in arena.iter().enumerate() {
            if let Some(parent) = &node.parent_id {
                children.entry(parent.clone()).or_default().push(slot);
            }
        }

        Self {
            nodes: arena,
            by_id,
            children,
            duplicates,
        }
    }

    /// Look up a node by id.
    pub fn get(&self, id: &OrgId) -> Option<&OrganizationNode> {
        self.by_id.get(id).map(|&slot| &self.nodes[slot])
    }

    /// Whether `id` is in the index.
    pub fn contains(&self, id: &OrgId) -> bool {
        self.by_id.contains_key(id)
    }

    /// Direct children of `id`, in input order.
    pub fn children_of<'a>(
        &'a self,
        id: &OrgId,
    ) -> impl Iterator<Item = &'a OrganizationNode> + 'a {
        self.children
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(move |&slot| &self.nodes[slot])
    }

    /// Number of direct children of `id`.
    pub fn child_count(&self, id: &OrgId) -> usize {
        self.children.get(id).map_or(0, Vec::len)
    }

    /// All nodes, in first-seen input order.
    pub fn iter(&self) -> impl Iterator<Item = &OrganizationNode> {
        self.nodes.iter()
    }

    /// Number of distinct organizations.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the index holds no organizations.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Ids that appeared more than once in the input.
    pub fn duplicates(&self) -> &[OrgId] {
        &self.duplicates
    }

    /// Check the whole snapshot for structural anomalies, independent of
    /// any user's memberships.
    pub fn audit(&self, config: &ResolverConfig) -> Vec<Anomaly> {
        let mut diagnostics = Diagnostics::new();
        for id in &self.duplicates {
            diagnostics.report(Anomaly::DuplicateOrganization { id: id.clone() });
        }

        let navigator = TreeNavigator::new(self, config);
        for node in &self.nodes {
            let ancestry = navigator.ancestry(&node.id);
            diagnostics.report_opt(ancestry.anomaly);

            if let Some(limit) = config.max_nesting_depth {
                let depth = ancestry.chain.len().saturating_sub(1);
                if depth > limit {
                    diagnostics.report(Anomaly::DepthLimitExceeded {
                        id: node.id.clone(),
                        depth,
                        limit,
                    });
                }
            }
        }
        diagnostics.into_sorted()
    }
}

impl FromIterator<OrganizationNode> for OrgIndex {
    fn from_iter<I: IntoIterator<Item = OrganizationNode>>(iter: I) -> Self {
        Self::build(iter)
    }
}
