//! # Tree Navigation
//!
//! Pure traversal queries over an [`OrgIndex`]: the parent chain up to a
//! root, breadth-first descendants, and siblings.
//!
//! The forest shape is assumed, not verified. Every walk keeps a visited
//! set and the descendant walk is additionally capped, so cyclic or
//! self-parented input still terminates. The anomaly that stopped a walk is
//! returned with its partial result.

use std::collections::{HashMap, HashSet, VecDeque};

use rangeops_core::OrgId;

use crate::config::ResolverConfig;
use crate::diagnostics::Anomaly;
use crate::index::OrgIndex;
use crate::model::OrganizationNode;

/// The parent chain of one organization.
#[derive(Debug, Clone)]
pub struct Ancestry<'a> {
    /// The organization itself first, then each parent in turn.
    /// Empty when the organization is unknown.
    pub chain: Vec<&'a OrganizationNode>,
    /// Why the walk stopped early, if it did.
    pub anomaly: Option<Anomaly>,
}

impl<'a> Ancestry<'a> {
    /// The last node reached, which is the root for well-formed input.
    pub fn top(&self) -> Option<&'a OrganizationNode> {
        self.chain.last().copied()
    }

    /// Names from the top of the chain down to the organization itself.
    pub fn names_root_first(&self) -> Vec<String> {
        self.chain.iter().rev().map(|n| n.name.clone()).collect()
    }
}

/// Strict descendants of one organization, breadth-first.
#[derive(Debug, Clone, Default)]
pub struct Descendants {
    /// Each descendant exactly once, nearest levels first.
    pub ids: Vec<OrgId>,
    /// Set when the traversal ceiling cut the walk short.
    pub anomaly: Option<Anomaly>,
}

/// Traversal queries over one index.
#[derive(Debug, Clone, Copy)]
pub struct TreeNavigator<'a> {
    index: &'a OrgIndex,
    ceiling: usize,
}

impl<'a> TreeNavigator<'a> {
    /// A navigator whose descendant ceiling comes from `config`, defaulting
    /// to the number of indexed organizations.
    pub fn new(index: &'a OrgIndex, config: &ResolverConfig) -> Self {
        Self {
            index,
            ceiling: config.traversal_ceiling.unwrap_or(index.len()),
        }
    }

    /// Override the descendant traversal ceiling.
    pub fn with_ceiling(mut self, ceiling: usize) -> Self {
        self.ceiling = ceiling;
        self
    }

    /// The index being navigated.
    pub fn index(&self) -> &'a OrgIndex {
        self.index
    }

    /// Walk parent pointers from `id` until a root, a missing parent, or a
    /// repeated node.
    ///
    /// A cycle is reported under the smallest id on the cycle, so every node
    /// that walks into the same cycle reports the same anomaly.
    pub fn ancestry(&self, id: &OrgId) -> Ancestry<'a> {
        let mut chain: Vec<&'a OrganizationNode> = Vec::new();
        let mut position: HashMap<&'a OrgId, usize> = HashMap::new();

        let Some(mut current) = self.index.get(id) else {
            return Ancestry {
                chain,
                anomaly: None,
            };
        };

        loop {
            position.insert(&current.id, chain.len());
            chain.push(current);

            let Some(parent_id) = &current.parent_id else {
                return Ancestry {
                    chain,
                    anomaly: None,
                };
            };

            if let Some(&start) = position.get(parent_id) {
                let anomaly = chain[start..]
                    .iter()
                    .map(|n| &n.id)
                    .min()
                    .map(|id| Anomaly::ParentCycle { id: id.clone() });
                return Ancestry { chain, anomaly };
            }

            match self.index.get(parent_id) {
                Some(parent) => current = parent,
                None => {
                    return Ancestry {
                        anomaly: Some(Anomaly::DanglingParent {
                            id: current.id.clone(),
                            parent_id: parent_id.clone(),
                        }),
                        chain,
                    };
                }
            }
        }
    }

    /// The root of `id`'s tree.
    ///
    /// Returns `id` itself when it is a root or unknown to the index. On
    /// malformed input, the last node reached before the walk stopped.
    pub fn root_of(&self, id: &OrgId) -> OrgId {
        self.ancestry(id)
            .top()
            .map_or_else(|| id.clone(), |n| n.id.clone())
    }

    /// Breadth-first walk over strict descendants of `id`.
    pub fn descendants(&self, id: &OrgId) -> Descendants {
        let mut ids = Vec::new();
        let mut visited: HashSet<&OrgId> = HashSet::new();
        let mut queue: VecDeque<&OrgId> = VecDeque::new();
        visited.insert(id);
        queue.push_back(id);

        while let Some(current) = queue.pop_front() {
            for child in self.index.children_of(current) {
                if !visited.insert(&child.id) {
                    continue;
                }
                if ids.len() >= self.ceiling {
                    return Descendants {
                        ids,
                        anomaly: Some(Anomaly::TraversalLimitReached {
                            start: id.clone(),
                            limit: self.ceiling,
                        }),
                    };
                }
                ids.push(child.id.clone());
                queue.push_back(&child.id);
            }
        }

        Descendants { ids, anomaly: None }
    }

    /// Strict descendants of `id`, breadth-first.
    pub fn descendants_of(&self, id: &OrgId) -> Vec<OrgId> {
        self.descendants(id).ids
    }

    /// Other children of `id`'s parent. Empty for roots and unknown ids.
    pub fn siblings_of(&self, id: &OrgId) -> Vec<OrgId> {
        let Some(parent_id) = self.index.get(id).and_then(|n| n.parent_id.as_ref()) else {
            return Vec::new();
        };
        self.index
            .children_of(parent_id)
            .filter(|n| &n.id != id)
            .map(|n| n.id.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rangeops_core::Timestamp;

    fn node(id: &str, parent: Option<&str>) -> OrganizationNode {
        OrganizationNode::new(
            OrgId::new(id).unwrap(),
            id.to_uppercase(),
            "unit",
            parent.map(|p| OrgId::new(p).unwrap()),
            Timestamp::parse("2025-01-01T00:00:00Z").unwrap(),
        )
    }

    fn id(s: &str) -> OrgId {
        OrgId::new(s).unwrap()
    }

    fn ids(v: &[&str]) -> Vec<OrgId> {
        v.iter().map(|s| id(s)).collect()
    }

    /// a ─┬─ b ── c
    ///    └─ d
    /// e
    fn forest() -> OrgIndex {
        OrgIndex::build(vec![
            node("a", None),
            node("b", Some("a")),
            node("c", Some("b")),
            node("d", Some("a")),
            node("e", None),
        ])
    }

    #[test]
    fn root_of_walks_to_top() {
        let index = forest();
        let nav = TreeNavigator::new(&index, &ResolverConfig::default());
        assert_eq!(nav.root_of(&id("c")), id("a"));
        assert_eq!(nav.root_of(&id("a")), id("a"));
        assert_eq!(nav.root_of(&id("e")), id("e"));
    }

    #[test]
    fn root_of_unknown_is_itself() {
        let index = forest();
        let nav = TreeNavigator::new(&index, &ResolverConfig::default());
        assert_eq!(nav.root_of(&id("nowhere")), id("nowhere"));
    }

    #[test]
    fn ancestry_names_are_root_first() {
        let index = forest();
        let nav = TreeNavigator::new(&index, &ResolverConfig::default());
        let ancestry = nav.ancestry(&id("c"));
        assert_eq!(ancestry.names_root_first(), vec!["A", "B", "C"]);
        assert!(ancestry.anomaly.is_none());
    }

    #[test]
    fn descendants_are_breadth_first_and_strict() {
        let index = forest();
        let nav = TreeNavigator::new(&index, &ResolverConfig::default());
        assert_eq!(nav.descendants_of(&id("a")), ids(&["b", "d", "c"]));
        assert_eq!(nav.descendants_of(&id("b")), ids(&["c"]));
        assert!(nav.descendants_of(&id("c")).is_empty());
        assert!(nav.descendants_of(&id("nowhere")).is_empty());
    }

    #[test]
    fn siblings_exclude_self() {
        let index = forest();
        let nav = TreeNavigator::new(&index, &ResolverConfig::default());
        assert_eq!(nav.siblings_of(&id("b")), ids(&["d"]));
        assert_eq!(nav.siblings_of(&id("d")), ids(&["b"]));
        assert!(nav.siblings_of(&id("c")).is_empty());
        assert!(nav.siblings_of(&id("a")).is_empty());
        assert!(nav.siblings_of(&id("nowhere")).is_empty());
    }

    #[test]
    fn dangling_parent_stops_walk() {
        let index = OrgIndex::build(vec![node("x", Some("gone")), node("y", Some("x"))]);
        let nav = TreeNavigator::new(&index, &ResolverConfig::default());
        let ancestry = nav.ancestry(&id("y"));
        assert_eq!(ancestry.top().map(|n| n.id.clone()), Some(id("x")));
        assert_eq!(
            ancestry.anomaly,
            Some(Anomaly::DanglingParent {
                id: id("x"),
                parent_id: id("gone"),
            })
        );
        assert_eq!(nav.root_of(&id("y")), id("x"));
    }

    #[test]
    fn parent_cycle_terminates() {
        let index = OrgIndex::build(vec![
            node("p", Some("r")),
            node("q", Some("p")),
            node("r", Some("q")),
            node("s", Some("q")),
        ]);
        let nav = TreeNavigator::new(&index, &ResolverConfig::default());

        let from_s = nav.ancestry(&id("s"));
        assert_eq!(from_s.chain.len(), 4);
        assert_eq!(from_s.anomaly, Some(Anomaly::ParentCycle { id: id("p") }));

        let from_r = nav.ancestry(&id("r"));
        assert_eq!(from_r.anomaly, Some(Anomaly::ParentCycle { id: id("p") }));

        // Descendants of a cycle member: every other node, each once.
        let mut below = nav.descendants_of(&id("p"));
        below.sort();
        assert_eq!(below, ids(&["q", "r", "s"]));
    }

    #[test]
    fn self_parent_terminates() {
        let index = OrgIndex::build(vec![node("loop", Some("loop"))]);
        let nav = TreeNavigator::new(&index, &ResolverConfig::default());
        assert_eq!(nav.root_of(&id("loop")), id("loop"));
        assert!(nav.descendants_of(&id("loop")).is_empty());
    }

    #[test]
    fn ceiling_truncates_descendants() {
        let index = forest();
        let nav = TreeNavigator::new(&index, &ResolverConfig::default()).with_ceiling(2);
        let result = nav.descendants(&id("a"));
        assert_eq!(result.ids, ids(&["b", "d"]));
        assert_eq!(
            result.anomaly,
            Some(Anomaly::TraversalLimitReached {
                start: id("a"),
                limit: 2,
            })
        );
    }

    #[test]
    fn default_ceiling_never_truncates_a_forest() {
        let index = forest();
        let nav = TreeNavigator::new(&index, &ResolverConfig::default());
        assert!(nav.descendants(&id("a")).anomaly.is_none());
    }
}
