//! # Visibility Resolution
//!
//! Turns a user's direct memberships into the set of organizations they may
//! see, each tagged with an effective role and permission level.
//!
//! ## Rules
//!
//! For a membership on organization `o`:
//!
//! - **Commander**: `o` gets full permission. Every descendant of `o` gets
//!   inherited full permission. If `o` is not a root, its root and its
//!   siblings become visible as context.
//! - **Member / Viewer**: `o` is visible with that literal role. If `o` is
//!   not a root, its root becomes visible as context.
//!
//! ## Merge
//!
//! Entries for the same organization are merged by taking the stronger
//! grant:
//!
//! ```text
//! context < direct viewer < direct member < inherited commander < direct commander
//! ```
//!
//! Taking a maximum is commutative and associative, so the final map does
//! not depend on the order memberships are processed in. A context entry can
//! be promoted; nothing is ever demoted to context.
//!
//! A direct member or viewer grant on an organization is still overridden by
//! commander authority inherited from an ancestor. Keeping the direct grant
//! instead would make the result depend on processing order, and would leave
//! part of a commander's subtree without full permission.

use std::collections::BTreeMap;

use serde::Serialize;

use rangeops_core::{OrgId, Role};

use crate::diagnostics::{Anomaly, Diagnostics};
use crate::model::Membership;
use crate::navigator::TreeNavigator;

// ─── Entries ─────────────────────────────────────────────────────────

/// How one organization became visible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisibilityEntry {
    /// Effective role.
    pub role: Role,
    /// The user may manage the organization.
    pub has_full_permission: bool,
    /// Shown for orientation only.
    pub is_context_only: bool,
    /// Full permission came from a commander grant on an ancestor.
    pub inherited: bool,
    /// The direct membership behind this entry, if any. Its precomputed
    /// path is reused when projecting.
    pub membership: Option<Membership>,
}

impl VisibilityEntry {
    /// A context-only placeholder.
    pub fn context() -> Self {
        Self {
            role: Role::Viewer,
            has_full_permission: false,
            is_context_only: true,
            inherited: false,
            membership: None,
        }
    }

    /// Full permission inherited from a commander ancestor.
    pub fn inherited_commander() -> Self {
        Self {
            role: Role::Commander,
            has_full_permission: true,
            is_context_only: false,
            inherited: true,
            membership: None,
        }
    }

    /// The entry for a membership's own organization.
    pub fn direct(membership: &Membership) -> Self {
        Self {
            role: membership.role,
            has_full_permission: membership.role.grants_full_permission(),
            is_context_only: false,
            inherited: false,
            membership: Some(membership.clone()),
        }
    }

    fn rank(&self) -> u8 {
        match (self.is_context_only, self.inherited, self.role) {
            (true, _, _) => 0,
            (false, false, Role::Viewer) => 1,
            (false, false, Role::Member) => 2,
            (false, true, _) => 3,
            (false, false, Role::Commander) => 4,
        }
    }

    fn has_path(&self) -> bool {
        self.membership
            .as_ref()
            .is_some_and(|m| m.full_path.is_some())
    }

    /// Keep the stronger of two entries for the same organization.
    ///
    /// Equal-strength direct entries (the same role granted twice) prefer
    /// one carrying a precomputed path, then the smaller membership, so the
    /// choice is symmetric.
    pub fn merge(self, other: Self) -> Self {
        use std::cmp::Ordering;

        match (self.rank(), self.has_path()).cmp(&(other.rank(), other.has_path())) {
            Ordering::Greater => self,
            Ordering::Less => other,
            Ordering::Equal => {
                if other.membership < self.membership {
                    other
                } else {
                    self
                }
            }
        }
    }
}

// ─── Map ─────────────────────────────────────────────────────────────

/// Visible organizations keyed by id, iterated in id order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilityMap {
    entries: BTreeMap<OrgId, VisibilityEntry>,
}

impl VisibilityMap {
    /// An empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `entry` into whatever is already recorded for `id`.
    pub fn grant(&mut self, id: OrgId, entry: VisibilityEntry) {
        match self.entries.remove(&id) {
            Some(existing) => {
                self.entries.insert(id, existing.merge(entry));
            }
            None => {
                self.entries.insert(id, entry);
            }
        }
    }

    /// The entry for `id`.
    pub fn get(&self, id: &OrgId) -> Option<&VisibilityEntry> {
        self.entries.get(id)
    }

    /// Whether `id` is visible.
    pub fn contains(&self, id: &OrgId) -> bool {
        self.entries.contains_key(id)
    }

    /// Entries in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&OrgId, &VisibilityEntry)> {
        self.entries.iter()
    }

    /// Number of visible organizations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is visible.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for VisibilityMap {
    type Item = (OrgId, VisibilityEntry);
    type IntoIter = std::collections::btree_map::IntoIter<OrgId, VisibilityEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

// ─── Resolver ────────────────────────────────────────────────────────

/// Applies the visibility rules for one user over one index.
#[derive(Debug, Clone, Copy)]
pub struct VisibilityResolver<'a> {
    navigator: TreeNavigator<'a>,
}

impl<'a> VisibilityResolver<'a> {
    /// A resolver over `navigator`'s index.
    pub fn new(navigator: TreeNavigator<'a>) -> Self {
        Self { navigator }
    }

    /// Fold every membership into a fresh visibility map.
    ///
    /// Memberships on organizations missing from the index are skipped and
    /// reported.
    pub fn resolve(&self, memberships: &[Membership], diagnostics: &mut Diagnostics) -> VisibilityMap {
        let mut map = VisibilityMap::new();
        for membership in memberships {
            self.apply(membership, &mut map, diagnostics);
        }
        map
    }

    fn apply(&self, membership: &Membership, map: &mut VisibilityMap, diagnostics: &mut Diagnostics) {
        let org = &membership.org_id;
        if !self.navigator.index().contains(org) {
            diagnostics.report(Anomaly::UnknownOrganization { id: org.clone() });
            return;
        }

        map.grant(org.clone(), VisibilityEntry::direct(membership));

        if membership.role.grants_full_permission() {
            let below = self.navigator.descendants(org);
            diagnostics.report_opt(below.anomaly);
            for id in below.ids {
                map.grant(id, VisibilityEntry::inherited_commander());
            }
        }

        let ancestry = self.navigator.ancestry(org);
        let root = ancestry.top().map(|n| n.id.clone());
        diagnostics.report_opt(ancestry.anomaly);

        let Some(root) = root.filter(|root| root != org) else {
            return;
        };
        map.grant(root, VisibilityEntry::context());

        if membership.role.grants_full_permission() {
            for sibling in self.navigator.siblings_of(org) {
                map.grant(sibling, VisibilityEntry::context());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolverConfig;
    use crate::index::OrgIndex;
    use crate::model::OrganizationNode;
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

    fn member(org: &str, role: Role) -> Membership {
        Membership::new(id(org), role)
    }

    /// a ─┬─ b ── c
    ///    └─ d
    fn forest() -> OrgIndex {
        OrgIndex::build(vec![
            node("a", None),
            node("b", Some("a")),
            node("c", Some("b")),
            node("d", Some("a")),
        ])
    }

    fn resolve(index: &OrgIndex, memberships: &[Membership]) -> (VisibilityMap, Vec<Anomaly>) {
        let nav = TreeNavigator::new(index, &ResolverConfig::default());
        let mut diagnostics = Diagnostics::new();
        let map = VisibilityResolver::new(nav).resolve(memberships, &mut diagnostics);
        (map, diagnostics.into_sorted())
    }

    fn entry<'m>(map: &'m VisibilityMap, org: &str) -> &'m VisibilityEntry {
        map.get(&id(org)).unwrap_or_else(|| panic!("{org} should be visible"))
    }

    #[test]
    fn merge_rank_order() {
        let ctx = VisibilityEntry::context();
        let viewer = VisibilityEntry::direct(&member("a", Role::Viewer));
        let mem = VisibilityEntry::direct(&member("a", Role::Member));
        let inherited = VisibilityEntry::inherited_commander();
        let cmd = VisibilityEntry::direct(&member("a", Role::Commander));
        let ladder = [ctx, viewer, mem, inherited, cmd];
        for (i, lower) in ladder.iter().enumerate() {
            for higher in &ladder[i + 1..] {
                assert_eq!(lower.clone().merge(higher.clone()), *higher);
                assert_eq!(higher.clone().merge(lower.clone()), *higher);
            }
        }
    }

    #[test]
    fn merge_prefers_precomputed_path_on_tie() {
        let plain = VisibilityEntry::direct(&member("a", Role::Member));
        let pathed = VisibilityEntry::direct(&member("a", Role::Member).with_path(0, "A"));
        assert_eq!(plain.clone().merge(pathed.clone()), pathed);
        assert_eq!(pathed.clone().merge(plain), pathed);
    }

    #[test]
    fn empty_memberships_yield_empty_map() {
        let (map, anomalies) = resolve(&forest(), &[]);
        assert!(map.is_empty());
        assert!(anomalies.is_empty());
    }

    #[test]
    fn commander_of_inner_node() {
        let (map, _) = resolve(&forest(), &[member("b", Role::Commander)]);
        assert_eq!(map.len(), 4);

        let b = entry(&map, "b");
        assert!(b.has_full_permission && !b.inherited && !b.is_context_only);
        assert_eq!(b.role, Role::Commander);

        let c = entry(&map, "c");
        assert!(c.has_full_permission && c.inherited);
        assert_eq!(c.role, Role::Commander);

        for ctx in ["a", "d"] {
            let e = entry(&map, ctx);
            assert!(e.is_context_only && !e.has_full_permission);
            assert_eq!(e.role, Role::Viewer);
        }
    }

    #[test]
    fn commander_of_root_has_no_context() {
        let (map, _) = resolve(&forest(), &[member("a", Role::Commander)]);
        assert_eq!(map.len(), 4);
        assert!(map.iter().all(|(_, e)| e.has_full_permission && !e.is_context_only));
    }

    #[test]
    fn member_sees_only_own_org_and_root() {
        let (map, _) = resolve(&forest(), &[member("c", Role::Member)]);
        assert_eq!(map.len(), 2);
        assert_eq!(entry(&map, "c").role, Role::Member);
        assert!(!entry(&map, "c").is_context_only);
        assert!(entry(&map, "a").is_context_only);
        assert!(!map.contains(&id("b")));
        assert!(!map.contains(&id("d")));
    }

    #[test]
    fn member_of_root_adds_nothing_else() {
        let (map, _) = resolve(&forest(), &[member("a", Role::Viewer)]);
        assert_eq!(map.len(), 1);
        assert_eq!(entry(&map, "a").role, Role::Viewer);
        assert!(!entry(&map, "a").is_context_only);
    }

    #[test]
    fn context_is_promoted_by_later_commander() {
        let (map, _) = resolve(
            &forest(),
            &[member("b", Role::Commander), member("d", Role::Commander)],
        );
        let d = entry(&map, "d");
        assert!(d.has_full_permission && !d.is_context_only);
    }

    #[test]
    fn direct_member_not_overridden_by_descendant_commander() {
        let (map, _) = resolve(
            &forest(),
            &[member("b", Role::Member), member("c", Role::Commander)],
        );
        assert_eq!(entry(&map, "b").role, Role::Member);
        assert!(!entry(&map, "b").has_full_permission);
        assert!(entry(&map, "c").has_full_permission);
        assert!(entry(&map, "a").is_context_only);
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn ancestor_commander_outranks_direct_member() {
        let memberships = [member("c", Role::Member), member("b", Role::Commander)];
        let (forward, _) = resolve(&forest(), &memberships);
        let reversed: Vec<_> = memberships.iter().rev().cloned().collect();
        let (backward, _) = resolve(&forest(), &reversed);
        assert_eq!(forward, backward);
        let c = entry(&forward, "c");
        assert!(c.has_full_permission && c.inherited);
    }

    #[test]
    fn unknown_membership_org_is_reported_and_skipped() {
        let (map, anomalies) = resolve(&forest(), &[member("ghost", Role::Commander)]);
        assert!(map.is_empty());
        assert_eq!(anomalies, vec![Anomaly::UnknownOrganization { id: id("ghost") }]);
    }

    #[test]
    fn dangling_parent_treated_as_top() {
        let index = OrgIndex::build(vec![node("x", Some("gone")), node("y", Some("x"))]);
        let (map, anomalies) = resolve(&index, &[member("y", Role::Member)]);
        assert!(entry(&map, "x").is_context_only);
        assert_eq!(
            anomalies,
            vec![Anomaly::DanglingParent {
                id: id("x"),
                parent_id: id("gone"),
            }]
        );
    }
}
