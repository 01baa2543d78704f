//! Final ordering of the access view.
//!
//! Roots first, then ascending by joined breadcrumb, then by id. The id
//! tie-break makes the order total, so identical inputs always produce
//! identical output.

use std::cmp::Reverse;

use crate::model::FlatOrganization;

/// Sort `organizations` into display order.
pub fn flatten(mut organizations: Vec<FlatOrganization>, separator: &str) -> Vec<FlatOrganization> {
    organizations.sort_by_cached_key(|org| {
        (
            Reverse(org.is_root),
            org.breadcrumb_label(separator),
            org.id.clone(),
        )
    });
    organizations
}
