//! Ranking engine: compound multi-field, multi-direction ordering of keys.

use std::cmp::Ordering;

use crate::model::{Sort, SortField, SortOrder};

use super::key::AuthorizableKey;

/// A chain of single-field comparisons, one per sort entry.
///
/// Each entry is consulted only when every earlier entry ties. An empty
/// chain considers all keys equal, so a stable sort keeps discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comparator {
    sorts: Vec<Sort>,
}

impl Comparator {
    pub fn new(sorts: impl Into<Vec<Sort>>) -> Self {
        Self {
            sorts: sorts.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sorts.is_empty()
    }

    pub fn compare<K: AuthorizableKey>(&self, a: &K, b: &K) -> Ordering {
        compare(a, b, &self.sorts)
    }

    /// Stable in-place sort of `keys`.
    pub fn sort<K: AuthorizableKey>(&self, keys: &mut [K]) {
        if self.is_empty() {
            return;
        }
        keys.sort_by(|a, b| self.compare(a, b));
    }
}

/// Compares two keys under a sort specification.
pub fn compare<K: AuthorizableKey>(a: &K, b: &K, sorts: &[Sort]) -> Ordering {
    sorts.iter().fold(Ordering::Equal, |ordering, sort| {
        ordering.then_with(|| compare_field(a, b, sort))
    })
}

/// One link of the chain. `Desc` reverses only this field's result.
fn compare_field<K: AuthorizableKey>(a: &K, b: &K, sort: &Sort) -> Ordering {
    let ordering = match sort.field {
        SortField::Id => a.id().cmp(b.id()),
        SortField::FirstName => compare_names(a, b, K::first_name),
        SortField::LastName => compare_names(a, b, K::last_name),
    };
    match sort.order {
        SortOrder::Asc => ordering,
        SortOrder::Desc => ordering.reverse(),
    }
}

/// Keys without names (groups) fall back to comparing ids.
fn compare_names<K, F>(a: &K, b: &K, name: F) -> Ordering
where
    K: AuthorizableKey,
    F: for<'k> Fn(&'k K) -> Option<&'k str>,
{
    match (name(a), name(b)) {
        (Some(left), Some(right)) => left.cmp(right),
        _ => a.id().cmp(b.id()),
    }
}
