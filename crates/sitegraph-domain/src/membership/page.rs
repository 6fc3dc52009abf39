//! Paginated views over ordered key sequences.

use std::iter::{Skip, Take};
use std::vec;

use super::key::AuthorizableKey;

/// A lazy, finite, single-pass page of unwrapped entities.
///
/// Keys are unwrapped one at a time as the page is iterated; nothing past
/// `start + count` is touched. [`total`](Self::total) reports the size of
/// the full sequence the page was cut from.
#[derive(Debug)]
pub struct Page<K> {
    keys: Take<Skip<vec::IntoIter<K>>>,
    total: usize,
    partial: bool,
}

impl<K: AuthorizableKey> Page<K> {
    /// Slices `keys` starting at zero-based `start`, yielding at most
    /// `count` entities. A `start` past the end yields an empty page.
    pub fn new(keys: Vec<K>, start: usize, count: usize) -> Self {
        let total = keys.len();
        Self {
            keys: keys.into_iter().skip(start).take(count),
            total,
            partial: false,
        }
    }

    /// Marks the page as cut from a capped (partial) membership graph.
    pub fn with_partial(mut self, partial: bool) -> Self {
        self.partial = partial;
        self
    }

    /// Size of the full sequence before pagination.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Whether the underlying membership graph was truncated by its size cap.
    pub fn is_partial(&self) -> bool {
        self.partial
    }
}

impl<K: AuthorizableKey> Iterator for Page<K> {
    type Item = K::Entity;

    fn next(&mut self) -> Option<Self::Item> {
        self.keys.next().map(AuthorizableKey::into_entity)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.keys.size_hint()
    }
}

impl<K: AuthorizableKey> ExactSizeIterator for Page<K> {}
