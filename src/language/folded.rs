//! Case-folded key map.
//!
//! Two key spaces exist in the engine and must not be confused:
//! - association patterns (`*.py`, `Makefile`) are case-sensitive and are kept
//!   in a plain `BTreeMap<String, String>`;
//! - mode aliases and the derived extension/basename lookup tables are
//!   case-insensitive and use [`FoldedMap`], which lowercases keys on both
//!   insert and lookup.

use std::collections::BTreeMap;

/// A map whose keys are folded to lowercase on every access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldedMap<V> {
    entries: BTreeMap<String, V>,
}

impl<V> Default for FoldedMap<V> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<V> FoldedMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert under the lowercased key, replacing any earlier value.
    pub fn insert(&mut self, key: &str, value: V) -> Option<V> {
        self.entries.insert(key.to_lowercase(), value)
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.get(&key.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
