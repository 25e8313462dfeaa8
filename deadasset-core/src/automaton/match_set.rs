//! Ordered set of matched pattern identifiers.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::trie::PatternId;

/// Set of pattern identifiers found in one or more documents.
///
/// Ordered so that reports and comparisons are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchSet {
    ids: BTreeSet<PatternId>,
}

impl MatchSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an id, returning `true` if it was not present.
    pub fn insert(&mut self, id: PatternId) -> bool {
        self.ids.insert(id)
    }

    pub fn contains(&self, id: PatternId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = PatternId> + '_ {
        self.ids.iter().copied()
    }

    /// In-place union.
    pub fn union_with(&mut self, other: &MatchSet) {
        self.ids.extend(other.ids.iter().copied());
    }

    /// Ids in `self` but not in `other`.
    pub fn difference(&self, other: &MatchSet) -> MatchSet {
        self.ids.difference(&other.ids).copied().collect()
    }
}

impl FromIterator<PatternId> for MatchSet {
    fn from_iter<I: IntoIterator<Item = PatternId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

impl Extend<PatternId> for MatchSet {
    fn extend<I: IntoIterator<Item = PatternId>>(&mut self, iter: I) {
        self.ids.extend(iter);
    }
}

impl<'a> IntoIterator for &'a MatchSet {
    type Item = PatternId;
    type IntoIter = std::iter::Copied<std::collections::btree_set::Iter<'a, PatternId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(raw: &[u32]) -> MatchSet {
        raw.iter().map(|&r| PatternId::new(r)).collect()
    }

    #[test]
    fn test_union_and_difference() {
        let mut a = set(&[0, 2]);
        let b = set(&[2, 3]);
        a.union_with(&b);
        assert_eq!(a, set(&[0, 2, 3]));
        assert_eq!(a.difference(&b), set(&[0]));
    }

    #[test]
    fn test_insert_reports_novelty() {
        let mut s = MatchSet::new();
        assert!(s.insert(PatternId::new(1)));
        assert!(!s.insert(PatternId::new(1)));
        assert_eq!(s.len(), 1);
        assert!(s.contains(PatternId::new(1)));
    }

    #[test]
    fn test_serializes_as_array() {
        let json = serde_json::to_string(&set(&[3, 1])).unwrap();
        assert_eq!(json, "[1,3]");
    }
}
