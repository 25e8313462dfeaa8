//! Used/unused partition of the pattern set.
//!
//! Union is commutative and associative, so per-document results can be
//! combined in any order.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;

use crate::automaton::{MatchSet, PatternId};

/// Union of all per-document match sets.
pub fn union_matches<'a>(results: impl IntoIterator<Item = &'a MatchSet>) -> MatchSet {
    let mut used = MatchSet::new();
    for result in results {
        used.union_with(result);
    }
    used
}

/// Patterns present in `all_patterns` but not in `used`.
pub fn unused(all_patterns: &MatchSet, used: &MatchSet) -> MatchSet {
    all_patterns.difference(used)
}

/// Pattern → documents it appeared in, built alongside the union.
///
/// Documents are kept in recording order without repeats, so the first
/// entry is the first document that used the pattern. Repeat detection is
/// a hash lookup, so recording stays linear in the number of entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UsageIndex {
    documents: BTreeMap<PatternId, Vec<String>>,
    #[serde(skip)]
    members: HashMap<PatternId, HashSet<String>>,
}

impl UsageIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record every pattern of `matches` as used by `document`.
    pub fn record(&mut self, document: &str, matches: &MatchSet) {
        for id in matches {
            self.insert(id, document);
        }
    }

    fn insert(&mut self, id: PatternId, document: &str) {
        let members = self.members.entry(id).or_default();
        if members.contains(document) {
            return;
        }
        members.insert(document.to_string());
        self.documents
            .entry(id)
            .or_default()
            .push(document.to_string());
    }

    /// Documents that used `id`, in recording order.
    pub fn documents_for(&self, id: PatternId) -> &[String] {
        self.documents.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First document recorded for `id`.
    pub fn first_seen(&self, id: PatternId) -> Option<&str> {
        self.documents_for(id).first().map(String::as_str)
    }

    /// Every pattern with at least one recorded document.
    pub fn used(&self) -> MatchSet {
        self.documents.keys().copied().collect()
    }

    /// Fold another index into this one, appending its documents.
    pub fn merge(&mut self, other: UsageIndex) {
        for (id, docs) in other.documents {
            for doc in &docs {
                self.insert(id, doc);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PatternId, &[String])> + '_ {
        self.documents.iter().map(|(id, docs)| (*id, docs.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(raw: &[usize]) -> MatchSet {
        raw.iter().map(|&r| PatternId::from_index(r)).collect()
    }

    #[test]
    fn test_union_matches() {
        let results = vec![set(&[0]), set(&[2]), set(&[0, 3]), MatchSet::new()];
        assert_eq!(union_matches(&results), set(&[0, 2, 3]));
        assert!(union_matches(&Vec::<MatchSet>::new()).is_empty());
    }

    #[test]
    fn test_unused_is_difference() {
        let all = set(&[0, 1, 2, 3]);
        assert_eq!(unused(&all, &set(&[1, 3])), set(&[0, 2]));
        assert_eq!(unused(&all, &all), MatchSet::new());
        assert_eq!(unused(&all, &MatchSet::new()), all);
    }

    #[test]
    fn test_union_order_independent() {
        let a = set(&[0, 1]);
        let b = set(&[1, 4]);
        let c = set(&[2]);
        assert_eq!(union_matches([&a, &b, &c]), union_matches([&c, &a, &b]));
    }

    #[test]
    fn test_usage_index_first_seen() {
        let mut index = UsageIndex::new();
        index.record("a.html", &set(&[0, 1]));
        index.record("b.scss", &set(&[1]));
        index.record("a.html", &set(&[1]));

        let id = PatternId::from_index(1);
        assert_eq!(index.documents_for(id), &["a.html".to_string(), "b.scss".to_string()]);
        assert_eq!(index.first_seen(id), Some("a.html"));
        assert_eq!(index.first_seen(PatternId::from_index(7)), None);
        assert_eq!(index.used(), set(&[0, 1]));
    }

    #[test]
    fn test_usage_index_merge() {
        let mut left = UsageIndex::new();
        left.record("a.ts", &set(&[0]));
        let mut right = UsageIndex::new();
        right.record("b.ts", &set(&[0, 2]));
        right.record("a.ts", &set(&[0]));

        left.merge(right);
        assert_eq!(left.len(), 2);
        assert_eq!(
            left.documents_for(PatternId::from_index(0)),
            &["a.ts".to_string(), "b.ts".to_string()]
        );
    }

    #[test]
    fn test_usage_index_many_documents_one_pattern() {
        let logo = set(&[0]);
        let names: Vec<String> = (0..100_000).map(|i| format!("page_{}.html", i)).collect();

        let started = std::time::Instant::now();
        let mut index = UsageIndex::new();
        for name in &names {
            index.record(name, &logo);
        }
        // repeats are ignored, order is kept
        index.record("page_0.html", &logo);
        let mut other = UsageIndex::new();
        other.record("page_99999.html", &logo);
        other.record("extra.html", &logo);
        index.merge(other);
        assert!(
            started.elapsed() < std::time::Duration::from_secs(5),
            "recording took {:?}",
            started.elapsed()
        );

        let docs = index.documents_for(PatternId::from_index(0));
        assert_eq!(docs.len(), 100_001);
        assert_eq!(docs[0], "page_0.html");
        assert_eq!(docs[100_000], "extra.html");
    }
}
