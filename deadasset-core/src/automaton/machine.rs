//! The immutable automaton produced by [`AutomatonBuilder::build`].
//!
//! [`AutomatonBuilder::build`]: super::builder::AutomatonBuilder::build

use std::collections::HashMap;

use super::match_set::MatchSet;
use super::scanner::Scanner;
use super::trie::{PatternId, TrieNode, ROOT};

/// Read-only Aho–Corasick automaton over a fixed pattern set.
///
/// `Send + Sync`: share by reference (or `Arc`) across any number of
/// concurrent scans. A different pattern set needs a new build.
#[derive(Debug, Clone)]
pub struct Automaton {
    nodes: Vec<TrieNode>,
    patterns: Vec<String>,
    index: HashMap<String, PatternId>,
}

impl Automaton {
    pub(crate) fn from_parts(
        nodes: Vec<TrieNode>,
        patterns: Vec<String>,
        index: HashMap<String, PatternId>,
    ) -> Self {
        Self {
            nodes,
            patterns,
            index,
        }
    }

    /// Number of distinct patterns.
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// Number of trie states, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, index: usize) -> Option<&TrieNode> {
        self.nodes.get(index)
    }

    /// Pattern text for an id.
    pub fn pattern(&self, id: PatternId) -> Option<&str> {
        self.patterns.get(id.index()).map(String::as_str)
    }

    /// All patterns in id order.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Id of a pattern, if it is part of this automaton.
    pub fn id_of(&self, pattern: &str) -> Option<PatternId> {
        self.index.get(pattern).copied()
    }

    /// The full pattern-id space.
    pub fn all_ids(&self) -> MatchSet {
        (0..self.patterns.len()).map(PatternId::from_index).collect()
    }

    /// Pattern texts for a set of ids, in id order. Foreign ids are skipped.
    pub fn resolve<'a>(&'a self, ids: &MatchSet) -> Vec<&'a str> {
        ids.iter().filter_map(|id| self.pattern(id)).collect()
    }

    pub fn scanner(&self) -> Scanner<'_> {
        Scanner::new(self)
    }

    /// Patterns occurring at least once in `document`.
    pub fn scan(&self, document: impl AsRef<[u8]>) -> MatchSet {
        self.scanner().scan(document.as_ref())
    }

    /// One transition: follow fail links until `byte` has a goto edge,
    /// then take it (or settle at the root).
    #[inline]
    pub(crate) fn next_state(&self, mut state: usize, byte: u8) -> usize {
        loop {
            let node = &self.nodes[state];
            if let Some(next) = node.child(byte) {
                return next;
            }
            if state == ROOT {
                return ROOT;
            }
            state = node.fail();
        }
    }

    #[inline]
    pub(crate) fn outputs_at(&self, state: usize) -> &[PatternId] {
        self.nodes[state].outputs()
    }
}
