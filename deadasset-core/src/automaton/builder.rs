//! Pattern registration and two-phase automaton construction.
//!
//! Phase 1 inserts every pattern into the trie. Phase 2 walks the trie
//! breadth-first and assigns each node its fail link, then folds the fail
//! target's outputs into the node's own. BFS order guarantees the fail
//! target (strictly shallower) is already final when it is read.
//!
//! Construction cost: O(total pattern bytes × alphabet search) once;
//! every later scan is linear in the document length.

use std::collections::{HashMap, VecDeque};

use tracing::debug;

use super::machine::Automaton;
use super::trie::{PatternId, Trie, TrieNode, ROOT};
use crate::error::{DeadassetError, DeadassetResult};

/// Outcome of a single `register` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// First registration of this pattern
    Added(PatternId),
    /// Pattern was already registered; the first id is returned
    Duplicate(PatternId),
}

impl Registration {
    pub fn id(self) -> PatternId {
        match self {
            Self::Added(id) | Self::Duplicate(id) => id,
        }
    }

    pub fn is_duplicate(self) -> bool {
        matches!(self, Self::Duplicate(_))
    }
}

/// Collects patterns and builds immutable [`Automaton`]s.
///
/// # Example
///
/// ```rust,ignore
/// let mut builder = AutomatonBuilder::new();
/// builder.register("ab")?;
/// builder.register("abc")?;
/// let automaton = builder.build();
/// assert_eq!(automaton.scan("xabcx").len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct AutomatonBuilder {
    patterns: Vec<String>,
    index: HashMap<String, PatternId>,
    registrations: usize,
    duplicates: usize,
}

impl AutomatonBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-size for an expected number of distinct patterns.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            patterns: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Register a pattern and return its id.
    ///
    /// Duplicates return the id of the first registration.
    pub fn register(&mut self, pattern: impl Into<String>) -> DeadassetResult<PatternId> {
        self.register_detailed(pattern).map(Registration::id)
    }

    /// Register a pattern, reporting whether it aliased an earlier one.
    pub fn register_detailed(
        &mut self,
        pattern: impl Into<String>,
    ) -> DeadassetResult<Registration> {
        let ordinal = self.registrations;
        self.registrations += 1;

        let pattern = pattern.into();
        if pattern.is_empty() {
            return Err(DeadassetError::EmptyPattern { ordinal });
        }

        if let Some(&id) = self.index.get(&pattern) {
            self.duplicates += 1;
            return Ok(Registration::Duplicate(id));
        }

        let raw = u32::try_from(self.patterns.len()).map_err(|_| DeadassetError::PatternLimit {
            limit: u32::MAX as usize,
        })?;
        let id = PatternId::new(raw);
        self.index.insert(pattern.clone(), id);
        self.patterns.push(pattern);
        Ok(Registration::Added(id))
    }

    /// Id of an already registered pattern.
    pub fn lookup(&self, pattern: &str) -> Option<PatternId> {
        self.index.get(pattern).copied()
    }

    /// Number of distinct patterns.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Number of registrations that aliased an earlier pattern.
    pub fn duplicate_count(&self) -> usize {
        self.duplicates
    }

    /// Distinct patterns in id order.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Build an automaton over the registered patterns.
    ///
    /// Does not consume the builder; building twice yields automatons
    /// with identical scan behavior.
    pub fn build(&self) -> Automaton {
        let mut trie = Trie::new();
        for (pos, pattern) in self.patterns.iter().enumerate() {
            trie.insert(pattern.as_bytes(), PatternId::from_index(pos));
        }

        let mut nodes = trie.into_nodes();
        link_failures(&mut nodes);

        debug!(
            patterns = self.patterns.len(),
            nodes = nodes.len(),
            duplicates = self.duplicates,
            "automaton built"
        );

        Automaton::from_parts(nodes, self.patterns.clone(), self.index.clone())
    }
}

/// Assign fail links in BFS order and propagate output sets along them.
fn link_failures(nodes: &mut [TrieNode]) {
    let mut queue = VecDeque::with_capacity(nodes.len());

    // Depth-1 nodes always fail to the root.
    for pos in 0..nodes[ROOT].edge_count() {
        let (_, child) = nodes[ROOT].edge_at(pos);
        nodes[child].set_fail(ROOT);
        queue.push_back(child);
    }

    while let Some(parent) = queue.pop_front() {
        for pos in 0..nodes[parent].edge_count() {
            let (byte, child) = nodes[parent].edge_at(pos);

            let mut state = nodes[parent].fail();
            let fail = loop {
                if let Some(next) = nodes[state].child(byte) {
                    break next;
                }
                if state == ROOT {
                    break ROOT;
                }
                state = nodes[state].fail();
            };
            nodes[child].set_fail(fail);

            if !nodes[fail].outputs().is_empty() {
                let inherited = nodes[fail].outputs().to_vec();
                nodes[child].merge_outputs(&inherited);
            }

            queue.push_back(child);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder_with(patterns: &[&str]) -> AutomatonBuilder {
        let mut builder = AutomatonBuilder::new();
        for p in patterns {
            builder.register(*p).unwrap();
        }
        builder
    }

    #[test]
    fn test_register_assigns_dense_ids() {
        let mut builder = AutomatonBuilder::new();
        assert_eq!(builder.register("logo.png").unwrap().index(), 0);
        assert_eq!(builder.register("icon.png").unwrap().index(), 1);
        assert_eq!(builder.register("banner.png").unwrap().index(), 2);
        assert_eq!(builder.len(), 3);
    }

    #[test]
    fn test_empty_pattern_rejected() {
        let mut builder = AutomatonBuilder::new();
        builder.register("a").unwrap();
        let err = builder.register("").unwrap_err();
        assert!(matches!(err, DeadassetError::EmptyPattern { ordinal: 1 }));
        assert_eq!(builder.len(), 1);
    }

    #[test]
    fn test_duplicate_registration_aliases() {
        let mut builder = AutomatonBuilder::new();
        let first = builder.register_detailed("icon.png").unwrap();
        let second = builder.register_detailed("icon.png").unwrap();

        assert_eq!(first, Registration::Added(first.id()));
        assert!(second.is_duplicate());
        assert_eq!(first.id(), second.id());
        assert_eq!(builder.len(), 1);
        assert_eq!(builder.duplicate_count(), 1);
        assert_eq!(builder.lookup("icon.png"), Some(first.id()));
        assert_eq!(builder.lookup("logo.png"), None);
    }

    #[test]
    fn test_root_fails_to_itself() {
        let automaton = builder_with(&["he", "she"]).build();
        assert_eq!(automaton.node(ROOT).unwrap().fail(), ROOT);
    }

    #[test]
    fn test_fail_links_decrease_depth() {
        let automaton = builder_with(&["he", "she", "his", "hers", "ushers"]).build();
        for idx in 1..automaton.node_count() {
            let node = automaton.node(idx).unwrap();
            let fail = automaton.node(node.fail()).unwrap();
            assert!(
                fail.depth() < node.depth(),
                "node {} (depth {}) fails to depth {}",
                idx,
                node.depth(),
                fail.depth()
            );
        }
    }

    #[test]
    fn test_outputs_include_fail_target() {
        // "she" fails to "he": reaching "she" must also report "he".
        let automaton = builder_with(&["he", "she"]).build();
        let he = automaton.id_of("he").unwrap();
        let she = automaton.id_of("she").unwrap();

        let mut state = ROOT;
        for &b in b"she" {
            state = automaton.node(state).unwrap().child(b).unwrap();
        }
        let node = automaton.node(state).unwrap();
        assert_eq!(automaton.node(node.fail()).unwrap().depth(), 2);
        assert!(node.outputs().contains(&he));
        assert!(node.outputs().contains(&she));
    }

    #[test]
    fn test_outputs_superset_of_fail_target() {
        let automaton = builder_with(&["a", "aa", "aaa", "ba", "bab"]).build();
        for idx in 0..automaton.node_count() {
            let node = automaton.node(idx).unwrap();
            let fail = automaton.node(node.fail()).unwrap();
            for id in fail.outputs() {
                assert!(node.outputs().contains(id));
            }
        }
    }

    #[test]
    fn test_empty_builder_builds_root_only() {
        let automaton = AutomatonBuilder::new().build();
        assert_eq!(automaton.node_count(), 1);
        assert_eq!(automaton.pattern_count(), 0);
    }
}
