//! Trie arena: nodes addressed by index, root at index 0.
//!
//! Each node carries the three Aho–Corasick functions:
//! - goto: sorted `(byte, child)` edges, binary-searched on lookup
//! - fail: index of the longest proper suffix state
//! - output: sorted, de-duplicated pattern identifiers reported on arrival
//!
//! Memory: one `Vec<TrieNode>` for the whole automaton; no pointers,
//! no reference counting.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of the root node in every arena.
pub const ROOT: usize = 0;

/// Dense identifier of a registered pattern (0..N-1, registration order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatternId(u32);

impl PatternId {
    pub(crate) fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Build an id from an arena/vector index known to fit in `u32`.
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    /// Position of the pattern in registration order.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PatternId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single trie state.
#[derive(Debug, Clone, Default)]
pub struct TrieNode {
    edges: Vec<(u8, usize)>,
    fail: usize,
    outputs: Vec<PatternId>,
    depth: usize,
}

impl TrieNode {
    fn with_depth(depth: usize) -> Self {
        Self {
            depth,
            ..Self::default()
        }
    }

    /// Goto function: child reached on `byte`, if any.
    #[inline]
    pub fn child(&self, byte: u8) -> Option<usize> {
        self.edges
            .binary_search_by_key(&byte, |&(b, _)| b)
            .ok()
            .map(|pos| self.edges[pos].1)
    }

    /// All goto edges, ordered by byte.
    pub fn children(&self) -> impl Iterator<Item = (u8, usize)> + '_ {
        self.edges.iter().copied()
    }

    /// Failure function.
    #[inline]
    pub fn fail(&self) -> usize {
        self.fail
    }

    /// Output function: patterns ending here or anywhere on the fail-chain.
    #[inline]
    pub fn outputs(&self) -> &[PatternId] {
        &self.outputs
    }

    /// Distance from the root (length of the path spelled to this node).
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub(crate) fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub(crate) fn edge_at(&self, pos: usize) -> (u8, usize) {
        self.edges[pos]
    }

    pub(crate) fn set_fail(&mut self, fail: usize) {
        self.fail = fail;
    }

    fn insert_child(&mut self, byte: u8, child: usize) {
        if let Err(pos) = self.edges.binary_search_by_key(&byte, |&(b, _)| b) {
            self.edges.insert(pos, (byte, child));
        }
    }

    fn add_output(&mut self, id: PatternId) {
        if let Err(pos) = self.outputs.binary_search(&id) {
            self.outputs.insert(pos, id);
        }
    }

    /// Union a sorted output slice into this node's sorted outputs.
    pub(crate) fn merge_outputs(&mut self, inherited: &[PatternId]) {
        if inherited.is_empty() {
            return;
        }
        if self.outputs.is_empty() {
            self.outputs.extend_from_slice(inherited);
            return;
        }

        let own = std::mem::take(&mut self.outputs);
        let mut merged = Vec::with_capacity(own.len() + inherited.len());
        let (mut i, mut j) = (0, 0);
        while i < own.len() && j < inherited.len() {
            match own[i].cmp(&inherited[j]) {
                std::cmp::Ordering::Less => {
                    merged.push(own[i]);
                    i += 1;
                }
                std::cmp::Ordering::Greater => {
                    merged.push(inherited[j]);
                    j += 1;
                }
                std::cmp::Ordering::Equal => {
                    merged.push(own[i]);
                    i += 1;
                    j += 1;
                }
            }
        }
        merged.extend_from_slice(&own[i..]);
        merged.extend_from_slice(&inherited[j..]);
        self.outputs = merged;
    }
}

/// Node arena under construction (goto + own outputs only).
#[derive(Debug, Clone)]
pub(crate) struct Trie {
    nodes: Vec<TrieNode>,
}

impl Trie {
    pub(crate) fn new() -> Self {
        Self {
            nodes: vec![TrieNode::with_depth(0)],
        }
    }

    /// Walk/extend the trie along `pattern`, marking the terminal node.
    ///
    /// Returns the terminal node index.
    pub(crate) fn insert(&mut self, pattern: &[u8], id: PatternId) -> usize {
        let mut state = ROOT;
        for &byte in pattern {
            state = match self.nodes[state].child(byte) {
                Some(next) => next,
                None => {
                    let next = self.nodes.len();
                    let depth = self.nodes[state].depth + 1;
                    self.nodes.push(TrieNode::with_depth(depth));
                    self.nodes[state].insert_child(byte, next);
                    next
                }
            };
        }
        self.nodes[state].add_output(id);
        state
    }

    pub(crate) fn into_nodes(self) -> Vec<TrieNode> {
        self.nodes
    }
}
