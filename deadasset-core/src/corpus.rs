//! Corpus-wide scanning: fan out one scan per document, fan in by union.
//!
//! Performance characteristics:
//! - Parallel per-document scans via Rayon; the automaton is shared by reference
//! - Each worker owns its cursor and accumulator, no locks
//! - Reduction by set union, so worker scheduling never changes the result

use std::collections::BTreeMap;

use rayon::prelude::*;
use tracing::debug;

use crate::aggregate::{unused, UsageIndex};
use crate::automaton::{Automaton, MatchSet};

/// An already-loaded document with its identity (usually a file path).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: String,
    pub content: Vec<u8>,
}

impl Document {
    pub fn new(id: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
        }
    }

    /// Content as text, with invalid UTF-8 replaced.
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Result of scanning a whole corpus.
#[derive(Debug, Clone, Default)]
pub struct CorpusUsage {
    /// Union of all per-document matches
    pub used: MatchSet,
    /// Matches of every document, keyed by document id
    pub per_document: BTreeMap<String, MatchSet>,
    /// Pattern → documents multimap
    pub index: UsageIndex,
}

impl CorpusUsage {
    /// Patterns of `automaton` that no document used.
    pub fn unused(&self, automaton: &Automaton) -> MatchSet {
        unused(&automaton.all_ids(), &self.used)
    }
}

/// Scan every document against the automaton in parallel.
pub fn scan_corpus(automaton: &Automaton, documents: &[Document]) -> CorpusUsage {
    let per_document: Vec<(&str, MatchSet)> = documents
        .par_iter()
        .map(|doc| (doc.id.as_str(), automaton.scan(&doc.content)))
        .collect();

    // Sequential fold keeps the usage index in document order.
    let mut usage = CorpusUsage::default();
    for (id, matches) in per_document {
        usage.used.union_with(&matches);
        usage.index.record(id, &matches);
        usage.per_document.insert(id.to_string(), matches);
    }

    debug!(
        documents = documents.len(),
        used = usage.used.len(),
        patterns = automaton.pattern_count(),
        "corpus scanned"
    );

    usage
}

/// Union of matches over all documents, without per-document bookkeeping.
pub fn used_patterns(automaton: &Automaton, documents: &[Document]) -> MatchSet {
    documents
        .par_iter()
        .map(|doc| automaton.scan(&doc.content))
        .reduce(MatchSet::new, |mut acc, matches| {
            acc.union_with(&matches);
            acc
        })
}
