//! Single-pass document scanning.
//!
//! Each byte costs at most one forward goto step; fail-link hops are
//! bounded by earlier forward progress, so a scan is amortized
//! O(|document|) no matter how many patterns are registered.

use super::machine::Automaton;
use super::match_set::MatchSet;
use super::trie::ROOT;

/// Feeds documents through a shared automaton.
///
/// Holds only a shared borrow; the cursor and accumulator live on the
/// stack of each `scan` call. The accumulator grows with the matches
/// found, never with the number of registered patterns.
#[derive(Debug, Clone, Copy)]
pub struct Scanner<'a> {
    automaton: &'a Automaton,
}

impl<'a> Scanner<'a> {
    pub fn new(automaton: &'a Automaton) -> Self {
        Self { automaton }
    }

    /// Set of patterns occurring at least once in `document`.
    ///
    /// Stops early once every pattern has been seen.
    pub fn scan(&self, document: &[u8]) -> MatchSet {
        let total = self.automaton.pattern_count();
        if total == 0 || document.is_empty() {
            return MatchSet::new();
        }

        let mut found = MatchSet::new();
        let mut state = ROOT;

        for &byte in document {
            state = self.automaton.next_state(state, byte);
            let outputs = self.automaton.outputs_at(state);
            if outputs.is_empty() {
                continue;
            }
            for &id in outputs {
                found.insert(id);
            }
            if found.len() == total {
                break;
            }
        }

        found
    }
}

#[cfg(test)]
mod tests {
    use super::super::builder::AutomatonBuilder;
    use super::*;

    fn build(patterns: &[&str]) -> Automaton {
        let mut builder = AutomatonBuilder::new();
        for p in patterns {
            builder.register(*p).unwrap();
        }
        builder.build()
    }

    fn names(automaton: &Automaton, doc: &str) -> Vec<String> {
        let mut found: Vec<String> = automaton
            .resolve(&automaton.scan(doc))
            .into_iter()
            .map(String::from)
            .collect();
        found.sort();
        found
    }

    #[test]
    fn test_overlapping_prefix_patterns() {
        let automaton = build(&["ab", "abc"]);
        assert_eq!(names(&automaton, "xabcx"), vec!["ab", "abc"]);
    }

    #[test]
    fn test_suffix_pattern_reported_via_fail_chain() {
        let automaton = build(&["he", "she", "his", "hers"]);
        assert_eq!(names(&automaton, "ushers"), vec!["he", "hers", "she"]);
    }

    #[test]
    fn test_empty_document() {
        let automaton = build(&["a", "b"]);
        assert!(automaton.scan("").is_empty());
    }

    #[test]
    fn test_no_patterns() {
        let automaton = build(&[]);
        assert!(automaton.scan("anything at all").is_empty());
    }

    #[test]
    fn test_substring_without_boundaries() {
        let automaton = build(&["icon.png"]);
        assert_eq!(names(&automaton, "bigicon.pngx"), vec!["icon.png"]);
    }

    #[test]
    fn test_binary_content() {
        let automaton = build(&["PNG"]);
        let doc = [0x89u8, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0xff, 0x00];
        assert_eq!(automaton.scan(doc).len(), 1);
        assert!(automaton.scan([0xffu8, 0xfe, 0x00]).is_empty());
    }

    #[test]
    fn test_short_circuit_keeps_full_result() {
        let automaton = build(&["a", "b"]);
        // both found by byte 2; the rest of the document is irrelevant
        let found = automaton.scan("ab and a lot more text");
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn test_repeated_partial_matches() {
        let automaton = build(&["aab"]);
        assert_eq!(names(&automaton, "aaaaab"), vec!["aab"]);
        assert!(automaton.scan("aaaaa").is_empty());
    }

    #[test]
    fn test_multibyte_utf8_patterns() {
        let automaton = build(&["café.png", "ñ"]);
        assert_eq!(names(&automaton, "url(café.png)"), vec!["café.png"]);
        assert_eq!(names(&automaton, "mañana"), vec!["ñ"]);
    }

    #[test]
    fn test_short_scans_independent_of_pattern_count() {
        let patterns: Vec<String> = (0..100_000).map(|i| format!("asset_{}.png", i)).collect();
        let mut builder = AutomatonBuilder::with_capacity(patterns.len());
        for p in &patterns {
            builder.register(p.as_str()).unwrap();
        }
        let automaton = builder.build();
        let scanner = automaton.scanner();

        let started = std::time::Instant::now();
        for _ in 0..50_000 {
            assert!(scanner.scan(b"x").is_empty());
        }
        // Per-scan work proportional to the pattern count would take minutes here
        assert!(
            started.elapsed() < std::time::Duration::from_secs(5),
            "50k one-byte scans took {:?}",
            started.elapsed()
        );

        let found = scanner.scan(b"asset_99999.png");
        assert_eq!(automaton.resolve(&found), vec!["asset_99999.png"]);
    }

    #[test]
    fn test_scanner_reusable() {
        let automaton = build(&["x"]);
        let scanner = automaton.scanner();
        assert_eq!(scanner.scan(b"x").len(), 1);
        assert_eq!(scanner.scan(b"y").len(), 0);
    }
}
