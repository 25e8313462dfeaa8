//! Multi-pattern substring search (Aho–Corasick).
//!
//! Decides in one linear pass per document which of many candidate
//! patterns occur in it.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────┐     ┌─────────────────────┐
//! │     builder.rs      │     │      trie.rs        │
//! │  ─────────────────  │────▶│  ─────────────────  │
//! │  register patterns  │     │  node arena: goto,  │
//! │  BFS fail links     │     │  fail, output sets  │
//! └──────────┬──────────┘     └─────────────────────┘
//!            ▼
//! ┌─────────────────────┐     ┌─────────────────────┐
//! │     machine.rs      │────▶│     scanner.rs      │
//! │  ─────────────────  │     │  ─────────────────  │
//! │  immutable, shared  │     │  cursor per scan,   │
//! │  automaton          │     │  MatchSet result    │
//! └─────────────────────┘     └─────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use deadasset_core::automaton::AutomatonBuilder;
//!
//! let mut builder = AutomatonBuilder::new();
//! for name in ["logo.png", "icon.png", "banner.png"] {
//!     builder.register(name)?;
//! }
//! let automaton = builder.build();
//!
//! let used = automaton.scan("<img src='assets/logo.png'>");
//! assert_eq!(automaton.resolve(&used), vec!["logo.png"]);
//! ```

pub mod builder;
pub mod machine;
pub mod match_set;
pub mod matcher;
pub mod scanner;
pub mod trie;

// Re-exports for convenience
pub use builder::{AutomatonBuilder, Registration};
pub use machine::Automaton;
pub use match_set::MatchSet;
pub use matcher::Matcher;
pub use scanner::Scanner;
pub use trie::{PatternId, TrieNode, ROOT};
