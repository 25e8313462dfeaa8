//! Prelude module for convenient imports.
//!
//! Import commonly used types with a single line:
//!
//! ```rust,ignore
//! use deadasset_core::prelude::*;
//! ```
//!
//! This provides the most commonly needed types for unused asset analysis
//! without polluting the namespace with rarely-used items.

// Core analysis types
pub use crate::error::{DeadassetError, DeadassetResult};

// Pattern matching
pub use crate::automaton::{Automaton, AutomatonBuilder, MatchSet, Matcher, PatternId};

// Corpus scanning
pub use crate::corpus::{scan_corpus, CorpusUsage, Document};

// File scanning
pub use crate::scan::{gather_files, gather_files_in, read_documents};

// Configuration
pub use crate::config::{load_config, DeadassetConfig};

// Builder API
pub use crate::builder::{Deadasset, UsageReport};
