//! deadasset-core: unused asset detection for web projects
//!
//! Every asset file name is a search pattern. One Aho–Corasick automaton
//! over all names scans each source file once; names that no source file
//! contains are reported as unused.
//!
//! # Features
//!
//! - **Multi-pattern search**: linear-time scan per document regardless of pattern count
//! - **Parallel corpus scan**: per-document scans fan out over Rayon, results fan in by union
//! - **Usage index**: which source files reference which asset
//! - **Stylesheet audits**: custom property usage, SASS variable consistency, property statistics
//!
//! # Quick Start
//!
//! Use the [`prelude`] module for convenient imports:
//!
//! ```rust,ignore
//! use deadasset_core::prelude::*;
//!
//! let report = Deadasset::new()
//!     .asset_dirs(["src/assets/images"])
//!     .source_dirs(["src"])
//!     .analyze()?;
//!
//! for name in &report.unused {
//!     println!("Unused asset: {}", name);
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`automaton`]: pattern registration, failure links, scanning
//! - [`corpus`]: documents and the parallel corpus scan
//! - [`aggregate`]: union of per-document results and the unused set
//! - [`scan`]: parallel file discovery and loading
//! - [`assets`]: asset enumeration
//! - [`builder`]: fluent builder API for configuration
//! - [`report`]: plaintext and JSON output
//! - [`error`]: typed error handling
//!
//! # Cargo Features
//!
//! - `css` (default): stylesheet audits in [`css`]
//! - `full`: enable all optional features

// Core modules (always available)
pub mod aggregate;
pub mod assets;
pub mod automaton;
pub mod builder;
pub mod config;
pub mod corpus;
pub mod error;
pub mod logging;
pub mod prelude;
pub mod report;
pub mod scan;

// Feature-gated modules
#[cfg(feature = "css")]
pub mod css;

// ============================================================================
// Explicit Re-exports (avoiding glob imports for clear API surface)
// ============================================================================

// Error types
pub use error::{DeadassetError, DeadassetResult, IoResultExt};

// Automaton
pub use automaton::{
    Automaton, AutomatonBuilder, MatchSet, Matcher, PatternId, Registration, Scanner, TrieNode,
};

// Corpus scanning and aggregation
pub use aggregate::{union_matches, unused, UsageIndex};
pub use corpus::{scan_corpus, used_patterns, CorpusUsage, Document};

// Builder API
pub use builder::{is_ignored, Deadasset, UsageReport};

// Asset discovery
pub use assets::{collect_assets, AssetInventory};

// Configuration
pub use config::{load_config, DeadassetConfig, OutputConfig, CONFIG_FILE};

// Logging
pub use logging::{init_structured_logging, log_error, log_event, log_info, log_warn};

// Reporting
pub use report::{print_json, print_plain, to_pretty_json, write_json, write_text};

// File scanning
pub use scan::{
    document_id, gather_files, gather_files_in, read_documents, DEFAULT_EXCLUDED_DIRS,
    DEFAULT_SOURCE_EXTENSIONS,
};
