//! Builder pattern API for unused asset analysis.
//!
//! Provides a fluent interface for configuring and running the analysis:
//!
//! ```rust,ignore
//! use deadasset_core::prelude::*;
//!
//! let report = Deadasset::new()
//!     .asset_dirs(["src/assets/images"])
//!     .source_dirs(["src"])
//!     .ignore_patterns(["favicon*"])
//!     .analyze()?;
//!
//! println!("Unused assets: {:?}", report.unused);
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::assets::collect_assets;
use crate::automaton::{AutomatonBuilder, Matcher};
use crate::config::DeadassetConfig;
use crate::corpus::scan_corpus;
use crate::error::DeadassetError;
use crate::scan::{gather_files_in, read_documents, DEFAULT_SOURCE_EXTENSIONS};

/// Builder for configuring unused asset analysis.
#[derive(Debug, Clone)]
pub struct Deadasset {
    /// Directories whose files are the candidate assets
    asset_dirs: Vec<PathBuf>,

    /// Directories whose files are searched for asset references
    source_dirs: Vec<PathBuf>,

    /// Source file extensions to search
    extensions: Vec<String>,

    /// Extra directory names to prune
    excluded_dirs: Vec<String>,

    /// Asset name patterns never reported as unused
    ignored_patterns: Vec<String>,
}

impl Default for Deadasset {
    fn default() -> Self {
        Self::new()
    }
}

impl Deadasset {
    /// Create a new analysis builder with the default source extensions.
    pub fn new() -> Self {
        Self {
            asset_dirs: Vec::new(),
            source_dirs: Vec::new(),
            extensions: DEFAULT_SOURCE_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            excluded_dirs: Vec::new(),
            ignored_patterns: Vec::new(),
        }
    }

    /// Add directories containing assets.
    pub fn asset_dirs(mut self, dirs: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        self.asset_dirs.extend(dirs.into_iter().map(Into::into));
        self
    }

    /// Add directories containing source files.
    pub fn source_dirs(mut self, dirs: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        self.source_dirs.extend(dirs.into_iter().map(Into::into));
        self
    }

    /// Replace the source extensions to search.
    pub fn extensions(mut self, exts: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.extensions = exts.into_iter().map(Into::into).collect();
        self
    }

    /// Add directory names to exclude from scanning.
    pub fn exclude_dirs(mut self, dirs: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.excluded_dirs.extend(dirs.into_iter().map(Into::into));
        self
    }

    /// Add patterns for asset names to ignore.
    pub fn ignore_patterns(mut self, patterns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.ignored_patterns.extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Merge settings from a `deadasset.toml`.
    pub fn apply_config(mut self, config: &DeadassetConfig) -> Self {
        if let Some(exclude) = &config.exclude {
            self.excluded_dirs.extend(exclude.iter().cloned());
        }
        if let Some(exts) = &config.extensions {
            self.extensions = exts.clone();
        }
        if let Some(ignore) = &config.ignore {
            self.ignored_patterns.extend(ignore.iter().cloned());
        }
        self
    }

    /// Run the analysis and return results.
    pub fn analyze(&self) -> Result<UsageReport> {
        if self.asset_dirs.is_empty() {
            return Err(DeadassetError::invalid_argument("no asset directories given").into());
        }
        if self.source_dirs.is_empty() {
            return Err(DeadassetError::invalid_argument("no source directories given").into());
        }

        let excludes: Vec<&str> = self.excluded_dirs.iter().map(String::as_str).collect();
        let extensions: Vec<&str> = self.extensions.iter().map(String::as_str).collect();

        // 1. Enumerate assets
        let inventory = collect_assets(&self.asset_dirs, &excludes)
            .context("Failed to collect asset files")?;
        info!(
            files = inventory.file_count(),
            names = inventory.name_count(),
            "assets collected"
        );

        // 2. Build the automaton over asset names
        let mut matcher =
            Matcher::from_builder(AutomatonBuilder::with_capacity(inventory.name_count()));
        for name in inventory.names() {
            matcher.register(name)?;
        }
        let automaton = matcher.build()?;

        // 3. Gather and load source files
        let files = gather_files_in(&self.source_dirs, &extensions, &excludes)
            .context("Failed to gather source files")?;
        let documents = read_documents(&files);
        info!(
            files = files.len(),
            read = documents.len(),
            "source files loaded"
        );

        // 4. Scan and partition
        let usage = scan_corpus(&automaton, &documents);
        let unused_ids = usage.unused(&automaton);

        let mut unused = Vec::new();
        let mut ignored = Vec::new();
        for name in automaton.resolve(&unused_ids) {
            if self.is_ignored(name) {
                ignored.push(name.to_string());
            } else {
                unused.push(name.to_string());
            }
        }

        let usage_map: BTreeMap<String, Vec<String>> = usage
            .index
            .iter()
            .filter_map(|(id, docs)| {
                automaton
                    .pattern(id)
                    .map(|name| (name.to_string(), docs.to_vec()))
            })
            .collect();

        let mut used: Vec<String> = automaton
            .resolve(&usage.used)
            .into_iter()
            .map(String::from)
            .collect();
        used.sort();
        unused.sort();
        ignored.sort();

        Ok(UsageReport {
            assets: inventory.names().map(String::from).collect(),
            asset_files: inventory.file_count(),
            files,
            documents_read: documents.len(),
            used,
            unused,
            ignored,
            usage: usage_map,
            shared_names: inventory.shared_names().into_iter().map(String::from).collect(),
        })
    }

    /// Check if an asset name matches any ignored pattern.
    fn is_ignored(&self, name: &str) -> bool {
        is_ignored(name, &self.ignored_patterns)
    }
}

/// Ignore-pattern matching: `prefix*`, `*suffix`, otherwise exact or substring.
pub fn is_ignored(name: &str, patterns: &[String]) -> bool {
    for pattern in patterns {
        if let Some(prefix) = pattern.strip_suffix('*') {
            if name.starts_with(prefix) {
                return true;
            }
        } else if let Some(suffix) = pattern.strip_prefix('*') {
            if name.ends_with(suffix) {
                return true;
            }
        } else if name == pattern || name.contains(pattern.as_str()) {
            return true;
        }
    }
    false
}

/// Result of running unused asset analysis.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UsageReport {
    /// Distinct asset names (the search patterns), sorted
    pub assets: Vec<String>,

    /// Number of asset files found (names may repeat)
    pub asset_files: usize,

    /// Source files searched
    pub files: Vec<PathBuf>,

    /// Source files successfully read
    pub documents_read: usize,

    /// Asset names referenced at least once
    pub used: Vec<String>,

    /// Asset names never referenced
    pub unused: Vec<String>,

    /// Unreferenced asset names suppressed by ignore patterns
    pub ignored: Vec<String>,

    /// Asset name → source files referencing it
    pub usage: BTreeMap<String, Vec<String>>,

    /// Names shared by more than one asset file
    pub shared_names: Vec<String>,
}

impl UsageReport {
    /// Check if any unused asset was found.
    pub fn has_unused(&self) -> bool {
        !self.unused.is_empty()
    }

    pub fn unused_count(&self) -> usize {
        self.unused.len()
    }

    /// Get percentage of unused assets.
    pub fn unused_percentage(&self) -> f64 {
        if self.assets.is_empty() {
            0.0
        } else {
            (self.unused.len() as f64 / self.assets.len() as f64) * 100.0
        }
    }
}
