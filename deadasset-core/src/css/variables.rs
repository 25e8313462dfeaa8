//! CSS custom property audit: declared vs used `--variables`.
//!
//! - Declarations: `--name:`
//! - Usages: `var(--name)`
//!
//! A usage with no declaration is *undeclared*; a declaration with no
//! usage anywhere is *unused*.

use rayon::prelude::*;
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::OnceLock;

use crate::corpus::Document;

fn usage_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"var\((--[a-zA-Z0-9-]+)\)").expect("Hardcoded regex pattern is valid")
    })
}

fn declaration_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"(--[\w-]+):").expect("Hardcoded regex pattern is valid"))
}

fn capture_set(re: &Regex, content: &str) -> BTreeSet<String> {
    re.captures_iter(content)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Custom properties read through `var(...)`.
pub fn extract_usages(content: &str) -> BTreeSet<String> {
    capture_set(usage_regex(), content)
}

/// Custom properties declared with `--name:`.
pub fn extract_declarations(content: &str) -> BTreeSet<String> {
    capture_set(declaration_regex(), content)
}

/// Union of declarations across documents.
pub fn declarations_in(documents: &[Document]) -> BTreeSet<String> {
    documents
        .iter()
        .flat_map(|doc| extract_declarations(&doc.text()))
        .collect()
}

/// Result of auditing custom properties.
#[derive(Debug, Clone, Default, Serialize)]
pub struct VariableAudit {
    /// Used but never declared → file names that use them
    pub undeclared: BTreeMap<String, Vec<String>>,
    /// Declared but never used
    pub unused: BTreeSet<String>,
}

impl VariableAudit {
    /// Files (by name) involved in undeclared usages.
    pub fn affected_files(&self) -> BTreeSet<&str> {
        self.undeclared
            .values()
            .flatten()
            .map(String::as_str)
            .collect()
    }
}

fn file_name(id: &str) -> String {
    Path::new(id)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| id.to_string())
}

/// Compare usages in `documents` against the `declared` set.
pub fn audit(documents: &[Document], declared: &BTreeSet<String>) -> VariableAudit {
    let per_document: Vec<(String, BTreeSet<String>)> = documents
        .par_iter()
        .map(|doc| (file_name(&doc.id), extract_usages(&doc.text())))
        .collect();

    let mut audit = VariableAudit::default();
    let mut used = BTreeSet::new();
    for (name, usages) in per_document {
        for variable in usages.difference(declared) {
            audit
                .undeclared
                .entry(variable.clone())
                .or_default()
                .push(name.clone());
        }
        used.extend(usages);
    }
    audit.unused = declared.difference(&used).cloned().collect();
    audit
}

/// Variables used in `documents` but missing from `declared`, with the
/// names of the files using them.
pub fn undeclared(
    documents: &[Document],
    declared: &BTreeSet<String>,
) -> BTreeMap<String, Vec<String>> {
    audit(documents, declared).undeclared
}

/// Declared variables that no document uses.
pub fn unused(documents: &[Document], declared: &BTreeSet<String>) -> BTreeSet<String> {
    audit(documents, declared).unused
}
