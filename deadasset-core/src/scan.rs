//! Parallel, deterministic file discovery with directory pruning, and
//! document loading.
//!
//! Performance optimizations:
//! - Early directory pruning via `WalkDir::filter_entry` (O(1) subtree skip)
//! - Parallel entry filtering via Rayon's `par_bridge`
//! - Parallel reads; each file is read exactly once into memory

use anyhow::{Context, Result};
use rayon::prelude::*;
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

use crate::corpus::Document;

/// Directory names excluded by default (vendored stylesheet libraries and
/// tooling directories).
pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &["bourbon", "custom", "neat", "node_modules", ".git"];

/// Source extensions scanned for asset references by default.
pub const DEFAULT_SOURCE_EXTENSIONS: &[&str] = &["html", "ts", "js", "scss", "css"];

/// Checks if a directory entry should be pruned (excluded from traversal).
///
/// The walk root itself is never pruned.
#[inline]
fn is_excluded_dir(entry: &walkdir::DirEntry, excludes: &HashSet<&str>) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| excludes.contains(name))
}

#[inline]
fn has_extension(path: &Path, extensions: &HashSet<String>) -> bool {
    extensions.is_empty()
        || path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| extensions.contains(&ext.to_ascii_lowercase()))
}

/// Normalize user-supplied extensions: strip leading dots, lowercase.
fn normalize_extensions(extensions: &[&str]) -> HashSet<String> {
    extensions
        .iter()
        .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

/// Gathers files below `root` whose extension is in `extensions`.
///
/// - An empty extension list accepts every file
/// - Directories named in `DEFAULT_EXCLUDED_DIRS` or `excludes` are skipped with their subtree
/// - Output is sorted for deterministic reports
pub fn gather_files(root: &Path, extensions: &[&str], excludes: &[&str]) -> Result<Vec<PathBuf>> {
    let all_excludes: HashSet<&str> = DEFAULT_EXCLUDED_DIRS
        .iter()
        .copied()
        .chain(excludes.iter().copied())
        .collect();
    let extensions = normalize_extensions(extensions);

    let mut files = WalkDir::new(root)
        .into_iter()
        // filter_entry prunes entire subtrees before iteration
        .filter_entry(|e| !is_excluded_dir(e, &all_excludes))
        .par_bridge()
        .filter_map(|entry| match entry {
            Ok(e) => {
                let path = e.path();
                if e.file_type().is_file() && has_extension(path, &extensions) {
                    Some(Ok(path.to_path_buf()))
                } else {
                    None
                }
            }
            Err(e) => Some(Err(e.into())),
        })
        .collect::<Result<Vec<_>>>()
        .with_context(|| format!("Failed to gather files from {}", root.display()))?;

    files.sort();
    Ok(files)
}

/// Gathers files from several roots; duplicates (overlapping roots) are removed.
pub fn gather_files_in<P: AsRef<Path>>(
    roots: &[P],
    extensions: &[&str],
    excludes: &[&str],
) -> Result<Vec<PathBuf>> {
    let mut all = BTreeSet::new();
    for root in roots {
        all.extend(gather_files(root.as_ref(), extensions, excludes)?);
    }
    Ok(all.into_iter().collect())
}

/// Document id for a path: the path itself when it is valid UTF-8,
/// otherwise its escaped debug form (invalid bytes as `\xNN`), so distinct
/// paths never share an id.
pub fn document_id(path: &Path) -> String {
    match path.to_str() {
        Some(text) => text.to_string(),
        None => format!("{:?}", path),
    }
}

/// Reads files into memory in parallel.
///
/// Unreadable files are logged and skipped; the run continues with the
/// rest. Content is kept as raw bytes, so binary or non-UTF-8 files are fine.
pub fn read_documents(paths: &[PathBuf]) -> Vec<Document> {
    paths
        .par_iter()
        .filter_map(|path| match fs::read(path) {
            Ok(content) => Some(Document::new(document_id(path), content)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping unreadable file");
                None
            }
        })
        .collect()
}
