//! Asset enumeration: the candidate patterns are asset file names.

use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::scan::gather_files;

/// All asset files found, grouped by file name.
///
/// The file name is what source files reference, so it is the search
/// pattern. Several files may share a name in different directories.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AssetInventory {
    by_name: BTreeMap<String, Vec<PathBuf>>,
    /// Name of every file in discovery order, repeats included
    discovered: Vec<String>,
}

impl AssetInventory {
    /// Add one asset file.
    pub fn add(&mut self, path: PathBuf) {
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().to_string()) else {
            return;
        };
        self.discovered.push(name.clone());
        self.by_name.entry(name).or_default().push(path);
    }

    /// Distinct asset names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.by_name.keys().map(String::as_str)
    }

    /// Every discovered file name, repeats included.
    pub fn discovered(&self) -> &[String] {
        &self.discovered
    }

    /// Files carrying `name`.
    pub fn paths_for(&self, name: &str) -> &[PathBuf] {
        self.by_name.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Names carried by more than one file.
    pub fn shared_names(&self) -> Vec<&str> {
        self.by_name
            .iter()
            .filter(|(_, paths)| paths.len() > 1)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    pub fn file_count(&self) -> usize {
        self.discovered.len()
    }

    pub fn name_count(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.discovered.is_empty()
    }
}

/// Collect every file below the asset directories.
pub fn collect_assets<P: AsRef<Path>>(dirs: &[P], excludes: &[&str]) -> Result<AssetInventory> {
    let mut inventory = AssetInventory::default();
    for dir in dirs {
        for path in gather_files(dir.as_ref(), &[], excludes)? {
            inventory.add(path);
        }
    }
    Ok(inventory)
}
