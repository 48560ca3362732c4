//! Resolution of model file paths to model names
//!
//! A model is identified by the stem of its file (`models/orders.sql` ->
//! `orders`). Paths come from pre-commit or the command line and need not
//! exist; directories that do exist are walked recursively.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Model files keyed by file stem
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelFiles {
    files: BTreeMap<String, PathBuf>,
}

impl ModelFiles {
    /// Collect files whose extension is in `extensions` (e.g. `[".sql"]`)
    ///
    /// A later path with the same stem replaces an earlier one.
    pub fn from_paths<P: AsRef<Path>>(paths: &[P], extensions: &[&str]) -> Self {
        let mut files = BTreeMap::new();

        for path in paths {
            let path = path.as_ref();

            if path.is_dir() {
                for entry in WalkDir::new(path)
                    .sort_by_file_name()
                    .into_iter()
                    .filter_map(|entry| match entry {
                        Ok(entry) => Some(entry),
                        Err(err) => {
                            tracing::warn!(error = %err, "skipping unreadable path");
                            None
                        }
                    })
                    .filter(|e| e.file_type().is_file())
                {
                    insert_if_matching(&mut files, entry.path(), extensions);
                }
            } else {
                insert_if_matching(&mut files, path, extensions);
            }
        }

        Self { files }
    }

    /// Path of the file with the given stem
    pub fn get(&self, stem: &str) -> Option<&Path> {
        self.files.get(stem).map(|p| p.as_path())
    }

    pub fn contains(&self, stem: &str) -> bool {
        self.files.contains_key(stem)
    }

    /// Stems in sorted order
    pub fn stems(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

fn insert_if_matching(files: &mut BTreeMap<String, PathBuf>, path: &Path, extensions: &[&str]) {
    let Some(extension) = path.extension().and_then(|e| e.to_str()) else {
        return;
    };

    if !extensions.iter().any(|ext| ext.trim_start_matches('.') == extension) {
        return;
    }

    if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
        files.insert(stem.to_string(), path.to_path_buf());
    }
}
