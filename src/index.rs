use std::collections::HashMap;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::Error;

/// Maps the base name of every file in the target tree to the directory containing it.
///
/// When several files share a base name, only the one visited last is kept.
#[derive(Debug, Default, Clone)]
pub struct TargetIndex {
    directories: HashMap<OsString, PathBuf>,
    files_visited: usize,
}

impl TargetIndex {
    /// Walk `target_dir` recursively and index every file by base name.
    ///
    /// Traversal is depth-first with the entries of each directory sorted by name,
    /// so the "last one wins" rule for shared base names is reproducible.
    /// The file's own extension is ignored.
    /// Symlinks to files are indexed under the link's name; symlinked directories are not entered.
    ///
    /// # Errors
    /// Returns a traversal error if any part of the tree cannot be read.
    /// No partial index is returned.
    pub fn build(target_dir: &Path) -> Result<Self, Error> {
        let mut index = Self::default();
        for entry in WalkDir::new(target_dir).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| Error::walk(target_dir, e))?;
            if !is_file(&entry) {
                continue;
            }
            let Some(parent) = entry.path().parent() else {
                continue;
            };
            index.insert(crate::base_name(entry.file_name()), parent.to_path_buf());
        }
        Ok(index)
    }

    /// Record a file, replacing any directory stored earlier for the same base name.
    pub fn insert(&mut self, base_name: impl Into<OsString>, directory: PathBuf) {
        self.files_visited += 1;
        self.directories.insert(base_name.into(), directory);
    }

    #[must_use]
    pub fn get(&self, base_name: impl AsRef<OsStr>) -> Option<&Path> {
        self.directories.get(base_name.as_ref()).map(PathBuf::as_path)
    }

    /// Number of distinct base names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.directories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.directories.is_empty()
    }

    /// Number of files seen while building, including shadowed duplicates.
    #[must_use]
    pub const fn files_visited(&self) -> usize {
        self.files_visited
    }
}

/// Regular file, or a symlink that resolves to one.
fn is_file(entry: &walkdir::DirEntry) -> bool {
    entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file())
}
