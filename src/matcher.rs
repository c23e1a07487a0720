use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::index::TargetIndex;

/// A source file and the path it should be copied to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchPair {
    pub source: PathBuf,
    pub target: PathBuf,
}

impl MatchPair {
    pub const fn new(source: PathBuf, target: PathBuf) -> Self {
        Self { source, target }
    }

    /// File name shared by source and target.
    #[must_use]
    pub fn file_name(&self) -> String {
        crate::path_to_filename_string(&self.source)
    }

    /// Directory the file is copied into.
    #[must_use]
    pub fn target_dir(&self) -> &Path {
        self.target.parent().unwrap_or_else(|| Path::new(""))
    }
}

/// Match the files directly inside `source_dir` against the target index.
///
/// A file is a candidate when its name ends with `extension`, compared as a literal
/// case-sensitive suffix of the raw file name. Candidates whose base name is indexed are
/// paired with the indexed directory joined with their full file name; the rest are
/// dropped silently. Regular files and symlinks to files are considered,
/// and the result keeps the directory listing order.
///
/// # Errors
/// Returns a traversal error if `source_dir` cannot be listed.
pub fn match_files(index: &TargetIndex, source_dir: &Path, extension: &str) -> Result<Vec<MatchPair>, Error> {
    let mut pairs = Vec::new();
    for entry in fs::read_dir(source_dir).map_err(|e| Error::traversal(source_dir, e))? {
        let entry = entry.map_err(|e| Error::traversal(source_dir, e))?;
        let file_type = entry.file_type().map_err(|e| Error::traversal(entry.path(), e))?;
        if !(file_type.is_file() || (file_type.is_symlink() && entry.path().is_file())) {
            continue;
        }

        let file_name = entry.file_name();
        if !file_name.as_encoded_bytes().ends_with(extension.as_bytes()) {
            continue;
        }

        if let Some(directory) = index.get(crate::base_name(&file_name)) {
            pairs.push(MatchPair::new(entry.path(), directory.join(&file_name)));
        }
    }
    Ok(pairs)
}
