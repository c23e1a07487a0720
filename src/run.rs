//! Entry points used by front ends: validate settings and run a full copy.

use std::path::PathBuf;

use crate::copier::{CopyLogEntry, Copier};
use crate::error::Error;
use crate::index::TargetIndex;
use crate::log_store::LogStore;
use crate::matcher::match_files;
use crate::settings::Settings;

/// Counts and log entries of a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Distinct base names found in the target tree.
    pub indexed_count: usize,
    /// Files seen in the target tree, including ones sharing a base name.
    pub files_visited: usize,
    pub matched_count: usize,
    pub copied_count: usize,
    pub skipped_count: usize,
    pub failed_count: usize,
    pub entries: Vec<CopyLogEntry>,
    /// Where the log block was written, if a block was written to a file.
    pub log_path: Option<PathBuf>,
}

/// Check the settings before any traversal starts.
///
/// # Errors
/// Returns [`Error::ConfigInvalid`] with the reason the settings were rejected.
pub fn validate(settings: &Settings) -> Result<(), Error> {
    settings.validate().map_err(Error::from)
}

/// Index the target tree, match the source files, copy, and append the log block.
///
/// When nothing matches, nothing is copied and no log block is written.
///
/// # Errors
/// Fails before any side effect if the settings are invalid,
/// and aborts the run if the target tree or source directory cannot be read
/// or the log block cannot be written.
/// Individual copy failures are reported in the summary entries instead.
pub fn run_copy(settings: &Settings, log_store: &mut impl LogStore) -> Result<RunSummary, Error> {
    validate(settings)?;

    let index = TargetIndex::build(&settings.target_dir)?;
    let pairs = match_files(&index, &settings.source_dir, &settings.file_extension)?;

    let mut summary = RunSummary {
        indexed_count: index.len(),
        files_visited: index.files_visited(),
        matched_count: pairs.len(),
        ..RunSummary::default()
    };
    if pairs.is_empty() {
        return Ok(summary);
    }

    let report = Copier::new().copy_all(&pairs);
    log_store.append(&report.entries)?;

    summary.copied_count = report.copied;
    summary.skipped_count = report.skipped;
    summary.failed_count = report.failed;
    summary.entries = report.entries;
    summary.log_path = log_store.location().map(std::path::Path::to_path_buf);
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InvalidSetting;
    use crate::log_store::MemoryLogStore;
    use std::fs;

    #[test]
    fn test_validate_reports_reason() {
        let settings = Settings::new("", "", ".txt");

        let result = validate(&settings);

        assert!(matches!(result, Err(Error::ConfigInvalid(InvalidSetting::SourceDir))));
    }

    #[test]
    fn test_run_copy_invalid_settings_has_no_side_effects() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::new(dir.path(), dir.path(), "");
        let mut log = MemoryLogStore::default();

        let result = run_copy(&settings, &mut log);

        assert!(matches!(result, Err(Error::ConfigInvalid(InvalidSetting::EmptyExtension))));
        assert!(log.blocks.is_empty());
    }

    #[test]
    fn test_run_copy_counts() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source");
        let target = dir.path().join("target");
        fs::create_dir_all(target.join("a")).unwrap();
        fs::create_dir_all(&source).unwrap();
        fs::write(target.join("a").join("one.mkv"), "video").unwrap();
        fs::write(target.join("a").join("two.mkv"), "video").unwrap();
        fs::write(source.join("one.srt"), "subs").unwrap();
        fs::write(source.join("three.srt"), "subs").unwrap();
        let mut log = MemoryLogStore::default();

        let summary = run_copy(&Settings::new(&source, &target, ".srt"), &mut log).unwrap();

        assert_eq!(summary.indexed_count, 2);
        assert_eq!(summary.files_visited, 2);
        assert_eq!(summary.matched_count, 1);
        assert_eq!(summary.copied_count, 1);
        assert_eq!(summary.skipped_count, 0);
        assert_eq!(summary.failed_count, 0);
        assert_eq!(summary.entries.len(), 1);
        assert!(summary.log_path.is_none());
        assert_eq!(log.blocks.len(), 1);
        assert!(target.join("a").join("one.srt").exists());
    }

    #[test]
    fn test_run_copy_without_matches_writes_no_log() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source");
        let target = dir.path().join("target");
        fs::create_dir_all(&source).unwrap();
        fs::create_dir_all(&target).unwrap();
        fs::write(source.join("lonely.srt"), "subs").unwrap();
        let mut log = MemoryLogStore::default();

        let summary = run_copy(&Settings::new(&source, &target, ".srt"), &mut log).unwrap();

        assert_eq!(summary.matched_count, 0);
        assert!(summary.entries.is_empty());
        assert!(log.blocks.is_empty());
    }
}
