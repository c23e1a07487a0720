use std::fmt;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use crate::matcher::MatchPair;

/// What happened to a single matched file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied,
    Skipped,
    Failed,
}

/// One line of the operation log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyLogEntry {
    pub outcome: CopyOutcome,
    pub source_name: String,
    pub target_dir: PathBuf,
    pub error: Option<String>,
}

/// Aggregate result of copying a batch of match pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyReport {
    pub copied: usize,
    pub skipped: usize,
    pub failed: usize,
    pub entries: Vec<CopyLogEntry>,
}

/// Copies matched files into place without touching files that already exist.
#[derive(Debug, Default, Clone, Copy)]
pub struct Copier;

impl CopyLogEntry {
    fn new(outcome: CopyOutcome, pair: &MatchPair, error: Option<String>) -> Self {
        Self {
            outcome,
            source_name: pair.file_name(),
            target_dir: pair.target_dir().to_path_buf(),
            error,
        }
    }
}

impl fmt::Display for CopyLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dir = self.target_dir.display();
        match self.outcome {
            CopyOutcome::Copied => write!(f, "Copied: {} -> {dir}", self.source_name),
            CopyOutcome::Skipped => write!(f, "Skipped: {} already exists in {dir}", self.source_name),
            CopyOutcome::Failed => write!(
                f,
                "Failed: {} -> {dir}, error: {}",
                self.source_name,
                self.error.as_deref().unwrap_or("unknown error")
            ),
        }
    }
}

impl CopyReport {
    fn record(&mut self, entry: CopyLogEntry) {
        match entry.outcome {
            CopyOutcome::Copied => self.copied += 1,
            CopyOutcome::Skipped => self.skipped += 1,
            CopyOutcome::Failed => self.failed += 1,
        }
        self.entries.push(entry);
    }
}

impl Copier {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Copy every pair whose target does not exist yet, in order.
    ///
    /// Existing targets are skipped and never modified.
    /// A failed copy is recorded and the remaining pairs are still processed.
    #[must_use]
    pub fn copy_all(&self, pairs: &[MatchPair]) -> CopyReport {
        let mut report = CopyReport::default();
        for pair in pairs {
            report.record(self.copy_one(pair));
        }
        report
    }

    /// Copy a single pair if its target is absent.
    ///
    /// The target is created exclusively, so a file that appears after the
    /// existence check is still never overwritten and counts as skipped.
    #[must_use]
    pub fn copy_one(&self, pair: &MatchPair) -> CopyLogEntry {
        if pair.target.exists() {
            return CopyLogEntry::new(CopyOutcome::Skipped, pair, None);
        }
        match copy_file_with_metadata(&pair.source, &pair.target) {
            Ok(()) => CopyLogEntry::new(CopyOutcome::Copied, pair, None),
            Err(error) if error.kind() == io::ErrorKind::AlreadyExists => {
                CopyLogEntry::new(CopyOutcome::Skipped, pair, None)
            }
            Err(error) => CopyLogEntry::new(CopyOutcome::Failed, pair, Some(error.to_string())),
        }
    }
}

/// Copy file contents, permissions, and access and modification times.
///
/// Fails with [`io::ErrorKind::AlreadyExists`] if anything already occupies `target`.
fn copy_file_with_metadata(source: &Path, target: &Path) -> io::Result<()> {
    use filetime::{FileTime, set_file_times};

    let mut reader = File::open(source)?;
    let metadata = reader.metadata()?;
    {
        let mut writer = OpenOptions::new().write(true).create_new(true).open(target)?;
        io::copy(&mut reader, &mut writer)?;
        writer.set_permissions(metadata.permissions())?;
    }
    set_file_times(
        target,
        FileTime::from_last_access_time(&metadata),
        FileTime::from_last_modification_time(&metadata),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        _temp_dir: TempDir,
        source: PathBuf,
        target: PathBuf,
    }

    fn fixture() -> Fixture {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let source = temp_dir.path().join("source");
        let target = temp_dir.path().join("target");
        fs::create_dir_all(&source).unwrap();
        fs::create_dir_all(&target).unwrap();
        Fixture {
            _temp_dir: temp_dir,
            source,
            target,
        }
    }

    fn pair(fixture: &Fixture, name: &str, content: &str) -> MatchPair {
        let source = fixture.source.join(name);
        fs::write(&source, content).unwrap();
        MatchPair::new(source, fixture.target.join(name))
    }

    #[test]
    fn test_copy_all_copies_missing_target() {
        let fixture = fixture();
        let pairs = vec![pair(&fixture, "report.txt", "hello")];

        let report = Copier::new().copy_all(&pairs);

        assert_eq!(report.copied, 1);
        assert_eq!(report.skipped, 0);
        assert_eq!(report.failed, 0);
        assert_eq!(fs::read_to_string(&pairs[0].target).unwrap(), "hello");
        assert_eq!(report.entries[0].outcome, CopyOutcome::Copied);
        assert_eq!(report.entries[0].source_name, "report.txt");
        assert_eq!(report.entries[0].target_dir, fixture.target);
    }

    #[test]
    fn test_copy_all_skips_existing_target() {
        let fixture = fixture();
        let pairs = vec![pair(&fixture, "report.txt", "new")];
        fs::write(&pairs[0].target, "old").unwrap();

        let report = Copier::new().copy_all(&pairs);

        assert_eq!(report.copied, 0);
        assert_eq!(report.skipped, 1);
        assert_eq!(fs::read_to_string(&pairs[0].target).unwrap(), "old");
        assert_eq!(report.entries[0].outcome, CopyOutcome::Skipped);
    }

    #[test]
    fn test_copy_all_second_run_only_skips() {
        let fixture = fixture();
        let pairs = vec![pair(&fixture, "a.srt", "a"), pair(&fixture, "b.srt", "b")];
        let copier = Copier::new();

        let first = copier.copy_all(&pairs);
        let second = copier.copy_all(&pairs);

        assert_eq!(first.copied, 2);
        assert_eq!(second.copied, 0);
        assert_eq!(second.skipped, pairs.len());
    }

    #[test]
    fn test_copy_all_continues_after_failure() {
        let fixture = fixture();
        let missing = MatchPair::new(fixture.source.join("gone.txt"), fixture.target.join("gone.txt"));
        let present = pair(&fixture, "here.txt", "content");
        let pairs = vec![missing, present];

        let report = Copier::new().copy_all(&pairs);

        assert_eq!(report.failed, 1);
        assert_eq!(report.copied, 1);
        assert_eq!(report.skipped, 0);
        assert_eq!(report.entries[0].outcome, CopyOutcome::Failed);
        assert!(report.entries[0].error.is_some());
        assert_eq!(report.entries[1].outcome, CopyOutcome::Copied);
    }

    #[test]
    fn test_copy_all_fails_when_target_dir_missing() {
        let fixture = fixture();
        let source = fixture.source.join("orphan.txt");
        fs::write(&source, "x").unwrap();
        let pairs = vec![MatchPair::new(source, fixture.target.join("missing").join("orphan.txt"))];

        let report = Copier::new().copy_all(&pairs);

        assert_eq!(report.failed, 1);
        assert_eq!(report.copied + report.skipped, 0);
    }

    #[test]
    fn test_copy_preserves_modification_time() {
        use filetime::{FileTime, set_file_times};

        let fixture = fixture();
        let pairs = vec![pair(&fixture, "dated.txt", "meta")];
        set_file_times(
            &pairs[0].source,
            FileTime::from_unix_time(1_700_000_010, 0),
            FileTime::from_unix_time(1_700_000_020, 0),
        )
        .unwrap();

        let report = Copier::new().copy_all(&pairs);
        assert_eq!(report.copied, 1);

        let source_meta = fs::metadata(&pairs[0].source).unwrap();
        let target_meta = fs::metadata(&pairs[0].target).unwrap();
        assert_eq!(
            FileTime::from_last_modification_time(&source_meta),
            FileTime::from_last_modification_time(&target_meta)
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_copy_never_writes_through_dangling_target_link() {
        use std::os::unix::fs::symlink;

        let fixture = fixture();
        let pairs = vec![pair(&fixture, "link.txt", "content")];
        let elsewhere = fixture.source.parent().unwrap().join("elsewhere.txt");
        symlink(&elsewhere, &pairs[0].target).unwrap();
        assert!(!pairs[0].target.exists());

        let report = Copier::new().copy_all(&pairs);

        assert_eq!(report.skipped, 1);
        assert_eq!(report.copied + report.failed, 0);
        assert!(!elsewhere.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_copy_preserves_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let fixture = fixture();
        let pairs = vec![pair(&fixture, "readonly.txt", "locked")];
        fs::set_permissions(&pairs[0].source, fs::Permissions::from_mode(0o444)).unwrap();

        let report = Copier::new().copy_all(&pairs);

        assert_eq!(report.copied, 1);
        let mode = fs::metadata(&pairs[0].target).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o444);
        assert_eq!(fs::read_to_string(&pairs[0].target).unwrap(), "locked");
    }

    #[test]
    fn test_log_entry_display() {
        let copied = CopyLogEntry {
            outcome: CopyOutcome::Copied,
            source_name: "a.txt".to_string(),
            target_dir: PathBuf::from("/t"),
            error: None,
        };
        let skipped = CopyLogEntry {
            outcome: CopyOutcome::Skipped,
            ..copied.clone()
        };
        let failed = CopyLogEntry {
            outcome: CopyOutcome::Failed,
            error: Some("disk full".to_string()),
            ..copied.clone()
        };

        assert_eq!(copied.to_string(), "Copied: a.txt -> /t");
        assert_eq!(skipped.to_string(), "Skipped: a.txt already exists in /t");
        assert_eq!(failed.to_string(), "Failed: a.txt -> /t, error: disk full");
    }
}
