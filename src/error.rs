use std::fmt;
use std::path::PathBuf;

/// Errors that abort a run or a settings store operation.
///
/// Failures copying a single file are not errors at this level,
/// they are recorded as failed entries in the copy report.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid settings: {0}")]
    ConfigInvalid(InvalidSetting),

    #[error("failed to read directory {path}: {source}")]
    Traversal {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write copy log {path}: {source}")]
    LogStore {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read settings file {path}: {source}")]
    SettingsRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings file {path}: {message}")]
    SettingsParse { path: PathBuf, message: String },

    #[error("failed to write settings file {path}: {source}")]
    SettingsWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The reason a settings record was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidSetting {
    SourceDir,
    TargetDir,
    EmptyExtension,
}

impl Error {
    pub(crate) fn traversal(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Traversal {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn walk(root: impl Into<PathBuf>, error: walkdir::Error) -> Self {
        let path = error.path().map_or_else(|| root.into(), std::path::Path::to_path_buf);
        let source = error
            .into_io_error()
            .unwrap_or_else(|| std::io::Error::other("filesystem loop detected"));
        Self::Traversal { path, source }
    }
}

impl InvalidSetting {
    /// Human-readable reason shown to the user.
    #[must_use]
    pub const fn reason(self) -> &'static str {
        match self {
            Self::SourceDir => "source directory is invalid",
            Self::TargetDir => "target directory is invalid",
            Self::EmptyExtension => "file extension must not be empty",
        }
    }
}

impl fmt::Display for InvalidSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason())
    }
}

impl From<InvalidSetting> for Error {
    fn from(value: InvalidSetting) -> Self {
        Self::ConfigInvalid(value)
    }
}
