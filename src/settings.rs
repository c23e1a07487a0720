//! Settings record and the TOML file that persists it.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use toml_edit::{DocumentMut, Item, Table, value};

use crate::config::CONFIG_SECTION;
use crate::error::{Error, InvalidSetting};

/// The three values a run needs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// Directory holding the files to copy.
    #[serde(default)]
    pub source_dir: PathBuf,
    /// Root of the tree the files are copied into.
    #[serde(default)]
    pub target_dir: PathBuf,
    /// Literal file name suffix selecting source files, for example `.srt`.
    #[serde(default)]
    pub file_extension: String,
}

/// Persistent key/value store for [`Settings`].
///
/// The values live in the `[sidecar_copy]` section of a TOML file.
/// Other sections in the same file are left untouched when saving.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

/// Wrapper needed for parsing the config file section.
#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    sidecar_copy: Settings,
}

impl Settings {
    #[must_use]
    pub fn new(source_dir: impl Into<PathBuf>, target_dir: impl Into<PathBuf>, file_extension: impl Into<String>) -> Self {
        Self {
            source_dir: source_dir.into(),
            target_dir: target_dir.into(),
            file_extension: file_extension.into(),
        }
    }

    /// Check that both directories exist and the extension is not empty.
    ///
    /// # Errors
    /// Returns the first invalid setting found.
    pub fn validate(&self) -> Result<(), InvalidSetting> {
        if !is_existing_dir(&self.source_dir) {
            return Err(InvalidSetting::SourceDir);
        }
        if !is_existing_dir(&self.target_dir) {
            return Err(InvalidSetting::TargetDir);
        }
        if self.file_extension.is_empty() {
            return Err(InvalidSetting::EmptyExtension);
        }
        Ok(())
    }

    /// Validation result as an `(ok, reason)` pair for display.
    #[must_use]
    pub fn check(&self) -> (bool, String) {
        match self.validate() {
            Ok(()) => (true, "settings are valid".to_string()),
            Err(invalid) => (false, invalid.reason().to_string()),
        }
    }

    /// Parse settings from a TOML string.
    ///
    /// # Errors
    /// Returns an error if the TOML string is invalid.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<SettingsFile>(toml_str).map(|file| file.sidecar_copy)
    }
}

fn is_existing_dir(path: &Path) -> bool {
    !path.as_os_str().is_empty() && path.is_dir()
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default user config path.
    ///
    /// Returns `None` if the home directory cannot be determined.
    #[must_use]
    pub fn user_default() -> Option<Self> {
        crate::config::CONFIG_PATH.as_deref().map(Self::new)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the settings, creating the file with empty values if it does not exist yet.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed, or created.
    pub fn load(&self) -> Result<Settings, Error> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Settings::from_toml_str(&content).map_err(|e| Error::SettingsParse {
                path: self.path.clone(),
                message: e.to_string(),
            }),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                let settings = Settings::default();
                self.save(&settings)?;
                Ok(settings)
            }
            Err(source) => Err(Error::SettingsRead {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Write all three values.
    ///
    /// # Errors
    /// Returns an error if the existing file is not valid TOML or cannot be written.
    pub fn save(&self, settings: &Settings) -> Result<(), Error> {
        self.update(
            Some(&settings.source_dir),
            Some(&settings.target_dir),
            Some(&settings.file_extension),
        )
    }

    /// Write only the given values, keeping the others as they are.
    ///
    /// Missing keys are written as empty strings.
    ///
    /// # Errors
    /// Returns an error if the existing file is not valid TOML or cannot be written.
    pub fn update(&self, source_dir: Option<&Path>, target_dir: Option<&Path>, file_extension: Option<&str>) -> Result<(), Error> {
        let mut document = self.read_document()?;

        if !document.contains_table(CONFIG_SECTION) {
            document.insert(CONFIG_SECTION, Item::Table(Table::new()));
        }
        let section = document[CONFIG_SECTION]
            .as_table_mut()
            .ok_or_else(|| Error::SettingsParse {
                path: self.path.clone(),
                message: format!("`{CONFIG_SECTION}` is not a table"),
            })?;

        let fields = [
            ("source_dir", source_dir.map(crate::path_to_string)),
            ("target_dir", target_dir.map(crate::path_to_string)),
            ("file_extension", file_extension.map(str::to_string)),
        ];
        for (key, new_value) in fields {
            match new_value {
                Some(new_value) => {
                    section.insert(key, value(new_value));
                }
                None if !section.contains_key(key) => {
                    section.insert(key, value(""));
                }
                None => {}
            }
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| Error::SettingsWrite {
                path: self.path.clone(),
                source,
            })?;
        }
        fs::write(&self.path, document.to_string()).map_err(|source| Error::SettingsWrite {
            path: self.path.clone(),
            source,
        })
    }

    fn read_document(&self) -> Result<DocumentMut, Error> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(source) => {
                return Err(Error::SettingsRead {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        content.parse::<DocumentMut>().map_err(|e| Error::SettingsParse {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }
}
