use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use sidecar_copy::{Settings, SettingsStore};

use crate::Args;

/// Final config combined from CLI arguments and the settings file.
#[derive(Debug)]
pub struct Config {
    pub(crate) settings: Settings,
    pub(crate) settings_path: PathBuf,
    pub(crate) debug: bool,
    pub(crate) dryrun: bool,
    pub(crate) log_file: Option<PathBuf>,
    pub(crate) save: bool,
    pub(crate) show: bool,
    pub(crate) verbose: bool,
}

/// Options from the user config file besides the stored settings.
#[derive(Debug, Default, Deserialize)]
struct CopyConfig {
    #[serde(default)]
    dryrun: bool,
    #[serde(default)]
    log_file: Option<PathBuf>,
    #[serde(default)]
    verbose: bool,
}

/// Wrapper needed for parsing the config file section.
#[derive(Debug, Default, Deserialize)]
struct UserConfig {
    #[serde(default)]
    sidecar_copy: CopyConfig,
}

impl CopyConfig {
    /// Read options from the settings file.
    /// The file is created by the settings store before this is called.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    fn get_user_config(path: &Path) -> anyhow::Result<Self> {
        match fs::read_to_string(path) {
            Ok(content) => Self::from_toml_str(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse config file {}:\n{e}", path.display())),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(error) => Err(anyhow::anyhow!(
                "Failed to read config file {}: {error}",
                path.display()
            )),
        }
    }

    /// Parse config from a TOML string.
    ///
    /// # Errors
    /// Returns an error if the TOML string is invalid.
    fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        toml::from_str::<UserConfig>(toml_str)
            .map(|config| config.sidecar_copy)
            .context("Failed to parse sidecar_copy config TOML")
    }
}

impl Config {
    /// Create config from given command line args and the settings file.
    ///
    /// Values given on the command line replace the stored ones for this run.
    ///
    /// # Errors
    /// Returns an error if the settings file cannot be located, read, or parsed.
    pub fn from_args(args: Args) -> anyhow::Result<Self> {
        let store = args
            .config
            .map(SettingsStore::new)
            .or_else(SettingsStore::user_default)
            .context("Failed to determine settings file path")?;

        let stored = store.load()?;
        let user_config = CopyConfig::get_user_config(store.path())?;
        let settings = merge_settings(stored, args.source, args.target, args.extension);

        let log_file = if args.no_log {
            None
        } else {
            args.log
                .or(user_config.log_file)
                .or_else(|| sidecar_copy::config::LOG_PATH.clone())
        };

        Ok(Self {
            settings,
            settings_path: store.path().to_path_buf(),
            debug: args.debug,
            dryrun: args.print || user_config.dryrun,
            log_file,
            save: args.save,
            show: args.show,
            verbose: args.verbose || user_config.verbose,
        })
    }

    pub(crate) fn store(&self) -> SettingsStore {
        SettingsStore::new(&self.settings_path)
    }
}

/// Override stored settings with the non-empty command line values.
fn merge_settings(
    stored: Settings,
    source: Option<PathBuf>,
    target: Option<PathBuf>,
    extension: Option<String>,
) -> Settings {
    let directory = |path: Option<PathBuf>, fallback: PathBuf| {
        path.filter(|p| !p.as_os_str().is_empty())
            .map_or(fallback, |p| sidecar_copy::resolve_directory(&p))
    };
    Settings {
        source_dir: directory(source, stored.source_dir),
        target_dir: directory(target, stored.target_dir),
        file_extension: extension
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())
            .unwrap_or(stored.file_extension),
    }
}
