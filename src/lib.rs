pub mod config;
pub mod copier;
pub mod error;
pub mod index;
pub mod log_store;
pub mod matcher;
pub mod run;
pub mod settings;

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Command;
use clap_complete::Shell;
use colored::Colorize;

pub use crate::copier::{CopyLogEntry, CopyOutcome, CopyReport, Copier};
pub use crate::error::{Error, InvalidSetting};
pub use crate::index::TargetIndex;
pub use crate::log_store::{FileLogStore, LogStore, MemoryLogStore};
pub use crate::matcher::{MatchPair, match_files};
pub use crate::run::{RunSummary, run_copy, validate};
pub use crate::settings::{Settings, SettingsStore};

/// Get the base name of a file: the file name with its final extension removed.
///
/// A name without an extension is its own base name,
/// and a leading dot does not start an extension.
/// The name is kept as raw `OsStr` so names that are not valid Unicode stay distinct.
///
/// ```rust
/// use std::ffi::OsStr;
/// use sidecar_copy::base_name;
///
/// assert_eq!(base_name(OsStr::new("report.pdf")), "report");
/// assert_eq!(base_name(OsStr::new("archive.tar.gz")), "archive.tar");
/// assert_eq!(base_name(OsStr::new("README")), "README");
/// assert_eq!(base_name(OsStr::new(".hidden")), ".hidden");
/// ```
#[must_use]
pub fn base_name(file_name: &OsStr) -> &OsStr {
    Path::new(file_name).file_stem().unwrap_or(file_name)
}

/// Resolve a user-given directory to an absolute path.
///
/// Relative paths are resolved against the current working directory.
/// Returns the path unchanged if it does not exist so validation can report it.
#[must_use]
pub fn resolve_directory(path: &Path) -> PathBuf {
    if path.as_os_str().is_empty() {
        return PathBuf::new();
    }
    match dunce::canonicalize(path) {
        // Canonicalize fails for network drives on Windows :(
        Ok(absolute) if path_to_string(&absolute).starts_with(r"\\?") && !path_to_string(path).starts_with(r"\\?") => {
            path.to_path_buf()
        }
        Ok(absolute) => absolute,
        Err(_) => path.to_path_buf(),
    }
}

/// Convert `OsStr` to String with invalid Unicode handling.
pub fn os_str_to_string(name: &OsStr) -> String {
    name.to_str().map_or_else(
        || name.to_string_lossy().replace('\u{FFFD}', ""),
        std::string::ToString::to_string,
    )
}

/// Convert given path to string with invalid Unicode handling.
pub fn path_to_string(path: &Path) -> String {
    path.to_str().map_or_else(
        || path.to_string_lossy().to_string().replace('\u{FFFD}', ""),
        std::string::ToString::to_string,
    )
}

/// Convert given path to filename string with invalid Unicode handling.
#[must_use]
pub fn path_to_filename_string(path: &Path) -> String {
    os_str_to_string(path.file_name().unwrap_or_default())
}

#[inline]
pub fn print_error(message: &str) {
    eprintln!("{}", format!("Error: {message}").red());
}

#[macro_export]
macro_rules! print_error {
    ($($arg:tt)*) => {
        $crate::print_error(&format!($($arg)*))
    };
}

#[inline]
pub fn print_warning(message: &str) {
    eprintln!("{}", message.yellow());
}

#[macro_export]
macro_rules! print_warning {
    ($($arg:tt)*) => {
        $crate::print_warning(&format!($($arg)*))
    };
}

#[inline]
pub fn print_bold(message: &str) {
    println!("{}", message.bold());
}

#[macro_export]
macro_rules! print_bold {
    ($($arg:tt)*) => {
        $crate::print_bold(&format!($($arg)*))
    };
}

/// Generate a shell completion script for the given shell.
pub fn generate_shell_completion(shell: Shell, mut command: Command, install: bool, command_name: &str) -> Result<()> {
    if install {
        let out_dir = get_shell_completion_dir(shell, command_name)?;
        let path = clap_complete::generate_to(shell, &mut command, command_name, out_dir)?;
        println!("Completion file generated to: {}", path.display());
    } else {
        clap_complete::generate(shell, &mut command, command_name, &mut std::io::stdout());
    }
    Ok(())
}

/// Determine the appropriate directory for storing shell completions.
///
/// First checks if the user-specific directory exists,
/// then checks for the global directory.
/// If neither exist, creates and uses the user-specific dir.
fn get_shell_completion_dir(shell: Shell, name: &str) -> Result<PathBuf> {
    let home = dirs::home_dir().context("Failed to get home directory")?;

    // Special handling for oh-my-zsh.
    // Create custom "plugin", which will then have to be loaded in .zshrc
    if shell == Shell::Zsh {
        let omz_plugins = home.join(".oh-my-zsh/custom/plugins");
        if omz_plugins.exists() {
            let plugin_dir = omz_plugins.join(name);
            std::fs::create_dir_all(&plugin_dir)?;
            return Ok(plugin_dir);
        }
    }

    let user_dir = match shell {
        Shell::PowerShell => {
            if cfg!(windows) {
                home.join(r"Documents\PowerShell\completions")
            } else {
                home.join(".config/powershell/completions")
            }
        }
        Shell::Bash => home.join(".bash_completion.d"),
        Shell::Elvish => home.join(".elvish"),
        Shell::Fish => home.join(".config/fish/completions"),
        Shell::Zsh => home.join(".zsh/completions"),
        _ => anyhow::bail!("Unsupported shell"),
    };

    if user_dir.exists() {
        return Ok(user_dir);
    }

    let global_dir = match shell {
        Shell::Bash => PathBuf::from("/etc/bash_completion.d"),
        Shell::Fish => PathBuf::from("/usr/share/fish/completions"),
        Shell::Zsh => PathBuf::from("/usr/share/zsh/site-functions"),
        _ => user_dir.clone(),
    };

    if global_dir.exists() {
        return Ok(global_dir);
    }

    std::fs::create_dir_all(&user_dir)?;
    Ok(user_dir)
}
