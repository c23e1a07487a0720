use std::path::PathBuf;
use std::sync::LazyLock;

const PROJECT_NAME: &str = env!("CARGO_PKG_NAME");

/// Path to the user config file: `$HOME/.config/sidecar-copy.toml`
///
/// Returns `None` if the home directory cannot be determined.
pub static CONFIG_PATH: LazyLock<Option<PathBuf>> = LazyLock::new(|| {
    let home_dir = dirs::home_dir()?;
    Some(home_dir.join(".config").join(format!("{PROJECT_NAME}.toml")))
});

/// Path to the default copy log: `$HOME/logs/sidecar-copy/copy_log.txt`
///
/// Returns `None` if the home directory cannot be determined.
pub static LOG_PATH: LazyLock<Option<PathBuf>> = LazyLock::new(|| {
    let home_dir = dirs::home_dir()?;
    Some(home_dir.join("logs").join(PROJECT_NAME).join("copy_log.txt"))
});

/// Name of the section holding this tool's keys in the user config file.
pub const CONFIG_SECTION: &str = "sidecar_copy";
