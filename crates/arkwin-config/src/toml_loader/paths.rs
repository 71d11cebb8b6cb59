//! Where the config file lives, and writing the first-run template.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use arkwin_common::ConfigError;
use tracing::info;

use super::template::default_config_toml;

const APP_DIR: &str = "arkwin";
const FILE_NAME: &str = "config.toml";

/// `<platform config dir>/arkwin/config.toml`.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR).join(FILE_NAME))
        .ok_or_else(|| ConfigError::ParseError("could not determine config directory".into()))
}

/// Write the documented template to `path`, creating parent directories.
///
/// Never overwrites: an existing file at `path` is an error.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    let io_err = |what: &str, at: &Path, e: std::io::Error| {
        ConfigError::ParseError(format!("failed to {what} {}: {e}", at.display()))
    };

    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| io_err("create config directory", dir, e))?;
    }

    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| io_err("create default config", path, e))?;
    file.write_all(default_config_toml().as_bytes())
        .map_err(|e| io_err("write default config", path, e))?;

    info!(path = %path.display(), "default config created");
    Ok(())
}
