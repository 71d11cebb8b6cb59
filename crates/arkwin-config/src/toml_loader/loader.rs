//! Reading a config file into [`ArkwinConfig`].

use std::path::Path;

use arkwin_common::ConfigError;
use tracing::{info, warn};

use super::paths::{create_default_config, default_config_path};
use crate::schema::ArkwinConfig;
use crate::validation;

/// Parse the TOML file at `path`; absent keys take their defaults.
///
/// Out-of-range values are only warned about here and the config is
/// returned as parsed. [`crate::load_config_from`] rejects them.
pub fn load_from_path(path: &Path) -> Result<ArkwinConfig, ConfigError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ParseError(format!("failed to read {}: {e}", path.display())))?;
    let config = parse(&text)?;

    if let Err(e) = validation::validate(&config) {
        warn!(path = %path.display(), error = %e, "config has out-of-range values");
    }
    info!(path = %path.display(), "config loaded");
    Ok(config)
}

/// Load `<config dir>/arkwin/config.toml`, writing the documented template
/// and returning defaults if it does not exist yet.
pub fn load_default() -> Result<ArkwinConfig, ConfigError> {
    let path = default_config_path()?;
    if path.exists() {
        return load_from_path(&path);
    }
    create_default_config(&path)?;
    Ok(ArkwinConfig::default())
}

fn parse(text: &str) -> Result<ArkwinConfig, ConfigError> {
    toml::from_str(text).map_err(|e| ConfigError::ParseError(format!("invalid TOML: {e}")))
}
