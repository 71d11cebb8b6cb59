//! Arkwin configuration.
//!
//! TOML-based settings for the boundary dispatcher: scratch buffer size,
//! per-pass event limits, unknown resource handling and log level. Every
//! section has defaults, so an empty file is a valid config.
//!
//! ```rust,no_run
//! use arkwin_config::{load_config, config_to_json};
//!
//! let config = load_config().expect("failed to load config");
//! println!("{}", config_to_json(&config));
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{
    ArkwinConfig, DispatchConfig, LogLevel, LoggingConfig, ResourcesConfig,
    UnknownResourcePolicy, CONFIG_SCHEMA_VERSION,
};

use std::path::Path;

use arkwin_common::ConfigError;

/// Load config from the platform default path and validate it.
///
/// Creates a documented default file on first run.
pub fn load_config() -> Result<ArkwinConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Load config from an explicit path when given, the default path otherwise.
pub fn load_config_from(path: Option<&Path>) -> Result<ArkwinConfig, ConfigError> {
    match path {
        Some(path) => {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path.to_path_buf()));
            }
            let config = toml_loader::load_from_path(path)?;
            validation::validate(&config)?;
            Ok(config)
        }
        None => load_config(),
    }
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &ArkwinConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
