//! Configuration schema types for Arkwin.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod dispatch;
mod logging;
mod resources;

pub use dispatch::*;
pub use logging::*;
pub use resources::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ArkwinConfig {
    pub dispatch: DispatchConfig,
    pub resources: ResourcesConfig,
    pub logging: LoggingConfig,
}
