//! Resource table settings.

use serde::{Deserialize, Serialize};

/// What a hold or release does when it names an untracked resource id.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnknownResourcePolicy {
    /// Abort the drain pass with an error.
    #[default]
    Fail,
    /// Log a warning and keep draining.
    Warn,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ResourcesConfig {
    pub unknown_id: UnknownResourcePolicy,
}
