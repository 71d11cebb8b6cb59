//! Event dispatcher settings.

use serde::{Deserialize, Serialize};

/// Scratch buffer size used when nothing else is configured.
pub const DEFAULT_SCRATCH_CAPACITY: usize = 4096;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Size of the reused event buffer in bytes (valid range: 256-1048576).
    pub scratch_capacity: usize,
    /// Stop a drain pass after this many events; 0 means no limit.
    pub max_events_per_drain: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            scratch_capacity: DEFAULT_SCRATCH_CAPACITY,
            max_events_per_drain: 0,
        }
    }
}
