//! Configuration validation.
//!
//! Checks numeric ranges and collects every problem into a single
//! `ConfigError` so users see all of them at once.

mod helpers;


use crate::schema::ArkwinConfig;
use arkwin_common::ConfigError;

use helpers::validate_range;

/// Smallest scratch buffer that still fits a callback header plus arguments.
pub const MIN_SCRATCH_CAPACITY: usize = 256;
/// Largest scratch buffer the dispatcher will allocate.
pub const MAX_SCRATCH_CAPACITY: usize = 1024 * 1024;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &ArkwinConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_range(
        &mut errors,
        "dispatch.scratch_capacity",
        config.dispatch.scratch_capacity,
        MIN_SCRATCH_CAPACITY,
        MAX_SCRATCH_CAPACITY,
    );

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
