//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Arkwin Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[dispatch]
# scratch_capacity = 4096      # 256-1048576 bytes, one event must fit
# max_events_per_drain = 0     # 0 = drain until the native queue is empty

[resources]
# unknown_id = "fail"          # fail, warn

[logging]
# level = "info"               # trace, debug, info, warn, error
"##
    .to_string()
}
