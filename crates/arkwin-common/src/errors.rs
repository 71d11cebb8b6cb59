use std::path::PathBuf;

use crate::id::ResourceId;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Failures while reading positional values out of a boundary buffer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WireError {
    #[error("buffer underrun at offset {offset}: need {needed} bytes, {remaining} remaining")]
    BufferUnderrun {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    #[error("negative element count {0}")]
    NegativeCount(i32),

    #[error("element count {count} needs at least {min_bytes} bytes, {remaining} remaining")]
    CountExceedsBuffer {
        count: usize,
        min_bytes: usize,
        remaining: usize,
    },

    #[error("unexpected runtime tag {0}")]
    UnexpectedTag(i8),

    #[error("invalid {name} value {value}")]
    InvalidEnum { name: &'static str, value: i32 },

    #[error("invalid boolean byte {0}")]
    InvalidBool(u8),

    #[error("string field is not valid utf-8")]
    InvalidUtf8,

    #[error("null native handle")]
    NullHandle,
}

/// An error raised from inside a managed callback.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("callback failed: {message}")]
pub struct CallbackError {
    pub message: String,
}

impl CallbackError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Anything that aborts a drain pass.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error(transparent)]
    Decode(#[from] WireError),

    #[error("unknown event kind {0}")]
    UnknownEventKind(i32),

    #[error("unknown resource id {0}")]
    UnknownResourceId(ResourceId),

    #[error("hold count of resource {0} would overflow")]
    HoldOverflow(ResourceId),

    #[error("resource id {0} is already registered")]
    DuplicateResourceId(ResourceId),

    #[error("unknown callback kind {0}")]
    UnknownCallbackKind(i32),

    #[error("resource {0} is not a callback")]
    NotACallback(ResourceId),

    #[error("callback {id} registered as {registered}, event carries {received}")]
    CallbackKindMismatch {
        id: ResourceId,
        registered: &'static str,
        received: &'static str,
    },

    #[error("native poll wrote {written} bytes into a {capacity}-byte scratch buffer")]
    PollOverflow { written: usize, capacity: usize },

    #[error(transparent)]
    Callback(#[from] CallbackError),
}

#[derive(Debug, thiserror::Error)]
pub enum ArkwinError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Wire(#[from] WireError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("capture error: {0}")]
    Capture(String),

    #[error("{0}")]
    Other(String),
}
