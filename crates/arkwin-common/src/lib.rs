pub mod errors;
pub mod id;

pub use errors::{ArkwinError, CallbackError, ConfigError, DispatchError, WireError};
pub use id::{NativePtr, ResourceId};

pub type Result<T> = std::result::Result<T, ArkwinError>;
