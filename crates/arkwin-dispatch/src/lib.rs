//! Boundary event dispatch.
//!
//! The native display service queues events for the managed side; the host
//! calls [`Dispatcher::drain`] to pull them out one at a time through a
//! reused scratch buffer and route each one:
//! - **CallCallback**: decode a callback header and arguments, then invoke
//!   the managed callback registered under that resource id
//! - **HoldResource** / **ReleaseResource**: adjust the hold count of a
//!   managed resource the native side references
//!
//! Any error aborts the pass and is returned to the caller.

pub mod callbacks;
pub mod dispatcher;
pub mod event;
pub mod handles;
pub mod resources;
pub mod scratch;
pub mod source;
pub mod state;

pub use callbacks::{
    CallbackArgs, CallbackHeader, CallbackInvoker, CallbackKind, CallbackRegistry, ManagedCallback,
};
pub use dispatcher::{Dispatcher, DrainReport};
pub use event::{BoundaryEvent, EventKind};
pub use handles::{DisplayKey, DisplayRef, HandleTable};
pub use resources::{ResourceHolder, ResourceTable};
pub use scratch::ScratchBuffer;
pub use source::{EventSource, QueuedEventSource};
pub use state::DispatchState;
