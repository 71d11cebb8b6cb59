//! Managed callbacks invoked by `CallCallback` events.
//!
//! A callback event body is a [`CallbackHeader`] followed by arguments whose
//! shape is fixed by the header's [`CallbackKind`]. Callbacks themselves are
//! ordinary resources in the [`ResourceTable`](crate::ResourceTable), so the
//! native side keeps them alive with the same hold/release events it uses
//! for every other managed object.

mod args;
mod kind;
mod registry;


pub use args::CallbackArgs;
pub use kind::CallbackKind;
pub use registry::CallbackRegistry;

use arkwin_common::{CallbackError, DispatchError, NativePtr, ResourceId};
use arkwin_wire::WireDecoder;

/// Signature of a managed callback body.
pub type CallbackFn = dyn Fn(CallbackArgs) -> Result<(), CallbackError> + Send + Sync;

/// Invokes the managed callback described by a `CallCallback` event.
pub trait CallbackInvoker: Send + Sync {
    /// `decoder` is positioned just past the event-kind tag. The
    /// implementation reads the callback id and arguments, then performs
    /// the call; errors from the callback are returned unchanged.
    fn invoke(&self, decoder: &mut WireDecoder<'_>) -> Result<(), DispatchError>;
}

/// Fixed prefix of every callback event body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallbackHeader {
    pub kind: CallbackKind,
    pub resource: ResourceId,
    /// Native trampoline for asynchronous calls. Carried but unused here.
    pub call: NativePtr,
    /// Native trampoline for synchronous calls. Carried but unused here.
    pub call_sync: NativePtr,
}

impl CallbackHeader {
    pub fn decode(decoder: &mut WireDecoder<'_>) -> Result<Self, DispatchError> {
        let kind = CallbackKind::try_from(decoder.read_i32()?)?;
        let resource = ResourceId(decoder.read_i32()?);
        let call = decoder.read_pointer()?;
        let call_sync = decoder.read_pointer()?;
        Ok(Self {
            kind,
            resource,
            call,
            call_sync,
        })
    }
}

/// A registered callback together with the argument shape it accepts.
pub struct ManagedCallback {
    kind: CallbackKind,
    func: Box<CallbackFn>,
}

impl ManagedCallback {
    pub fn new<F>(kind: CallbackKind, func: F) -> Self
    where
        F: Fn(CallbackArgs) -> Result<(), CallbackError> + Send + Sync + 'static,
    {
        Self {
            kind,
            func: Box::new(func),
        }
    }

    pub fn kind(&self) -> CallbackKind {
        self.kind
    }

    pub fn call(&self, args: CallbackArgs) -> Result<(), CallbackError> {
        (self.func)(args)
    }
}

impl std::fmt::Debug for ManagedCallback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManagedCallback")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}
