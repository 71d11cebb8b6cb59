use std::sync::Arc;

use arkwin_common::{CallbackError, DispatchError, ResourceId};
use arkwin_wire::WireDecoder;
use tracing::{debug, trace};

use crate::handles::HandleTable;
use crate::resources::ResourceTable;

use super::{CallbackArgs, CallbackHeader, CallbackInvoker, CallbackKind, ManagedCallback};

/// Registers managed callbacks as resources and invokes them on demand.
///
/// Lookups clone the callback out of the table before calling it, so a
/// running callback may register, hold or release resources, including
/// itself.
#[derive(Clone)]
pub struct CallbackRegistry {
    resources: Arc<ResourceTable>,
    handles: Arc<HandleTable>,
}

impl CallbackRegistry {
    pub fn new(resources: Arc<ResourceTable>, handles: Arc<HandleTable>) -> Self {
        Self { resources, handles }
    }

    pub fn resources(&self) -> &Arc<ResourceTable> {
        &self.resources
    }

    pub fn handles(&self) -> &Arc<HandleTable> {
        &self.handles
    }

    /// Register a callback with one hold and return its id.
    pub fn register<F>(&self, kind: CallbackKind, func: F) -> ResourceId
    where
        F: Fn(CallbackArgs) -> Result<(), CallbackError> + Send + Sync + 'static,
    {
        let id = self
            .resources
            .register(Arc::new(ManagedCallback::new(kind, func)));
        debug!(%id, %kind, "callback registered");
        id
    }

    /// Register a callback under a caller-chosen id.
    pub fn register_with_id<F>(
        &self,
        id: ResourceId,
        kind: CallbackKind,
        func: F,
    ) -> Result<(), DispatchError>
    where
        F: Fn(CallbackArgs) -> Result<(), CallbackError> + Send + Sync + 'static,
    {
        self.resources
            .register_with_id(id, Arc::new(ManagedCallback::new(kind, func)))?;
        debug!(%id, %kind, "callback registered with fixed id");
        Ok(())
    }

    /// Find the callback stored under `id`.
    pub fn lookup(&self, id: ResourceId) -> Result<Arc<ManagedCallback>, DispatchError> {
        let resource = self
            .resources
            .get(id)
            .ok_or(DispatchError::UnknownResourceId(id))?;
        resource
            .downcast::<ManagedCallback>()
            .map_err(|_| DispatchError::NotACallback(id))
    }
}

impl CallbackInvoker for CallbackRegistry {
    fn invoke(&self, decoder: &mut WireDecoder<'_>) -> Result<(), DispatchError> {
        let header = CallbackHeader::decode(decoder)?;
        trace!(
            id = %header.resource,
            kind = %header.kind,
            call = %header.call,
            call_sync = %header.call_sync,
            "callback header decoded"
        );
        let callback = self.lookup(header.resource)?;
        if callback.kind() != header.kind {
            return Err(DispatchError::CallbackKindMismatch {
                id: header.resource,
                registered: callback.kind().name(),
                received: header.kind.name(),
            });
        }

        // Arguments are decoded only once the target is known, so a bad id
        // never wraps a display handle.
        let args = CallbackArgs::decode(header.kind, decoder, &self.handles)?;
        let delivered = args.display();

        debug!(id = %header.resource, kind = %header.kind, "invoking callback");
        let result = callback.call(args);
        if let Some(display) = delivered {
            self.handles.sweep(display.key);
        }
        result?;
        Ok(())
    }
}
