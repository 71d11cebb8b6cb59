//! Arena of managed display objects keyed by native pointer.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use arkwin_common::{NativePtr, WireError};
use arkwin_wire::HandleFactory;
use serde::Serialize;
use slotmap::{new_key_type, SlotMap};
use tracing::{debug, trace};

new_key_type! {
    /// Generational key of a wrapped display handle.
    pub struct DisplayKey;
}

/// Managed-side reference to a native display object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DisplayRef {
    #[serde(skip_serializing)]
    pub key: DisplayKey,
    pub ptr: NativePtr,
}

struct Slot {
    ptr: NativePtr,
    pins: u32,
}

#[derive(Default)]
struct Inner {
    slots: SlotMap<DisplayKey, Slot>,
    by_ptr: HashMap<NativePtr, DisplayKey>,
}

impl Inner {
    fn remove(&mut self, key: DisplayKey) -> Option<NativePtr> {
        let slot = self.slots.remove(key)?;
        self.by_ptr.remove(&slot.ptr);
        Some(slot.ptr)
    }
}

/// Maps native pointers to [`DisplayRef`]s with explicit creation and disposal.
///
/// Wrapping the same pointer twice yields the same key while the entry
/// exists. An entry lives only for the callback that delivered it unless
/// someone [`pin`](Self::pin)s it; the last [`unpin`](Self::unpin) disposes
/// it. Keys of disposed entries never resolve again, even if the slot is
/// reused.
#[derive(Default)]
pub struct HandleTable {
    inner: Mutex<Inner>,
}

impl HandleTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, key: DisplayKey) -> Option<DisplayRef> {
        self.lock()
            .slots
            .get(key)
            .map(|slot| DisplayRef { key, ptr: slot.ptr })
    }

    /// Look up the handle currently wrapping `ptr`, if any.
    pub fn find(&self, ptr: NativePtr) -> Option<DisplayRef> {
        self.lock()
            .by_ptr
            .get(&ptr)
            .map(|&key| DisplayRef { key, ptr })
    }

    /// Keep an entry alive past the callback that delivered it. Returns the
    /// new pin count, or `None` if the key is gone.
    pub fn pin(&self, key: DisplayKey) -> Option<u32> {
        let mut inner = self.lock();
        let slot = inner.slots.get_mut(key)?;
        slot.pins = slot.pins.saturating_add(1);
        Some(slot.pins)
    }

    /// Drop one pin, disposing the entry when none remain. Returns the
    /// remaining count, or `None` if the key is gone.
    pub fn unpin(&self, key: DisplayKey) -> Option<u32> {
        let mut inner = self.lock();
        let slot = inner.slots.get_mut(key)?;
        slot.pins = slot.pins.saturating_sub(1);
        let pins = slot.pins;
        if pins == 0 {
            if let Some(ptr) = inner.remove(key) {
                debug!(%ptr, "display handle unpinned and disposed");
            }
        }
        Some(pins)
    }

    /// Dispose `key` unless it is pinned. Returns whether it was removed.
    pub fn sweep(&self, key: DisplayKey) -> bool {
        let mut inner = self.lock();
        let pinned = inner.slots.get(key).map(|slot| slot.pins > 0);
        if pinned != Some(false) {
            return false;
        }
        if let Some(ptr) = inner.remove(key) {
            trace!(%ptr, "unpinned display handle swept");
        }
        true
    }

    /// Remove an entry regardless of pins. Returns false if the key was
    /// already gone.
    pub fn dispose(&self, key: DisplayKey) -> bool {
        match self.lock().remove(key) {
            Some(ptr) => {
                debug!(%ptr, "display handle disposed");
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.lock().slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().slots.is_empty()
    }
}

impl HandleFactory for HandleTable {
    type Handle = DisplayRef;

    fn wrap(&self, ptr: NativePtr) -> Result<DisplayRef, WireError> {
        if ptr.is_null() {
            return Err(WireError::NullHandle);
        }
        let mut inner = self.lock();
        if let Some(&key) = inner.by_ptr.get(&ptr) {
            return Ok(DisplayRef { key, ptr });
        }
        let key = inner.slots.insert(Slot { ptr, pins: 0 });
        inner.by_ptr.insert(ptr, key);
        debug!(%ptr, "display handle wrapped");
        Ok(DisplayRef { key, ptr })
    }
}
