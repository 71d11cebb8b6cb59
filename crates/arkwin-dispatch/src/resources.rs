//! Reference-counted table of managed objects the native side keeps alive.

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use arkwin_common::{DispatchError, ResourceId};
use tracing::{debug, trace};

/// A managed object stored in the table.
pub type Resource = Arc<dyn Any + Send + Sync>;

/// Hold/release side of the resource lifecycle, as used by the dispatcher.
pub trait ResourceHolder: Send + Sync {
    /// Increment the hold count. Returns the new count.
    fn hold(&self, id: ResourceId) -> Result<u32, DispatchError>;

    /// Decrement the hold count, dropping the resource at zero. Returns the
    /// remaining count.
    fn release(&self, id: ResourceId) -> Result<u32, DispatchError>;
}

struct Entry {
    holds: u32,
    value: Resource,
}

struct Inner {
    next_id: i32,
    entries: HashMap<ResourceId, Entry>,
}

/// Explicit counting table keyed by [`ResourceId`].
///
/// Registration creates an entry with one hold. Each release decrements;
/// the entry and its value are dropped when the count reaches zero.
/// Values are handed out as `Arc` clones with the lock released, so code
/// running against a looked-up value may call back into the table.
pub struct ResourceTable {
    inner: Mutex<Inner>,
}

impl ResourceTable {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                next_id: 1,
                entries: HashMap::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store `value` under a fresh id with a hold count of one.
    pub fn register(&self, value: Resource) -> ResourceId {
        let mut inner = self.lock();
        let mut id = ResourceId(inner.next_id);
        while inner.entries.contains_key(&id) {
            id = ResourceId(id.0.wrapping_add(1).max(1));
        }
        inner.next_id = id.0.wrapping_add(1).max(1);
        inner.entries.insert(id, Entry { holds: 1, value });
        debug!(%id, "resource registered");
        id
    }

    /// Store `value` under an id chosen by the caller, e.g. when replaying
    /// traffic recorded against known ids.
    pub fn register_with_id(&self, id: ResourceId, value: Resource) -> Result<(), DispatchError> {
        let mut inner = self.lock();
        if inner.entries.contains_key(&id) {
            return Err(DispatchError::DuplicateResourceId(id));
        }
        inner.entries.insert(id, Entry { holds: 1, value });
        debug!(%id, "resource registered with fixed id");
        Ok(())
    }

    pub fn get(&self, id: ResourceId) -> Option<Resource> {
        self.lock().entries.get(&id).map(|e| Arc::clone(&e.value))
    }

    pub fn hold_count(&self, id: ResourceId) -> Option<u32> {
        self.lock().entries.get(&id).map(|e| e.holds)
    }

    pub fn contains(&self, id: ResourceId) -> bool {
        self.lock().entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }
}

impl Default for ResourceTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceHolder for ResourceTable {
    fn hold(&self, id: ResourceId) -> Result<u32, DispatchError> {
        let mut inner = self.lock();
        let entry = inner
            .entries
            .get_mut(&id)
            .ok_or(DispatchError::UnknownResourceId(id))?;
        entry.holds = entry
            .holds
            .checked_add(1)
            .ok_or(DispatchError::HoldOverflow(id))?;
        trace!(%id, holds = entry.holds, "resource held");
        Ok(entry.holds)
    }

    fn release(&self, id: ResourceId) -> Result<u32, DispatchError> {
        let removed = {
            let mut inner = self.lock();
            let entry = inner
                .entries
                .get_mut(&id)
                .ok_or(DispatchError::UnknownResourceId(id))?;
            entry.holds -= 1;
            trace!(%id, holds = entry.holds, "resource released");
            if entry.holds > 0 {
                return Ok(entry.holds);
            }
            inner.entries.remove(&id)
        };
        // Dropped outside the lock: the value's destructor may touch the table.
        drop(removed);
        debug!(%id, "resource reclaimed");
        Ok(0)
    }
}
