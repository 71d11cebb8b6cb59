//! Seam for turning raw native pointers into managed-side objects.

use arkwin_common::NativePtr;

use crate::Result;

/// Wraps a pointer-sized native value as a managed handle.
///
/// The decoder holds no identity table of its own; whoever implements this
/// trait decides whether two reads of the same pointer yield the same handle.
pub trait HandleFactory {
    type Handle;

    fn wrap(&self, ptr: NativePtr) -> Result<Self::Handle>;
}
