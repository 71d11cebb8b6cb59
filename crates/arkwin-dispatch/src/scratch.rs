//! Fixed-capacity byte region reused for every polled event.

use arkwin_common::DispatchError;

/// Owned event buffer. Allocated once, never resized, overwritten by each
/// poll.
#[derive(Debug)]
pub struct ScratchBuffer {
    bytes: Box<[u8]>,
}

impl ScratchBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            bytes: vec![0u8; capacity].into_boxed_slice(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    /// Whole buffer, for the native side to write into.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    /// The first `written` bytes: the logical extent of the current event.
    pub fn frame(&self, written: usize) -> Result<&[u8], DispatchError> {
        self.bytes
            .get(..written)
            .ok_or(DispatchError::PollOverflow {
                written,
                capacity: self.capacity(),
            })
    }
}
