//! Native side of the poll call.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::warn;

/// Non-blocking "next pending event" call into the native service.
pub trait EventSource {
    /// Write at most one encoded event into `buffer`.
    ///
    /// Returns 0 when nothing is pending, otherwise the number of bytes
    /// written. Implementations must return immediately.
    fn poll(&mut self, buffer: &mut [u8]) -> usize;
}

impl<S: EventSource + ?Sized> EventSource for &mut S {
    fn poll(&mut self, buffer: &mut [u8]) -> usize {
        (**self).poll(buffer)
    }
}

impl<S: EventSource + ?Sized> EventSource for Box<S> {
    fn poll(&mut self, buffer: &mut [u8]) -> usize {
        (**self).poll(buffer)
    }
}

/// In-memory FIFO of encoded events.
///
/// Clones share one queue, so a callback holding a clone can enqueue more
/// events while a drain pass is running; they are delivered in the same pass.
#[derive(Debug, Clone, Default)]
pub struct QueuedEventSource {
    queue: Arc<Mutex<VecDeque<Vec<u8>>>>,
}

impl QueuedEventSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one encoded event. Zero-length entries are discarded at poll
    /// time.
    pub fn push(&self, event: impl Into<Vec<u8>>) {
        self.lock().push_back(event.into());
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<Vec<u8>>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl EventSource for QueuedEventSource {
    fn poll(&mut self, buffer: &mut [u8]) -> usize {
        // Zero means "none pending": empty entries are dropped, never
        // returned.
        let event = {
            let mut queue = self.lock();
            loop {
                match queue.pop_front() {
                    Some(event) if event.is_empty() => {
                        warn!("dropping zero-length queued event");
                    }
                    Some(event) => break event,
                    None => return 0,
                }
            }
        };
        if event.len() > buffer.len() {
            warn!(
                len = event.len(),
                capacity = buffer.len(),
                "queued event larger than scratch buffer"
            );
        }
        let n = event.len().min(buffer.len());
        buffer[..n].copy_from_slice(&event[..n]);
        event.len()
    }
}
