//! The drain loop: poll, decode the kind tag, route, repeat.

use std::sync::Arc;

use arkwin_common::{DispatchError, ResourceId};
use arkwin_config::{ArkwinConfig, UnknownResourcePolicy};
use arkwin_wire::WireDecoder;
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::callbacks::CallbackInvoker;
use crate::event::EventKind;
use crate::resources::ResourceHolder;
use crate::scratch::ScratchBuffer;
use crate::source::EventSource;
use crate::state::DispatchState;

/// Counts for one completed drain pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DrainReport {
    pub events: usize,
    pub callbacks: usize,
    pub holds: usize,
    pub releases: usize,
    /// Hold/release events for untracked ids skipped under the warn policy.
    pub skipped: usize,
    /// Events that still had unread bytes once dispatched.
    pub trailing: usize,
    /// The pass stopped at `max_events_per_drain` with events possibly
    /// still pending.
    pub limited: bool,
}

/// Pulls boundary events from an [`EventSource`] and routes them.
///
/// Owns the scratch buffer; each event is decoded from offset zero of that
/// buffer, so nothing from one event is visible to the next. `drain` takes
/// `&mut self`, so two passes can never overlap on the same buffer.
pub struct Dispatcher<S> {
    source: S,
    scratch: ScratchBuffer,
    resources: Arc<dyn ResourceHolder>,
    invoker: Arc<dyn CallbackInvoker>,
    unknown_resource: UnknownResourcePolicy,
    max_events: usize,
    state: DispatchState,
}

impl<S: EventSource> Dispatcher<S> {
    pub fn new(
        source: S,
        capacity: usize,
        resources: Arc<dyn ResourceHolder>,
        invoker: Arc<dyn CallbackInvoker>,
    ) -> Self {
        Self {
            source,
            scratch: ScratchBuffer::new(capacity),
            resources,
            invoker,
            unknown_resource: UnknownResourcePolicy::Fail,
            max_events: 0,
            state: DispatchState::Idle,
        }
    }

    /// Build a dispatcher with buffer size, event limit and unknown-id
    /// policy taken from `config`.
    pub fn from_config(
        config: &ArkwinConfig,
        source: S,
        resources: Arc<dyn ResourceHolder>,
        invoker: Arc<dyn CallbackInvoker>,
    ) -> Self {
        let mut dispatcher = Self::new(
            source,
            config.dispatch.scratch_capacity,
            resources,
            invoker,
        );
        dispatcher.max_events = config.dispatch.max_events_per_drain;
        dispatcher.unknown_resource = config.resources.unknown_id;
        dispatcher
    }

    pub fn with_unknown_resource_policy(mut self, policy: UnknownResourcePolicy) -> Self {
        self.unknown_resource = policy;
        self
    }

    pub fn with_max_events(mut self, max_events: usize) -> Self {
        self.max_events = max_events;
        self
    }

    pub fn state(&self) -> DispatchState {
        self.state
    }

    pub fn capacity(&self) -> usize {
        self.scratch.capacity()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Process every event the source currently has pending.
    ///
    /// Returns once the source reports nothing pending (or the configured
    /// event limit is hit). The first error ends the pass; events still
    /// queued natively are left for the next call.
    pub fn drain(&mut self) -> Result<DrainReport, DispatchError> {
        let result = self.drain_pass();
        self.state = DispatchState::Idle;
        match &result {
            Ok(report) if report.events > 0 => {
                debug!(
                    events = report.events,
                    callbacks = report.callbacks,
                    holds = report.holds,
                    releases = report.releases,
                    "drain pass complete"
                );
            }
            Ok(_) => {}
            Err(e) => warn!(error = %e, "drain pass aborted"),
        }
        result
    }

    fn drain_pass(&mut self) -> Result<DrainReport, DispatchError> {
        let mut report = DrainReport::default();

        loop {
            if self.max_events != 0 && report.events >= self.max_events {
                debug!(limit = self.max_events, "event limit reached, ending pass");
                report.limited = true;
                break;
            }

            self.state = DispatchState::Polling;
            let written = self.source.poll(self.scratch.as_mut_slice());
            if written == 0 {
                break;
            }

            self.state = DispatchState::Decoding;
            let frame = self.scratch.frame(written)?;
            let mut decoder = WireDecoder::new(frame);
            let kind = EventKind::try_from(decoder.read_i32()?)?;
            trace!(%kind, len = written, "event decoded");

            self.state = DispatchState::Dispatching;
            match kind {
                EventKind::CallCallback => {
                    self.invoker.invoke(&mut decoder)?;
                    report.callbacks += 1;
                }
                EventKind::HoldResource => {
                    let id = ResourceId(decoder.read_i32()?);
                    if apply(self.unknown_resource, self.resources.hold(id))? {
                        report.holds += 1;
                    } else {
                        report.skipped += 1;
                    }
                }
                EventKind::ReleaseResource => {
                    let id = ResourceId(decoder.read_i32()?);
                    if apply(self.unknown_resource, self.resources.release(id))? {
                        report.releases += 1;
                    } else {
                        report.skipped += 1;
                    }
                }
            }
            if !decoder.is_empty() {
                warn!(
                    %kind,
                    len = written,
                    trailing = decoder.remaining(),
                    "event has bytes past its last field"
                );
                report.trailing += 1;
            }
            report.events += 1;
        }

        Ok(report)
    }
}

/// Resolve a hold/release outcome against the unknown-id policy.
///
/// Returns whether the operation took effect.
fn apply(
    policy: UnknownResourcePolicy,
    outcome: Result<u32, DispatchError>,
) -> Result<bool, DispatchError> {
    match outcome {
        Ok(_) => Ok(true),
        Err(DispatchError::UnknownResourceId(id)) if policy == UnknownResourcePolicy::Warn => {
            warn!(%id, "hold/release for unknown resource ignored");
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Native stand-in that records the buffer length it was given.
    struct SizedSource {
        seen_capacity: Vec<usize>,
        pending: Vec<Vec<u8>>,
    }

    impl EventSource for SizedSource {
        fn poll(&mut self, buffer: &mut [u8]) -> usize {
            self.seen_capacity.push(buffer.len());
            match self.pending.pop() {
                Some(event) => {
                    buffer[..event.len()].copy_from_slice(&event);
                    event.len()
                }
                None => 0,
            }
        }
    }

    #[derive(Default)]
    struct CountingHolder {
        log: Mutex<Vec<(char, ResourceId)>>,
    }

    impl ResourceHolder for CountingHolder {
        fn hold(&self, id: ResourceId) -> Result<u32, DispatchError> {
            self.log.lock().unwrap().push(('+', id));
            Ok(1)
        }

        fn release(&self, id: ResourceId) -> Result<u32, DispatchError> {
            self.log.lock().unwrap().push(('-', id));
            Ok(0)
        }
    }

    struct NoCallbacks;

    impl CallbackInvoker for NoCallbacks {
        fn invoke(&self, _decoder: &mut WireDecoder<'_>) -> Result<(), DispatchError> {
            Ok(())
        }
    }

    fn event(kind: i32, id: i32) -> Vec<u8> {
        let mut bytes = kind.to_le_bytes().to_vec();
        bytes.extend_from_slice(&id.to_le_bytes());
        bytes
    }

    #[test]
    fn poll_always_sees_full_capacity() {
        let holder = Arc::new(CountingHolder::default());
        let source = SizedSource {
            seen_capacity: Vec::new(),
            pending: vec![event(2, 5), event(1, 5)],
        };
        let mut dispatcher = Dispatcher::new(source, 512, holder.clone(), Arc::new(NoCallbacks));

        let report = dispatcher.drain().unwrap();
        assert_eq!(report.holds, 1);
        assert_eq!(report.releases, 1);
        assert_eq!(dispatcher.source().seen_capacity, vec![512, 512, 512]);
        assert_eq!(
            *holder.log.lock().unwrap(),
            vec![('+', ResourceId(5)), ('-', ResourceId(5))]
        );
    }

    #[test]
    fn builder_overrides() {
        let source = SizedSource {
            seen_capacity: Vec::new(),
            pending: vec![event(1, 1), event(1, 1)],
        };
        let mut dispatcher = Dispatcher::new(
            source,
            64,
            Arc::new(CountingHolder::default()),
            Arc::new(NoCallbacks),
        )
        .with_max_events(1)
        .with_unknown_resource_policy(UnknownResourcePolicy::Warn);

        let report = dispatcher.drain().unwrap();
        assert_eq!(report.events, 1);
        assert!(report.limited);
        assert_eq!(dispatcher.source_mut().pending.len(), 1);
    }

    #[test]
    fn apply_respects_policy() {
        let unknown = || Err(DispatchError::UnknownResourceId(ResourceId(3)));
        assert_eq!(apply(UnknownResourcePolicy::Warn, unknown()), Ok(false));
        assert_eq!(
            apply(UnknownResourcePolicy::Fail, unknown()),
            Err(DispatchError::UnknownResourceId(ResourceId(3)))
        );
        assert_eq!(apply(UnknownResourcePolicy::Fail, Ok(2)), Ok(true));
    }

    #[test]
    fn warn_policy_still_propagates_other_errors() {
        let err = apply(
            UnknownResourcePolicy::Warn,
            Err(DispatchError::UnknownEventKind(9)),
        );
        assert_eq!(err, Err(DispatchError::UnknownEventKind(9)));
    }

    #[test]
    fn trailing_bytes_are_counted_not_fatal() {
        let mut padded = event(1, 8);
        padded.extend_from_slice(&[0xaa, 0xbb]);
        let source = SizedSource {
            seen_capacity: Vec::new(),
            pending: vec![event(2, 8), padded],
        };
        let mut dispatcher = Dispatcher::new(
            source,
            64,
            Arc::new(CountingHolder::default()),
            Arc::new(NoCallbacks),
        );

        let report = dispatcher.drain().unwrap();
        assert_eq!(report.events, 2);
        assert_eq!(report.holds, 1);
        assert_eq!(report.trailing, 1);
    }
}
