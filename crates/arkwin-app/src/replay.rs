//! Drain a capture through a real dispatcher with recording callbacks.

use std::sync::{Arc, Mutex, PoisonError};

use arkwin_common::{ArkwinError, DispatchError, ResourceId};
use arkwin_config::ArkwinConfig;
use arkwin_dispatch::{
    CallbackArgs, CallbackRegistry, Dispatcher, DrainReport, HandleTable, QueuedEventSource,
    ResourceTable,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::capture::Capture;

/// One callback invocation observed during replay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Invocation {
    pub resource: ResourceId,
    pub args: CallbackArgs,
}

#[derive(Debug)]
pub struct ReplayOutcome {
    pub invocations: Vec<Invocation>,
    /// Counts summed over every pass, or the error that ended replay.
    pub result: Result<DrainReport, DispatchError>,
    /// Events left in the queue when replay stopped.
    pub pending: usize,
}

impl ReplayOutcome {
    /// Every event was dispatched and no pass failed.
    pub fn is_complete(&self) -> bool {
        self.result.is_ok() && self.pending == 0
    }
}

/// Register the capture's callbacks, queue its events and drain until the
/// queue is empty or a pass fails.
pub fn run(config: &ArkwinConfig, capture: &Capture) -> Result<ReplayOutcome, ArkwinError> {
    let events = capture.event_bytes()?;

    let resources = Arc::new(ResourceTable::new());
    let registry = CallbackRegistry::new(Arc::clone(&resources), Arc::new(HandleTable::new()));
    let log: Arc<Mutex<Vec<Invocation>>> = Arc::default();

    for decl in &capture.callbacks {
        let log = Arc::clone(&log);
        let resource = decl.id;
        registry.register_with_id(decl.id, decl.kind, move |args| {
            log.lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(Invocation { resource, args });
            Ok(())
        })?;
    }

    let source = QueuedEventSource::new();
    for event in events {
        source.push(event);
    }
    info!(
        callbacks = capture.callbacks.len(),
        events = source.len(),
        "replaying capture"
    );

    let mut dispatcher = Dispatcher::from_config(
        config,
        source.clone(),
        resources,
        Arc::new(registry),
    );
    let result = drain_all(&mut dispatcher);

    let invocations = std::mem::take(&mut *log.lock().unwrap_or_else(PoisonError::into_inner));
    Ok(ReplayOutcome {
        invocations,
        result,
        pending: source.len(),
    })
}

/// Run passes until one finishes without hitting the event limit.
fn drain_all(
    dispatcher: &mut Dispatcher<QueuedEventSource>,
) -> Result<DrainReport, DispatchError> {
    let mut total = DrainReport::default();
    let mut passes = 0usize;
    loop {
        let report = dispatcher.drain()?;
        passes += 1;
        total.events += report.events;
        total.callbacks += report.callbacks;
        total.holds += report.holds;
        total.releases += report.releases;
        total.skipped += report.skipped;
        total.trailing += report.trailing;
        if !report.limited {
            break;
        }
    }
    debug!(passes, events = total.events, "replay drained");
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::CallbackDecl;
    use arkwin_config::UnknownResourcePolicy;
    use arkwin_dispatch::{BoundaryEvent, CallbackKind};
    use arkwin_wire::{FoldStatus, Rect};

    #[test]
    fn sample_replays_every_call_in_order() {
        let outcome = run(&ArkwinConfig::default(), &Capture::sample()).unwrap();
        let report = outcome.result.unwrap();
        assert_eq!(report.events, 6);
        assert_eq!(report.callbacks, 4);
        assert_eq!(report.holds, 1);
        assert_eq!(report.releases, 1);
        assert_eq!(outcome.pending, 0);

        let calls: Vec<_> = outcome.invocations.iter().map(|i| i.resource.0).collect();
        assert_eq!(calls, vec![1, 2, 3, 1]);
        assert_eq!(
            outcome.invocations[3].args,
            CallbackArgs::FoldStatus(FoldStatus::Expanded)
        );
    }

    #[test]
    fn leftover_events_make_replay_incomplete() {
        let outcome = ReplayOutcome {
            invocations: Vec::new(),
            result: Ok(DrainReport::default()),
            pending: 2,
        };
        assert!(!outcome.is_complete());

        let done = run(&ArkwinConfig::default(), &Capture::sample()).unwrap();
        assert!(done.is_complete());
    }

    #[test]
    fn event_limit_spreads_replay_over_passes() {
        let mut config = ArkwinConfig::default();
        config.dispatch.max_events_per_drain = 2;
        let outcome = run(&config, &Capture::sample()).unwrap();
        assert_eq!(outcome.result.unwrap().events, 6);
        assert_eq!(outcome.invocations.len(), 4);
    }

    #[test]
    fn failure_keeps_earlier_invocations_and_leaves_rest_queued() {
        let mut capture = Capture {
            callbacks: vec![CallbackDecl {
                id: ResourceId(7),
                kind: CallbackKind::Rect,
            }],
            events: Vec::new(),
        };
        let rect = CallbackArgs::Rect(Rect::new(1.0, 2.0, 3.0, 4.0));
        capture.push_event(&BoundaryEvent::call(ResourceId(7), rect.clone()).encode());
        capture.push_event(&BoundaryEvent::call(ResourceId(99), rect.clone()).encode());
        capture.push_event(&BoundaryEvent::call(ResourceId(7), rect).encode());

        let outcome = run(&ArkwinConfig::default(), &capture).unwrap();
        assert!(matches!(
            outcome.result,
            Err(DispatchError::UnknownResourceId(ResourceId(99)))
        ));
        assert_eq!(outcome.invocations.len(), 1);
        assert_eq!(outcome.pending, 1);
        assert!(!outcome.is_complete());
    }

    #[test]
    fn warn_policy_skips_unknown_holds() {
        let mut config = ArkwinConfig::default();
        config.resources.unknown_id = UnknownResourcePolicy::Warn;
        let mut capture = Capture::default();
        capture.push_event(&BoundaryEvent::hold(ResourceId(42)).encode());
        capture.push_event(&BoundaryEvent::release(ResourceId(42)).encode());

        let report = run(&config, &capture).unwrap().result.unwrap();
        assert_eq!(report.skipped, 2);
        assert_eq!(report.events, 2);
    }

    #[test]
    fn duplicate_callback_ids_are_rejected() {
        let decl = CallbackDecl {
            id: ResourceId(1),
            kind: CallbackKind::Void,
        };
        let capture = Capture {
            callbacks: vec![decl.clone(), decl],
            events: Vec::new(),
        };
        let err = run(&ArkwinConfig::default(), &capture).unwrap_err();
        assert!(matches!(
            err,
            ArkwinError::Dispatch(DispatchError::DuplicateResourceId(ResourceId(1)))
        ));
    }
}
