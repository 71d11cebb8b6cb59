//! End-to-end drain passes against an in-memory native queue.

use std::sync::{Arc, Mutex};

use arkwin_common::{CallbackError, DispatchError, NativePtr, ResourceId, WireError};
use arkwin_config::{ArkwinConfig, UnknownResourcePolicy};
use arkwin_dispatch::{
    BoundaryEvent, CallbackArgs, CallbackKind, CallbackRegistry, DispatchState, Dispatcher,
    HandleTable, QueuedEventSource, ResourceTable,
};
use arkwin_wire::{FoldCreaseRegion, Rect, WireEncoder};

struct Harness {
    queue: QueuedEventSource,
    registry: CallbackRegistry,
    dispatcher: Dispatcher<QueuedEventSource>,
}

fn harness() -> Harness {
    harness_with(&ArkwinConfig::default())
}

fn harness_with(config: &ArkwinConfig) -> Harness {
    let resources = Arc::new(ResourceTable::new());
    let registry = CallbackRegistry::new(Arc::clone(&resources), Arc::new(HandleTable::new()));
    let queue = QueuedEventSource::new();
    let dispatcher = Dispatcher::from_config(
        config,
        queue.clone(),
        resources,
        Arc::new(registry.clone()),
    );
    Harness {
        queue,
        registry,
        dispatcher,
    }
}

fn recorder(
    registry: &CallbackRegistry,
    kind: CallbackKind,
) -> (ResourceId, Arc<Mutex<Vec<CallbackArgs>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let id = registry.register(kind, move |args| {
        sink.lock().unwrap().push(args);
        Ok(())
    });
    (id, seen)
}

#[test]
fn empty_queue_returns_immediately() {
    let mut h = harness();
    let report = h.dispatcher.drain().unwrap();
    assert_eq!(report.events, 0);
    assert_eq!(h.dispatcher.state(), DispatchState::Idle);
}

#[test]
fn rect_callback_scenario() {
    let mut h = harness();
    let (id, seen) = recorder(&h.registry, CallbackKind::Rect);
    let rect = Rect::new(0.0, 0.0, 100.0, 200.0);
    h.queue
        .push(BoundaryEvent::call(id, CallbackArgs::Rect(rect)).encode());

    let report = h.dispatcher.drain().unwrap();
    assert_eq!(report.events, 1);
    assert_eq!(report.callbacks, 1);
    assert_eq!(*seen.lock().unwrap(), vec![CallbackArgs::Rect(rect)]);
}

#[test]
fn fold_crease_region_scenario() {
    let mut h = harness();
    let (id, seen) = recorder(&h.registry, CallbackKind::FoldCreaseRegion);
    let region = FoldCreaseRegion {
        display_id: 1.0,
        crease_rects: vec![
            Rect::new(0.0, 1000.0, 1080.0, 30.0),
            Rect::new(0.0, 2000.0, 1080.0, 30.0),
        ],
    };
    h.queue
        .push(BoundaryEvent::call(id, CallbackArgs::FoldCreaseRegion(region.clone())).encode());

    h.dispatcher.drain().unwrap();
    let seen = seen.lock().unwrap();
    match &seen[0] {
        CallbackArgs::FoldCreaseRegion(got) => {
            assert_eq!(got.display_id, 1.0);
            assert_eq!(got.crease_rects.len(), 2);
            assert_eq!(got.crease_rects, region.crease_rects);
        }
        other => panic!("unexpected args {other:?}"),
    }
}

#[test]
fn drains_exactly_pending_events_in_arrival_order() {
    let mut h = harness();
    let (id, seen) = recorder(&h.registry, CallbackKind::Number);
    for n in 0..5 {
        h.queue
            .push(BoundaryEvent::call(id, CallbackArgs::Number(f64::from(n))).encode());
    }

    let report = h.dispatcher.drain().unwrap();
    assert_eq!(report.events, 5);
    assert!(h.queue.is_empty());
    let expected: Vec<_> = (0..5).map(|n| CallbackArgs::Number(f64::from(n))).collect();
    assert_eq!(*seen.lock().unwrap(), expected);

    // Nothing left: the next pass is empty.
    assert_eq!(h.dispatcher.drain().unwrap().events, 0);
}

#[test]
fn long_event_does_not_leak_into_short_one() {
    let mut h = harness();
    let (rects_id, _) = recorder(&h.registry, CallbackKind::RectArray);
    let (void_id, void_seen) = recorder(&h.registry, CallbackKind::Void);
    let (hold_target, _) = recorder(&h.registry, CallbackKind::Void);

    let big: Vec<Rect> = (0..20).map(|i| Rect::new(f64::from(i), 0.0, 1.0, 1.0)).collect();
    h.queue
        .push(BoundaryEvent::call(rects_id, CallbackArgs::RectArray(big)).encode());
    h.queue.push(BoundaryEvent::hold(hold_target).encode());
    h.queue
        .push(BoundaryEvent::call(void_id, CallbackArgs::Void).encode());

    let report = h.dispatcher.drain().unwrap();
    assert_eq!(report.events, 3);
    assert_eq!(report.holds, 1);
    assert_eq!(void_seen.lock().unwrap().len(), 1);
    assert_eq!(h.registry.resources().hold_count(hold_target), Some(2));
}

#[test]
fn empty_entry_does_not_end_the_pass() {
    let mut h = harness();
    let (id, _) = recorder(&h.registry, CallbackKind::Void);
    h.queue.push(Vec::new());
    h.queue.push(BoundaryEvent::hold(id).encode());

    let report = h.dispatcher.drain().unwrap();
    assert_eq!(report.holds, 1);
    assert!(h.queue.is_empty());
    assert_eq!(h.registry.resources().hold_count(id), Some(2));
}

fn display_event(target: ResourceId, ptr: u64) -> Vec<u8> {
    let mut enc = WireEncoder::new();
    enc.write_i32(0)
        .write_i32(CallbackKind::Display.as_i32())
        .write_i32(target.0)
        .write_pointer(NativePtr::NULL)
        .write_pointer(NativePtr::NULL)
        .write_pointer(NativePtr(ptr));
    enc.into_bytes()
}

#[test]
fn display_handles_keep_identity_and_failed_calls_leave_none_behind() {
    let mut h = harness();
    let handles = Arc::clone(h.registry.handles());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let id = h.registry.register(CallbackKind::Display, move |args| {
        if let CallbackArgs::Display(display) = args {
            let mut seen = sink.lock().unwrap();
            // Keep the display from its first delivery on.
            if seen.is_empty() {
                handles.pin(display.key);
            }
            seen.push(display);
        }
        Ok(())
    });

    h.queue.push(display_event(id, 0xd15a));
    h.queue.push(display_event(id, 0xd15a));
    assert_eq!(h.dispatcher.drain().unwrap().callbacks, 2);
    {
        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].key, seen[1].key);
    }
    assert_eq!(h.registry.handles().len(), 1);

    for _ in 0..10 {
        h.queue.push(display_event(ResourceId(999), 0xbad0));
        assert_eq!(
            h.dispatcher.drain().unwrap_err(),
            DispatchError::UnknownResourceId(ResourceId(999))
        );
    }
    assert_eq!(h.registry.handles().len(), 1);
    assert!(h.registry.handles().find(NativePtr(0xbad0)).is_none());
}

#[test]
fn hold_release_symmetry() {
    let mut h = harness();
    let (id, _) = recorder(&h.registry, CallbackKind::Void);
    for _ in 0..3 {
        h.queue.push(BoundaryEvent::hold(id).encode());
    }
    for _ in 0..3 {
        h.queue.push(BoundaryEvent::release(id).encode());
    }

    let report = h.dispatcher.drain().unwrap();
    assert_eq!(report.holds, 3);
    assert_eq!(report.releases, 3);
    assert_eq!(h.registry.resources().hold_count(id), Some(1));
}

#[test]
fn releasing_last_hold_reclaims_callback() {
    let mut h = harness();
    let (id, _) = recorder(&h.registry, CallbackKind::Void);
    h.queue.push(BoundaryEvent::hold(id).encode());
    h.queue.push(BoundaryEvent::release(id).encode());
    h.queue.push(BoundaryEvent::release(id).encode());

    h.dispatcher.drain().unwrap();
    assert!(!h.registry.resources().contains(id));
}

#[test]
fn unknown_event_kind_aborts_pass() {
    let mut h = harness();
    let (id, seen) = recorder(&h.registry, CallbackKind::Void);
    h.queue
        .push(BoundaryEvent::call(id, CallbackArgs::Void).encode());
    let mut bogus = WireEncoder::new();
    bogus.write_i32(7);
    h.queue.push(bogus.into_bytes());
    h.queue
        .push(BoundaryEvent::call(id, CallbackArgs::Void).encode());

    let err = h.dispatcher.drain().unwrap_err();
    assert_eq!(err, DispatchError::UnknownEventKind(7));
    assert_eq!(seen.lock().unwrap().len(), 1);
    assert_eq!(h.queue.len(), 1, "event after the bad one stays queued");
    assert_eq!(h.dispatcher.state(), DispatchState::Idle);
}

#[test]
fn callback_error_aborts_pass() {
    let mut h = harness();
    let failing = h
        .registry
        .register(CallbackKind::Void, |_| Err(CallbackError::new("listener failed")));
    let (ok_id, seen) = recorder(&h.registry, CallbackKind::Void);
    h.queue
        .push(BoundaryEvent::call(failing, CallbackArgs::Void).encode());
    h.queue
        .push(BoundaryEvent::call(ok_id, CallbackArgs::Void).encode());

    let err = h.dispatcher.drain().unwrap_err();
    assert_eq!(
        err,
        DispatchError::Callback(CallbackError::new("listener failed"))
    );
    assert!(seen.lock().unwrap().is_empty());

    // The next pass picks up where the failed one stopped.
    assert_eq!(h.dispatcher.drain().unwrap().callbacks, 1);
}

#[test]
fn unknown_resource_fails_by_default() {
    let mut h = harness();
    h.queue.push(BoundaryEvent::hold(ResourceId(77)).encode());
    assert_eq!(
        h.dispatcher.drain().unwrap_err(),
        DispatchError::UnknownResourceId(ResourceId(77))
    );
}

#[test]
fn unknown_resource_skipped_under_warn_policy() {
    let mut config = ArkwinConfig::default();
    config.resources.unknown_id = UnknownResourcePolicy::Warn;
    let mut h = harness_with(&config);
    let (id, seen) = recorder(&h.registry, CallbackKind::Void);
    h.queue.push(BoundaryEvent::release(ResourceId(77)).encode());
    h.queue
        .push(BoundaryEvent::call(id, CallbackArgs::Void).encode());

    let report = h.dispatcher.drain().unwrap();
    assert_eq!(report.events, 2);
    assert_eq!(report.skipped, 1);
    assert_eq!(seen.lock().unwrap().len(), 1);
}

#[test]
fn truncated_event_is_decode_error() {
    let mut h = harness();
    let bytes = BoundaryEvent::hold(ResourceId(1)).encode();
    h.queue.push(bytes[..5].to_vec());
    let err = h.dispatcher.drain().unwrap_err();
    assert!(matches!(
        err,
        DispatchError::Decode(WireError::BufferUnderrun { offset: 4, .. })
    ));
}

#[test]
fn stale_scratch_bytes_are_never_read() {
    let mut h = harness();
    let (id, _) = recorder(&h.registry, CallbackKind::Void);
    // The first hold leaves its id in the scratch buffer; a second hold
    // missing its id must fail rather than read those bytes.
    h.queue.push(BoundaryEvent::hold(id).encode());
    h.queue.push(BoundaryEvent::hold(id).encode()[..4].to_vec());

    let err = h.dispatcher.drain().unwrap_err();
    assert!(matches!(
        err,
        DispatchError::Decode(WireError::BufferUnderrun { .. })
    ));
    assert_eq!(h.registry.resources().hold_count(id), Some(2));
}

#[test]
fn event_larger_than_scratch_is_overflow() {
    let mut config = ArkwinConfig::default();
    config.dispatch.scratch_capacity = 256;
    let mut h = harness_with(&config);
    assert_eq!(h.dispatcher.capacity(), 256);
    h.queue.push(vec![0u8; 300]);

    assert_eq!(
        h.dispatcher.drain().unwrap_err(),
        DispatchError::PollOverflow {
            written: 300,
            capacity: 256
        }
    );
}

#[test]
fn event_limit_ends_pass_early() {
    let mut config = ArkwinConfig::default();
    config.dispatch.max_events_per_drain = 2;
    let mut h = harness_with(&config);
    let (id, _) = recorder(&h.registry, CallbackKind::Void);
    for _ in 0..3 {
        h.queue
            .push(BoundaryEvent::call(id, CallbackArgs::Void).encode());
    }

    let first = h.dispatcher.drain().unwrap();
    assert_eq!(first.events, 2);
    assert!(first.limited);
    assert_eq!(h.queue.len(), 1);

    let second = h.dispatcher.drain().unwrap();
    assert_eq!(second.events, 1);
    assert!(!second.limited);
}

#[test]
fn events_queued_by_a_callback_are_drained_in_same_pass() {
    let mut h = harness();
    let (echo_id, echo_seen) = recorder(&h.registry, CallbackKind::Number);
    let producer = h.queue.clone();
    let trigger = h.registry.register(CallbackKind::Void, move |_| {
        producer.push(BoundaryEvent::call(echo_id, CallbackArgs::Number(1.0)).encode());
        producer.push(BoundaryEvent::call(echo_id, CallbackArgs::Number(2.0)).encode());
        Ok(())
    });
    h.queue
        .push(BoundaryEvent::call(trigger, CallbackArgs::Void).encode());

    let report = h.dispatcher.drain().unwrap();
    assert_eq!(report.events, 3);
    assert_eq!(
        *echo_seen.lock().unwrap(),
        vec![CallbackArgs::Number(1.0), CallbackArgs::Number(2.0)]
    );
}

#[test]
fn callback_registering_another_callback() {
    let mut h = harness();
    let registry = h.registry.clone();
    let created = Arc::new(Mutex::new(None));
    let created_in_cb = Arc::clone(&created);
    let id = h.registry.register(CallbackKind::Void, move |_| {
        let new_id = registry.register(CallbackKind::Void, |_| Ok(()));
        *created_in_cb.lock().unwrap() = Some(new_id);
        Ok(())
    });
    h.queue
        .push(BoundaryEvent::call(id, CallbackArgs::Void).encode());

    h.dispatcher.drain().unwrap();
    let new_id = created.lock().unwrap().expect("callback ran");
    assert!(h.registry.resources().contains(new_id));
}
