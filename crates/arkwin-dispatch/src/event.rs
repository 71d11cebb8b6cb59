//! Event kinds and whole-event encoding.

use arkwin_common::{DispatchError, NativePtr, ResourceId};
use arkwin_wire::{WireDecoder, WireEncoder};
use serde::Serialize;
use std::fmt;

use crate::callbacks::{CallbackArgs, CallbackHeader};
use crate::handles::HandleTable;

/// First field of every boundary event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
#[repr(i32)]
pub enum EventKind {
    CallCallback = 0,
    HoldResource = 1,
    ReleaseResource = 2,
}

impl EventKind {
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl TryFrom<i32> for EventKind {
    type Error = DispatchError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(EventKind::CallCallback),
            1 => Ok(EventKind::HoldResource),
            2 => Ok(EventKind::ReleaseResource),
            other => Err(DispatchError::UnknownEventKind(other)),
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventKind::CallCallback => "call_callback",
            EventKind::HoldResource => "hold_resource",
            EventKind::ReleaseResource => "release_resource",
        };
        f.write_str(name)
    }
}

/// A fully decoded boundary event.
///
/// The dispatcher never builds these; it routes straight from the wire.
/// They exist for the producing side and for offline inspection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BoundaryEvent {
    CallCallback {
        resource: ResourceId,
        args: CallbackArgs,
    },
    HoldResource {
        resource: ResourceId,
    },
    ReleaseResource {
        resource: ResourceId,
    },
}

impl BoundaryEvent {
    pub fn call(resource: ResourceId, args: CallbackArgs) -> Self {
        BoundaryEvent::CallCallback { resource, args }
    }

    pub fn hold(resource: ResourceId) -> Self {
        BoundaryEvent::HoldResource { resource }
    }

    pub fn release(resource: ResourceId) -> Self {
        BoundaryEvent::ReleaseResource { resource }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            BoundaryEvent::CallCallback { .. } => EventKind::CallCallback,
            BoundaryEvent::HoldResource { .. } => EventKind::HoldResource,
            BoundaryEvent::ReleaseResource { .. } => EventKind::ReleaseResource,
        }
    }

    pub fn resource(&self) -> ResourceId {
        match self {
            BoundaryEvent::CallCallback { resource, .. }
            | BoundaryEvent::HoldResource { resource }
            | BoundaryEvent::ReleaseResource { resource } => *resource,
        }
    }

    /// Encode as the native side would. Callback trampolines are written as
    /// null pointers.
    pub fn encode(&self) -> Vec<u8> {
        let mut e = WireEncoder::new();
        e.write_i32(self.kind().as_i32());
        match self {
            BoundaryEvent::CallCallback { resource, args } => {
                e.write_i32(args.kind().as_i32())
                    .write_i32(resource.0)
                    .write_pointer(NativePtr::NULL)
                    .write_pointer(NativePtr::NULL);
                args.encode(&mut e);
            }
            BoundaryEvent::HoldResource { resource }
            | BoundaryEvent::ReleaseResource { resource } => {
                e.write_i32(resource.0);
            }
        }
        e.into_bytes()
    }

    /// Decode one complete event without invoking anything.
    pub fn decode(bytes: &[u8], handles: &HandleTable) -> Result<Self, DispatchError> {
        let mut d = WireDecoder::new(bytes);
        let kind = EventKind::try_from(d.read_i32()?)?;
        Ok(match kind {
            EventKind::CallCallback => {
                let header = CallbackHeader::decode(&mut d)?;
                let args = CallbackArgs::decode(header.kind, &mut d, handles)?;
                BoundaryEvent::CallCallback {
                    resource: header.resource,
                    args,
                }
            }
            EventKind::HoldResource => BoundaryEvent::HoldResource {
                resource: ResourceId(d.read_i32()?),
            },
            EventKind::ReleaseResource => BoundaryEvent::ReleaseResource {
                resource: ResourceId(d.read_i32()?),
            },
        })
    }
}
