use arkwin_common::WireError;
use arkwin_wire::{
    CutoutInfo, FoldCreaseRegion, FoldDisplayMode, FoldStatus, Rect, WireDecoder, WireEncoder,
};
use serde::Serialize;

use crate::handles::{DisplayRef, HandleTable};

use super::CallbackKind;

/// Decoded argument list of one callback invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CallbackArgs {
    Void,
    Number(f64),
    Boolean(bool),
    FoldStatus(FoldStatus),
    FoldDisplayMode(FoldDisplayMode),
    NumberArray(Vec<f64>),
    Rect(Rect),
    RectArray(Vec<Rect>),
    FoldCreaseRegion(FoldCreaseRegion),
    CutoutInfo(CutoutInfo),
    Display(DisplayRef),
}

impl CallbackArgs {
    pub fn kind(&self) -> CallbackKind {
        match self {
            CallbackArgs::Void => CallbackKind::Void,
            CallbackArgs::Number(_) => CallbackKind::Number,
            CallbackArgs::Boolean(_) => CallbackKind::Boolean,
            CallbackArgs::FoldStatus(_) => CallbackKind::FoldStatus,
            CallbackArgs::FoldDisplayMode(_) => CallbackKind::FoldDisplayMode,
            CallbackArgs::NumberArray(_) => CallbackKind::NumberArray,
            CallbackArgs::Rect(_) => CallbackKind::Rect,
            CallbackArgs::RectArray(_) => CallbackKind::RectArray,
            CallbackArgs::FoldCreaseRegion(_) => CallbackKind::FoldCreaseRegion,
            CallbackArgs::CutoutInfo(_) => CallbackKind::CutoutInfo,
            CallbackArgs::Display(_) => CallbackKind::Display,
        }
    }

    /// The display handle carried by a `Display` callback.
    pub fn display(&self) -> Option<DisplayRef> {
        match self {
            CallbackArgs::Display(display) => Some(*display),
            _ => None,
        }
    }

    /// Read the arguments for `kind`. Display handles are wrapped through
    /// `handles`.
    pub fn decode(
        kind: CallbackKind,
        d: &mut WireDecoder<'_>,
        handles: &HandleTable,
    ) -> Result<Self, WireError> {
        Ok(match kind {
            CallbackKind::Void => CallbackArgs::Void,
            CallbackKind::Number => CallbackArgs::Number(d.read_number()?),
            CallbackKind::Boolean => CallbackArgs::Boolean(d.read_bool()?),
            CallbackKind::FoldStatus => CallbackArgs::FoldStatus(d.read_value()?),
            CallbackKind::FoldDisplayMode => CallbackArgs::FoldDisplayMode(d.read_value()?),
            CallbackKind::NumberArray => CallbackArgs::NumberArray(d.read_array()?),
            CallbackKind::Rect => CallbackArgs::Rect(d.read_value()?),
            CallbackKind::RectArray => CallbackArgs::RectArray(d.read_array()?),
            CallbackKind::FoldCreaseRegion => CallbackArgs::FoldCreaseRegion(d.read_value()?),
            CallbackKind::CutoutInfo => CallbackArgs::CutoutInfo(d.read_value()?),
            CallbackKind::Display => CallbackArgs::Display(d.read_handle(handles)?),
        })
    }

    pub fn encode(&self, e: &mut WireEncoder) {
        match self {
            CallbackArgs::Void => {}
            CallbackArgs::Number(n) => {
                e.write_number(*n);
            }
            CallbackArgs::Boolean(b) => {
                e.write_bool(*b);
            }
            CallbackArgs::FoldStatus(s) => {
                e.write_value(s);
            }
            CallbackArgs::FoldDisplayMode(m) => {
                e.write_value(m);
            }
            CallbackArgs::NumberArray(values) => {
                e.write_array(values);
            }
            CallbackArgs::Rect(r) => {
                e.write_value(r);
            }
            CallbackArgs::RectArray(rects) => {
                e.write_array(rects);
            }
            CallbackArgs::FoldCreaseRegion(region) => {
                e.write_value(region);
            }
            CallbackArgs::CutoutInfo(info) => {
                e.write_value(info);
            }
            CallbackArgs::Display(display) => {
                e.write_pointer(display.ptr);
            }
        }
    }
}
