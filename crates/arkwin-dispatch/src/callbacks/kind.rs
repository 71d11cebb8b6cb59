use arkwin_common::DispatchError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Argument shape of a callback, as carried in the callback event header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i32)]
pub enum CallbackKind {
    Void = 0,
    Number = 1,
    Boolean = 2,
    FoldStatus = 3,
    FoldDisplayMode = 4,
    NumberArray = 5,
    Rect = 6,
    RectArray = 7,
    FoldCreaseRegion = 8,
    CutoutInfo = 9,
    Display = 10,
}

impl CallbackKind {
    pub const ALL: [CallbackKind; 11] = [
        CallbackKind::Void,
        CallbackKind::Number,
        CallbackKind::Boolean,
        CallbackKind::FoldStatus,
        CallbackKind::FoldDisplayMode,
        CallbackKind::NumberArray,
        CallbackKind::Rect,
        CallbackKind::RectArray,
        CallbackKind::FoldCreaseRegion,
        CallbackKind::CutoutInfo,
        CallbackKind::Display,
    ];

    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn name(self) -> &'static str {
        match self {
            CallbackKind::Void => "Void",
            CallbackKind::Number => "Number",
            CallbackKind::Boolean => "Boolean",
            CallbackKind::FoldStatus => "FoldStatus",
            CallbackKind::FoldDisplayMode => "FoldDisplayMode",
            CallbackKind::NumberArray => "NumberArray",
            CallbackKind::Rect => "Rect",
            CallbackKind::RectArray => "RectArray",
            CallbackKind::FoldCreaseRegion => "FoldCreaseRegion",
            CallbackKind::CutoutInfo => "CutoutInfo",
            CallbackKind::Display => "Display",
        }
    }
}

impl TryFrom<i32> for CallbackKind {
    type Error = DispatchError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        CallbackKind::ALL
            .into_iter()
            .find(|k| k.as_i32() == value)
            .ok_or(DispatchError::UnknownCallbackKind(value))
    }
}

impl fmt::Display for CallbackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
