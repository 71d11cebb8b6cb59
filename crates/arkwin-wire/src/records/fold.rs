use arkwin_common::WireError;
use serde::{Deserialize, Serialize};

use crate::decoder::{Decode, WireDecoder, NUMBER_WIRE_SIZE};
use crate::encoder::{Encode, WireEncoder};
use crate::records::Rect;
use crate::Result;

/// Physical fold state of a foldable device.
///
/// The two-digit values describe dual-hinge devices: tens digit for the
/// second hinge, units digit for the first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i32)]
pub enum FoldStatus {
    Unknown = 0,
    Expanded = 1,
    Folded = 2,
    HalfFolded = 3,
    ExpandedWithSecondExpanded = 11,
    FoldedWithSecondExpanded = 12,
    HalfFoldedWithSecondExpanded = 13,
    ExpandedWithSecondHalfFolded = 21,
    FoldedWithSecondHalfFolded = 22,
    HalfFoldedWithSecondHalfFolded = 23,
}

impl TryFrom<i32> for FoldStatus {
    type Error = WireError;

    fn try_from(value: i32) -> std::result::Result<Self, Self::Error> {
        Ok(match value {
            0 => Self::Unknown,
            1 => Self::Expanded,
            2 => Self::Folded,
            3 => Self::HalfFolded,
            11 => Self::ExpandedWithSecondExpanded,
            12 => Self::FoldedWithSecondExpanded,
            13 => Self::HalfFoldedWithSecondExpanded,
            21 => Self::ExpandedWithSecondHalfFolded,
            22 => Self::FoldedWithSecondHalfFolded,
            23 => Self::HalfFoldedWithSecondHalfFolded,
            _ => {
                return Err(WireError::InvalidEnum {
                    name: "FoldStatus",
                    value,
                })
            }
        })
    }
}

impl Decode for FoldStatus {
    const MIN_WIRE_SIZE: usize = 4;

    fn decode(d: &mut WireDecoder<'_>) -> Result<Self> {
        Self::try_from(d.read_i32()?)
    }
}

impl Encode for FoldStatus {
    fn encode(&self, e: &mut WireEncoder) {
        e.write_i32(*self as i32);
    }
}

/// Which panel(s) of a foldable device are showing content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i32)]
pub enum FoldDisplayMode {
    Unknown = 0,
    Full = 1,
    Main = 2,
    Sub = 3,
    Coordination = 4,
}

impl TryFrom<i32> for FoldDisplayMode {
    type Error = WireError;

    fn try_from(value: i32) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Unknown),
            1 => Ok(Self::Full),
            2 => Ok(Self::Main),
            3 => Ok(Self::Sub),
            4 => Ok(Self::Coordination),
            _ => Err(WireError::InvalidEnum {
                name: "FoldDisplayMode",
                value,
            }),
        }
    }
}

impl Decode for FoldDisplayMode {
    const MIN_WIRE_SIZE: usize = 4;

    fn decode(d: &mut WireDecoder<'_>) -> Result<Self> {
        Self::try_from(d.read_i32()?)
    }
}

impl Encode for FoldDisplayMode {
    fn encode(&self, e: &mut WireEncoder) {
        e.write_i32(*self as i32);
    }
}

/// Crease area(s) of a foldable display.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FoldCreaseRegion {
    pub display_id: f64,
    pub crease_rects: Vec<Rect>,
}

impl Decode for FoldCreaseRegion {
    const MIN_WIRE_SIZE: usize = NUMBER_WIRE_SIZE + 4;

    fn decode(d: &mut WireDecoder<'_>) -> Result<Self> {
        let display_id = d.read_number()?;
        let crease_rects = d.read_array()?;
        Ok(Self {
            display_id,
            crease_rects,
        })
    }
}

impl Encode for FoldCreaseRegion {
    fn encode(&self, e: &mut WireEncoder) {
        e.write_number(self.display_id)
            .write_array(&self.crease_rects);
    }
}
