use serde::{Deserialize, Serialize};

use crate::decoder::{Decode, WireDecoder, NUMBER_WIRE_SIZE};
use crate::encoder::{Encode, WireEncoder};
use crate::Result;

/// Axis-aligned rectangle in display pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

impl Decode for Rect {
    const MIN_WIRE_SIZE: usize = 4 * NUMBER_WIRE_SIZE;

    fn decode(d: &mut WireDecoder<'_>) -> Result<Self> {
        let left = d.read_number()?;
        let top = d.read_number()?;
        let width = d.read_number()?;
        let height = d.read_number()?;
        Ok(Self {
            left,
            top,
            width,
            height,
        })
    }
}

impl Encode for Rect {
    fn encode(&self, e: &mut WireEncoder) {
        e.write_number(self.left)
            .write_number(self.top)
            .write_number(self.width)
            .write_number(self.height);
    }
}

/// Curved-edge areas of a waterfall display, one rectangle per side.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WaterfallDisplayAreaRects {
    pub left: Rect,
    pub right: Rect,
    pub top: Rect,
    pub bottom: Rect,
}

impl Decode for WaterfallDisplayAreaRects {
    const MIN_WIRE_SIZE: usize = 4 * Rect::MIN_WIRE_SIZE;

    fn decode(d: &mut WireDecoder<'_>) -> Result<Self> {
        let left = d.read_value()?;
        let right = d.read_value()?;
        let top = d.read_value()?;
        let bottom = d.read_value()?;
        Ok(Self {
            left,
            right,
            top,
            bottom,
        })
    }
}

impl Encode for WaterfallDisplayAreaRects {
    fn encode(&self, e: &mut WireEncoder) {
        e.write_value(&self.left)
            .write_value(&self.right)
            .write_value(&self.top)
            .write_value(&self.bottom);
    }
}
