use serde::{Deserialize, Serialize};

use crate::decoder::{Decode, WireDecoder};
use crate::encoder::{Encode, WireEncoder};
use crate::records::{Rect, WaterfallDisplayAreaRects};
use crate::Result;

/// Unusable display areas: notches, punch holes and curved edges.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CutoutInfo {
    pub bounding_rects: Vec<Rect>,
    pub waterfall_display_area_rects: WaterfallDisplayAreaRects,
}

impl Decode for CutoutInfo {
    const MIN_WIRE_SIZE: usize = 4 + WaterfallDisplayAreaRects::MIN_WIRE_SIZE;

    fn decode(d: &mut WireDecoder<'_>) -> Result<Self> {
        let bounding_rects = d.read_array()?;
        let waterfall_display_area_rects = d.read_value()?;
        Ok(Self {
            bounding_rects,
            waterfall_display_area_rects,
        })
    }
}

impl Encode for CutoutInfo {
    fn encode(&self, e: &mut WireEncoder) {
        e.write_array(&self.bounding_rects)
            .write_value(&self.waterfall_display_area_rects);
    }
}
