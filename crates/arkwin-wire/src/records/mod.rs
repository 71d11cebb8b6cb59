//! Display records exchanged with the native display service.
//!
//! Every record is a plain value: no identity, structural equality, and a
//! fixed positional layout on the wire.

mod cutout;
mod fold;
mod rect;

pub use cutout::CutoutInfo;
pub use fold::{FoldCreaseRegion, FoldDisplayMode, FoldStatus};
pub use rect::{Rect, WaterfallDisplayAreaRects};
