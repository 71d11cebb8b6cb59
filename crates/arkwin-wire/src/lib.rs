//! Positional wire format shared with the native display service.
//!
//! Values cross the boundary as a flat little-endian byte sequence with no
//! field names: fixed-width primitives, tagged numbers and count-prefixed
//! arrays, always in declared field order. [`WireDecoder`] reads them back
//! out of a borrowed buffer with a bounds-checked cursor; [`WireEncoder`] is
//! the writing counterpart used by the native side's serializer, tests and
//! capture tooling.

pub mod decoder;
pub mod encoder;
pub mod handle;
pub mod records;
pub mod tag;

pub use decoder::{Decode, WireDecoder};
pub use encoder::{Encode, WireEncoder};
pub use handle::HandleFactory;
pub use records::{
    CutoutInfo, FoldCreaseRegion, FoldDisplayMode, FoldStatus, Rect, WaterfallDisplayAreaRects,
};
pub use tag::RuntimeTag;

pub type Result<T> = std::result::Result<T, arkwin_common::WireError>;
