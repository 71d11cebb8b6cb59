//! Writing side of the wire format.
//!
//! Mirrors every [`WireDecoder`](crate::WireDecoder) read so that a value
//! encoded here decodes back field for field.

use arkwin_common::NativePtr;

use crate::tag::RuntimeTag;

/// A value that can be written to the wire in declared field order.
pub trait Encode {
    fn encode(&self, encoder: &mut WireEncoder);
}

#[derive(Debug, Default, Clone)]
pub struct WireEncoder {
    buf: Vec<u8>,
}

impl WireEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn write_u8(&mut self, value: u8) -> &mut Self {
        self.buf.push(value);
        self
    }

    pub fn write_i8(&mut self, value: i8) -> &mut Self {
        self.buf.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn write_i32(&mut self, value: i32) -> &mut Self {
        self.buf.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn write_i64(&mut self, value: i64) -> &mut Self {
        self.buf.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn write_f32(&mut self, value: f32) -> &mut Self {
        self.buf.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn write_bool(&mut self, value: bool) -> &mut Self {
        self.write_u8(u8::from(value))
    }

    pub fn write_pointer(&mut self, ptr: NativePtr) -> &mut Self {
        self.buf.extend_from_slice(&ptr.0.to_le_bytes());
        self
    }

    /// Integral values that fit in 32 bits go out as `Int32`, everything
    /// else as `Float32`.
    pub fn write_number(&mut self, value: f64) -> &mut Self {
        let is_int = value.fract() == 0.0
            && value >= f64::from(i32::MIN)
            && value <= f64::from(i32::MAX);
        if is_int {
            self.write_i8(RuntimeTag::Int32.as_i8());
            self.write_i32(value as i32)
        } else {
            self.write_i8(RuntimeTag::Float32.as_i8());
            self.write_f32(value as f32)
        }
    }

    pub fn write_undefined(&mut self) -> &mut Self {
        self.write_i8(RuntimeTag::Undefined.as_i8())
    }

    pub fn write_string(&mut self, value: &str) -> &mut Self {
        self.write_count(value.len());
        self.buf.extend_from_slice(value.as_bytes());
        self
    }

    /// Write an element or byte count. Counts must fit in an `i32`; larger
    /// ones trip a debug assertion and are clamped in release builds.
    pub fn write_count(&mut self, count: usize) -> &mut Self {
        debug_assert!(
            i32::try_from(count).is_ok(),
            "count {count} does not fit the wire's i32 prefix"
        );
        let count = i32::try_from(count).unwrap_or(i32::MAX);
        self.write_i32(count)
    }

    pub fn write_value<T: Encode + ?Sized>(&mut self, value: &T) -> &mut Self {
        value.encode(self);
        self
    }

    pub fn write_array<T: Encode>(&mut self, items: &[T]) -> &mut Self {
        self.write_count(items.len());
        for item in items {
            item.encode(self);
        }
        self
    }
}

impl Encode for f64 {
    fn encode(&self, encoder: &mut WireEncoder) {
        encoder.write_number(*self);
    }
}

impl Encode for i32 {
    fn encode(&self, encoder: &mut WireEncoder) {
        encoder.write_i32(*self);
    }
}

impl Encode for bool {
    fn encode(&self, encoder: &mut WireEncoder) {
        encoder.write_bool(*self);
    }
}
