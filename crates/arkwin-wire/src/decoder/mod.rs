//! Bounds-checked positional reader over a borrowed boundary buffer.

use arkwin_common::{NativePtr, WireError};
use tracing::debug;

use crate::handle::HandleFactory;
use crate::tag::RuntimeTag;
use crate::Result;


/// Encoded size of a required tagged number: tag byte plus 32-bit payload.
pub const NUMBER_WIRE_SIZE: usize = 5;

/// A value that can be read from the wire in declared field order.
pub trait Decode: Sized {
    /// Smallest number of bytes any encoding of `Self` can occupy.
    ///
    /// Used to reject array counts that cannot possibly fit in the bytes
    /// that remain, before any element is decoded.
    const MIN_WIRE_SIZE: usize;

    fn decode(decoder: &mut WireDecoder<'_>) -> Result<Self>;
}

/// Reads primitives and records from a byte slice.
///
/// The slice is the logical extent of one message; the cursor never moves
/// past its end. Every read either consumes exactly the bytes of its value or
/// fails without producing a value.
#[derive(Debug)]
pub struct WireDecoder<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> WireDecoder<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Current cursor offset from the start of the buffer.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Move the cursor back to the start of the buffer.
    pub fn reset(&mut self) {
        self.pos = 0;
    }

    fn take(&mut self, needed: usize) -> Result<&'a [u8]> {
        let remaining = self.remaining();
        if needed > remaining {
            return Err(WireError::BufferUnderrun {
                offset: self.pos,
                needed,
                remaining,
            });
        }
        let bytes = &self.buf[self.pos..self.pos + needed];
        self.pos += needed;
        Ok(bytes)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take_array::<1>()?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(i8::from_le_bytes(self.take_array()?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.take_array()?))
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(i64::from_le_bytes(self.take_array()?))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_le_bytes(self.take_array()?))
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(WireError::InvalidBool(other)),
        }
    }

    pub fn read_pointer(&mut self) -> Result<NativePtr> {
        Ok(NativePtr(u64::from_le_bytes(self.take_array()?)))
    }

    /// Read a tagged number. `Undefined` is rejected: callers that reach
    /// this read require a value. On failure the cursor is left where the
    /// tag byte starts.
    pub fn read_number(&mut self) -> Result<f64> {
        let start = self.pos;
        let value = self.read_tagged_number();
        if value.is_err() {
            self.pos = start;
        }
        value
    }

    fn read_tagged_number(&mut self) -> Result<f64> {
        let raw = self.read_i8()?;
        match RuntimeTag::try_from(raw)? {
            RuntimeTag::Int32 => Ok(f64::from(self.read_i32()?)),
            RuntimeTag::Float32 => Ok(f64::from(self.read_f32()?)),
            RuntimeTag::Undefined => Err(WireError::UnexpectedTag(raw)),
        }
    }

    pub fn read_string(&mut self) -> Result<String> {
        let len = self.read_count(1)?;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| WireError::InvalidUtf8)
    }

    /// Read a 32-bit element count and check it against the bytes left.
    ///
    /// `min_element_size` is the smallest encoding of one element; a count
    /// that could not fit even at that size fails here instead of part way
    /// through the elements.
    pub fn read_count(&mut self, min_element_size: usize) -> Result<usize> {
        let offset = self.pos;
        let count = self.read_i32()?;
        let count = usize::try_from(count).map_err(|_| WireError::NegativeCount(count))?;
        let remaining = self.remaining();
        let min_bytes = count.saturating_mul(min_element_size);
        if min_bytes > remaining {
            debug!(offset, count, remaining, "rejecting oversized element count");
            return Err(WireError::CountExceedsBuffer {
                count,
                min_bytes,
                remaining,
            });
        }
        Ok(count)
    }

    pub fn read_value<T: Decode>(&mut self) -> Result<T> {
        T::decode(self)
    }

    /// Read a count-prefixed array. A count of zero yields an empty vector.
    pub fn read_array<T: Decode>(&mut self) -> Result<Vec<T>> {
        let count = self.read_count(T::MIN_WIRE_SIZE)?;
        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            items.push(T::decode(self)?);
        }
        Ok(items)
    }

    /// Read a pointer-sized value and let `factory` turn it into a handle.
    pub fn read_handle<F>(&mut self, factory: &F) -> Result<F::Handle>
    where
        F: HandleFactory + ?Sized,
    {
        let ptr = self.read_pointer()?;
        if ptr.is_null() {
            return Err(WireError::NullHandle);
        }
        factory.wrap(ptr)
    }
}

/// Tagged number.
impl Decode for f64 {
    const MIN_WIRE_SIZE: usize = NUMBER_WIRE_SIZE;

    fn decode(decoder: &mut WireDecoder<'_>) -> Result<Self> {
        decoder.read_number()
    }
}

impl Decode for i32 {
    const MIN_WIRE_SIZE: usize = 4;

    fn decode(decoder: &mut WireDecoder<'_>) -> Result<Self> {
        decoder.read_i32()
    }
}

impl Decode for bool {
    const MIN_WIRE_SIZE: usize = 1;

    fn decode(decoder: &mut WireDecoder<'_>) -> Result<Self> {
        decoder.read_bool()
    }
}
