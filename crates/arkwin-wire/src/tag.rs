//! Runtime type tags that prefix dynamically typed values such as numbers.

use arkwin_common::WireError;

/// Tag byte written ahead of a number on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i8)]
pub enum RuntimeTag {
    Undefined = 101,
    Int32 = 102,
    Float32 = 103,
}

impl RuntimeTag {
    pub fn as_i8(self) -> i8 {
        self as i8
    }
}

impl TryFrom<i8> for RuntimeTag {
    type Error = WireError;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            101 => Ok(Self::Undefined),
            102 => Ok(Self::Int32),
            103 => Ok(Self::Float32),
            other => Err(WireError::UnexpectedTag(other)),
        }
    }
}
