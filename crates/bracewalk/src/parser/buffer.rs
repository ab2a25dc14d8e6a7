use alloc::vec::Vec;

use bstr::BStr;

use crate::error::CapacityError;

/// Bytes preallocated per buffer; larger limits grow on demand, up to the
/// limit, and keep their storage across runs.
const PREALLOCATE: usize = 256;

/// Where the reader writes the bytes of a string token.
pub(crate) trait Sink {
    /// A new string token starts.
    fn begin(&mut self);
    fn push(&mut self, byte: u8) -> Result<(), CapacityError>;
}

/// Bounded, reusable string token buffer.
#[derive(Debug)]
pub(crate) struct StringBuffer {
    bytes: Vec<u8>,
    max: usize,
}

impl StringBuffer {
    pub(crate) fn new(max: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(max.min(PREALLOCATE)),
            max,
        }
    }

    #[inline(always)]
    pub(crate) fn as_bstr(&self) -> &BStr {
        BStr::new(&self.bytes)
    }
}

impl Sink for StringBuffer {
    #[inline(always)]
    fn begin(&mut self) {
        self.bytes.clear();
    }

    #[inline(always)]
    fn push(&mut self, byte: u8) -> Result<(), CapacityError> {
        if self.bytes.len() == self.max {
            return Err(CapacityError::StringTooLong { max: self.max });
        }
        self.bytes.push(byte);
        Ok(())
    }
}

/// Sink for skipped content: keeps nothing and never overflows.
pub(crate) struct Discard;

impl Sink for Discard {
    #[inline(always)]
    fn begin(&mut self) {}

    #[inline(always)]
    fn push(&mut self, _: u8) -> Result<(), CapacityError> {
        Ok(())
    }
}
