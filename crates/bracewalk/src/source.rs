//! Byte sources feeding the token reader.
//!
//! The reader consumes its source strictly forward, with one byte of
//! pushback: after reading a byte it may [`reject`](ByteSource::reject) it so
//! the next read returns it again. That single byte of lookahead is all the
//! grammar needs (ending an unquoted run, recognizing a doubled quote).

#[cfg(feature = "std")]
use alloc::{boxed::Box, vec};

use crate::error::SourceError;

/// A sequential byte source with one byte of pushback.
pub trait ByteSource {
    /// Reads the next byte. `Ok(None)` signals the end of data; once
    /// returned, every later read returns it too.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] if the underlying input fails.
    fn next_byte(&mut self) -> Result<Option<u8>, SourceError>;

    /// Pushes back the byte most recently returned by
    /// [`next_byte`](Self::next_byte). A no-op after end of data.
    fn reject(&mut self);
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    #[inline]
    fn next_byte(&mut self) -> Result<Option<u8>, SourceError> {
        (**self).next_byte()
    }

    #[inline]
    fn reject(&mut self) {
        (**self).reject();
    }
}

/// A source over an in-memory byte slice.
#[derive(Debug, Clone)]
pub struct SliceSource<'a> {
    bytes: &'a [u8],
    pos: usize,
    rejectable: bool,
}

impl<'a> SliceSource<'a> {
    /// Creates a source reading `bytes` from the start.
    #[must_use]
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            pos: 0,
            rejectable: false,
        }
    }

    /// Bytes not yet read.
    #[must_use]
    pub fn remaining(&self) -> &'a [u8] {
        &self.bytes[self.pos..]
    }
}

impl ByteSource for SliceSource<'_> {
    #[inline(always)]
    fn next_byte(&mut self) -> Result<Option<u8>, SourceError> {
        let byte = self.bytes.get(self.pos).copied();
        self.rejectable = byte.is_some();
        if byte.is_some() {
            self.pos += 1;
        }
        Ok(byte)
    }

    #[inline(always)]
    fn reject(&mut self) {
        if core::mem::take(&mut self.rejectable) {
            self.pos -= 1;
        }
    }
}

/// Default read-ahead size of a [`ReaderSource`].
#[cfg(feature = "std")]
const DEFAULT_READ_AHEAD: usize = 8 * 1024;

/// A source over any [`std::io::Read`], reading ahead in fixed-size blocks.
///
/// Interrupted reads are retried; any other I/O failure ends the run with a
/// [`SourceError`].
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct ReaderSource<R> {
    reader: R,
    block: Box<[u8]>,
    pos: usize,
    len: usize,
    last: Option<u8>,
    pending: Option<u8>,
    done: bool,
}

#[cfg(feature = "std")]
impl<R: std::io::Read> ReaderSource<R> {
    /// Wraps `reader` with the default read-ahead.
    pub fn new(reader: R) -> Self {
        Self::with_capacity(DEFAULT_READ_AHEAD, reader)
    }

    /// Wraps `reader`, reading at most `capacity` bytes per call (at least
    /// one).
    pub fn with_capacity(capacity: usize, reader: R) -> Self {
        Self {
            reader,
            block: vec![0; capacity.max(1)].into_boxed_slice(),
            pos: 0,
            len: 0,
            last: None,
            pending: None,
            done: false,
        }
    }

    /// Unwraps the reader. Read-ahead bytes not yet consumed are lost.
    pub fn into_inner(self) -> R {
        self.reader
    }

    fn fill(&mut self) -> Result<(), SourceError> {
        loop {
            match self.reader.read(&mut self.block) {
                Ok(0) => {
                    self.done = true;
                    return Ok(());
                }
                Ok(n) => {
                    self.pos = 0;
                    self.len = n;
                    return Ok(());
                }
                Err(err) if err.kind() == std::io::ErrorKind::Interrupted => {}
                Err(err) => return Err(err.into()),
            }
        }
    }
}

#[cfg(feature = "std")]
impl<R: std::io::Read> ByteSource for ReaderSource<R> {
    fn next_byte(&mut self) -> Result<Option<u8>, SourceError> {
        if let Some(byte) = self.pending.take() {
            self.last = Some(byte);
            return Ok(Some(byte));
        }
        if self.pos == self.len && !self.done {
            self.fill()?;
        }
        if self.pos == self.len {
            self.last = None;
            return Ok(None);
        }
        let byte = self.block[self.pos];
        self.pos += 1;
        self.last = Some(byte);
        Ok(Some(byte))
    }

    fn reject(&mut self) {
        self.pending = self.last.take();
    }
}
