//! Bounded LIFO byte store backing `ungetc`.
//!
//! The buffer always holds UTF-8 bytes, whatever the stream's wire
//! encoding: `ungetc` re-encodes each codepoint to UTF-8 before pushing,
//! and the reader decodes in UTF-8 mode while pushed-back input is
//! pending. Bytes are pushed in reverse so popping reproduces them in
//! stream order.

use crate::{
    codec::{EncodedScalar, MAX_ENCODED_LEN},
    error::StreamError,
};

/// Total capacity, in bytes. Worst case one codepoint takes
/// [`MAX_ENCODED_LEN`] bytes, so at least 128 codepoints always fit.
pub const PUSHBACK_CAPACITY: usize = 512;

#[derive(Debug)]
pub(crate) struct PushbackBuffer {
    bytes: [u8; PUSHBACK_CAPACITY],
    len: usize,
}

impl PushbackBuffer {
    pub(crate) fn new() -> Self {
        Self {
            bytes: [0; PUSHBACK_CAPACITY],
            len: 0,
        }
    }

    /// Pushes one encoded codepoint, last byte first.
    ///
    /// Fails with [`StreamError::Overflow`] when fewer than
    /// [`MAX_ENCODED_LEN`] bytes remain, leaving the buffer untouched.
    pub(crate) fn push_codepoint(&mut self, encoded: &EncodedScalar) -> Result<(), StreamError> {
        if PUSHBACK_CAPACITY - self.len < MAX_ENCODED_LEN {
            return Err(StreamError::Overflow {
                capacity: PUSHBACK_CAPACITY,
            });
        }
        for &byte in encoded.as_bytes().iter().rev() {
            self.bytes[self.len] = byte;
            self.len += 1;
        }
        Ok(())
    }

    /// Pops the most recently pushed byte.
    pub(crate) fn pop(&mut self) -> Option<u8> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        Some(self.bytes[self.len])
    }

    pub(crate) fn clear(&mut self) {
        self.len = 0;
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }
}
