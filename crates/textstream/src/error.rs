//! Error taxonomy for encoding, decoding, and stream operations.

use std::io;

use thiserror::Error;

use crate::encoding::Encoding;

/// Any failure surfaced by the codec or the stream reader.
///
/// Encode/decode results are discriminated; there are no sentinel values and
/// no out-of-band error codes. A truncated multi-byte sequence at genuine
/// end-of-data is reported as [`StreamError::MalformedSequence`] with
/// [`MalformedKind::TruncatedSequence`], distinct from a clean end-of-data
/// (`Ok(None)` from the decode side), so callers can tell "ran out
/// mid-character" from "end of text".
#[derive(Debug, Error)]
pub enum StreamError {
    /// The codepoint cannot be represented in the requested encoding.
    #[error("U+{codepoint:04X} is not representable in {encoding}")]
    InvalidCodepoint {
        /// The encoding that rejected the value.
        encoding: Encoding,
        /// The offending scalar value.
        codepoint: u32,
    },

    /// The byte stream violates the encoding's grammar.
    #[error("malformed {encoding} sequence: {kind}")]
    MalformedSequence {
        /// The encoding being decoded when the violation was found.
        encoding: Encoding,
        /// What exactly was wrong.
        kind: MalformedKind,
    },

    /// The pushback buffer cannot hold another codepoint.
    #[error("pushback buffer overflow (capacity {capacity} bytes)")]
    Overflow {
        /// Total capacity of the buffer, in bytes.
        capacity: usize,
    },

    /// An encoding label named no supported encoding.
    #[error("unsupported encoding {0:?}")]
    UnsupportedEncoding(String),

    /// The underlying source failed to open, read, or seek.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// The specific grammar violation behind a
/// [`MalformedSequence`](StreamError::MalformedSequence).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MalformedKind {
    /// A byte that cannot start a sequence (UTF-8 continuation byte or
    /// `0xF8..=0xFF` in lead position, or a non-ASCII byte in ASCII mode).
    #[error("invalid leading byte 0x{0:02X}")]
    InvalidLeadByte(u8),

    /// A UTF-8 continuation position held a byte without the `10` tag.
    #[error("invalid continuation byte 0x{0:02X}")]
    InvalidContinuation(u8),

    /// End-of-data in the middle of a multi-byte sequence.
    #[error("truncated sequence at end of data")]
    TruncatedSequence,

    /// A lead surrogate without a trail, or a lone trail surrogate.
    #[error("unpaired surrogate 0x{0:04X}")]
    UnpairedSurrogate(u16),

    /// The decoded value is not a Unicode scalar value.
    #[error("invalid scalar value 0x{0:X}")]
    InvalidScalar(u32),
}

impl StreamError {
    /// Whether this error is a decode-time grammar violation.
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        matches!(self, StreamError::MalformedSequence { .. })
    }

    /// The grammar violation detail, if this is a malformed-sequence error.
    #[must_use]
    pub fn malformed_kind(&self) -> Option<MalformedKind> {
        match self {
            StreamError::MalformedSequence { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}
