//! Codepoint codec: pure encode/decode for every supported encoding.
//!
//! Overview
//! - [`encode`] turns one Unicode scalar value into its wire bytes, at most
//!   four of them, returned as an [`EncodedScalar`] so no allocation is
//!   needed on the unget path.
//! - [`decode`] pulls bytes one at a time from a [`ByteRead`] and produces
//!   one scalar, `Ok(None)` on clean end-of-data, or a
//!   [`MalformedSequence`](StreamError::MalformedSequence) describing the
//!   grammar violation.
//!
//! Invariants
//! - UTF-8 output is byte-identical to RFC 3629 for every valid scalar; the
//!   tests compare against `char::encode_utf8` as the oracle.
//! - UTF-16 never emits or accepts a surrogate half as a standalone value.
//!   The surrogate range is `0xD800..=0xDFFF`, i.e. top five bits `11011`;
//!   the masks below test exactly those five bits (lead/trail add the sixth
//!   bit to tell the halves apart).
//! - A decode that consumed at least one byte of a sequence never reports
//!   clean end-of-data; running out mid-sequence is `TruncatedSequence`.

use crate::{
    encoding::Encoding,
    error::{MalformedKind, StreamError},
    source::ByteRead,
};

/// Largest Unicode scalar value.
pub const MAX_SCALAR: u32 = 0x10_FFFF;

/// Worst-case encoded length of one codepoint, in bytes.
pub const MAX_ENCODED_LEN: usize = 4;

// Top five bits `11011` mark the surrogate range 0xD800..=0xDFFF.
const SURROGATE_RANGE_MASK: u32 = !0x7FF;
const SURROGATE_RANGE: u32 = 0xD800;
// Sixth bit distinguishes lead (0xD800..=0xDBFF) from trail (0xDC00..=0xDFFF).
const HALF_MASK: u16 = 0xFC00;
const LEAD_SURROGATE: u16 = 0xD800;
const TRAIL_SURROGATE: u16 = 0xDC00;

/// The wire bytes of a single encoded codepoint.
///
/// Holds one to four bytes inline; produced by [`encode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodedScalar {
    bytes: [u8; MAX_ENCODED_LEN],
    len: u8,
}

impl EncodedScalar {
    fn new() -> Self {
        Self {
            bytes: [0; MAX_ENCODED_LEN],
            len: 0,
        }
    }

    fn push(&mut self, byte: u8) {
        self.bytes[usize::from(self.len)] = byte;
        self.len += 1;
    }

    fn push_unit(&mut self, unit: [u8; 2]) {
        self.push(unit[0]);
        self.push(unit[1]);
    }

    /// The encoded bytes, in stream order.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..usize::from(self.len)]
    }

    /// Number of encoded bytes (1–4).
    #[must_use]
    pub fn len(&self) -> usize {
        usize::from(self.len)
    }

    /// `true` only for the default empty value; [`encode`] never returns
    /// an empty encoding.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl AsRef<[u8]> for EncodedScalar {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

fn invalid(encoding: Encoding, codepoint: u32) -> StreamError {
    StreamError::InvalidCodepoint {
        encoding,
        codepoint,
    }
}

fn malformed(encoding: Encoding, kind: MalformedKind) -> StreamError {
    StreamError::MalformedSequence { encoding, kind }
}

/// Encodes one Unicode scalar value into its byte representation.
///
/// # Errors
///
/// [`StreamError::InvalidCodepoint`] if the value is outside the encoding's
/// representable range: above `0x7F` for ASCII, above [`MAX_SCALAR`] or
/// inside the surrogate range for the Unicode encodings.
///
/// # Examples
///
/// ```
/// use textstream::{Encoding, encode};
///
/// let pile_of_poo = encode(Encoding::Utf8, 0x1F4A9)?;
/// assert_eq!(pile_of_poo.as_bytes(), [0xF0, 0x9F, 0x92, 0xA9]);
/// # Ok::<(), textstream::StreamError>(())
/// ```
pub fn encode(encoding: Encoding, scalar: u32) -> Result<EncodedScalar, StreamError> {
    match encoding {
        Encoding::Ascii => {
            if scalar > 0x7F {
                return Err(invalid(encoding, scalar));
            }
            let mut out = EncodedScalar::new();
            out.push(scalar as u8);
            Ok(out)
        }
        Encoding::Utf8 => {
            validate_scalar(encoding, scalar)?;
            Ok(encode_utf8(scalar))
        }
        Encoding::Utf16 => {
            validate_scalar(encoding, scalar)?;
            Ok(encode_utf16(scalar, u16::to_ne_bytes))
        }
        Encoding::Utf16Le => {
            validate_scalar(encoding, scalar)?;
            Ok(encode_utf16(scalar, u16::to_le_bytes))
        }
        Encoding::Utf16Be => {
            validate_scalar(encoding, scalar)?;
            Ok(encode_utf16(scalar, u16::to_be_bytes))
        }
    }
}

fn validate_scalar(encoding: Encoding, scalar: u32) -> Result<(), StreamError> {
    if scalar > MAX_SCALAR || scalar & SURROGATE_RANGE_MASK == SURROGATE_RANGE {
        return Err(invalid(encoding, scalar));
    }
    Ok(())
}

fn encode_utf8(scalar: u32) -> EncodedScalar {
    let mut out = EncodedScalar::new();
    if scalar < 0x80 {
        out.push(scalar as u8);
    } else if scalar < 0x800 {
        out.push(0b1100_0000 | (scalar >> 6) as u8);
        out.push(0b1000_0000 | (scalar & 0x3F) as u8);
    } else if scalar < 0x1_0000 {
        out.push(0b1110_0000 | (scalar >> 12) as u8);
        out.push(0b1000_0000 | (scalar >> 6 & 0x3F) as u8);
        out.push(0b1000_0000 | (scalar & 0x3F) as u8);
    } else {
        out.push(0b1111_0000 | (scalar >> 18) as u8);
        out.push(0b1000_0000 | (scalar >> 12 & 0x3F) as u8);
        out.push(0b1000_0000 | (scalar >> 6 & 0x3F) as u8);
        out.push(0b1000_0000 | (scalar & 0x3F) as u8);
    }
    out
}

fn encode_utf16(scalar: u32, unit_bytes: fn(u16) -> [u8; 2]) -> EncodedScalar {
    let mut out = EncodedScalar::new();
    if let Ok(unit) = u16::try_from(scalar) {
        out.push_unit(unit_bytes(unit));
    } else {
        let v = scalar - 0x1_0000;
        out.push_unit(unit_bytes(LEAD_SURROGATE | (v >> 10) as u16));
        out.push_unit(unit_bytes(TRAIL_SURROGATE | (v & 0x3FF) as u16));
    }
    out
}

/// Decodes one codepoint from `bytes` in the given encoding.
///
/// Returns `Ok(None)` on clean end-of-data, i.e. when the stream ends
/// before the first byte of a codepoint. End-of-data anywhere later in a
/// multi-byte sequence is a [`MalformedSequence`] with
/// [`MalformedKind::TruncatedSequence`].
///
/// # Errors
///
/// [`MalformedSequence`] on any grammar violation, and any I/O error the
/// byte source reports.
///
/// [`MalformedSequence`]: StreamError::MalformedSequence
///
/// # Examples
///
/// ```
/// use textstream::{Encoding, decode};
///
/// let mut bytes: &[u8] = &[0xF0, 0x9F, 0x92, 0xA9];
/// assert_eq!(decode(Encoding::Utf8, &mut bytes)?, Some('💩'));
/// assert_eq!(decode(Encoding::Utf8, &mut bytes)?, None);
/// # Ok::<(), textstream::StreamError>(())
/// ```
pub fn decode<R: ByteRead + ?Sized>(
    encoding: Encoding,
    bytes: &mut R,
) -> Result<Option<char>, StreamError> {
    match encoding {
        Encoding::Ascii => {
            let Some(byte) = bytes.next_byte()? else {
                return Ok(None);
            };
            if byte > 0x7F {
                return Err(malformed(encoding, MalformedKind::InvalidLeadByte(byte)));
            }
            Ok(Some(char::from(byte)))
        }
        Encoding::Utf8 => decode_utf8(bytes),
        Encoding::Utf16 => decode_utf16(bytes, encoding, u16::from_ne_bytes),
        Encoding::Utf16Le => decode_utf16(bytes, encoding, u16::from_le_bytes),
        Encoding::Utf16Be => decode_utf16(bytes, encoding, u16::from_be_bytes),
    }
}

fn decode_utf8<R: ByteRead + ?Sized>(bytes: &mut R) -> Result<Option<char>, StreamError> {
    let Some(lead) = bytes.next_byte()? else {
        return Ok(None);
    };

    // Leading 1-bits of the lead byte give the sequence length.
    let len = match lead {
        0x00..=0x7F => return Ok(Some(char::from(lead))),
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => return Err(malformed(Encoding::Utf8, MalformedKind::InvalidLeadByte(lead))),
    };

    let mut scalar = u32::from(lead & (0x7F >> len));
    for _ in 1..len {
        let Some(next) = bytes.next_byte()? else {
            return Err(malformed(Encoding::Utf8, MalformedKind::TruncatedSequence));
        };
        if next & 0b1100_0000 != 0b1000_0000 {
            return Err(malformed(
                Encoding::Utf8,
                MalformedKind::InvalidContinuation(next),
            ));
        }
        scalar = scalar << 6 | u32::from(next & 0b0011_1111);
    }

    // Rejects surrogate-range payloads (CESU-8 style input).
    char::from_u32(scalar)
        .map(Some)
        .ok_or(malformed(Encoding::Utf8, MalformedKind::InvalidScalar(scalar)))
}

fn decode_utf16<R: ByteRead + ?Sized>(
    bytes: &mut R,
    encoding: Encoding,
    unit_from: fn([u8; 2]) -> u16,
) -> Result<Option<char>, StreamError> {
    let Some(first) = next_unit(bytes, encoding, unit_from)? else {
        return Ok(None);
    };

    if first & HALF_MASK == TRAIL_SURROGATE {
        return Err(malformed(encoding, MalformedKind::UnpairedSurrogate(first)));
    }
    if first & HALF_MASK != LEAD_SURROGATE {
        return char::from_u32(u32::from(first)).map(Some).ok_or(malformed(
            encoding,
            MalformedKind::InvalidScalar(u32::from(first)),
        ));
    }

    let Some(second) = next_unit(bytes, encoding, unit_from)? else {
        return Err(malformed(encoding, MalformedKind::TruncatedSequence));
    };
    if second & HALF_MASK != TRAIL_SURROGATE {
        return Err(malformed(encoding, MalformedKind::UnpairedSurrogate(first)));
    }

    let scalar = (u32::from(first & 0x3FF) << 10 | u32::from(second & 0x3FF)) + 0x1_0000;
    char::from_u32(scalar)
        .map(Some)
        .ok_or(malformed(encoding, MalformedKind::InvalidScalar(scalar)))
}

/// Reads one 16-bit unit, or `None` if the stream ended cleanly before its
/// first byte. Ending between the two bytes of a unit is a truncation.
fn next_unit<R: ByteRead + ?Sized>(
    bytes: &mut R,
    encoding: Encoding,
    unit_from: fn([u8; 2]) -> u16,
) -> Result<Option<u16>, StreamError> {
    let Some(first) = bytes.next_byte()? else {
        return Ok(None);
    };
    let Some(second) = bytes.next_byte()? else {
        return Err(malformed(encoding, MalformedKind::TruncatedSequence));
    };
    Ok(Some(unit_from([first, second])))
}
