//! Encoding-aware text streams.
//!
//! A [`StreamReader`] decodes raw bytes from a file, a memory buffer, or a
//! wide-unit console into Unicode codepoints one at a time, and encodes
//! codepoints back into bytes, for ASCII, UTF-8, and UTF-16 in native,
//! little-endian, or big-endian order. Around the codec it provides BOM
//! detection, multi-codepoint pushback, encoding-relative seeking, and
//! explicit EOF/error state.
//!
//! ```
//! use textstream::{Encoding, StreamReader, Whence};
//!
//! // A UTF-16LE buffer with its BOM; auto-detect adopts and skips it.
//! let bytes = b"\xFF\xFEh\x00i\x00";
//! let mut reader = StreamReader::from_slice(bytes, None)?;
//! assert_eq!(reader.encoding(), Encoding::Utf16Le);
//! assert_eq!(reader.getc()?, Some('h'));
//!
//! // Rewind to the first character after the mark.
//! reader.seek(0, Whence::TextStart)?;
//! assert_eq!(reader.getc()?, Some('h'));
//! # Ok::<(), textstream::StreamError>(())
//! ```

mod bom;
mod codec;
mod encoding;
mod error;
mod pushback;
mod reader;
mod source;

#[cfg(test)]
mod tests;

pub use codec::{EncodedScalar, MAX_ENCODED_LEN, MAX_SCALAR, decode, encode};
pub use encoding::Encoding;
pub use error::{MalformedKind, StreamError};
pub use pushback::PUSHBACK_CAPACITY;
pub use reader::{StreamReader, Whence};
pub use source::ByteRead;
