//! The codepoint-level stream reader.
//!
//! Overview
//! - [`StreamReader`] composes a byte source, the pushback buffer, and the
//!   codec into a `getc`/`ungetc`/`seek`/`tell` surface.
//! - Construction detects a leading BOM (on seekable sources), resolves
//!   the effective encoding against the caller's declaration, and seeks to
//!   the first byte of text.
//!
//! State machine
//! - A read from the open state may end at clean end-of-data (`Ok(None)`,
//!   `at_eof` set) or fail (`Err`, `has_error` set). `at_eof` is cleared at
//!   the start of every read attempt and by every successful seek;
//!   `has_error` persists until [`clear_error`](StreamReader::clear_error)
//!   or a successful seek. Closing consumes the reader, so the closed
//!   state is unreachable by any further call.
//!
//! Pushback
//! - The pushback buffer stores UTF-8 regardless of the wire encoding.
//!   While pushed-back codepoints are pending, every decode runs in UTF-8
//!   mode; the counter goes down once per decoded codepoint and the
//!   buffer's bytes are always served before source bytes.

use std::{
    fs::File,
    io::{self, Read, SeekFrom},
    path::Path,
};

use crate::{
    bom, codec,
    encoding::Encoding,
    error::StreamError,
    pushback::PushbackBuffer,
    source::{ByteRead, ByteSource, FileSource, MemorySource, WideSource},
};

/// Reference point for [`StreamReader::seek`] offsets.
///
/// The `Byte*` variants measure from the true start, current position, or
/// end of the underlying source. The `Text*` family measures from the
/// first byte after any detected BOM: `TextStart` adds the BOM length to
/// the offset, while `TextCurrent` and `TextEnd` coincide with their byte
/// counterparts because the current position and the end already lie past
/// the mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Whence {
    /// Absolute byte offset from the start of the source.
    ByteStart,
    /// Relative to the current byte position.
    ByteCurrent,
    /// Relative to the end of the source.
    ByteEnd,
    /// Absolute offset from the first post-BOM byte.
    TextStart,
    /// Relative to the current position (text view).
    TextCurrent,
    /// Relative to the end (text view).
    TextEnd,
}

/// A Unicode-aware reader over a file, a memory buffer, or a wide console.
///
/// # Examples
///
/// ```
/// use textstream::{Encoding, StreamReader};
///
/// // UTF-8 BOM, then text; auto-detect adopts the mark and skips it.
/// let mut reader = StreamReader::from_slice(b"\xEF\xBB\xBFhi", None)?;
/// assert_eq!(reader.encoding(), Encoding::Utf8);
/// assert_eq!(reader.getc()?, Some('h'));
/// reader.ungetc('h')?;
/// assert_eq!(reader.getc()?, Some('h'));
/// assert_eq!(reader.getc()?, Some('i'));
/// assert_eq!(reader.getc()?, None);
/// assert!(reader.at_eof());
/// # Ok::<(), textstream::StreamError>(())
/// ```
#[derive(Debug)]
pub struct StreamReader<'a> {
    source: ByteSource<'a>,
    pushback: PushbackBuffer,
    /// Codepoints pushed back and not yet re-read.
    pending_ungets: usize,
    encoding: Encoding,
    /// Byte offset of the first text byte: 0, 2, or 3. Assigned once,
    /// during construction.
    text_start: u64,
    at_eof: bool,
    has_error: bool,
}

impl StreamReader<'static> {
    /// Opens the file at `path` and owns the handle.
    ///
    /// `encoding` declares the expected wire encoding; `None` auto-detects
    /// from the BOM, falling back to UTF-8 when there is none.
    ///
    /// # Errors
    ///
    /// Any I/O failure while opening or during BOM detection.
    pub fn open(path: impl AsRef<Path>, encoding: Option<Encoding>) -> Result<Self, StreamError> {
        let file = File::open(path)?;
        Self::with_source(ByteSource::File(FileSource::new(file, true)), encoding)
    }

    /// Wraps a caller-supplied handle.
    ///
    /// [`close`](StreamReader::close) hands the file back instead of
    /// closing it, unless told to force-close.
    ///
    /// # Errors
    ///
    /// Any I/O failure during BOM detection or the initial seek.
    pub fn from_file(file: File, encoding: Option<Encoding>) -> Result<Self, StreamError> {
        Self::with_source(ByteSource::File(FileSource::new(file, false)), encoding)
    }

    /// Reads from a buffer the reader owns.
    ///
    /// # Errors
    ///
    /// BOM detection over memory cannot fail; the signature matches the
    /// other constructors.
    pub fn from_vec(data: Vec<u8>, encoding: Option<Encoding>) -> Result<Self, StreamError> {
        Self::with_source(ByteSource::Memory(MemorySource::new(data.into())), encoding)
    }

    /// Reads 16-bit console units through a byte-oriented view.
    ///
    /// For platforms whose console input is only available in wide units:
    /// each native-endian unit is fetched once and its bytes served one at
    /// a time. The input is not seekable, so no BOM detection runs and the
    /// encoding must be declared; pair it with [`Encoding::Utf16`].
    pub fn from_wide_console(input: impl Read + 'static, encoding: Encoding) -> Self {
        Self {
            source: ByteSource::Wide(WideSource::new(Box::new(input))),
            pushback: PushbackBuffer::new(),
            pending_ungets: 0,
            encoding,
            text_start: 0,
            at_eof: false,
            has_error: false,
        }
    }
}

impl<'a> StreamReader<'a> {
    /// Reads from a borrowed byte slice.
    ///
    /// # Errors
    ///
    /// BOM detection over memory cannot fail; the signature matches the
    /// other constructors.
    pub fn from_slice(data: &'a [u8], encoding: Option<Encoding>) -> Result<Self, StreamError> {
        Self::with_source(ByteSource::Memory(MemorySource::new(data.into())), encoding)
    }

    fn with_source(
        mut source: ByteSource<'a>,
        declared: Option<Encoding>,
    ) -> Result<Self, StreamError> {
        let detected = bom::detect(&mut source)?;
        // A mark is adopted only when it agrees with the declaration, or
        // when the caller asked for auto-detection.
        let (encoding, text_start) = match (declared, detected) {
            (None, Some(report)) => (report.encoding, report.len),
            (Some(declared), Some(report)) if declared == report.encoding => {
                (declared, report.len)
            }
            (Some(declared), _) => (declared, 0),
            (None, None) => (Encoding::Utf8, 0),
        };
        // Detection consumed real bytes; land on the first text byte.
        source.seek(SeekFrom::Start(text_start))?;
        Ok(Self {
            source,
            pushback: PushbackBuffer::new(),
            pending_ungets: 0,
            encoding,
            text_start,
            at_eof: false,
            has_error: false,
        })
    }

    /// The effective wire encoding after BOM resolution.
    #[must_use]
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Byte offset of the first text byte (0 without a BOM, 2 or 3 with).
    #[must_use]
    pub fn text_start(&self) -> u64 {
        self.text_start
    }

    /// Whether the last read ran off the end of the data.
    ///
    /// Cleared by every new read attempt and by a successful seek.
    #[must_use]
    pub fn at_eof(&self) -> bool {
        self.at_eof
    }

    /// Whether a decode or I/O failure is pending acknowledgement.
    #[must_use]
    pub fn has_error(&self) -> bool {
        self.has_error
    }

    /// Acknowledges a failure, clearing [`has_error`](Self::has_error).
    pub fn clear_error(&mut self) {
        self.has_error = false;
    }

    /// Reads the next codepoint. `Ok(None)` is clean end-of-data.
    ///
    /// Pushed-back codepoints are returned first; while any are pending
    /// the decode runs in UTF-8 mode regardless of the wire encoding,
    /// because that is how the pushback buffer stores them.
    ///
    /// # Errors
    ///
    /// [`StreamError::MalformedSequence`] on grammar violations, including
    /// a sequence truncated by genuine end-of-data, and
    /// [`StreamError::Io`] on source failures. Both set the persistent
    /// error flag.
    pub fn getc(&mut self) -> Result<Option<char>, StreamError> {
        self.at_eof = false;
        let encoding = if self.pending_ungets > 0 {
            Encoding::Utf8
        } else {
            self.encoding
        };
        let mut chain = PushbackChain {
            pushback: &mut self.pushback,
            source: &mut self.source,
        };
        match codec::decode(encoding, &mut chain) {
            Ok(Some(ch)) => {
                self.pending_ungets = self.pending_ungets.saturating_sub(1);
                Ok(Some(ch))
            }
            Ok(None) => {
                self.at_eof = true;
                Ok(None)
            }
            Err(e) => {
                self.has_error = true;
                Err(e)
            }
        }
    }

    /// Pushes `ch` back so the next read returns it again.
    ///
    /// The codepoint is stored UTF-8 encoded; any number of codepoints can
    /// be pushed, in reverse read order, up to the buffer's capacity.
    /// Clears the EOF flag.
    ///
    /// # Errors
    ///
    /// [`StreamError::Overflow`] when the buffer cannot take another
    /// codepoint; the stream state is left unchanged.
    pub fn ungetc(&mut self, ch: char) -> Result<(), StreamError> {
        let encoded = codec::encode(Encoding::Utf8, u32::from(ch))?;
        self.pushback.push_codepoint(&encoded)?;
        self.pending_ungets += 1;
        self.at_eof = false;
        Ok(())
    }

    /// Repositions the stream and returns the new absolute byte position.
    ///
    /// A successful seek discards pending pushback, clears the EOF flag,
    /// and clears the error flag.
    ///
    /// # Errors
    ///
    /// [`StreamError::Io`] when the source rejects the position (negative
    /// target, unseekable source). The stream state is unchanged on error.
    pub fn seek(&mut self, offset: i64, whence: Whence) -> Result<u64, StreamError> {
        let target = match whence {
            Whence::ByteStart => absolute(offset, 0)?,
            Whence::TextStart => absolute(offset, self.text_start)?,
            Whence::ByteCurrent | Whence::TextCurrent => SeekFrom::Current(offset),
            Whence::ByteEnd | Whence::TextEnd => SeekFrom::End(offset),
        };
        let pos = self.source.seek(target)?;
        self.pushback.clear();
        self.pending_ungets = 0;
        self.at_eof = false;
        self.has_error = false;
        Ok(pos)
    }

    /// The current absolute byte position.
    ///
    /// # Errors
    ///
    /// An I/O error while any pushed-back codepoint is pending: the
    /// pushback bytes are UTF-8 whatever the wire encoding, so no byte
    /// offset can describe the effective position.
    pub fn tell(&mut self) -> Result<u64, StreamError> {
        if !self.pushback.is_empty() {
            return Err(io::Error::other(
                "stream position is undefined while pushed-back input is pending",
            )
            .into());
        }
        Ok(self.source.stream_position()?)
    }

    /// Consumes the reader, closing the source according to ownership.
    ///
    /// A caller-supplied file handle is returned instead of being closed,
    /// unless `force_close` is set. Owned files and buffers are dropped;
    /// they yield `None`.
    pub fn close(self, force_close: bool) -> Option<File> {
        match self.source {
            ByteSource::File(f) if !f.opened_by_path && !force_close => Some(f.into_file()),
            _ => None,
        }
    }
}

/// Drains pushback bytes before touching the source.
struct PushbackChain<'r, 'a> {
    pushback: &'r mut PushbackBuffer,
    source: &'r mut ByteSource<'a>,
}

impl ByteRead for PushbackChain<'_, '_> {
    fn next_byte(&mut self) -> Result<Option<u8>, StreamError> {
        if let Some(byte) = self.pushback.pop() {
            return Ok(Some(byte));
        }
        self.source.next_byte()
    }
}

impl Iterator for StreamReader<'_> {
    type Item = Result<char, StreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.getc().transpose()
    }
}

fn absolute(offset: i64, base: u64) -> Result<SeekFrom, StreamError> {
    base.checked_add_signed(offset)
        .map(SeekFrom::Start)
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "invalid seek to a negative position",
            )
            .into()
        })
}
