//! Byte sources: uniform single-byte access over files, memory, and
//! wide-console read-through.
//!
//! The reader never touches `File` or slices directly; everything flows
//! through [`ByteSource`], one variant per backing store. Seeking and
//! telling use `std::io::SeekFrom` internally; the encoding-relative
//! `Whence` translation lives in the reader.

use std::{
    borrow::Cow,
    fs::File,
    io::{self, BufRead, BufReader, Read, Seek, SeekFrom},
};

use crate::error::StreamError;

/// A source of single bytes for [`decode`](crate::decode).
///
/// `Ok(None)` means clean end-of-data. Implemented for `&[u8]` so byte
/// slices can be decoded directly.
pub trait ByteRead {
    /// Returns the next byte, or `None` at end-of-data.
    ///
    /// # Errors
    ///
    /// Any failure of the underlying source, typically
    /// [`StreamError::Io`].
    fn next_byte(&mut self) -> Result<Option<u8>, StreamError>;
}

impl ByteRead for &[u8] {
    fn next_byte(&mut self) -> Result<Option<u8>, StreamError> {
        let Some((first, rest)) = self.split_first() else {
            return Ok(None);
        };
        *self = rest;
        Ok(Some(*first))
    }
}

/// One backing store for a stream of bytes.
#[derive(Debug)]
pub(crate) enum ByteSource<'a> {
    File(FileSource),
    Memory(MemorySource<'a>),
    Wide(WideSource),
}

impl ByteSource<'_> {
    pub(crate) fn read_byte(&mut self) -> io::Result<Option<u8>> {
        match self {
            ByteSource::File(f) => f.read_byte(),
            ByteSource::Memory(m) => Ok(m.read_byte()),
            ByteSource::Wide(w) => w.read_byte(),
        }
    }

    /// Repositions the source. Wide-console sources are not seekable.
    pub(crate) fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match self {
            ByteSource::File(f) => f.file.seek(pos),
            ByteSource::Memory(m) => m.seek(pos),
            ByteSource::Wide(_) => Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "wide console input is not seekable",
            )),
        }
    }

    pub(crate) fn stream_position(&mut self) -> io::Result<u64> {
        match self {
            ByteSource::File(f) => f.file.stream_position(),
            ByteSource::Memory(m) => Ok(m.pos),
            ByteSource::Wide(_) => Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "wide console input has no byte position",
            )),
        }
    }
}

impl ByteRead for ByteSource<'_> {
    fn next_byte(&mut self) -> Result<Option<u8>, StreamError> {
        Ok(self.read_byte()?)
    }
}

/// A buffered file handle, opened by path or supplied by the caller.
#[derive(Debug)]
pub(crate) struct FileSource {
    file: BufReader<File>,
    /// Whether the reader opened the handle itself (and therefore closes
    /// it unconditionally).
    pub(crate) opened_by_path: bool,
}

impl FileSource {
    pub(crate) fn new(file: File, opened_by_path: bool) -> Self {
        Self {
            file: BufReader::new(file),
            opened_by_path,
        }
    }

    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let buf = self.file.fill_buf()?;
        let Some(&byte) = buf.first() else {
            return Ok(None);
        };
        self.file.consume(1);
        Ok(Some(byte))
    }

    /// Gives the handle back, discarding any read-ahead buffer.
    pub(crate) fn into_file(self) -> File {
        self.file.into_inner()
    }
}

/// A cursor over a borrowed slice or an owned buffer.
#[derive(Debug)]
pub(crate) struct MemorySource<'a> {
    data: Cow<'a, [u8]>,
    pos: u64,
}

impl<'a> MemorySource<'a> {
    pub(crate) fn new(data: Cow<'a, [u8]>) -> Self {
        Self { data, pos: 0 }
    }

    fn read_byte(&mut self) -> Option<u8> {
        let byte = usize::try_from(self.pos)
            .ok()
            .and_then(|i| self.data.get(i).copied())?;
        self.pos += 1;
        Some(byte)
    }

    /// `SEEK_SET`/`CUR`/`END` semantics; a negative resulting position is
    /// an error, a position past the end is allowed (reads hit EOF there).
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let (base, offset) = match pos {
            SeekFrom::Start(n) => {
                self.pos = n;
                return Ok(self.pos);
            }
            SeekFrom::Current(off) => (self.pos, off),
            SeekFrom::End(off) => (self.data.len() as u64, off),
        };
        let target = base
            .checked_add_signed(offset)
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "invalid seek to a negative or overflowing position",
                )
            })?;
        self.pos = target;
        Ok(self.pos)
    }
}

/// Read-through for consoles that only expose 16-bit input units.
///
/// Reads one native-endian unit at a time from the inner reader and serves
/// its two bytes on successive calls, so the decoder upstream can stay
/// byte-oriented. Only meaningful with a UTF-16 native-order stream.
pub(crate) struct WideSource {
    inner: Box<dyn Read>,
    unit: [u8; 2],
    /// Bytes of `unit` already handed out (0–2).
    served: u8,
}

impl WideSource {
    pub(crate) fn new(inner: Box<dyn Read>) -> Self {
        Self {
            inner,
            unit: [0; 2],
            served: 2,
        }
    }

    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        if self.served == 2 {
            let Some(first) = read_one(&mut self.inner)? else {
                return Ok(None);
            };
            let Some(second) = read_one(&mut self.inner)? else {
                // Half a unit is an I/O-level truncation, not clean EOF.
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "console input ended inside a 16-bit unit",
                ));
            };
            self.unit = [first, second];
            self.served = 0;
        }
        let byte = self.unit[usize::from(self.served)];
        self.served += 1;
        Ok(Some(byte))
    }
}

impl std::fmt::Debug for WideSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WideSource")
            .field("unit", &self.unit)
            .field("served", &self.served)
            .finish_non_exhaustive()
    }
}

fn read_one<R: Read + ?Sized>(reader: &mut R) -> io::Result<Option<u8>> {
    let mut buf = [0u8; 1];
    loop {
        match reader.read(&mut buf) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(buf[0])),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::{self, SeekFrom};

    use super::{ByteSource, MemorySource, WideSource};

    fn memory(data: &[u8]) -> ByteSource<'_> {
        ByteSource::Memory(MemorySource::new(data.into()))
    }

    #[test]
    fn memory_reads_to_eof() {
        let mut src = memory(b"ab");
        assert_eq!(src.read_byte().unwrap(), Some(b'a'));
        assert_eq!(src.read_byte().unwrap(), Some(b'b'));
        assert_eq!(src.read_byte().unwrap(), None);
        // EOF is not sticky at the source level; seek rewinds it.
        src.seek(SeekFrom::Start(1)).unwrap();
        assert_eq!(src.read_byte().unwrap(), Some(b'b'));
    }

    #[test]
    fn memory_seek_whences() {
        let mut src = memory(b"abcdef");
        assert_eq!(src.seek(SeekFrom::End(-2)).unwrap(), 4);
        assert_eq!(src.read_byte().unwrap(), Some(b'e'));
        assert_eq!(src.seek(SeekFrom::Current(-1)).unwrap(), 4);
        assert_eq!(src.stream_position().unwrap(), 4);
    }

    #[test]
    fn memory_rejects_negative_positions() {
        let mut src = memory(b"abc");
        let err = src.seek(SeekFrom::Current(-1)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        let err = src.seek(SeekFrom::End(-4)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn memory_may_seek_past_end() {
        let mut src = memory(b"abc");
        assert_eq!(src.seek(SeekFrom::Start(10)).unwrap(), 10);
        assert_eq!(src.read_byte().unwrap(), None);
    }

    #[test]
    fn wide_source_serves_unit_bytes_in_order() {
        let data: &[u8] = &[0x41, 0x00, 0x3D, 0xD8];
        let mut src = WideSource::new(Box::new(data));
        assert_eq!(src.read_byte().unwrap(), Some(0x41));
        assert_eq!(src.read_byte().unwrap(), Some(0x00));
        assert_eq!(src.read_byte().unwrap(), Some(0x3D));
        assert_eq!(src.read_byte().unwrap(), Some(0xD8));
        assert_eq!(src.read_byte().unwrap(), None);
    }

    #[test]
    fn wide_source_half_unit_is_an_error() {
        let data: &[u8] = &[0x41];
        let mut src = WideSource::new(Box::new(data));
        let err = src.read_byte().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn wide_source_is_not_seekable() {
        let mut src = ByteSource::Wide(WideSource::new(Box::new(io::empty())));
        assert_eq!(
            src.seek(SeekFrom::Start(0)).unwrap_err().kind(),
            io::ErrorKind::Unsupported
        );
    }
}
