//! Byte-order-mark detection.
//!
//! Detection consumes real bytes from the source (there is no true peek at
//! the byte level); the reader repositions the stream afterwards, so the
//! source must be seekable. At most three bytes are read: two decide the
//! UTF-16 marks, a third decides UTF-8.

use crate::{encoding::Encoding, error::StreamError, source::ByteSource};

pub(crate) const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];
pub(crate) const UTF16_LE_BOM: [u8; 2] = [0xFF, 0xFE];
pub(crate) const UTF16_BE_BOM: [u8; 2] = [0xFE, 0xFF];

/// What a leading byte-order mark says about the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BomReport {
    pub encoding: Encoding,
    /// Length of the mark in bytes: 2 for UTF-16, 3 for UTF-8.
    pub len: u64,
}

/// Classifies the stream's leading bytes. `Ok(None)` when no known mark is
/// present (including a stream shorter than any mark).
pub(crate) fn detect(source: &mut ByteSource<'_>) -> Result<Option<BomReport>, StreamError> {
    let mut head = [0u8; 3];
    for i in 0..head.len() {
        let Some(byte) = source.read_byte()? else {
            return Ok(None);
        };
        head[i] = byte;

        if i == 1 {
            if head[..2] == UTF16_LE_BOM {
                return Ok(Some(BomReport {
                    encoding: Encoding::Utf16Le,
                    len: 2,
                }));
            }
            if head[..2] == UTF16_BE_BOM {
                return Ok(Some(BomReport {
                    encoding: Encoding::Utf16Be,
                    len: 2,
                }));
            }
        }
    }

    if head == UTF8_BOM {
        return Ok(Some(BomReport {
            encoding: Encoding::Utf8,
            len: 3,
        }));
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::{BomReport, detect};
    use crate::{encoding::Encoding, source::{ByteSource, MemorySource}};

    fn memory(data: &[u8]) -> ByteSource<'_> {
        ByteSource::Memory(MemorySource::new(data.into()))
    }

    #[test]
    fn classifies_the_three_marks() {
        let cases: [(&[u8], Encoding, u64); 3] = [
            (b"\xFF\xFEa\x00", Encoding::Utf16Le, 2),
            (b"\xFE\xFF\x00a", Encoding::Utf16Be, 2),
            (b"\xEF\xBB\xBFa", Encoding::Utf8, 3),
        ];
        for (input, encoding, len) in cases {
            let mut src = memory(input);
            assert_eq!(
                detect(&mut src).unwrap(),
                Some(BomReport { encoding, len }),
                "{input:?}"
            );
        }
    }

    #[test]
    fn plain_text_has_no_mark() {
        let mut src = memory(b"hello");
        assert_eq!(detect(&mut src).unwrap(), None);
    }

    #[test]
    fn short_streams_have_no_mark() {
        for input in [&b""[..], b"\xEF", b"\xEF\xBB"] {
            let mut src = memory(input);
            assert_eq!(detect(&mut src).unwrap(), None, "{input:?}");
        }
    }

    #[test]
    fn near_miss_is_no_mark() {
        // FE FF only counts at offset 0 with the right order.
        let mut src = memory(b"\xEF\xBB\xBEtext");
        assert_eq!(detect(&mut src).unwrap(), None);
    }
}
