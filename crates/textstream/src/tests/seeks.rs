use crate::{Encoding, StreamError, StreamReader, Whence};

#[test]
fn text_start_lands_on_the_first_character() {
    let mut reader = StreamReader::from_slice(b"\xFF\xFEa\x00b\x00", None).unwrap();
    assert_eq!(reader.getc().unwrap(), Some('a'));
    assert_eq!(reader.getc().unwrap(), Some('b'));

    let pos = reader.seek(0, Whence::TextStart).unwrap();
    assert_eq!(pos, 2);
    assert_eq!(reader.getc().unwrap(), Some('a'));
}

#[test]
fn byte_start_zero_exposes_the_bom() {
    let mut reader = StreamReader::from_slice(b"\xFF\xFEa\x00", None).unwrap();
    reader.seek(0, Whence::ByteStart).unwrap();
    // The mark itself decodes as U+FEFF in the adopted encoding.
    assert_eq!(reader.getc().unwrap(), Some('\u{FEFF}'));
    assert_eq!(reader.getc().unwrap(), Some('a'));
}

#[test]
fn text_start_offsets_skip_characters() {
    let mut reader = StreamReader::from_slice(b"\xEF\xBB\xBFabc", None).unwrap();
    let pos = reader.seek(1, Whence::TextStart).unwrap();
    assert_eq!(pos, 4);
    assert_eq!(reader.getc().unwrap(), Some('b'));
}

#[test]
fn end_relative_seek() {
    let mut reader = StreamReader::from_slice(b"abcdef", Some(Encoding::Ascii)).unwrap();
    reader.seek(-2, Whence::ByteEnd).unwrap();
    assert_eq!(reader.getc().unwrap(), Some('e'));
    reader.seek(-1, Whence::TextEnd).unwrap();
    assert_eq!(reader.getc().unwrap(), Some('f'));
}

#[test]
fn current_relative_seek() {
    let mut reader = StreamReader::from_slice(b"abcdef", Some(Encoding::Ascii)).unwrap();
    assert_eq!(reader.getc().unwrap(), Some('a'));
    reader.seek(2, Whence::ByteCurrent).unwrap();
    assert_eq!(reader.getc().unwrap(), Some('d'));
    // The current position already sits past any BOM, so the text view of
    // a relative seek coincides with the byte view.
    reader.seek(-2, Whence::TextCurrent).unwrap();
    assert_eq!(reader.getc().unwrap(), Some('d'));
}

#[test]
fn seek_discards_pending_pushback() {
    let mut reader = StreamReader::from_slice(b"abc", None).unwrap();
    assert_eq!(reader.getc().unwrap(), Some('a'));
    reader.ungetc('z').unwrap();

    reader.seek(0, Whence::ByteStart).unwrap();
    assert_eq!(reader.getc().unwrap(), Some('a'));
}

#[test]
fn failed_seek_leaves_state_alone() {
    let mut reader = StreamReader::from_slice(b"abc", None).unwrap();
    reader.ungetc('z').unwrap();

    let err = reader.seek(-1, Whence::ByteStart).unwrap_err();
    assert!(matches!(err, StreamError::Io(_)));
    // The pushed-back codepoint survives the failed seek.
    assert_eq!(reader.getc().unwrap(), Some('z'));
}

#[test]
fn seek_returns_the_new_byte_position() {
    let mut reader = StreamReader::from_slice(b"\xEF\xBB\xBFxyz", None).unwrap();
    assert_eq!(reader.seek(0, Whence::ByteStart).unwrap(), 0);
    assert_eq!(reader.seek(0, Whence::TextStart).unwrap(), 3);
    assert_eq!(reader.seek(0, Whence::ByteEnd).unwrap(), 6);
}

#[test]
fn tell_tracks_multibyte_reads() {
    let mut reader = StreamReader::from_slice("é💩".as_bytes(), None).unwrap();
    assert_eq!(reader.tell().unwrap(), 0);
    reader.getc().unwrap();
    assert_eq!(reader.tell().unwrap(), 2);
    reader.getc().unwrap();
    assert_eq!(reader.tell().unwrap(), 6);
}
