use crate::{Encoding, PUSHBACK_CAPACITY, StreamError, StreamReader};

#[test]
fn pushback_is_idempotent_over_reads() {
    let text = "añ💩b";
    let bytes = text.as_bytes();
    let mut reader = StreamReader::from_slice(bytes, None).unwrap();

    let before: Vec<char> = text.chars().collect();
    let mut read = Vec::new();
    for _ in 0..3 {
        read.push(reader.getc().unwrap().unwrap());
    }
    let pos_after_run = reader.tell().unwrap();

    // Unget in reverse read order, then everything replays unchanged.
    for &ch in read.iter().rev() {
        reader.ungetc(ch).unwrap();
    }
    for expected in &before[..3] {
        assert_eq!(reader.getc().unwrap(), Some(*expected));
    }
    assert_eq!(reader.tell().unwrap(), pos_after_run);
    assert_eq!(reader.getc().unwrap(), Some('b'));
}

#[test]
fn pushback_decodes_as_utf8_over_a_utf16_stream() {
    // Wire encoding UTF-16LE, but pushed-back codepoints live as UTF-8 in
    // the buffer and must decode that way while pending.
    let mut reader =
        StreamReader::from_slice(b"h\x00i\x00", Some(Encoding::Utf16Le)).unwrap();
    assert_eq!(reader.getc().unwrap(), Some('h'));

    reader.ungetc('€').unwrap();
    reader.ungetc('h').unwrap();
    assert_eq!(reader.getc().unwrap(), Some('h'));
    assert_eq!(reader.getc().unwrap(), Some('€'));

    // Pending count at zero again: back to the wire encoding.
    assert_eq!(reader.getc().unwrap(), Some('i'));
}

#[test]
fn pushback_works_on_an_ascii_stream() {
    // The buffer is UTF-8, so a non-ASCII codepoint can be pushed back and
    // re-read even when the wire encoding could never carry it.
    let mut reader = StreamReader::from_slice(b"x", Some(Encoding::Ascii)).unwrap();
    reader.ungetc('é').unwrap();
    assert_eq!(reader.getc().unwrap(), Some('é'));
    assert_eq!(reader.getc().unwrap(), Some('x'));
}

#[test]
fn pushback_clears_eof() {
    let mut reader = StreamReader::from_slice(b"a", None).unwrap();
    assert_eq!(reader.getc().unwrap(), Some('a'));
    assert_eq!(reader.getc().unwrap(), None);
    assert!(reader.at_eof());

    reader.ungetc('z').unwrap();
    assert!(!reader.at_eof());
    assert_eq!(reader.getc().unwrap(), Some('z'));
    assert_eq!(reader.getc().unwrap(), None);
}

#[test]
fn pushback_overflow_leaves_prior_state_intact() {
    let mut reader = StreamReader::from_slice(b"tail", None).unwrap();

    // Four-byte codepoints fill the 512-byte buffer in exactly 128 pushes.
    let limit = PUSHBACK_CAPACITY / 4;
    for _ in 0..limit {
        reader.ungetc('💩').unwrap();
    }
    let err = reader.ungetc('x').unwrap_err();
    assert!(matches!(err, StreamError::Overflow { capacity } if capacity == PUSHBACK_CAPACITY));

    // Everything pushed before the overflow is still there, in order.
    for _ in 0..limit {
        assert_eq!(reader.getc().unwrap(), Some('💩'));
    }
    assert_eq!(reader.getc().unwrap(), Some('t'));
}

#[test]
fn single_byte_codepoints_still_reserve_worst_case_space() {
    // Remaining capacity below four bytes refuses even a one-byte
    // codepoint; 512 - 3 pushes of 'x' is the guaranteed fill.
    let mut reader = StreamReader::from_slice(b"", None).unwrap();
    for _ in 0..(PUSHBACK_CAPACITY - 3) {
        reader.ungetc('x').unwrap();
    }
    assert!(matches!(
        reader.ungetc('x'),
        Err(StreamError::Overflow { .. })
    ));
}
