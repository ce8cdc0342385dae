#![no_main]
use libfuzzer_sys::fuzz_target;
use textstream::{Encoding, StreamReader, encode};

const ENCODINGS: [Encoding; 5] = [
    Encoding::Ascii,
    Encoding::Utf8,
    Encoding::Utf16,
    Encoding::Utf16Le,
    Encoding::Utf16Be,
];

// Decode arbitrary bytes in every encoding: the reader must terminate,
// never panic, and every decoded codepoint must re-encode losslessly.
fuzz_target!(|input: (u8, Vec<u8>)| {
    let (pick, data) = input;
    let declared = match usize::from(pick) % 6 {
        0 => None,
        n => Some(ENCODINGS[n - 1]),
    };

    let mut reader = StreamReader::from_slice(&data, declared).expect("memory open cannot fail");
    let encoding = reader.encoding();

    // Each getc consumes at least one byte or ends the stream, so this is
    // bounded by the input length.
    loop {
        match reader.getc() {
            Ok(Some(ch)) => {
                let wire = encode(encoding, u32::from(ch)).expect("decoded scalar must re-encode");
                assert!(!wire.as_bytes().is_empty());
            }
            Ok(None) => break,
            Err(_) => {
                assert!(reader.has_error());
                reader.clear_error();
            }
        }
    }
    assert!(reader.at_eof());
});
