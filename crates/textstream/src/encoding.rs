//! The set of wire encodings the stream understands.

use core::fmt;

use crate::error::StreamError;

/// A supported text encoding.
///
/// `Utf16` encodes and decodes 16-bit units in host byte order without any
/// swap; [`Encoding::Utf16Le`] and [`Encoding::Utf16Be`] force a specific
/// order regardless of host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// One byte per codepoint, values `0x00..=0x7F`.
    Ascii,
    /// Variable 1–4 bytes per codepoint (RFC 3629).
    Utf8,
    /// UTF-16 in host byte order.
    Utf16,
    /// UTF-16, little-endian units.
    Utf16Le,
    /// UTF-16, big-endian units.
    Utf16Be,
}

impl Encoding {
    /// Whether this is one of the three UTF-16 variants.
    #[must_use]
    pub fn is_utf16(self) -> bool {
        matches!(self, Encoding::Utf16 | Encoding::Utf16Le | Encoding::Utf16Be)
    }

    /// The conventional label for this encoding.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Encoding::Ascii => "ASCII",
            Encoding::Utf8 => "UTF-8",
            Encoding::Utf16 => "UTF-16",
            Encoding::Utf16Le => "UTF-16LE",
            Encoding::Utf16Be => "UTF-16BE",
        }
    }

    /// Parses a case-insensitive encoding label.
    ///
    /// Accepts the labels produced by [`Encoding::label`], with or without
    /// the hyphen.
    ///
    /// # Errors
    ///
    /// [`StreamError::UnsupportedEncoding`] if the label names no supported
    /// encoding.
    pub fn from_label(label: &str) -> Result<Self, StreamError> {
        match label.to_ascii_lowercase().as_str() {
            "ascii" | "us-ascii" => Ok(Encoding::Ascii),
            "utf-8" | "utf8" => Ok(Encoding::Utf8),
            "utf-16" | "utf16" => Ok(Encoding::Utf16),
            "utf-16le" | "utf16le" => Ok(Encoding::Utf16Le),
            "utf-16be" | "utf16be" => Ok(Encoding::Utf16Be),
            _ => Err(StreamError::UnsupportedEncoding(label.into())),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
