//! Text decoding with an ordered encoding fallback.

use encoding_rs::{UTF_8, WINDOWS_1252};
use std::fmt;

/// A text encoding that can be tried when decoding a recovered file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextEncoding {
    /// Strict UTF-8: any malformed sequence fails the attempt
    Utf8,
    /// Windows-1252 (WHATWG mapping, never fails)
    Windows1252,
    /// ISO-8859-1: each byte maps to the code point of the same value
    Latin1,
}

impl TextEncoding {
    /// Default preference order: strict UTF-8, then the permissive Latin-1
    pub const DEFAULT_ORDER: [TextEncoding; 2] = [TextEncoding::Utf8, TextEncoding::Latin1];

    /// Returns the conventional label for this encoding
    pub fn label(self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Windows1252 => "windows-1252",
            Self::Latin1 => "latin-1",
        }
    }

    /// Decodes the whole byte stream, or returns `None` if any byte
    /// sequence is invalid in this encoding.
    ///
    /// No BOM is stripped and no replacement characters are inserted.
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            Self::Utf8 => UTF_8
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(|text| text.into_owned()),
            Self::Windows1252 => WINDOWS_1252
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(|text| text.into_owned()),
            Self::Latin1 => Some(encoding_rs::mem::decode_latin1(bytes).into_owned()),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Decodes `bytes` with the first encoding in `order` that accepts the
/// entire input.
///
/// Returns `None` when every encoding fails (or `order` is empty).
pub fn decode_first(bytes: &[u8], order: &[TextEncoding]) -> Option<(String, TextEncoding)> {
    order.iter().find_map(|&encoding| {
        let text = encoding.decode(bytes);
        if text.is_none() {
            tracing::trace!("{} rejected the input, trying next encoding", encoding);
        }
        text.map(|text| (text, encoding))
    })
}
