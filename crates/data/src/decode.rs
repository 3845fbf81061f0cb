//! Text decoding for exported spreadsheets: BOM-aware UTF-8 first, Latin-1 second.

use tracing::warn;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Encoding that successfully decoded a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceEncoding {
    Utf8,
    Latin1,
}

/// Decodes raw bytes, stripping a leading UTF-8 byte-order mark.
///
/// Invalid UTF-8 falls back to ISO-8859-1, which maps every byte and
/// therefore always succeeds.
#[must_use]
pub fn decode_text(bytes: &[u8]) -> (String, SourceEncoding) {
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    match std::str::from_utf8(body) {
        Ok(text) => (text.to_string(), SourceEncoding::Utf8),
        Err(e) => {
            warn!(
                valid_up_to = e.valid_up_to(),
                "source is not valid UTF-8, falling back to Latin-1"
            );
            (body.iter().map(|&b| char::from(b)).collect(), SourceEncoding::Latin1)
        }
    }
}
