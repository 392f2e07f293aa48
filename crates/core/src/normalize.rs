//! Text normalization for slide input and slide fields.
//!
//! Handles line ending normalization, Unicode composition, and removal of
//! characters that cannot appear in the XML parts a plan is rendered into.

use unicode_normalization::UnicodeNormalization;

/// Marker appended to text that was shortened for display.
pub const TRUNCATION_MARKER: char = '…';

/// Whether a character is allowed in an XML 1.0 document.
fn is_xml_char(c: char) -> bool {
    match c {
        '\t' | '\n' | '\r' => true,
        '\u{0}'..='\u{1F}' => false,
        '\u{FFFE}' | '\u{FFFF}' => false,
        _ => true,
    }
}

/// Text normalizer applied before segmentation and to every slide field.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    /// Whether to compose characters to Unicode NFC.
    unicode_nfc: bool,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextNormalizer {
    /// Create a new text normalizer with NFC composition enabled.
    pub fn new() -> Self {
        Self { unicode_nfc: true }
    }

    /// Set whether to compose characters to Unicode NFC.
    pub fn with_unicode_nfc(mut self, nfc: bool) -> Self {
        self.unicode_nfc = nfc;
        self
    }

    /// Normalize a piece of text.
    ///
    /// - Converts CRLF and lone CR line endings to LF
    /// - Composes to NFC (when enabled) so character caps count what users see
    /// - Drops control characters that XML 1.0 does not allow
    pub fn normalize(&self, text: &str) -> String {
        let unified = text.replace("\r\n", "\n").replace('\r', "\n");

        if self.unicode_nfc {
            unified.nfc().filter(|c| is_xml_char(*c)).collect()
        } else {
            unified.chars().filter(|c| is_xml_char(*c)).collect()
        }
    }
}

/// Cut `text` to at most `max_chars` characters, never splitting a character.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Shorten `text` to `max_chars` characters, ending in [`TRUNCATION_MARKER`]
/// when anything was cut.
pub fn truncate_with_marker(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let kept = truncate_chars(text, max_chars.saturating_sub(1));
    let mut out = String::with_capacity(kept.len() + TRUNCATION_MARKER.len_utf8());
    out.push_str(kept);
    out.push(TRUNCATION_MARKER);
    out
}
