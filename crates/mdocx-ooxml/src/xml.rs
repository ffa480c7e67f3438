//! XML text escaping for generated parts

use std::borrow::Cow;

/// Characters XML 1.0 allows in a document
fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\u{9}' | '\u{A}' | '\u{D}' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}'
    )
}

/// Escape text for element content or attribute values
///
/// Control characters and noncharacters XML 1.0 cannot carry, even as
/// character references, are dropped before escaping.
pub(crate) fn escape(raw: &str) -> Cow<'_, str> {
    if raw.chars().all(is_xml_char) {
        return quick_xml::escape::escape(raw);
    }

    let cleaned: String = raw.chars().filter(|&c| is_xml_char(c)).collect();
    Cow::Owned(quick_xml::escape::escape(&cleaned).into_owned())
}
