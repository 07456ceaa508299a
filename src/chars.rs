//! ASCII character classes shared by the scanners.

/// ASCII whitespace, including vertical tab.
#[inline]
pub fn is_space(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}

/// Whitespace or ASCII punctuation.
#[inline]
pub fn is_word_boundary(c: u8) -> bool {
    is_space(c) || c.is_ascii_punctuation()
}
