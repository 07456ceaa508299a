//! HTML escaping utilities.
//!
//! Fast-path optimized: scans for first escapable character,
//! then bulk-copies segments between escapes.

use memchr::{memchr, memchr3};

use crate::Buffer;

/// Lookup table for characters escaped in text and attribute values.
/// Index by byte value, true if needs escaping.
const ESCAPE_TABLE: [bool; 256] = {
    let mut table = [false; 256];
    table[b'<' as usize] = true;
    table[b'>' as usize] = true;
    table[b'&' as usize] = true;
    table[b'"' as usize] = true;
    table
};

/// Entity for an escapable byte.
#[inline]
fn entity(c: u8) -> Option<&'static [u8]> {
    match c {
        b'<' => Some(b"&lt;"),
        b'>' => Some(b"&gt;"),
        b'&' => Some(b"&amp;"),
        b'"' => Some(b"&quot;"),
        _ => None,
    }
}

/// Append one byte, entity-escaping `<`, `>`, `&` and `"`.
#[inline]
pub fn put_escaped_char(ob: &mut Buffer, c: u8) {
    match entity(c) {
        Some(escaped) => ob.put(escaped),
        None => ob.putc(c),
    }
}

/// Copy `input` into `ob`, entity-escaping `<`, `>`, `&` and `"`.
///
/// Used for text content and for every attribute value taken from the
/// source document.
///
/// # Example
/// ```
/// use mkdhtml::Buffer;
/// use mkdhtml::escape::escape_html;
///
/// let mut ob = Buffer::new(16);
/// escape_html(&mut ob, b"value=\"test\" & <more>");
/// assert_eq!(ob.as_bytes(), b"value=&quot;test&quot; &amp; &lt;more&gt;");
/// ```
pub fn escape_html(ob: &mut Buffer, input: &[u8]) {
    if input.is_empty() {
        return;
    }

    let mut pos = match first_escape(input) {
        Some(p) => p,
        None => {
            ob.put(input);
            return;
        }
    };

    if pos > 0 {
        ob.put(&input[..pos]);
    }

    while pos < input.len() {
        let scan_start = pos;
        while pos < input.len() && !ESCAPE_TABLE[input[pos] as usize] {
            pos += 1;
        }

        if pos > scan_start {
            ob.put(&input[scan_start..pos]);
        }

        if pos < input.len() {
            put_escaped_char(ob, input[pos]);
            pos += 1;
        }
    }
}

#[inline]
fn first_escape(input: &[u8]) -> Option<usize> {
    let a = memchr3(b'<', b'>', b'&', input);
    let b = memchr(b'"', input);
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

/// Percent-encode a URL and HTML-escape it for an `href`/`src` value.
///
/// - Space, backslash, `[`, `]` and backtick are percent-encoded
/// - `&` and `'` become entities; `"`, `<`, `>` are percent-encoded
/// - Control characters and non-ASCII bytes are percent-encoded
/// - Existing `%XX` sequences pass through unchanged
pub fn escape_href(ob: &mut Buffer, input: &[u8]) {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";

    let mut pos = 0;
    while pos < input.len() {
        let start = pos;
        while pos < input.len() && is_href_safe(input[pos]) {
            pos += 1;
        }
        if pos > start {
            ob.put(&input[start..pos]);
        }
        if pos >= input.len() {
            break;
        }

        match input[pos] {
            b'&' => ob.put(b"&amp;"),
            b'\'' => ob.put(b"&#x27;"),
            b => {
                ob.putc(b'%');
                ob.putc(HEX[(b >> 4) as usize]);
                ob.putc(HEX[(b & 0xF) as usize]);
            }
        }
        pos += 1;
    }
}

#[inline]
fn is_href_safe(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(
            b,
            b'-' | b'_' | b'.' | b'+' | b'!' | b'*' | b'(' | b')' | b',' | b'%' | b'#' | b'@'
                | b'?' | b'=' | b';' | b':' | b'/' | b'$' | b'~'
        )
}
