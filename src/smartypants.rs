//! SmartyPants: typographic substitution of ASCII punctuation.
//!
//! One forward pass over raw text. At each byte the rules for that byte
//! are tried in order; the first that matches writes an entity and skips
//! the bytes it consumed. Bytes no rule claims are HTML-escaped.
//!
//! | Input            | Output                    |
//! |------------------|---------------------------|
//! | `"` `'`          | `&ldquo;` `&rdquo;` `&lsquo;` `&rsquo;` |
//! | `'s` `'t` `'re` `'ll` `'ve` `'m` `'d` | `&rsquo;` + suffix |
//! | `--`             | `&mdash;`                 |
//! | ` - `            | `&ndash;`                 |
//! | `...` `. . .`    | `&hellip;`                |
//! | `(c)` `(r)` `(tm)` | `&copy;` `&reg;` `&trade;` |
//! | `1/2` `1/4` `3/4` | `&frac12;` `&frac14;` `&frac34;` |
//! | `&#0;`           | nothing                   |

use crate::chars::is_word_boundary;
use crate::escape::put_escaped_char;
use crate::Buffer;

/// Which quotes are currently open. Scoped to one paragraph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuoteState {
    pub in_single: bool,
    pub in_double: bool,
}

impl QuoteState {
    /// Close every quote.
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

const CONTRACTIONS: [&[u8]; 7] = [b"s", b"t", b"re", b"ll", b"ve", b"m", b"d"];

const SYMBOLS: [(&[u8], &[u8]); 3] = [
    (b"(c)", b"&copy;"),
    (b"(r)", b"&reg;"),
    (b"(tm)", b"&trade;"),
];

/// Fraction, entity, and whether an ordinal `th` may follow.
const FRACTIONS: [(&[u8], &[u8], bool); 3] = [
    (b"1/2", b"&frac12;", false),
    (b"1/4", b"&frac14;", true),
    (b"3/4", b"&frac34;", true),
];

/// Apply SmartyPants to `text`, appending to `ob`. Quote state starts
/// closed on every call.
///
/// # Example
/// ```
/// use mkdhtml::Buffer;
/// use mkdhtml::smartypants::smartypants;
///
/// let mut ob = Buffer::new(64);
/// smartypants(&mut ob, b"it's done -- really... (c)");
/// assert_eq!(ob.to_str_lossy(), "it&rsquo;s done &mdash; really&hellip; &copy;");
/// ```
pub fn smartypants(ob: &mut Buffer, text: &[u8]) {
    let mut quotes = QuoteState::default();
    smartypants_with_state(ob, text, &mut quotes);
}

/// Apply SmartyPants with caller-owned quote state, so quotes opened in one
/// text fragment can close in a later one.
pub fn smartypants_with_state(ob: &mut Buffer, text: &[u8], quotes: &mut QuoteState) {
    let mut i = 0;
    while i < text.len() {
        match substitute(ob, text, i, quotes) {
            Some(extra) => i += extra + 1,
            None => {
                put_escaped_char(ob, text[i]);
                i += 1;
            }
        }
    }
}

/// Try every rule for the byte at `i`. Returns how many bytes after `i`
/// the matching rule consumed.
fn substitute(ob: &mut Buffer, text: &[u8], i: usize, quotes: &mut QuoteState) -> Option<usize> {
    match text[i] {
        b'&' => text[i + 1..].starts_with(b"#0;").then_some(3),

        b'"' => smart_quote(ob, text, i, &mut quotes.in_double).then_some(0),

        b'\'' => {
            if CONTRACTIONS
                .iter()
                .any(|suffix| word_at(text, i + 1, suffix))
            {
                ob.put(b"&rsquo;");
                return Some(0);
            }
            smart_quote(ob, text, i, &mut quotes.in_single).then_some(0)
        }

        b'(' => SYMBOLS
            .iter()
            .find(|(pattern, _)| text[i..].starts_with(pattern))
            .map(|&(pattern, entity)| {
                ob.put(entity);
                pattern.len() - 1
            }),

        b'-' => {
            if text[i + 1..].starts_with(b"-") {
                ob.put(b"&mdash;");
                Some(1)
            } else if follows_boundary(text, i) && boundary_at(text, i + 1) {
                ob.put(b"&ndash;");
                Some(0)
            } else {
                None
            }
        }

        b'.' => {
            if text[i..].starts_with(b"...") {
                ob.put(b"&hellip;");
                Some(2)
            } else if text[i..].starts_with(b". . .") {
                ob.put(b"&hellip;");
                Some(4)
            } else {
                None
            }
        }

        b'1' | b'3' if follows_boundary(text, i) => FRACTIONS
            .iter()
            .find(|(fraction, _, ordinal)| {
                text[i..].starts_with(fraction)
                    && (boundary_at(text, i + fraction.len())
                        || (*ordinal && word_at(text, i + fraction.len(), b"th")))
            })
            .map(|&(fraction, entity, _)| {
                ob.put(entity);
                fraction.len() - 1
            }),

        _ => None,
    }
}

/// Curly quote for the quote at `i`, toggling `open` on success.
///
/// An opening quote needs a word boundary (or the start of text) before
/// it; a closing quote needs one (or the end of text) after it.
fn smart_quote(ob: &mut Buffer, text: &[u8], i: usize, open: &mut bool) -> bool {
    let closing = *open;

    if closing && !boundary_at(text, i + 1) {
        return false;
    }
    if !closing && !boundary_before(text, i) {
        return false;
    }

    let entity: &[u8] = match (text[i], closing) {
        (b'\'', true) => b"&rsquo;",
        (b'\'', false) => b"&lsquo;",
        (_, true) => b"&rdquo;",
        (_, false) => b"&ldquo;",
    };
    ob.put(entity);
    *open = !closing;
    true
}

/// `word` starts at `start` and is followed by a boundary or the end.
#[inline]
fn word_at(text: &[u8], start: usize, word: &[u8]) -> bool {
    text.get(start..)
        .is_some_and(|rest| rest.starts_with(word))
        && boundary_at(text, start + word.len())
}

#[inline]
fn boundary_at(text: &[u8], pos: usize) -> bool {
    text.get(pos).is_none_or(|&c| is_word_boundary(c))
}

#[inline]
fn boundary_before(text: &[u8], pos: usize) -> bool {
    pos == 0 || follows_boundary(text, pos)
}

/// A boundary byte precedes `pos` within this fragment. The start of a
/// fragment does not count: it may continue text from an earlier span.
#[inline]
fn follows_boundary(text: &[u8], pos: usize) -> bool {
    pos > 0 && is_word_boundary(text[pos - 1])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn smart(text: &str) -> String {
        let mut ob = Buffer::new(64);
        smartypants(&mut ob, text.as_bytes());
        ob.to_str_lossy().into_owned()
    }

    #[test]
    fn test_double_quotes() {
        assert_eq!(smart("\"Hello,\" she said"), "&ldquo;Hello,&rdquo; she said");
    }

    #[test]
    fn test_single_quotes() {
        assert_eq!(smart("'quoted'"), "&lsquo;quoted&rsquo;");
    }

    #[test]
    fn test_quote_inside_word_stays_literal() {
        assert_eq!(smart("a\"b"), "a&quot;b");
    }

    #[test]
    fn test_unmatched_closing_quote_is_escaped() {
        assert_eq!(smart("\"open\"x"), "&ldquo;open&quot;x");
    }

    #[test]
    fn test_contractions() {
        assert_eq!(smart("it's"), "it&rsquo;s");
        assert_eq!(smart("don't"), "don&rsquo;t");
        assert_eq!(smart("we're we'll I've I'm I'd"), "we&rsquo;re we&rsquo;ll I&rsquo;ve I&rsquo;m I&rsquo;d");
    }

    #[test]
    fn test_contraction_is_case_sensitive() {
        assert_eq!(smart("IT'S"), "IT'S");
    }

    #[test]
    fn test_contraction_does_not_toggle() {
        assert_eq!(smart("'it's'"), "&lsquo;it&rsquo;s&rsquo;");
    }

    #[test]
    fn test_dashes() {
        assert_eq!(smart("a--b"), "a&mdash;b");
        assert_eq!(smart("a - b"), "a &ndash; b");
        assert_eq!(smart("a-b"), "a-b");
        assert_eq!(smart("- a"), "- a");
    }

    #[test]
    fn test_ellipsis() {
        assert_eq!(smart("wait..."), "wait&hellip;");
        assert_eq!(smart("wait. . ."), "wait&hellip;");
        assert_eq!(smart("a.."), "a..");
    }

    #[test]
    fn test_symbols() {
        assert_eq!(smart("(c) (r) (tm)"), "&copy; &reg; &trade;");
        assert_eq!(smart("(C)"), "(C)");
    }

    #[test]
    fn test_fractions() {
        assert_eq!(smart("1/2 cup"), "1/2 cup");
        assert_eq!(smart("a 1/2 cup"), "a &frac12; cup");
        assert_eq!(smart("add 1/4"), "add &frac14;");
        assert_eq!(smart("the 3/4th mark"), "the &frac34;th mark");
        assert_eq!(smart("11/2"), "11/2");
        assert_eq!(smart("1/23"), "1/23");
    }

    #[test]
    fn test_sentinel_dropped() {
        assert_eq!(smart("a&#0;b"), "ab");
        assert_eq!(smart("a&b"), "a&amp;b");
    }

    #[test]
    fn test_escapes_fallback() {
        assert_eq!(smart("<b> & \"x"), "&lt;b&gt; &amp; &ldquo;x");
    }

    #[test]
    fn test_state_carries_across_calls() {
        let mut quotes = QuoteState::default();
        let mut ob = Buffer::new(64);
        smartypants_with_state(&mut ob, b"\"start ", &mut quotes);
        assert!(quotes.in_double);
        smartypants_with_state(&mut ob, b"end\"", &mut quotes);
        assert!(!quotes.in_double);
        assert_eq!(ob.to_str_lossy(), "&ldquo;start end&rdquo;");
    }

    #[test]
    fn test_reset() {
        let mut quotes = QuoteState {
            in_single: true,
            in_double: true,
        };
        quotes.reset();
        assert_eq!(quotes, QuoteState::default());
    }
}
