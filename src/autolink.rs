//! Bare URL and email recognition inside already-rendered text.
//!
//! A 256-entry action table routes the scan loop: plain bytes are copied
//! in bulk, `<` copies a whole tag (and a whole `<a>...</a>` span, so links
//! are never nested), and trigger bytes (`@`, `w`/`W`, `:`) run a matcher.
//!
//! Matchers may claim bytes that were already copied to the output, such
//! as the `http` in front of `://`. They report that count as a rewind and
//! the scanner truncates the output before writing the anchor.

use bitflags::bitflags;
use memchr::memchr;

use crate::chars::is_space;
use crate::escape::escape_html;
use crate::limits::LINK_UNIT;
use crate::Buffer;

bitflags! {
    /// What the autolink scanner recognizes.
    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct AutolinkFlags: u32 {
        /// `user@example.com`
        const EMAILS = 1 << 0;
        /// `www.example.com` and `scheme://example.com`
        const URLS = 1 << 1;
        /// Accept dotless hosts after a scheme (`http://localhost`).
        const SHORT_DOMAINS = 1 << 2;
    }
}

/// Scan action for a byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    None,
    SkipTag,
    Www,
    Email,
    Url,
}

impl Action {
    /// Text placed between `href="` and the matched link.
    fn href_prefix(self) -> &'static [u8] {
        match self {
            Action::Www => b"http://",
            Action::Email => b"mailto:",
            _ => b"",
        }
    }
}

fn active_chars(flags: AutolinkFlags) -> [Action; 256] {
    let mut table = [Action::None; 256];
    table[b'<' as usize] = Action::SkipTag;

    if flags.contains(AutolinkFlags::EMAILS) {
        table[b'@' as usize] = Action::Email;
    }

    if flags.contains(AutolinkFlags::URLS) {
        table[b'w' as usize] = Action::Www;
        table[b'W' as usize] = Action::Www;
        table[b':' as usize] = Action::Url;
    }

    table
}

/// A recognized link, measured from the trigger byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Match {
    /// Input bytes consumed starting at the trigger.
    len: usize,
    /// Already-emitted bytes that belong to the link.
    rewind: usize,
}

/// Scan `text` and append it to `ob`, turning bare links into anchors.
///
/// `link_attr` is inserted verbatim after `<a` (include the leading
/// space). `link_text` renders the anchor body; by default the link is
/// HTML-escaped.
///
/// # Example
/// ```
/// use mkdhtml::Buffer;
/// use mkdhtml::autolink::{autolink, AutolinkFlags};
///
/// let mut ob = Buffer::new(64);
/// autolink(&mut ob, b"Check www.example.com now", AutolinkFlags::URLS, None, None);
/// assert_eq!(
///     ob.to_str_lossy(),
///     "Check <a href=\"http://www.example.com\">www.example.com</a> now"
/// );
/// ```
pub fn autolink(
    ob: &mut Buffer,
    text: &[u8],
    flags: AutolinkFlags,
    link_attr: Option<&str>,
    mut link_text: Option<&mut dyn FnMut(&mut Buffer, &[u8])>,
) {
    if text.is_empty() {
        return;
    }

    let active = active_chars(flags);
    let mut link = Buffer::new(LINK_UNIT);

    // Output is at least as long as the input.
    let _ = ob.grow(ob.len() + text.len());

    let mut i = 0;
    let mut end = 0;
    // Start of the bytes copied verbatim since the last anchor.
    let mut run_start = 0;

    while i < text.len() {
        while end < text.len() && active[text[end] as usize] == Action::None {
            end += 1;
        }

        ob.put(&text[i..end]);

        if end >= text.len() {
            break;
        }

        i = end;
        let action = active[text[i] as usize];
        link.clear();

        let consumed = match action {
            Action::None => 0,
            Action::SkipTag => skip_tag(ob, &text[i..]),
            Action::Www | Action::Email | Action::Url => {
                let max_rewind = i - run_start;
                let found = match action {
                    Action::Www => match_www(&mut link, text, i),
                    Action::Email => match_email(&mut link, text, i, max_rewind),
                    _ => match_url(&mut link, text, i, max_rewind, flags),
                };

                match found {
                    Some(m) => {
                        ob.truncate(ob.len().saturating_sub(m.rewind));
                        ob.put(b"<a");
                        if let Some(attr) = link_attr {
                            ob.puts(attr);
                        }
                        ob.put(b" href=\"");
                        ob.put(action.href_prefix());
                        put_href(ob, link.as_bytes());
                        ob.put(b"\">");
                        match link_text.as_deref_mut() {
                            Some(render) => render(ob, link.as_bytes()),
                            None => escape_html(ob, link.as_bytes()),
                        }
                        ob.put(b"</a>");
                        run_start = i + m.len;
                        m.len
                    }
                    None => 0,
                }
            }
        };

        if consumed == 0 {
            end = i + 1;
        } else {
            i += consumed;
            end = i;
        }
    }
}

/// Copy the link into an `href` value; only `"` needs replacing since the
/// text is already HTML.
fn put_href(ob: &mut Buffer, link: &[u8]) {
    for part in link.split_inclusive(|&c| c == b'"') {
        match part.split_last() {
            Some((&b'"', head)) => {
                ob.put(head);
                ob.put(b"&quot;");
            }
            _ => ob.put(part),
        }
    }
}

/// Check a link against the scheme allow-list.
///
/// Accepts `#`, `/`, `http://`, `https://`, `ftp://` and `mailto:`
/// (case-insensitive) when followed by an alphanumeric byte.
pub fn is_safe_link(link: &[u8]) -> bool {
    const SAFE_PREFIXES: [&[u8]; 6] = [b"#", b"/", b"http://", b"https://", b"ftp://", b"mailto:"];

    SAFE_PREFIXES.iter().any(|prefix| {
        link.len() > prefix.len()
            && link[..prefix.len()].eq_ignore_ascii_case(prefix)
            && link[prefix.len()].is_ascii_alphanumeric()
    })
}

/// Copy an HTML tag starting at `<`. An opening anchor is copied through
/// its matching `</a>`. Returns the number of bytes copied.
fn skip_tag(ob: &mut Buffer, tag: &[u8]) -> usize {
    let mut i = memchr(b'>', tag).unwrap_or(tag.len());

    if opens_anchor(tag) {
        let mut pos = i;
        i = tag.len();
        while let Some(offset) = memchr(b'<', &tag[pos..]) {
            pos += offset;
            if let Some(close) = closing_anchor_end(&tag[pos..]) {
                i = pos + close;
                break;
            }
            pos += 1;
        }
    }

    let end = (i + 1).min(tag.len());
    ob.put(&tag[..end]);
    end
}

fn opens_anchor(tag: &[u8]) -> bool {
    tag.len() > 2 && tag[1].eq_ignore_ascii_case(&b'a') && (is_space(tag[2]) || tag[2] == b'>')
}

/// Offset of the final `>` if `tag` starts with `</a>` (spaces allowed).
fn closing_anchor_end(tag: &[u8]) -> Option<usize> {
    if tag.len() < 4 || tag[0] != b'<' || tag[1] != b'/' {
        return None;
    }

    let mut i = 2;
    while i < tag.len() && is_space(tag[i]) {
        i += 1;
    }
    if i == tag.len() || !tag[i].eq_ignore_ascii_case(&b'a') {
        return None;
    }
    i += 1;

    while i < tag.len() && is_space(tag[i]) {
        i += 1;
    }
    if i == tag.len() || tag[i] != b'>' {
        return None;
    }

    Some(i)
}

/// Length of a plausible host name at the start of `data`.
fn check_domain(data: &[u8], allow_short: bool) -> usize {
    if data.is_empty() || !data[0].is_ascii_alphanumeric() {
        return 0;
    }

    let mut dots = 0;
    let mut i = 1;
    while i + 1 < data.len() {
        if data[i] == b'.' {
            dots += 1;
        } else if !data[i].is_ascii_alphanumeric() && data[i] != b'-' {
            break;
        }
        i += 1;
    }

    if allow_short || dots > 0 { i } else { 0 }
}

/// Shorten a candidate link so trailing punctuation, a trailing entity and
/// an unbalanced closing bracket or quote stay outside the anchor.
fn trim_delimiters(data: &[u8], mut link_end: usize) -> usize {
    if let Some(lt) = memchr(b'<', &data[..link_end]) {
        link_end = lt;
    }

    while link_end > 0 {
        match data[link_end - 1] {
            b'?' | b'!' | b'.' | b',' => link_end -= 1,
            b';' if link_end >= 2 => {
                let mut new_end = link_end - 2;
                while new_end > 0 && data[new_end].is_ascii_alphabetic() {
                    new_end -= 1;
                }
                if new_end < link_end - 2 && data[new_end] == b'&' {
                    link_end = new_end;
                } else {
                    link_end -= 1;
                }
            }
            b';' => link_end -= 1,
            _ => break,
        }
    }

    if link_end == 0 {
        return 0;
    }

    let close = data[link_end - 1];
    let open = match close {
        b'"' => b'"',
        b'\'' => b'\'',
        b')' => b'(',
        b']' => b'[',
        b'}' => b'{',
        _ => return link_end,
    };

    let (mut opening, mut closing) = (0usize, 0usize);
    for &c in &data[..link_end] {
        if c == open {
            opening += 1;
        } else if c == close {
            closing += 1;
        }
    }

    if opening != closing {
        link_end -= 1;
    }
    link_end
}

/// `www.` links. The byte before the trigger must be a word boundary.
fn match_www(link: &mut Buffer, text: &[u8], pos: usize) -> Option<Match> {
    let data = &text[pos..];

    if pos > 0 {
        let prev = text[pos - 1];
        if !prev.is_ascii_punctuation() && !is_space(prev) {
            return None;
        }
    }

    if data.len() < 4 || !data[..4].eq_ignore_ascii_case(b"www.") {
        return None;
    }

    let mut link_end = check_domain(data, false);
    if link_end == 0 {
        return None;
    }

    while link_end < data.len() && !is_space(data[link_end]) {
        link_end += 1;
    }

    let link_end = trim_delimiters(data, link_end);
    if link_end == 0 {
        return None;
    }

    link.put(&data[..link_end]);
    Some(Match {
        len: link_end,
        rewind: 0,
    })
}

/// `local@domain.tld` links, triggered on the `@`.
fn match_email(link: &mut Buffer, text: &[u8], pos: usize, max_rewind: usize) -> Option<Match> {
    let data = &text[pos..];

    let mut rewind = 0;
    while rewind < max_rewind {
        let c = text[pos - rewind - 1];
        if c.is_ascii_alphanumeric() || matches!(c, b'.' | b'+' | b'-' | b'_') {
            rewind += 1;
        } else {
            break;
        }
    }

    if rewind == 0 {
        return None;
    }

    let (mut at_signs, mut dots) = (0, 0);
    let mut link_end = 0;
    while link_end < data.len() {
        let c = data[link_end];
        if c.is_ascii_alphanumeric() {
            // part of the domain
        } else if c == b'@' {
            at_signs += 1;
        } else if c == b'.' && link_end + 1 < data.len() {
            dots += 1;
        } else if c != b'-' && c != b'_' {
            break;
        }
        link_end += 1;
    }

    if link_end < 2 || at_signs != 1 || dots == 0 || !data[link_end - 1].is_ascii_alphabetic() {
        return None;
    }

    let link_end = trim_delimiters(data, link_end);
    if link_end == 0 {
        return None;
    }

    link.put(&text[pos - rewind..pos + link_end]);
    Some(Match {
        len: link_end,
        rewind,
    })
}

/// `scheme://host/...` links, triggered on the `:`.
fn match_url(
    link: &mut Buffer,
    text: &[u8],
    pos: usize,
    max_rewind: usize,
    flags: AutolinkFlags,
) -> Option<Match> {
    let data = &text[pos..];

    if data.len() < 4 || data[1] != b'/' || data[2] != b'/' {
        return None;
    }

    let mut rewind = 0;
    while rewind < max_rewind && text[pos - rewind - 1].is_ascii_alphabetic() {
        rewind += 1;
    }

    if !is_safe_link(&text[pos - rewind..]) {
        return None;
    }

    let mut link_end = 3;
    let domain_len = check_domain(
        &data[link_end..],
        flags.contains(AutolinkFlags::SHORT_DOMAINS),
    );
    if domain_len == 0 {
        return None;
    }
    link_end += domain_len;

    while link_end < data.len() && !is_space(data[link_end]) {
        link_end += 1;
    }

    let link_end = trim_delimiters(data, link_end);
    if link_end == 0 {
        return None;
    }

    link.put(&text[pos - rewind..pos + link_end]);
    Some(Match {
        len: link_end,
        rewind,
    })
}
