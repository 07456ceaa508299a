//! HTML callbacks and the per-render options they share.
//!
//! Fragments handed to a callback are already HTML and are copied as is.
//! Values that come straight from the source document (code, language
//! ids, titles, alt text, URLs) are escaped here.

use bitflags::bitflags;
use memchr::{memchr, memmem, memrchr};
use smallvec::SmallVec;

use crate::autolink::is_safe_link;
use crate::callbacks::{Alignment, AutolinkType, Callbacks, ListFlags, TableFlags};
use crate::chars::is_space;
use crate::escape::{escape_href, escape_html};
use crate::limits::{MAX_HEADER_LEVEL, TAB_WIDTH};
use crate::smartypants::{smartypants_with_state, QuoteState};
use crate::Buffer;

bitflags! {
    /// Switches for the HTML renderer.
    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RenderFlags: u32 {
        /// Drop raw HTML blocks and tags.
        const SKIP_HTML = 1 << 0;
        /// Drop `<style>` tags.
        const SKIP_STYLE = 1 << 1;
        /// Drop images and `<img>` tags.
        const SKIP_IMAGES = 1 << 2;
        /// Drop links, autolinks and `<a>` tags.
        const SKIP_LINKS = 1 << 3;
        /// Expand tabs in code blocks to four-column stops.
        const EXPAND_TABS = 1 << 4;
        /// Only render links accepted by the link filter.
        const SAFELINK = 1 << 5;
        /// Anchor headers for a table of contents.
        const TOC = 1 << 6;
        /// Turn newlines inside paragraphs into line breaks.
        const HARD_WRAP = 1 << 7;
        /// Self-closing void tags (`<br/>`).
        const USE_XHTML = 1 << 8;
        /// Escape raw HTML instead of passing it through.
        const ESCAPE = 1 << 9;
        /// Extra newlines after block containers.
        const PRETTIFY = 1 << 10;
        /// `<pre lang="...">` code blocks.
        const GITHUB_BLOCKCODE = 1 << 11;
        /// Typographic substitution in text.
        const SMARTYPANTS = 1 << 12;
    }
}

/// Decides whether a URL may be rendered as a link under
/// [`RenderFlags::SAFELINK`].
pub type LinkFilter = fn(&[u8]) -> bool;

/// Writes extra attributes into an opening `<a` tag, e.g. ` rel="nofollow"`.
pub type LinkAttributes = fn(&mut Buffer, &[u8], &RenderOptions);

/// Table of contents counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TocState {
    /// Headers anchored so far; the next anchor is `toc_{header_count}`.
    pub header_count: u32,
    /// Depth of the last TOC entry, 0 before the first.
    pub current_level: u32,
    /// Subtracted from header levels so the first header sits at depth 1.
    pub level_offset: u32,
    /// Headers deeper than this are left out.
    pub nesting_level: u32,
}

impl Default for TocState {
    fn default() -> Self {
        Self {
            header_count: 0,
            current_level: 0,
            level_offset: 0,
            nesting_level: MAX_HEADER_LEVEL,
        }
    }
}

impl TocState {
    /// Header level as rendered: clamped to `1..=6`.
    #[inline]
    pub fn normalize(level: u32) -> u32 {
        level.clamp(1, MAX_HEADER_LEVEL)
    }

    /// Whether a header at `level` gets an anchor and a TOC entry.
    #[inline]
    pub fn includes(&self, level: u32) -> bool {
        Self::normalize(level) <= self.nesting_level
    }
}

/// Mutable state of one render, passed to every callback.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    flags: RenderFlags,
    pub toc: TocState,
    /// Open quotes; closed again at the end of each paragraph.
    pub quotes: QuoteState,
    link_filter: LinkFilter,
    link_attributes: Option<LinkAttributes>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::new(RenderFlags::empty())
    }
}

impl RenderOptions {
    pub fn new(flags: RenderFlags) -> Self {
        Self {
            flags,
            toc: TocState::default(),
            quotes: QuoteState::default(),
            link_filter: is_safe_link,
            link_attributes: None,
        }
    }

    /// Replace the scheme allow-list used under [`RenderFlags::SAFELINK`].
    pub fn with_link_filter(mut self, filter: LinkFilter) -> Self {
        self.link_filter = filter;
        self
    }

    pub fn with_link_attributes(mut self, attributes: LinkAttributes) -> Self {
        self.link_attributes = Some(attributes);
        self
    }

    /// Leave headers deeper than `level` out of the table of contents.
    pub fn with_toc_nesting_level(mut self, level: u32) -> Self {
        self.toc.nesting_level = level;
        self
    }

    #[inline]
    pub fn flags(&self) -> RenderFlags {
        self.flags
    }

    #[inline]
    fn has(&self, flag: RenderFlags) -> bool {
        self.flags.contains(flag)
    }

    /// Whether `link` may be rendered as a link.
    pub fn allows_link(&self, link: &[u8]) -> bool {
        !self.has(RenderFlags::SAFELINK) || (self.link_filter)(link)
    }

    /// `/>` under [`RenderFlags::USE_XHTML`], `>` otherwise.
    #[inline]
    fn void_close(&self) -> &'static [u8] {
        if self.has(RenderFlags::USE_XHTML) { b"/>" } else { b">" }
    }

    /// Close the `href` attribute and the opening `<a` tag.
    fn close_anchor_open(&self, ob: &mut Buffer, link: &[u8]) {
        ob.putc(b'"');
        if let Some(attributes) = self.link_attributes {
            attributes(ob, link, self);
        }
        ob.putc(b'>');
    }
}

/// Result of [`is_html_tag`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HtmlTag {
    None,
    Open,
    Close,
}

/// Classify `tag` as an opening or closing tag named `name`
/// (ASCII case-insensitive).
pub fn is_html_tag(tag: &[u8], name: &str) -> HtmlTag {
    let Some(rest) = tag.strip_prefix(b"<") else {
        return HtmlTag::None;
    };
    let rest = trim_start(rest);
    let (kind, rest) = match rest.strip_prefix(b"/") {
        Some(rest) => (HtmlTag::Close, trim_start(rest)),
        None => (HtmlTag::Open, rest),
    };

    let name = name.as_bytes();
    if rest.len() <= name.len() || !rest[..name.len()].eq_ignore_ascii_case(name) {
        return HtmlTag::None;
    }

    match rest[name.len()] {
        b'>' => kind,
        c if is_space(c) => kind,
        _ => HtmlTag::None,
    }
}

fn trim_start(s: &[u8]) -> &[u8] {
    let start = s.iter().position(|&c| !is_space(c)).unwrap_or(s.len());
    &s[start..]
}

#[inline]
fn block_separator(ob: &mut Buffer) {
    if !ob.is_empty() {
        ob.putc(b'\n');
    }
}

/// Escape code text, expanding tabs when asked to.
fn put_code(ob: &mut Buffer, text: &[u8], options: &RenderOptions) {
    if !options.has(RenderFlags::EXPAND_TABS) || memchr(b'\t', text).is_none() {
        escape_html(ob, text);
        return;
    }

    let mut column = 0;
    for segment in text.split_inclusive(|&c| c == b'\t') {
        let (body, tab) = match segment.split_last() {
            Some((&b'\t', body)) => (body, true),
            _ => (segment, false),
        };
        escape_html(ob, body);

        column = match memrchr(b'\n', body) {
            Some(nl) => columns(&body[nl + 1..]),
            None => column + columns(body),
        };

        if tab {
            let pad = TAB_WIDTH - column % TAB_WIDTH;
            for _ in 0..pad {
                ob.putc(b' ');
            }
            column += pad;
        }
    }
}

/// Display columns, counting UTF-8 lead bytes only.
#[inline]
fn columns(s: &[u8]) -> usize {
    s.iter().filter(|&&c| c & 0xC0 != 0x80).count()
}

fn class_names(lang: &[u8]) -> SmallVec<[&[u8]; 4]> {
    lang.split(|&c| is_space(c))
        .filter(|word| !word.is_empty())
        .map(|word| word.strip_prefix(b".").unwrap_or(word))
        .collect()
}

pub(crate) fn rndr_blockcode(
    ob: &mut Buffer,
    text: &[u8],
    lang: &[u8],
    options: &mut RenderOptions,
) {
    block_separator(ob);

    let classes = class_names(lang);
    if classes.is_empty() {
        ob.put(b"<pre><code>");
    } else {
        ob.put(b"<pre><code class=\"");
        for (n, class) in classes.iter().enumerate() {
            if n > 0 {
                ob.putc(b' ');
            }
            escape_html(ob, class);
        }
        ob.put(b"\">");
    }

    put_code(ob, text, options);
    ob.put(b"</code></pre>\n");
}

/// Code block with the first language id on `<pre lang="...">`.
pub(crate) fn rndr_blockcode_github(
    ob: &mut Buffer,
    text: &[u8],
    lang: &[u8],
    options: &mut RenderOptions,
) {
    block_separator(ob);

    match class_names(lang).first() {
        Some(lang) => {
            ob.put(b"<pre lang=\"");
            escape_html(ob, lang);
            ob.put(b"\"><code>");
        }
        None => ob.put(b"<pre><code>"),
    }

    put_code(ob, text, options);
    ob.put(b"</code></pre>\n");
}

pub(crate) fn rndr_blockquote(ob: &mut Buffer, text: &[u8], options: &mut RenderOptions) {
    block_separator(ob);
    ob.put(b"<blockquote>\n");
    ob.put(text);
    ob.put(b"</blockquote>");
    if options.has(RenderFlags::PRETTIFY) {
        ob.putc(b'\n');
    }
}

pub(crate) fn rndr_raw_block(ob: &mut Buffer, text: &[u8], _options: &mut RenderOptions) {
    let end = text.iter().rposition(|&c| c != b'\n').map_or(0, |p| p + 1);
    let start = text[..end].iter().position(|&c| c != b'\n').unwrap_or(end);
    if start >= end {
        return;
    }

    block_separator(ob);
    ob.put(&text[start..end]);
    ob.putc(b'\n');
}

pub(crate) fn rndr_header(ob: &mut Buffer, text: &[u8], level: u32, options: &mut RenderOptions) {
    block_separator(ob);

    let level = TocState::normalize(level);
    if options.has(RenderFlags::TOC) && options.toc.includes(level) {
        ob.printf(format_args!("<a name=\"toc_{}\"></a>", options.toc.header_count));
        options.toc.header_count += 1;
    }

    ob.printf(format_args!("<h{level}>"));
    ob.put(text);
    ob.printf(format_args!("</h{level}>\n"));
}

pub(crate) fn rndr_hrule(ob: &mut Buffer, options: &mut RenderOptions) {
    block_separator(ob);
    ob.put(b"<hr");
    ob.put(options.void_close());
    ob.putc(b'\n');
}

pub(crate) fn rndr_list(ob: &mut Buffer, text: &[u8], flags: ListFlags, _options: &mut RenderOptions) {
    block_separator(ob);
    let ordered = flags.contains(ListFlags::ORDERED);
    ob.put(if ordered { b"<ol>\n" } else { b"<ul>\n" });
    ob.put(text);
    ob.put(if ordered { b"</ol>\n" } else { b"</ul>\n" });
}

pub(crate) fn rndr_listitem(
    ob: &mut Buffer,
    text: &[u8],
    _flags: ListFlags,
    _options: &mut RenderOptions,
) {
    let end = text.iter().rposition(|&c| c != b'\n').map_or(0, |p| p + 1);
    ob.put(b"<li>");
    ob.put(&text[..end]);
    ob.put(b"</li>\n");
}

pub(crate) fn rndr_paragraph(ob: &mut Buffer, text: &[u8], options: &mut RenderOptions) {
    options.quotes.reset();
    block_separator(ob);

    let Some(start) = text.iter().position(|&c| !is_space(c)) else {
        return;
    };
    let text = &text[start..];

    ob.put(b"<p>");
    if options.has(RenderFlags::HARD_WRAP) {
        let mut lines = text.split(|&c| c == b'\n').peekable();
        while let Some(line) = lines.next() {
            ob.put(line);
            if lines.peek().is_some() {
                ob.put(b"<br");
                ob.put(options.void_close());
                ob.putc(b'\n');
            }
        }
    } else {
        ob.put(text);
    }
    ob.put(b"</p>\n");
}

pub(crate) fn rndr_table(ob: &mut Buffer, header: &[u8], body: &[u8], options: &mut RenderOptions) {
    block_separator(ob);
    ob.put(b"<table><thead>\n");
    ob.put(header);
    ob.put(b"\n</thead><tbody>\n");
    ob.put(body);
    ob.put(b"\n</tbody></table>");
    if options.has(RenderFlags::PRETTIFY) {
        ob.putc(b'\n');
    }
}

pub(crate) fn rndr_table_row(ob: &mut Buffer, text: &[u8], _options: &mut RenderOptions) {
    block_separator(ob);
    ob.put(b"<tr>\n");
    ob.put(text);
    ob.put(b"\n</tr>");
}

pub(crate) fn rndr_table_cell(
    ob: &mut Buffer,
    text: &[u8],
    flags: TableFlags,
    _options: &mut RenderOptions,
) {
    block_separator(ob);
    let tag: &[u8] = if flags.is_header() { b"th" } else { b"td" };

    ob.putc(b'<');
    ob.put(tag);
    match flags.alignment() {
        Alignment::Left => ob.put(b" align=\"left\""),
        Alignment::Right => ob.put(b" align=\"right\""),
        Alignment::Center => ob.put(b" align=\"center\""),
        Alignment::None => {}
    }
    ob.putc(b'>');
    ob.put(text);
    ob.put(b"</");
    ob.put(tag);
    ob.putc(b'>');
}

pub(crate) fn rndr_footnotes(ob: &mut Buffer, text: &[u8], options: &mut RenderOptions) {
    block_separator(ob);
    ob.put(b"<div class=\"footnotes\">\n<hr");
    ob.put(options.void_close());
    ob.put(b"\n<ol>\n");
    ob.put(text);
    ob.put(b"\n</ol>\n</div>\n");
}

/// Footnote body with a back reference at the end of its first paragraph.
pub(crate) fn rndr_footnote_def(
    ob: &mut Buffer,
    text: &[u8],
    number: u32,
    _options: &mut RenderOptions,
) {
    ob.printf(format_args!("\n<li id=\"fn{number}\">\n"));
    match memmem::find(text, b"</p>") {
        Some(end) => {
            ob.put(&text[..end]);
            ob.printf(format_args!(
                "&nbsp;<a href=\"#fnref{number}\" rev=\"footnote\">&#8617;</a>"
            ));
            ob.put(&text[end..]);
        }
        None => ob.put(text),
    }
    ob.put(b"</li>\n");
}

pub(crate) fn rndr_autolink(
    ob: &mut Buffer,
    link: &[u8],
    kind: AutolinkType,
    options: &mut RenderOptions,
) -> bool {
    if link.is_empty() {
        return false;
    }
    if kind != AutolinkType::Email && !options.allows_link(link) {
        return false;
    }

    ob.put(b"<a href=\"");
    if kind == AutolinkType::Email {
        ob.put(b"mailto:");
    }
    escape_href(ob, link);
    options.close_anchor_open(ob, link);

    // Show `mailto:me@example.com` as the bare address.
    escape_html(ob, link.strip_prefix(b"mailto:").unwrap_or(link));
    ob.put(b"</a>");
    true
}

pub(crate) fn rndr_codespan(ob: &mut Buffer, text: &[u8], _options: &mut RenderOptions) -> bool {
    ob.put(b"<code>");
    escape_html(ob, text);
    ob.put(b"</code>");
    true
}

/// Wrap non-empty `text` in `open`/`close`.
#[inline]
fn wrap_span(ob: &mut Buffer, text: &[u8], open: &[u8], close: &[u8]) -> bool {
    if text.is_empty() {
        return false;
    }
    ob.put(open);
    ob.put(text);
    ob.put(close);
    true
}

pub(crate) fn rndr_double_emphasis(
    ob: &mut Buffer,
    text: &[u8],
    _options: &mut RenderOptions,
) -> bool {
    wrap_span(ob, text, b"<strong>", b"</strong>")
}

pub(crate) fn rndr_emphasis(ob: &mut Buffer, text: &[u8], _options: &mut RenderOptions) -> bool {
    wrap_span(ob, text, b"<em>", b"</em>")
}

pub(crate) fn rndr_underline(ob: &mut Buffer, text: &[u8], _options: &mut RenderOptions) -> bool {
    wrap_span(ob, text, b"<u>", b"</u>")
}

pub(crate) fn rndr_highlight(ob: &mut Buffer, text: &[u8], _options: &mut RenderOptions) -> bool {
    wrap_span(ob, text, b"<mark>", b"</mark>")
}

pub(crate) fn rndr_quote(ob: &mut Buffer, text: &[u8], _options: &mut RenderOptions) -> bool {
    wrap_span(ob, text, b"<q>", b"</q>")
}

pub(crate) fn rndr_triple_emphasis(
    ob: &mut Buffer,
    text: &[u8],
    _options: &mut RenderOptions,
) -> bool {
    wrap_span(ob, text, b"<strong><em>", b"</em></strong>")
}

pub(crate) fn rndr_strikethrough(
    ob: &mut Buffer,
    text: &[u8],
    _options: &mut RenderOptions,
) -> bool {
    wrap_span(ob, text, b"<del>", b"</del>")
}

pub(crate) fn rndr_superscript(
    ob: &mut Buffer,
    text: &[u8],
    _options: &mut RenderOptions,
) -> bool {
    wrap_span(ob, text, b"<sup>", b"</sup>")
}

pub(crate) fn rndr_image(
    ob: &mut Buffer,
    link: &[u8],
    title: &[u8],
    alt: &[u8],
    options: &mut RenderOptions,
) -> bool {
    if link.is_empty() || !options.allows_link(link) {
        return false;
    }

    ob.put(b"<img src=\"");
    escape_href(ob, link);
    ob.put(b"\" alt=\"");
    escape_html(ob, alt);
    if !title.is_empty() {
        ob.put(b"\" title=\"");
        escape_html(ob, title);
    }
    ob.putc(b'"');
    ob.put(options.void_close());
    true
}

pub(crate) fn rndr_linebreak(ob: &mut Buffer, options: &mut RenderOptions) -> bool {
    ob.put(b"<br");
    ob.put(options.void_close());
    ob.putc(b'\n');
    true
}

pub(crate) fn rndr_link(
    ob: &mut Buffer,
    link: &[u8],
    title: &[u8],
    content: &[u8],
    options: &mut RenderOptions,
) -> bool {
    if !options.allows_link(link) {
        return false;
    }

    ob.put(b"<a href=\"");
    escape_href(ob, link);
    if !title.is_empty() {
        ob.put(b"\" title=\"");
        escape_html(ob, title);
    }
    options.close_anchor_open(ob, link);
    ob.put(content);
    ob.put(b"</a>");
    true
}

pub(crate) fn rndr_raw_html(ob: &mut Buffer, text: &[u8], options: &mut RenderOptions) -> bool {
    if options.has(RenderFlags::ESCAPE) {
        escape_html(ob, text);
        return true;
    }

    let skipped = options.has(RenderFlags::SKIP_HTML)
        || (options.has(RenderFlags::SKIP_STYLE) && is_html_tag(text, "style") != HtmlTag::None)
        || (options.has(RenderFlags::SKIP_LINKS) && is_html_tag(text, "a") != HtmlTag::None)
        || (options.has(RenderFlags::SKIP_IMAGES) && is_html_tag(text, "img") != HtmlTag::None);

    if !skipped {
        ob.put(text);
    }
    true
}

pub(crate) fn rndr_footnote_ref(ob: &mut Buffer, number: u32, _options: &mut RenderOptions) -> bool {
    ob.printf(format_args!(
        "<sup id=\"fnref{number}\"><a href=\"#fn{number}\" rel=\"footnote\">{number}</a></sup>"
    ));
    true
}

pub(crate) fn rndr_normal_text(ob: &mut Buffer, text: &[u8], _options: &mut RenderOptions) {
    escape_html(ob, text);
}

pub(crate) fn rndr_smartypants(ob: &mut Buffer, text: &[u8], options: &mut RenderOptions) {
    smartypants_with_state(ob, text, &mut options.quotes);
}

/// The HTML callback table for `flags`.
pub fn html_callbacks(flags: RenderFlags) -> Callbacks {
    let mut callbacks = Callbacks {
        blockcode: Some(rndr_blockcode),
        blockquote: Some(rndr_blockquote),
        blockhtml: Some(rndr_raw_block),
        header: Some(rndr_header),
        hrule: Some(rndr_hrule),
        list: Some(rndr_list),
        listitem: Some(rndr_listitem),
        paragraph: Some(rndr_paragraph),
        table: Some(rndr_table),
        table_row: Some(rndr_table_row),
        table_cell: Some(rndr_table_cell),
        footnotes: Some(rndr_footnotes),
        footnote_def: Some(rndr_footnote_def),

        autolink: Some(rndr_autolink),
        codespan: Some(rndr_codespan),
        double_emphasis: Some(rndr_double_emphasis),
        emphasis: Some(rndr_emphasis),
        underline: Some(rndr_underline),
        highlight: Some(rndr_highlight),
        quote: Some(rndr_quote),
        image: Some(rndr_image),
        linebreak: Some(rndr_linebreak),
        link: Some(rndr_link),
        raw_html_tag: Some(rndr_raw_html),
        triple_emphasis: Some(rndr_triple_emphasis),
        strikethrough: Some(rndr_strikethrough),
        superscript: Some(rndr_superscript),
        footnote_ref: Some(rndr_footnote_ref),

        entity: None,
        normal_text: Some(rndr_normal_text),

        doc_header: None,
        doc_footer: None,
    };

    if flags.contains(RenderFlags::SKIP_IMAGES) {
        callbacks.image = None;
    }

    if flags.contains(RenderFlags::SKIP_LINKS) {
        callbacks.link = None;
        callbacks.autolink = None;
    }

    if flags.intersects(RenderFlags::SKIP_HTML | RenderFlags::ESCAPE) {
        callbacks.blockhtml = None;
    }

    if flags.contains(RenderFlags::SMARTYPANTS) {
        callbacks.normal_text = Some(rndr_smartypants);
    }

    if flags.contains(RenderFlags::GITHUB_BLOCKCODE) {
        callbacks.blockcode = Some(rndr_blockcode_github);
    }

    tracing::trace!(flags = flags.bits(), "built html callbacks");
    callbacks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(f: impl FnOnce(&mut Buffer, &mut RenderOptions), flags: RenderFlags) -> String {
        let mut ob = Buffer::new(64);
        let mut options = RenderOptions::new(flags);
        f(&mut ob, &mut options);
        ob.to_str_lossy().into_owned()
    }

    #[test]
    fn test_is_html_tag() {
        assert_eq!(is_html_tag(b"<style>", "style"), HtmlTag::Open);
        assert_eq!(is_html_tag(b"< STYLE type=\"x\">", "style"), HtmlTag::Open);
        assert_eq!(is_html_tag(b"</a>", "a"), HtmlTag::Close);
        assert_eq!(is_html_tag(b"< / a >", "a"), HtmlTag::Close);
        assert_eq!(is_html_tag(b"<abbr>", "a"), HtmlTag::None);
        assert_eq!(is_html_tag(b"<a", "a"), HtmlTag::None);
        assert_eq!(is_html_tag(b"a>", "a"), HtmlTag::None);
    }

    #[test]
    fn test_blockcode_classes() {
        let html = render(
            |ob, o| rndr_blockcode(ob, b"x < 1\n", b".rust  numbered", o),
            RenderFlags::empty(),
        );
        assert_eq!(html, "<pre><code class=\"rust numbered\">x &lt; 1\n</code></pre>\n");
    }

    #[test]
    fn test_blockcode_blank_lang() {
        let html = render(|ob, o| rndr_blockcode(ob, b"x", b"  ", o), RenderFlags::empty());
        assert_eq!(html, "<pre><code>x</code></pre>\n");
    }

    #[test]
    fn test_blockcode_github() {
        let html = render(
            |ob, o| rndr_blockcode_github(ob, b"fn main() {}\n", b".rust numbered", o),
            RenderFlags::empty(),
        );
        assert_eq!(html, "<pre lang=\"rust\"><code>fn main() {}\n</code></pre>\n");
    }

    #[test]
    fn test_expand_tabs() {
        let html = render(
            |ob, o| rndr_blockcode(ob, b"\tx\nab\ty", b"", o),
            RenderFlags::EXPAND_TABS,
        );
        assert_eq!(html, "<pre><code>    x\nab  y</code></pre>\n");
    }

    #[test]
    fn test_expand_tabs_counts_chars() {
        let html = render(
            |ob, o| rndr_blockcode(ob, "é\tx".as_bytes(), b"", o),
            RenderFlags::EXPAND_TABS,
        );
        assert_eq!(html, "<pre><code>é   x</code></pre>\n");
    }

    #[test]
    fn test_raw_block_trims_newlines() {
        let html = render(|ob, o| rndr_raw_block(ob, b"\n\n<div>x</div>\n\n", o), RenderFlags::empty());
        assert_eq!(html, "<div>x</div>\n");
        let html = render(|ob, o| rndr_raw_block(ob, b"\n\n", o), RenderFlags::empty());
        assert_eq!(html, "");
    }

    #[test]
    fn test_header_toc_anchor() {
        let mut ob = Buffer::new(64);
        let mut options = RenderOptions::new(RenderFlags::TOC).with_toc_nesting_level(2);
        rndr_header(&mut ob, b"One", 1, &mut options);
        rndr_header(&mut ob, b"Deep", 3, &mut options);
        rndr_header(&mut ob, b"Two", 2, &mut options);
        assert_eq!(
            ob.to_str_lossy(),
            "<a name=\"toc_0\"></a><h1>One</h1>\n\n<h3>Deep</h3>\n\n<a name=\"toc_1\"></a><h2>Two</h2>\n"
        );
        assert_eq!(options.toc.header_count, 2);
    }

    #[test]
    fn test_xhtml_void_tags() {
        let html = render(|ob, o| { rndr_linebreak(ob, o); }, RenderFlags::USE_XHTML);
        assert_eq!(html, "<br/>\n");
        let html = render(|ob, o| { rndr_linebreak(ob, o); }, RenderFlags::empty());
        assert_eq!(html, "<br>\n");
        let html = render(|ob, o| rndr_hrule(ob, o), RenderFlags::USE_XHTML);
        assert_eq!(html, "<hr/>\n");
    }

    #[test]
    fn test_paragraph_hard_wrap() {
        let html = render(|ob, o| rndr_paragraph(ob, b"  a\nb", o), RenderFlags::HARD_WRAP);
        assert_eq!(html, "<p>a<br>\nb</p>\n");
    }

    #[test]
    fn test_paragraph_blank_is_dropped() {
        let html = render(|ob, o| rndr_paragraph(ob, b" \n ", o), RenderFlags::empty());
        assert_eq!(html, "");
    }

    #[test]
    fn test_paragraph_closes_quotes() {
        let mut ob = Buffer::new(64);
        let mut options = RenderOptions::new(RenderFlags::SMARTYPANTS);
        options.quotes.in_double = true;
        rndr_paragraph(&mut ob, b"text", &mut options);
        assert_eq!(options.quotes, QuoteState::default());
    }

    #[test]
    fn test_table_cells() {
        let html = render(
            |ob, o| rndr_table_cell(ob, b"h", TableFlags::HEADER | TableFlags::ALIGN_CENTER, o),
            RenderFlags::empty(),
        );
        assert_eq!(html, "<th align=\"center\">h</th>");
        let html = render(|ob, o| rndr_table_cell(ob, b"d", TableFlags::empty(), o), RenderFlags::empty());
        assert_eq!(html, "<td>d</td>");
    }

    #[test]
    fn test_footnote_def_backref() {
        let html = render(
            |ob, o| rndr_footnote_def(ob, b"<p>note</p>\n", 1, o),
            RenderFlags::empty(),
        );
        assert_eq!(
            html,
            "\n<li id=\"fn1\">\n<p>note&nbsp;<a href=\"#fnref1\" rev=\"footnote\">&#8617;</a></p>\n</li>\n"
        );
    }

    #[test]
    fn test_footnote_ref() {
        let html = render(|ob, o| { rndr_footnote_ref(ob, 2, o); }, RenderFlags::empty());
        assert_eq!(html, "<sup id=\"fnref2\"><a href=\"#fn2\" rel=\"footnote\">2</a></sup>");
    }

    #[test]
    fn test_autolink_mailto_text() {
        let html = render(
            |ob, o| {
                rndr_autolink(ob, b"mailto:me@example.com", AutolinkType::Normal, o);
            },
            RenderFlags::empty(),
        );
        assert_eq!(html, "<a href=\"mailto:me@example.com\">me@example.com</a>");
    }

    #[test]
    fn test_autolink_email() {
        let html = render(
            |ob, o| {
                rndr_autolink(ob, b"me@example.com", AutolinkType::Email, o);
            },
            RenderFlags::SAFELINK,
        );
        assert_eq!(html, "<a href=\"mailto:me@example.com\">me@example.com</a>");
    }

    #[test]
    fn test_safelink_rejects() {
        let mut ob = Buffer::new(64);
        let mut options = RenderOptions::new(RenderFlags::SAFELINK);
        assert!(!rndr_link(&mut ob, b"javascript:alert(1)", b"", b"x", &mut options));
        assert!(!rndr_image(&mut ob, b"javascript:alert(1)", b"", b"x", &mut options));
        assert!(!rndr_autolink(&mut ob, b"javascript:alert(1)", AutolinkType::Normal, &mut options));
        assert!(ob.is_empty());
    }

    #[test]
    fn test_custom_link_filter() {
        fn only_https(link: &[u8]) -> bool {
            link.starts_with(b"https://")
        }
        let mut ob = Buffer::new(64);
        let mut options = RenderOptions::new(RenderFlags::SAFELINK).with_link_filter(only_https);
        assert!(!rndr_link(&mut ob, b"http://a.com", b"", b"x", &mut options));
        assert!(rndr_link(&mut ob, b"https://a.com", b"", b"x", &mut options));
        assert_eq!(ob.to_str_lossy(), "<a href=\"https://a.com\">x</a>");
    }

    #[test]
    fn test_link_title_and_attributes() {
        fn nofollow(ob: &mut Buffer, _link: &[u8], _options: &RenderOptions) {
            ob.puts(" rel=\"nofollow\"");
        }
        let mut ob = Buffer::new(64);
        let mut options = RenderOptions::default().with_link_attributes(nofollow);
        rndr_link(&mut ob, b"/a b", b"say \"hi\"", b"<em>x</em>", &mut options);
        assert_eq!(
            ob.to_str_lossy(),
            "<a href=\"/a%20b\" title=\"say &quot;hi&quot;\" rel=\"nofollow\"><em>x</em></a>"
        );
    }

    #[test]
    fn test_image() {
        let html = render(
            |ob, o| {
                rndr_image(ob, b"/i.png", b"T", b"a<b", o);
            },
            RenderFlags::USE_XHTML,
        );
        assert_eq!(html, "<img src=\"/i.png\" alt=\"a&lt;b\" title=\"T\"/>");
    }

    #[test]
    fn test_empty_spans_decline() {
        let mut ob = Buffer::new(64);
        let mut options = RenderOptions::default();
        assert!(!rndr_emphasis(&mut ob, b"", &mut options));
        assert!(!rndr_double_emphasis(&mut ob, b"", &mut options));
        assert!(rndr_highlight(&mut ob, b"m", &mut options));
        assert_eq!(ob.to_str_lossy(), "<mark>m</mark>");
    }

    #[test]
    fn test_raw_html_filters() {
        let mut ob = Buffer::new(64);
        let mut options = RenderOptions::new(RenderFlags::SKIP_STYLE);
        assert!(rndr_raw_html(&mut ob, b"<style>", &mut options));
        assert!(rndr_raw_html(&mut ob, b"<b>", &mut options));
        assert_eq!(ob.to_str_lossy(), "<b>");

        let html = render(|ob, o| { rndr_raw_html(ob, b"<b>", o); }, RenderFlags::ESCAPE);
        assert_eq!(html, "&lt;b&gt;");
    }

    #[test]
    fn test_callbacks_follow_flags() {
        let callbacks = html_callbacks(RenderFlags::SKIP_IMAGES | RenderFlags::SKIP_LINKS);
        assert!(callbacks.image.is_none());
        assert!(callbacks.link.is_none());
        assert!(callbacks.autolink.is_none());
        assert!(callbacks.blockhtml.is_some());

        let callbacks = html_callbacks(RenderFlags::ESCAPE);
        assert!(callbacks.blockhtml.is_none());
        assert!(callbacks.entity.is_none());
    }
}
