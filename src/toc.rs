//! Table of contents callbacks.
//!
//! Headers become nested `<ul>` lists linking to the `toc_N` anchors that
//! the HTML renderer writes under [`RenderFlags::TOC`](crate::RenderFlags::TOC).
//! An entry's `<li>` stays open until the next header, so a deeper header
//! nests inside it:
//!
//! ```text
//! # A            <ul>
//! ## B           <li><a href="#toc_0">A</a>
//! # C            <ul>
//!                <li><a href="#toc_1">B</a>
//!                </li>
//!                </ul>
//!                </li>
//!                <li><a href="#toc_2">C</a>
//!                </li>
//!                </ul>
//! ```

use std::cmp::Ordering;

use crate::callbacks::Callbacks;
use crate::html::{self, RenderOptions, TocState};
use crate::Buffer;

pub(crate) fn toc_header(ob: &mut Buffer, text: &[u8], level: u32, options: &mut RenderOptions) {
    let toc = &mut options.toc;
    let level = TocState::normalize(level);
    if !toc.includes(level) {
        return;
    }

    if toc.current_level == 0 {
        toc.level_offset = level.saturating_sub(1);
    }
    let level = level.saturating_sub(toc.level_offset).max(1);

    match level.cmp(&toc.current_level) {
        Ordering::Greater => {
            while toc.current_level < level {
                ob.put(b"<ul>\n<li>");
                toc.current_level += 1;
            }
        }
        Ordering::Less => {
            ob.put(b"</li>\n");
            while toc.current_level > level {
                ob.put(b"</ul>\n</li>\n");
                toc.current_level -= 1;
            }
            ob.put(b"<li>");
        }
        Ordering::Equal => ob.put(b"</li>\n<li>"),
    }

    ob.printf(format_args!("<a href=\"#toc_{}\">", toc.header_count));
    toc.header_count += 1;
    ob.put(text);
    ob.put(b"</a>\n");
}

/// Link text without the link.
pub(crate) fn toc_link(
    ob: &mut Buffer,
    _link: &[u8],
    _title: &[u8],
    content: &[u8],
    _options: &mut RenderOptions,
) -> bool {
    ob.put(content);
    true
}

/// Close every list still open.
pub(crate) fn toc_finalize(ob: &mut Buffer, options: &mut RenderOptions) {
    let toc = &mut options.toc;
    while toc.current_level > 0 {
        ob.put(b"</li>\n</ul>\n");
        toc.current_level -= 1;
    }
}

/// Callbacks that render only a table of contents.
pub fn toc_callbacks() -> Callbacks {
    tracing::trace!("built toc callbacks");
    Callbacks {
        header: Some(toc_header),

        codespan: Some(html::rndr_codespan),
        double_emphasis: Some(html::rndr_double_emphasis),
        emphasis: Some(html::rndr_emphasis),
        underline: Some(html::rndr_underline),
        highlight: Some(html::rndr_highlight),
        quote: Some(html::rndr_quote),
        link: Some(toc_link),
        triple_emphasis: Some(html::rndr_triple_emphasis),
        strikethrough: Some(html::rndr_strikethrough),
        superscript: Some(html::rndr_superscript),

        normal_text: Some(html::rndr_normal_text),

        doc_footer: Some(toc_finalize),
        ..Callbacks::default()
    }
}
