//! Callback dispatch with per-slot defaults.
//!
//! A [`Renderer`] pairs a [`Callbacks`] table with the [`RenderOptions`]
//! of one render. The document parser calls the methods below in document
//! order; each applies its slot's default when the slot is empty.
//!
//! # Example
//! ```
//! use mkdhtml::{Buffer, RenderFlags, Renderer};
//!
//! let mut renderer = Renderer::html(RenderFlags::SMARTYPANTS);
//! let mut text = Buffer::new(64);
//! renderer.normal_text(&mut text, b"it's \"done\"");
//!
//! let mut ob = Buffer::new(64);
//! renderer.paragraph(&mut ob, text.as_bytes());
//! assert_eq!(ob.to_str_lossy(), "<p>it&rsquo;s &ldquo;done&rdquo;</p>\n");
//! ```

use crate::callbacks::{AutolinkType, Callbacks, ListFlags, TableFlags};
use crate::html::{html_callbacks, RenderFlags, RenderOptions};
use crate::toc::toc_callbacks;
use crate::Buffer;

/// A callback table and the state of the render it drives.
#[derive(Debug, Clone)]
pub struct Renderer {
    callbacks: Callbacks,
    options: RenderOptions,
}

impl Renderer {
    #[inline]
    pub fn new(callbacks: Callbacks, options: RenderOptions) -> Self {
        Self { callbacks, options }
    }

    /// HTML renderer configured by `flags`.
    pub fn html(flags: RenderFlags) -> Self {
        Self::with_options(RenderOptions::new(flags))
    }

    /// HTML renderer using prepared options (link filter, attributes).
    pub fn with_options(options: RenderOptions) -> Self {
        tracing::debug!(flags = options.flags().bits(), "html renderer");
        Self::new(html_callbacks(options.flags()), options)
    }

    /// Table of contents renderer for headers up to `nesting_level`.
    pub fn toc(nesting_level: u32) -> Self {
        tracing::debug!(nesting_level, "toc renderer");
        let options = RenderOptions::new(RenderFlags::TOC).with_toc_nesting_level(nesting_level);
        Self::new(toc_callbacks(), options)
    }

    #[inline]
    pub fn callbacks(&self) -> &Callbacks {
        &self.callbacks
    }

    #[inline]
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    #[inline]
    pub fn options_mut(&mut self) -> &mut RenderOptions {
        &mut self.options
    }

    /// End the render and hand back its state.
    pub fn into_options(self) -> RenderOptions {
        self.options
    }

    // Block level: an empty slot skips the block.

    pub fn blockcode(&mut self, ob: &mut Buffer, text: &[u8], lang: &[u8]) {
        if let Some(f) = self.callbacks.blockcode {
            f(ob, text, lang, &mut self.options);
        }
    }

    pub fn blockquote(&mut self, ob: &mut Buffer, text: &[u8]) {
        if let Some(f) = self.callbacks.blockquote {
            f(ob, text, &mut self.options);
        }
    }

    pub fn blockhtml(&mut self, ob: &mut Buffer, text: &[u8]) {
        if let Some(f) = self.callbacks.blockhtml {
            f(ob, text, &mut self.options);
        }
    }

    pub fn header(&mut self, ob: &mut Buffer, text: &[u8], level: u32) {
        if let Some(f) = self.callbacks.header {
            f(ob, text, level, &mut self.options);
        }
    }

    pub fn hrule(&mut self, ob: &mut Buffer) {
        if let Some(f) = self.callbacks.hrule {
            f(ob, &mut self.options);
        }
    }

    pub fn list(&mut self, ob: &mut Buffer, text: &[u8], flags: ListFlags) {
        if let Some(f) = self.callbacks.list {
            f(ob, text, flags, &mut self.options);
        }
    }

    pub fn listitem(&mut self, ob: &mut Buffer, text: &[u8], flags: ListFlags) {
        if let Some(f) = self.callbacks.listitem {
            f(ob, text, flags, &mut self.options);
        }
    }

    pub fn paragraph(&mut self, ob: &mut Buffer, text: &[u8]) {
        if let Some(f) = self.callbacks.paragraph {
            f(ob, text, &mut self.options);
        }
    }

    pub fn table(&mut self, ob: &mut Buffer, header: &[u8], body: &[u8]) {
        if let Some(f) = self.callbacks.table {
            f(ob, header, body, &mut self.options);
        }
    }

    pub fn table_row(&mut self, ob: &mut Buffer, text: &[u8]) {
        if let Some(f) = self.callbacks.table_row {
            f(ob, text, &mut self.options);
        }
    }

    pub fn table_cell(&mut self, ob: &mut Buffer, text: &[u8], flags: TableFlags) {
        if let Some(f) = self.callbacks.table_cell {
            f(ob, text, flags, &mut self.options);
        }
    }

    pub fn footnotes(&mut self, ob: &mut Buffer, text: &[u8]) {
        if let Some(f) = self.callbacks.footnotes {
            f(ob, text, &mut self.options);
        }
    }

    pub fn footnote_def(&mut self, ob: &mut Buffer, text: &[u8], number: u32) {
        if let Some(f) = self.callbacks.footnote_def {
            f(ob, text, number, &mut self.options);
        }
    }

    // Span level: `false` tells the parser to print the span source as is.

    pub fn autolink(&mut self, ob: &mut Buffer, link: &[u8], kind: AutolinkType) -> bool {
        match self.callbacks.autolink {
            Some(f) => f(ob, link, kind, &mut self.options),
            None => false,
        }
    }

    pub fn codespan(&mut self, ob: &mut Buffer, text: &[u8]) -> bool {
        self.span(self.callbacks.codespan, ob, text)
    }

    pub fn double_emphasis(&mut self, ob: &mut Buffer, text: &[u8]) -> bool {
        self.span(self.callbacks.double_emphasis, ob, text)
    }

    pub fn emphasis(&mut self, ob: &mut Buffer, text: &[u8]) -> bool {
        self.span(self.callbacks.emphasis, ob, text)
    }

    pub fn underline(&mut self, ob: &mut Buffer, text: &[u8]) -> bool {
        self.span(self.callbacks.underline, ob, text)
    }

    pub fn highlight(&mut self, ob: &mut Buffer, text: &[u8]) -> bool {
        self.span(self.callbacks.highlight, ob, text)
    }

    pub fn quote(&mut self, ob: &mut Buffer, text: &[u8]) -> bool {
        self.span(self.callbacks.quote, ob, text)
    }

    pub fn image(&mut self, ob: &mut Buffer, link: &[u8], title: &[u8], alt: &[u8]) -> bool {
        match self.callbacks.image {
            Some(f) => f(ob, link, title, alt, &mut self.options),
            None => false,
        }
    }

    pub fn linebreak(&mut self, ob: &mut Buffer) -> bool {
        match self.callbacks.linebreak {
            Some(f) => f(ob, &mut self.options),
            None => false,
        }
    }

    pub fn link(&mut self, ob: &mut Buffer, link: &[u8], title: &[u8], content: &[u8]) -> bool {
        match self.callbacks.link {
            Some(f) => f(ob, link, title, content, &mut self.options),
            None => false,
        }
    }

    pub fn raw_html_tag(&mut self, ob: &mut Buffer, text: &[u8]) -> bool {
        self.span(self.callbacks.raw_html_tag, ob, text)
    }

    pub fn triple_emphasis(&mut self, ob: &mut Buffer, text: &[u8]) -> bool {
        self.span(self.callbacks.triple_emphasis, ob, text)
    }

    pub fn strikethrough(&mut self, ob: &mut Buffer, text: &[u8]) -> bool {
        self.span(self.callbacks.strikethrough, ob, text)
    }

    pub fn superscript(&mut self, ob: &mut Buffer, text: &[u8]) -> bool {
        self.span(self.callbacks.superscript, ob, text)
    }

    pub fn footnote_ref(&mut self, ob: &mut Buffer, number: u32) -> bool {
        match self.callbacks.footnote_ref {
            Some(f) => f(ob, number, &mut self.options),
            None => false,
        }
    }

    #[inline]
    fn span(
        &mut self,
        slot: Option<crate::callbacks::SpanFn>,
        ob: &mut Buffer,
        text: &[u8],
    ) -> bool {
        match slot {
            Some(f) => f(ob, text, &mut self.options),
            None => false,
        }
    }

    // Low level: an empty slot copies the input.

    pub fn entity(&mut self, ob: &mut Buffer, text: &[u8]) {
        match self.callbacks.entity {
            Some(f) => f(ob, text, &mut self.options),
            None => ob.put(text),
        }
    }

    pub fn normal_text(&mut self, ob: &mut Buffer, text: &[u8]) {
        match self.callbacks.normal_text {
            Some(f) => f(ob, text, &mut self.options),
            None => ob.put(text),
        }
    }

    // Document

    pub fn doc_header(&mut self, ob: &mut Buffer) {
        if let Some(f) = self.callbacks.doc_header {
            f(ob, &mut self.options);
        }
    }

    pub fn doc_footer(&mut self, ob: &mut Buffer) {
        if let Some(f) = self.callbacks.doc_footer {
            f(ob, &mut self.options);
        }
    }
}
