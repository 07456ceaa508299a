//! The callback table a document parser drives, in document order.
//!
//! Every slot is optional. What an empty slot means depends on its group:
//!
//! - block slots: the block is skipped
//! - span slots: the parser prints the span source verbatim (a slot
//!   returning `false` means the same)
//! - low-level slots: the input is copied to the output unchanged
//! - document header/footer: nothing is written
//!
//! [`Renderer`](crate::Renderer) implements these defaults, so callers
//! never test slots themselves. Callbacks receive the output buffer,
//! already-rendered fragments (never raw markdown) and the render options.

use bitflags::bitflags;

use crate::html::RenderOptions;
use crate::Buffer;

bitflags! {
    /// Flags passed to the list and list item slots.
    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ListFlags: u32 {
        /// `<ol>` rather than `<ul>`.
        const ORDERED = 1 << 0;
        /// The item contains block-level content.
        const BLOCK = 1 << 1;
    }
}

bitflags! {
    /// Flags passed to the table cell slot.
    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TableFlags: u32 {
        const ALIGN_LEFT = 1;
        const ALIGN_RIGHT = 2;
        const ALIGN_CENTER = 3;
        const ALIGN_MASK = 3;
        /// Cell belongs to the header row.
        const HEADER = 4;
    }
}

/// Cell alignment decoded from [`TableFlags`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    None,
    Left,
    Right,
    Center,
}

impl TableFlags {
    /// Alignment bits of the flags.
    pub fn alignment(self) -> Alignment {
        match (self & TableFlags::ALIGN_MASK).bits() {
            1 => Alignment::Left,
            2 => Alignment::Right,
            3 => Alignment::Center,
            _ => Alignment::None,
        }
    }

    #[inline]
    pub fn is_header(self) -> bool {
        self.contains(TableFlags::HEADER)
    }
}

/// Kind of link handed to the autolink slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutolinkType {
    /// A URL with an explicit scheme (`http://`, `mailto:`, ...).
    Normal,
    /// An address without `mailto:`.
    Email,
}

/// `(ob, text, lang, options)`
pub type BlockCodeFn = fn(&mut Buffer, &[u8], &[u8], &mut RenderOptions);
/// `(ob, text, options)`
pub type BlockFn = fn(&mut Buffer, &[u8], &mut RenderOptions);
/// `(ob, text, level, options)`
pub type HeaderFn = fn(&mut Buffer, &[u8], u32, &mut RenderOptions);
/// `(ob, options)`
pub type MarkerFn = fn(&mut Buffer, &mut RenderOptions);
/// `(ob, text, flags, options)`
pub type ListFn = fn(&mut Buffer, &[u8], ListFlags, &mut RenderOptions);
/// `(ob, header, body, options)`
pub type TableFn = fn(&mut Buffer, &[u8], &[u8], &mut RenderOptions);
/// `(ob, text, flags, options)`
pub type TableCellFn = fn(&mut Buffer, &[u8], TableFlags, &mut RenderOptions);
/// `(ob, text, number, options)`
pub type FootnoteDefFn = fn(&mut Buffer, &[u8], u32, &mut RenderOptions);

/// `(ob, link, kind, options) -> rendered`
pub type AutolinkFn = fn(&mut Buffer, &[u8], AutolinkType, &mut RenderOptions) -> bool;
/// `(ob, text, options) -> rendered`
pub type SpanFn = fn(&mut Buffer, &[u8], &mut RenderOptions) -> bool;
/// `(ob, link, title, alt_or_content, options) -> rendered`
pub type LinkFn = fn(&mut Buffer, &[u8], &[u8], &[u8], &mut RenderOptions) -> bool;
/// `(ob, options) -> rendered`
pub type LineBreakFn = fn(&mut Buffer, &mut RenderOptions) -> bool;
/// `(ob, number, options) -> rendered`
pub type FootnoteRefFn = fn(&mut Buffer, u32, &mut RenderOptions) -> bool;

/// `(ob, text, options)`
pub type TextFn = fn(&mut Buffer, &[u8], &mut RenderOptions);

/// Table of rendering callbacks.
#[derive(Debug, Clone, Copy, Default)]
pub struct Callbacks {
    // block level
    pub blockcode: Option<BlockCodeFn>,
    pub blockquote: Option<BlockFn>,
    pub blockhtml: Option<BlockFn>,
    pub header: Option<HeaderFn>,
    pub hrule: Option<MarkerFn>,
    pub list: Option<ListFn>,
    pub listitem: Option<ListFn>,
    pub paragraph: Option<BlockFn>,
    pub table: Option<TableFn>,
    pub table_row: Option<BlockFn>,
    pub table_cell: Option<TableCellFn>,
    pub footnotes: Option<BlockFn>,
    pub footnote_def: Option<FootnoteDefFn>,

    // span level
    pub autolink: Option<AutolinkFn>,
    pub codespan: Option<SpanFn>,
    pub double_emphasis: Option<SpanFn>,
    pub emphasis: Option<SpanFn>,
    pub underline: Option<SpanFn>,
    pub highlight: Option<SpanFn>,
    pub quote: Option<SpanFn>,
    pub image: Option<LinkFn>,
    pub linebreak: Option<LineBreakFn>,
    pub link: Option<LinkFn>,
    pub raw_html_tag: Option<SpanFn>,
    pub triple_emphasis: Option<SpanFn>,
    pub strikethrough: Option<SpanFn>,
    pub superscript: Option<SpanFn>,
    pub footnote_ref: Option<FootnoteRefFn>,

    // low level
    pub entity: Option<TextFn>,
    pub normal_text: Option<TextFn>,

    // document
    pub doc_header: Option<MarkerFn>,
    pub doc_footer: Option<MarkerFn>,
}
