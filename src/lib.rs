//! mkdhtml: callback-driven HTML rendering for parsed Markdown
//!
//! A document parser walks the source and calls a [`Renderer`] in document
//! order with already-rendered fragments. This crate provides the output
//! side: a growable [`Buffer`], the HTML and table-of-contents callback
//! tables, and two text scanners that work on raw bytes:
//!
//! - [`autolink`]: turns bare URLs and email addresses into anchors
//! - [`smartypants`]: curly quotes, dashes, ellipses, fractions
//!
//! # Design Principles
//! - No regex: single-pass byte dispatch
//! - No backtracking: scanners retract emitted output instead
//! - Bounded allocation: no buffer grows past 16 MiB
//!
//! # Example
//! ```
//! use mkdhtml::{Buffer, RenderFlags, Renderer};
//!
//! let mut renderer = Renderer::html(RenderFlags::TOC);
//! let mut ob = Buffer::default();
//!
//! let mut title = Buffer::default();
//! renderer.normal_text(&mut title, b"Fish & Chips");
//! renderer.header(&mut ob, title.as_bytes(), 1);
//!
//! assert_eq!(
//!     ob.to_str_lossy(),
//!     "<a name=\"toc_0\"></a><h1>Fish &amp; Chips</h1>\n"
//! );
//! ```

pub mod autolink;
pub mod buffer;
pub mod callbacks;
pub(crate) mod chars;
pub mod escape;
pub mod html;
pub mod limits;
pub mod render;
pub mod smartypants;
pub mod toc;

// Re-export primary types
pub use autolink::{autolink, is_safe_link, AutolinkFlags};
pub use buffer::{Buffer, BufferError};
pub use callbacks::{Alignment, AutolinkType, Callbacks, ListFlags, TableFlags};
pub use html::{html_callbacks, is_html_tag, HtmlTag, RenderFlags, RenderOptions, TocState};
pub use render::Renderer;
pub use smartypants::{smartypants, QuoteState};
pub use toc::toc_callbacks;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
