//! Resource limits and buffer sizing constants.
//!
//! The allocation ceiling turns unbounded output growth into an
//! explicit `OutOfMemory` failure instead of a hang or abort.

/// Largest single allocation a [`Buffer`](crate::Buffer) will request (16 MiB).
pub const MAX_ALLOC_SIZE: usize = 16 * 1024 * 1024;

/// Growth unit for rendered HTML output buffers.
pub const OUTPUT_UNIT: usize = 64;

/// Growth unit for the autolink scanner's scratch link buffer.
pub const LINK_UNIT: usize = 16;

/// Deepest header level a renderer knows about.
pub const MAX_HEADER_LEVEL: u32 = 6;

/// Tab stop width used when expanding tabs in code blocks.
pub const TAB_WIDTH: usize = 4;
