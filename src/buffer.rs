//! Growable byte buffer used for every rendered fragment.
//!
//! Capacity grows in multiples of a per-buffer `unit` and is tracked
//! exactly, so `size <= capacity` holds after every operation and the
//! capacity only shrinks through [`Buffer::reset`]. A growth unit of zero
//! marks a fixed buffer: growth is refused and appends that would not fit
//! are dropped.
//!
//! Literal data can be wrapped without copying. [`Buffer::shared`] clones
//! the literal on first mutation; [`Buffer::volatile`] never changes it.
//!
//! # Example
//! ```
//! use mkdhtml::Buffer;
//!
//! let mut ob = Buffer::new(16);
//! ob.puts("<p>");
//! ob.printf(format_args!("{} items", 3));
//! ob.putc(b'!');
//! assert_eq!(ob.as_bytes(), b"<p>3 items!");
//! assert_eq!(ob.capacity() % 16, 0);
//! ```

use std::borrow::Cow;
use std::cmp::Ordering;
use std::ffi::CStr;
use std::fmt;

use crate::limits::MAX_ALLOC_SIZE;

/// Failure to enlarge a [`Buffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BufferError {
    /// The request exceeded the allocation ceiling or the allocator failed.
    #[error("cannot allocate {requested} bytes for buffer")]
    OutOfMemory { requested: usize },
    /// The buffer has a growth unit of zero.
    #[error("buffer has a fixed capacity")]
    Fixed,
}

/// Append-only byte container with amortized growth.
#[derive(Debug, Clone)]
pub struct Buffer {
    /// Allocated storage; `data.len()` is the capacity.
    data: Cow<'static, [u8]>,
    size: usize,
    unit: usize,
}

impl Buffer {
    /// Create an empty buffer that grows in steps of `unit` bytes.
    #[inline]
    pub fn new(unit: usize) -> Self {
        Self {
            data: Cow::Owned(Vec::new()),
            size: 0,
            unit,
        }
    }

    /// Create a buffer with at least `capacity` bytes allocated up front.
    pub fn with_capacity(unit: usize, capacity: usize) -> Self {
        let mut buf = Self::new(unit);
        // An oversized hint only costs the pre-allocation.
        let _ = buf.grow(capacity);
        buf
    }

    /// Create a fixed buffer of exactly `capacity` bytes. It never grows.
    pub fn fixed(capacity: usize) -> Self {
        Self {
            data: Cow::Owned(vec![0; capacity.min(MAX_ALLOC_SIZE)]),
            size: 0,
            unit: 0,
        }
    }

    /// Wrap literal data read-only. The bytes never change: appends and a
    /// partial `slurp` are silently ignored, while `truncate`, `clear` and
    /// a full `slurp` only shorten the visible length.
    #[inline]
    pub const fn volatile(literal: &'static [u8]) -> Self {
        Self {
            data: Cow::Borrowed(literal),
            size: literal.len(),
            unit: 0,
        }
    }

    /// Wrap literal data and copy it on first mutation, growing in steps
    /// of `unit` afterwards. Clones share the literal until they mutate.
    #[inline]
    pub const fn shared(literal: &'static [u8], unit: usize) -> Self {
        Self {
            data: Cow::Borrowed(literal),
            size: literal.len(),
            unit,
        }
    }

    /// Used length in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Allocated length in bytes.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Growth unit; zero for fixed and volatile buffers.
    #[inline]
    pub fn unit(&self) -> usize {
        self.unit
    }

    /// Whether the buffer still aliases literal data.
    #[inline]
    pub fn is_borrowed(&self) -> bool {
        matches!(self.data, Cow::Borrowed(_))
    }

    #[inline]
    fn is_volatile(&self) -> bool {
        self.unit == 0 && self.is_borrowed()
    }

    /// Make sure at least `target` bytes are allocated.
    ///
    /// Capacity is rounded up to the next multiple of the growth unit.
    /// Requests above [`MAX_ALLOC_SIZE`] fail regardless of available
    /// memory.
    pub fn grow(&mut self, target: usize) -> Result<(), BufferError> {
        if target > MAX_ALLOC_SIZE {
            tracing::debug!(requested = target, "buffer request above allocation ceiling");
            return Err(BufferError::OutOfMemory { requested: target });
        }

        if self.capacity() >= target {
            return Ok(());
        }

        if self.unit == 0 {
            return Err(BufferError::Fixed);
        }

        let rounded = target.div_ceil(self.unit).saturating_mul(self.unit);
        let new_capacity = rounded.min(MAX_ALLOC_SIZE).max(target);

        let data = self.data.to_mut();
        if data.try_reserve_exact(new_capacity - data.len()).is_err() {
            tracing::debug!(requested = new_capacity, "buffer allocation failed");
            return Err(BufferError::OutOfMemory {
                requested: new_capacity,
            });
        }
        data.resize(new_capacity, 0);
        Ok(())
    }

    /// Writable storage covering `0..end`, allocating if needed.
    fn writable(&mut self, end: usize) -> Result<&mut [u8], BufferError> {
        if self.is_volatile() {
            return Err(BufferError::Fixed);
        }
        self.grow(end)?;
        Ok(&mut self.data.to_mut()[..end])
    }

    /// Append raw bytes, reporting allocation failure.
    pub fn try_put(&mut self, bytes: &[u8]) -> Result<(), BufferError> {
        if bytes.is_empty() {
            return Ok(());
        }
        let start = self.size;
        let end = start
            .checked_add(bytes.len())
            .ok_or(BufferError::OutOfMemory {
                requested: usize::MAX,
            })?;
        self.writable(end)?[start..].copy_from_slice(bytes);
        self.size = end;
        Ok(())
    }

    /// Append raw bytes. Does nothing if the buffer cannot hold them.
    #[inline]
    pub fn put(&mut self, bytes: &[u8]) {
        let _ = self.try_put(bytes);
    }

    /// Append a string.
    #[inline]
    pub fn puts(&mut self, s: &str) {
        self.put(s.as_bytes());
    }

    /// Append a single byte.
    #[inline]
    pub fn putc(&mut self, c: u8) {
        let end = self.size + 1;
        if let Ok(data) = self.writable(end) {
            data[end - 1] = c;
            self.size = end;
        }
    }

    /// Append formatted text.
    ///
    /// Formats straight into the spare capacity first; if the text does not
    /// fit, grows to the exact required size and formats once more.
    pub fn printf(&mut self, args: fmt::Arguments<'_>) {
        let start = self.size;
        let capacity = self.capacity();
        let Ok(data) = self.writable(capacity) else {
            return;
        };

        let mut pass = SpareWriter::new(&mut data[start..]);
        if fmt::write(&mut pass, args).is_err() {
            return;
        }
        let needed = pass.needed;
        if needed <= capacity - start {
            self.size = start + needed;
            return;
        }

        let Some(end) = start.checked_add(needed) else {
            return;
        };
        let Ok(data) = self.writable(end) else {
            return;
        };
        let mut pass = SpareWriter::new(&mut data[start..]);
        if fmt::write(&mut pass, args).is_ok() && pass.needed == needed {
            self.size = end;
        }
    }

    /// Compare the head of the buffer with `prefix`.
    ///
    /// Returns `Equal` iff the buffer starts with `prefix`; a buffer that is
    /// a strict prefix of `prefix` compares `Less`.
    pub fn prefix_cmp(&self, prefix: &[u8]) -> Ordering {
        self.as_bytes()
            .iter()
            .take(prefix.len())
            .cmp(prefix.iter())
    }

    /// NUL-terminate the contents in spare capacity and view them as a C
    /// string. `len()` is unchanged; an interior NUL ends the string early.
    pub fn as_cstr(&mut self) -> Result<&CStr, BufferError> {
        let size = self.size;
        let data = self.writable(size + 1)?;
        data[size] = 0;
        Ok(CStr::from_bytes_until_nul(data).unwrap_or_default())
    }

    /// Remove `n` bytes from the front, shifting the rest left.
    pub fn slurp(&mut self, n: usize) {
        if n >= self.size {
            self.size = 0;
            return;
        }
        let size = self.size;
        if let Ok(data) = self.writable(size) {
            data.copy_within(n..size, 0);
            self.size = size - n;
        }
    }

    /// Shorten the contents to `len` bytes; capacity is kept.
    #[inline]
    pub fn truncate(&mut self, len: usize) {
        self.size = self.size.min(len);
    }

    /// Empty the buffer, keeping its allocation.
    #[inline]
    pub fn clear(&mut self) {
        self.size = 0;
    }

    /// Release the storage. Capacity drops to zero.
    pub fn reset(&mut self) {
        self.data = Cow::Owned(Vec::new());
        self.size = 0;
    }

    /// Used bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.size]
    }

    /// Used bytes as text, replacing invalid UTF-8.
    #[inline]
    pub fn to_str_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.as_bytes())
    }

    /// Take the used bytes.
    pub fn into_vec(self) -> Vec<u8> {
        let mut data = self.data.into_owned();
        data.truncate(self.size);
        data
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new(crate::limits::OUTPUT_UNIT)
    }
}

impl AsRef<[u8]> for Buffer {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl fmt::Write for Buffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.try_put(s.as_bytes()).map_err(|_| fmt::Error)
    }
}

/// Formatter sink over spare capacity that keeps counting once full.
struct SpareWriter<'a> {
    spare: &'a mut [u8],
    needed: usize,
}

impl<'a> SpareWriter<'a> {
    fn new(spare: &'a mut [u8]) -> Self {
        Self { spare, needed: 0 }
    }
}

impl fmt::Write for SpareWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let bytes = s.as_bytes();
        if let Some(room) = self.spare.len().checked_sub(self.needed) {
            let n = room.min(bytes.len());
            self.spare[self.needed..self.needed + n].copy_from_slice(&bytes[..n]);
        }
        self.needed += bytes.len();
        Ok(())
    }
}
