//! Generation-checked handles for String and Bytes payloads.
//!
//! A handle is a `(generation, length, offset)` triple.  It is `Copy`, safe
//! to move across threads, and meaningful only against the exact arena it
//! was created from: resolving consults the arena's current generation and
//! fails with `MutatedBuffer` on any mismatch, making stale-pointer bugs
//! deterministic instead of silently reading relocated bytes.

use crate::buffer::generation;
use crate::status::Status;

/// Handle to a stored UTF-8 string (NUL already stripped from the length).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringHandle {
    gen: u32,
    len: u32,
    offset: u32,
}

impl StringHandle {
    pub(crate) fn new(gen: u32, len: u32, offset: u32) -> StringHandle {
        StringHandle { gen, len, offset }
    }

    /// Payload length in bytes.
    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Borrow the string out of the arena.
    ///
    /// `MutatedBuffer` when the arena has mutated since the handle was
    /// produced.
    pub fn resolve<'a>(&self, buf: &'a [u8]) -> Result<&'a str, Status> {
        let bytes = resolve_span(self.gen, self.len, self.offset, buf)?;
        core::str::from_utf8(bytes).map_err(|_| Status::ValueKindInvalid)
    }
}

/// Handle to a stored binary payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BytesHandle {
    gen: u32,
    len: u32,
    offset: u32,
}

impl BytesHandle {
    pub(crate) fn new(gen: u32, len: u32, offset: u32) -> BytesHandle {
        BytesHandle { gen, len, offset }
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Borrow the bytes out of the arena; `MutatedBuffer` when stale.
    pub fn resolve<'a>(&self, buf: &'a [u8]) -> Result<&'a [u8], Status> {
        resolve_span(self.gen, self.len, self.offset, buf)
    }
}

fn resolve_span(gen: u32, len: u32, offset: u32, buf: &[u8]) -> Result<&[u8], Status> {
    if buf.len() < crate::buffer::NODE_SIZE {
        return Err(Status::StartOffsetOutOfBounds);
    }
    if gen != generation(buf) {
        return Err(Status::MutatedBuffer);
    }
    let (start, end) = (offset as usize, offset as usize + len as usize);
    if end > buf.len() {
        return Err(Status::ValueOutOfBounds);
    }
    Ok(&buf[start..end])
}
