//! The typed operations layer.
//!
//! Every operation takes the arena slice, the write frontier (`position`,
//! mutable for setters), and a container start offset (`0` for the root).
//! Object operations additionally take a key; array operations an element
//! index.  Errors travel as [`Status`](crate::status::Status) through
//! `Result` — nothing in this crate panics on malformed input.
//!
//! Layering: these functions validate the container and the arguments, then
//! hand the byte work to the node engine.  They are the complete public
//! mutation/read surface; richer builder façades belong to host code.

mod array;
mod get;
mod handle;
mod set;

pub use array::{
    array_append_array, array_append_bool, array_append_bytes, array_append_f64,
    array_append_i64, array_append_null, array_append_object, array_append_string,
    array_get_array, array_get_bool, array_get_bytes, array_get_f64, array_get_i64,
    array_get_object, array_get_string, array_is_null, array_set_array, array_set_bool,
    array_set_bytes, array_set_f64, array_set_i64, array_set_null, array_set_object,
    array_set_string, array_type_of, array_value_size,
};
pub use get::{
    exists, get, get_array, get_bool, get_bytes, get_f64, get_i64, get_object, get_string,
    is_array, is_bool, is_bytes, is_f64, is_i64, is_null, is_object, is_string, type_of,
    value_size, ValueCursor,
};
pub use handle::{BytesHandle, StringHandle};
pub use set::{
    set_array, set_bool, set_bytes, set_f64, set_i64, set_null, set_object, set_string,
};

use crate::buffer::{bump_generation, NODE_SIZE};
use crate::node::hash::djb2;
use crate::node::iter::{Cursor, IterEntry};
use crate::node::layout::{entry_key_bytes, init_node, node_size, node_tag, ValueKind};
use crate::node::lookup::validate_container;
use crate::status::Status;

// ─────────────────────────────────────────────────────────────────────────────
// Initialization
// ─────────────────────────────────────────────────────────────────────────────

/// Initialize the arena as an empty root Object.
///
/// Writes a zeroed node at offset 0, sets `position = 96`, and performs the
/// first generation bump.
pub fn init_object(buf: &mut [u8], position: &mut usize) -> Result<(), Status> {
    init_root(buf, position, ValueKind::Object)
}

/// Initialize the arena as an empty root Array.
pub fn init_array(buf: &mut [u8], position: &mut usize) -> Result<(), Status> {
    init_root(buf, position, ValueKind::Array)
}

fn init_root(buf: &mut [u8], position: &mut usize, kind: ValueKind) -> Result<(), Status> {
    if buf.len() < NODE_SIZE {
        return Err(Status::InsufficientBuffer);
    }
    init_node(buf, 0, kind, 0);
    *position = NODE_SIZE;
    bump_generation(buf);
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Aggregates
// ─────────────────────────────────────────────────────────────────────────────

/// Root container kind; the buffer is not a Lite³ message otherwise.
pub fn root_type(buf: &[u8]) -> Result<ValueKind, Status> {
    if buf.len() < NODE_SIZE {
        return Err(Status::StartOffsetOutOfBounds);
    }
    let kind = ValueKind::from_tag(node_tag(buf, 0)).map_err(|_| Status::ExpectedArrayOrObject)?;
    if !kind.is_container() {
        return Err(Status::ExpectedArrayOrObject);
    }
    Ok(kind)
}

/// Number of entries in the container at `start`.
pub fn count(buf: &[u8], position: usize, start: usize) -> Result<u64, Status> {
    validate_container(buf, position, start, None)?;
    Ok(node_size(buf, start))
}

// ─────────────────────────────────────────────────────────────────────────────
// Iteration
// ─────────────────────────────────────────────────────────────────────────────

/// One item produced by [`Iter::next`].
#[derive(Debug, Clone, Copy)]
pub struct IterItem<'a> {
    /// Property name for Object containers, `None` for Array elements.
    pub key: Option<&'a str>,
    /// Slot hash (element index for arrays, possibly probe-displaced for
    /// objects).
    pub hash: u32,
    /// The entry's value.
    pub cursor: ValueCursor,
}

/// Generation-checked in-order iterator over one container.
#[derive(Debug, Clone)]
pub struct Iter {
    inner: Cursor,
}

/// Open an iterator over the container at `start`.
pub fn iter(buf: &[u8], position: usize, start: usize) -> Result<Iter, Status> {
    Ok(Iter {
        inner: Cursor::open(buf, position, start)?,
    })
}

impl Iter {
    /// Produce the next entry, or `None` when exhausted.
    ///
    /// Fails with `InvalidIterator` after any structural mutation of the
    /// arena.
    pub fn next<'a>(
        &mut self,
        buf: &'a [u8],
        position: usize,
    ) -> Result<Option<IterItem<'a>>, Status> {
        let mut entry = IterEntry {
            hash: 0,
            kv: 0,
            value: 0,
            kind: ValueKind::Null,
        };
        match self.inner.next_entry(buf, position, &mut entry) {
            Status::IteratorDone => Ok(None),
            Status::IteratorItem => {
                let key = if self.inner.keyed() {
                    let kb = entry_key_bytes(buf, position, entry.kv)?;
                    let without_nul = &kb[..kb.len().saturating_sub(1)];
                    Some(
                        core::str::from_utf8(without_nul)
                            .map_err(|_| Status::ValueKindInvalid)?,
                    )
                } else {
                    None
                };
                Ok(Some(IterItem {
                    key,
                    hash: entry.hash,
                    cursor: ValueCursor {
                        offset: entry.value,
                        kind: entry.kind,
                    },
                }))
            }
            s => Err(s),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Shared internals
// ─────────────────────────────────────────────────────────────────────────────

/// Longest encodable key in bytes: the widest key tag carries 22 size bits,
/// and the size field counts the trailing NUL.
const KEY_LEN_MAX: usize = (1 << 22) - 2;

/// Validate an object key and derive its hash.
#[inline]
pub(crate) fn object_key(key: &str) -> Result<(&[u8], u32), Status> {
    if key.is_empty() {
        return Err(Status::ExpectedNonEmptyKey);
    }
    if key.len() > KEY_LEN_MAX {
        return Err(Status::KeyEntryOutOfBounds);
    }
    let kb = key.as_bytes();
    Ok((kb, djb2(kb)))
}
