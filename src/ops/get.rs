//! Keyed accessors (Object containers).
//!
//! Getters never mutate.  Scalars are copied out; `String`/`Bytes` come
//! back as generation-checked handles ([`StringHandle`], [`BytesHandle`])
//! that trap use-after-mutation; nested containers come back as node
//! offsets.  A [`ValueCursor`] is the untyped view — read-only, *not*
//! generation-checked, to be refreshed by the caller after any mutation.

use crate::buffer::{generation, read_f64, read_i64, read_u32, NODE_SIZE};
use crate::node::layout::ValueKind;
use crate::node::lookup::{find, validate_container};
use crate::ops::handle::{BytesHandle, StringHandle};
use crate::ops::object_key;
use crate::status::Status;

// ─────────────────────────────────────────────────────────────────────────────
// Value cursor
// ─────────────────────────────────────────────────────────────────────────────

/// Untyped view of a located value: its arena offset and kind.
///
/// Inherently invalidated by any structural mutation — there is no
/// generation guard here; use the string/bytes handles when staleness must
/// be detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueCursor {
    pub offset: usize,
    pub kind: ValueKind,
}

// ─────────────────────────────────────────────────────────────────────────────
// Typed reads over a value offset (shared with the array accessors)
// ─────────────────────────────────────────────────────────────────────────────

pub(crate) fn read_kind(buf: &[u8], v: usize) -> Result<ValueKind, Status> {
    ValueKind::from_tag(buf[v])
}

pub(crate) fn read_bool_at(buf: &[u8], v: usize) -> Result<bool, Status> {
    match read_kind(buf, v)? {
        ValueKind::Bool => Ok(buf[v + 1] != 0),
        _ => Err(Status::ValueKindDoesNotMatch),
    }
}

pub(crate) fn read_i64_at(buf: &[u8], v: usize) -> Result<i64, Status> {
    match read_kind(buf, v)? {
        ValueKind::I64 => Ok(read_i64(buf, v + 1)),
        _ => Err(Status::ValueKindDoesNotMatch),
    }
}

pub(crate) fn read_f64_at(buf: &[u8], v: usize) -> Result<f64, Status> {
    match read_kind(buf, v)? {
        ValueKind::F64 => Ok(read_f64(buf, v + 1)),
        _ => Err(Status::ValueKindDoesNotMatch),
    }
}

pub(crate) fn read_string_at(buf: &[u8], v: usize) -> Result<StringHandle, Status> {
    match read_kind(buf, v)? {
        ValueKind::String => {
            let stored = read_u32(buf, v + 1);
            if stored == 0 {
                // A stored string always carries its NUL.
                return Err(Status::ValueOutOfBounds);
            }
            Ok(StringHandle::new(generation(buf), stored - 1, (v + 5) as u32))
        }
        _ => Err(Status::ValueKindDoesNotMatch),
    }
}

pub(crate) fn read_bytes_at(buf: &[u8], v: usize) -> Result<BytesHandle, Status> {
    match read_kind(buf, v)? {
        ValueKind::Bytes => {
            let len = read_u32(buf, v + 1);
            Ok(BytesHandle::new(generation(buf), len, (v + 5) as u32))
        }
        _ => Err(Status::ValueKindDoesNotMatch),
    }
}

pub(crate) fn read_container_at(
    buf: &[u8],
    v: usize,
    expected: ValueKind,
) -> Result<usize, Status> {
    let kind = read_kind(buf, v)?;
    if kind != expected {
        return Err(Status::ValueKindDoesNotMatch);
    }
    Ok(v)
}

/// User-visible payload size of the value at `v` (String excludes its NUL).
pub(crate) fn payload_size_at(buf: &[u8], v: usize) -> Result<u64, Status> {
    Ok(match read_kind(buf, v)? {
        ValueKind::Null => 0,
        ValueKind::Bool => 1,
        ValueKind::I64 | ValueKind::F64 => 8,
        ValueKind::Bytes => read_u32(buf, v + 1) as u64,
        ValueKind::String => (read_u32(buf, v + 1) as u64).saturating_sub(1),
        ValueKind::Object | ValueKind::Array => NODE_SIZE as u64,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Keyed lookups
// ─────────────────────────────────────────────────────────────────────────────

fn locate(buf: &[u8], position: usize, start: usize, key: &str) -> Result<usize, Status> {
    let (kb, hash) = object_key(key)?;
    validate_container(buf, position, start, Some(ValueKind::Object))?;
    Ok(find(buf, position, start, Some(kb), hash)?.value)
}

/// Untyped lookup: where the value lives and what it is.
pub fn get(buf: &[u8], position: usize, start: usize, key: &str) -> Result<ValueCursor, Status> {
    let v = locate(buf, position, start, key)?;
    Ok(ValueCursor {
        offset: v,
        kind: read_kind(buf, v)?,
    })
}

pub fn get_bool(buf: &[u8], position: usize, start: usize, key: &str) -> Result<bool, Status> {
    read_bool_at(buf, locate(buf, position, start, key)?)
}

pub fn get_i64(buf: &[u8], position: usize, start: usize, key: &str) -> Result<i64, Status> {
    read_i64_at(buf, locate(buf, position, start, key)?)
}

pub fn get_f64(buf: &[u8], position: usize, start: usize, key: &str) -> Result<f64, Status> {
    read_f64_at(buf, locate(buf, position, start, key)?)
}

/// Generation-checked handle to the string payload.
pub fn get_string(
    buf: &[u8],
    position: usize,
    start: usize,
    key: &str,
) -> Result<StringHandle, Status> {
    read_string_at(buf, locate(buf, position, start, key)?)
}

/// Generation-checked handle to the bytes payload.
pub fn get_bytes(
    buf: &[u8],
    position: usize,
    start: usize,
    key: &str,
) -> Result<BytesHandle, Status> {
    read_bytes_at(buf, locate(buf, position, start, key)?)
}

/// Offset of the nested Object's node.
pub fn get_object(buf: &[u8], position: usize, start: usize, key: &str) -> Result<usize, Status> {
    read_container_at(buf, locate(buf, position, start, key)?, ValueKind::Object)
}

/// Offset of the nested Array's node.
pub fn get_array(buf: &[u8], position: usize, start: usize, key: &str) -> Result<usize, Status> {
    read_container_at(buf, locate(buf, position, start, key)?, ValueKind::Array)
}

/// Kind of the value stored under `key`.
pub fn type_of(buf: &[u8], position: usize, start: usize, key: &str) -> Result<ValueKind, Status> {
    read_kind(buf, locate(buf, position, start, key)?)
}

/// `true` when `key` exists in the container (whatever its kind).
pub fn exists(buf: &[u8], position: usize, start: usize, key: &str) -> Result<bool, Status> {
    match locate(buf, position, start, key) {
        Ok(_) => Ok(true),
        Err(Status::KeyNotFound) => Ok(false),
        Err(s) => Err(s),
    }
}

/// User-visible payload size of the value under `key`.
pub fn value_size(buf: &[u8], position: usize, start: usize, key: &str) -> Result<u64, Status> {
    payload_size_at(buf, locate(buf, position, start, key)?)
}

macro_rules! is_kind {
    ($name:ident, $kind:ident) => {
        /// Kind probe; `false` when the key is missing or of another kind.
        pub fn $name(buf: &[u8], position: usize, start: usize, key: &str) -> Result<bool, Status> {
            match type_of(buf, position, start, key) {
                Ok(k) => Ok(k == ValueKind::$kind),
                Err(Status::KeyNotFound) => Ok(false),
                Err(s) => Err(s),
            }
        }
    };
}

is_kind!(is_null, Null);
is_kind!(is_bool, Bool);
is_kind!(is_i64, I64);
is_kind!(is_f64, F64);
is_kind!(is_bytes, Bytes);
is_kind!(is_string, String);
is_kind!(is_object, Object);
is_kind!(is_array, Array);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::{init_object, set_bytes, set_f64, set_i64, set_null, set_string};

    fn sample() -> (Vec<u8>, usize) {
        let mut buf = vec![0u8; 2048];
        let mut pos = 0;
        init_object(&mut buf, &mut pos).unwrap();
        set_i64(&mut buf, &mut pos, 0, "lap", 55).unwrap();
        set_f64(&mut buf, &mut pos, 0, "time_sec", 88.427).unwrap();
        set_string(&mut buf, &mut pos, 0, "event", "lap_complete").unwrap();
        set_bytes(&mut buf, &mut pos, 0, "blob", &[1, 2, 3]).unwrap();
        set_null(&mut buf, &mut pos, 0, "gap").unwrap();
        (buf, pos)
    }

    #[test]
    fn typed_reads() {
        let (buf, pos) = sample();
        assert_eq!(get_i64(&buf, pos, 0, "lap").unwrap(), 55);
        assert_eq!(get_f64(&buf, pos, 0, "time_sec").unwrap(), 88.427);
        assert_eq!(
            get_string(&buf, pos, 0, "event").unwrap().resolve(&buf).unwrap(),
            "lap_complete"
        );
        assert_eq!(
            get_bytes(&buf, pos, 0, "blob").unwrap().resolve(&buf).unwrap(),
            &[1, 2, 3]
        );
        assert!(is_null(&buf, pos, 0, "gap").unwrap());
        assert!(!is_null(&buf, pos, 0, "lap").unwrap());
        assert!(!is_null(&buf, pos, 0, "missing").unwrap());
    }

    #[test]
    fn kind_mismatch() {
        let (buf, pos) = sample();
        assert_eq!(
            get_bool(&buf, pos, 0, "lap").unwrap_err(),
            Status::ValueKindDoesNotMatch
        );
        assert_eq!(
            get_object(&buf, pos, 0, "event").unwrap_err(),
            Status::ValueKindDoesNotMatch
        );
    }

    #[test]
    fn exists_and_sizes() {
        let (buf, pos) = sample();
        assert!(exists(&buf, pos, 0, "lap").unwrap());
        assert!(!exists(&buf, pos, 0, "nope").unwrap());
        assert_eq!(value_size(&buf, pos, 0, "lap").unwrap(), 8);
        assert_eq!(value_size(&buf, pos, 0, "event").unwrap(), 12);
        assert_eq!(value_size(&buf, pos, 0, "blob").unwrap(), 3);
        assert_eq!(value_size(&buf, pos, 0, "gap").unwrap(), 0);
    }

    #[test]
    fn untyped_cursor() {
        let (buf, pos) = sample();
        let c = get(&buf, pos, 0, "time_sec").unwrap();
        assert_eq!(c.kind, ValueKind::F64);
        assert_eq!(read_f64_at(&buf, c.offset).unwrap(), 88.427);
    }
}
