//! Indexed setters and accessors (Array containers).
//!
//! Array entries ride the same node engine as object members; the element
//! index takes the place of the key hash and there are no key bytes at all.
//! Appends address the container's current length; set-by-index requires a
//! strictly in-bounds index — writing one past the end is only reachable
//! through the append path.

use crate::node::insert::{insert, NewValue};
use crate::node::layout::{node_size, ValueKind};
use crate::node::lookup::{find, validate_container};
use crate::ops::get::{
    payload_size_at, read_bool_at, read_bytes_at, read_container_at, read_f64_at, read_i64_at,
    read_kind, read_string_at,
};
use crate::ops::handle::{BytesHandle, StringHandle};
use crate::status::Status;

// ─────────────────────────────────────────────────────────────────────────────
// Plumbing
// ─────────────────────────────────────────────────────────────────────────────

/// Next append index, validated against the index space of the hash slots.
fn append_index(buf: &[u8], position: usize, start: usize) -> Result<u32, Status> {
    validate_container(buf, position, start, Some(ValueKind::Array))?;
    let size = node_size(buf, start);
    u32::try_from(size).map_err(|_| Status::ArrayIndexOutOfBounds)
}

/// Validate `index < size` for overwrite/read paths.
fn checked_index(
    buf: &[u8],
    position: usize,
    start: usize,
    index: u32,
) -> Result<u32, Status> {
    validate_container(buf, position, start, Some(ValueKind::Array))?;
    if (index as u64) >= node_size(buf, start) {
        return Err(Status::ArrayIndexOutOfBounds);
    }
    Ok(index)
}

fn append_value(
    buf: &mut [u8],
    position: &mut usize,
    start: usize,
    value: NewValue<'_>,
) -> Result<usize, Status> {
    let index = append_index(buf, *position, start)?;
    Ok(insert(buf, position, start, None, index, value)?.value)
}

fn overwrite_value(
    buf: &mut [u8],
    position: &mut usize,
    start: usize,
    index: u32,
    value: NewValue<'_>,
) -> Result<usize, Status> {
    let index = checked_index(buf, *position, start, index)?;
    Ok(insert(buf, position, start, None, index, value)?.value)
}

fn element(buf: &[u8], position: usize, start: usize, index: u32) -> Result<usize, Status> {
    let index = checked_index(buf, position, start, index)?;
    Ok(find(buf, position, start, None, index)?.value)
}

// ─────────────────────────────────────────────────────────────────────────────
// Append (`[].push`)
// ─────────────────────────────────────────────────────────────────────────────

pub fn array_append_null(
    buf: &mut [u8],
    position: &mut usize,
    start: usize,
) -> Result<(), Status> {
    append_value(buf, position, start, NewValue::Null).map(|_| ())
}

pub fn array_append_bool(
    buf: &mut [u8],
    position: &mut usize,
    start: usize,
    value: bool,
) -> Result<(), Status> {
    append_value(buf, position, start, NewValue::Bool(value)).map(|_| ())
}

pub fn array_append_i64(
    buf: &mut [u8],
    position: &mut usize,
    start: usize,
    value: i64,
) -> Result<(), Status> {
    append_value(buf, position, start, NewValue::I64(value)).map(|_| ())
}

pub fn array_append_f64(
    buf: &mut [u8],
    position: &mut usize,
    start: usize,
    value: f64,
) -> Result<(), Status> {
    append_value(buf, position, start, NewValue::F64(value)).map(|_| ())
}

pub fn array_append_bytes(
    buf: &mut [u8],
    position: &mut usize,
    start: usize,
    value: &[u8],
) -> Result<(), Status> {
    append_value(buf, position, start, NewValue::Bytes(value)).map(|_| ())
}

pub fn array_append_string(
    buf: &mut [u8],
    position: &mut usize,
    start: usize,
    value: &str,
) -> Result<(), Status> {
    append_value(buf, position, start, NewValue::Str(value.as_bytes())).map(|_| ())
}

/// Append an empty Object; returns the child node's offset.
pub fn array_append_object(
    buf: &mut [u8],
    position: &mut usize,
    start: usize,
) -> Result<usize, Status> {
    append_value(buf, position, start, NewValue::Container(ValueKind::Object))
}

/// Append an empty Array; returns the child node's offset.
pub fn array_append_array(
    buf: &mut [u8],
    position: &mut usize,
    start: usize,
) -> Result<usize, Status> {
    append_value(buf, position, start, NewValue::Container(ValueKind::Array))
}

// ─────────────────────────────────────────────────────────────────────────────
// Set by index
// ─────────────────────────────────────────────────────────────────────────────

pub fn array_set_null(
    buf: &mut [u8],
    position: &mut usize,
    start: usize,
    index: u32,
) -> Result<(), Status> {
    overwrite_value(buf, position, start, index, NewValue::Null).map(|_| ())
}

pub fn array_set_bool(
    buf: &mut [u8],
    position: &mut usize,
    start: usize,
    index: u32,
    value: bool,
) -> Result<(), Status> {
    overwrite_value(buf, position, start, index, NewValue::Bool(value)).map(|_| ())
}

pub fn array_set_i64(
    buf: &mut [u8],
    position: &mut usize,
    start: usize,
    index: u32,
    value: i64,
) -> Result<(), Status> {
    overwrite_value(buf, position, start, index, NewValue::I64(value)).map(|_| ())
}

pub fn array_set_f64(
    buf: &mut [u8],
    position: &mut usize,
    start: usize,
    index: u32,
    value: f64,
) -> Result<(), Status> {
    overwrite_value(buf, position, start, index, NewValue::F64(value)).map(|_| ())
}

pub fn array_set_bytes(
    buf: &mut [u8],
    position: &mut usize,
    start: usize,
    index: u32,
    value: &[u8],
) -> Result<(), Status> {
    overwrite_value(buf, position, start, index, NewValue::Bytes(value)).map(|_| ())
}

pub fn array_set_string(
    buf: &mut [u8],
    position: &mut usize,
    start: usize,
    index: u32,
    value: &str,
) -> Result<(), Status> {
    overwrite_value(buf, position, start, index, NewValue::Str(value.as_bytes())).map(|_| ())
}

/// Overwrite element `index` with an empty Object; returns its offset.
pub fn array_set_object(
    buf: &mut [u8],
    position: &mut usize,
    start: usize,
    index: u32,
) -> Result<usize, Status> {
    overwrite_value(buf, position, start, index, NewValue::Container(ValueKind::Object))
}

/// Overwrite element `index` with an empty Array; returns its offset.
pub fn array_set_array(
    buf: &mut [u8],
    position: &mut usize,
    start: usize,
    index: u32,
) -> Result<usize, Status> {
    overwrite_value(buf, position, start, index, NewValue::Container(ValueKind::Array))
}

// ─────────────────────────────────────────────────────────────────────────────
// Get by index
// ─────────────────────────────────────────────────────────────────────────────

pub fn array_get_bool(
    buf: &[u8],
    position: usize,
    start: usize,
    index: u32,
) -> Result<bool, Status> {
    read_bool_at(buf, element(buf, position, start, index)?)
}

pub fn array_get_i64(
    buf: &[u8],
    position: usize,
    start: usize,
    index: u32,
) -> Result<i64, Status> {
    read_i64_at(buf, element(buf, position, start, index)?)
}

pub fn array_get_f64(
    buf: &[u8],
    position: usize,
    start: usize,
    index: u32,
) -> Result<f64, Status> {
    read_f64_at(buf, element(buf, position, start, index)?)
}

pub fn array_get_string(
    buf: &[u8],
    position: usize,
    start: usize,
    index: u32,
) -> Result<StringHandle, Status> {
    read_string_at(buf, element(buf, position, start, index)?)
}

pub fn array_get_bytes(
    buf: &[u8],
    position: usize,
    start: usize,
    index: u32,
) -> Result<BytesHandle, Status> {
    read_bytes_at(buf, element(buf, position, start, index)?)
}

pub fn array_get_object(
    buf: &[u8],
    position: usize,
    start: usize,
    index: u32,
) -> Result<usize, Status> {
    read_container_at(buf, element(buf, position, start, index)?, ValueKind::Object)
}

pub fn array_get_array(
    buf: &[u8],
    position: usize,
    start: usize,
    index: u32,
) -> Result<usize, Status> {
    read_container_at(buf, element(buf, position, start, index)?, ValueKind::Array)
}

/// Kind of element `index`.
pub fn array_type_of(
    buf: &[u8],
    position: usize,
    start: usize,
    index: u32,
) -> Result<ValueKind, Status> {
    read_kind(buf, element(buf, position, start, index)?)
}

/// `true` when element `index` is null.
pub fn array_is_null(
    buf: &[u8],
    position: usize,
    start: usize,
    index: u32,
) -> Result<bool, Status> {
    Ok(array_type_of(buf, position, start, index)? == ValueKind::Null)
}

/// User-visible payload size of element `index`.
pub fn array_value_size(
    buf: &[u8],
    position: usize,
    start: usize,
    index: u32,
) -> Result<u64, Status> {
    payload_size_at(buf, element(buf, position, start, index)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::{count, init_array};

    #[test]
    fn append_set_get() {
        let mut buf = vec![0u8; 4096];
        let mut pos = 0;
        init_array(&mut buf, &mut pos).unwrap();
        for s in ["zebra", "giraffe", "buffalo", "lion", "rhino", "elephant"] {
            array_append_string(&mut buf, &mut pos, 0, s).unwrap();
        }
        assert_eq!(count(&buf, pos, 0).unwrap(), 6);
        array_set_string(&mut buf, &mut pos, 0, 2, "gnu").unwrap();
        assert_eq!(
            array_get_string(&buf, pos, 0, 2).unwrap().resolve(&buf).unwrap(),
            "gnu"
        );
        assert_eq!(count(&buf, pos, 0).unwrap(), 6);
    }

    #[test]
    fn set_past_end_rejected() {
        let mut buf = vec![0u8; 1024];
        let mut pos = 0;
        init_array(&mut buf, &mut pos).unwrap();
        array_append_i64(&mut buf, &mut pos, 0, 1).unwrap();
        // index == size is only reachable through append.
        assert_eq!(
            array_set_i64(&mut buf, &mut pos, 0, 1, 2).unwrap_err(),
            Status::ArrayIndexOutOfBounds
        );
        assert_eq!(
            array_get_i64(&buf, pos, 0, 1).unwrap_err(),
            Status::ArrayIndexOutOfBounds
        );
    }

    #[test]
    fn mixed_kinds_and_nested() {
        let mut buf = vec![0u8; 8192];
        let mut pos = 0;
        init_array(&mut buf, &mut pos).unwrap();
        array_append_null(&mut buf, &mut pos, 0).unwrap();
        array_append_bool(&mut buf, &mut pos, 0, true).unwrap();
        array_append_f64(&mut buf, &mut pos, 0, 2.5).unwrap();
        let obj = array_append_object(&mut buf, &mut pos, 0).unwrap();
        crate::ops::set_i64(&mut buf, &mut pos, obj, "x", 9).unwrap();

        assert!(array_is_null(&buf, pos, 0, 0).unwrap());
        assert!(array_get_bool(&buf, pos, 0, 1).unwrap());
        assert_eq!(array_get_f64(&buf, pos, 0, 2).unwrap(), 2.5);
        let obj2 = array_get_object(&buf, pos, 0, 3).unwrap();
        assert_eq!(crate::ops::get_i64(&buf, pos, obj2, "x").unwrap(), 9);
        assert_eq!(array_type_of(&buf, pos, 0, 2).unwrap(), ValueKind::F64);
    }

    /// Enough appends to force splits in the index-keyed tree.
    #[test]
    fn large_array_survives_splits() {
        let mut buf = vec![0u8; 32 * 1024];
        let mut pos = 0;
        init_array(&mut buf, &mut pos).unwrap();
        for i in 0..100i64 {
            array_append_i64(&mut buf, &mut pos, 0, i * 3).unwrap();
        }
        assert_eq!(count(&buf, pos, 0).unwrap(), 100);
        for i in 0..100u32 {
            assert_eq!(array_get_i64(&buf, pos, 0, i).unwrap(), i as i64 * 3);
        }
    }
}
