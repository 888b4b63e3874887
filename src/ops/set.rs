//! Keyed setters (Object containers).
//!
//! Setters are total: they validate the container, probe for the key, and
//! either overwrite in place, relocate to the frontier, or append a new
//! entry — whichever the node engine decides.  All of them bump the
//! generation, so any outstanding handle or iterator goes stale.

use crate::node::insert::{insert, NewValue};
use crate::node::layout::ValueKind;
use crate::node::lookup::validate_container;
use crate::ops::object_key;
use crate::status::Status;

fn set_value(
    buf: &mut [u8],
    position: &mut usize,
    start: usize,
    key: &str,
    value: NewValue<'_>,
) -> Result<usize, Status> {
    let (kb, hash) = object_key(key)?;
    validate_container(buf, *position, start, Some(ValueKind::Object))?;
    let out = insert(buf, position, start, Some(kb), hash, value)?;
    Ok(out.value)
}

/// `obj[key] = null`
pub fn set_null(
    buf: &mut [u8],
    position: &mut usize,
    start: usize,
    key: &str,
) -> Result<(), Status> {
    set_value(buf, position, start, key, NewValue::Null).map(|_| ())
}

/// `obj[key] = bool`
pub fn set_bool(
    buf: &mut [u8],
    position: &mut usize,
    start: usize,
    key: &str,
    value: bool,
) -> Result<(), Status> {
    set_value(buf, position, start, key, NewValue::Bool(value)).map(|_| ())
}

/// `obj[key] = i64`
pub fn set_i64(
    buf: &mut [u8],
    position: &mut usize,
    start: usize,
    key: &str,
    value: i64,
) -> Result<(), Status> {
    set_value(buf, position, start, key, NewValue::I64(value)).map(|_| ())
}

/// `obj[key] = f64`
pub fn set_f64(
    buf: &mut [u8],
    position: &mut usize,
    start: usize,
    key: &str,
    value: f64,
) -> Result<(), Status> {
    set_value(buf, position, start, key, NewValue::F64(value)).map(|_| ())
}

/// `obj[key] = bytes`
pub fn set_bytes(
    buf: &mut [u8],
    position: &mut usize,
    start: usize,
    key: &str,
    value: &[u8],
) -> Result<(), Status> {
    set_value(buf, position, start, key, NewValue::Bytes(value)).map(|_| ())
}

/// `obj[key] = str`
pub fn set_string(
    buf: &mut [u8],
    position: &mut usize,
    start: usize,
    key: &str,
    value: &str,
) -> Result<(), Status> {
    set_value(buf, position, start, key, NewValue::Str(value.as_bytes())).map(|_| ())
}

/// `obj[key] = {}` — returns the child node's offset for nested sets.
pub fn set_object(
    buf: &mut [u8],
    position: &mut usize,
    start: usize,
    key: &str,
) -> Result<usize, Status> {
    set_value(buf, position, start, key, NewValue::Container(ValueKind::Object))
}

/// `obj[key] = []` — returns the child node's offset for nested appends.
pub fn set_array(
    buf: &mut [u8],
    position: &mut usize,
    start: usize,
    key: &str,
) -> Result<usize, Status> {
    set_value(buf, position, start, key, NewValue::Container(ValueKind::Array))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::generation;
    use crate::ops::{count, get_i64, get_string, init_object};

    #[test]
    fn empty_key_rejected() {
        let mut buf = vec![0u8; 1024];
        let mut pos = 0;
        init_object(&mut buf, &mut pos).unwrap();
        assert_eq!(
            set_i64(&mut buf, &mut pos, 0, "", 1).unwrap_err(),
            Status::ExpectedNonEmptyKey
        );
    }

    #[test]
    fn set_against_array_root_rejected() {
        let mut buf = vec![0u8; 1024];
        let mut pos = 0;
        crate::ops::init_array(&mut buf, &mut pos).unwrap();
        assert_eq!(
            set_i64(&mut buf, &mut pos, 0, "k", 1).unwrap_err(),
            Status::ExpectedObject
        );
    }

    #[test]
    fn nested_object_roundtrip() {
        let mut buf = vec![0u8; 4096];
        let mut pos = 0;
        init_object(&mut buf, &mut pos).unwrap();
        let child = set_object(&mut buf, &mut pos, 0, "meta").unwrap();
        set_i64(&mut buf, &mut pos, child, "laps", 56).unwrap();
        set_string(&mut buf, &mut pos, child, "driver", "jpm").unwrap();
        assert_eq!(get_i64(&buf, pos, child, "laps").unwrap(), 56);
        let h = get_string(&buf, pos, child, "driver").unwrap();
        assert_eq!(h.resolve(&buf).unwrap(), "jpm");
        assert_eq!(count(&buf, pos, child).unwrap(), 2);
        assert_eq!(count(&buf, pos, 0).unwrap(), 1);
    }

    #[test]
    fn every_set_bumps_generation() {
        let mut buf = vec![0u8; 2048];
        let mut pos = 0;
        init_object(&mut buf, &mut pos).unwrap();
        let g0 = generation(&buf);
        set_null(&mut buf, &mut pos, 0, "a").unwrap();
        let g1 = generation(&buf);
        set_null(&mut buf, &mut pos, 0, "a").unwrap(); // replace, still a mutation
        let g2 = generation(&buf);
        assert!(g1 > g0 && g2 > g1);
    }
}
