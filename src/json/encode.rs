//! Lite³ → JSON encoder.
//!
//! A depth-bounded recursive walk over one container's tree, emitting
//! RFC 8259 JSON with a single deliberate extension: Bytes values come out
//! as Base64 strings (standard alphabet), since JSON has no binary kind.
//! Doubles print in shortest round-trip form and always carry a decimal
//! point or exponent so they re-decode as doubles; non-finite doubles
//! (unreachable via decode, possible via `set_f64`) encode as `null`.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use crate::buffer::{read_f64, read_i64, read_u32};
use crate::json::JSON_NESTING_MAX;
use crate::node::iter::{Cursor, IterEntry};
use crate::node::layout::{entry_key_bytes, ValueKind};
use crate::ops;
use crate::status::Status;

// ─────────────────────────────────────────────────────────────────────────────
// Entry points
// ─────────────────────────────────────────────────────────────────────────────

/// Encode the container at `start` into `out` (appended).
pub fn encode_into(
    buf: &[u8],
    position: usize,
    start: usize,
    out: &mut Vec<u8>,
) -> Result<(), Status> {
    encode_container(buf, position, start, 1, out)
}

/// Encode the whole message (root container) to a `String`.
pub fn encode_to_string(buf: &[u8], position: usize) -> Result<String, Status> {
    ops::root_type(buf)?;
    let mut out = Vec::new();
    encode_into(buf, position, 0, &mut out)?;
    // The encoder only ever emits valid UTF-8.
    String::from_utf8(out).map_err(|_| Status::ValueKindInvalid)
}

// ─────────────────────────────────────────────────────────────────────────────
// Recursive walk
// ─────────────────────────────────────────────────────────────────────────────

fn encode_container(
    buf: &[u8],
    position: usize,
    start: usize,
    depth: usize,
    out: &mut Vec<u8>,
) -> Result<(), Status> {
    if depth > JSON_NESTING_MAX {
        return Err(Status::JsonNestingDepthExceededMax);
    }
    let mut cursor = Cursor::open(buf, position, start)?;
    let keyed = cursor.keyed();
    out.push(if keyed { b'{' } else { b'[' });

    let mut entry = IterEntry {
        hash: 0,
        kv: 0,
        value: 0,
        kind: ValueKind::Null,
    };
    let mut first = true;
    loop {
        match cursor.next_entry(buf, position, &mut entry) {
            Status::IteratorDone => break,
            Status::IteratorItem => {}
            s => return Err(s),
        }
        if !first {
            out.push(b',');
        }
        first = false;
        if keyed {
            let kb = entry_key_bytes(buf, position, entry.kv)?;
            write_escaped_string(&kb[..kb.len().saturating_sub(1)], out);
            out.push(b':');
        }
        encode_value(buf, position, entry.value, entry.kind, depth, out)?;
    }
    out.push(if keyed { b'}' } else { b']' });
    Ok(())
}

fn encode_value(
    buf: &[u8],
    position: usize,
    v: usize,
    kind: ValueKind,
    depth: usize,
    out: &mut Vec<u8>,
) -> Result<(), Status> {
    match kind {
        ValueKind::Null => out.extend_from_slice(b"null"),
        ValueKind::Bool => {
            out.extend_from_slice(if buf[v + 1] != 0 { b"true" } else { b"false" })
        }
        ValueKind::I64 => {
            let mut tmp = itoa_buf();
            out.extend_from_slice(write_i64_text(read_i64(buf, v + 1), &mut tmp));
        }
        ValueKind::F64 => write_f64_text(read_f64(buf, v + 1), out),
        ValueKind::String => {
            let len = read_u32(buf, v + 1) as usize;
            if len == 0 || v + 5 + len > position {
                return Err(Status::ValueOutOfBounds);
            }
            write_escaped_string(&buf[v + 5..v + 5 + len - 1], out);
        }
        ValueKind::Bytes => {
            let len = read_u32(buf, v + 1) as usize;
            if v + 5 + len > position {
                return Err(Status::ValueOutOfBounds);
            }
            out.push(b'"');
            out.extend_from_slice(BASE64.encode(&buf[v + 5..v + 5 + len]).as_bytes());
            out.push(b'"');
        }
        ValueKind::Object | ValueKind::Array => {
            encode_container(buf, position, v, depth + 1, out)?;
        }
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Scalar formatting
// ─────────────────────────────────────────────────────────────────────────────

fn itoa_buf() -> [u8; 20] {
    [0u8; 20]
}

/// Minimal signed decimal formatter into a fixed buffer.
fn write_i64_text(v: i64, tmp: &mut [u8; 20]) -> &[u8] {
    let mut n = v.unsigned_abs();
    let mut i = tmp.len();
    loop {
        i -= 1;
        tmp[i] = b'0' + (n % 10) as u8;
        n /= 10;
        if n == 0 {
            break;
        }
    }
    if v < 0 {
        i -= 1;
        tmp[i] = b'-';
    }
    &tmp[i..]
}

/// Shortest round-trip double, forced to stay a double on re-decode: a
/// bare integral rendering gains `.0`, and non-finite values become
/// `null` (JSON has no lexeme for them).
fn write_f64_text(v: f64, out: &mut Vec<u8>) {
    if !v.is_finite() {
        out.extend_from_slice(b"null");
        return;
    }
    let text = format!("{}", v);
    out.extend_from_slice(text.as_bytes());
    if !text.bytes().any(|b| matches!(b, b'.' | b'e' | b'E')) {
        out.extend_from_slice(b".0");
    }
}

/// RFC 8259 string escaping: quote, backslash, and control characters;
/// everything else passes through as UTF-8.
fn write_escaped_string(s: &[u8], out: &mut Vec<u8>) {
    out.push(b'"');
    for &b in s {
        match b {
            b'"' => out.extend_from_slice(b"\\\""),
            b'\\' => out.extend_from_slice(b"\\\\"),
            0x08 => out.extend_from_slice(b"\\b"),
            0x0C => out.extend_from_slice(b"\\f"),
            b'\n' => out.extend_from_slice(b"\\n"),
            b'\r' => out.extend_from_slice(b"\\r"),
            b'\t' => out.extend_from_slice(b"\\t"),
            0x00..=0x1F => {
                out.extend_from_slice(b"\\u00");
                out.push(hex_digit(b >> 4));
                out.push(hex_digit(b & 0xF));
            }
            _ => out.push(b),
        }
    }
    out.push(b'"');
}

fn hex_digit(d: u8) -> u8 {
    match d {
        0..=9 => b'0' + d,
        _ => b'a' + d - 10,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops;

    fn build_sample() -> (Vec<u8>, usize) {
        let mut buf = vec![0u8; 4096];
        let mut pos = 0;
        ops::init_object(&mut buf, &mut pos).unwrap();
        ops::set_string(&mut buf, &mut pos, 0, "event", "lap_complete").unwrap();
        ops::set_i64(&mut buf, &mut pos, 0, "lap", 56).unwrap();
        ops::set_f64(&mut buf, &mut pos, 0, "time_sec", 88.427).unwrap();
        (buf, pos)
    }

    #[test]
    fn object_encodes_semantically() {
        let (buf, pos) = build_sample();
        let json = encode_to_string(&buf, pos).unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["event"], "lap_complete");
        assert_eq!(v["lap"], 56);
        assert_eq!(v["time_sec"], 88.427);
    }

    #[test]
    fn doubles_stay_doubles() {
        let mut buf = vec![0u8; 1024];
        let mut pos = 0;
        ops::init_object(&mut buf, &mut pos).unwrap();
        ops::set_f64(&mut buf, &mut pos, 0, "whole", 5.0).unwrap();
        ops::set_f64(&mut buf, &mut pos, 0, "nan", f64::NAN).unwrap();
        let json = encode_to_string(&buf, pos).unwrap();
        assert!(json.contains("5.0"), "{json}");
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(v["whole"].is_f64());
        assert!(v["nan"].is_null());
    }

    #[test]
    fn bytes_as_base64() {
        let mut buf = vec![0u8; 1024];
        let mut pos = 0;
        ops::init_object(&mut buf, &mut pos).unwrap();
        ops::set_bytes(&mut buf, &mut pos, 0, "blob", &[0xDE, 0xAD, 0xBE, 0xEF]).unwrap();
        let json = encode_to_string(&buf, pos).unwrap();
        assert!(json.contains("\"3q2+7w==\""), "{json}");
    }

    #[test]
    fn escapes_in_keys_and_values() {
        let mut buf = vec![0u8; 1024];
        let mut pos = 0;
        ops::init_object(&mut buf, &mut pos).unwrap();
        ops::set_string(&mut buf, &mut pos, 0, "li\nne", "tab\there\x01").unwrap();
        let json = encode_to_string(&buf, pos).unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["li\nne"], "tab\there\u{1}");
    }

    #[test]
    fn arrays_and_nesting() {
        let mut buf = vec![0u8; 4096];
        let mut pos = 0;
        ops::init_array(&mut buf, &mut pos).unwrap();
        ops::array_append_i64(&mut buf, &mut pos, 0, 1).unwrap();
        let obj = ops::array_append_object(&mut buf, &mut pos, 0).unwrap();
        ops::set_bool(&mut buf, &mut pos, obj, "ok", true).unwrap();
        ops::array_append_null(&mut buf, &mut pos, 0).unwrap();
        let json = encode_to_string(&buf, pos).unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v[0], 1);
        assert_eq!(v[1]["ok"], true);
        assert!(v[2].is_null());
    }

    #[test]
    fn i64_formatting_extremes() {
        let mut tmp = itoa_buf();
        assert_eq!(write_i64_text(0, &mut tmp), b"0");
        let mut tmp = itoa_buf();
        assert_eq!(write_i64_text(i64::MAX, &mut tmp), b"9223372036854775807");
        let mut tmp = itoa_buf();
        assert_eq!(write_i64_text(i64::MIN, &mut tmp), b"-9223372036854775808");
    }
}
