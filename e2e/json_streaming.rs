//! E2E Suite 05: Streaming decode with input underflow and output growth.
//!
//! Drives the decoder the way a real reader would: arbitrary chunk sizes,
//! partial tokens at every boundary, property names straddling refills, and
//! an output arena that starts at the 1 KiB floor and must grow to hold a
//! quarter-megabyte document.

use lite3::json::encode_to_string;
use lite3::{GrowableBuf, JsonDecoder, Status, BUF_SIZE_MIN};

/// Feed `doc` through the decoder `chunk` bytes at a time, keeping the
/// unconsumed tail across calls the way a ring-buffer reader would.
fn stream_decode(doc: &[u8], chunk: usize) -> GrowableBuf {
    let mut out = GrowableBuf::with_capacity(BUF_SIZE_MIN);
    let mut dec = JsonDecoder::new();
    let mut pending: Vec<u8> = Vec::new();
    let mut fed = 0;
    while fed < doc.len() {
        let take = chunk.min(doc.len() - fed);
        pending.extend_from_slice(&doc[fed..fed + take]);
        fed += take;
        let progress = dec.update(&mut out, &pending, false).unwrap();
        pending.drain(..progress.consumed);
    }
    let progress = dec.update(&mut out, &pending, true).unwrap();
    assert!(progress.finished, "document must close on the final block");
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Synthetic periodic-table document (≥ 250 KB)
// ─────────────────────────────────────────────────────────────────────────────

/// 118 elements; densities fixed so Osmium (Z = 76) is the densest entry
/// that is not null.  Notes pad each record to push the document well past
/// 250 KB.
fn periodic_table_json() -> Vec<u8> {
    let mut doc = String::with_capacity(300 * 1024);
    doc.push_str(r#"{"table": "periodic", "elements": ["#);
    for z in 1..=118u32 {
        if z > 1 {
            doc.push(',');
        }
        let name = match z {
            76 => "Osmium".to_string(),
            77 => "Iridium".to_string(),
            _ => format!("Element{:03}", z),
        };
        // Gases and a few exotics report no bulk density.
        let density = match z {
            1 | 2 | 7 | 8 | 9 | 10 | 17 | 18 | 36 | 54 | 86 => "null".to_string(),
            76 => "22590.0".to_string(),
            77 => "22560.0".to_string(),
            _ => format!("{}.0", 500 + (z as u64 * 137) % 20000),
        };
        let notes = "x".repeat(2400);
        doc.push_str(&format!(
            r#"{{"number": {z}, "name": "{name}", "density_kg_per_m3": {density}, "notes": "{notes}"}}"#
        ));
    }
    doc.push_str("]}");
    assert!(doc.len() >= 250 * 1024, "document too small: {}", doc.len());
    doc.into_bytes()
}

#[test]
fn test_stream_large_document_with_growth() {
    let doc = periodic_table_json();
    let out = stream_decode(&doc, 4096);
    assert!(
        out.capacity() > BUF_SIZE_MIN,
        "a 250 KB document must force the arena to grow"
    );

    let (buf, pos) = (out.bytes(), out.position());
    let elements = lite3::get_array(buf, pos, 0, "elements").unwrap();
    assert_eq!(lite3::count(buf, pos, elements).unwrap(), 118);

    // Find the densest element with a non-null density.
    let mut best: Option<(f64, String)> = None;
    for i in 0..118u32 {
        let el = lite3::array_get_object(buf, pos, elements, i).unwrap();
        if lite3::is_null(buf, pos, el, "density_kg_per_m3").unwrap() {
            continue;
        }
        let d = lite3::get_f64(buf, pos, el, "density_kg_per_m3").unwrap();
        let name = lite3::get_string(buf, pos, el, "name")
            .unwrap()
            .resolve(buf)
            .unwrap()
            .to_string();
        if best.as_ref().map_or(true, |(b, _)| d > *b) {
            best = Some((d, name));
        }
    }
    let (density, name) = best.unwrap();
    assert_eq!(name, "Osmium");
    assert_eq!(density, 22590.0);

    // The winning subtree encodes and round-trips.
    let el76 = lite3::array_get_object(buf, pos, elements, 75).unwrap();
    let mut sub = Vec::new();
    lite3::json::encode_into(buf, pos, el76, &mut sub).unwrap();
    let sub_json = String::from_utf8(sub).unwrap();
    let back = lite3::json::decode_to_buf(sub_json.as_bytes()).unwrap();
    let re = encode_to_string(back.bytes(), back.position()).unwrap();
    let a: serde_json::Value = serde_json::from_str(&sub_json).unwrap();
    let b: serde_json::Value = serde_json::from_str(&re).unwrap();
    assert_eq!(a, b);
}

// ─────────────────────────────────────────────────────────────────────────────
// Byte-at-a-time feeding
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_single_byte_chunks() {
    let doc = br#"{"name": "str\nwith\tescapes", "nums": [1, -2.5, 3e2], "flag": true}"#;
    let out = stream_decode(doc, 1);
    let (buf, pos) = (out.bytes(), out.position());
    assert_eq!(
        lite3::get_string(buf, pos, 0, "name").unwrap().resolve(buf).unwrap(),
        "str\nwith\tescapes"
    );
    let nums = lite3::get_array(buf, pos, 0, "nums").unwrap();
    assert_eq!(lite3::array_get_i64(buf, pos, nums, 0).unwrap(), 1);
    assert_eq!(lite3::array_get_f64(buf, pos, nums, 1).unwrap(), -2.5);
    assert_eq!(lite3::array_get_f64(buf, pos, nums, 2).unwrap(), 300.0);
    assert!(lite3::get_bool(buf, pos, 0, "flag").unwrap());
}

/// The chunk boundary lands inside a property name: the pending-key copy
/// path must kick in (the driver recycles its buffer between calls).
#[test]
fn test_pending_key_across_suspension() {
    let doc = br#"{"a_rather_long_property_name": 7}"#;
    // Split right in the middle of the name.
    let out = stream_decode(doc, 13);
    let (buf, pos) = (out.bytes(), out.position());
    assert_eq!(
        lite3::get_i64(buf, pos, 0, "a_rather_long_property_name").unwrap(),
        7
    );
}

/// The name is fully consumed, then the input ends before the colon.  The
/// decoder must copy the name out of the chunk it is about to lose; the
/// driver here deliberately hands over a *different* buffer next call.
#[test]
fn test_pending_key_survives_buffer_recycling() {
    let mut out = GrowableBuf::with_capacity(BUF_SIZE_MIN);
    let mut dec = JsonDecoder::new();
    let p = dec.update(&mut out, br#"{"held_over_name""#, false).unwrap();
    assert!(!p.finished);
    assert_eq!(p.consumed, 17, "the complete name token is consumable");

    let p = dec.update(&mut out, br#": "v"}"#, true).unwrap();
    assert!(p.finished);
    let (buf, pos) = (out.bytes(), out.position());
    assert_eq!(
        lite3::get_string(buf, pos, 0, "held_over_name").unwrap().resolve(buf).unwrap(),
        "v"
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Stream-level failures
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_truncated_final_block() {
    let mut out = GrowableBuf::with_capacity(BUF_SIZE_MIN);
    let mut dec = JsonDecoder::new();
    let p = dec.update(&mut out, br#"{"a": [1, 2"#, false).unwrap();
    assert!(!p.finished);
    // The reader declares end-of-input with the stack still open.
    assert_eq!(
        dec.update(&mut out, b"", true).unwrap_err(),
        Status::NeedsMoreData
    );
}

#[test]
fn test_trailing_data_after_document() {
    let mut out = GrowableBuf::with_capacity(BUF_SIZE_MIN);
    let mut dec = JsonDecoder::new();
    assert_eq!(
        dec.update(&mut out, br#"{"a": 1} {"b": 2}"#, true).unwrap_err(),
        Status::TrailingData
    );
}

#[test]
fn test_reset_recycles_decoder() {
    let mut out = GrowableBuf::with_capacity(BUF_SIZE_MIN);
    let mut dec = JsonDecoder::new();
    // Abandon a document mid-name (pending key held), then reuse.
    let p = dec.update(&mut out, br#"{"abandoned_key"#, false).unwrap();
    assert!(!p.finished);
    dec.reset(&mut lite3::HeapPool);

    let mut out2 = GrowableBuf::with_capacity(BUF_SIZE_MIN);
    let p = dec.update(&mut out2, br#"{"fresh": 1}"#, true).unwrap();
    assert!(p.finished);
    assert_eq!(lite3::get_i64(out2.bytes(), out2.position(), 0, "fresh").unwrap(), 1);
}
