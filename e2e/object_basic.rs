//! E2E Suite 01: Basic object operations.
//!
//! Covers the fundamental keyed workflow end to end:
//! - Build, overwrite, and read back a small object
//! - Generation accounting (init + every set bumps once)
//! - Alignment-padding zeroing against a dirtied scratch region
//! - Set idempotence
//! - Handle staleness after unrelated mutations

use lite3::buffer::generation;
use lite3::{
    count, get_f64, get_i64, get_string, init_object, set_f64, set_i64, set_object, set_string,
    Status, NODE_SIZE,
};

// ─────────────────────────────────────────────────────────────────────────────
// Test 1: Basic object build + overwrite
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_basic_object() {
    let mut buf = vec![0u8; 1024];
    let mut pos = 0;
    init_object(&mut buf, &mut pos).unwrap();
    set_string(&mut buf, &mut pos, 0, "event", "lap_complete").unwrap();
    set_i64(&mut buf, &mut pos, 0, "lap", 55).unwrap();
    set_f64(&mut buf, &mut pos, 0, "time_sec", 88.427).unwrap();
    set_i64(&mut buf, &mut pos, 0, "lap", 56).unwrap();

    assert_eq!(count(&buf, pos, 0).unwrap(), 3);
    assert_eq!(get_i64(&buf, pos, 0, "lap").unwrap(), 56);
    assert_eq!(get_f64(&buf, pos, 0, "time_sec").unwrap(), 88.427);
    assert_eq!(
        get_string(&buf, pos, 0, "event").unwrap().resolve(&buf).unwrap(),
        "lap_complete"
    );

    // init + 4 sets = 5 generation increments.
    assert_eq!(generation(&buf), 5);

    let json = lite3::encode_to_string(&buf, pos).unwrap();
    let v: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(
        v,
        serde_json::json!({"event": "lap_complete", "lap": 56, "time_sec": 88.427})
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 2: Alignment zeroing over a dirtied buffer
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_alignment_zeroing_fresh_entry() {
    // Scratch full of junk: any zero we observe was written deliberately.
    let mut buf = vec![0xEEu8; 1024];
    let mut pos = 0;
    init_object(&mut buf, &mut pos).unwrap();
    let child = set_object(&mut buf, &mut pos, 0, "a").unwrap();

    // Entry layout: 1 pad byte, key tag, "a", NUL, then the aligned node.
    assert_eq!(buf[NODE_SIZE], 0x00, "first padding byte must be zeroed");
    assert_eq!(child % 4, 0, "child node must be 4-byte aligned");
}

#[test]
fn test_alignment_zeroing_relocated_entry() {
    let mut buf = vec![0xEEu8; 1024];
    let mut pos = 0;
    init_object(&mut buf, &mut pos).unwrap();
    set_string(&mut buf, &mut pos, 0, "key1", "val1").unwrap();
    let p = pos;
    set_object(&mut buf, &mut pos, 0, "key1").unwrap();

    // The relocated entry needs two pad bytes at the old frontier.
    assert_eq!(&buf[p..p + 2], &[0x00, 0x00]);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 3: Idempotence
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_set_idempotence() {
    let mut buf = vec![0u8; 2048];
    let mut pos = 0;
    init_object(&mut buf, &mut pos).unwrap();
    set_string(&mut buf, &mut pos, 0, "k", "value").unwrap();
    let snapshot = lite3::encode_to_string(&buf, pos).unwrap();

    // Same key, same value: observable content unchanged.
    set_string(&mut buf, &mut pos, 0, "k", "value").unwrap();
    assert_eq!(lite3::encode_to_string(&buf, pos).unwrap(), snapshot);
    assert_eq!(count(&buf, pos, 0).unwrap(), 1);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 4: Handle staleness
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_handle_staleness() {
    let mut buf = vec![0u8; 2048];
    let mut pos = 0;
    init_object(&mut buf, &mut pos).unwrap();
    set_string(&mut buf, &mut pos, 0, "name", "osmium").unwrap();

    let h = get_string(&buf, pos, 0, "name").unwrap();
    assert_eq!(h.resolve(&buf).unwrap(), "osmium");

    // Mutating an unrelated key still invalidates the handle.
    set_i64(&mut buf, &mut pos, 0, "other", 1).unwrap();
    assert_eq!(h.resolve(&buf).unwrap_err(), Status::MutatedBuffer);

    // A fresh lookup works.
    let h2 = get_string(&buf, pos, 0, "name").unwrap();
    assert_eq!(h2.resolve(&buf).unwrap(), "osmium");
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 5: Message transportability
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_live_prefix_is_transportable() {
    let mut buf = vec![0u8; 2048];
    let mut pos = 0;
    init_object(&mut buf, &mut pos).unwrap();
    set_i64(&mut buf, &mut pos, 0, "x", 42).unwrap();
    set_string(&mut buf, &mut pos, 0, "y", "z").unwrap();

    // Copy the live prefix verbatim; it must be immediately usable.
    let wire: Vec<u8> = buf[..pos].to_vec();
    assert_eq!(get_i64(&wire, wire.len(), 0, "x").unwrap(), 42);
    assert_eq!(
        get_string(&wire, wire.len(), 0, "y").unwrap().resolve(&wire).unwrap(),
        "z"
    );
}
