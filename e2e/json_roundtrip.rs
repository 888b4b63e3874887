//! E2E Suite 04: JSON decode/encode round trips.
//!
//! `encode(decode(D))` must be semantically equal to `D` modulo key order,
//! with integers staying integers and doubles staying doubles.  Semantic
//! equality is checked through `serde_json::Value`, which compares objects
//! order-insensitively.

use lite3::json::{decode_to_buf, encode_to_string};

fn roundtrip(doc: &str) -> (serde_json::Value, serde_json::Value) {
    let buf = decode_to_buf(doc.as_bytes()).unwrap();
    let encoded = encode_to_string(buf.bytes(), buf.position()).unwrap();
    (
        serde_json::from_str(doc).unwrap(),
        serde_json::from_str(&encoded).unwrap(),
    )
}

fn assert_roundtrip(doc: &str) {
    let (orig, back) = roundtrip(doc);
    assert_eq!(orig, back, "round trip changed the document: {doc}");
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 1: Representative documents
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_roundtrip_corpus() {
    for doc in [
        "{}",
        "[]",
        r#"{"a": 1}"#,
        r#"[1, 2, 3]"#,
        r#"{"nested": {"deep": {"deeper": [null, true, false]}}}"#,
        r#"{"mixed": [1, "two", 3.5, {"four": 4}, [5]]}"#,
        r#"{"unicode": "café 𝄞", "plain": "ascii"}"#,
        r#"{"neg": -42, "zero": 0, "frac": 0.125, "exp": 6.02e23}"#,
        r#"[{"id": 1, "tags": []}, {"id": 2, "tags": ["a", "b"]}]"#,
    ] {
        assert_roundtrip(doc);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 2: Numeric kinds survive the trip
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_integers_stay_integers() {
    let (_, back) = roundtrip(r#"{"i": 7, "big": 9223372036854775807, "d": 7.0}"#);
    assert!(back["i"].is_i64());
    assert!(back["big"].is_i64());
    assert_eq!(back["big"].as_i64().unwrap(), i64::MAX);
    assert!(back["d"].is_f64(), "7.0 must stay a double");
}

#[test]
fn test_i64_overflow_becomes_double() {
    let (_, back) = roundtrip(r#"{"huge": 99999999999999999999}"#);
    assert!(back["huge"].is_f64());
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 3: Key order may differ, content may not
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_key_order_is_hash_order_but_content_equal() {
    let doc = r#"{"zzz": 1, "aaa": 2, "mmm": 3}"#;
    let buf = decode_to_buf(doc.as_bytes()).unwrap();
    let encoded = encode_to_string(buf.bytes(), buf.position()).unwrap();
    let orig: serde_json::Value = serde_json::from_str(doc).unwrap();
    let back: serde_json::Value = serde_json::from_str(&encoded).unwrap();
    assert_eq!(orig, back);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 4: Wide objects (split-heavy) round trip
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_wide_object_roundtrip() {
    let mut doc = String::from("{");
    for i in 0..200 {
        if i > 0 {
            doc.push(',');
        }
        doc.push_str(&format!(r#""key_{0:03}": {0}"#, i));
    }
    doc.push('}');
    assert_roundtrip(&doc);
}

#[test]
fn test_long_array_roundtrip() {
    let items: Vec<String> = (0..500).map(|i| format!("{}.5", i)).collect();
    let doc = format!("[{}]", items.join(","));
    assert_roundtrip(&doc);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 5: Escapes and control characters
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_escape_roundtrip() {
    assert_roundtrip(r#"{"s": "line\nbreak\ttab \"quoted\" back\\slash "}"#);
    assert_roundtrip(r#"{"ke\u0041y": "escaped key name", "clef": "\ud834\udd1e"}"#);
}
