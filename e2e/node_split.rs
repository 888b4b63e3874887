//! E2E Suite 03: Node splits, hash collisions, and count correctness.
//!
//! The structural invariants are observed through the public surface: the
//! iterator's in-order walk must produce strictly ascending hashes (which
//! can only hold if every node's hash array is ordered and child linkage is
//! consistent), and `count` must track distinct keys exactly.

use lite3::{count, exists, get_i64, init_object, iter, set_i64, set_null, Status};

/// Iterate the whole container and assert hash-ordered output.
fn assert_ordered(buf: &[u8], pos: usize, expected_len: u64) {
    let mut it = iter(buf, pos, 0).unwrap();
    let mut seen = 0u64;
    let mut last: Option<u32> = None;
    while let Some(item) = it.next(buf, pos).unwrap() {
        if let Some(prev) = last {
            assert!(prev < item.hash, "in-order walk must ascend");
        }
        last = Some(item.hash);
        seen += 1;
    }
    assert_eq!(seen, expected_len);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 1: 64 inserts with validation after every one
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_split_under_sequential_inserts() {
    let mut buf = vec![0u8; 32 * 1024];
    let mut pos = 0;
    init_object(&mut buf, &mut pos).unwrap();
    for i in 0..64i64 {
        let key = format!("field_{:03}", i);
        set_i64(&mut buf, &mut pos, 0, &key, i).unwrap();
        assert_ordered(&buf, pos, (i + 1) as u64);
        assert_eq!(count(&buf, pos, 0).unwrap(), (i + 1) as u64);
    }
    // Everything remains reachable after the splits.
    for i in 0..64i64 {
        let key = format!("field_{:03}", i);
        assert_eq!(get_i64(&buf, pos, 0, &key).unwrap(), i);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 2: Re-inserting existing keys never changes count
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_count_tracks_distinct_keys() {
    let mut buf = vec![0u8; 32 * 1024];
    let mut pos = 0;
    init_object(&mut buf, &mut pos).unwrap();
    for round in 0..3i64 {
        for i in 0..20i64 {
            set_i64(&mut buf, &mut pos, 0, &format!("k{}", i), i * 100 + round).unwrap();
        }
        assert_eq!(count(&buf, pos, 0).unwrap(), 20);
    }
    for i in 0..20i64 {
        assert_eq!(get_i64(&buf, pos, 0, &format!("k{}", i)).unwrap(), i * 100 + 2);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 3: DJB2-colliding keys coexist via quadratic probing
// ─────────────────────────────────────────────────────────────────────────────

/// Exhaustively find a colliding pair among 2-character alphanumeric keys.
fn find_collision() -> (String, String) {
    let alphabet: Vec<u8> = (b'A'..=b'Z').chain(b'a'..=b'z').chain(b'0'..=b'9').collect();
    let djb2 = |key: &[u8]| -> u32 {
        key.iter()
            .fold(5381u32, |h, &b| h.wrapping_mul(33).wrapping_add(b as u32))
    };
    let mut seen = std::collections::HashMap::new();
    for &a in &alphabet {
        for &b in &alphabet {
            let k = String::from_utf8(vec![a, b]).unwrap();
            if let Some(prev) = seen.insert(djb2(k.as_bytes()), k.clone()) {
                return (prev, k);
            }
        }
    }
    panic!("no DJB2 collision among 2-char alphanumeric keys");
}

#[test]
fn test_hash_collision_probe() {
    let (k1, k2) = find_collision();
    let mut buf = vec![0u8; 1024];
    let mut pos = 0;
    init_object(&mut buf, &mut pos).unwrap();
    set_null(&mut buf, &mut pos, 0, &k1).unwrap();
    set_null(&mut buf, &mut pos, 0, &k2).unwrap();

    assert!(exists(&buf, pos, 0, &k1).unwrap());
    assert!(exists(&buf, pos, 0, &k2).unwrap());
    assert_eq!(count(&buf, pos, 0).unwrap(), 2);
}

#[test]
fn test_colliding_values_stay_separate() {
    let (k1, k2) = find_collision();
    let mut buf = vec![0u8; 1024];
    let mut pos = 0;
    init_object(&mut buf, &mut pos).unwrap();
    set_i64(&mut buf, &mut pos, 0, &k1, 111).unwrap();
    set_i64(&mut buf, &mut pos, 0, &k2, 222).unwrap();
    // Overwrite through the probe chain, both directions.
    set_i64(&mut buf, &mut pos, 0, &k1, 333).unwrap();
    assert_eq!(get_i64(&buf, pos, 0, &k1).unwrap(), 333);
    assert_eq!(get_i64(&buf, pos, 0, &k2).unwrap(), 222);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 4: Exhaustion reports cleanly instead of corrupting
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_full_buffer_keeps_existing_content() {
    let mut buf = vec![0u8; 512];
    let mut pos = 0;
    init_object(&mut buf, &mut pos).unwrap();
    let mut stored = 0i64;
    for i in 0..1000i64 {
        match set_i64(&mut buf, &mut pos, 0, &format!("key_number_{}", i), i) {
            Ok(()) => stored += 1,
            Err(Status::InsufficientBuffer) => break,
            Err(e) => panic!("unexpected status {e}"),
        }
    }
    assert!(stored > 0, "some keys must fit in 512 bytes");
    assert_eq!(count(&buf, pos, 0).unwrap(), stored as u64);
    for i in 0..stored {
        assert_eq!(get_i64(&buf, pos, 0, &format!("key_number_{}", i)).unwrap(), i);
    }
}
