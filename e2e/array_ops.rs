//! E2E Suite 02: Array indexing, append, and overwrite.

use lite3::{
    array_append_i64, array_append_object, array_append_string, array_get_i64, array_get_string,
    array_set_string, count, get_i64, init_array, iter, set_i64, Status,
};

// ─────────────────────────────────────────────────────────────────────────────
// Test 1: Append, set-by-index, read back
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_array_indexing_and_overwrite() {
    let mut buf = vec![0u8; 4096];
    let mut pos = 0;
    init_array(&mut buf, &mut pos).unwrap();
    for animal in ["zebra", "giraffe", "buffalo", "lion", "rhino", "elephant"] {
        array_append_string(&mut buf, &mut pos, 0, animal).unwrap();
    }
    array_set_string(&mut buf, &mut pos, 0, 2, "gnu").unwrap();

    assert_eq!(
        array_get_string(&buf, pos, 0, 2).unwrap().resolve(&buf).unwrap(),
        "gnu"
    );
    assert_eq!(count(&buf, pos, 0).unwrap(), 6);

    // The untouched neighbors survive the overwrite.
    assert_eq!(
        array_get_string(&buf, pos, 0, 1).unwrap().resolve(&buf).unwrap(),
        "giraffe"
    );
    assert_eq!(
        array_get_string(&buf, pos, 0, 5).unwrap().resolve(&buf).unwrap(),
        "elephant"
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 2: Index bounds are strict
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_strict_index_bounds() {
    let mut buf = vec![0u8; 1024];
    let mut pos = 0;
    init_array(&mut buf, &mut pos).unwrap();
    array_append_i64(&mut buf, &mut pos, 0, 10).unwrap();
    array_append_i64(&mut buf, &mut pos, 0, 20).unwrap();

    // One past the end is not writable through set-by-index.
    assert_eq!(
        array_set_string(&mut buf, &mut pos, 0, 2, "x").unwrap_err(),
        Status::ArrayIndexOutOfBounds
    );
    assert_eq!(
        array_get_i64(&buf, pos, 0, 2).unwrap_err(),
        Status::ArrayIndexOutOfBounds
    );
    // Append still lands at exactly that index.
    array_append_i64(&mut buf, &mut pos, 0, 30).unwrap();
    assert_eq!(array_get_i64(&buf, pos, 0, 2).unwrap(), 30);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 3: Iteration yields elements in index order
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_array_iteration_order() {
    let mut buf = vec![0u8; 16 * 1024];
    let mut pos = 0;
    init_array(&mut buf, &mut pos).unwrap();
    for i in 0..50i64 {
        array_append_i64(&mut buf, &mut pos, 0, i * 7).unwrap();
    }
    let mut it = iter(&buf, pos, 0).unwrap();
    let mut expect = 0u32;
    while let Some(item) = it.next(&buf, pos).unwrap() {
        assert_eq!(item.key, None);
        assert_eq!(item.hash, expect, "elements iterate in index order");
        expect += 1;
    }
    assert_eq!(expect, 50);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 4: Arrays of objects
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_array_of_objects() {
    let mut buf = vec![0u8; 16 * 1024];
    let mut pos = 0;
    init_array(&mut buf, &mut pos).unwrap();
    for i in 0..10i64 {
        let obj = array_append_object(&mut buf, &mut pos, 0).unwrap();
        set_i64(&mut buf, &mut pos, obj, "id", i).unwrap();
    }
    assert_eq!(count(&buf, pos, 0).unwrap(), 10);
    for i in 0..10u32 {
        let obj = lite3::array_get_object(&buf, pos, 0, i).unwrap();
        assert_eq!(get_i64(&buf, pos, obj, "id").unwrap(), i as i64);
    }
}
