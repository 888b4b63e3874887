// Lite³ — JSON-compatible, zero-copy, in-place-mutable binary message format

pub mod buffer;
pub mod json;
pub mod node;
pub mod ops;
pub mod pool;
pub mod status;

// ─────────────────────────────────────────────────────────────────────────────
// Top-level convenience re-exports for the most common API entry points.
// The full surfaces live in their modules; these cover the everyday path:
// initialize, set, get, iterate, decode, encode.
// ─────────────────────────────────────────────────────────────────────────────

/// The crate's single error/sentinel channel.
pub use status::Status;

/// Value kind tags (`Null` … `Array`).
pub use node::layout::ValueKind;

/// Heap-backed arena with the 4× grow policy.
pub use buffer::GrowableBuf;

/// Layout constants worth knowing at the API boundary.
pub use buffer::{
    BUF_SIZE_MAX, BUF_SIZE_MIN, HASH_PROBE_MAX, KEY_COUNT_MAX, KEY_COUNT_MIN, NODE_ALIGN,
    NODE_SIZE, TREE_HEIGHT_MAX,
};

/// Arena initialization (empty root Object / Array).
pub use ops::{init_array, init_object};

/// Keyed setters.
pub use ops::{set_array, set_bool, set_bytes, set_f64, set_i64, set_null, set_object, set_string};

/// Keyed accessors and probes.
pub use ops::{
    exists, get, get_array, get_bool, get_bytes, get_f64, get_i64, get_object, get_string,
    is_null, type_of, value_size,
};

/// Indexed array surface.
pub use ops::{
    array_append_array, array_append_bool, array_append_bytes, array_append_f64,
    array_append_i64, array_append_null, array_append_object, array_append_string,
    array_get_array, array_get_bool, array_get_bytes, array_get_f64, array_get_i64,
    array_get_object, array_get_string, array_set_array, array_set_bool, array_set_bytes,
    array_set_f64, array_set_i64, array_set_null, array_set_object, array_set_string,
};

/// Aggregates and iteration.
pub use ops::{count, iter, root_type, Iter, IterItem};

/// Generation-checked payload handles.
pub use ops::{BytesHandle, StringHandle};

/// Untyped value view.
pub use ops::ValueCursor;

/// Streaming JSON decode / encode.
pub use json::{decode_value, encode_to_string, JsonDecoder};

/// Scratch allocation seam for the decoder.
pub use pool::{BytePool, HeapPool};
