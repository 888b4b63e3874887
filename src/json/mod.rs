//! JSON ↔ Lite³ streaming transcoders.
//!
//! [`decode`] turns a UTF-8 JSON stream into a message arena (resumable,
//! grow-aware); [`encode`] walks an arena back out as RFC 8259 text.  Both
//! sides share [`JSON_NESTING_MAX`] as the depth cap.

pub mod decode;
pub mod encode;
pub(crate) mod scanner;

pub use decode::{decode_to_buf, decode_value, DecodeProgress, JsonDecoder};
pub use encode::{encode_into, encode_to_string};

/// Maximum container nesting depth accepted by the decoder and produced by
/// the encoder.
pub const JSON_NESTING_MAX: usize = 64;
