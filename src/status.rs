//! Status codes — the single signed error/sentinel channel of the crate.
//!
//! Every fallible operation in Lite³ reports through this enum.  The contract
//! is C-flavored on purpose: negative discriminants are failures, `0` is
//! nominal success, and small positive values are in-band sentinels that a
//! driving loop consumes rather than surfaces (`GrewBuffer` means "the arena
//! was reallocated, retry the write"; `IteratorItem` / `IteratorDone` carry
//! cursor progress).
//!
//! The discriminant values are stable: a `Status` may be narrowed to `i32`
//! and transported across an FFI or logging boundary without losing meaning.

use core::fmt;

// ─────────────────────────────────────────────────────────────────────────────
// Status enum
// ─────────────────────────────────────────────────────────────────────────────

/// Result code for every Lite³ operation.
///
/// Grouped by taxonomy:
/// - *structural* — corruption or misuse of an already-built arena; callers
///   should treat these as fatal.
/// - *semantic* — well-formed arena, wrong usage (missing key, wrong type);
///   routine, callers branch on them.
/// - *capacity* — the arena is full; recoverable by growing and retrying.
/// - *decoder* — malformed or incomplete JSON input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum Status {
    // ── Structural failures ──────────────────────────────────────────────
    /// A container start offset lies outside the live region.
    StartOffsetOutOfBounds = -1,
    /// A node offset is not 4-byte-aligned.
    NodeOffsetNotAligned = -2,
    /// A node walk reached an offset outside the live region.
    NodeWalksOffsetOutOfBounds = -3,
    /// A node walk descended past `TREE_HEIGHT_MAX` levels.
    NodeWalksExceededTreeHeightMax = -4,
    /// A key entry (tag or key bytes) extends past the live region.
    KeyEntryOutOfBounds = -5,
    /// A key tag's encoded width disagrees with its encoded key size.
    KeyTagSizeDoesNotMatch = -6,
    /// A value's declared extent exceeds the live region.
    ValueOutOfBounds = -7,
    /// A value tag byte is not a known kind (tag ≥ 8).
    ValueKindInvalid = -8,
    /// Quadratic probing exhausted all `HASH_PROBE_MAX` attempts.
    HashProbeLimitReached = -9,
    /// An iterator observed a generation change and is no longer valid.
    InvalidIterator = -10,

    // ── Semantic failures ────────────────────────────────────────────────
    /// The offset does not carry an Object or Array node.
    ExpectedArrayOrObject = -11,
    /// The operation requires an Object container.
    ExpectedObject = -12,
    /// The operation requires an Array container.
    ExpectedArray = -13,
    /// Object keys must be non-empty.
    ExpectedNonEmptyKey = -14,
    /// The value exists but carries a different kind than requested.
    ValueKindDoesNotMatch = -15,
    /// No entry with the given key exists in the container.
    KeyNotFound = -16,
    /// Array index is not strictly below the array's current length.
    ArrayIndexOutOfBounds = -17,
    /// A string/bytes handle outlived a structural mutation.
    MutatedBuffer = -18,
    /// Internal: the probed hash matched but the key bytes did not.  Never
    /// surfaced to callers; the probe loop retries at the next attempt.
    KeyHashCollision = -19,

    // ── Capacity failures ────────────────────────────────────────────────
    /// The arena has no room for the write (or cannot grow further).
    InsufficientBuffer = -20,

    // ── Decoder failures ─────────────────────────────────────────────────
    /// Expected a property name inside a JSON object.
    ExpectedJsonProperty = -21,
    /// The document root must be a JSON object or array.
    ExpectedJsonArrayOrObject = -22,
    /// Expected a JSON value at this position.
    ExpectedJsonValue = -23,
    /// Nesting exceeded `JSON_NESTING_MAX`.
    JsonNestingDepthExceededMax = -24,
    /// The input ended mid-token (or mid-document on the final block).
    NeedsMoreData = -25,
    /// Bytes other than whitespace follow the completed document.
    TrailingData = -26,

    // ── Nominal / sentinels ──────────────────────────────────────────────
    /// Success.
    None = 0,
    /// Iterator sentinel: the cursor is exhausted.
    IteratorDone = 1,
    /// Iterator sentinel: an item was produced.
    IteratorItem = 2,
    /// Grow sentinel: the arena was reallocated; retry the failed write.
    GrewBuffer = 3,
}

impl Status {
    /// `true` for failure codes (negative discriminants).
    #[inline]
    pub fn is_error(self) -> bool {
        (self as i32) < 0
    }

    /// `true` for `None` (nominal success, not a sentinel).
    #[inline]
    pub fn is_ok(self) -> bool {
        self == Status::None
    }

    /// Stable identifier string, matching the variant name.
    pub fn name(self) -> &'static str {
        match self {
            Status::StartOffsetOutOfBounds => "StartOffsetOutOfBounds",
            Status::NodeOffsetNotAligned => "NodeOffsetNotAligned",
            Status::NodeWalksOffsetOutOfBounds => "NodeWalksOffsetOutOfBounds",
            Status::NodeWalksExceededTreeHeightMax => "NodeWalksExceededTreeHeightMax",
            Status::KeyEntryOutOfBounds => "KeyEntryOutOfBounds",
            Status::KeyTagSizeDoesNotMatch => "KeyTagSizeDoesNotMatch",
            Status::ValueOutOfBounds => "ValueOutOfBounds",
            Status::ValueKindInvalid => "ValueKindInvalid",
            Status::HashProbeLimitReached => "HashProbeLimitReached",
            Status::InvalidIterator => "InvalidIterator",
            Status::ExpectedArrayOrObject => "ExpectedArrayOrObject",
            Status::ExpectedObject => "ExpectedObject",
            Status::ExpectedArray => "ExpectedArray",
            Status::ExpectedNonEmptyKey => "ExpectedNonEmptyKey",
            Status::ValueKindDoesNotMatch => "ValueKindDoesNotMatch",
            Status::KeyNotFound => "KeyNotFound",
            Status::ArrayIndexOutOfBounds => "ArrayIndexOutOfBounds",
            Status::MutatedBuffer => "MutatedBuffer",
            Status::KeyHashCollision => "KeyHashCollision",
            Status::InsufficientBuffer => "InsufficientBuffer",
            Status::ExpectedJsonProperty => "ExpectedJsonProperty",
            Status::ExpectedJsonArrayOrObject => "ExpectedJsonArrayOrObject",
            Status::ExpectedJsonValue => "ExpectedJsonValue",
            Status::JsonNestingDepthExceededMax => "JsonNestingDepthExceededMax",
            Status::NeedsMoreData => "NeedsMoreData",
            Status::TrailingData => "TrailingData",
            Status::None => "None",
            Status::IteratorDone => "IteratorDone",
            Status::IteratorItem => "IteratorItem",
            Status::GrewBuffer => "GrewBuffer",
        }
    }

    /// Fold a `Result` from the rim API back into a raw status.
    #[inline]
    pub fn from_result<T>(r: Result<T, Status>) -> Status {
        match r {
            Ok(_) => Status::None,
            Err(s) => s,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::error::Error for Status {}

#[cfg(test)]
mod tests {
    use super::*;

    /// Polarity: every failure is negative, every sentinel positive, None zero.
    #[test]
    fn polarity() {
        assert!(Status::KeyNotFound.is_error());
        assert!(Status::InsufficientBuffer.is_error());
        assert!(Status::NeedsMoreData.is_error());
        assert!(!Status::None.is_error());
        assert!(!Status::GrewBuffer.is_error());
        assert!((Status::IteratorDone as i32) > 0);
        assert!((Status::IteratorItem as i32) > 0);
        assert!((Status::GrewBuffer as i32) > 0);
        assert_eq!(Status::None as i32, 0);
    }

    /// Discriminants are stable across releases.
    #[test]
    fn discriminant_stability() {
        assert_eq!(Status::StartOffsetOutOfBounds as i32, -1);
        assert_eq!(Status::InvalidIterator as i32, -10);
        assert_eq!(Status::KeyHashCollision as i32, -19);
        assert_eq!(Status::InsufficientBuffer as i32, -20);
        assert_eq!(Status::TrailingData as i32, -26);
        assert_eq!(Status::IteratorDone as i32, 1);
        assert_eq!(Status::IteratorItem as i32, 2);
        assert_eq!(Status::GrewBuffer as i32, 3);
    }

    #[test]
    fn display_matches_name() {
        assert_eq!(Status::KeyNotFound.to_string(), "KeyNotFound");
        assert_eq!(Status::GrewBuffer.to_string(), "GrewBuffer");
    }
}
