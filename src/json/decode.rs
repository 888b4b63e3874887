//! Streaming JSON → Lite³ decoder.
//!
//! A stack machine driving the typed operations layer, one token at a time.
//! The stack is a fixed-capacity frame array — the explicit form of the
//! recursion a one-shot parser would use — because the decoder must be able
//! to stop *between any two tokens*:
//!
//! - **Input underflow.**  When the scanner cannot complete a token the
//!   decoder returns progress (`finished = false`) and resumes later with
//!   the same stack.  A property name that was read from the about-to-be-
//!   recycled input chunk is copied into a decoder-owned pending-key
//!   allocation before yielding.
//! - **Output growth.**  When a setter reports `InsufficientBuffer` against
//!   a growable arena, the decoder grows it and *replays the current token*
//!   — sound because a failed setter makes no observable change.
//!
//! Numbers try `i64` first and fall back to `f64`; strings pass through
//! zero-copy when un-escaped, or materialize through an on-stack staging
//! area (≤ 256 bytes) or the byte pool.

use crate::buffer::GrowableBuf;
use crate::json::scanner::{unescape_into, Scanner, Token};
use crate::json::JSON_NESTING_MAX;
use crate::ops;
use crate::pool::{BytePool, HeapPool};
use crate::status::Status;

/// Frame stack capacity: one container + one switch frame per nesting
/// level, plus the root.
const FRAME_STACK_CAP: usize = JSON_NESTING_MAX * 2 + 1;

/// Escaped strings up to this many raw bytes un-escape through an on-stack
/// buffer; longer ones borrow from the pool.
const STACK_STRING_MAX: usize = 256;

// ─────────────────────────────────────────────────────────────────────────────
// Frames
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameKind {
    /// Inside an Object: expecting a property name or `}`.
    Object,
    /// A property name has been consumed: expecting `:` then its value.
    ObjectSwitch,
    /// Inside an Array: expecting `,` or `]`.
    Array,
    /// About to consume one Array element (or `]` when none yet).
    ArraySwitch,
}

/// Object: 0 = first name or end, 1 = comma or end, 2 = name required.
/// ObjectSwitch: 0 = expecting colon, 1 = expecting value.
/// ArraySwitch: 0 = first element or end, 1 = element required.
#[derive(Debug, Clone, Copy)]
struct Frame {
    kind: FrameKind,
    offset: u32,
    state: u8,
}

const EMPTY_FRAME: Frame = Frame {
    kind: FrameKind::Object,
    offset: 0,
    state: 0,
};

// ─────────────────────────────────────────────────────────────────────────────
// Pending key
// ─────────────────────────────────────────────────────────────────────────────

/// Where the current `ObjectSwitch` frame's property name lives.
#[derive(Debug)]
enum PendingKey {
    None,
    /// Raw, escape-free range into the *current* input chunk.
    Input { start: usize, end: usize },
    /// Decoder-owned bytes (escaped names, or preserved across a
    /// suspension).  Returned to the pool when the value is consumed.
    Owned(Vec<u8>),
}

// ─────────────────────────────────────────────────────────────────────────────
// Output sink
// ─────────────────────────────────────────────────────────────────────────────

/// Destination arena: fixed slice or growable buffer.
trait Sink {
    fn parts(&mut self) -> (&mut [u8], &mut usize);
    /// `GrewBuffer` on success; an error when growth is impossible.
    fn try_grow(&mut self) -> Status;
}

impl Sink for GrowableBuf {
    fn parts(&mut self) -> (&mut [u8], &mut usize) {
        GrowableBuf::parts(self)
    }
    fn try_grow(&mut self) -> Status {
        self.grow()
    }
}

struct FixedSink<'a> {
    buf: &'a mut [u8],
    position: &'a mut usize,
}

impl Sink for FixedSink<'_> {
    fn parts(&mut self) -> (&mut [u8], &mut usize) {
        (self.buf, self.position)
    }
    fn try_grow(&mut self) -> Status {
        Status::InsufficientBuffer
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Progress
// ─────────────────────────────────────────────────────────────────────────────

/// Outcome of one `update` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeProgress {
    /// Bytes of this chunk fully consumed.  On a suspension the driver must
    /// re-present the unconsumed tail (plus fresh bytes) next call.
    pub consumed: usize,
    /// `true` once the document closed; trailing non-whitespace is
    /// `TrailingData`.
    pub finished: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Decoder
// ─────────────────────────────────────────────────────────────────────────────

/// Resumable JSON decoder.  One instance decodes one document; `reset`
/// recycles it.
#[derive(Debug)]
pub struct JsonDecoder {
    frames: [Frame; FRAME_STACK_CAP],
    depth: usize,
    /// Object/Array frames currently open (the JSON nesting depth).
    containers: usize,
    pending: PendingKey,
    started: bool,
}

impl Default for JsonDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonDecoder {
    pub fn new() -> JsonDecoder {
        JsonDecoder {
            frames: [EMPTY_FRAME; FRAME_STACK_CAP],
            depth: 0,
            containers: 0,
            pending: PendingKey::None,
            started: false,
        }
    }

    /// `true` once the document has fully closed.
    pub fn is_finished(&self) -> bool {
        self.started && self.depth == 0
    }

    /// Abandon the document: release the pending key to `pool` and return
    /// to the initial state.  This is the cooperative-cancellation path —
    /// a driver that stops feeding input calls this to unwind.
    pub fn reset(&mut self, pool: &mut dyn BytePool) {
        if let PendingKey::Owned(v) = core::mem::replace(&mut self.pending, PendingKey::None) {
            pool.release(v);
        }
        self.depth = 0;
        self.containers = 0;
        self.started = false;
    }

    /// Feed one chunk into a growable arena (heap-allocating scratch).
    pub fn update(
        &mut self,
        out: &mut GrowableBuf,
        input: &[u8],
        is_final: bool,
    ) -> Result<DecodeProgress, Status> {
        self.update_with_pool(out, input, is_final, &mut HeapPool)
    }

    /// Feed one chunk into a growable arena, borrowing scratch from `pool`.
    pub fn update_with_pool(
        &mut self,
        out: &mut GrowableBuf,
        input: &[u8],
        is_final: bool,
        pool: &mut dyn BytePool,
    ) -> Result<DecodeProgress, Status> {
        self.run(out, input, is_final, pool)
    }

    // ── Core loop ────────────────────────────────────────────────────────

    fn run<S: Sink>(
        &mut self,
        out: &mut S,
        input: &[u8],
        is_final: bool,
        pool: &mut dyn BytePool,
    ) -> Result<DecodeProgress, Status> {
        let mut scanner = Scanner::new(input, is_final);
        let mut consumed = 0usize;
        loop {
            if self.is_finished() {
                if scanner.only_whitespace_left() {
                    return Ok(DecodeProgress {
                        consumed: scanner.cur,
                        finished: true,
                    });
                }
                return Err(Status::TrailingData);
            }
            let tok = match scanner.next() {
                Ok(Some(tok)) => tok,
                Ok(None) => {
                    // Clean end of chunk between tokens.
                    if is_final {
                        return Err(Status::NeedsMoreData);
                    }
                    return self.suspend(input, pool, consumed);
                }
                Err(Status::NeedsMoreData) => {
                    if is_final {
                        return Err(Status::NeedsMoreData);
                    }
                    return self.suspend(input, pool, consumed);
                }
                Err(e) => return Err(e),
            };

            // Dispatch, growing and replaying on arena exhaustion.
            loop {
                match self.dispatch(tok, input, out, pool) {
                    Ok(()) => break,
                    Err(Status::InsufficientBuffer) => match out.try_grow() {
                        Status::GrewBuffer => continue,
                        s if s.is_error() => return Err(s),
                        _ => return Err(Status::InsufficientBuffer),
                    },
                    Err(e) => return Err(e),
                }
            }
            consumed = scanner.cur;
        }
    }

    /// Yield at an input-underflow boundary, preserving the pending key if
    /// it references the chunk the driver is about to recycle.
    fn suspend(
        &mut self,
        input: &[u8],
        pool: &mut dyn BytePool,
        consumed: usize,
    ) -> Result<DecodeProgress, Status> {
        if let PendingKey::Input { start, end } = self.pending {
            let mut owned = pool.acquire(end - start);
            owned.extend_from_slice(&input[start..end]);
            self.pending = PendingKey::Owned(owned);
        }
        #[cfg(feature = "logging")]
        log::trace!(
            "lite3: decoder suspended at depth {} ({} bytes consumed)",
            self.containers,
            consumed
        );
        Ok(DecodeProgress {
            consumed,
            finished: false,
        })
    }

    // ── Frame helpers ────────────────────────────────────────────────────

    fn top(&self) -> Option<Frame> {
        self.depth.checked_sub(1).map(|i| self.frames[i])
    }

    fn set_top_state(&mut self, state: u8) {
        self.frames[self.depth - 1].state = state;
    }

    fn push(&mut self, frame: Frame) -> Result<(), Status> {
        if self.depth == FRAME_STACK_CAP {
            return Err(Status::JsonNestingDepthExceededMax);
        }
        if matches!(frame.kind, FrameKind::Object | FrameKind::Array) {
            if self.containers == JSON_NESTING_MAX {
                return Err(Status::JsonNestingDepthExceededMax);
            }
            self.containers += 1;
        }
        self.frames[self.depth] = frame;
        self.depth += 1;
        Ok(())
    }

    fn pop(&mut self) {
        self.depth -= 1;
        if matches!(
            self.frames[self.depth].kind,
            FrameKind::Object | FrameKind::Array
        ) {
            self.containers -= 1;
        }
    }

    fn release_pending(&mut self, pool: &mut dyn BytePool) {
        if let PendingKey::Owned(v) = core::mem::replace(&mut self.pending, PendingKey::None) {
            pool.release(v);
        }
    }

    // ── Token dispatch ───────────────────────────────────────────────────

    fn dispatch<S: Sink>(
        &mut self,
        tok: Token,
        input: &[u8],
        out: &mut S,
        pool: &mut dyn BytePool,
    ) -> Result<(), Status> {
        let Some(top) = self.top() else {
            return self.dispatch_root(tok, out);
        };
        match top.kind {
            FrameKind::Object => self.dispatch_in_object(tok, input, top, pool),
            FrameKind::ObjectSwitch => self.dispatch_property_value(tok, input, top, out, pool),
            FrameKind::Array => self.dispatch_after_element(tok, top),
            FrameKind::ArraySwitch => self.dispatch_element(tok, input, top, out, pool),
        }
    }

    /// First token of the document: the root must be a container.
    fn dispatch_root<S: Sink>(&mut self, tok: Token, out: &mut S) -> Result<(), Status> {
        match tok {
            Token::BeginObject => {
                let (buf, pos) = out.parts();
                ops::init_object(buf, pos)?;
                self.started = true;
                self.push(Frame {
                    kind: FrameKind::Object,
                    offset: 0,
                    state: 0,
                })
            }
            Token::BeginArray => {
                let (buf, pos) = out.parts();
                ops::init_array(buf, pos)?;
                self.started = true;
                self.push(Frame {
                    kind: FrameKind::Array,
                    offset: 0,
                    state: 1,
                })?;
                self.push(Frame {
                    kind: FrameKind::ArraySwitch,
                    offset: 0,
                    state: 0,
                })
            }
            _ => Err(Status::ExpectedJsonArrayOrObject),
        }
    }

    /// Inside an Object, between members.
    fn dispatch_in_object(
        &mut self,
        tok: Token,
        input: &[u8],
        top: Frame,
        pool: &mut dyn BytePool,
    ) -> Result<(), Status> {
        match (top.state, tok) {
            (0 | 2, Token::Str { start, end, has_escapes }) => {
                self.take_property_name(input, start, end, has_escapes, pool)?;
                self.push(Frame {
                    kind: FrameKind::ObjectSwitch,
                    offset: top.offset,
                    state: 0,
                })
            }
            (0 | 1, Token::EndObject) => {
                self.pop();
                Ok(())
            }
            (1, Token::Comma) => {
                self.set_top_state(2);
                Ok(())
            }
            _ => Err(Status::ExpectedJsonProperty),
        }
    }

    /// Stash a property name: zero-copy range when escape-free, otherwise
    /// un-escaped into pool scratch right away.
    fn take_property_name(
        &mut self,
        input: &[u8],
        start: usize,
        end: usize,
        has_escapes: bool,
        pool: &mut dyn BytePool,
    ) -> Result<(), Status> {
        if !has_escapes {
            self.pending = PendingKey::Input { start, end };
            return Ok(());
        }
        let raw = &input[start..end];
        let mut owned = pool.acquire(raw.len());
        owned.resize(raw.len(), 0);
        match unescape_into(raw, &mut owned) {
            Ok(n) => {
                owned.truncate(n);
                self.pending = PendingKey::Owned(owned);
                Ok(())
            }
            Err(e) => {
                pool.release(owned);
                Err(e)
            }
        }
    }

    /// After a property name: the colon, then the value.
    fn dispatch_property_value<S: Sink>(
        &mut self,
        tok: Token,
        input: &[u8],
        top: Frame,
        out: &mut S,
        pool: &mut dyn BytePool,
    ) -> Result<(), Status> {
        if top.state == 0 {
            return match tok {
                Token::Colon => {
                    self.set_top_state(1);
                    Ok(())
                }
                _ => Err(Status::ExpectedJsonValue),
            };
        }

        let container = top.offset as usize;
        let mut child: Option<(FrameKind, usize)> = None;
        {
            let key_bytes: &[u8] = match &self.pending {
                PendingKey::Input { start, end } => &input[*start..*end],
                PendingKey::Owned(v) => v,
                PendingKey::None => return Err(Status::ExpectedJsonProperty),
            };
            let key =
                core::str::from_utf8(key_bytes).map_err(|_| Status::ExpectedJsonProperty)?;
            let (buf, pos) = out.parts();
            match tok {
                Token::Null => ops::set_null(buf, pos, container, key)?,
                Token::True => ops::set_bool(buf, pos, container, key, true)?,
                Token::False => ops::set_bool(buf, pos, container, key, false)?,
                Token::Number { start, end } => match parse_number(&input[start..end])? {
                    NumberVal::I(v) => ops::set_i64(buf, pos, container, key, v)?,
                    NumberVal::F(v) => ops::set_f64(buf, pos, container, key, v)?,
                },
                Token::Str {
                    start,
                    end,
                    has_escapes,
                } => {
                    with_string_value(input, start, end, has_escapes, pool, |s| {
                        ops::set_string(buf, pos, container, key, s)
                    })??;
                }
                Token::BeginObject => {
                    if self.containers == JSON_NESTING_MAX {
                        return Err(Status::JsonNestingDepthExceededMax);
                    }
                    child = Some((FrameKind::Object, ops::set_object(buf, pos, container, key)?));
                }
                Token::BeginArray => {
                    if self.containers == JSON_NESTING_MAX {
                        return Err(Status::JsonNestingDepthExceededMax);
                    }
                    child = Some((FrameKind::Array, ops::set_array(buf, pos, container, key)?));
                }
                _ => return Err(Status::ExpectedJsonValue),
            }
        }

        // The value landed: retire the key, close the switch frame, and
        // mark the parent object as having a member.
        self.release_pending(pool);
        self.pop();
        self.set_top_state(1);
        self.push_child(child)
    }

    /// One Array element (or the end of an empty array).
    fn dispatch_element<S: Sink>(
        &mut self,
        tok: Token,
        input: &[u8],
        top: Frame,
        out: &mut S,
        pool: &mut dyn BytePool,
    ) -> Result<(), Status> {
        let container = top.offset as usize;
        let mut child: Option<(FrameKind, usize)> = None;
        {
            let (buf, pos) = out.parts();
            match tok {
                Token::Null => ops::array_append_null(buf, pos, container)?,
                Token::True => ops::array_append_bool(buf, pos, container, true)?,
                Token::False => ops::array_append_bool(buf, pos, container, false)?,
                Token::Number { start, end } => match parse_number(&input[start..end])? {
                    NumberVal::I(v) => ops::array_append_i64(buf, pos, container, v)?,
                    NumberVal::F(v) => ops::array_append_f64(buf, pos, container, v)?,
                },
                Token::Str {
                    start,
                    end,
                    has_escapes,
                } => {
                    with_string_value(input, start, end, has_escapes, pool, |s| {
                        ops::array_append_string(buf, pos, container, s)
                    })??;
                }
                Token::BeginObject => {
                    if self.containers == JSON_NESTING_MAX {
                        return Err(Status::JsonNestingDepthExceededMax);
                    }
                    child = Some((FrameKind::Object, ops::array_append_object(buf, pos, container)?));
                }
                Token::BeginArray => {
                    if self.containers == JSON_NESTING_MAX {
                        return Err(Status::JsonNestingDepthExceededMax);
                    }
                    child = Some((FrameKind::Array, ops::array_append_array(buf, pos, container)?));
                }
                Token::EndArray => {
                    if top.state != 0 {
                        // "[1,]" — a comma promised another element.
                        return Err(Status::ExpectedJsonValue);
                    }
                    self.pop(); // the switch
                    self.pop(); // the array itself
                    return Ok(());
                }
                _ => return Err(Status::ExpectedJsonValue),
            }
        }
        self.pop();
        self.push_child(child)
    }

    /// Inside an Array, after an element.
    fn dispatch_after_element(&mut self, tok: Token, top: Frame) -> Result<(), Status> {
        match tok {
            Token::Comma => self.push(Frame {
                kind: FrameKind::ArraySwitch,
                offset: top.offset,
                state: 1,
            }),
            Token::EndArray => {
                self.pop();
                Ok(())
            }
            _ => Err(Status::ExpectedJsonValue),
        }
    }

    /// Enter a freshly created child container.
    fn push_child(&mut self, child: Option<(FrameKind, usize)>) -> Result<(), Status> {
        match child {
            None => Ok(()),
            Some((FrameKind::Object, offset)) => self.push(Frame {
                kind: FrameKind::Object,
                offset: offset as u32,
                state: 0,
            }),
            Some((_, offset)) => {
                self.push(Frame {
                    kind: FrameKind::Array,
                    offset: offset as u32,
                    state: 1,
                })?;
                self.push(Frame {
                    kind: FrameKind::ArraySwitch,
                    offset: offset as u32,
                    state: 0,
                })
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Scalars
// ─────────────────────────────────────────────────────────────────────────────

enum NumberVal {
    I(i64),
    F(f64),
}

/// `i64` when the syntax is integral and it fits; `f64` otherwise.
fn parse_number(bytes: &[u8]) -> Result<NumberVal, Status> {
    // The scanner validated the grammar; this cannot fail on UTF-8.
    let text = core::str::from_utf8(bytes).map_err(|_| Status::ExpectedJsonValue)?;
    let integral = !bytes.iter().any(|&b| matches!(b, b'.' | b'e' | b'E'));
    if integral {
        if let Ok(v) = text.parse::<i64>() {
            return Ok(NumberVal::I(v));
        }
    }
    text.parse::<f64>()
        .map(NumberVal::F)
        .map_err(|_| Status::ExpectedJsonValue)
}

/// Hand `f` the decoded string value: zero-copy when possible, staged
/// through the stack or the pool when escaped.
fn with_string_value<R>(
    input: &[u8],
    start: usize,
    end: usize,
    has_escapes: bool,
    pool: &mut dyn BytePool,
    f: impl FnOnce(&str) -> R,
) -> Result<R, Status> {
    let raw = &input[start..end];
    if !has_escapes {
        let s = core::str::from_utf8(raw).map_err(|_| Status::ExpectedJsonValue)?;
        return Ok(f(s));
    }
    if raw.len() <= STACK_STRING_MAX {
        let mut stack = [0u8; STACK_STRING_MAX];
        let n = unescape_into(raw, &mut stack)?;
        let s = core::str::from_utf8(&stack[..n]).map_err(|_| Status::ExpectedJsonValue)?;
        return Ok(f(s));
    }
    let mut scratch = pool.acquire(raw.len());
    scratch.resize(raw.len(), 0);
    let result = (|| {
        let n = unescape_into(raw, &mut scratch)?;
        let s = core::str::from_utf8(&scratch[..n]).map_err(|_| Status::ExpectedJsonValue)?;
        Ok(f(s))
    })();
    pool.release(scratch);
    result
}

// ─────────────────────────────────────────────────────────────────────────────
// One-shot entry points
// ─────────────────────────────────────────────────────────────────────────────

/// Decode a complete JSON document into a fixed arena.
///
/// `InsufficientBuffer` when it does not fit — retry with a larger slice.
pub fn decode_value(buf: &mut [u8], position: &mut usize, input: &[u8]) -> Result<(), Status> {
    let mut decoder = JsonDecoder::new();
    let mut sink = FixedSink { buf, position };
    let progress = decoder.run(&mut sink, input, true, &mut HeapPool)?;
    debug_assert!(progress.finished);
    Ok(())
}

/// Decode a complete JSON document into a fresh growable arena.
pub fn decode_to_buf(input: &[u8]) -> Result<GrowableBuf, Status> {
    let mut out = GrowableBuf::with_capacity(crate::buffer::BUF_SIZE_MIN);
    let mut decoder = JsonDecoder::new();
    decoder.update(&mut out, input, true)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops;

    #[test]
    fn scalar_object() {
        let b = decode_to_buf(br#"{"a": 1, "b": true, "c": null, "d": "x", "e": 2.5}"#).unwrap();
        let (buf, pos) = (b.bytes(), b.position());
        assert_eq!(ops::get_i64(buf, pos, 0, "a").unwrap(), 1);
        assert!(ops::get_bool(buf, pos, 0, "b").unwrap());
        assert!(ops::is_null(buf, pos, 0, "c").unwrap());
        assert_eq!(
            ops::get_string(buf, pos, 0, "d").unwrap().resolve(buf).unwrap(),
            "x"
        );
        assert_eq!(ops::get_f64(buf, pos, 0, "e").unwrap(), 2.5);
        assert_eq!(ops::count(buf, pos, 0).unwrap(), 5);
    }

    #[test]
    fn nested_structure() {
        let b = decode_to_buf(br#"{"rows": [{"id": 1}, {"id": 2}], "meta": {"n": 2}}"#).unwrap();
        let (buf, pos) = (b.bytes(), b.position());
        let rows = ops::get_array(buf, pos, 0, "rows").unwrap();
        assert_eq!(ops::count(buf, pos, rows).unwrap(), 2);
        let row1 = ops::array_get_object(buf, pos, rows, 1).unwrap();
        assert_eq!(ops::get_i64(buf, pos, row1, "id").unwrap(), 2);
        let meta = ops::get_object(buf, pos, 0, "meta").unwrap();
        assert_eq!(ops::get_i64(buf, pos, meta, "n").unwrap(), 2);
    }

    #[test]
    fn number_fallback_to_f64() {
        let b = decode_to_buf(br#"{"big": 99999999999999999999, "exp": 1e3}"#).unwrap();
        let (buf, pos) = (b.bytes(), b.position());
        assert_eq!(ops::get_f64(buf, pos, 0, "big").unwrap(), 1e20);
        assert_eq!(ops::get_f64(buf, pos, 0, "exp").unwrap(), 1000.0);
    }

    #[test]
    fn escaped_keys_and_values() {
        let b = decode_to_buf(br#"{"ke\ny": "va\tlA"}"#).unwrap();
        let (buf, pos) = (b.bytes(), b.position());
        let h = ops::get_string(buf, pos, 0, "ke\ny").unwrap();
        assert_eq!(h.resolve(buf).unwrap(), "va\tlA");
    }

    #[test]
    fn root_must_be_container() {
        assert_eq!(
            decode_to_buf(b"42").unwrap_err(),
            Status::ExpectedJsonArrayOrObject
        );
        assert_eq!(
            decode_to_buf(br#""str""#).unwrap_err(),
            Status::ExpectedJsonArrayOrObject
        );
    }

    #[test]
    fn malformed_documents() {
        assert_eq!(
            decode_to_buf(br#"{"a" 1}"#).unwrap_err(),
            Status::ExpectedJsonValue
        );
        assert_eq!(
            decode_to_buf(br#"{"a": 1,}"#).unwrap_err(),
            Status::ExpectedJsonProperty
        );
        assert_eq!(
            decode_to_buf(br#"[1,]"#).unwrap_err(),
            Status::ExpectedJsonValue
        );
        assert_eq!(
            decode_to_buf(br#"{"a": }"#).unwrap_err(),
            Status::ExpectedJsonValue
        );
        assert_eq!(decode_to_buf(b"[1] x").unwrap_err(), Status::TrailingData);
        assert_eq!(decode_to_buf(b"[1, 2").unwrap_err(), Status::NeedsMoreData);
    }

    #[test]
    fn deep_nesting_capped() {
        let mut doc = Vec::new();
        doc.extend_from_slice(&vec![b'['; JSON_NESTING_MAX + 1]);
        doc.extend_from_slice(&vec![b']'; JSON_NESTING_MAX + 1]);
        assert_eq!(
            decode_to_buf(&doc).unwrap_err(),
            Status::JsonNestingDepthExceededMax
        );
        // Exactly at the cap is fine.
        let mut ok = Vec::new();
        ok.extend_from_slice(&vec![b'['; JSON_NESTING_MAX]);
        ok.extend_from_slice(&vec![b']'; JSON_NESTING_MAX]);
        decode_to_buf(&ok).unwrap();
    }

    #[test]
    fn empty_containers() {
        let b = decode_to_buf(b"{}").unwrap();
        assert_eq!(ops::count(b.bytes(), b.position(), 0).unwrap(), 0);
        let b = decode_to_buf(b"[]").unwrap();
        assert_eq!(ops::count(b.bytes(), b.position(), 0).unwrap(), 0);
    }

    #[test]
    fn fixed_buffer_reports_exhaustion() {
        let mut buf = vec![0u8; 128];
        let mut pos = 0;
        let err = decode_value(&mut buf, &mut pos, br#"{"k": "0123456789012345678901234567890123456789"}"#)
            .unwrap_err();
        assert_eq!(err, Status::InsufficientBuffer);
    }

    #[test]
    fn chunked_streaming_resumes() {
        let doc = br#"{"name": "osmium", "z": 76, "stable": true}"#;
        let mut out = GrowableBuf::with_capacity(0);
        let mut dec = JsonDecoder::new();
        let mut pending: Vec<u8> = Vec::new();
        for chunk in doc.chunks(7) {
            pending.extend_from_slice(chunk);
            let p = dec.update(&mut out, &pending, false).unwrap();
            pending.drain(..p.consumed);
        }
        let p = dec.update(&mut out, &pending, true).unwrap();
        assert!(p.finished);
        let (buf, pos) = (out.bytes(), out.position());
        assert_eq!(ops::get_i64(buf, pos, 0, "z").unwrap(), 76);
        assert_eq!(
            ops::get_string(buf, pos, 0, "name").unwrap().resolve(buf).unwrap(),
            "osmium"
        );
    }
}
