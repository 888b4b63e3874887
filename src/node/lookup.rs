//! Ordered descent and key location.
//!
//! Lookup walks the embedded B-tree from a container's top node: at each
//! node a linear scan over the ascending hash array either hits the probed
//! hash, descends into the child responsible for the gap, or — at a leaf —
//! proves the hash absent.  A hash hit is only a *candidate*: the key bytes
//! must match too, otherwise the probe loop retries with the next quadratic
//! displacement.
//!
//! Every step is validated: node offsets must be aligned and inside the
//! live region, and descent depth is capped at `TREE_HEIGHT_MAX` — an
//! overshoot means the arena is corrupt, not that the tree is tall.

use crate::buffer::{HASH_PROBE_MAX, NODE_ALIGN, NODE_SIZE, TREE_HEIGHT_MAX};
use crate::node::hash::probe_hash;
use crate::node::layout::{
    entry_key_bytes, entry_value_offset, node_child, node_hash, node_is_leaf, node_key_count,
    node_tag, value_total_size, ValueKind,
};
use crate::status::Status;

// ─────────────────────────────────────────────────────────────────────────────
// Node validation
// ─────────────────────────────────────────────────────────────────────────────

/// Check that `off` is a plausible node inside `[0, limit)`.
#[inline]
pub(crate) fn check_node(limit: usize, off: usize) -> Result<(), Status> {
    if off % NODE_ALIGN != 0 {
        return Err(Status::NodeOffsetNotAligned);
    }
    if off + NODE_SIZE > limit {
        return Err(Status::NodeWalksOffsetOutOfBounds);
    }
    Ok(())
}

/// Validate a container start offset and type before any operation.
///
/// `expected = None` accepts either container kind; otherwise the tag must
/// match exactly (`ExpectedObject` / `ExpectedArray` on mismatch).
pub(crate) fn validate_container(
    buf: &[u8],
    limit: usize,
    start: usize,
    expected: Option<ValueKind>,
) -> Result<ValueKind, Status> {
    if start % NODE_ALIGN != 0 {
        return Err(Status::NodeOffsetNotAligned);
    }
    if start + NODE_SIZE > limit {
        return Err(Status::StartOffsetOutOfBounds);
    }
    let kind = ValueKind::from_tag(node_tag(buf, start)).map_err(|_| Status::ExpectedArrayOrObject)?;
    if !kind.is_container() {
        return Err(Status::ExpectedArrayOrObject);
    }
    match expected {
        Some(ValueKind::Object) if kind != ValueKind::Object => Err(Status::ExpectedObject),
        Some(ValueKind::Array) if kind != ValueKind::Array => Err(Status::ExpectedArray),
        _ => Ok(kind),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Single-hash walk
// ─────────────────────────────────────────────────────────────────────────────

/// Outcome of walking one effective hash down the tree.
#[derive(Debug)]
pub(crate) enum Walk {
    /// The hash exists: node, slot, and the entry offset it points at.
    Hit {
        node: usize,
        slot: usize,
        kv: usize,
    },
    /// A leaf proved the hash absent.
    Miss,
}

/// Descend from `start` looking for effective hash `h`.
pub(crate) fn walk(buf: &[u8], limit: usize, start: usize, h: u32) -> Result<Walk, Status> {
    let mut node = start;
    let mut descents = 0usize;
    loop {
        check_node(limit, node)?;
        let kc = node_key_count(buf, node);
        let mut slot = kc;
        for i in 0..kc {
            let hi = node_hash(buf, node, i);
            if hi >= h {
                if hi == h {
                    return Ok(Walk::Hit {
                        node,
                        slot: i,
                        kv: crate::node::layout::node_kv(buf, node, i),
                    });
                }
                slot = i;
                break;
            }
        }
        if node_is_leaf(buf, node) {
            return Ok(Walk::Miss);
        }
        descents += 1;
        if descents > TREE_HEIGHT_MAX {
            return Err(Status::NodeWalksExceededTreeHeightMax);
        }
        node = node_child(buf, node, slot);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Probed find
// ─────────────────────────────────────────────────────────────────────────────

/// A located entry: which node slot owns it and where its value begins.
#[derive(Debug)]
pub(crate) struct Found {
    pub node: usize,
    pub slot: usize,
    pub kv: usize,
    pub value: usize,
}

/// Compare stored key bytes (which carry a trailing NUL) against a probe
/// key (which does not).
#[inline]
pub(crate) fn key_matches(stored: &[u8], probe: &[u8]) -> bool {
    stored.len() == probe.len() + 1
        && &stored[..probe.len()] == probe
        && stored[probe.len()] == 0
}

/// Locate `key` (or, for arrays, the literal `base` index) under `start`.
///
/// `key` is the UTF-8 bytes *without* the trailing NUL for keyed
/// containers, `None` for arrays — an array hash hit needs no byte
/// comparison because the hash *is* the identity.
///
/// The returned entry's value has been bounds-verified.
pub(crate) fn find(
    buf: &[u8],
    limit: usize,
    start: usize,
    key: Option<&[u8]>,
    base: u32,
) -> Result<Found, Status> {
    let attempts = if key.is_some() { HASH_PROBE_MAX } else { 1 };
    for attempt in 0..attempts {
        let h = probe_hash(base, attempt);
        match walk(buf, limit, start, h)? {
            Walk::Miss => return Err(Status::KeyNotFound),
            Walk::Hit { node, slot, kv } => {
                if let Some(key_bytes) = key {
                    let stored = entry_key_bytes(buf, limit, kv)?;
                    if !key_matches(stored, key_bytes) {
                        // Same hash, different key: quadratic re-probe.
                        continue;
                    }
                }
                let value = entry_value_offset(buf, limit, kv, key.is_some())?;
                value_total_size(buf, limit, value)?;
                return Ok(Found {
                    node,
                    slot,
                    kv,
                    value,
                });
            }
        }
    }
    Err(Status::HashProbeLimitReached)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{write_u32, NODE_SIZE};
    use crate::node::layout::{init_node, set_node_child, set_node_key_count};

    #[test]
    fn check_node_rejects_misalignment_and_overrun() {
        assert_eq!(check_node(1024, 98).unwrap_err(), Status::NodeOffsetNotAligned);
        assert_eq!(
            check_node(100, 96).unwrap_err(),
            Status::NodeWalksOffsetOutOfBounds
        );
        assert!(check_node(192, 96).is_ok());
    }

    #[test]
    fn validate_container_types() {
        let mut buf = vec![0u8; 256];
        init_node(&mut buf, 0, ValueKind::Object, 0);
        assert_eq!(
            validate_container(&buf, 256, 0, None).unwrap(),
            ValueKind::Object
        );
        assert_eq!(
            validate_container(&buf, 256, 0, Some(ValueKind::Array)).unwrap_err(),
            Status::ExpectedArray
        );
        // A scalar tag where a node is expected.
        buf[96] = ValueKind::I64 as u8;
        assert_eq!(
            validate_container(&buf, 256, 96, None).unwrap_err(),
            Status::ExpectedArrayOrObject
        );
        // Invalid tag.
        buf[96] = 11;
        assert_eq!(
            validate_container(&buf, 256, 96, None).unwrap_err(),
            Status::ExpectedArrayOrObject
        );
    }

    /// A self-referential child pointer must trip the height cap, not spin.
    #[test]
    fn walk_cycle_hits_height_cap() {
        let mut buf = vec![0u8; 256];
        init_node(&mut buf, 96, ValueKind::Object, 0);
        set_node_key_count(&mut buf, 96, 1);
        write_u32(&mut buf, 96 + 4, 500); // hash slot 0
        set_node_child(&mut buf, 96, 0, 96); // child 0 -> itself
        let err = walk(&buf, 96 + NODE_SIZE, 96, 100).unwrap_err();
        assert_eq!(err, Status::NodeWalksExceededTreeHeightMax);
    }
}
