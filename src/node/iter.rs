//! In-order traversal cursor.
//!
//! A read-only depth-first walk over one container's tree, emitting entries
//! in ascending hash order.  The cursor is a pair of fixed stacks (node
//! offsets and per-node key indices) bounded by `TREE_HEIGHT_MAX` — no
//! allocation, no recursion.
//!
//! The cursor records the generation it was created under and refuses to
//! advance after any structural mutation (`InvalidIterator`): the node
//! offsets it holds may point anywhere after a split.

use crate::buffer::{generation, TREE_HEIGHT_MAX};
use crate::node::layout::{
    entry_value_offset, node_child, node_hash, node_is_leaf, node_key_count, node_kv,
    value_total_size, ValueKind,
};
use crate::node::lookup::{check_node, validate_container};
use crate::status::Status;

/// Stack capacity: the deepest possible descent, top node included.
const STACK_CAP: usize = TREE_HEIGHT_MAX + 1;

// ─────────────────────────────────────────────────────────────────────────────
// Cursor
// ─────────────────────────────────────────────────────────────────────────────

/// One emitted entry.
#[derive(Debug, Clone, Copy)]
pub struct IterEntry {
    /// Effective hash stored in the slot (element index for arrays).
    pub hash: u32,
    /// Entry offset (key tag for objects, value for arrays).
    pub kv: usize,
    /// Value offset, bounds-verified.
    pub value: usize,
    /// Value kind tag.
    pub kind: ValueKind,
}

/// Depth-first in-order cursor over a container.
#[derive(Debug, Clone)]
pub struct Cursor {
    gen: u32,
    keyed: bool,
    /// Current stack depth; -1 once exhausted.
    depth: isize,
    nodes: [u32; STACK_CAP],
    /// Next key index to emit at each level.
    index: [u8; STACK_CAP],
}

impl Cursor {
    /// Open a cursor over the container at `start`.
    pub(crate) fn open(buf: &[u8], limit: usize, start: usize) -> Result<Cursor, Status> {
        let kind = validate_container(buf, limit, start, None)?;
        let mut cur = Cursor {
            gen: generation(buf),
            keyed: kind == ValueKind::Object,
            depth: 0,
            nodes: [0; STACK_CAP],
            index: [0; STACK_CAP],
        };
        cur.nodes[0] = start as u32;
        cur.descend_leftmost(buf, limit)?;
        Ok(cur)
    }

    /// `true` when this cursor walks an Object (entries carry keys).
    pub fn keyed(&self) -> bool {
        self.keyed
    }

    /// Push the leftmost chain under the current node.
    fn descend_leftmost(&mut self, buf: &[u8], limit: usize) -> Result<(), Status> {
        loop {
            let node = self.nodes[self.depth as usize] as usize;
            check_node(limit, node)?;
            if node_is_leaf(buf, node) {
                return Ok(());
            }
            let idx = self.index[self.depth as usize] as usize;
            if self.depth as usize + 1 >= STACK_CAP {
                return Err(Status::NodeWalksExceededTreeHeightMax);
            }
            self.depth += 1;
            self.nodes[self.depth as usize] = node_child(buf, node, idx) as u32;
            self.index[self.depth as usize] = 0;
        }
    }

    /// Advance; `IteratorItem` with `out` filled, or `IteratorDone`.
    ///
    /// Raw-status form used by the engine; the ops layer wraps this in
    /// `Result<Option<IterEntry>>`.
    pub(crate) fn next_entry(
        &mut self,
        buf: &[u8],
        limit: usize,
        out: &mut IterEntry,
    ) -> Status {
        if self.gen != generation(buf) {
            return Status::InvalidIterator;
        }
        loop {
            if self.depth < 0 {
                return Status::IteratorDone;
            }
            let node = self.nodes[self.depth as usize] as usize;
            let i = self.index[self.depth as usize] as usize;
            let kc = node_key_count(buf, node);
            if i >= kc {
                // Subtree exhausted; resurface.
                self.depth -= 1;
                continue;
            }

            let kv = node_kv(buf, node, i);
            let value = match entry_value_offset(buf, limit, kv, self.keyed) {
                Ok(v) => v,
                Err(s) => return s,
            };
            if let Err(s) = value_total_size(buf, limit, value) {
                return s;
            }
            out.hash = node_hash(buf, node, i);
            out.kv = kv;
            out.value = value;
            out.kind = match ValueKind::from_tag(buf[value]) {
                Ok(k) => k,
                Err(s) => return s,
            };
            self.index[self.depth as usize] = (i + 1) as u8;

            if !node_is_leaf(buf, node) {
                // Between key i and key i+1 lies child i+1's subtree.
                if self.depth as usize + 1 >= STACK_CAP {
                    return Status::NodeWalksExceededTreeHeightMax;
                }
                self.depth += 1;
                self.nodes[self.depth as usize] = node_child(buf, node, i + 1) as u32;
                self.index[self.depth as usize] = 0;
                if let Err(s) = self.descend_leftmost(buf, limit) {
                    return s;
                }
            }
            return Status::IteratorItem;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{bump_generation, NODE_SIZE};
    use crate::node::hash::djb2;
    use crate::node::insert::{insert, NewValue};
    use crate::node::layout::init_node;

    fn build_object(keys: &[&str]) -> (Vec<u8>, usize) {
        let mut buf = vec![0u8; 16 * 1024];
        init_node(&mut buf, 0, ValueKind::Object, 0);
        bump_generation(&mut buf);
        let mut pos = NODE_SIZE;
        for (i, k) in keys.iter().enumerate() {
            insert(
                &mut buf,
                &mut pos,
                0,
                Some(k.as_bytes()),
                djb2(k.as_bytes()),
                NewValue::I64(i as i64),
            )
            .unwrap();
        }
        (buf, pos)
    }

    fn drain(buf: &[u8], limit: usize) -> Vec<u32> {
        let mut cur = Cursor::open(buf, limit, 0).unwrap();
        let mut out = IterEntry {
            hash: 0,
            kv: 0,
            value: 0,
            kind: ValueKind::Null,
        };
        let mut hashes = Vec::new();
        loop {
            match cur.next_entry(buf, limit, &mut out) {
                Status::IteratorItem => hashes.push(out.hash),
                Status::IteratorDone => return hashes,
                s => panic!("unexpected status {s}"),
            }
        }
    }

    #[test]
    fn iterates_in_ascending_hash_order() {
        let keys: Vec<String> = (0..30).map(|i| format!("k{:02}", i)).collect();
        let refs: Vec<&str> = keys.iter().map(|s| s.as_str()).collect();
        let (buf, pos) = build_object(&refs);
        let hashes = drain(&buf, pos);
        assert_eq!(hashes.len(), 30);
        for w in hashes.windows(2) {
            assert!(w[0] < w[1], "iteration must be hash-ordered");
        }
    }

    #[test]
    fn empty_container_yields_done() {
        let mut buf = vec![0u8; 256];
        init_node(&mut buf, 0, ValueKind::Array, 0);
        let mut cur = Cursor::open(&buf, NODE_SIZE, 0).unwrap();
        let mut out = IterEntry {
            hash: 0,
            kv: 0,
            value: 0,
            kind: ValueKind::Null,
        };
        assert_eq!(cur.next_entry(&buf, NODE_SIZE, &mut out), Status::IteratorDone);
    }

    #[test]
    fn mutation_invalidates_cursor() {
        let (mut buf, mut pos) = build_object(&["a", "b"]);
        let mut cur = Cursor::open(&buf, pos, 0).unwrap();
        insert(&mut buf, &mut pos, 0, Some(b"c"), djb2(b"c"), NewValue::Null).unwrap();
        let mut out = IterEntry {
            hash: 0,
            kv: 0,
            value: 0,
            kind: ValueKind::Null,
        };
        assert_eq!(cur.next_entry(&buf, pos, &mut out), Status::InvalidIterator);
    }
}
