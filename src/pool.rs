//! Byte-pool collaborator for scratch allocations.
//!
//! The decoder needs short-lived byte scratch in two places: materializing an
//! escaped JSON string that exceeds the on-stack staging area, and preserving
//! a pending property name across an input-underflow suspension.  The pool is
//! a collaborator passed in by the caller, never owned state, so hosts with
//! an array-pool infrastructure can plug it in; everyone else gets plain heap
//! allocations from [`HeapPool`].
//!
//! Every `acquire` has a paired `release` on every exit path of the decoder,
//! including error unwind, so pooled implementations see balanced traffic.

/// Supplier of reusable byte scratch.
pub trait BytePool {
    /// Hand out a cleared buffer with at least `min_len` capacity.
    fn acquire(&mut self, min_len: usize) -> Vec<u8>;

    /// Take a buffer back.  Implementations may retain or drop it.
    fn release(&mut self, buf: Vec<u8>);
}

/// Default pool: allocate from the heap, drop on release.
#[derive(Debug, Default, Clone)]
pub struct HeapPool;

impl BytePool for HeapPool {
    fn acquire(&mut self, min_len: usize) -> Vec<u8> {
        Vec::with_capacity(min_len)
    }

    fn release(&mut self, _buf: Vec<u8>) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heap_pool_hands_out_capacity() {
        let mut pool = HeapPool;
        let buf = pool.acquire(300);
        assert!(buf.capacity() >= 300);
        assert!(buf.is_empty());
        pool.release(buf);
    }

    /// A counting pool must see balanced acquire/release traffic from any
    /// user; this just pins down the trait contract shape.
    #[test]
    fn custom_pool_balance() {
        struct Counting {
            out: usize,
        }
        impl BytePool for Counting {
            fn acquire(&mut self, min_len: usize) -> Vec<u8> {
                self.out += 1;
                Vec::with_capacity(min_len)
            }
            fn release(&mut self, _buf: Vec<u8>) {
                self.out -= 1;
            }
        }
        let mut pool = Counting { out: 0 };
        let a = pool.acquire(16);
        let b = pool.acquire(16);
        pool.release(a);
        pool.release(b);
        assert_eq!(pool.out, 0);
    }
}
