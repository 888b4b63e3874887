//! Key hashing and collision probing.
//!
//! Keys hash with DJB2 over the UTF-8 bytes *excluding* the trailing NUL.
//! Collisions are resolved by quadratic probing: attempt `a` looks up the
//! effective hash `base + a²` (wrapping u32).  Because the format has no
//! delete operation, probe chains never develop holes — a missing effective
//! hash proves the key is absent, so lookups stop at the first empty attempt.
//!
//! Array elements use the element index as their "hash" and probe exactly
//! once.

/// DJB2 over `key` (no trailing NUL): `h = 5381; h = h·33 + b`.
#[inline]
pub fn djb2(key: &[u8]) -> u32 {
    let mut h: u32 = 5381;
    for &b in key {
        h = h.wrapping_mul(33).wrapping_add(b as u32);
    }
    h
}

/// Effective hash for probe attempt `attempt`.
#[inline]
pub fn probe_hash(base: u32, attempt: u32) -> u32 {
    base.wrapping_add(attempt.wrapping_mul(attempt))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn djb2_known_values() {
        // h("") = 5381, h("a") = 5381*33 + 97.
        assert_eq!(djb2(b""), 5381);
        assert_eq!(djb2(b"a"), 5381u32.wrapping_mul(33) + 97);
        // Stable across runs and platforms.
        assert_eq!(djb2(b"event"), djb2(b"event"));
        assert_ne!(djb2(b"lap"), djb2(b"time_sec"));
    }

    #[test]
    fn probe_sequence() {
        let h = djb2(b"key");
        assert_eq!(probe_hash(h, 0), h);
        assert_eq!(probe_hash(h, 1), h.wrapping_add(1));
        assert_eq!(probe_hash(h, 2), h.wrapping_add(4));
        assert_eq!(probe_hash(h, 11), h.wrapping_add(121));
    }

    /// The corpus of two-character alphanumeric keys contains genuine DJB2
    /// collisions; the probe displacement is what keeps them apart.
    #[test]
    fn two_char_collisions_exist() {
        let alphabet: Vec<u8> = (b'A'..=b'Z').chain(b'a'..=b'z').chain(b'0'..=b'9').collect();
        let mut seen = std::collections::HashMap::new();
        let mut found = None;
        'outer: for &a in &alphabet {
            for &b in &alphabet {
                let k = [a, b];
                let h = djb2(&k);
                if let Some(prev) = seen.insert(h, k) {
                    found = Some((prev, k));
                    break 'outer;
                }
            }
        }
        let (k1, k2) = found.expect("djb2 must collide on some 2-char pair");
        assert_ne!(k1, k2);
        assert_eq!(djb2(&k1), djb2(&k2));
    }
}
