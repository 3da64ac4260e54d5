//! # Shard Hasher
//!
//! Deterministic key-to-shard placement.
//!
//! Placement is pinned to MurmurHash3 x64_128 with seed `0`, keeping the lower
//! 64 bits, reduced modulo the shard count. It does not depend on the process,
//! platform or toolchain, so a key lands on the same shard after a restart or
//! from another client. Placement is NOT stable across different shard counts.

use std::io::Cursor;

use crate::domain::ShardId;

/// Seed used for shard placement. Changing it moves every key.
pub const PLACEMENT_SEED: u32 = 0;

/// 64-bit placement hash of a key.
pub fn placement_hash(key: &[u8]) -> u64 {
    let mut cursor = Cursor::new(key);
    // Reading from an in-memory cursor cannot fail.
    let hash = murmur3::murmur3_x64_128(&mut cursor, PLACEMENT_SEED).unwrap_or(0);
    hash as u64
}

/// Shard for `key` among `shard_count` shards.
///
/// Returns a value in `[0, shard_count)`; a zero shard count maps everything
/// to shard 0.
pub fn assign_shard(key: &[u8], shard_count: ShardId) -> ShardId {
    if shard_count == 0 {
        return 0;
    }

    (placement_hash(key) % u64::from(shard_count)) as ShardId
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::invariant_deterministic_assignment;
    use proptest::prelude::*;

    #[test]
    fn test_assign_shard_deterministic() {
        let shard1 = assign_shard(b"user:42", 16);
        let shard2 = assign_shard(b"user:42", 16);
        assert_eq!(shard1, shard2);
    }

    #[test]
    fn test_assign_shard_within_range() {
        for i in 0..1000 {
            let key = format!("key-{}", i);
            assert!(assign_shard(key.as_bytes(), 16) < 16);
        }
    }

    #[test]
    fn test_assign_shard_zero_count() {
        assert_eq!(assign_shard(b"anything", 0), 0);
    }

    #[test]
    fn test_single_shard_takes_everything() {
        for i in 0..100 {
            let key = format!("key-{}", i);
            assert_eq!(assign_shard(key.as_bytes(), 1), 0);
        }
    }

    #[test]
    fn test_placement_hash_is_pinned() {
        // Same bytes, same hash, regardless of how the key was built.
        let owned = String::from("pinned");
        assert_eq!(placement_hash(owned.as_bytes()), placement_hash(b"pinned"));
        assert_ne!(placement_hash(b"pinned"), placement_hash(b"pinned "));
    }

    #[test]
    fn test_distribution_roughly_uniform() {
        let shards = 16usize;
        let mut counts = vec![0usize; shards];
        for i in 0..16_000 {
            let key = format!("Test key{}", i);
            counts[assign_shard(key.as_bytes(), shards as ShardId) as usize] += 1;
        }

        // Expect ~1000 per shard; allow 30% either way.
        for (shard, count) in counts.iter().enumerate() {
            assert!(
                (700..=1300).contains(count),
                "Shard {} got {} keys",
                shard,
                count
            );
        }
    }

    proptest! {
        #[test]
        fn prop_assign_shard_in_range(key in proptest::collection::vec(any::<u8>(), 0..64), n in 1u16..=1024) {
            prop_assert!(assign_shard(&key, n) < n);
        }

        #[test]
        fn prop_assign_shard_deterministic(key in ".*", n in 1u16..=1024) {
            prop_assert!(invariant_deterministic_assignment(assign_shard, key.as_bytes(), n));
        }
    }
}
