//! # Shard Planner
//!
//! Groups a batch of keys by destination shard.

use std::collections::BTreeMap;

use super::shard_hasher::assign_shard;
use crate::domain::{ShardAssignment, ShardId};

/// Partition `keys` into per-shard buckets.
///
/// Single pass, input order preserved inside each bucket, shards without keys
/// omitted.
pub fn partition<K, I>(keys: I, shard_count: ShardId) -> ShardAssignment<K>
where
    I: IntoIterator<Item = K>,
    K: AsRef<[u8]>,
{
    let mut buckets: BTreeMap<ShardId, Vec<K>> = BTreeMap::new();

    for key in keys {
        let shard = assign_shard(key.as_ref(), shard_count);
        buckets.entry(shard).or_default().push(key);
    }

    ShardAssignment::from_buckets(buckets)
}

/// Shards touched by `keys`, ascending, without duplicates.
pub fn involved_shards<K: AsRef<[u8]>>(keys: &[K], shard_count: ShardId) -> Vec<ShardId> {
    let mut shards: Vec<ShardId> = keys
        .iter()
        .map(|k| assign_shard(k.as_ref(), shard_count))
        .collect();
    shards.sort_unstable();
    shards.dedup();
    shards
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashMap;

    fn keys(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("key-{}", i)).collect()
    }

    #[test]
    fn test_partition_empty() {
        let assignment = partition(Vec::<String>::new(), 16);
        assert!(assignment.is_empty());
        assert_eq!(assignment.key_count(), 0);
    }

    #[test]
    fn test_partition_omits_empty_shards() {
        let assignment = partition(vec!["only-one"], 16);
        assert_eq!(assignment.len(), 1);
        let (shard, bucket) = assignment.iter().next().unwrap();
        assert_eq!(shard, assign_shard(b"only-one", 16));
        assert_eq!(bucket, &["only-one"][..]);
    }

    #[test]
    fn test_partition_matches_hasher() {
        let input = keys(500);
        let assignment = partition(input.iter(), 8);
        for (shard, bucket) in assignment.iter() {
            for key in bucket {
                assert_eq!(assign_shard(key.as_bytes(), 8), shard);
            }
        }
    }

    #[test]
    fn test_partition_keeps_duplicates() {
        let assignment = partition(vec!["dup", "dup", "dup"], 4);
        assert_eq!(assignment.key_count(), 3);
        assert_eq!(assignment.len(), 1);
    }

    #[test]
    fn test_partition_iterates_in_shard_order() {
        let assignment = partition(keys(200), 16);
        let shards: Vec<ShardId> = assignment.shards().collect();
        let mut sorted = shards.clone();
        sorted.sort_unstable();
        assert_eq!(shards, sorted);
    }

    #[test]
    fn test_involved_shards() {
        let input = keys(50);
        let shards = involved_shards(&input, 4);
        let assignment = partition(input.iter(), 4);
        assert_eq!(shards, assignment.shards().collect::<Vec<_>>());
    }

    proptest! {
        #[test]
        fn prop_partition_is_set_partition(input in proptest::collection::vec(".{0,12}", 0..200), n in 1u16..=64) {
            let assignment = partition(input.clone(), n);

            // Every key lands in exactly one bucket: multiset union equals input.
            prop_assert_eq!(assignment.key_count(), input.len());
            let mut expected: HashMap<&str, usize> = HashMap::new();
            for k in &input {
                *expected.entry(k.as_str()).or_default() += 1;
            }
            let mut seen: HashMap<&str, usize> = HashMap::new();
            for (_, bucket) in assignment.iter() {
                prop_assert!(!bucket.is_empty());
                for k in bucket {
                    *seen.entry(k.as_str()).or_default() += 1;
                }
            }
            prop_assert_eq!(seen, expected);
        }

        #[test]
        fn prop_partition_preserves_order(input in proptest::collection::vec(".{0,12}", 0..200), n in 1u16..=64) {
            let assignment = partition(input.clone(), n);
            for (shard, bucket) in assignment.iter() {
                let expected: Vec<&String> = input
                    .iter()
                    .filter(|k| assign_shard(k.as_bytes(), n) == shard)
                    .collect();
                let actual: Vec<&String> = bucket.iter().collect();
                prop_assert_eq!(actual, expected);
            }
        }
    }
}
