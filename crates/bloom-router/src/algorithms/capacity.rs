//! # Capacity Partitioning
//!
//! Splits the requested logical capacity across shards.

use crate::domain::{invariant_capacity_fits, RouterError, ShardConfig, ShardId};

/// Capacity each shard is created with.
///
/// Rounds up so `shard_count × per_shard >= capacity`.
pub fn per_shard_capacity(capacity: u64, shard_count: ShardId) -> u64 {
    if shard_count == 0 {
        return capacity;
    }
    capacity.div_ceil(u64::from(shard_count))
}

/// Check the configured capacity fits and return the per-shard capacity.
pub fn plan_capacity(config: &ShardConfig) -> Result<u64, RouterError> {
    invariant_capacity_fits(config.capacity, config.shard_count)?;
    Ok(per_shard_capacity(config.capacity, config.shard_count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MAX_SHARD_CAPACITY;

    #[test]
    fn test_even_split() {
        assert_eq!(per_shard_capacity(1_600, 16), 100);
    }

    #[test]
    fn test_uneven_split_rounds_up() {
        let per_shard = per_shard_capacity(1_000, 3);
        assert_eq!(per_shard, 334);
        assert!(per_shard * 3 >= 1_000);
    }

    #[test]
    fn test_plan_rejects_oversized_single_shard() {
        let config = ShardConfig {
            shard_count: 1,
            capacity: 5_000_000_000,
            ..Default::default()
        };
        assert!(matches!(
            plan_capacity(&config),
            Err(RouterError::CapacityExceeded { .. })
        ));
    }

    #[test]
    fn test_plan_accepts_two_shards() {
        let config = ShardConfig {
            shard_count: 2,
            capacity: 5_000_000_000,
            ..Default::default()
        };
        let per_shard = plan_capacity(&config).unwrap();
        assert_eq!(per_shard, 2_500_000_000);
        assert!(per_shard <= MAX_SHARD_CAPACITY);
    }
}
