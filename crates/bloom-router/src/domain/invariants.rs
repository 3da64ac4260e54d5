//! # Domain Invariants
//!
//! Rules that must hold for every router instance.

use super::errors::{RouterError, ShardId};
use std::time::Duration;

/// Minimum shard count.
pub const MIN_SHARD_COUNT: ShardId = 1;

/// Maximum shard count.
pub const MAX_SHARD_COUNT: ShardId = 1024;

/// Largest number of elements one remote filter hosts efficiently.
pub const MAX_SHARD_CAPACITY: u64 = 4_000_000_000;

/// Default shard count.
pub const DEFAULT_SHARD_COUNT: ShardId = 16;

/// Default timeout for a single remote call.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Invariant: shard assignment is deterministic.
///
/// Same key + same shard count = same shard.
pub fn invariant_deterministic_assignment<F>(assign_fn: F, key: &[u8], shard_count: ShardId) -> bool
where
    F: Fn(&[u8], ShardId) -> ShardId,
{
    let first = assign_fn(key, shard_count);
    let second = assign_fn(key, shard_count);
    first == second && first < shard_count
}

/// Invariant: `shard_count × MAX_SHARD_CAPACITY >= capacity`.
pub fn invariant_capacity_fits(capacity: u64, shard_count: ShardId) -> Result<(), RouterError> {
    let total = u64::from(shard_count).saturating_mul(MAX_SHARD_CAPACITY);
    if capacity > total {
        return Err(RouterError::CapacityExceeded {
            requested: capacity,
            shard_count,
            max_per_shard: MAX_SHARD_CAPACITY,
        });
    }
    Ok(())
}

/// Invariant: a shard's answer is positionally aligned with its keys.
pub fn invariant_aligned_response(keys: usize, hits: usize) -> bool {
    keys == hits
}
