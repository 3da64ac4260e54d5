//! # Algorithms Module
//!
//! Pure routing algorithms: placement, batch partitioning and capacity split.

pub mod capacity;
pub mod shard_hasher;
pub mod shard_planner;

pub use capacity::{per_shard_capacity, plan_capacity};
pub use shard_hasher::{assign_shard, placement_hash, PLACEMENT_SEED};
pub use shard_planner::{involved_shards, partition};
