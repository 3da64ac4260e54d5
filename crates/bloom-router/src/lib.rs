//! # Bloom Router
//!
//! Client-side sharding for remote bloom filters.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! One logical filter is spread over `shard_count` remote filters named
//! `"{prefix}-{index}"`, so it can hold more than a single filter instance:
//! - Pinned MurmurHash3 placement, `hash(key) % shard_count`
//! - Capacity split across shards at creation time
//! - Concurrent per-shard fan-out with `any` / `all` / `raw` aggregation
//!
//! ## Guarantees
//!
//! | Property | Description |
//! |----------|-------------|
//! | Deterministic placement | Same key + same shard count = same shard, across restarts |
//! | No silent failures | Any failing or timed-out shard call fails the operation |
//! | Bounded calls | Every remote call runs under the configured timeout |
//! | Non-atomic writes | A failed `add` leaves keys on healthy shards in place |
//!
//! The shard count is part of a filter's identity. Opening existing shards
//! with a different count routes keys to the wrong filters.
//!
//! ## Module Structure
//!
//! ```text
//! bloom-router/
//! ├── domain/          # ShardConfig, RouterConfig, ShardName, errors, invariants
//! ├── algorithms/      # Placement hash, batch partitioning, capacity split
//! ├── ports/           # ShardedFilterApi + FilterClient traits
//! ├── service/         # Provisioner, query aggregator, bulk loader, router
//! └── adapters/        # In-memory filter client
//! ```
//!
//! ## Usage Example
//!
//! ```ignore
//! use bloom_router::{BloomRouter, InMemoryConnector, RouterConfigBuilder, ShardedFilterApi};
//!
//! let config = RouterConfigBuilder::new()
//!     .server("localhost:8673")
//!     .prefix("seen-urls")
//!     .shard_count(16)
//!     .capacity(100_000_000)
//!     .build()?;
//!
//! let router = BloomRouter::connect(&connector, config).await?;
//! router.add(&keys).await?;
//! assert!(router.all(&keys).await?);
//! ```

#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod domain;
pub mod metrics;
pub mod ports;
pub mod service;
pub mod telemetry;

// Re-exports
pub use adapters::{FilterInfo, InMemoryConnector, InMemoryFilterClient};
pub use algorithms::{assign_shard, partition, per_shard_capacity, placement_hash};
pub use domain::{
    ClientError, RouterConfig, RouterConfigBuilder, RouterError, ServerAddress, ShardAssignment,
    ShardConfig, ShardId, ShardName, ShardReport, DEFAULT_CALL_TIMEOUT, MAX_SHARD_CAPACITY,
    MAX_SHARD_COUNT, MIN_SHARD_COUNT,
};
pub use metrics::{MetricsRecorder, MetricsSnapshot, NoOpMetrics, RouterMetrics};
pub use ports::{FilterClient, FilterClientConnector, ShardedFilterApi};
pub use service::BloomRouter;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
    }
}
