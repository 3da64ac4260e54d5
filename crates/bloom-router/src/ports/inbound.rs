//! # Inbound Ports
//!
//! API trait defining what a sharded filter can do.

use async_trait::async_trait;

use crate::domain::{RouterError, ShardConfig, ShardName, ShardReport};

/// Sharded filter API - inbound port.
///
/// There is no `get`; callers choose between `any` and `all`.
#[async_trait]
pub trait ShardedFilterApi: Send + Sync {
    /// Add keys to their shards.
    ///
    /// Not atomic across shards: if one shard fails, keys already written to
    /// other shards in the same call stay written.
    async fn add(&self, keys: &[String]) -> Result<(), RouterError>;

    /// True if any shard reports any of its keys present.
    async fn any(&self, keys: &[String]) -> Result<bool, RouterError>;

    /// True if every shard reports every one of its keys present.
    async fn all(&self, keys: &[String]) -> Result<bool, RouterError>;

    /// Per-shard answers, ascending shard index.
    async fn raw(&self, keys: &[String]) -> Result<Vec<ShardReport>, RouterError>;

    /// Shard layout this filter was created with.
    fn config(&self) -> &ShardConfig;

    /// Names of all shards in index order.
    fn shard_names(&self) -> Vec<ShardName> {
        self.config().shard_names()
    }
}
