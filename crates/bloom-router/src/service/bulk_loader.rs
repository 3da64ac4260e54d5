//! Bulk Loader
//!
//! Writes a batch of keys to the shards that own them.
//!
//! Writes are not atomic across shards. Every shard in the batch is attempted;
//! if any fails the call returns the first failure in shard order, and keys
//! accepted by the other shards stay written. Re-adding a key is a no-op, so
//! callers may retry the whole batch.

use futures::future::join_all;
use tracing::{debug, warn};

use super::dispatch::Dispatcher;
use crate::algorithms::partition;
use crate::domain::{RouterError, ShardId};
use crate::ports::FilterClient;

/// Per-shard bulk-add fan-out.
pub struct BulkLoader<'a, C: FilterClient> {
    dispatcher: &'a Dispatcher<C>,
}

impl<'a, C: FilterClient> BulkLoader<'a, C> {
    /// Loader over `dispatcher`.
    pub fn new(dispatcher: &'a Dispatcher<C>) -> Self {
        Self { dispatcher }
    }

    /// Add `keys` to their shards.
    pub async fn add(&self, keys: &[String]) -> Result<(), RouterError> {
        let assignment = partition(keys.iter().cloned(), self.dispatcher.shard_count());
        let shards = assignment.len();

        let calls = assignment
            .into_iter()
            .map(|(shard, keys)| self.add_to_shard(shard, keys));

        let results = join_all(calls).await;
        let failed = results.iter().filter(|r| r.is_err()).count();
        if failed > 0 {
            warn!(
                failed,
                shards,
                "[bloom-router] Bulk add incomplete; healthy shards keep their keys"
            );
        }

        results.into_iter().collect()
    }

    async fn add_to_shard(&self, shard: ShardId, keys: Vec<String>) -> Result<(), RouterError> {
        let name = self.dispatcher.shard_name(shard);
        let client = self.dispatcher.client();

        let ((), elapsed) = self
            .dispatcher
            .call(&name, client.bulk_add(name.as_str(), &keys))
            .await?;

        self.dispatcher.metrics().record_add(keys.len(), elapsed);
        debug!(
            shard = %name,
            keys = keys.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "[bloom-router] Shard loaded"
        );
        Ok(())
    }
}
