//! Query Aggregator
//!
//! Fans a membership query out to the shards that own the keys and folds the
//! per-shard answers.
//!
//! | Operation | Result                                   | Stops early on |
//! |-----------|------------------------------------------|----------------|
//! | `any`     | some shard saw some of its keys          | first `true`   |
//! | `all`     | every shard saw every one of its keys    | first `false`  |
//! | `raw`     | per-shard hit arrays, shard index order  | never          |
//!
//! A failing shard fails the whole query unless the answer was already
//! decided by shards that answered first.

use futures::future::join_all;
use futures::stream::{FuturesUnordered, StreamExt};
use tracing::debug;

use super::dispatch::Dispatcher;
use crate::algorithms::partition;
use crate::domain::{
    invariant_aligned_response, ClientError, RouterError, ShardAssignment, ShardId, ShardReport,
};
use crate::ports::FilterClient;

/// Per-shard membership fan-out.
pub struct QueryAggregator<'a, C: FilterClient> {
    dispatcher: &'a Dispatcher<C>,
}

impl<'a, C: FilterClient> QueryAggregator<'a, C> {
    /// Aggregator over `dispatcher`.
    pub fn new(dispatcher: &'a Dispatcher<C>) -> Self {
        Self { dispatcher }
    }

    /// True iff at least one shard reports at least one key present.
    ///
    /// Empty input is `false`.
    pub async fn any(&self, keys: &[String]) -> Result<bool, RouterError> {
        let mut pending: FuturesUnordered<_> = self
            .plan(keys)
            .into_iter()
            .map(|(shard, keys)| self.check_shard(shard, keys))
            .collect();

        while let Some(report) = pending.next().await {
            if report?.any() {
                return Ok(true);
            }
        }

        Ok(false)
    }

    /// True iff every shard reports every key routed to it present.
    ///
    /// Empty input is `true`.
    pub async fn all(&self, keys: &[String]) -> Result<bool, RouterError> {
        let mut pending: FuturesUnordered<_> = self
            .plan(keys)
            .into_iter()
            .map(|(shard, keys)| self.check_shard(shard, keys))
            .collect();

        while let Some(report) = pending.next().await {
            if !report?.all() {
                return Ok(false);
            }
        }

        Ok(true)
    }

    /// One report per non-empty shard, ascending shard index.
    pub async fn raw(&self, keys: &[String]) -> Result<Vec<ShardReport>, RouterError> {
        let assignment = self.plan(keys);
        let calls = assignment
            .into_iter()
            .map(|(shard, keys)| self.check_shard(shard, keys));

        join_all(calls).await.into_iter().collect()
    }

    fn plan(&self, keys: &[String]) -> ShardAssignment {
        partition(keys.iter().cloned(), self.dispatcher.shard_count())
    }

    async fn check_shard(
        &self,
        shard: ShardId,
        keys: Vec<String>,
    ) -> Result<ShardReport, RouterError> {
        let name = self.dispatcher.shard_name(shard);
        let client = self.dispatcher.client();

        let (hits, elapsed) = self
            .dispatcher
            .call(&name, client.multi_check(name.as_str(), &keys))
            .await?;

        if !invariant_aligned_response(keys.len(), hits.len()) {
            let source = ClientError::Protocol(format!(
                "expected {} answers, got {}",
                keys.len(),
                hits.len()
            ));
            return self.dispatcher.fail(&name, source);
        }

        self.dispatcher.metrics().record_check(keys.len(), elapsed);
        debug!(
            shard = %name,
            keys = keys.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "[bloom-router] Shard checked"
        );

        Ok(ShardReport {
            shard: name,
            keys,
            hits,
        })
    }
}
