//! Shard Dispatch
//!
//! Shared context for every per-shard call: the client handle, the shard
//! layout, the call timeout and the metrics sink. Each call is bounded by the
//! timeout and its failure is reported against the shard that caused it.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::time::timeout;
use tracing::warn;

use crate::domain::{ClientError, RouterError, ShardConfig, ShardId, ShardName};
use crate::metrics::MetricsRecorder;
use crate::ports::FilterClient;

/// Everything a per-shard call needs.
pub struct Dispatcher<C: FilterClient> {
    client: Arc<C>,
    shard: ShardConfig,
    call_timeout: Duration,
    metrics: Arc<dyn MetricsRecorder>,
}

impl<C: FilterClient> Dispatcher<C> {
    /// Create a dispatcher over a connected client.
    pub fn new(
        client: Arc<C>,
        shard: ShardConfig,
        call_timeout: Duration,
        metrics: Arc<dyn MetricsRecorder>,
    ) -> Self {
        Self {
            client,
            shard,
            call_timeout,
            metrics,
        }
    }

    /// Remote filter client.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Shard layout.
    pub fn shard_config(&self) -> &ShardConfig {
        &self.shard
    }

    /// Number of shards.
    pub fn shard_count(&self) -> ShardId {
        self.shard.shard_count
    }

    /// Name of shard `index`.
    pub fn shard_name(&self, index: ShardId) -> ShardName {
        self.shard.shard_name(index)
    }

    /// Timeout applied to each call.
    pub fn call_timeout(&self) -> Duration {
        self.call_timeout
    }

    /// Metrics sink.
    pub fn metrics(&self) -> &dyn MetricsRecorder {
        self.metrics.as_ref()
    }

    /// Run one client call against `shard` under the call timeout.
    ///
    /// Returns the value and the time the call took. Failures and timeouts
    /// become `ShardUnavailable` naming `shard`.
    pub async fn call<T, F>(&self, shard: &ShardName, call: F) -> Result<(T, Duration), RouterError>
    where
        F: Future<Output = Result<T, ClientError>>,
    {
        let started = Instant::now();
        let source = match timeout(self.call_timeout, call).await {
            Ok(Ok(value)) => return Ok((value, started.elapsed())),
            Ok(Err(e)) => e,
            Err(_) => ClientError::Timeout(self.call_timeout),
        };

        self.fail(shard, source)
    }

    /// Report a failed call against `shard`.
    pub fn fail<T>(&self, shard: &ShardName, source: ClientError) -> Result<T, RouterError> {
        let timed_out = matches!(source, ClientError::Timeout(_));
        self.metrics.record_failure(timed_out);
        warn!(
            shard = %shard,
            timed_out,
            error = %source,
            "[bloom-router] Shard call failed"
        );

        Err(RouterError::ShardUnavailable {
            shard: shard.clone(),
            source,
        })
    }
}
