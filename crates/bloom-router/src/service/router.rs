//! Bloom Router
//!
//! Composition root: owns the client handle and the shard layout of one
//! logical filter and implements `ShardedFilterApi` on top of the provisioner,
//! the query aggregator and the bulk loader.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::info;

use super::bulk_loader::BulkLoader;
use super::dispatch::Dispatcher;
use super::provisioner::FilterProvisioner;
use super::query::QueryAggregator;
use crate::algorithms::{assign_shard, involved_shards, plan_capacity};
use crate::domain::{
    ClientError, RouterConfig, RouterError, ServerAddress, ShardConfig, ShardName, ShardReport,
};
use crate::metrics::{MetricsRecorder, NoOpMetrics};
use crate::ports::{FilterClient, FilterClientConnector, ShardedFilterApi};

/// One logical bloom filter spread over `shard_count` remote filters.
///
/// The remote filters outlive the router; dropping it only releases the
/// client handle.
pub struct BloomRouter<C: FilterClient> {
    dispatcher: Dispatcher<C>,
    servers: Vec<ServerAddress>,
    per_shard_capacity: u64,
}

impl<C: FilterClient + 'static> BloomRouter<C> {
    /// Connect to the configured servers and provision every shard.
    pub async fn connect<K>(connector: &K, config: RouterConfig) -> Result<Self, RouterError>
    where
        K: FilterClientConnector<Client = C>,
    {
        Self::connect_with_metrics(connector, config, Arc::new(NoOpMetrics)).await
    }

    /// [`connect`](Self::connect) reporting to `metrics`.
    pub async fn connect_with_metrics<K>(
        connector: &K,
        config: RouterConfig,
        metrics: Arc<dyn MetricsRecorder>,
    ) -> Result<Self, RouterError>
    where
        K: FilterClientConnector<Client = C>,
    {
        // Reject bad layouts before touching the network.
        config.validate()?;
        plan_capacity(&config.shard)?;

        let call_timeout = config.call_timeout();
        let client = timeout(call_timeout, connector.connect(&config.servers))
            .await
            .map_err(|_| RouterError::Connection(ClientError::Timeout(call_timeout)))?
            .map_err(RouterError::Connection)?;

        Self::with_client_and_metrics(Arc::new(client), config, metrics).await
    }

    /// Provision every shard through an already connected client.
    pub async fn with_client(client: Arc<C>, config: RouterConfig) -> Result<Self, RouterError> {
        Self::with_client_and_metrics(client, config, Arc::new(NoOpMetrics)).await
    }

    /// [`with_client`](Self::with_client) reporting to `metrics`.
    pub async fn with_client_and_metrics(
        client: Arc<C>,
        config: RouterConfig,
        metrics: Arc<dyn MetricsRecorder>,
    ) -> Result<Self, RouterError> {
        config.validate()?;

        let RouterConfig {
            servers,
            shard,
            call_timeout_ms,
        } = config;
        let dispatcher = Dispatcher::new(
            client,
            shard,
            Duration::from_millis(call_timeout_ms),
            metrics,
        );

        let per_shard_capacity = FilterProvisioner::new(&dispatcher).provision().await?;

        info!(
            prefix = %dispatcher.shard_config().prefix,
            shards = dispatcher.shard_count(),
            servers = servers.len(),
            "[bloom-router] Router ready"
        );

        Ok(Self {
            dispatcher,
            servers,
            per_shard_capacity,
        })
    }

    /// Servers this router was configured with.
    pub fn servers(&self) -> &[ServerAddress] {
        &self.servers
    }

    /// Capacity each shard was created with.
    pub fn per_shard_capacity(&self) -> u64 {
        self.per_shard_capacity
    }

    /// Timeout applied to each remote call.
    pub fn call_timeout(&self) -> Duration {
        self.dispatcher.call_timeout()
    }

    /// Shard that owns `key`.
    pub fn shard_for(&self, key: &str) -> ShardName {
        let index = assign_shard(key.as_bytes(), self.dispatcher.shard_count());
        self.dispatcher.shard_name(index)
    }

    /// Shards a batch of `keys` would touch, ascending.
    pub fn shards_for(&self, keys: &[String]) -> Vec<ShardName> {
        involved_shards(keys, self.dispatcher.shard_count())
            .into_iter()
            .map(|index| self.dispatcher.shard_name(index))
            .collect()
    }
}

#[async_trait]
impl<C: FilterClient + 'static> ShardedFilterApi for BloomRouter<C> {
    async fn add(&self, keys: &[String]) -> Result<(), RouterError> {
        BulkLoader::new(&self.dispatcher).add(keys).await
    }

    async fn any(&self, keys: &[String]) -> Result<bool, RouterError> {
        QueryAggregator::new(&self.dispatcher).any(keys).await
    }

    async fn all(&self, keys: &[String]) -> Result<bool, RouterError> {
        QueryAggregator::new(&self.dispatcher).all(keys).await
    }

    async fn raw(&self, keys: &[String]) -> Result<Vec<ShardReport>, RouterError> {
        QueryAggregator::new(&self.dispatcher).raw(keys).await
    }

    fn config(&self) -> &ShardConfig {
        self.dispatcher.shard_config()
    }
}
