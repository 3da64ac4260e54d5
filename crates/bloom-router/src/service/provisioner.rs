//! Filter Provisioner
//!
//! Creates every shard's remote filter when a router is built.

use futures::future::join_all;
use tracing::{debug, info};

use super::dispatch::Dispatcher;
use crate::algorithms::plan_capacity;
use crate::domain::{ClientError, RouterError, ShardName};
use crate::ports::FilterClient;

/// Issues one create call per shard.
pub struct FilterProvisioner<'a, C: FilterClient> {
    dispatcher: &'a Dispatcher<C>,
}

impl<'a, C: FilterClient> FilterProvisioner<'a, C> {
    /// Provisioner over `dispatcher`.
    pub fn new(dispatcher: &'a Dispatcher<C>) -> Self {
        Self { dispatcher }
    }

    /// Create all shards, returning the per-shard capacity used.
    ///
    /// Fails with `CapacityExceeded` before any remote call if the capacity
    /// cannot fit. Existing filters are accepted as-is. Shards created before
    /// a failing shard are left in place.
    pub async fn provision(&self) -> Result<u64, RouterError> {
        let config = self.dispatcher.shard_config();
        let per_shard = plan_capacity(config)?;

        let calls = config
            .shard_names()
            .into_iter()
            .map(|name| self.create_shard(name, per_shard));

        for result in join_all(calls).await {
            result?;
        }

        info!(
            prefix = %config.prefix,
            shards = config.shard_count,
            per_shard,
            "[bloom-router] Provisioned shards"
        );

        Ok(per_shard)
    }

    async fn create_shard(&self, name: ShardName, capacity: u64) -> Result<(), RouterError> {
        let config = self.dispatcher.shard_config();
        let client = self.dispatcher.client();

        let create = async {
            match client
                .create_filter(
                    name.as_str(),
                    capacity,
                    config.error_probability,
                    config.in_memory,
                )
                .await
            {
                Err(ClientError::AlreadyExists(_)) => {
                    debug!(shard = %name, "[bloom-router] Shard already exists");
                    Ok(())
                }
                other => other,
            }
        };

        self.dispatcher.call(&name, create).await?;
        self.dispatcher.metrics().record_provisioned();
        Ok(())
    }
}
