//! # Domain Errors
//!
//! Error types for the bloom router and the filter client it drives.

use std::time::Duration;
use thiserror::Error;

use super::value_objects::ShardName;

/// Shard index (u16 supports up to 65536 shards).
pub type ShardId = u16;

/// Errors reported by a remote filter client.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientError {
    /// Could not reach the filter server.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The call did not complete in time.
    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    /// The server answered with something we cannot interpret.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// No filter with that name exists on the server.
    #[error("Filter not found: {0}")]
    FilterNotFound(String),

    /// A filter with that name already exists on the server.
    #[error("Filter already exists: {0}")]
    AlreadyExists(String),
}

/// Router error types.
#[derive(Debug, Error)]
pub enum RouterError {
    /// Requested capacity does not fit in `shard_count` shards.
    #[error(
        "Capacity exceeded: {requested} elements requested, {shard_count} shards hold at most {max_per_shard} each"
    )]
    CapacityExceeded {
        /// Requested total capacity
        requested: u64,
        /// Configured shard count
        shard_count: ShardId,
        /// Upper bound for a single shard
        max_per_shard: u64,
    },

    /// A per-shard call failed; the whole logical operation is aborted.
    #[error("Shard unavailable: {shard}: {source}")]
    ShardUnavailable {
        /// Shard whose call failed
        shard: ShardName,
        /// Underlying client failure
        #[source]
        source: ClientError,
    },

    /// Configuration rejected before any remote call was made.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Connecting to the filter servers failed.
    #[error("Connection failed: {0}")]
    Connection(#[source] ClientError),
}

impl RouterError {
    /// Shard named by a `ShardUnavailable` error.
    pub fn shard(&self) -> Option<&ShardName> {
        match self {
            Self::ShardUnavailable { shard, .. } => Some(shard),
            _ => None,
        }
    }

    /// True if the failure was caused by an elapsed timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::ShardUnavailable {
                source: ClientError::Timeout(_),
                ..
            } | Self::Connection(ClientError::Timeout(_))
        )
    }
}
