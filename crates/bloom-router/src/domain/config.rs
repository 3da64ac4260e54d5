//! Router configuration and validation
//!
//! # Example
//!
//! ```ignore
//! use bloom_router::RouterConfigBuilder;
//!
//! let config = RouterConfigBuilder::new()
//!     .server("bloomd-1:8673")
//!     .prefix("seen-urls")
//!     .shard_count(16)
//!     .capacity(2_000_000_000)
//!     .error_probability(0.001)
//!     .build()?;
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::errors::{RouterError, ShardId};
use super::invariants::{
    DEFAULT_CALL_TIMEOUT, DEFAULT_SHARD_COUNT, MAX_SHARD_COUNT, MIN_SHARD_COUNT,
};
use super::value_objects::{ServerAddress, ShardName};

/// Default filter name prefix.
pub const DEFAULT_PREFIX: &str = "default-";

/// Default logical capacity across all shards.
pub const DEFAULT_CAPACITY: u64 = 1_000_000;

/// Shard layout of one logical filter.
///
/// `shard_count` is part of the filter's identity: changing it after keys
/// were written moves keys to other shards and orphans the old placements.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShardConfig {
    /// Prefix of every shard name.
    pub prefix: String,
    /// Number of remote filters.
    pub shard_count: ShardId,
    /// Total elements the logical filter must hold.
    pub capacity: u64,
    /// Target false positive rate; the server default when absent.
    #[serde(default)]
    pub error_probability: Option<f64>,
    /// Ask the server to keep shards memory-only.
    #[serde(default)]
    pub in_memory: bool,
}

impl Default for ShardConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            shard_count: DEFAULT_SHARD_COUNT,
            capacity: DEFAULT_CAPACITY,
            error_probability: None,
            in_memory: false,
        }
    }
}

impl ShardConfig {
    /// Validate shape constraints. Capacity against the per-shard bound is
    /// checked separately when shards are provisioned.
    pub fn validate(&self) -> Result<(), RouterError> {
        if self.prefix.is_empty() {
            return Err(RouterError::InvalidConfiguration(
                "prefix cannot be empty".to_string(),
            ));
        }

        if self.shard_count < MIN_SHARD_COUNT {
            return Err(RouterError::InvalidConfiguration(format!(
                "shard_count must be at least {}",
                MIN_SHARD_COUNT
            )));
        }

        if self.shard_count > MAX_SHARD_COUNT {
            return Err(RouterError::InvalidConfiguration(format!(
                "shard_count {} exceeds maximum {}",
                self.shard_count, MAX_SHARD_COUNT
            )));
        }

        if self.capacity == 0 {
            return Err(RouterError::InvalidConfiguration(
                "capacity must be positive".to_string(),
            ));
        }

        if let Some(p) = self.error_probability {
            if !(p > 0.0 && p < 1.0) {
                return Err(RouterError::InvalidConfiguration(format!(
                    "error_probability {} must be between 0 and 1",
                    p
                )));
            }
        }

        Ok(())
    }

    /// Name of shard `index`.
    pub fn shard_name(&self, index: ShardId) -> ShardName {
        ShardName::new(&self.prefix, index)
    }

    /// Names of all shards in index order.
    pub fn shard_names(&self) -> Vec<ShardName> {
        (0..self.shard_count).map(|i| self.shard_name(i)).collect()
    }
}

/// Full router configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Filter servers to connect to.
    pub servers: Vec<ServerAddress>,
    /// Shard layout.
    pub shard: ShardConfig,
    /// Timeout for each remote call in milliseconds.
    pub call_timeout_ms: u64,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            servers: vec![ServerAddress::new("localhost")],
            shard: ShardConfig::default(),
            call_timeout_ms: DEFAULT_CALL_TIMEOUT.as_millis() as u64,
        }
    }
}

impl RouterConfig {
    /// Validate the whole configuration.
    pub fn validate(&self) -> Result<(), RouterError> {
        if self.servers.is_empty() {
            return Err(RouterError::InvalidConfiguration(
                "at least one server is required".to_string(),
            ));
        }

        if self.call_timeout_ms == 0 {
            return Err(RouterError::InvalidConfiguration(
                "call_timeout_ms must be positive".to_string(),
            ));
        }

        self.shard.validate()
    }

    /// Timeout for each remote call.
    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }

    /// Create config for testing.
    pub fn for_testing(prefix: &str) -> Self {
        Self {
            servers: vec![ServerAddress::new("localhost")],
            shard: ShardConfig {
                prefix: prefix.to_string(),
                shard_count: 4,
                capacity: 10_000,
                error_probability: Some(0.01),
                in_memory: true,
            },
            call_timeout_ms: 1_000,
        }
    }
}

/// Builder for RouterConfig with validation
#[derive(Default)]
pub struct RouterConfigBuilder {
    servers: Vec<String>,
    prefix: Option<String>,
    shard_count: Option<ShardId>,
    capacity: Option<u64>,
    error_probability: Option<f64>,
    in_memory: Option<bool>,
    call_timeout: Option<Duration>,
}

impl RouterConfigBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a server as `"host"`, `"host:port"` or `"host:port:udp_port"`
    pub fn server(mut self, addr: impl Into<String>) -> Self {
        self.servers.push(addr.into());
        self
    }

    /// Add several servers
    pub fn servers<I, S>(mut self, addrs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.servers.extend(addrs.into_iter().map(Into::into));
        self
    }

    /// Set the shard name prefix
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Set the number of shards
    pub fn shard_count(mut self, count: ShardId) -> Self {
        self.shard_count = Some(count);
        self
    }

    /// Set the total capacity
    pub fn capacity(mut self, capacity: u64) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Set the target false positive rate
    pub fn error_probability(mut self, p: f64) -> Self {
        self.error_probability = Some(p);
        self
    }

    /// Keep shards memory-only on the server
    pub fn in_memory(mut self, in_memory: bool) -> Self {
        self.in_memory = Some(in_memory);
        self
    }

    /// Set the per-call timeout
    pub fn call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = Some(timeout);
        self
    }

    /// Build the RouterConfig, validating all parameters
    pub fn build(self) -> Result<RouterConfig, RouterError> {
        let defaults = RouterConfig::default();

        let servers = if self.servers.is_empty() {
            defaults.servers
        } else {
            self.servers
                .iter()
                .map(|s| s.parse())
                .collect::<Result<Vec<ServerAddress>, _>>()?
        };

        let config = RouterConfig {
            servers,
            shard: ShardConfig {
                prefix: self.prefix.unwrap_or(defaults.shard.prefix),
                shard_count: self.shard_count.unwrap_or(defaults.shard.shard_count),
                capacity: self.capacity.unwrap_or(defaults.shard.capacity),
                error_probability: self.error_probability.or(defaults.shard.error_probability),
                in_memory: self.in_memory.unwrap_or(defaults.shard.in_memory),
            },
            call_timeout_ms: self
                .call_timeout
                // Round up so sub-millisecond timeouts stay positive.
                .map(|t| t.as_micros().div_ceil(1_000) as u64)
                .unwrap_or(defaults.call_timeout_ms),
        };

        config.validate()?;
        Ok(config)
    }
}
