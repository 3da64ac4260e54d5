//! # Domain Value Objects
//!
//! Immutable value types for the router: shard names, server addresses,
//! per-call shard assignments and raw per-shard reports.

use super::errors::{RouterError, ShardId};
use serde::{Deserialize, Serialize};
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Default TCP port of a filter server.
pub const DEFAULT_TCP_PORT: u16 = 8673;

/// Default UDP port of a filter server.
pub const DEFAULT_UDP_PORT: u16 = 8674;

/// Name of one remote filter instance: `"{prefix}-{index}"`.
///
/// Deserialization rejects a name whose suffix disagrees with its index.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawShardName")]
pub struct ShardName {
    name: String,
    index: ShardId,
}

#[derive(Deserialize)]
struct RawShardName {
    name: String,
    index: ShardId,
}

impl TryFrom<RawShardName> for ShardName {
    type Error = RouterError;

    fn try_from(raw: RawShardName) -> Result<Self, Self::Error> {
        let suffix = format!("-{}", raw.index);
        match raw.name.strip_suffix(&suffix) {
            Some(prefix) if !prefix.is_empty() => Ok(Self::new(prefix, raw.index)),
            _ => Err(RouterError::InvalidConfiguration(format!(
                "shard name {:?} does not end in {:?}",
                raw.name, suffix
            ))),
        }
    }
}

impl ShardName {
    /// Derive the shard name for `index` under `prefix`.
    pub fn new(prefix: &str, index: ShardId) -> Self {
        Self {
            name: format!("{}-{}", prefix, index),
            index,
        }
    }

    /// Filter identifier as seen by the remote server.
    pub fn as_str(&self) -> &str {
        &self.name
    }

    /// Shard index this name belongs to.
    pub fn index(&self) -> ShardId {
        self.index
    }
}

impl fmt::Display for ShardName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Address of a filter server.
///
/// Accepts `"host"`, `"host:port"` or `"host:port:udp_port"`. Missing ports
/// fall back to [`DEFAULT_TCP_PORT`] and [`DEFAULT_UDP_PORT`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ServerAddress {
    /// Host name or IP.
    pub host: String,
    /// TCP port.
    pub port: u16,
    /// UDP port.
    pub udp_port: u16,
}

impl ServerAddress {
    /// Address with default ports.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_TCP_PORT,
            udp_port: DEFAULT_UDP_PORT,
        }
    }
}

impl FromStr for ServerAddress {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_port = |raw: &str| {
            raw.parse::<u16>().map_err(|_| {
                RouterError::InvalidConfiguration(format!("invalid port {:?} in {:?}", raw, s))
            })
        };

        let parts: Vec<&str> = s.trim().split(':').collect();
        let (host, port, udp_port) = match parts.as_slice() {
            [host] => (*host, DEFAULT_TCP_PORT, DEFAULT_UDP_PORT),
            [host, port] => (*host, parse_port(port)?, DEFAULT_UDP_PORT),
            [host, port, udp] => (*host, parse_port(port)?, parse_port(udp)?),
            _ => {
                return Err(RouterError::InvalidConfiguration(format!(
                    "invalid server address {:?}",
                    s
                )))
            }
        };

        if host.is_empty() {
            return Err(RouterError::InvalidConfiguration(format!(
                "missing host in server address {:?}",
                s
            )));
        }

        Ok(Self {
            host: host.to_string(),
            port,
            udp_port,
        })
    }
}

impl TryFrom<String> for ServerAddress {
    type Error = RouterError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ServerAddress> for String {
    fn from(addr: ServerAddress) -> Self {
        addr.to_string()
    }
}

impl fmt::Display for ServerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.host, self.port, self.udp_port)
    }
}

/// Keys of one batch grouped by destination shard.
///
/// Rebuilt on every call. Only shards with at least one key are present and
/// iteration runs in ascending shard index order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShardAssignment<K = String> {
    buckets: BTreeMap<ShardId, Vec<K>>,
}

impl<K> ShardAssignment<K> {
    pub(crate) fn from_buckets(buckets: BTreeMap<ShardId, Vec<K>>) -> Self {
        Self { buckets }
    }

    /// Keys routed to `shard`, if any.
    pub fn get(&self, shard: ShardId) -> Option<&[K]> {
        self.buckets.get(&shard).map(Vec::as_slice)
    }

    /// Shards that received at least one key.
    pub fn shards(&self) -> impl Iterator<Item = ShardId> + '_ {
        self.buckets.keys().copied()
    }

    /// Iterate `(shard, keys)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (ShardId, &[K])> {
        self.buckets.iter().map(|(s, k)| (*s, k.as_slice()))
    }

    /// Number of non-empty shards.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// True if no key was assigned.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Total number of keys across all shards.
    pub fn key_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }
}

impl<K> IntoIterator for ShardAssignment<K> {
    type Item = (ShardId, Vec<K>);
    type IntoIter = btree_map::IntoIter<ShardId, Vec<K>>;

    fn into_iter(self) -> Self::IntoIter {
        self.buckets.into_iter()
    }
}

/// Raw membership answer of a single shard.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardReport {
    /// Shard that answered.
    pub shard: ShardName,
    /// Keys routed to the shard, in input order.
    pub keys: Vec<String>,
    /// `hits[i]` answers `keys[i]`.
    pub hits: Vec<bool>,
}

impl ShardReport {
    /// True if any routed key was reported present.
    pub fn any(&self) -> bool {
        self.hits.iter().any(|hit| *hit)
    }

    /// True if every routed key was reported present.
    pub fn all(&self) -> bool {
        self.hits.iter().all(|hit| *hit)
    }
}
