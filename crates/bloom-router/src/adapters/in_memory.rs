//! In-Memory Filter Client Adapter
//!
//! Implements the `FilterClient` port with exact per-filter key sets.
//! Used in tests and local development in place of a real filter server.
//! Supports fault injection: unreachable filters and slow filters.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::domain::{ClientError, ServerAddress};
use crate::ports::{FilterClient, FilterClientConnector};

/// Creation parameters and size of a stored filter.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterInfo {
    /// Capacity requested at creation.
    pub capacity: u64,
    /// Error probability requested at creation.
    pub error_probability: Option<f64>,
    /// Memory-only flag requested at creation.
    pub in_memory: bool,
    /// Distinct keys stored.
    pub size: usize,
}

struct StoredFilter {
    capacity: u64,
    error_probability: Option<f64>,
    in_memory: bool,
    keys: HashSet<String>,
}

#[derive(Default)]
struct Inner {
    filters: RwLock<HashMap<String, StoredFilter>>,
    unavailable: RwLock<HashSet<String>>,
    latency: RwLock<HashMap<String, Duration>>,
    reject_existing: AtomicBool,
    create_calls: AtomicU64,
    check_calls: AtomicU64,
    add_calls: AtomicU64,
}

/// In-memory filter server.
///
/// Clones share the same state, so a test can keep a handle while the router
/// owns another.
#[derive(Clone, Default)]
pub struct InMemoryFilterClient {
    inner: Arc<Inner>,
}

impl InMemoryFilterClient {
    /// Create an empty server.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `AlreadyExists` when creating a filter that exists.
    pub fn reject_existing(self) -> Self {
        self.inner.reject_existing.store(true, Ordering::Relaxed);
        self
    }

    /// Make every call on `name` fail with a connection error.
    pub fn fail_filter(&self, name: &str) {
        self.inner.unavailable.write().insert(name.to_string());
    }

    /// Undo [`fail_filter`](Self::fail_filter).
    pub fn restore_filter(&self, name: &str) {
        self.inner.unavailable.write().remove(name);
    }

    /// Delay every call on `name` by `delay`.
    pub fn set_latency(&self, name: &str, delay: Duration) {
        self.inner.latency.write().insert(name.to_string(), delay);
    }

    /// Names of all stored filters, sorted.
    pub fn filter_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.inner.filters.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Creation parameters and size of `name`.
    pub fn filter_info(&self, name: &str) -> Option<FilterInfo> {
        self.inner.filters.read().get(name).map(|f| FilterInfo {
            capacity: f.capacity,
            error_probability: f.error_probability,
            in_memory: f.in_memory,
            size: f.keys.len(),
        })
    }

    /// True if `key` is stored in `name`.
    pub fn contains(&self, name: &str, key: &str) -> bool {
        self.inner
            .filters
            .read()
            .get(name)
            .map(|f| f.keys.contains(key))
            .unwrap_or(false)
    }

    /// Number of create calls received.
    pub fn create_calls(&self) -> u64 {
        self.inner.create_calls.load(Ordering::Relaxed)
    }

    /// Number of multi-check calls received.
    pub fn check_calls(&self) -> u64 {
        self.inner.check_calls.load(Ordering::Relaxed)
    }

    /// Number of bulk-add calls received.
    pub fn add_calls(&self) -> u64 {
        self.inner.add_calls.load(Ordering::Relaxed)
    }

    /// Apply injected latency and failures for `name`.
    async fn enter(&self, name: &str) -> Result<(), ClientError> {
        let delay = self.inner.latency.read().get(name).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.inner.unavailable.read().contains(name) {
            return Err(ClientError::Connection(format!("{} is unreachable", name)));
        }

        Ok(())
    }
}

#[async_trait]
impl FilterClient for InMemoryFilterClient {
    async fn create_filter(
        &self,
        name: &str,
        capacity: u64,
        error_probability: Option<f64>,
        in_memory: bool,
    ) -> Result<(), ClientError> {
        self.inner.create_calls.fetch_add(1, Ordering::Relaxed);
        self.enter(name).await?;

        let mut filters = self.inner.filters.write();
        if filters.contains_key(name) {
            if self.inner.reject_existing.load(Ordering::Relaxed) {
                return Err(ClientError::AlreadyExists(name.to_string()));
            }
            return Ok(());
        }

        debug!(filter = name, capacity, "[bloom-router] In-memory filter created");
        filters.insert(
            name.to_string(),
            StoredFilter {
                capacity,
                error_probability,
                in_memory,
                keys: HashSet::new(),
            },
        );
        Ok(())
    }

    async fn multi_check(&self, name: &str, keys: &[String]) -> Result<Vec<bool>, ClientError> {
        self.inner.check_calls.fetch_add(1, Ordering::Relaxed);
        self.enter(name).await?;

        let filters = self.inner.filters.read();
        let filter = filters
            .get(name)
            .ok_or_else(|| ClientError::FilterNotFound(name.to_string()))?;

        Ok(keys.iter().map(|k| filter.keys.contains(k)).collect())
    }

    async fn bulk_add(&self, name: &str, keys: &[String]) -> Result<(), ClientError> {
        self.inner.add_calls.fetch_add(1, Ordering::Relaxed);
        self.enter(name).await?;

        let mut filters = self.inner.filters.write();
        let filter = filters
            .get_mut(name)
            .ok_or_else(|| ClientError::FilterNotFound(name.to_string()))?;

        filter.keys.extend(keys.iter().cloned());
        Ok(())
    }
}

/// Connector handing out a shared [`InMemoryFilterClient`].
#[derive(Clone, Default)]
pub struct InMemoryConnector {
    client: InMemoryFilterClient,
    refuse: bool,
}

impl InMemoryConnector {
    /// Connector that always returns `client`.
    pub fn new(client: InMemoryFilterClient) -> Self {
        Self {
            client,
            refuse: false,
        }
    }

    /// Connector whose connection attempts are refused.
    pub fn refusing() -> Self {
        Self {
            client: InMemoryFilterClient::new(),
            refuse: true,
        }
    }
}

#[async_trait]
impl FilterClientConnector for InMemoryConnector {
    type Client = InMemoryFilterClient;

    async fn connect(&self, servers: &[ServerAddress]) -> Result<Self::Client, ClientError> {
        if self.refuse || servers.is_empty() {
            return Err(ClientError::Connection(format!(
                "connection refused by {:?}",
                servers.iter().map(ToString::to_string).collect::<Vec<_>>()
            )));
        }

        debug!(servers = servers.len(), "[bloom-router] In-memory client connected");
        Ok(self.client.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_create_add_check() {
        let client = InMemoryFilterClient::new();
        client.create_filter("f", 100, None, false).await.unwrap();
        client.bulk_add("f", &keys(&["a", "b"])).await.unwrap();

        let hits = client.multi_check("f", &keys(&["a", "x", "b"])).await.unwrap();
        assert_eq!(hits, vec![true, false, true]);
        assert_eq!(client.filter_info("f").unwrap().size, 2);
    }

    #[tokio::test]
    async fn test_create_if_absent_keeps_keys() {
        let client = InMemoryFilterClient::new();
        client.create_filter("f", 100, None, false).await.unwrap();
        client.bulk_add("f", &keys(&["a"])).await.unwrap();
        client.create_filter("f", 100, None, false).await.unwrap();

        assert!(client.contains("f", "a"));
    }

    #[tokio::test]
    async fn test_reject_existing() {
        let client = InMemoryFilterClient::new().reject_existing();
        client.create_filter("f", 100, None, false).await.unwrap();
        let result = client.create_filter("f", 100, None, false).await;
        assert_eq!(result, Err(ClientError::AlreadyExists("f".to_string())));
    }

    #[tokio::test]
    async fn test_missing_filter() {
        let client = InMemoryFilterClient::new();
        let result = client.multi_check("nope", &keys(&["a"])).await;
        assert!(matches!(result, Err(ClientError::FilterNotFound(_))));
        let result = client.bulk_add("nope", &keys(&["a"])).await;
        assert!(matches!(result, Err(ClientError::FilterNotFound(_))));
    }

    #[tokio::test]
    async fn test_fail_and_restore() {
        let client = InMemoryFilterClient::new();
        client.create_filter("f", 100, None, false).await.unwrap();
        client.fail_filter("f");
        assert!(matches!(
            client.multi_check("f", &keys(&["a"])).await,
            Err(ClientError::Connection(_))
        ));
        client.restore_filter("f");
        assert!(client.multi_check("f", &keys(&["a"])).await.is_ok());
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let client = InMemoryFilterClient::new();
        let other = client.clone();
        other.create_filter("shared", 10, None, true).await.unwrap();
        assert_eq!(client.filter_names(), vec!["shared"]);
    }

    #[tokio::test]
    async fn test_connector() {
        let client = InMemoryFilterClient::new();
        let connector = InMemoryConnector::new(client.clone());
        let connected = connector
            .connect(&[ServerAddress::new("localhost")])
            .await
            .unwrap();
        connected.create_filter("c", 1, None, false).await.unwrap();
        assert_eq!(client.filter_names(), vec!["c"]);

        let refused = InMemoryConnector::refusing()
            .connect(&[ServerAddress::new("localhost")])
            .await;
        assert!(matches!(refused, Err(ClientError::Connection(_))));
    }
}
