//! # Outbound Ports
//!
//! The remote filter service the router fans out to.
//!
//! These traits are the whole contract with the filter server. How the server
//! stores or computes membership, and how the client talks to it, stays behind
//! them.

use async_trait::async_trait;

use crate::domain::{ClientError, ServerAddress};

/// Remote filter service client (Driven Port)
///
/// One handle is shared by every concurrent shard call, so implementations
/// must be usable through `&self`.
#[async_trait]
pub trait FilterClient: Send + Sync {
    /// Create a filter if it does not exist yet.
    ///
    /// Implementations may answer `ClientError::AlreadyExists` for an existing
    /// filter; the router treats that as success.
    async fn create_filter(
        &self,
        name: &str,
        capacity: u64,
        error_probability: Option<f64>,
        in_memory: bool,
    ) -> Result<(), ClientError>;

    /// Check several keys at once.
    ///
    /// The answer is positionally aligned with `keys`.
    async fn multi_check(&self, name: &str, keys: &[String]) -> Result<Vec<bool>, ClientError>;

    /// Add several keys at once.
    async fn bulk_add(&self, name: &str, keys: &[String]) -> Result<(), ClientError>;
}

/// Opens a [`FilterClient`] for a set of servers (Driven Port)
#[async_trait]
pub trait FilterClientConnector: Send + Sync {
    /// Client type produced by this connector.
    type Client: FilterClient + 'static;

    /// Connect to `servers`.
    async fn connect(&self, servers: &[ServerAddress]) -> Result<Self::Client, ClientError>;
}
