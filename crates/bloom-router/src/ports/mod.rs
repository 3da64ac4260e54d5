//! Ports Layer
//!
//! Defines the interfaces (traits) for:
//! - Driving Ports (inbound) - API for callers of the router
//! - Driven Ports (outbound) - the remote filter service

pub mod inbound;
pub mod outbound;

pub use inbound::ShardedFilterApi;
pub use outbound::{FilterClient, FilterClientConnector};
