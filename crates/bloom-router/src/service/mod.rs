//! Service Layer
//!
//! Orchestrates the per-shard fan-out behind the router:
//! provisioning at construction, membership queries and bulk loads.

pub mod bulk_loader;
pub mod dispatch;
pub mod provisioner;
pub mod query;
pub mod router;

pub use bulk_loader::BulkLoader;
pub use dispatch::Dispatcher;
pub use provisioner::FilterProvisioner;
pub use query::QueryAggregator;
pub use router::BloomRouter;
