//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implements the outbound `FilterClient` port.
//!
//! ## Adapters
//!
//! - `InMemoryFilterClient` - exact key sets per filter, with fault injection
//! - `InMemoryConnector` - hands out a shared `InMemoryFilterClient`

mod in_memory;

pub use in_memory::{FilterInfo, InMemoryConnector, InMemoryFilterClient};
