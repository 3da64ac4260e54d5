//! # Domain Module
//!
//! Core domain types for the bloom router.
//!
//! RULES:
//! - No I/O operations
//! - No async code

pub mod config;
pub mod errors;
pub mod invariants;
pub mod value_objects;

pub use config::*;
pub use errors::*;
pub use invariants::*;
pub use value_objects::*;
