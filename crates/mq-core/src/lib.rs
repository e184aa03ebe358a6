//! mq-core: shared errors, configuration, and catalog types.
//!
//! This crate is the foundational dependency for the other mq-* crates. It
//! carries no I/O beyond reading the configuration file.

pub mod catalog;
pub mod config;
pub mod error;

// Re-export the most commonly used items at the crate root.
pub use catalog::{AssetDescriptor, GroupKey, BARE_GROUP};
pub use error::{Error, Result};
