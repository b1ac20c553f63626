//! Configuration loading and validation.
//!
//! The relay is configured from a single JSON document describing the two networks, the
//! signing key and the engine timings. The parsed [`BridgeConfig`] is immutable and is
//! handed to the components that need it at construction.

mod bridge_config;
mod error;

pub use bridge_config::{BridgeConfig, NetworkConfig, SigningKey};
pub use error::ConfigError;
