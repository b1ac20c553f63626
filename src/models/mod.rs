//! Domain models and data structures for the deposit relay.
//!
//! - `blockchain`: Bridge contract bindings and the deposit/release records built from them
//! - `config`: Configuration loading and validation

mod blockchain;
mod config;

pub use blockchain::bridge::{
	DepositEvent, Deposited, ReleaseOutcome, ReleaseParams, ReleaseReceipt, releaseCall,
};

pub use config::{BridgeConfig, ConfigError, NetworkConfig, SigningKey};
