//! Engine error types.

use thiserror::Error;

use crate::{models::ConfigError, services::blockchain::ConnectionError};

#[derive(Debug, Error)]
pub enum EngineError {
	/// Fewer than two networks could be connected
	#[error("Bridge needs two active networks, found {found}")]
	InsufficientNetworks { found: usize },

	#[error("Invalid network set: {0}")]
	Networks(#[from] ConnectionError),

	/// Setup produced no event monitor at all
	#[error("No event monitor could be started")]
	NoActiveMonitors,

	/// The release worker stopped taking requests
	#[error("Release queue closed")]
	QueueClosed,

	/// Deposits may still be detected but none can be released
	#[error("Release worker stopped, detected deposits can no longer be released")]
	ReleaseWorkerStopped,

	#[error("Configuration error: {0}")]
	Config(#[from] ConfigError),
}
