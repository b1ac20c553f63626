//! Deposit handler error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HandlerError {
	/// The log does not decode as a complete `Deposited` event
	#[error("Malformed deposit event on {network}: {reason}")]
	MalformedEvent { network: String, reason: String },

	/// The source contract ABI has no usable `Deposited` entry to decode with
	#[error("Deposited is not declared in the ABI of {network}")]
	EventNotDeclared { network: String },

	/// The log came from a network outside the bridge pair
	#[error("Unknown source network: {0}")]
	UnknownSourceNetwork(String),
}

impl HandlerError {
	pub fn network(&self) -> &str {
		match self {
			Self::MalformedEvent { network, .. } => network,
			Self::EventNotDeclared { network } => network,
			Self::UnknownSourceNetwork(network) => network,
		}
	}
}
