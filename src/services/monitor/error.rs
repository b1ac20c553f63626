//! Event monitor error types.

use thiserror::Error;

use crate::services::blockchain::BlockChainError;

/// Errors raised by an [`EventMonitor`](super::EventMonitor)
#[derive(Debug, Error)]
pub enum MonitorError {
	/// The contract ABI of the network does not declare the event
	#[error("Event {event} not found in the contract ABI on {network}")]
	EventNotFound { network: String, event: String },

	/// The initial filter could not be installed
	#[error("Failed to create event filter on {network}: {source}")]
	FilterCreation {
		network: String,
		#[source]
		source: BlockChainError,
	},

	/// Polling failed and a fresh filter replaced the old one
	///
	/// Events emitted between the last successful poll and the new filter are not seen.
	#[error("Event filter on {network} recreated after poll error: {source}")]
	FilterRecreated {
		network: String,
		#[source]
		source: BlockChainError,
	},

	/// No filter is installed for this cycle, creation is retried on the next poll
	#[error("Event filter on {network} unavailable: {source}")]
	FilterUnavailable {
		network: String,
		#[source]
		source: BlockChainError,
	},
}

impl MonitorError {
	pub fn network(&self) -> &str {
		match self {
			Self::EventNotFound { network, .. }
			| Self::FilterCreation { network, .. }
			| Self::FilterRecreated { network, .. }
			| Self::FilterUnavailable { network, .. } => network,
		}
	}
}
