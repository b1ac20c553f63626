//! Release submission error types.

use alloy::primitives::B256;
use thiserror::Error;

use crate::services::blockchain::BlockChainError;

/// Errors that end a release attempt before a receipt was obtained
///
/// A reverted transaction is not an error here, it is reported as
/// [`ReleaseOutcome::Reverted`](crate::models::ReleaseOutcome::Reverted).
#[derive(Debug, Error)]
pub enum ReleaseError {
	#[error("Contract on {network} does not declare release")]
	ReleaseNotInAbi { network: String },

	#[error("Failed to fetch nonce on {network}: {source}")]
	Nonce {
		network: String,
		#[source]
		source: BlockChainError,
	},

	#[error("Failed to fetch gas price on {network}: {source}")]
	GasPrice {
		network: String,
		#[source]
		source: BlockChainError,
	},

	#[error("Failed to sign release for {network}: {reason}")]
	Signing { network: String, reason: String },

	#[error("Failed to broadcast release on {network}: {source}")]
	Broadcast {
		network: String,
		#[source]
		source: BlockChainError,
	},

	#[error("Failed to get receipt of {transaction_hash} on {network}: {source}")]
	Receipt {
		network: String,
		transaction_hash: B256,
		#[source]
		source: BlockChainError,
	},
}

impl ReleaseError {
	/// Target network of the failed release
	pub fn network(&self) -> &str {
		match self {
			Self::ReleaseNotInAbi { network }
			| Self::Nonce { network, .. }
			| Self::GasPrice { network, .. }
			| Self::Signing { network, .. }
			| Self::Broadcast { network, .. }
			| Self::Receipt { network, .. } => network,
		}
	}
}
