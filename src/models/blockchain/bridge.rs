//! Bridge contract bindings and the records that flow between the two networks.
//!
//! A [`DepositEvent`] is the normalized form of a `Deposited` log observed on the source
//! network. It is turned into [`ReleaseParams`], which encode into a `release` call on the
//! target network. The outcome of that call is reported as a [`ReleaseOutcome`].

use alloy::{
	primitives::{Address, Bytes, B256, U256},
	sol,
};
use std::fmt;

sol! {
	/// Emitted by the bridge contract when value is locked for the paired network.
	#[derive(Debug, PartialEq, Eq)]
	event Deposited(
		bytes id,
		address msg_sender,
		uint256 amount,
		uint256 nonce,
		uint256 sourceChainId,
		uint256 blockNumber
	);

	/// Credits a deposit made on the paired network to `to`.
	#[derive(Debug, PartialEq, Eq)]
	function release(bytes id, address to, uint256 amount, uint256 sourceChainId);
}

/// A deposit observed on a source network
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositEvent {
	/// Deposit identifier, also used to correlate the release with its deposit
	pub deposit_id: Bytes,
	/// Account that made the deposit and receives the release
	pub depositor: Address,
	/// Amount in the chain-native precision
	pub amount: U256,
	/// Application-level deposit nonce, unrelated to transaction nonces
	pub nonce: U256,
	/// Chain id reported by the source contract
	pub source_chain_id: U256,
	/// Block number reported by the source contract
	pub source_block_number: U256,
	/// Name of the network the log was observed on
	pub source_network: String,
	/// Hash of the transaction that emitted the log, when the node reports it
	pub transaction_hash: Option<B256>,
}

impl DepositEvent {
	/// Builds a deposit record from a decoded `Deposited` event
	pub fn from_event(
		event: Deposited,
		source_network: impl Into<String>,
		transaction_hash: Option<B256>,
	) -> Self {
		Self {
			deposit_id: event.id,
			depositor: event.msg_sender,
			amount: event.amount,
			nonce: event.nonce,
			source_chain_id: event.sourceChainId,
			source_block_number: event.blockNumber,
			source_network: source_network.into(),
			transaction_hash,
		}
	}

	/// Parameters of the `release` call that settles this deposit
	pub fn release_params(&self) -> ReleaseParams {
		ReleaseParams {
			deposit_id: self.deposit_id.clone(),
			recipient: self.depositor,
			amount: self.amount,
			source_chain_id: self.source_chain_id,
		}
	}
}

/// Arguments of a `release` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseParams {
	pub deposit_id: Bytes,
	pub recipient: Address,
	pub amount: U256,
	pub source_chain_id: U256,
}

impl ReleaseParams {
	/// Typed contract call for these parameters
	pub fn to_call(&self) -> releaseCall {
		releaseCall {
			id: self.deposit_id.clone(),
			to: self.recipient,
			amount: self.amount,
			sourceChainId: self.source_chain_id,
		}
	}
}

/// The parts of a transaction receipt the relay acts on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReleaseReceipt {
	pub transaction_hash: B256,
	pub block_number: Option<u64>,
	/// `true` when the receipt status is 1
	pub success: bool,
}

/// Terminal result of a broadcast release transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
	/// Included with a success status
	Confirmed(ReleaseReceipt),
	/// Included but reverted
	Reverted(ReleaseReceipt),
}

impl ReleaseOutcome {
	pub fn receipt(&self) -> &ReleaseReceipt {
		match self {
			Self::Confirmed(receipt) | Self::Reverted(receipt) => receipt,
		}
	}

	pub fn is_success(&self) -> bool {
		matches!(self, Self::Confirmed(_))
	}
}

impl fmt::Display for ReleaseOutcome {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Confirmed(receipt) => write!(f, "confirmed ({})", receipt.transaction_hash),
			Self::Reverted(receipt) => write!(f, "reverted ({})", receipt.transaction_hash),
		}
	}
}
