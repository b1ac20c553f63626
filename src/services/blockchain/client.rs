//! Chain access interface used by the relay.
//!
//! Event monitors only read (filters), the release submitter reads account state and writes
//! signed transactions. Keeping both behind one trait lets a network be mocked as a whole.

use alloy::{
	primitives::{Address, Bytes, B256, U256},
	rpc::types::{Filter, Log},
};
use async_trait::async_trait;

use crate::{models::ReleaseReceipt, services::blockchain::BlockChainError};

/// Read and write operations on one chain
#[async_trait]
pub trait BridgeClient: Send + Sync {
	/// Chain id reported by the node
	async fn get_chain_id(&self) -> Result<u64, BlockChainError>;

	/// Installs a log filter on the node and returns its id
	async fn new_filter(&self, filter: &Filter) -> Result<U256, BlockChainError>;

	/// Logs matched by the filter since it was created or last polled
	async fn get_filter_changes(&self, filter_id: U256) -> Result<Vec<Log>, BlockChainError>;

	/// Removes a filter from the node, returns whether it existed
	async fn uninstall_filter(&self, filter_id: U256) -> Result<bool, BlockChainError>;

	/// Number of transactions sent from `address` as of the latest block
	async fn get_transaction_count(&self, address: Address) -> Result<u64, BlockChainError>;

	/// Current gas price in wei
	async fn get_gas_price(&self) -> Result<u128, BlockChainError>;

	/// Broadcasts a signed, EIP-2718 encoded transaction and returns its hash
	async fn send_raw_transaction(&self, raw: Bytes) -> Result<B256, BlockChainError>;

	/// Receipt of a transaction, `None` while it is not included yet
	async fn get_transaction_receipt(
		&self,
		transaction_hash: B256,
	) -> Result<Option<ReleaseReceipt>, BlockChainError>;
}
