//! EVM-compatible blockchain client implementation.
//!
//! This module provides the [`BridgeClient`] operations for Ethereum and other EVM-compatible
//! chains on top of raw JSON-RPC requests.

use alloy::{
	primitives::{Address, Bytes, B256, U256},
	rpc::types::{Filter, Log},
};
use async_trait::async_trait;
use serde_json::{json, Value};

use crate::{
	models::ReleaseReceipt,
	services::blockchain::{
		client::BridgeClient,
		transports::{AlloyTransportClient, BlockchainTransport},
		BlockChainError,
	},
};

/// Client implementation for Ethereum Virtual Machine (EVM) compatible blockchains
#[derive(Clone, Debug)]
pub struct EvmClient<T: Send + Sync + Clone> {
	/// The underlying transport client for RPC communication
	transport: T,
}

impl<T: Send + Sync + Clone> EvmClient<T> {
	/// Creates a new EVM client instance with a specific transport client
	pub fn new_with_transport(transport: T) -> Self {
		Self { transport }
	}
}

impl EvmClient<AlloyTransportClient> {
	/// Creates a new EVM client connected to `rpc_url`
	///
	/// # Returns
	/// * `Result<Self, BlockChainError>` - New client instance or connection error
	pub async fn new(rpc_url: &str) -> Result<Self, BlockChainError> {
		let transport = AlloyTransportClient::new(rpc_url).await?;
		Ok(Self::new_with_transport(transport))
	}
}

/// Parses a `0x`-prefixed quantity
fn parse_quantity(value: &Value, what: &str) -> Result<u128, BlockChainError> {
	let hex_str = value.as_str().ok_or_else(|| {
		BlockChainError::request_error(format!("Expected hex string for {}, got {}", what, value))
	})?;

	u128::from_str_radix(hex_str.trim_start_matches("0x"), 16).map_err(|e| {
		BlockChainError::request_error(format!("Failed to parse {} ({}): {}", what, hex_str, e))
	})
}

fn parse_u64_quantity(value: &Value, what: &str) -> Result<u64, BlockChainError> {
	let quantity = parse_quantity(value, what)?;
	u64::try_from(quantity).map_err(|_| {
		BlockChainError::request_error(format!("{} out of range: {}", what, quantity))
	})
}

#[async_trait]
impl<T: Send + Sync + Clone + BlockchainTransport> BridgeClient for EvmClient<T> {
	async fn get_chain_id(&self) -> Result<u64, BlockChainError> {
		let result = self.transport.send_raw_request("eth_chainId", json!([])).await?;
		parse_u64_quantity(&result, "chain id")
	}

	async fn new_filter(&self, filter: &Filter) -> Result<U256, BlockChainError> {
		let result = self
			.transport
			.send_raw_request("eth_newFilter", json!([filter]))
			.await?;

		Ok(serde_json::from_value(result)?)
	}

	/// Logs come back in the order the node reports them, which is chain order
	async fn get_filter_changes(&self, filter_id: U256) -> Result<Vec<Log>, BlockChainError> {
		let result = self
			.transport
			.send_raw_request("eth_getFilterChanges", json!([filter_id]))
			.await?;

		if result.is_null() {
			return Ok(Vec::new());
		}

		Ok(serde_json::from_value(result)?)
	}

	async fn uninstall_filter(&self, filter_id: U256) -> Result<bool, BlockChainError> {
		let result = self
			.transport
			.send_raw_request("eth_uninstallFilter", json!([filter_id]))
			.await?;

		Ok(result.as_bool().unwrap_or(false))
	}

	async fn get_transaction_count(&self, address: Address) -> Result<u64, BlockChainError> {
		let result = self
			.transport
			.send_raw_request("eth_getTransactionCount", json!([address, "latest"]))
			.await?;

		parse_u64_quantity(&result, "transaction count")
	}

	async fn get_gas_price(&self) -> Result<u128, BlockChainError> {
		let result = self
			.transport
			.send_raw_request("eth_gasPrice", json!([]))
			.await?;

		parse_quantity(&result, "gas price")
	}

	async fn send_raw_transaction(&self, raw: Bytes) -> Result<B256, BlockChainError> {
		let result = self
			.transport
			.send_raw_request("eth_sendRawTransaction", json!([raw]))
			.await
			.map_err(|e| BlockChainError::transaction_error(e.to_string()))?;

		Ok(serde_json::from_value(result)?)
	}

	/// Reads the status, block number and hash of a receipt
	///
	/// # Errors
	/// - Returns `BlockChainError::RequestError` if the receipt has no `status` field
	///   (pre-Byzantium receipts carry a state root instead)
	async fn get_transaction_receipt(
		&self,
		transaction_hash: B256,
	) -> Result<Option<ReleaseReceipt>, BlockChainError> {
		let receipt = self
			.transport
			.send_raw_request("eth_getTransactionReceipt", json!([transaction_hash]))
			.await?;

		if receipt.is_null() {
			return Ok(None);
		}

		let status = receipt
			.get("status")
			.ok_or_else(|| BlockChainError::request_error("Receipt is missing 'status'"))?;
		let success = parse_quantity(status, "receipt status")? == 1;

		let block_number = match receipt.get("blockNumber") {
			Some(value) if !value.is_null() => Some(parse_u64_quantity(value, "block number")?),
			_ => None,
		};

		let transaction_hash = match receipt.get("transactionHash") {
			Some(value) if !value.is_null() => serde_json::from_value(value.clone())?,
			_ => transaction_hash,
		};

		Ok(Some(ReleaseReceipt {
			transaction_hash,
			block_number,
			success,
		}))
	}
}
