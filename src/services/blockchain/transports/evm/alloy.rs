//! Alloy transport implementation for EVM blockchain interactions.
//!
//! This module provides a client implementation for interacting with EVM-compatible nodes
//! via alloy, supporting a connectivity check at construction and raw JSON-RPC requests.

use alloy::rpc::client::{ClientBuilder, RpcClient};
use serde_json::Value;
use url::Url;

use crate::services::blockchain::{transports::BlockchainTransport, BlockChainError};

/// A client for interacting with EVM-compatible blockchain nodes via alloy
#[derive(Clone, Debug)]
pub struct AlloyTransportClient {
	/// The underlying alloy client for RPC requests
	client: RpcClient,
	/// Endpoint the client was built for
	url: String,
}

impl AlloyTransportClient {
	/// Creates a new alloy transport client
	///
	/// The endpoint must answer `net_version`; a node that does not is reported as a
	/// connection error.
	///
	/// # Arguments
	/// * `rpc_url` - HTTP(S) JSON-RPC endpoint
	///
	/// # Returns
	/// * `Result<Self, BlockChainError>` - A new client instance or connection error
	pub async fn new(rpc_url: &str) -> Result<Self, BlockChainError> {
		let url = Url::parse(rpc_url).map_err(|e| {
			BlockChainError::connection_error(format!("Invalid RPC URL {}: {}", rpc_url, e))
		})?;

		let client = ClientBuilder::default().http(url);
		client
			.request_noparams::<String>("net_version")
			.await
			.map_err(|e| {
				BlockChainError::connection_error(format!(
					"Failed to connect to {}: {}",
					rpc_url, e
				))
			})?;

		Ok(Self {
			client,
			url: rpc_url.to_string(),
		})
	}
}

#[async_trait::async_trait]
impl BlockchainTransport for AlloyTransportClient {
	async fn get_current_url(&self) -> String {
		self.url.clone()
	}

	/// Sends a raw JSON-RPC request to the EVM node
	///
	/// # Arguments
	/// * `method` - The JSON-RPC method to call
	/// * `params` - Positional parameters, as a JSON array
	///
	/// # Returns
	/// * `Result<Value, BlockChainError>` - The `result` member of the response or error
	async fn send_raw_request(
		&self,
		method: &str,
		params: Value,
	) -> Result<Value, BlockChainError> {
		self.client
			.request::<Value, Value>(method.to_string(), params)
			.await
			.map_err(|e| BlockChainError::request_error(format!("{} failed: {}", method, e)))
	}
}
