//! Network transport implementations for blockchain clients.
//!
//! The transport only moves JSON-RPC requests; interpreting results is left to the clients.

mod evm {
	pub mod alloy;
}

pub use evm::alloy::AlloyTransportClient;

use serde_json::Value;

use crate::services::blockchain::BlockChainError;

/// Base trait for all blockchain transport clients
#[async_trait::async_trait]
pub trait BlockchainTransport: Send + Sync {
	/// Get the URL being used by the transport
	async fn get_current_url(&self) -> String;

	/// Send a raw JSON-RPC request and return its `result`
	async fn send_raw_request(&self, method: &str, params: Value)
		-> Result<Value, BlockChainError>;
}
