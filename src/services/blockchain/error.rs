//! Blockchain error types.
//!
//! Errors raised while talking to a chain: connectivity, malformed requests or responses,
//! and transaction submission.

use thiserror::Error;

/// Represents possible errors that can occur during blockchain operations
#[derive(Debug, Error)]
pub enum BlockChainError {
	/// Errors related to network connectivity issues
	#[error("Connection error: {0}")]
	ConnectionError(String),

	/// Errors related to malformed requests or invalid responses
	#[error("Request error: {0}")]
	RequestError(String),

	/// Errors related to transaction processing
	#[error("Transaction error: {0}")]
	TransactionError(String),

	/// Internal errors within the blockchain client
	#[error("Internal error: {0}")]
	InternalError(String),
}

impl BlockChainError {
	pub fn connection_error(msg: impl Into<String>) -> Self {
		Self::ConnectionError(msg.into())
	}

	pub fn request_error(msg: impl Into<String>) -> Self {
		Self::RequestError(msg.into())
	}

	pub fn transaction_error(msg: impl Into<String>) -> Self {
		Self::TransactionError(msg.into())
	}

	pub fn internal_error(msg: impl Into<String>) -> Self {
		Self::InternalError(msg.into())
	}
}

impl From<serde_json::Error> for BlockChainError {
	fn from(err: serde_json::Error) -> Self {
		Self::request_error(format!("Failed to parse response: {}", err))
	}
}
