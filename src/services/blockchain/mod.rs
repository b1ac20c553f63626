//! Blockchain client interfaces and implementations.
//!
//! Provides the chain access the relay needs:
//!
//! - The [`BridgeClient`] trait: the read and write operations used by monitors and the
//!   release submitter
//! - An EVM implementation over a JSON-RPC transport
//! - [`NetworkConnection`]: a client bound to a bridge contract, built once at startup

mod client;
mod clients;
mod connection;
mod error;
mod transports;

pub use client::BridgeClient;
pub use clients::EvmClient;
pub use connection::{
	load_abi, ConnectionError, ContractBinding, EventSchema, NetworkConnection, NetworkPair,
};
pub use error::BlockChainError;
pub use transports::{AlloyTransportClient, BlockchainTransport};
