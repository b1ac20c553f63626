use alloy::{
	dyn_abi::DynSolValue,
	primitives::{Bytes, U256},
	rpc::types::Log,
};
use std::sync::Arc;

use crate::{
	models::{DepositEvent, Deposited},
	services::{
		blockchain::{NetworkConnection, NetworkPair},
		handler::HandlerError,
	},
	utils::{
		constants::DEPOSIT_EVENT_NAME,
		metrics::{DEPOSITS_OBSERVED, DEPOSITS_REJECTED},
	},
};

/// A deposit and the network its release goes to
#[derive(Debug, Clone)]
pub struct ReleaseRequest {
	pub deposit: DepositEvent,
	pub target: Arc<NetworkConnection>,
}

/// Maps deposit logs of one network to releases on the other
#[derive(Debug, Clone)]
pub struct DepositHandler {
	networks: NetworkPair,
}

impl DepositHandler {
	pub fn new(networks: NetworkPair) -> Self {
		Self { networks }
	}

	pub fn networks(&self) -> &NetworkPair {
		&self.networks
	}

	/// Decodes a `Deposited` log observed on `source`
	///
	/// The log is decoded with the source contract's ABI, so parameters the contract
	/// declares as indexed are read from the topics. Every field of the event must be
	/// present; a short or otherwise undecodable payload is rejected and nothing is
	/// released for it. No deduplication happens here, the same log handled twice yields
	/// two requests.
	///
	/// # Errors
	/// - `HandlerError::UnknownSourceNetwork` if `source` is not one of the pair
	/// - `HandlerError::EventNotDeclared` if the source ABI has no `Deposited` entry
	/// - `HandlerError::MalformedEvent` if the log cannot be decoded
	pub fn handle(&self, log: &Log, source: &str) -> Result<ReleaseRequest, HandlerError> {
		let (origin, target) = self
			.networks
			.get(source)
			.zip(self.networks.counterpart(source))
			.ok_or_else(|| HandlerError::UnknownSourceNetwork(source.to_string()))?;

		let schema = origin
			.contract()
			.event_schema(DEPOSIT_EVENT_NAME)
			.ok_or_else(|| HandlerError::EventNotDeclared {
				network: source.to_string(),
			})?;

		let event = schema
			.decode(&log.inner.data)
			.and_then(deposited_from_values)
			.map_err(|reason| {
				DEPOSITS_REJECTED.with_label_values(&[source]).inc();
				HandlerError::MalformedEvent {
					network: source.to_string(),
					reason,
				}
			})?;

		DEPOSITS_OBSERVED.with_label_values(&[source]).inc();

		Ok(ReleaseRequest {
			deposit: DepositEvent::from_event(event, source, log.transaction_hash),
			target: Arc::clone(target),
		})
	}
}

/// Rebuilds the typed event from values in declaration order
fn deposited_from_values(values: Vec<DynSolValue>) -> Result<Deposited, String> {
	let [id, msg_sender, amount, nonce, source_chain_id, block_number]: [DynSolValue; 6] = values
		.try_into()
		.map_err(|values: Vec<_>| format!("expected 6 values, decoded {}", values.len()))?;

	Ok(Deposited {
		id: bytes_value(id, "id")?,
		msg_sender: msg_sender
			.as_address()
			.ok_or("msg_sender is not an address")?,
		amount: uint_value(amount, "amount")?,
		nonce: uint_value(nonce, "nonce")?,
		sourceChainId: uint_value(source_chain_id, "sourceChainId")?,
		blockNumber: uint_value(block_number, "blockNumber")?,
	})
}

/// An indexed `bytes` parameter only carries its hash, which is used as the id
fn bytes_value(value: DynSolValue, name: &str) -> Result<Bytes, String> {
	match value {
		DynSolValue::Bytes(bytes) => Ok(bytes.into()),
		DynSolValue::FixedBytes(word, size) => Ok(Bytes::copy_from_slice(&word[..size])),
		other => Err(format!("{} is not bytes: {:?}", name, other)),
	}
}

fn uint_value(value: DynSolValue, name: &str) -> Result<U256, String> {
	value
		.as_uint()
		.map(|(value, _)| value)
		.ok_or_else(|| format!("{} is not an unsigned integer", name))
}
