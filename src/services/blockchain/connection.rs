//! Network connections and the bridge contract bound to them.
//!
//! A [`NetworkConnection`] is created once per configured network at startup and only
//! exists if the node answered. The contract ABI is parsed and the deposit event schema is
//! resolved at that point, so monitors never scan the ABI again.

use alloy::{
	dyn_abi::{DynSolValue, EventExt},
	json_abi::{Event, JsonAbi},
	primitives::{Address, LogData, B256},
	sol_types::{SolCall, SolEvent},
};
use serde_json::Value;
use std::{fmt, path::Path, path::PathBuf, sync::Arc};
use thiserror::Error;
use tracing::{info, warn};

use crate::{
	models::{releaseCall, Deposited, NetworkConfig},
	services::blockchain::{BlockChainError, BridgeClient, EvmClient},
	utils::constants::{DEPOSIT_EVENT_NAME, RELEASE_FUNCTION_NAME},
};

/// Errors raised while setting up a network
#[derive(Debug, Error)]
pub enum ConnectionError {
	#[error("Chain connection failed: {0}")]
	Transport(#[from] BlockChainError),

	#[error("Invalid contract: {0}")]
	InvalidContract(String),

	#[error("Failed to read ABI {}: {source}", .path.display())]
	AbiRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse ABI {}: {reason}", .path.display())]
	AbiParse { path: PathBuf, reason: String },

	#[error("Expected exactly two active networks, found {found}")]
	NetworkCount { found: usize },

	#[error("Network configured twice: {0}")]
	DuplicateNetwork(String),
}

/// An event definition resolved from a contract ABI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSchema {
	pub name: String,
	/// Canonical signature, e.g. `Deposited(bytes,address,uint256,...)`
	pub signature: String,
	/// Topic 0 of every log of this event
	pub selector: B256,
	event: Event,
}

impl EventSchema {
	/// Finds `E` in `abi`, matching on the full signature
	///
	/// Which inputs are indexed is taken from the ABI, so a contract that indexes some of
	/// the parameters still matches. Returns `None` when the ABI has no event with that
	/// name, or only variants whose signature differs from `E`.
	pub fn resolve<E: SolEvent>(abi: &JsonAbi) -> Option<Self> {
		let name = E::SIGNATURE.split('(').next().unwrap_or(E::SIGNATURE);
		let candidates = abi.event(name)?;

		let found = candidates
			.iter()
			.find(|event| event.selector() == E::SIGNATURE_HASH && !event.anonymous);

		match found {
			Some(event) => Some(Self {
				name: name.to_string(),
				signature: event.signature(),
				selector: event.selector(),
				event: event.clone(),
			}),
			None => {
				warn!(
					event = name,
					expected = E::SIGNATURE,
					"Event found in ABI with an unexpected signature"
				);
				None
			}
		}
	}

	/// Decodes `log` with the ABI layout of this event
	///
	/// Values come back in declaration order, whether they were read from a topic or from
	/// the data section. Indexed dynamic values (`bytes`, `string`) are only available as
	/// the hash stored in their topic.
	pub fn decode(&self, log: &LogData) -> Result<Vec<DynSolValue>, String> {
		let decoded = self.event.decode_log(log).map_err(|e| e.to_string())?;

		let mut indexed = decoded.indexed.into_iter();
		let mut body = decoded.body.into_iter();
		self.event
			.inputs
			.iter()
			.map(|input| {
				let value = if input.indexed {
					indexed.next()
				} else {
					body.next()
				};
				value.ok_or_else(|| format!("missing value for '{}'", input.name))
			})
			.collect()
	}
}

/// The bridge contract on one network
#[derive(Debug, Clone)]
pub struct ContractBinding {
	address: Address,
	deposit_event: Option<EventSchema>,
	release_available: bool,
}

impl ContractBinding {
	pub fn new(address: Address, abi: JsonAbi) -> Self {
		let deposit_event = EventSchema::resolve::<Deposited>(&abi);
		let release_available = abi
			.function(RELEASE_FUNCTION_NAME)
			.map(|functions| {
				functions
					.iter()
					.any(|function| function.selector().0 == releaseCall::SELECTOR)
			})
			.unwrap_or(false);

		Self {
			address,
			deposit_event,
			release_available,
		}
	}

	pub fn address(&self) -> Address {
		self.address
	}

	/// Cached schema of the event called `name`, if the contract declares it
	pub fn event_schema(&self, name: &str) -> Option<&EventSchema> {
		self.deposit_event
			.as_ref()
			.filter(|schema| schema.name == name)
	}

	/// Whether the contract declares `release(bytes,address,uint256,uint256)`
	pub fn supports_release(&self) -> bool {
		self.release_available
	}
}

/// Reads an ABI document
///
/// Accepts a bare ABI array or a build artifact object carrying the ABI under `abi`.
pub fn load_abi(path: &Path) -> Result<JsonAbi, ConnectionError> {
	let content = std::fs::read_to_string(path).map_err(|source| ConnectionError::AbiRead {
		path: path.to_path_buf(),
		source,
	})?;

	let parse_error = |reason: String| ConnectionError::AbiParse {
		path: path.to_path_buf(),
		reason,
	};

	let document: Value = serde_json::from_str(&content).map_err(|e| parse_error(e.to_string()))?;
	let abi = match document {
		Value::Object(mut artifact) => artifact
			.remove("abi")
			.ok_or_else(|| parse_error("object has no 'abi' field".to_string()))?,
		other => other,
	};

	serde_json::from_value(abi).map_err(|e| parse_error(e.to_string()))
}

/// A live chain handle plus the bridge contract bound on it
pub struct NetworkConnection {
	name: String,
	chain_id: u64,
	contract: ContractBinding,
	client: Arc<dyn BridgeClient>,
}

impl NetworkConnection {
	pub fn new(
		name: impl Into<String>,
		chain_id: u64,
		contract: ContractBinding,
		client: Arc<dyn BridgeClient>,
	) -> Self {
		Self {
			name: name.into(),
			chain_id,
			contract,
			client,
		}
	}

	/// Connects to the network's RPC endpoint and binds its bridge contract
	pub async fn connect(config: &NetworkConfig) -> Result<Self, ConnectionError> {
		let client = EvmClient::new(&config.rpc_url).await?;
		Self::connect_with_client(config, Arc::new(client)).await
	}

	/// Binds the bridge contract over an existing client
	///
	/// The node's chain id is compared to the configured one. On a mismatch the node's id
	/// is used, since releases signed for any other chain would be rejected by it.
	pub async fn connect_with_client(
		config: &NetworkConfig,
		client: Arc<dyn BridgeClient>,
	) -> Result<Self, ConnectionError> {
		let address = config
			.contract_address()
			.map_err(|e| ConnectionError::InvalidContract(e.to_string()))?;
		let contract = ContractBinding::new(address, load_abi(&config.abi_path)?);

		let remote_chain_id = client.get_chain_id().await?;
		if remote_chain_id != config.chain_id {
			warn!(
				network = %config.name,
				configured = config.chain_id,
				remote = remote_chain_id,
				"Configured chain id differs from the node's, using the node's"
			);
		}

		if contract.event_schema(DEPOSIT_EVENT_NAME).is_none() {
			warn!(network = %config.name, "Deposited event not found in ABI");
		}
		if !contract.supports_release() {
			warn!(network = %config.name, "release method not found in ABI");
		}

		info!(
			network = %config.name,
			contract = %address,
			chain_id = remote_chain_id,
			"Connected to network"
		);

		Ok(Self::new(config.name.clone(), remote_chain_id, contract, client))
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn chain_id(&self) -> u64 {
		self.chain_id
	}

	pub fn contract(&self) -> &ContractBinding {
		&self.contract
	}

	pub fn client(&self) -> &Arc<dyn BridgeClient> {
		&self.client
	}
}

impl fmt::Debug for NetworkConnection {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("NetworkConnection")
			.field("name", &self.name)
			.field("chain_id", &self.chain_id)
			.field("contract", &self.contract.address)
			.finish_non_exhaustive()
	}
}

/// The two networks of the bridge
///
/// Roles are symmetric: either network can be the source of a deposit, the other one is
/// always its target.
#[derive(Debug, Clone)]
pub struct NetworkPair {
	networks: [Arc<NetworkConnection>; 2],
}

impl NetworkPair {
	pub fn new(connections: Vec<Arc<NetworkConnection>>) -> Result<Self, ConnectionError> {
		let networks: [Arc<NetworkConnection>; 2] = connections
			.try_into()
			.map_err(|rest: Vec<_>| ConnectionError::NetworkCount { found: rest.len() })?;

		if networks[0].name() == networks[1].name() {
			return Err(ConnectionError::DuplicateNetwork(
				networks[0].name().to_string(),
			));
		}

		Ok(Self { networks })
	}

	pub fn get(&self, name: &str) -> Option<&Arc<NetworkConnection>> {
		self.networks.iter().find(|network| network.name() == name)
	}

	/// The network deposits made on `name` are released to
	pub fn counterpart(&self, name: &str) -> Option<&Arc<NetworkConnection>> {
		let [first, second] = &self.networks;
		if first.name() == name {
			Some(second)
		} else if second.name() == name {
			Some(first)
		} else {
			None
		}
	}

	pub fn iter(&self) -> impl Iterator<Item = &Arc<NetworkConnection>> {
		self.networks.iter()
	}
}
