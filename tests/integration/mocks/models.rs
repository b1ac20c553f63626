//! Fixtures for networks, contracts and deposit logs.

use alloy::{
	consensus::{TxEnvelope, TxLegacy},
	eips::Decodable2718,
	json_abi::JsonAbi,
	primitives::{address, bytes, Address, Bytes, B256, U256},
	rpc::types::Log,
	signers::local::PrivateKeySigner,
	sol_types::{SolCall, SolEvent},
};
use std::{io::Write, path::PathBuf, sync::Arc, time::Duration};
use tempfile::NamedTempFile;

use deposit_relay::{
	models::{releaseCall, BridgeConfig, Deposited, NetworkConfig, ReleaseReceipt, SigningKey},
	services::{
		blockchain::{BridgeClient, ContractBinding, NetworkConnection},
		release::ReleaseSubmitter,
	},
};

pub const TEST_PRIVATE_KEY: &str =
	"0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";

pub const FIRST_NETWORK: &str = "first_network";
pub const SECOND_NETWORK: &str = "second_network";
pub const FIRST_CHAIN_ID: u64 = 11_155_111;
pub const SECOND_CHAIN_ID: u64 = 17_000;
pub const FIRST_CONTRACT: Address = address!("00000000000000000000000000000000000000a0");
pub const SECOND_CONTRACT: Address = address!("00000000000000000000000000000000000000b0");
pub const DEPOSITOR: Address = address!("0000000000000000000000000000000000000aaa");

pub const BRIDGE_ABI: &str = r#"[
	{
		"type": "event",
		"name": "Deposited",
		"anonymous": false,
		"inputs": [
			{ "name": "id", "type": "bytes", "indexed": false },
			{ "name": "msg_sender", "type": "address", "indexed": false },
			{ "name": "amount", "type": "uint256", "indexed": false },
			{ "name": "nonce", "type": "uint256", "indexed": false },
			{ "name": "sourceChainId", "type": "uint256", "indexed": false },
			{ "name": "blockNumber", "type": "uint256", "indexed": false }
		]
	},
	{
		"type": "function",
		"name": "release",
		"stateMutability": "nonpayable",
		"inputs": [
			{ "name": "id", "type": "bytes" },
			{ "name": "to", "type": "address" },
			{ "name": "amount", "type": "uint256" },
			{ "name": "sourceChainId", "type": "uint256" }
		],
		"outputs": []
	}
]"#;

/// ABI declaring neither the deposit event nor `release`
pub const UNRELATED_ABI: &str = r#"[
	{
		"type": "function",
		"name": "owner",
		"stateMutability": "view",
		"inputs": [],
		"outputs": [{ "name": "", "type": "address" }]
	}
]"#;

pub fn bridge_abi() -> JsonAbi {
	serde_json::from_str(BRIDGE_ABI).unwrap()
}

pub fn write_abi_file(content: &str) -> NamedTempFile {
	let mut file = NamedTempFile::new().unwrap();
	write!(file, "{}", content).unwrap();
	file
}

pub fn create_network_config(
	name: &str,
	chain_id: u64,
	contract: Address,
	abi_path: PathBuf,
) -> NetworkConfig {
	NetworkConfig {
		name: name.to_string(),
		rpc_url: "http://localhost:8545".to_string(),
		contract_address: contract.to_string(),
		abi_path,
		chain_id,
	}
}

pub fn create_bridge_config(abi_path: PathBuf) -> BridgeConfig {
	BridgeConfig {
		networks: vec![
			create_network_config(FIRST_NETWORK, FIRST_CHAIN_ID, FIRST_CONTRACT, abi_path.clone()),
			create_network_config(SECOND_NETWORK, SECOND_CHAIN_ID, SECOND_CONTRACT, abi_path),
		],
		private_key: Some(SigningKey::new(TEST_PRIVATE_KEY)),
		poll_interval_secs: 2,
		error_backoff_secs: 5,
		gas_limit: 200_000,
		receipt_poll_interval_ms: 1,
	}
}

pub fn create_test_connection(
	name: &str,
	chain_id: u64,
	contract: Address,
	client: impl BridgeClient + 'static,
) -> Arc<NetworkConnection> {
	Arc::new(NetworkConnection::new(
		name,
		chain_id,
		ContractBinding::new(contract, bridge_abi()),
		Arc::new(client),
	))
}

pub fn create_test_submitter() -> ReleaseSubmitter {
	let signer: PrivateKeySigner = TEST_PRIVATE_KEY.parse().unwrap();
	ReleaseSubmitter::new(signer, 200_000, Duration::from_millis(1))
}

pub fn relayer_address() -> Address {
	TEST_PRIVATE_KEY.parse::<PrivateKeySigner>().unwrap().address()
}

/// `Deposited(0x01, 0x…aaa, 100, 1, 11155111, 1000)`
pub fn sample_deposit() -> Deposited {
	Deposited {
		id: bytes!("01"),
		msg_sender: DEPOSITOR,
		amount: U256::from(100),
		nonce: U256::from(1),
		sourceChainId: U256::from(FIRST_CHAIN_ID),
		blockNumber: U256::from(1000),
	}
}

/// A log of `event` emitted by `contract`, as returned by a filter poll
pub fn create_deposit_log(event: &Deposited, contract: Address) -> Log {
	Log {
		inner: alloy::primitives::Log {
			address: contract,
			data: event.encode_log_data(),
		},
		transaction_hash: Some(B256::repeat_byte(0x11)),
		block_number: Some(1000),
		..Default::default()
	}
}

/// A deposit log whose data stops after `len` bytes
pub fn create_truncated_log(event: &Deposited, contract: Address, len: usize) -> Log {
	let mut log = create_deposit_log(event, contract);
	let data = log.inner.data.data.clone();
	let topics = log.inner.data.topics().to_vec();
	log.inner.data =
		alloy::primitives::LogData::new_unchecked(topics, data.slice(..len.min(data.len())));
	log
}

/// Legacy transaction and `release` arguments of a broadcast raw transaction
pub fn decode_release_transaction(raw: &Bytes) -> (TxLegacy, releaseCall) {
	let envelope = TxEnvelope::decode_2718(&mut raw.as_ref()).unwrap();
	let transaction = envelope.as_legacy().unwrap().tx().clone();
	let call = releaseCall::abi_decode(&transaction.input).unwrap();
	(transaction, call)
}

pub fn create_receipt(transaction_hash: B256, success: bool) -> ReleaseReceipt {
	ReleaseReceipt {
		transaction_hash,
		block_number: Some(2000),
		success,
	}
}
