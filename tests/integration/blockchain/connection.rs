use alloy::{primitives::Address, sol_types::SolEvent};
use std::{path::PathBuf, sync::Arc};
use tracing_test::traced_test;

use crate::integration::mocks::{
	create_network_config, create_test_connection, write_abi_file, MockBridgeClient, BRIDGE_ABI,
	FIRST_CHAIN_ID, FIRST_CONTRACT, FIRST_NETWORK, SECOND_CHAIN_ID, SECOND_CONTRACT,
	SECOND_NETWORK, UNRELATED_ABI,
};
use deposit_relay::{
	models::Deposited,
	services::blockchain::{BlockChainError, ConnectionError, NetworkConnection, NetworkPair},
};

fn client_with_chain_id(chain_id: u64) -> Arc<MockBridgeClient> {
	let mut client = MockBridgeClient::new();
	client
		.expect_get_chain_id()
		.times(1)
		.returning(move || Ok(chain_id));
	Arc::new(client)
}

#[tokio::test]
async fn test_connect_binds_contract() {
	let abi = write_abi_file(BRIDGE_ABI);
	let config = create_network_config(
		FIRST_NETWORK,
		FIRST_CHAIN_ID,
		FIRST_CONTRACT,
		abi.path().to_path_buf(),
	);

	let connection =
		NetworkConnection::connect_with_client(&config, client_with_chain_id(FIRST_CHAIN_ID))
			.await
			.unwrap();

	assert_eq!(connection.name(), FIRST_NETWORK);
	assert_eq!(connection.chain_id(), FIRST_CHAIN_ID);
	assert_eq!(connection.contract().address(), FIRST_CONTRACT);
	assert!(connection.contract().supports_release());

	let schema = connection.contract().event_schema("Deposited").unwrap();
	assert_eq!(schema.selector, Deposited::SIGNATURE_HASH);
}

#[tokio::test]
#[traced_test]
async fn test_connect_uses_node_chain_id_on_mismatch() {
	let abi = write_abi_file(BRIDGE_ABI);
	let config = create_network_config(
		FIRST_NETWORK,
		FIRST_CHAIN_ID,
		FIRST_CONTRACT,
		abi.path().to_path_buf(),
	);

	let connection = NetworkConnection::connect_with_client(&config, client_with_chain_id(1))
		.await
		.unwrap();

	assert_eq!(connection.chain_id(), 1);
	assert!(logs_contain("Configured chain id differs from the node's, using the node's"));
}

#[tokio::test]
#[traced_test]
async fn test_connect_warns_on_incomplete_abi() {
	let abi = write_abi_file(UNRELATED_ABI);
	let config = create_network_config(
		FIRST_NETWORK,
		FIRST_CHAIN_ID,
		FIRST_CONTRACT,
		abi.path().to_path_buf(),
	);

	let connection =
		NetworkConnection::connect_with_client(&config, client_with_chain_id(FIRST_CHAIN_ID))
			.await
			.unwrap();

	assert!(connection.contract().event_schema("Deposited").is_none());
	assert!(!connection.contract().supports_release());
	assert!(logs_contain("Deposited event not found in ABI"));
	assert!(logs_contain("release method not found in ABI"));
}

#[tokio::test]
async fn test_connect_rejects_invalid_contract_address() {
	let abi = write_abi_file(BRIDGE_ABI);
	let mut config = create_network_config(
		FIRST_NETWORK,
		FIRST_CHAIN_ID,
		FIRST_CONTRACT,
		abi.path().to_path_buf(),
	);
	config.contract_address = "0x1234".to_string();

	let result =
		NetworkConnection::connect_with_client(&config, Arc::new(MockBridgeClient::new())).await;

	assert!(matches!(result, Err(ConnectionError::InvalidContract(_))));
}

#[tokio::test]
async fn test_connect_fails_without_abi_file() {
	let config = create_network_config(
		FIRST_NETWORK,
		FIRST_CHAIN_ID,
		FIRST_CONTRACT,
		PathBuf::from("abis/missing.json"),
	);

	let result =
		NetworkConnection::connect_with_client(&config, Arc::new(MockBridgeClient::new())).await;

	assert!(matches!(result, Err(ConnectionError::AbiRead { .. })));
}

#[tokio::test]
async fn test_connect_fails_when_node_errors() {
	let abi = write_abi_file(BRIDGE_ABI);
	let config = create_network_config(
		FIRST_NETWORK,
		FIRST_CHAIN_ID,
		FIRST_CONTRACT,
		abi.path().to_path_buf(),
	);

	let mut client = MockBridgeClient::new();
	client
		.expect_get_chain_id()
		.returning(|| Err(BlockChainError::connection_error("connection refused")));

	let result = NetworkConnection::connect_with_client(&config, Arc::new(client)).await;

	assert!(matches!(result, Err(ConnectionError::Transport(_))));
}

#[test]
fn test_network_pair_is_symmetric() {
	let first = create_test_connection(
		FIRST_NETWORK,
		FIRST_CHAIN_ID,
		FIRST_CONTRACT,
		MockBridgeClient::new(),
	);
	let second = create_test_connection(
		SECOND_NETWORK,
		SECOND_CHAIN_ID,
		SECOND_CONTRACT,
		MockBridgeClient::new(),
	);

	let pair = NetworkPair::new(vec![first, second]).unwrap();

	assert_eq!(pair.counterpart(FIRST_NETWORK).unwrap().name(), SECOND_NETWORK);
	assert_eq!(pair.counterpart(SECOND_NETWORK).unwrap().name(), FIRST_NETWORK);
	assert!(pair.counterpart("third_network").is_none());
	assert_eq!(pair.get(SECOND_NETWORK).unwrap().chain_id(), SECOND_CHAIN_ID);
	assert_eq!(pair.iter().count(), 2);
}

#[test]
fn test_network_pair_requires_two_networks() {
	let only = create_test_connection(
		FIRST_NETWORK,
		FIRST_CHAIN_ID,
		FIRST_CONTRACT,
		MockBridgeClient::new(),
	);

	let result = NetworkPair::new(vec![only]);
	assert!(matches!(result, Err(ConnectionError::NetworkCount { found: 1 })));

	let result = NetworkPair::new(Vec::new());
	assert!(matches!(result, Err(ConnectionError::NetworkCount { found: 0 })));
}

#[test]
fn test_network_pair_rejects_duplicate_names() {
	let first = create_test_connection(
		FIRST_NETWORK,
		FIRST_CHAIN_ID,
		FIRST_CONTRACT,
		MockBridgeClient::new(),
	);
	let again = create_test_connection(
		FIRST_NETWORK,
		SECOND_CHAIN_ID,
		Address::ZERO,
		MockBridgeClient::new(),
	);

	let result = NetworkPair::new(vec![first, again]);
	assert!(matches!(result, Err(ConnectionError::DuplicateNetwork(name)) if name == FIRST_NETWORK));
}
