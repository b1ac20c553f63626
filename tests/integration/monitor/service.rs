use alloy::{primitives::U256, sol_types::SolEvent};
use mockall::{predicate, Sequence};
use tracing_test::traced_test;

use crate::integration::mocks::{
	create_deposit_log, create_test_connection, sample_deposit, MockBridgeClient, FIRST_CHAIN_ID,
	FIRST_CONTRACT, FIRST_NETWORK,
};
use deposit_relay::{
	models::Deposited,
	services::{
		blockchain::BlockChainError,
		monitor::{EventMonitor, MonitorError, MonitorState},
	},
};

#[tokio::test]
#[traced_test]
async fn test_setup_creates_filter_from_latest() {
	let mut client = MockBridgeClient::new();
	client
		.expect_new_filter()
		.withf(|filter| {
			let json = serde_json::to_string(filter).unwrap().to_lowercase();
			json.contains(r#""fromblock":"latest""#)
				&& json.contains(&hex::encode(FIRST_CONTRACT))
				&& json.contains(&hex::encode(Deposited::SIGNATURE_HASH))
		})
		.times(1)
		.returning(|_| Ok(U256::from(7)));

	let connection = create_test_connection(FIRST_NETWORK, FIRST_CHAIN_ID, FIRST_CONTRACT, client);
	let monitor = EventMonitor::setup(connection, "Deposited").await.unwrap();

	assert_eq!(monitor.state(), MonitorState::Active);
	assert_eq!(monitor.handle().unwrap().id, U256::from(7));
	assert_eq!(monitor.network(), FIRST_NETWORK);
	assert!(logs_contain(Deposited::SIGNATURE));
}

#[tokio::test]
async fn test_setup_fails_for_unknown_event() {
	let mut client = MockBridgeClient::new();
	client.expect_new_filter().never();

	let connection = create_test_connection(FIRST_NETWORK, FIRST_CHAIN_ID, FIRST_CONTRACT, client);
	let result = EventMonitor::setup(connection, "Released").await;

	assert!(matches!(result, Err(MonitorError::EventNotFound { .. })));
}

#[tokio::test]
async fn test_setup_fails_when_filter_rejected() {
	let mut client = MockBridgeClient::new();
	client
		.expect_new_filter()
		.returning(|_| Err(BlockChainError::request_error("method not found")));

	let connection = create_test_connection(FIRST_NETWORK, FIRST_CHAIN_ID, FIRST_CONTRACT, client);
	let result = EventMonitor::setup(connection, "Deposited").await;

	assert!(matches!(result, Err(MonitorError::FilterCreation { .. })));
}

#[tokio::test]
async fn test_poll_returns_new_logs() {
	let log = create_deposit_log(&sample_deposit(), FIRST_CONTRACT);
	let returned = log.clone();

	let mut client = MockBridgeClient::new();
	client.expect_new_filter().returning(|_| Ok(U256::from(1)));
	client
		.expect_get_filter_changes()
		.with(predicate::eq(U256::from(1)))
		.times(1)
		.returning(move |_| Ok(vec![returned.clone()]));

	let connection = create_test_connection(FIRST_NETWORK, FIRST_CHAIN_ID, FIRST_CONTRACT, client);
	let mut monitor = EventMonitor::setup(connection, "Deposited").await.unwrap();

	let logs = monitor.poll().await.unwrap();
	assert_eq!(logs, vec![log]);
}

#[tokio::test]
async fn test_poll_error_recreates_filter_and_polling_continues() {
	let mut seq = Sequence::new();
	let mut client = MockBridgeClient::new();

	client
		.expect_new_filter()
		.times(1)
		.in_sequence(&mut seq)
		.returning(|_| Ok(U256::from(1)));
	client
		.expect_get_filter_changes()
		.with(predicate::eq(U256::from(1)))
		.times(1)
		.in_sequence(&mut seq)
		.returning(|_| Err(BlockChainError::request_error("filter not found")));
	client
		.expect_uninstall_filter()
		.with(predicate::eq(U256::from(1)))
		.times(1)
		.in_sequence(&mut seq)
		.returning(|_| Ok(false));
	client
		.expect_new_filter()
		.times(1)
		.in_sequence(&mut seq)
		.returning(|_| Ok(U256::from(2)));
	client
		.expect_get_filter_changes()
		.with(predicate::eq(U256::from(2)))
		.times(1)
		.in_sequence(&mut seq)
		.returning(|_| Ok(Vec::new()));

	let connection = create_test_connection(FIRST_NETWORK, FIRST_CHAIN_ID, FIRST_CONTRACT, client);
	let mut monitor = EventMonitor::setup(connection, "Deposited").await.unwrap();

	let first = monitor.poll().await;
	assert!(matches!(first, Err(MonitorError::FilterRecreated { .. })));
	assert_eq!(monitor.handle().unwrap().id, U256::from(2));

	let second = monitor.poll().await.unwrap();
	assert!(second.is_empty());
}

#[tokio::test]
async fn test_failed_recreation_disables_until_next_poll() {
	let mut seq = Sequence::new();
	let mut client = MockBridgeClient::new();

	client
		.expect_new_filter()
		.times(1)
		.in_sequence(&mut seq)
		.returning(|_| Ok(U256::from(1)));
	client
		.expect_get_filter_changes()
		.times(1)
		.in_sequence(&mut seq)
		.returning(|_| Err(BlockChainError::connection_error("connection reset")));
	client
		.expect_uninstall_filter()
		.times(1)
		.in_sequence(&mut seq)
		.returning(|_| Err(BlockChainError::connection_error("connection reset")));
	client
		.expect_new_filter()
		.times(1)
		.in_sequence(&mut seq)
		.returning(|_| Err(BlockChainError::connection_error("connection reset")));
	client
		.expect_new_filter()
		.times(1)
		.in_sequence(&mut seq)
		.returning(|_| Ok(U256::from(3)));
	client
		.expect_get_filter_changes()
		.with(predicate::eq(U256::from(3)))
		.times(1)
		.in_sequence(&mut seq)
		.returning(|_| Ok(Vec::new()));

	let connection = create_test_connection(FIRST_NETWORK, FIRST_CHAIN_ID, FIRST_CONTRACT, client);
	let mut monitor = EventMonitor::setup(connection, "Deposited").await.unwrap();

	let result = monitor.poll().await;
	assert!(matches!(result, Err(MonitorError::FilterUnavailable { .. })));
	assert_eq!(monitor.state(), MonitorState::Disabled);

	// Next cycle installs a filter and reports nothing yet
	assert!(monitor.poll().await.unwrap().is_empty());
	assert_eq!(monitor.state(), MonitorState::Active);

	assert!(monitor.poll().await.unwrap().is_empty());
}
