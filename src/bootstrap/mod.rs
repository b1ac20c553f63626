//! Bootstrap module for connecting networks and creating the relay engine.
//!
//! # Flow
//! - `initialize_networks`: connects every configured network, skipping the ones that fail
//! - `create_engine`: builds the release submitter and the engine over the connected networks
//!
//! Whether enough networks survived is decided by the engine, so a single unreachable node
//! surfaces as `EngineError::InsufficientNetworks` instead of a connection error.

use futures::future::join_all;
use std::{future::Future, sync::Arc};
use tracing::{error, info};

use crate::{
	models::{BridgeConfig, NetworkConfig},
	services::{
		blockchain::{ConnectionError, NetworkConnection},
		engine::{BridgeEngine, EngineConfig, EngineError},
		release::ReleaseSubmitter,
	},
};

/// Connects all configured networks over JSON-RPC
pub async fn initialize_networks(config: &BridgeConfig) -> Vec<Arc<NetworkConnection>> {
	initialize_networks_with(config, |network| async move {
		NetworkConnection::connect(&network).await
	})
	.await
}

/// Connects all configured networks with `connect`
///
/// Networks are connected concurrently. Failures are logged and the network is left out;
/// the returned connections keep the configuration order.
pub async fn initialize_networks_with<F, Fut>(
	config: &BridgeConfig,
	connect: F,
) -> Vec<Arc<NetworkConnection>>
where
	F: Fn(NetworkConfig) -> Fut,
	Fut: Future<Output = Result<NetworkConnection, ConnectionError>>,
{
	let attempts = config
		.networks
		.iter()
		.map(|network| connect(network.clone()));

	join_all(attempts)
		.await
		.into_iter()
		.zip(&config.networks)
		.filter_map(|(result, network)| match result {
			Ok(connection) => Some(Arc::new(connection)),
			Err(e) => {
				error!(
					network = %network.name,
					rpc_url = %network.rpc_url,
					error = %e,
					"Failed to connect to network, it will not be relayed"
				);
				None
			}
		})
		.collect()
}

/// Builds an engine over already connected networks
pub fn create_engine_with_connections(
	config: &BridgeConfig,
	connections: Vec<Arc<NetworkConnection>>,
) -> Result<BridgeEngine, EngineError> {
	let submitter = ReleaseSubmitter::from_config(config)?;
	info!(relayer = %submitter.address(), "Release account loaded");

	BridgeEngine::new(connections, submitter, EngineConfig::from(config))
}

/// Connects the configured networks and builds the engine
///
/// # Errors
/// - `EngineError::Config` if the signing key is unusable
/// - `EngineError::InsufficientNetworks` if fewer than two networks could be connected
pub async fn create_engine(config: &BridgeConfig) -> Result<BridgeEngine, EngineError> {
	// Fail on the key before touching the network
	config.signer()?;

	let connections = initialize_networks(config).await;
	create_engine_with_connections(config, connections)
}
