//! Deposit relay entry point.
//!
//! Loads the bridge configuration, connects both networks and runs the relay engine until
//! Ctrl+C. An optional Prometheus endpoint exposes the relay counters.
//!
//! # Flow
//! 1. Loads `.env` and the configuration file
//! 2. Connects the two networks and binds their bridge contracts
//! 3. Starts one event monitor per network and the release worker
//! 4. Runs until interrupted; in-flight releases are not drained

use deposit_relay::{
	bootstrap::create_engine,
	models::BridgeConfig,
	utils::{
		constants::{DEFAULT_CONFIG_PATH, DEFAULT_METRICS_ADDRESS},
		logging::setup_logging,
		metrics::server::create_metrics_server,
	},
};

use clap::{Arg, Command};
use dotenvy::dotenv;
use std::{env::var, path::PathBuf};
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let matches = Command::new("deposit-relay")
		.version(env!("CARGO_PKG_VERSION"))
		.about(
			"Relays deposits between two EVM networks: every Deposited event on one bridge \
			 contract triggers a release call on the other.",
		)
		.arg(
			Arg::new("config")
				.long("config")
				.help("Path to the bridge configuration file (default: config/bridge.json)")
				.value_name("PATH"),
		)
		.arg(
			Arg::new("log-level")
				.long("log-level")
				.help("Set log level (trace, debug, info, warn, error)")
				.value_name("LEVEL"),
		)
		.arg(
			Arg::new("metrics")
				.long("metrics")
				.help("Enable metrics server")
				.action(clap::ArgAction::SetTrue),
		)
		.arg(
			Arg::new("metrics-address")
				.long("metrics-address")
				.help("Address to start the metrics server on (default: 127.0.0.1:8081)")
				.value_name("HOST:PORT"),
		)
		.get_matches();

	// Load environment variables from .env file
	dotenv().ok();

	if let Err(e) = setup_logging(matches.get_one::<String>("log-level").map(String::as_str)) {
		eprintln!("Failed to setup logging: {}", e);
	}

	let config_path = matches
		.get_one::<String>("config")
		.map(PathBuf::from)
		.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

	let config = BridgeConfig::load_from_path(&config_path).map_err(|e| {
		anyhow::anyhow!(
			"Failed to load configuration from {}: {}",
			config_path.display(),
			e
		)
	})?;
	info!(path = %config_path.display(), "Configuration loaded");

	let engine = create_engine(&config)
		.await
		.map_err(|e| anyhow::anyhow!("Failed to start the relay: {}", e))?;

	let metrics_enabled =
		matches.get_flag("metrics") || var("METRICS_ENABLED").map(|v| v == "true").unwrap_or(false);
	let metrics_address = matches
		.get_one::<String>("metrics-address")
		.cloned()
		.unwrap_or_else(|| DEFAULT_METRICS_ADDRESS.to_string());

	let metrics_server = if metrics_enabled {
		info!("Metrics server enabled, starting on {}", metrics_address);
		match create_metrics_server(metrics_address) {
			Ok(server) => Some(server),
			Err(e) => {
				error!("Failed to create metrics server: {}", e);
				None
			}
		}
	} else {
		info!("Metrics server disabled. Use --metrics flag or METRICS_ENABLED=true to enable");
		None
	};

	let metrics = async move {
		match metrics_server {
			Some(server) => server.await,
			None => std::future::pending().await,
		}
	};

	info!("Relay started. Press Ctrl+C to shutdown");

	tokio::select! {
		result = tokio::signal::ctrl_c() => {
			if let Err(e) = result {
				error!("Error waiting for Ctrl+C: {}", e);
			}
			info!("Shutdown signal received, stopping relay...");
		}
		result = engine.run() => {
			result.map_err(|e| anyhow::anyhow!("Relay engine stopped: {}", e))?;
			info!("Relay engine stopped");
		}
		result = metrics => {
			if let Err(e) = result {
				error!("Metrics server error: {}", e);
			}
			info!("Metrics server stopped, shutting down relay...");
		}
	}

	info!("Shutdown complete");
	Ok(())
}
