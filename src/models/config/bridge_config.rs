//! Bridge configuration model and loader.

use alloy::{primitives::Address, signers::local::PrivateKeySigner};
use serde::Deserialize;
use std::{collections::HashSet, fmt, path::Path, path::PathBuf, str::FromStr, time::Duration};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{
	models::config::ConfigError,
	utils::constants::{
		DEFAULT_ERROR_BACKOFF_SECS, DEFAULT_GAS_LIMIT, DEFAULT_POLL_INTERVAL_SECS,
		DEFAULT_RECEIPT_POLL_INTERVAL_MS, PRIVATE_KEY_ENV,
	},
};

/// Connection settings for one side of the bridge
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct NetworkConfig {
	/// Unique name used in logs and to pair deposits with their target network
	pub name: String,
	/// HTTP(S) JSON-RPC endpoint
	pub rpc_url: String,
	/// Address of the bridge contract, any letter case
	pub contract_address: String,
	/// Path to the contract ABI, either a bare ABI array or a build artifact with an `abi` field
	pub abi_path: PathBuf,
	/// Chain id used when signing transactions for this network
	pub chain_id: u64,
}

impl NetworkConfig {
	/// Parsed contract address
	pub fn contract_address(&self) -> Result<Address, ConfigError> {
		Address::from_str(self.contract_address.trim()).map_err(|e| {
			ConfigError::validation_error(format!(
				"Invalid contract address for {} ({}): {}",
				self.name, self.contract_address, e
			))
		})
	}

	fn validate(&self) -> Result<(), ConfigError> {
		if self.name.trim().is_empty() {
			return Err(ConfigError::validation_error("Network name must not be empty"));
		}

		if !(self.rpc_url.starts_with("http://") || self.rpc_url.starts_with("https://")) {
			return Err(ConfigError::validation_error(format!(
				"RPC URL for {} must start with http:// or https://",
				self.name
			)));
		}

		self.contract_address()?;
		Ok(())
	}
}

/// Hex encoded secp256k1 private key, wiped from memory on drop
#[derive(Clone, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(transparent)]
pub struct SigningKey(String);

impl SigningKey {
	pub fn new(key: impl Into<String>) -> Self {
		Self(key.into())
	}

	/// Local signer for this key
	pub fn to_signer(&self) -> Result<PrivateKeySigner, ConfigError> {
		PrivateKeySigner::from_str(self.0.trim())
			.map_err(|e| ConfigError::key_error(format!("Invalid private key: {}", e)))
	}
}

impl fmt::Debug for SigningKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("SigningKey(<redacted>)")
	}
}

fn default_poll_interval_secs() -> u64 {
	DEFAULT_POLL_INTERVAL_SECS
}

fn default_error_backoff_secs() -> u64 {
	DEFAULT_ERROR_BACKOFF_SECS
}

fn default_gas_limit() -> u64 {
	DEFAULT_GAS_LIMIT
}

fn default_receipt_poll_interval_ms() -> u64 {
	DEFAULT_RECEIPT_POLL_INTERVAL_MS
}

/// Complete relay configuration
///
/// Built once at startup and shared read-only. Exactly two networks are expected; the relay
/// treats them symmetrically.
#[derive(Debug, Clone, Deserialize)]
pub struct BridgeConfig {
	pub networks: Vec<NetworkConfig>,
	/// Key used to sign release transactions on both networks
	#[serde(default)]
	pub private_key: Option<SigningKey>,
	/// Seconds between two polls of the same network
	#[serde(default = "default_poll_interval_secs")]
	pub poll_interval_secs: u64,
	/// Seconds to back off after an unexpected error in a polling loop
	#[serde(default = "default_error_backoff_secs")]
	pub error_backoff_secs: u64,
	/// Gas limit of every release transaction
	#[serde(default = "default_gas_limit")]
	pub gas_limit: u64,
	/// Milliseconds between two receipt lookups while waiting for a release to be included
	#[serde(default = "default_receipt_poll_interval_ms")]
	pub receipt_poll_interval_ms: u64,
}

impl BridgeConfig {
	/// Loads and validates a configuration file
	///
	/// When `BRIDGE_PRIVATE_KEY` is set in the environment it takes precedence over the key in
	/// the file.
	pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
		let file = std::fs::File::open(path).map_err(|e| {
			ConfigError::file_error(format!("Failed to open {}: {}", path.display(), e))
		})?;
		let config: BridgeConfig = serde_json::from_reader(file)?;
		let config = config.with_private_key_override(std::env::var(PRIVATE_KEY_ENV).ok());

		config.validate()?;
		Ok(config)
	}

	/// Replaces the configured key when `key` is present
	pub fn with_private_key_override(mut self, key: Option<String>) -> Self {
		if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
			self.private_key = Some(SigningKey::new(key));
		}
		self
	}

	/// Checks the invariants every component relies on
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.networks.len() != 2 {
			return Err(ConfigError::validation_error(format!(
				"Expected exactly two networks, found {}",
				self.networks.len()
			)));
		}

		let mut names = HashSet::new();
		for network in &self.networks {
			network.validate()?;
			if !names.insert(network.name.as_str()) {
				return Err(ConfigError::validation_error(format!(
					"Duplicate network name: {}",
					network.name
				)));
			}
		}

		if self.poll_interval_secs == 0 {
			return Err(ConfigError::validation_error(
				"poll_interval_secs must be greater than 0",
			));
		}

		if self.gas_limit == 0 {
			return Err(ConfigError::validation_error("gas_limit must be greater than 0"));
		}

		if self.receipt_poll_interval_ms == 0 {
			return Err(ConfigError::validation_error(
				"receipt_poll_interval_ms must be greater than 0",
			));
		}

		self.signer()?;
		Ok(())
	}

	/// Signer built from the configured key
	pub fn signer(&self) -> Result<PrivateKeySigner, ConfigError> {
		self.private_key
			.as_ref()
			.ok_or_else(|| {
				ConfigError::key_error(format!(
					"A private key is required, set private_key or {}",
					PRIVATE_KEY_ENV
				))
			})?
			.to_signer()
	}

	pub fn poll_interval(&self) -> Duration {
		Duration::from_secs(self.poll_interval_secs)
	}

	pub fn error_backoff(&self) -> Duration {
		Duration::from_secs(self.error_backoff_secs)
	}

	pub fn receipt_poll_interval(&self) -> Duration {
		Duration::from_millis(self.receipt_poll_interval_ms)
	}
}
