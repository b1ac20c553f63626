use alloy::{
	consensus::{SignableTransaction, TxEnvelope, TxLegacy},
	eips::Encodable2718,
	network::TxSignerSync,
	primitives::{Address, Bytes, TxKind, B256, U256},
	signers::local::PrivateKeySigner,
	sol_types::SolCall,
};
use std::time::Duration;
use tracing::{error, info};

use crate::{
	models::{BridgeConfig, ConfigError, ReleaseOutcome, ReleaseParams, ReleaseReceipt},
	services::{
		blockchain::NetworkConnection,
		release::{NonceLocks, ReleaseError},
	},
	utils::metrics::{RELEASES_CONFIRMED, RELEASES_FAILED, RELEASES_REVERTED, RELEASES_SUBMITTED},
};

/// Sends `release` calls from the bridge account
pub struct ReleaseSubmitter {
	signer: PrivateKeySigner,
	gas_limit: u64,
	receipt_poll_interval: Duration,
	nonce_locks: NonceLocks,
}

impl ReleaseSubmitter {
	pub fn new(signer: PrivateKeySigner, gas_limit: u64, receipt_poll_interval: Duration) -> Self {
		Self {
			signer,
			gas_limit,
			receipt_poll_interval,
			nonce_locks: NonceLocks::new(),
		}
	}

	pub fn from_config(config: &BridgeConfig) -> Result<Self, ConfigError> {
		Ok(Self::new(
			config.signer()?,
			config.gas_limit,
			config.receipt_poll_interval(),
		))
	}

	/// Account the releases are sent from
	pub fn address(&self) -> Address {
		self.signer.address()
	}

	/// Submits `release` on `target` and waits until it is included
	///
	/// The nonce and gas price are read from the node right before signing. The target's
	/// nonce lock is held from the nonce read until the receipt is in, so releases to one
	/// network are strictly sequential. Nothing is retried: a failed attempt is returned as
	/// an error and a reverted transaction as [`ReleaseOutcome::Reverted`].
	pub async fn submit(
		&self,
		params: &ReleaseParams,
		target: &NetworkConnection,
	) -> Result<ReleaseOutcome, ReleaseError> {
		let result = self.submit_locked(params, target).await;

		match &result {
			Ok(ReleaseOutcome::Confirmed(receipt)) => {
				RELEASES_CONFIRMED.with_label_values(&[target.name()]).inc();
				info!(
					network = target.name(),
					deposit_id = %params.deposit_id,
					recipient = %params.recipient,
					amount = %params.amount,
					tx_hash = %receipt.transaction_hash,
					block = ?receipt.block_number,
					"Release successful"
				);
			}
			Ok(ReleaseOutcome::Reverted(receipt)) => {
				RELEASES_REVERTED.with_label_values(&[target.name()]).inc();
				error!(
					network = target.name(),
					deposit_id = %params.deposit_id,
					tx_hash = %receipt.transaction_hash,
					block = ?receipt.block_number,
					"Release failed: transaction reverted"
				);
			}
			Err(_) => {
				RELEASES_FAILED.with_label_values(&[target.name()]).inc();
			}
		}

		result
	}

	async fn submit_locked(
		&self,
		params: &ReleaseParams,
		target: &NetworkConnection,
	) -> Result<ReleaseOutcome, ReleaseError> {
		let network = target.name();
		if !target.contract().supports_release() {
			return Err(ReleaseError::ReleaseNotInAbi {
				network: network.to_string(),
			});
		}

		let client = target.client();
		let _guard = self.nonce_locks.acquire(network).await;

		let nonce = client
			.get_transaction_count(self.address())
			.await
			.map_err(|source| ReleaseError::Nonce {
				network: network.to_string(),
				source,
			})?;
		let gas_price = client
			.get_gas_price()
			.await
			.map_err(|source| ReleaseError::GasPrice {
				network: network.to_string(),
				source,
			})?;

		let transaction = self.build_transaction(
			params,
			target.chain_id(),
			target.contract().address(),
			nonce,
			gas_price,
		);
		let raw = self.sign(transaction).map_err(|reason| ReleaseError::Signing {
			network: network.to_string(),
			reason,
		})?;

		let transaction_hash =
			client
				.send_raw_transaction(raw)
				.await
				.map_err(|source| ReleaseError::Broadcast {
					network: network.to_string(),
					source,
				})?;

		RELEASES_SUBMITTED.with_label_values(&[network]).inc();
		info!(
			network,
			deposit_id = %params.deposit_id,
			nonce,
			gas_price,
			tx_hash = %transaction_hash,
			"Release transaction sent"
		);

		let receipt = self.wait_for_receipt(target, transaction_hash).await?;
		Ok(if receipt.success {
			ReleaseOutcome::Confirmed(receipt)
		} else {
			ReleaseOutcome::Reverted(receipt)
		})
	}

	fn build_transaction(
		&self,
		params: &ReleaseParams,
		chain_id: u64,
		contract: Address,
		nonce: u64,
		gas_price: u128,
	) -> TxLegacy {
		TxLegacy {
			chain_id: Some(chain_id),
			nonce,
			gas_price,
			gas_limit: self.gas_limit,
			to: TxKind::Call(contract),
			value: U256::ZERO,
			input: params.to_call().abi_encode().into(),
		}
	}

	/// EIP-155 signature, EIP-2718 encoding
	fn sign(&self, mut transaction: TxLegacy) -> Result<Bytes, String> {
		let signature = self
			.signer
			.sign_transaction_sync(&mut transaction)
			.map_err(|e| e.to_string())?;
		let envelope = TxEnvelope::Legacy(transaction.into_signed(signature));
		Ok(envelope.encoded_2718().into())
	}

	/// Polls for the receipt until the node returns one
	async fn wait_for_receipt(
		&self,
		target: &NetworkConnection,
		transaction_hash: B256,
	) -> Result<ReleaseReceipt, ReleaseError> {
		let mut interval = tokio::time::interval(self.receipt_poll_interval);
		loop {
			interval.tick().await;
			match target
				.client()
				.get_transaction_receipt(transaction_hash)
				.await
			{
				Ok(Some(receipt)) => return Ok(receipt),
				Ok(None) => continue,
				Err(source) => {
					return Err(ReleaseError::Receipt {
						network: target.name().to_string(),
						transaction_hash,
						source,
					})
				}
			}
		}
	}
}

impl std::fmt::Debug for ReleaseSubmitter {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ReleaseSubmitter")
			.field("address", &self.address())
			.field("gas_limit", &self.gas_limit)
			.field("receipt_poll_interval", &self.receipt_poll_interval)
			.finish_non_exhaustive()
	}
}
