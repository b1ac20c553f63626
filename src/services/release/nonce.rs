//! Per-network transaction ordering.

use std::{collections::HashMap, sync::Arc};
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One lock per target network
///
/// Nonces are read from the latest block, so a second transaction may only be built once the
/// previous one from the same account is included. Holding the network's lock from the nonce
/// read until the receipt arrives guarantees that.
#[derive(Debug, Clone, Default)]
pub struct NonceLocks {
	locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl NonceLocks {
	pub fn new() -> Self {
		Self::default()
	}

	/// Waits for exclusive use of `network`'s nonce sequence
	pub async fn acquire(&self, network: &str) -> OwnedMutexGuard<()> {
		let lock = {
			let mut locks = self.locks.lock().await;
			Arc::clone(locks.entry(network.to_string()).or_default())
		};
		lock.lock_owned().await
	}
}
