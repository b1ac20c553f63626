//! Filter-based event monitor for one network.

use alloy::{
	eips::BlockNumberOrTag,
	primitives::U256,
	rpc::types::{Filter, Log},
};
use std::sync::Arc;
use tracing::{debug, info};

use crate::{
	services::{
		blockchain::{BlockChainError, EventSchema, NetworkConnection},
		monitor::MonitorError,
	},
	utils::metrics::FILTER_RECREATIONS,
};

/// A filter installed on the node, with the query it was created from
#[derive(Debug, Clone)]
pub struct EventFilterHandle {
	pub id: U256,
	pub filter: Filter,
}

/// Whether a monitor currently holds a live filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
	Active,
	/// Filter recreation failed; the next poll tries to create one first
	Disabled,
}

/// Cursor over new occurrences of one contract event on one network
///
/// Starts at the latest block; past events are never replayed.
#[derive(Debug)]
pub struct EventMonitor {
	connection: Arc<NetworkConnection>,
	schema: EventSchema,
	handle: Option<EventFilterHandle>,
}

impl EventMonitor {
	/// Installs a filter for `event_name` on the connection's bridge contract
	///
	/// # Errors
	/// - `MonitorError::EventNotFound` if the contract ABI does not declare the event
	/// - `MonitorError::FilterCreation` if the node rejects the filter
	pub async fn setup(
		connection: Arc<NetworkConnection>,
		event_name: &str,
	) -> Result<Self, MonitorError> {
		let schema = connection
			.contract()
			.event_schema(event_name)
			.cloned()
			.ok_or_else(|| MonitorError::EventNotFound {
				network: connection.name().to_string(),
				event: event_name.to_string(),
			})?;

		let mut monitor = Self {
			connection,
			schema,
			handle: None,
		};

		let handle = monitor
			.create_handle()
			.await
			.map_err(|source| MonitorError::FilterCreation {
				network: monitor.network().to_string(),
				source,
			})?;

		info!(
			network = monitor.network(),
			event = %monitor.schema.signature,
			filter_id = %handle.id,
			"Event monitor started"
		);
		monitor.handle = Some(handle);

		Ok(monitor)
	}

	pub fn network(&self) -> &str {
		self.connection.name()
	}

	pub fn handle(&self) -> Option<&EventFilterHandle> {
		self.handle.as_ref()
	}

	pub fn state(&self) -> MonitorState {
		match self.handle {
			Some(_) => MonitorState::Active,
			None => MonitorState::Disabled,
		}
	}

	/// Logs matched since the previous poll, in the order the node returned them
	///
	/// A failed poll replaces the filter with a new one starting at the latest block and
	/// returns `MonitorError::FilterRecreated`. If the replacement cannot be installed the
	/// monitor becomes disabled and `MonitorError::FilterUnavailable` is returned until a
	/// later poll manages to install one.
	pub async fn poll(&mut self) -> Result<Vec<Log>, MonitorError> {
		let Some(filter_id) = self.handle.as_ref().map(|handle| handle.id) else {
			return self.restore().await.map(|_| Vec::new());
		};

		let changes = self.connection.client().get_filter_changes(filter_id).await;
		match changes {
			Ok(logs) => {
				if !logs.is_empty() {
					debug!(network = self.network(), count = logs.len(), "Received logs");
				}
				Ok(logs)
			}
			Err(cause) => Err(self.recreate(cause).await),
		}
	}

	fn build_filter(&self) -> Filter {
		Filter::new()
			.address(self.connection.contract().address())
			.event_signature(self.schema.selector)
			.from_block(BlockNumberOrTag::Latest)
	}

	async fn create_handle(&self) -> Result<EventFilterHandle, BlockChainError> {
		let filter = self.build_filter();
		let id = self.connection.client().new_filter(&filter).await?;
		Ok(EventFilterHandle { id, filter })
	}

	async fn recreate(&mut self, cause: BlockChainError) -> MonitorError {
		if let Some(old) = self.handle.take() {
			// The node may already have dropped it
			if let Err(e) = self.connection.client().uninstall_filter(old.id).await {
				debug!(network = self.network(), filter_id = %old.id, error = %e, "Failed to uninstall stale filter");
			}
		}

		match self.create_handle().await {
			Ok(handle) => {
				FILTER_RECREATIONS
					.with_label_values(&[self.network()])
					.inc();
				self.handle = Some(handle);
				MonitorError::FilterRecreated {
					network: self.network().to_string(),
					source: cause,
				}
			}
			Err(source) => MonitorError::FilterUnavailable {
				network: self.network().to_string(),
				source,
			},
		}
	}

	async fn restore(&mut self) -> Result<(), MonitorError> {
		let handle = self
			.create_handle()
			.await
			.map_err(|source| MonitorError::FilterUnavailable {
				network: self.network().to_string(),
				source,
			})?;

		info!(network = self.network(), filter_id = %handle.id, "Event filter restored");
		self.handle = Some(handle);
		Ok(())
	}
}
