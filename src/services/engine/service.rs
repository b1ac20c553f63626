use std::{sync::Arc, time::Duration};
use tokio::{sync::mpsc, task::JoinSet};
use tracing::{error, info, warn};

use crate::{
	models::{BridgeConfig, ReleaseOutcome},
	services::{
		blockchain::{NetworkConnection, NetworkPair},
		engine::EngineError,
		handler::{DepositHandler, ReleaseRequest},
		monitor::{EventMonitor, MonitorError},
		release::ReleaseSubmitter,
	},
	utils::{
		constants::{
			DEFAULT_ERROR_BACKOFF_SECS, DEFAULT_POLL_INTERVAL_SECS, DEPOSIT_EVENT_NAME,
			RELEASE_QUEUE_CAPACITY,
		},
		metrics::ACTIVE_MONITORS,
	},
};

/// Timing of the engine loops
#[derive(Debug, Clone)]
pub struct EngineConfig {
	/// Pause between two polls of the same network
	pub poll_interval: Duration,
	/// Pause after an unexpected error in a poller
	pub error_backoff: Duration,
	/// Deposits buffered between the pollers and the release worker
	pub queue_capacity: usize,
}

impl Default for EngineConfig {
	fn default() -> Self {
		Self {
			poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
			error_backoff: Duration::from_secs(DEFAULT_ERROR_BACKOFF_SECS),
			queue_capacity: RELEASE_QUEUE_CAPACITY,
		}
	}
}

impl From<&BridgeConfig> for EngineConfig {
	fn from(config: &BridgeConfig) -> Self {
		Self {
			poll_interval: config.poll_interval(),
			error_backoff: config.error_backoff(),
			..Self::default()
		}
	}
}

/// Watches both networks of the bridge and relays their deposits
#[derive(Debug)]
pub struct BridgeEngine {
	handler: Arc<DepositHandler>,
	submitter: Arc<ReleaseSubmitter>,
	monitors: Vec<EventMonitor>,
	config: EngineConfig,
}

impl BridgeEngine {
	/// Creates an engine over the connected networks
	///
	/// # Errors
	/// - `EngineError::InsufficientNetworks` if fewer than two networks are connected
	/// - `EngineError::Networks` if there are more than two or their names collide
	pub fn new(
		connections: Vec<Arc<NetworkConnection>>,
		submitter: ReleaseSubmitter,
		config: EngineConfig,
	) -> Result<Self, EngineError> {
		if connections.len() < 2 {
			return Err(EngineError::InsufficientNetworks {
				found: connections.len(),
			});
		}

		let networks = NetworkPair::new(connections)?;

		Ok(Self {
			handler: Arc::new(DepositHandler::new(networks)),
			submitter: Arc::new(submitter),
			monitors: Vec::new(),
			config,
		})
	}

	pub fn handler(&self) -> &DepositHandler {
		&self.handler
	}

	pub fn monitors(&self) -> &[EventMonitor] {
		&self.monitors
	}

	/// Starts a deposit monitor on every network, skipping the ones that fail
	///
	/// Returns the number of monitors running.
	pub async fn setup_monitors(&mut self) -> usize {
		let mut monitors = Vec::new();
		for connection in self.handler.networks().iter() {
			match EventMonitor::setup(Arc::clone(connection), DEPOSIT_EVENT_NAME).await {
				Ok(monitor) => monitors.push(monitor),
				Err(e) => error!(
					network = connection.name(),
					error = %e,
					"Failed to start event monitor, network will not be watched"
				),
			}
		}

		self.monitors = monitors;
		ACTIVE_MONITORS.set(self.monitors.len() as i64);
		self.monitors.len()
	}

	/// Runs the pollers and the release worker
	///
	/// Monitors are set up first unless [`setup_monitors`](Self::setup_monitors) already ran.
	/// Once started the engine only stops if its release worker does; dropping the returned
	/// future aborts every task. A poller that dies is logged and the other network keeps
	/// being watched.
	///
	/// # Errors
	/// - `EngineError::NoActiveMonitors` if no network could be watched
	/// - `EngineError::ReleaseWorkerStopped` if the release worker ended or panicked
	pub async fn run(mut self) -> Result<(), EngineError> {
		if self.monitors.is_empty() && self.setup_monitors().await == 0 {
			return Err(EngineError::NoActiveMonitors);
		}

		let (queue, requests) = mpsc::channel(self.config.queue_capacity);
		let mut tasks = JoinSet::new();

		for monitor in self.monitors.drain(..) {
			info!(network = monitor.network(), "Watching network for deposits");
			tasks.spawn(run_poller(
				monitor,
				Arc::clone(&self.handler),
				queue.clone(),
				self.config.clone(),
			));
		}
		drop(queue);

		let worker = tasks
			.spawn(run_release_worker(requests, Arc::clone(&self.submitter)))
			.id();

		while let Some(result) = tasks.join_next_with_id().await {
			let id = match result {
				Ok((id, ())) => id,
				Err(e) => {
					error!(error = %e, "Engine task stopped unexpectedly");
					e.id()
				}
			};

			if id == worker {
				ACTIVE_MONITORS.set(0);
				return Err(EngineError::ReleaseWorkerStopped);
			}
			ACTIVE_MONITORS.dec();
		}

		ACTIVE_MONITORS.set(0);
		Ok(())
	}
}

/// Polls one network and queues a release request for every deposit
///
/// A monitor that cannot produce logs this cycle is logged and skipped. Logs that are not
/// valid deposits are logged and dropped without affecting the rest of the batch.
///
/// # Returns
/// Number of requests queued
///
/// # Errors
/// - `EngineError::QueueClosed` if the release worker is gone
pub async fn poll_once(
	monitor: &mut EventMonitor,
	handler: &DepositHandler,
	queue: &mpsc::Sender<ReleaseRequest>,
) -> Result<usize, EngineError> {
	let logs = match monitor.poll().await {
		Ok(logs) => logs,
		Err(e @ MonitorError::FilterRecreated { .. }) => {
			warn!(network = monitor.network(), error = %e, "Recreated event filter, events since the last poll are skipped");
			return Ok(0);
		}
		Err(e) => {
			warn!(network = monitor.network(), error = %e, "Event monitor unavailable for this cycle");
			return Ok(0);
		}
	};

	let mut queued = 0;
	for log in &logs {
		let request = match handler.handle(log, monitor.network()) {
			Ok(request) => request,
			Err(e) => {
				error!(network = e.network(), error = %e, "Dropping deposit event");
				continue;
			}
		};

		info!(
			source = monitor.network(),
			target = request.target.name(),
			deposit_id = %request.deposit.deposit_id,
			depositor = %request.deposit.depositor,
			amount = %request.deposit.amount,
			"Deposit detected"
		);

		queue
			.send(request)
			.await
			.map_err(|_| EngineError::QueueClosed)?;
		queued += 1;
	}

	Ok(queued)
}

/// Submits the release for one request, logging any failure
pub async fn process_release(
	submitter: &ReleaseSubmitter,
	request: &ReleaseRequest,
) -> Option<ReleaseOutcome> {
	let params = request.deposit.release_params();
	match submitter.submit(&params, &request.target).await {
		Ok(outcome) => {
			info!(
				network = request.target.name(),
				source_network = %request.deposit.source_network,
				deposit_id = %params.deposit_id,
				outcome = %outcome,
				"Release settled"
			);
			Some(outcome)
		}
		Err(e) => {
			error!(
				network = e.network(),
				source_network = %request.deposit.source_network,
				deposit_id = %params.deposit_id,
				error = %e,
				"Release dropped"
			);
			None
		}
	}
}

async fn run_poller(
	mut monitor: EventMonitor,
	handler: Arc<DepositHandler>,
	queue: mpsc::Sender<ReleaseRequest>,
	config: EngineConfig,
) {
	loop {
		let delay = match poll_once(&mut monitor, &handler, &queue).await {
			Ok(_) => config.poll_interval,
			Err(e) => {
				error!(
					network = monitor.network(),
					error = %e,
					backoff_secs = config.error_backoff.as_secs(),
					"Monitoring loop error, backing off"
				);
				config.error_backoff
			}
		};
		tokio::time::sleep(delay).await;
	}
}

async fn run_release_worker(
	mut requests: mpsc::Receiver<ReleaseRequest>,
	submitter: Arc<ReleaseSubmitter>,
) {
	while let Some(request) = requests.recv().await {
		process_release(&submitter, &request).await;
	}
}
