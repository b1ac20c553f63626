//! Metrics module for the application.
//!
//! - This module contains the global Prometheus registry.
//! - Defines the relay counters, labelled by network name.

pub mod server;
use lazy_static::lazy_static;
use prometheus::{Encoder, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

lazy_static! {
	// Global Prometheus registry.
	pub static ref REGISTRY: Registry = Registry::new();

	// Deposits decoded from a source network.
	pub static ref DEPOSITS_OBSERVED: IntCounterVec = {
		let counter = IntCounterVec::new(
			Opts::new("deposits_observed_total", "Deposited events decoded per source network"),
			&["network"]
		).unwrap();
		REGISTRY.register(Box::new(counter.clone())).unwrap();
		counter
	};

	// Logs that could not be turned into a deposit.
	pub static ref DEPOSITS_REJECTED: IntCounterVec = {
		let counter = IntCounterVec::new(
			Opts::new("deposits_rejected_total", "Deposited logs dropped by the handler per source network"),
			&["network"]
		).unwrap();
		REGISTRY.register(Box::new(counter.clone())).unwrap();
		counter
	};

	// Release transactions broadcast.
	pub static ref RELEASES_SUBMITTED: IntCounterVec = {
		let counter = IntCounterVec::new(
			Opts::new("releases_submitted_total", "Release transactions broadcast per target network"),
			&["network"]
		).unwrap();
		REGISTRY.register(Box::new(counter.clone())).unwrap();
		counter
	};

	// Release transactions included with a success status.
	pub static ref RELEASES_CONFIRMED: IntCounterVec = {
		let counter = IntCounterVec::new(
			Opts::new("releases_confirmed_total", "Release transactions confirmed per target network"),
			&["network"]
		).unwrap();
		REGISTRY.register(Box::new(counter.clone())).unwrap();
		counter
	};

	// Release transactions included but reverted.
	pub static ref RELEASES_REVERTED: IntCounterVec = {
		let counter = IntCounterVec::new(
			Opts::new("releases_reverted_total", "Release transactions reverted per target network"),
			&["network"]
		).unwrap();
		REGISTRY.register(Box::new(counter.clone())).unwrap();
		counter
	};

	// Releases dropped before a receipt was obtained.
	pub static ref RELEASES_FAILED: IntCounterVec = {
		let counter = IntCounterVec::new(
			Opts::new("releases_failed_total", "Releases dropped on build, sign, send or wait errors per target network"),
			&["network"]
		).unwrap();
		REGISTRY.register(Box::new(counter.clone())).unwrap();
		counter
	};

	// Event filters replaced after a poll error.
	pub static ref FILTER_RECREATIONS: IntCounterVec = {
		let counter = IntCounterVec::new(
			Opts::new("filter_recreations_total", "Event filters recreated after a poll error per network"),
			&["network"]
		).unwrap();
		REGISTRY.register(Box::new(counter.clone())).unwrap();
		counter
	};

	// Networks with an event monitor running.
	pub static ref ACTIVE_MONITORS: IntGauge = {
		let gauge = IntGauge::new("active_monitors", "Networks with a running event monitor").unwrap();
		REGISTRY.register(Box::new(gauge.clone())).unwrap();
		gauge
	};
}

/// Gather all metrics and encode into the provided format.
pub fn gather_metrics() -> Result<Vec<u8>, Box<dyn std::error::Error>> {
	let encoder = TextEncoder::new();
	let metric_families = REGISTRY.gather();
	let mut buffer = Vec::new();
	encoder.encode(&metric_families, &mut buffer)?;
	Ok(buffer)
}
