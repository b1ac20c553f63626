//! Deposit relay between two EVM networks.
//!
//! Watches a `Deposited` event on the bridge contract of each configured network and, for
//! every deposit observed, submits a `release` call to the bridge contract on the other
//! network.
//!
//! # Architecture
//! - Models: configuration and the deposit/release data model
//! - Services: chain access, event monitoring, deposit handling, release submission and the
//!   engine that schedules them
//! - Bootstrap: wiring configuration into live network connections and an engine
//! - Utils: logging, metrics and shared constants

pub mod bootstrap;
pub mod models;
pub mod services;
pub mod utils;
