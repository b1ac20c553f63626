//! Relay engine.
//!
//! Runs one poller task per network and a single release worker. Pollers push decoded
//! deposits into an ordered queue; the worker submits them one at a time.

mod error;
mod service;

pub use error::EngineError;
pub use service::{poll_once, process_release, BridgeEngine, EngineConfig};
