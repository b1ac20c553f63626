//! Event monitoring service.
//!
//! One [`EventMonitor`] per network keeps a node-side log filter for the bridge contract's
//! `Deposited` event and hands back the logs seen since the previous poll.

mod error;
mod service;

pub use error::MonitorError;
pub use service::{EventFilterHandle, EventMonitor, MonitorState};
