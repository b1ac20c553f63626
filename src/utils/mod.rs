//! Utility modules for common functionality.
//!
//! - constants: Constants for the application
//! - logging: Logging utilities
//! - metrics: Prometheus metrics and the server exposing them

pub mod constants;
pub mod logging;
pub mod metrics;

pub use constants::*;
