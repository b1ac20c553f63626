//! Core services of the relay.
//!
//! - `blockchain`: chain clients and network connections
//! - `monitor`: per-network event filters
//! - `handler`: deposit decoding and target selection
//! - `release`: release transaction submission
//! - `engine`: scheduling of all of the above

pub mod blockchain;
pub mod engine;
pub mod handler;
pub mod monitor;
pub mod release;
