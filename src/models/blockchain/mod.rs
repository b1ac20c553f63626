//! Blockchain-facing data models.

pub mod bridge;
