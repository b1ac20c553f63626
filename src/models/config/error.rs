//! Configuration error types.
//!
//! Everything that can go wrong before the relay touches a network: reading the file,
//! parsing it, checking its invariants and loading the signing key.

use std::{error::Error, fmt};

/// Errors raised while loading the bridge configuration
#[derive(Debug)]
#[allow(clippy::enum_variant_names)]
pub enum ConfigError {
	/// A configuration invariant does not hold
	ValidationError(String),

	/// The file is not valid JSON for a `BridgeConfig`
	ParseError(String),

	/// The file could not be read
	FileError(String),

	/// The signing key is missing or not a secp256k1 private key
	///
	/// The message never contains the key itself.
	KeyError(String),
}

impl ConfigError {
	fn format_message(&self) -> String {
		match self {
			Self::ValidationError(msg) => format!("Validation error: {}", msg),
			Self::ParseError(msg) => format!("Parse error: {}", msg),
			Self::FileError(msg) => format!("File error: {}", msg),
			Self::KeyError(msg) => format!("Signing key error: {}", msg),
		}
	}

	pub fn validation_error(msg: impl Into<String>) -> Self {
		Self::ValidationError(msg.into())
	}

	pub fn parse_error(msg: impl Into<String>) -> Self {
		Self::ParseError(msg.into())
	}

	pub fn file_error(msg: impl Into<String>) -> Self {
		Self::FileError(msg.into())
	}

	pub fn key_error(msg: impl Into<String>) -> Self {
		Self::KeyError(msg.into())
	}
}

impl fmt::Display for ConfigError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.format_message())
	}
}

impl Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
	fn from(err: std::io::Error) -> Self {
		Self::file_error(err.to_string())
	}
}

impl From<serde_json::Error> for ConfigError {
	fn from(err: serde_json::Error) -> Self {
		Self::parse_error(format!(
			"{} (line {}, column {})",
			err,
			err.line(),
			err.column()
		))
	}
}
