//! Constants shared across the relay.

/// Event the relay watches on both bridge contracts
pub const DEPOSIT_EVENT_NAME: &str = "Deposited";

/// Contract method invoked on the target network
pub const RELEASE_FUNCTION_NAME: &str = "release";

/// Gas limit of a release transaction unless configured otherwise
pub const DEFAULT_GAS_LIMIT: u64 = 200_000;

pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 2;

/// Backoff after an unexpected error in a polling loop
pub const DEFAULT_ERROR_BACKOFF_SECS: u64 = 5;

pub const DEFAULT_RECEIPT_POLL_INTERVAL_MS: u64 = 1_000;

/// Capacity of the queue between the network pollers and the release worker
pub const RELEASE_QUEUE_CAPACITY: usize = 1_024;

/// Environment variable that overrides the configured private key
pub const PRIVATE_KEY_ENV: &str = "BRIDGE_PRIVATE_KEY";

pub const DEFAULT_CONFIG_PATH: &str = "config/bridge.json";

pub const DEFAULT_METRICS_ADDRESS: &str = "127.0.0.1:8081";
