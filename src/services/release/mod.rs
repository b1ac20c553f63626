//! Release submission service.
//!
//! Builds, signs and broadcasts `release` transactions on the target network, then waits for
//! their receipt. Transactions to the same network are serialized by [`NonceLocks`].

mod error;
mod nonce;
mod submitter;

pub use error::ReleaseError;
pub use nonce::NonceLocks;
pub use submitter::ReleaseSubmitter;
