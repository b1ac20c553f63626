//! Deposit handling service.
//!
//! Turns raw `Deposited` logs into [`ReleaseRequest`]s addressed to the other network of
//! the pair.

mod deposit;
mod error;

pub use deposit::{DepositHandler, ReleaseRequest};
pub use error::HandlerError;
