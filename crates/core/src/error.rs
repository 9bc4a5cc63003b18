//! Simulation error taxonomy.
//!
//! Every failure here is caller-recoverable: the presentation layer reports
//! the message and carries on. Nothing in the core terminates the process.

use crate::ParseAmountError;
use thiserror::Error;

/// Errors surfaced by the simulation core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// The caller-supplied amount was unparseable or non-positive.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// The requested conversion is deeper than the visible book.
    #[error("requested size exceeds available liquidity")]
    InsufficientLiquidity,

    /// A venue returned a book with no resting orders.
    #[error("order book has no resting orders")]
    EmptyBook,

    /// Unsupported coin/venue combination.
    #[error("no route for {coin} on {venue}")]
    UnknownRoute { venue: String, coin: String },

    /// A collaborator could not be reached after retries were exhausted.
    #[error("market data unavailable: {0}")]
    MarketDataUnavailable(String),
}

impl From<ParseAmountError> for SimError {
    fn from(err: ParseAmountError) -> Self {
        SimError::InvalidAmount(err.0)
    }
}
