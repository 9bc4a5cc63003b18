//! The order-book provider abstraction.
//!
//! Every venue adapter exposes the same narrow surface: a point-in-time list
//! of raw `(price, size)` levels for one side of one trading pair. Transient
//! unavailability is surfaced as a retryable [`FeedError`] so callers can
//! wrap fetches in a retry policy.

use crate::FeedError;
use arbsim_core::{BookSide, Coin, Currency, OrderLevel, Venue};
use async_trait::async_trait;

/// A source of raw order book snapshots for one venue.
#[async_trait]
pub trait OrderBookSource: Send + Sync {
    fn venue(&self) -> Venue;

    /// Fetch the raw levels for `side` of the `coin`/`currency` pair.
    async fn fetch_levels(
        &self,
        coin: Coin,
        currency: Currency,
        side: BookSide,
    ) -> Result<Vec<OrderLevel>, FeedError>;
}
