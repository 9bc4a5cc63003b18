//! Market-data fetching for the arbitrage route simulator.
//!
//! Venue REST clients, a forex quote client, and a bounded-retry wrapper.
//! Everything here is fallible and async; the engine itself never touches
//! the network.

pub mod error;
pub mod forex;
pub mod rest;
pub mod retry;
pub mod source;

pub use error::FeedError;
pub use forex::ForexClient;
pub use rest::{source_for, Ice3xClient, KrakenClient, LunoClient};
pub use retry::{with_retry, LogObserver, RetryObserver, RetryPolicy};
pub use source::OrderBookSource;
