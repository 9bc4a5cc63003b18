//! Arbitrage simulation engine.
//!
//! This crate contains the core logic for pricing a chain of conversions
//! against point-in-time order book snapshots: book normalization, liquidity
//! walking, fee-chain composition and the investment-size grid search.
//!
//! Everything here is a pure, synchronous function of its inputs; the engine
//! never performs I/O and never logs. Failures come back as
//! [`arbsim_core::SimError`].

pub mod book;
pub mod fee;
pub mod optimizer;
pub mod route;
pub mod walk;

pub use book::*;
pub use fee::*;
pub use optimizer::*;
pub use route::*;
pub use walk::*;
