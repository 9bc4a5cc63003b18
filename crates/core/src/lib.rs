//! Core data types for the arbitrage route simulator.

pub mod error;
pub mod fixed;
pub mod market;
pub mod venue;

pub use error::*;
pub use fixed::*;
pub use market::*;
pub use venue::*;
