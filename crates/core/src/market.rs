//! Market data primitives shared between feeds and the simulation engine.

use crate::FixedPoint;
use serde::{Deserialize, Serialize};

/// Side of an order book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BookSide {
    /// Resting sell orders: the liquidity consumed when buying.
    Asks,
    /// Resting buy orders: the liquidity consumed when selling.
    Bids,
}

/// Direction of one conversion step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConversionDirection {
    /// Spend notional (currency) to acquire size (asset).
    Buy,
    /// Spend size (asset) to acquire notional (currency).
    Sell,
}

impl ConversionDirection {
    /// The book side a conversion in this direction consumes.
    pub fn consumes(self) -> BookSide {
        match self {
            ConversionDirection::Buy => BookSide::Asks,
            ConversionDirection::Sell => BookSide::Bids,
        }
    }
}

/// A single raw order book level as delivered by a venue.
/// Immutable once fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLevel {
    pub price: FixedPoint,
    pub size: FixedPoint,
}

impl OrderLevel {
    pub fn new(price: FixedPoint, size: FixedPoint) -> Self {
        Self { price, size }
    }

    /// Money value of this level.
    pub fn notional(&self) -> FixedPoint {
        self.price.mul(self.size)
    }
}
