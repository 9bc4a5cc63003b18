//! Order book normalization.
//!
//! Turns raw venue levels into a side-sorted table with running totals, the
//! form consumed by the liquidity walker.

use arbsim_core::{BookSide, FixedPoint, OrderLevel, SimError};
use serde::{Deserialize, Serialize};

/// One row of a normalized book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRow {
    pub price: FixedPoint,
    pub size: FixedPoint,
    /// Money value of this row: `price * size`.
    pub notional: FixedPoint,
    /// Running total of `size` up to and including this row.
    pub cumulative_size: FixedPoint,
    /// Running total of `notional` up to and including this row.
    pub cumulative_notional: FixedPoint,
}

/// An order book snapshot sorted with the best price first.
///
/// Asks are sorted ascending by price (cheapest liquidity first), bids
/// descending (most favorable price first). The cumulative columns are
/// non-decreasing by row index, and the table is never empty: construction
/// fails with [`SimError::EmptyBook`] instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedBook {
    side: BookSide,
    rows: Vec<BookRow>,
}

impl NormalizedBook {
    /// Normalize raw levels for the given side.
    ///
    /// Rows with a zero price or size carry no liquidity and are dropped
    /// before sorting; if nothing remains the book is empty.
    pub fn from_levels(levels: Vec<OrderLevel>, side: BookSide) -> Result<Self, SimError> {
        let mut levels: Vec<OrderLevel> = levels
            .into_iter()
            .filter(|l| !l.price.is_zero() && !l.size.is_zero())
            .collect();
        if levels.is_empty() {
            return Err(SimError::EmptyBook);
        }

        match side {
            BookSide::Asks => levels.sort_by_key(|l| l.price),
            BookSide::Bids => levels.sort_by_key(|l| std::cmp::Reverse(l.price)),
        }

        let mut rows = Vec::with_capacity(levels.len());
        let mut cumulative_size = FixedPoint::ZERO;
        let mut cumulative_notional = FixedPoint::ZERO;
        for level in levels {
            let notional = level.notional();
            cumulative_size = cumulative_size + level.size;
            cumulative_notional = cumulative_notional + notional;
            rows.push(BookRow {
                price: level.price,
                size: level.size,
                notional,
                cumulative_size,
                cumulative_notional,
            });
        }

        Ok(Self { side, rows })
    }

    /// Build a synthetic one-level book from a quoted rate.
    ///
    /// Used to express a forex conversion as an ordinary hop. `capacity` is
    /// the largest from-unit amount the hop must absorb: notional for an ask
    /// book (walked with Buy), size for a bid book (walked with Sell). The
    /// level is padded by one unit so a walk at exactly `capacity` fills.
    pub fn from_quote(
        rate: FixedPoint,
        capacity: FixedPoint,
        side: BookSide,
    ) -> Result<Self, SimError> {
        if rate.is_zero() {
            return Err(SimError::EmptyBook);
        }
        let size = match side {
            BookSide::Asks => capacity.div(rate) + FixedPoint::ONE,
            BookSide::Bids => capacity + FixedPoint::ONE,
        };
        Self::from_levels(vec![OrderLevel::new(rate, size)], side)
    }

    #[inline]
    pub fn side(&self) -> BookSide {
        self.side
    }

    #[inline]
    pub fn rows(&self) -> &[BookRow] {
        &self.rows
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Best price for this side (row 0).
    pub fn best_price(&self) -> FixedPoint {
        self.rows[0].price
    }

    /// Total size resting in the book.
    pub fn total_size(&self) -> FixedPoint {
        self.rows.last().map(|r| r.cumulative_size).unwrap_or(FixedPoint::ZERO)
    }

    /// Total notional resting in the book.
    pub fn total_notional(&self) -> FixedPoint {
        self.rows.last().map(|r| r.cumulative_notional).unwrap_or(FixedPoint::ZERO)
    }
}
