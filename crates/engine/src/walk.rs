//! Liquidity walking.
//!
//! Simulates executing a market order against a normalized book: consume
//! levels in price-priority order until the requested amount is filled,
//! interpolating a partial fill at the boundary row.

use crate::NormalizedBook;
use arbsim_core::{ConversionDirection, FixedPoint, SimError};

/// Convert `limit` of the book's "from" unit into the "to" unit.
///
/// For [`ConversionDirection::Buy`] the from-unit is notional (currency) and
/// the to-unit is size (asset); for `Sell` the roles swap. The walk finds the
/// first row whose cumulative from-column meets or exceeds `limit`, takes the
/// preceding rows whole, and converts the remaining shortfall at that row's
/// price.
///
/// Fails with [`SimError::InsufficientLiquidity`] when `limit` is deeper than
/// the book, rather than reading past the table.
pub fn fill(
    book: &NormalizedBook,
    limit: FixedPoint,
    direction: ConversionDirection,
) -> Result<FixedPoint, SimError> {
    if limit.is_zero() {
        return Ok(FixedPoint::ZERO);
    }

    let rows = book.rows();
    if rows.is_empty() {
        return Err(SimError::EmptyBook);
    }

    let from_of = |i: usize| match direction {
        ConversionDirection::Buy => rows[i].cumulative_notional,
        ConversionDirection::Sell => rows[i].cumulative_size,
    };
    let to_of = |i: usize| match direction {
        ConversionDirection::Buy => rows[i].cumulative_size,
        ConversionDirection::Sell => rows[i].cumulative_notional,
    };

    if from_of(rows.len() - 1) < limit {
        return Err(SimError::InsufficientLiquidity);
    }

    // First row at which cumulative consumption reaches the limit. The
    // cumulative column is sorted, so a binary search would do; books are
    // shallow enough that the scan is fine.
    let k = (0..rows.len())
        .position(|i| from_of(i) >= limit)
        .ok_or(SimError::InsufficientLiquidity)?;

    let (prev_from, prev_to) = if k == 0 {
        (FixedPoint::ZERO, FixedPoint::ZERO)
    } else {
        (from_of(k - 1), to_of(k - 1))
    };

    let remainder = limit - prev_from;

    // Exact boundary: the row is consumed whole. Returning the cumulative
    // value directly keeps the total-depth case exact and ensures the row is
    // never counted twice.
    if remainder == from_of(k) - prev_from {
        return Ok(to_of(k));
    }

    let converted = match direction {
        ConversionDirection::Buy => remainder.div(rows[k].price),
        ConversionDirection::Sell => remainder.mul(rows[k].price),
    };

    Ok(prev_to + converted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbsim_core::{BookSide, OrderLevel};
    use pretty_assertions::assert_eq;

    fn fp(s: &str) -> FixedPoint {
        s.parse().unwrap()
    }

    /// Asks [(100, 2), (110, 3)]: cumulative_size [2, 5],
    /// cumulative_notional [200, 530].
    fn sample_asks() -> NormalizedBook {
        NormalizedBook::from_levels(
            vec![
                OrderLevel::new(fp("100"), fp("2")),
                OrderLevel::new(fp("110"), fp("3")),
            ],
            BookSide::Asks,
        )
        .unwrap()
    }

    fn sample_bids() -> NormalizedBook {
        NormalizedBook::from_levels(
            vec![
                OrderLevel::new(fp("100"), fp("2")),
                OrderLevel::new(fp("90"), fp("3")),
            ],
            BookSide::Bids,
        )
        .unwrap()
    }

    #[test]
    fn zero_limit_returns_zero() {
        assert_eq!(
            fill(&sample_asks(), FixedPoint::ZERO, ConversionDirection::Buy).unwrap(),
            FixedPoint::ZERO
        );
        assert_eq!(
            fill(&sample_bids(), FixedPoint::ZERO, ConversionDirection::Sell).unwrap(),
            FixedPoint::ZERO
        );
    }

    #[test]
    fn partial_fill_interpolates_at_boundary_row() {
        // Spend 300: row 0 supplies 2 coins for 200, the remaining 100 buys
        // 100/110 = 0.90909090... at row 1's price.
        let got = fill(&sample_asks(), fp("300"), ConversionDirection::Buy).unwrap();
        assert_eq!(got, fp("2.90909090"));
    }

    #[test]
    fn fill_within_first_row() {
        let got = fill(&sample_asks(), fp("150"), ConversionDirection::Buy).unwrap();
        assert_eq!(got, fp("1.5"));
    }

    #[test]
    fn exact_row_boundary_is_not_double_counted() {
        // Exactly the first row's notional: 2 coins, nothing from row 1.
        let got = fill(&sample_asks(), fp("200"), ConversionDirection::Buy).unwrap();
        assert_eq!(got, fp("2"));
    }

    #[test]
    fn limit_at_total_depth_returns_final_cumulative() {
        let book = sample_asks();
        let got = fill(&book, book.total_notional(), ConversionDirection::Buy).unwrap();
        assert_eq!(got, book.total_size());

        let bids = sample_bids();
        let got = fill(&bids, bids.total_size(), ConversionDirection::Sell).unwrap();
        assert_eq!(got, bids.total_notional());
    }

    #[test]
    fn limit_beyond_depth_is_an_error() {
        assert_eq!(
            fill(&sample_asks(), fp("530.00000001"), ConversionDirection::Buy).unwrap_err(),
            SimError::InsufficientLiquidity
        );
        assert_eq!(
            fill(&sample_bids(), fp("5.00000001"), ConversionDirection::Sell).unwrap_err(),
            SimError::InsufficientLiquidity
        );
    }

    #[test]
    fn sell_walks_bids_best_price_first() {
        // Dispose of 3 coins: 2 at 100, 1 at 90 = 290.
        let got = fill(&sample_bids(), fp("3"), ConversionDirection::Sell).unwrap();
        assert_eq!(got, fp("290"));
    }
}
