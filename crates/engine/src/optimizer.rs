//! Investment-size grid search.
//!
//! Sweeps a route over an amount grid, reusing the same book snapshots for
//! every point, and picks the smallest amount whose ROI is within 0.1%
//! (relative) of the best observed ROI: the least capital that still
//! captures effectively all of the return.

use crate::Route;
use arbsim_core::{FixedPoint, SignedFixedPoint};
use serde::{Deserialize, Serialize};

/// Grid parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GridConfig {
    /// Largest amount to evaluate.
    pub max_invest: FixedPoint,
    /// Grid spacing; points are `step, 2*step, ...` up to `max_invest`.
    pub step: FixedPoint,
}

/// One evaluated grid point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoiPoint {
    pub amount: FixedPoint,
    pub roi: SignedFixedPoint,
}

/// The evaluated ROI curve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoiCurve {
    pub points: Vec<RoiPoint>,
    /// True when the sweep stopped before `max_invest` because a grid point
    /// failed (no further liquidity at that capital). An empty `points` with
    /// this flag set means no amount could be evaluated at all.
    pub stopped_early: bool,
}

impl RoiCurve {
    /// Best ROI observed over the curve.
    pub fn max_roi(&self) -> Option<SignedFixedPoint> {
        self.points.iter().map(|p| p.roi).max()
    }

    /// Smallest amount whose ROI is within 0.1% (relative) of the best.
    pub fn near_optimal(&self) -> Option<RoiPoint> {
        let max = self.max_roi()?;
        // Band of 0.1% of the best ROI's magnitude, so the rule degrades
        // sanely when every point loses money.
        let threshold = max - SignedFixedPoint(max.abs().0 / 1000);
        self.points.iter().find(|p| p.roi >= threshold).copied()
    }
}

/// Evaluate `route` at every grid point.
///
/// A failing point ends the sweep: deeper amounts would only consume more of
/// the same books, so the failure is treated as "no further liquidity" and
/// the partial curve is returned rather than an error.
pub fn sweep(route: &Route, grid: &GridConfig) -> RoiCurve {
    let mut points = Vec::new();
    let mut stopped_early = false;

    if grid.step.is_zero() {
        return RoiCurve {
            points,
            stopped_early: true,
        };
    }

    let mut amount = grid.step;
    while amount <= grid.max_invest {
        match route.simulate(amount) {
            Ok(result) => points.push(RoiPoint {
                amount,
                roi: result.roi,
            }),
            Err(_) => {
                stopped_early = true;
                break;
            }
        }
        amount = amount + grid.step;
    }

    RoiCurve {
        points,
        stopped_early,
    }
}
