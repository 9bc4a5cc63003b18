//! Fee steps.
//!
//! A [`FeeStep`] models one fee deduction in a route: a proportional part,
//! optionally clamped between absolute bounds, plus a fixed part. The wire
//! transfer fee uses all four fields (e.g. a bank commission of 0.55% clamped
//! to [140, 650] plus a fixed SWIFT charge); per-hop fees typically use only
//! one part.

use arbsim_core::FixedPoint;
use serde::{Deserialize, Serialize};

/// One fee deduction: `clamp(amount * proportional, min, max) + fixed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeStep {
    /// Fixed fee, in the unit of the amount it applies to.
    pub fixed: FixedPoint,
    /// Proportional rate as a fraction (0.0055 = 0.55%).
    pub proportional: FixedPoint,
    /// Lower bound on the proportional part.
    pub min_clamp: Option<FixedPoint>,
    /// Upper bound on the proportional part.
    pub max_clamp: Option<FixedPoint>,
}

impl FeeStep {
    /// No fee at all.
    pub const FREE: FeeStep = FeeStep {
        fixed: FixedPoint::ZERO,
        proportional: FixedPoint::ZERO,
        min_clamp: None,
        max_clamp: None,
    };

    /// A fixed-only fee.
    pub fn fixed(amount: FixedPoint) -> Self {
        FeeStep {
            fixed: amount,
            ..FeeStep::FREE
        }
    }

    /// A proportional-only fee.
    pub fn proportional(rate: FixedPoint) -> Self {
        FeeStep {
            proportional: rate,
            ..FeeStep::FREE
        }
    }

    /// Clamp the proportional part between absolute bounds.
    pub fn with_clamp(mut self, min: FixedPoint, max: FixedPoint) -> Self {
        self.min_clamp = Some(min);
        self.max_clamp = Some(max);
        self
    }

    /// Add a fixed part.
    pub fn with_fixed(mut self, amount: FixedPoint) -> Self {
        self.fixed = amount;
        self
    }

    /// The proportional (clamped) part of the fee on `amount`.
    pub fn proportional_part(&self, amount: FixedPoint) -> FixedPoint {
        if self.proportional.is_zero() {
            return FixedPoint::ZERO;
        }
        let mut fee = amount.mul(self.proportional);
        if let Some(min) = self.min_clamp {
            fee = fee.max(min);
        }
        if let Some(max) = self.max_clamp {
            fee = fee.min(max);
        }
        fee
    }

    /// Full fee on `amount`: clamped proportional part plus the fixed part.
    pub fn apply(&self, amount: FixedPoint) -> FixedPoint {
        self.proportional_part(amount) + self.fixed
    }
}
