//! Fee-chain composition.
//!
//! A [`Route`] is an ordered list of conversion hops plus the wire-transfer
//! fee that moves capital into the first venue. Simulating a route walks each
//! hop's book in turn, deducting transfer and trading fees along the way, and
//! produces a [`RouteResult`] with the figures and a human-readable breakdown.

use crate::{fill, FeeStep, NormalizedBook};
use arbsim_core::{ConversionDirection, FixedPoint, SignedFixedPoint, SimError};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Narrative separator between sections.
const SEPARATOR: &str = "--------------------";

/// One conversion step in a route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hop {
    /// Venue label used in fee lines, e.g. `Kraken`.
    pub venue: CompactString,
    /// Unit obtained by this hop, e.g. `EUR`, `XBT`, `ZAR`.
    pub asset: CompactString,
    /// Decimal places when rendering this hop's output amount.
    pub display_dp: u32,
    /// Point-in-time book snapshot this hop executes against.
    pub book: NormalizedBook,
    pub direction: ConversionDirection,
    /// Fee for this hop: the fixed part is a deposit/withdrawal charge
    /// deducted from the incoming amount, the proportional part a trading fee
    /// deducted from the obtained amount.
    pub fee: FeeStep,
}

/// A conversion chain from local currency through one or more venues.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    /// Code of the currency capital is denominated in, e.g. `ZAR`.
    pub local_currency: CompactString,
    /// Currency prefix for narrative fee lines, e.g. `R`.
    pub currency_symbol: CompactString,
    /// Bank commission plus fixed wire charge on the outgoing transfer.
    pub wire_fee: FeeStep,
    /// Charge for withdrawing the proceeds from the final venue, in the
    /// final hop's unit.
    pub exit_fee: FeeStep,
    pub hops: Vec<Hop>,
    /// When off, the wire fee and all fixed deposit/withdrawal fees are
    /// skipped (e.g. to simulate money already sitting abroad).
    pub include_transfer_fees: bool,
    /// When off, proportional trading fees are skipped.
    pub include_trade_fees: bool,
}

/// Output amount of one hop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HopAmount {
    pub asset: CompactString,
    pub amount: FixedPoint,
}

/// Result of simulating a route at a given capital.
/// Built fresh per simulation and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteResult {
    pub capital_in: FixedPoint,
    pub amount_per_hop: Vec<HopAmount>,
    pub proceeds_out: FixedPoint,
    /// All fees along the route, converted into local currency at the rates
    /// the route actually realized.
    pub total_fees: FixedPoint,
    pub profit: SignedFixedPoint,
    /// Return on investment as a percentage.
    pub roi: SignedFixedPoint,
    pub narrative: Vec<String>,
}

impl RouteResult {
    /// The breakdown as a single displayable block.
    pub fn summary(&self) -> String {
        self.narrative.join("\n")
    }
}

impl Route {
    /// Parse a raw caller-supplied amount and simulate.
    pub fn parse_and_simulate(&self, raw: &str) -> Result<RouteResult, SimError> {
        let capital: FixedPoint = raw.parse()?;
        self.simulate(capital)
    }

    /// Simulate deploying `capital` through this route.
    pub fn simulate(&self, capital: FixedPoint) -> Result<RouteResult, SimError> {
        if capital.is_zero() {
            return Err(SimError::InvalidAmount("amount must be positive".to_string()));
        }

        let sym = &self.currency_symbol;
        let mut narrative = Vec::new();
        narrative.push(format!(
            "{} out: {}",
            self.local_currency,
            capital.format_dp(2)
        ));

        let wire = if self.include_transfer_fees {
            self.wire_fee.apply(capital)
        } else {
            FixedPoint::ZERO
        };
        if !wire.is_zero() {
            narrative.push(format!("# wire transfer fee: {sym}{}", wire.format_dp(2)));
        }

        let mut working = capital - wire;
        let mut total_fees = wire;
        // Local currency value of one unit of the amount currently held.
        let mut local_per_unit = FixedPoint::ONE;
        let mut prev_unit = self.local_currency.clone();
        let mut rate_lines = Vec::with_capacity(self.hops.len());
        let mut amount_per_hop = Vec::with_capacity(self.hops.len());

        for (idx, hop) in self.hops.iter().enumerate() {
            let transfer_fixed = if self.include_transfer_fees {
                hop.fee.fixed
            } else {
                FixedPoint::ZERO
            };
            let input = working - transfer_fixed;

            let obtained = fill(&hop.book, input, hop.direction)?;

            let trade_fee = if self.include_trade_fees {
                hop.fee.proportional_part(obtained)
            } else {
                FixedPoint::ZERO
            };
            let output = obtained - trade_fee;

            let local_per_new = if obtained.is_zero() {
                local_per_unit
            } else {
                local_per_unit.mul(input).div(obtained)
            };

            if !transfer_fixed.is_zero() {
                narrative.push(format!(
                    "# {} transfer fee: {sym}{}",
                    hop.venue,
                    transfer_fixed.mul(local_per_unit).format_dp(2)
                ));
            }
            if !trade_fee.is_zero() {
                narrative.push(format!(
                    "# {} trade fee: {sym}{}",
                    hop.venue,
                    trade_fee.mul(local_per_new).format_dp(2)
                ));
            }
            total_fees = total_fees
                + transfer_fixed.mul(local_per_unit)
                + trade_fee.mul(local_per_new);

            if idx + 1 == self.hops.len() {
                narrative.push(format!("{} in: {}", hop.asset, output.format_dp(hop.display_dp)));
            } else {
                narrative.push(format!("{}: {}", hop.asset, output.format_dp(hop.display_dp)));
            }

            let rate = match hop.direction {
                ConversionDirection::Buy => input.div(obtained),
                ConversionDirection::Sell => obtained.div(input),
            };
            rate_lines.push(format!("{}/{}: {}", prev_unit, hop.asset, rate.format_dp(2)));

            amount_per_hop.push(HopAmount {
                asset: hop.asset.clone(),
                amount: output,
            });
            working = output;
            local_per_unit = local_per_new;
            prev_unit = hop.asset.clone();
        }

        let exit = if self.include_transfer_fees {
            self.exit_fee.apply(working)
        } else {
            FixedPoint::ZERO
        };
        if !exit.is_zero() {
            let venue = self.hops.last().map(|h| h.venue.as_str()).unwrap_or("exit");
            narrative.push(format!(
                "# {venue} withdrawal fee: {sym}{}",
                exit.mul(local_per_unit).format_dp(2)
            ));
            total_fees = total_fees + exit.mul(local_per_unit);
        }

        let proceeds = working - exit;
        let profit = proceeds.signed_diff(capital);
        let roi = profit.pct_of(capital);

        narrative.push(SEPARATOR.to_string());
        narrative.push(format!("Profit: {}", profit.format_dp(2)));
        narrative.push(format!("ROI: {}", roi.format_dp(2)));
        narrative.push(SEPARATOR.to_string());
        narrative.extend(rate_lines);
        narrative.push(SEPARATOR.to_string());
        narrative.push(format!("Total fees: {sym}{}", total_fees.format_dp(2)));

        Ok(RouteResult {
            capital_in: capital,
            amount_per_hop,
            proceeds_out: proceeds,
            total_fees,
            profit,
            roi,
            narrative,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbsim_core::{BookSide, OrderLevel};
    use pretty_assertions::assert_eq;

    fn fp(s: &str) -> FixedPoint {
        s.parse().unwrap()
    }

    fn book(levels: &[(&str, &str)], side: BookSide) -> NormalizedBook {
        NormalizedBook::from_levels(
            levels
                .iter()
                .map(|(p, s)| OrderLevel::new(fp(p), fp(s)))
                .collect(),
            side,
        )
        .unwrap()
    }

    fn hop(
        venue: &str,
        asset: &str,
        dp: u32,
        book: NormalizedBook,
        direction: ConversionDirection,
        fee: FeeStep,
    ) -> Hop {
        Hop {
            venue: venue.into(),
            asset: asset.into(),
            display_dp: dp,
            book,
            direction,
            fee,
        }
    }

    /// ZAR -> EUR (synthetic forex book) -> XBT -> ZAR, with the bank and
    /// venue fee schedule applied along the way.
    fn zar_route(transfer_fees: bool, trade_fees: bool) -> Route {
        let rate = fp("15.25");
        let forex = NormalizedBook::from_quote(rate, fp("1000000"), BookSide::Asks).unwrap();
        let eur_asks = book(&[("650", "4"), ("655", "10")], BookSide::Asks);
        let zar_bids = book(&[("10200", "3"), ("10150", "10")], BookSide::Bids);

        Route {
            local_currency: "ZAR".into(),
            currency_symbol: "R".into(),
            wire_fee: FeeStep::proportional(fp("0.0055"))
                .with_clamp(fp("140"), fp("650"))
                .with_fixed(fp("110")),
            exit_fee: FeeStep::fixed(fp("8.5")),
            hops: vec![
                hop("bank", "EUR", 2, forex, ConversionDirection::Buy, FeeStep::FREE),
                hop(
                    "Kraken",
                    "XBT",
                    8,
                    eur_asks,
                    ConversionDirection::Buy,
                    FeeStep::proportional(fp("0.0026")).with_fixed(fp("15")),
                ),
                hop(
                    "Luno",
                    "ZAR",
                    2,
                    zar_bids,
                    ConversionDirection::Sell,
                    FeeStep::proportional(fp("0.01")).with_fixed(fp("0.0002")),
                ),
            ],
            include_transfer_fees: transfer_fees,
            include_trade_fees: trade_fees,
        }
    }

    #[test]
    fn frictionless_hop_with_toggles_off_has_zero_roi() {
        let route = Route {
            local_currency: "ZAR".into(),
            currency_symbol: "R".into(),
            wire_fee: FeeStep::fixed(fp("110")),
            exit_fee: FeeStep::FREE,
            hops: vec![hop(
                "flat",
                "ZAR",
                2,
                book(&[("1", "100000")], BookSide::Asks),
                ConversionDirection::Buy,
                FeeStep::proportional(fp("0.01")),
            )],
            include_transfer_fees: false,
            include_trade_fees: false,
        };

        let result = route.simulate(fp("5000")).unwrap();
        assert_eq!(result.proceeds_out, fp("5000"));
        assert_eq!(result.roi, SignedFixedPoint::ZERO);
        assert_eq!(result.total_fees, FixedPoint::ZERO);
    }

    #[test]
    fn full_route_figures_are_consistent() {
        let route = zar_route(true, true);
        let capital = fp("100000");
        let result = route.simulate(capital).unwrap();

        assert_eq!(result.capital_in, capital);
        assert_eq!(result.amount_per_hop.len(), 3);
        // Proceeds are the last hop's output less the fiat withdrawal fee.
        assert!(result.proceeds_out < result.amount_per_hop.last().unwrap().amount);
        assert_eq!(result.profit, result.proceeds_out.signed_diff(capital));
        assert_eq!(result.roi, result.profit.pct_of(capital));
        // Wire fee for 100000: 0.55% = 550 within [140, 650], + 110 = 660.
        assert!(result.total_fees >= fp("660"));
    }

    #[test]
    fn narrative_has_per_hop_lines_and_summary() {
        let route = zar_route(true, true);
        let result = route.simulate(fp("100000")).unwrap();
        let text = result.summary();

        assert!(text.starts_with("ZAR out: 100000.00"));
        assert!(text.contains("# wire transfer fee: R660.00"));
        assert!(text.contains("EUR: "));
        assert!(text.contains("XBT: "));
        assert!(text.contains("ZAR in: "));
        assert!(text.contains("# Kraken transfer fee: R"));
        assert!(text.contains("# Luno trade fee: R"));
        assert!(text.contains("# Luno withdrawal fee: R"));
        assert!(text.contains("Profit: "));
        assert!(text.contains("ROI: "));
        assert!(text.contains("ZAR/EUR: 15.25"));
        assert!(text.contains("EUR/XBT: "));
        assert!(text.contains("XBT/ZAR: "));
        assert!(text.contains("Total fees: R"));
        assert_eq!(
            result.narrative.iter().filter(|l| *l == SEPARATOR).count(),
            3
        );
    }

    #[test]
    fn transfer_toggle_drops_fixed_fees() {
        let with_fees = zar_route(true, true).simulate(fp("100000")).unwrap();
        let without = zar_route(false, true).simulate(fp("100000")).unwrap();
        assert!(without.proceeds_out > with_fees.proceeds_out);
        assert!(without.roi > with_fees.roi);
        assert!(!without.summary().contains("wire transfer fee"));
    }

    #[test]
    fn insufficient_liquidity_propagates_from_any_hop() {
        // 10 million ZAR is deeper than the EUR ask book.
        let route = zar_route(true, true);
        assert_eq!(
            route.simulate(fp("10000000")).unwrap_err(),
            SimError::InsufficientLiquidity
        );
    }

    #[test]
    fn invalid_amounts_are_rejected() {
        let route = zar_route(true, true);
        assert_eq!(
            route.simulate(FixedPoint::ZERO).unwrap_err(),
            SimError::InvalidAmount("amount must be positive".to_string())
        );
        assert!(matches!(
            route.parse_and_simulate("not-a-number").unwrap_err(),
            SimError::InvalidAmount(_)
        ));
        assert!(route.parse_and_simulate("100000").is_ok());
    }
}
