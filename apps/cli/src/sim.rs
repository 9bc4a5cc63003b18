//! Orchestration: fetch books and rates, assemble routes, run the engine.
//!
//! All I/O happens here, wrapped in the retry policy. Route assembly is kept
//! in plain functions so it can be exercised against synthetic books.

use crate::catalog::{self, RouteSpec};
use crate::config::{AppConfig, FeeSchedule};
use arbsim_core::{BookSide, Coin, ConversionDirection, Currency, FixedPoint, SimError, Venue};
use arbsim_engine::{
    sweep, FeeStep, GridConfig, Hop, NormalizedBook, RoiCurve, Route, RouteResult,
};
use arbsim_feeds::{source_for, with_retry, FeedError, ForexClient, LogObserver, RetryPolicy};
use tracing::info;

fn unavailable(err: FeedError) -> SimError {
    SimError::MarketDataUnavailable(err.to_string())
}

/// One simulation session: a parsed fee schedule plus the fetch machinery.
pub struct Simulator {
    schedule: FeeSchedule,
    grid: GridConfig,
    policy: RetryPolicy,
    forex: ForexClient,
    client: reqwest::Client,
}

impl Simulator {
    pub fn new(config: &AppConfig, client: reqwest::Client) -> Result<Self, SimError> {
        let forex_url = config
            .forex_url
            .parse()
            .map_err(|_| SimError::MarketDataUnavailable(format!("bad forex url: {}", config.forex_url)))?;
        Ok(Self {
            schedule: config.fees.schedule()?,
            grid: config.grid.to_grid()?,
            policy: RetryPolicy::from_secs(&config.retry_delays_secs),
            forex: ForexClient::with_base_url(client.clone(), forex_url),
            client,
        })
    }

    /// Simulate deploying `raw` local currency through the forward route.
    pub async fn simulate(
        &self,
        venue: Venue,
        coin: Coin,
        raw: &str,
        transfer_fees: bool,
        trade_fees: bool,
    ) -> Result<RouteResult, SimError> {
        let capital: FixedPoint = raw.parse()?;
        let route = self
            .forward_route(venue, coin, capital, transfer_fees, trade_fees)
            .await?;
        route.simulate(capital)
    }

    /// Sweep the amount grid over one set of book snapshots.
    pub async fn optimal(
        &self,
        venue: Venue,
        coin: Coin,
        max_invest: Option<FixedPoint>,
        step: Option<FixedPoint>,
    ) -> Result<RoiCurve, SimError> {
        let grid = GridConfig {
            max_invest: max_invest.unwrap_or(self.grid.max_invest),
            step: step.unwrap_or(self.grid.step),
        };
        let route = self
            .forward_route(venue, coin, grid.max_invest, true, true)
            .await?;
        Ok(sweep(&route, &grid))
    }

    /// Price the reverse direction: buy the coin locally, sell it abroad and
    /// re-price the foreign proceeds at the forex rate.
    pub async fn reverse(
        &self,
        venue: Venue,
        coin: Coin,
        raw: &str,
    ) -> Result<RouteResult, SimError> {
        let capital: FixedPoint = raw.parse()?;
        let spec = catalog::resolve(venue, coin)?;
        let rate = self.fetch_rate(&spec).await?;
        let local_asks = self
            .fetch_book(spec.local_venue, coin, spec.local_currency, BookSide::Asks)
            .await?;
        let foreign_bids = self
            .fetch_book(spec.foreign_venue, coin, spec.foreign_currency, BookSide::Bids)
            .await?;
        let route = assemble_reverse(&spec, rate, capital, local_asks, foreign_bids)?;
        route.simulate(capital)
    }

    async fn forward_route(
        &self,
        venue: Venue,
        coin: Coin,
        capacity: FixedPoint,
        transfer_fees: bool,
        trade_fees: bool,
    ) -> Result<Route, SimError> {
        let spec = catalog::resolve(venue, coin)?;
        let rate = self.fetch_rate(&spec).await?;
        let foreign_asks = self
            .fetch_book(spec.foreign_venue, coin, spec.foreign_currency, BookSide::Asks)
            .await?;
        let local_bids = self
            .fetch_book(spec.local_venue, coin, spec.local_currency, BookSide::Bids)
            .await?;
        assemble_forward(
            &spec,
            &self.schedule,
            rate,
            capacity,
            foreign_asks,
            local_bids,
            transfer_fees,
            trade_fees,
        )
    }

    async fn fetch_book(
        &self,
        venue: Venue,
        coin: Coin,
        currency: Currency,
        side: BookSide,
    ) -> Result<NormalizedBook, SimError> {
        let source = source_for(venue, self.client.clone()).map_err(unavailable)?;
        let src = &*source;
        let levels = with_retry(&self.policy, &LogObserver, || {
            src.fetch_levels(coin, currency, side)
        })
        .await
        .map_err(unavailable)?;
        info!(
            venue = venue.name(),
            coin = coin.code(),
            ?side,
            levels = levels.len(),
            "fetched order book"
        );
        NormalizedBook::from_levels(levels, side)
    }

    async fn fetch_rate(&self, spec: &RouteSpec) -> Result<FixedPoint, SimError> {
        let forex = &self.forex;
        let (foreign, local) = (spec.foreign_currency, spec.local_currency);
        let rate = with_retry(&self.policy, &LogObserver, || forex.buy_quote(foreign, local))
            .await
            .map_err(unavailable)?;
        info!(%rate, "forex buy quote");
        Ok(rate)
    }
}

/// Local currency -> foreign currency -> coin -> local currency, with the
/// full fee schedule attached.
#[allow(clippy::too_many_arguments)]
fn assemble_forward(
    spec: &RouteSpec,
    schedule: &FeeSchedule,
    rate: FixedPoint,
    capacity: FixedPoint,
    foreign_asks: NormalizedBook,
    local_bids: NormalizedBook,
    transfer_fees: bool,
    trade_fees: bool,
) -> Result<Route, SimError> {
    let forex_book = NormalizedBook::from_quote(rate, capacity, BookSide::Asks)?;
    Ok(Route {
        local_currency: spec.local_currency.code().into(),
        currency_symbol: spec.local_currency.symbol().into(),
        wire_fee: schedule.wire,
        exit_fee: schedule.exit,
        hops: vec![
            Hop {
                venue: "bank".into(),
                asset: spec.foreign_currency.code().into(),
                display_dp: spec.foreign_currency.display_dp(),
                book: forex_book,
                direction: ConversionDirection::Buy,
                fee: FeeStep::FREE,
            },
            Hop {
                venue: spec.foreign_venue.name().into(),
                asset: spec.coin.code().into(),
                display_dp: spec.coin.display_dp(),
                book: foreign_asks,
                direction: ConversionDirection::Buy,
                fee: schedule.foreign_hop,
            },
            Hop {
                venue: spec.local_venue.name().into(),
                asset: spec.local_currency.code().into(),
                display_dp: spec.local_currency.display_dp(),
                book: local_bids,
                direction: ConversionDirection::Sell,
                fee: schedule.local_hop,
            },
        ],
        include_transfer_fees: transfer_fees,
        include_trade_fees: trade_fees,
    })
}

/// Local currency -> coin -> foreign currency -> local currency at the forex
/// rate, fee-free: a quick spread check for the opposite direction.
fn assemble_reverse(
    spec: &RouteSpec,
    rate: FixedPoint,
    capacity: FixedPoint,
    local_asks: NormalizedBook,
    foreign_bids: NormalizedBook,
) -> Result<Route, SimError> {
    let forex_book = NormalizedBook::from_quote(rate, capacity, BookSide::Bids)?;
    Ok(Route {
        local_currency: spec.local_currency.code().into(),
        currency_symbol: spec.local_currency.symbol().into(),
        wire_fee: FeeStep::FREE,
        exit_fee: FeeStep::FREE,
        hops: vec![
            Hop {
                venue: spec.local_venue.name().into(),
                asset: spec.coin.code().into(),
                display_dp: spec.coin.display_dp(),
                book: local_asks,
                direction: ConversionDirection::Buy,
                fee: FeeStep::FREE,
            },
            Hop {
                venue: spec.foreign_venue.name().into(),
                asset: spec.foreign_currency.code().into(),
                display_dp: spec.foreign_currency.display_dp(),
                book: foreign_bids,
                direction: ConversionDirection::Sell,
                fee: FeeStep::FREE,
            },
            Hop {
                venue: "bank".into(),
                asset: spec.local_currency.code().into(),
                display_dp: spec.local_currency.display_dp(),
                book: forex_book,
                direction: ConversionDirection::Sell,
                fee: FeeStep::FREE,
            },
        ],
        include_transfer_fees: false,
        include_trade_fees: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FeeSettings;
    use arbsim_core::OrderLevel;
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

    fn spec() -> RouteSpec {
        catalog::resolve(Venue::Luno, Coin::Bitcoin).unwrap()
    }

    #[test]
    fn simulator_builds_from_default_config() {
        let config = AppConfig::default();
        assert!(Simulator::new(&config, reqwest::Client::new()).is_ok());
    }

    #[test]
    fn forward_route_carries_the_fee_schedule() {
        let schedule = FeeSettings::default().schedule().unwrap();
        let foreign_asks = book(&[("65000", "4")], BookSide::Asks);
        let local_bids = book(&[("1200000", "3")], BookSide::Bids);

        let route = assemble_forward(
            &spec(),
            &schedule,
            fp("19.5"),
            fp("100000"),
            foreign_asks,
            local_bids,
            true,
            true,
        )
        .unwrap();

        assert_eq!(route.hops.len(), 3);
        assert_eq!(route.hops[0].venue, "bank");
        assert_eq!(route.hops[1].venue, "Kraken");
        assert_eq!(route.hops[2].venue, "Luno");
        assert_eq!(route.wire_fee, schedule.wire);
        assert_eq!(route.hops[1].fee, schedule.foreign_hop);

        let result = route.simulate(fp("100000")).unwrap();
        let text = result.summary();
        assert!(text.starts_with("ZAR out: 100000.00"));
        assert!(text.contains("EUR: "));
        assert!(text.contains("XBT: "));
        assert!(text.contains("ZAR in: "));
        assert!(text.contains("# wire transfer fee: R660.00"));
    }

    #[test]
    fn reverse_route_is_fee_free() {
        let local_asks = book(&[("1200000", "3")], BookSide::Asks);
        let foreign_bids = book(&[("65000", "4")], BookSide::Bids);

        let route = assemble_reverse(&spec(), fp("19.5"), fp("100000"), local_asks, foreign_bids)
            .unwrap();
        let result = route.simulate(fp("100000")).unwrap();

        assert_eq!(result.total_fees, FixedPoint::ZERO);
        assert_eq!(result.amount_per_hop.len(), 3);
        // Buying at 1.2M ZAR and selling at 65000 * 19.5 = 1.2675M ZAR
        // per coin leaves a positive spread.
        assert!(result.proceeds_out > result.capital_in);
    }
}
