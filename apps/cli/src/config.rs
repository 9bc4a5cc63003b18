//! Application configuration.
//!
//! Fee figures are kept as decimal strings in the file and parsed into fixed
//! point once, when the schedule is built. The defaults reproduce the FNB /
//! Kraken / Luno fee card the simulator was written against.

use arbsim_core::{FixedPoint, SimError};
use arbsim_engine::{FeeStep, GridConfig};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Fee schedule constants.
    pub fees: FeeSettings,
    /// Grid search defaults.
    pub grid: GridSettings,
    /// Backoff schedule for market-data fetches, in seconds.
    pub retry_delays_secs: Vec<u64>,
    /// Base URL of the forex rate API.
    pub forex_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            fees: FeeSettings::default(),
            grid: GridSettings::default(),
            retry_delays_secs: vec![5, 5, 5, 10, 5, 5, 5, 10],
            forex_url: "https://open.er-api.com/v6/latest".to_string(),
        }
    }
}

impl AppConfig {
    /// Load from a JSON file, falling back to defaults if the file is missing
    /// or malformed.
    pub fn load(path: &str) -> Self {
        match std::fs::read_to_string(path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(config) => config,
                Err(err) => {
                    warn!("invalid config file {path}: {err}, using defaults");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }
}

/// Fee schedule constants, as decimal strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeSettings {
    /// Fixed SWIFT charge on the outgoing wire, local currency.
    pub wire_fixed: String,
    /// Bank commission rate on the wire amount.
    pub wire_commission_rate: String,
    /// Lower bound on the commission.
    pub wire_commission_min: String,
    /// Upper bound on the commission.
    pub wire_commission_max: String,
    /// Deposit charge at the foreign venue, foreign currency.
    pub foreign_deposit: String,
    /// Trading fee rate at the foreign venue.
    pub foreign_trade_rate: String,
    /// Coin withdrawal charge leaving the foreign venue.
    pub foreign_withdrawal: String,
    /// Coin deposit charge arriving at the local venue.
    pub local_deposit: String,
    /// Trading fee rate at the local venue.
    pub local_trade_rate: String,
    /// Fiat withdrawal charge leaving the local venue, local currency.
    pub local_withdrawal: String,
}

impl Default for FeeSettings {
    fn default() -> Self {
        // TODO: Ice3x publishes its own fee tiers; confirm before trusting
        // Ice3x routes with real money.
        Self {
            wire_fixed: "110".to_string(),
            wire_commission_rate: "0.0055".to_string(),
            wire_commission_min: "140".to_string(),
            wire_commission_max: "650".to_string(),
            foreign_deposit: "15".to_string(),
            foreign_trade_rate: "0.0026".to_string(),
            foreign_withdrawal: "0.001".to_string(),
            local_deposit: "0.0002".to_string(),
            local_trade_rate: "0.01".to_string(),
            local_withdrawal: "8.5".to_string(),
        }
    }
}

/// Parsed fee schedule, ready to drop into a route.
#[derive(Debug, Clone, Copy)]
pub struct FeeSchedule {
    /// Commission plus SWIFT charge on the outgoing wire.
    pub wire: FeeStep,
    /// Deposit plus trading fee at the foreign venue.
    pub foreign_hop: FeeStep,
    /// Coin transfer charges into the local venue plus its trading fee.
    pub local_hop: FeeStep,
    /// Fiat withdrawal charge on the proceeds.
    pub exit: FeeStep,
}

impl FeeSettings {
    pub fn schedule(&self) -> Result<FeeSchedule, SimError> {
        let parse = |s: &str| s.parse::<FixedPoint>();

        let wire = FeeStep::proportional(parse(&self.wire_commission_rate)?)
            .with_clamp(
                parse(&self.wire_commission_min)?,
                parse(&self.wire_commission_max)?,
            )
            .with_fixed(parse(&self.wire_fixed)?);
        let foreign_hop = FeeStep::proportional(parse(&self.foreign_trade_rate)?)
            .with_fixed(parse(&self.foreign_deposit)?);
        // The coin leaves the foreign venue and lands at the local one; both
        // charges come off the coin amount before the sale.
        let local_hop = FeeStep::proportional(parse(&self.local_trade_rate)?)
            .with_fixed(parse(&self.foreign_withdrawal)? + parse(&self.local_deposit)?);
        let exit = FeeStep::fixed(parse(&self.local_withdrawal)?);

        Ok(FeeSchedule {
            wire,
            foreign_hop,
            local_hop,
            exit,
        })
    }
}

/// Grid search defaults, as decimal strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridSettings {
    pub max_invest: String,
    pub step: String,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            max_invest: "1000000".to_string(),
            step: "5000".to_string(),
        }
    }
}

impl GridSettings {
    pub fn to_grid(&self) -> Result<GridConfig, SimError> {
        Ok(GridConfig {
            max_invest: self.max_invest.parse()?,
            step: self.step.parse()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fp(s: &str) -> FixedPoint {
        s.parse().unwrap()
    }

    #[test]
    fn default_schedule_parses() {
        let schedule = FeeSettings::default().schedule().unwrap();
        // 100000 * 0.0055 = 550 within [140, 650], plus the 110 SWIFT charge.
        assert_eq!(schedule.wire.apply(fp("100000")), fp("660"));
        assert_eq!(schedule.foreign_hop.fixed, fp("15"));
        assert_eq!(schedule.local_hop.fixed, fp("0.0012"));
        assert_eq!(schedule.exit.apply(fp("50000")), fp("8.5"));
    }

    #[test]
    fn bad_fee_string_is_rejected() {
        let mut fees = FeeSettings::default();
        fees.wire_fixed = "not-a-number".to_string();
        assert!(matches!(
            fees.schedule(),
            Err(SimError::InvalidAmount(_))
        ));
    }

    #[test]
    fn grid_defaults_parse() {
        let grid = GridSettings::default().to_grid().unwrap();
        assert_eq!(grid.max_invest, fp("1000000"));
        assert_eq!(grid.step, fp("5000"));
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = AppConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.fees.wire_fixed, config.fees.wire_fixed);
        assert_eq!(parsed.retry_delays_secs, config.retry_delays_secs);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = AppConfig::load("/nonexistent/config.json");
        assert_eq!(config.forex_url, AppConfig::default().forex_url);
    }
}
