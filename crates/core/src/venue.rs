//! Venue, coin and currency identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Trading venue identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Venue {
    Luno = 1,
    Ice3x = 2,
    Kraken = 3,
    AltcoinTrader = 4,
}

impl Venue {
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Venue::Luno),
            2 => Some(Venue::Ice3x),
            3 => Some(Venue::Kraken),
            4 => Some(Venue::AltcoinTrader),
            _ => None,
        }
    }

    #[inline]
    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Venue::Luno => "Luno",
            Venue::Ice3x => "Ice3x",
            Venue::Kraken => "Kraken",
            Venue::AltcoinTrader => "AltcoinTrader",
        }
    }

    /// Whether this venue trades against the local currency (ZAR).
    pub fn is_local(self) -> bool {
        matches!(self, Venue::Luno | Venue::Ice3x | Venue::AltcoinTrader)
    }
}

impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Venue {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "luno" => Ok(Venue::Luno),
            "ice3x" => Ok(Venue::Ice3x),
            "kraken" => Ok(Venue::Kraken),
            "altcointrader" => Ok(Venue::AltcoinTrader),
            _ => Err(format!("unknown venue: {s}")),
        }
    }
}

/// Supported coins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Coin {
    Bitcoin = 1,
    Litecoin = 2,
    Ethereum = 3,
}

impl Coin {
    /// Ticker code used on venue APIs.
    pub fn code(self) -> &'static str {
        match self {
            Coin::Bitcoin => "XBT",
            Coin::Litecoin => "LTC",
            Coin::Ethereum => "ETH",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Coin::Bitcoin => "Bitcoin",
            Coin::Litecoin => "Litecoin",
            Coin::Ethereum => "Ethereum",
        }
    }

    /// Decimal places used when rendering coin amounts.
    pub fn display_dp(self) -> u32 {
        8
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Coin {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bitcoin" | "btc" | "xbt" => Ok(Coin::Bitcoin),
            "litecoin" | "ltc" => Ok(Coin::Litecoin),
            "ethereum" | "eth" => Ok(Coin::Ethereum),
            _ => Err(format!("unknown coin: {s}")),
        }
    }
}

/// Fiat currencies in the route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Currency {
    Zar = 1,
    Eur = 2,
}

impl Currency {
    pub fn code(self) -> &'static str {
        match self {
            Currency::Zar => "ZAR",
            Currency::Eur => "EUR",
        }
    }

    /// Prefix used in narrative fee lines, e.g. `R650.00`.
    pub fn symbol(self) -> &'static str {
        match self {
            Currency::Zar => "R",
            Currency::Eur => "€",
        }
    }

    /// Decimal places used when rendering currency amounts.
    pub fn display_dp(self) -> u32 {
        2
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
