//! REST order book fetchers, one per venue.
//!
//! Each client makes a single snapshot request and parses the venue's JSON
//! shape into raw [`OrderLevel`]s. Prices and sizes arrive as decimal text
//! and are parsed straight into fixed point; nothing on this path goes
//! through binary floating point.

use crate::{FeedError, OrderBookSource};
use arbsim_core::{BookSide, Coin, Currency, FixedPoint, OrderLevel, Venue};
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

/// Parse a JSON string or number into fixed point without a float round-trip.
pub(crate) fn parse_decimal(value: &Value) -> Result<FixedPoint, FeedError> {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        other => {
            return Err(FeedError::ParseError(format!(
                "expected decimal, got {other}"
            )))
        }
    };
    text.parse()
        .map_err(|_| FeedError::ParseError(format!("bad decimal: {text:?}")))
}

async fn get_json(client: &reqwest::Client, url: &str) -> Result<Value, FeedError> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FeedError::HttpStatus(status.as_u16()));
    }
    Ok(response.json::<Value>().await?)
}

/// Build the adapter for a venue.
///
/// AltcoinTrader has no public JSON book endpoint and is not supported as a
/// fetchable source.
pub fn source_for(
    venue: Venue,
    client: reqwest::Client,
) -> Result<Box<dyn OrderBookSource>, FeedError> {
    match venue {
        Venue::Luno => Ok(Box::new(LunoClient::new(client))),
        Venue::Kraken => Ok(Box::new(KrakenClient::new(client))),
        Venue::Ice3x => Ok(Box::new(Ice3xClient::new(client))),
        Venue::AltcoinTrader => Err(FeedError::UnsupportedVenue(venue.name().to_string())),
    }
}

/// Luno REST order book client.
pub struct LunoClient {
    client: reqwest::Client,
}

impl LunoClient {
    const BASE_URL: &'static str = "https://api.luno.com";

    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn parse_levels(json: &Value, side: BookSide) -> Result<Vec<OrderLevel>, FeedError> {
        let key = match side {
            BookSide::Asks => "asks",
            BookSide::Bids => "bids",
        };
        let entries = json[key]
            .as_array()
            .ok_or_else(|| FeedError::ParseError(format!("no {key} array")))?;

        entries
            .iter()
            .map(|entry| {
                Ok(OrderLevel::new(
                    parse_decimal(&entry["price"])?,
                    parse_decimal(&entry["volume"])?,
                ))
            })
            .collect()
    }
}

#[async_trait]
impl OrderBookSource for LunoClient {
    fn venue(&self) -> Venue {
        Venue::Luno
    }

    async fn fetch_levels(
        &self,
        coin: Coin,
        currency: Currency,
        side: BookSide,
    ) -> Result<Vec<OrderLevel>, FeedError> {
        let pair = format!("{}{}", coin.code(), currency.code());
        let url = format!("{}/api/1/orderbook?pair={pair}", Self::BASE_URL);
        debug!(%pair, ?side, "fetching Luno order book");

        let json = get_json(&self.client, &url).await?;
        Self::parse_levels(&json, side)
    }
}

/// Kraken REST order book client.
pub struct KrakenClient {
    client: reqwest::Client,
}

impl KrakenClient {
    const BASE_URL: &'static str = "https://api.kraken.com";

    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Kraken pair naming: `X<coin>Z<currency>`, e.g. `XXBTZEUR`.
    fn pair(coin: Coin, currency: Currency) -> String {
        format!("X{}Z{}", coin.code(), currency.code())
    }

    fn parse_levels(json: &Value, side: BookSide) -> Result<Vec<OrderLevel>, FeedError> {
        if let Some(errors) = json["error"].as_array() {
            if !errors.is_empty() {
                let joined: Vec<String> = errors
                    .iter()
                    .map(|e| e.as_str().unwrap_or("unknown").to_string())
                    .collect();
                return Err(FeedError::ParseError(joined.join("; ")));
            }
        }

        let key = match side {
            BookSide::Asks => "asks",
            BookSide::Bids => "bids",
        };
        // The result object is keyed by the (occasionally re-spelled) pair
        // name; there is exactly one entry.
        let book = json["result"]
            .as_object()
            .and_then(|result| result.values().next())
            .ok_or_else(|| FeedError::ParseError("no result object".to_string()))?;
        let entries = book[key]
            .as_array()
            .ok_or_else(|| FeedError::ParseError(format!("no {key} array")))?;

        entries
            .iter()
            .map(|entry| {
                // Each entry is [price, volume, timestamp].
                Ok(OrderLevel::new(
                    parse_decimal(&entry[0])?,
                    parse_decimal(&entry[1])?,
                ))
            })
            .collect()
    }
}

#[async_trait]
impl OrderBookSource for KrakenClient {
    fn venue(&self) -> Venue {
        Venue::Kraken
    }

    async fn fetch_levels(
        &self,
        coin: Coin,
        currency: Currency,
        side: BookSide,
    ) -> Result<Vec<OrderLevel>, FeedError> {
        let pair = Self::pair(coin, currency);
        let url = format!("{}/0/public/Depth?pair={pair}", Self::BASE_URL);
        debug!(%pair, ?side, "fetching Kraken order book");

        let json = get_json(&self.client, &url).await?;
        Self::parse_levels(&json, side)
    }
}

/// Ice3x REST order book client. ZAR pairs only.
pub struct Ice3xClient {
    client: reqwest::Client,
}

impl Ice3xClient {
    const BASE_URL: &'static str = "https://ice3x.com";

    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn pair_id(coin: Coin) -> u32 {
        match coin {
            Coin::Bitcoin => 3,
            Coin::Litecoin => 6,
            Coin::Ethereum => 11,
        }
    }

    fn parse_levels(json: &Value) -> Result<Vec<OrderLevel>, FeedError> {
        let entities = json["response"]["entities"]
            .as_array()
            .ok_or_else(|| FeedError::ParseError("no entities array".to_string()))?;

        entities
            .iter()
            .map(|entry| {
                Ok(OrderLevel::new(
                    parse_decimal(&entry["price"])?,
                    parse_decimal(&entry["amount"])?,
                ))
            })
            .collect()
    }
}

#[async_trait]
impl OrderBookSource for Ice3xClient {
    fn venue(&self) -> Venue {
        Venue::Ice3x
    }

    async fn fetch_levels(
        &self,
        coin: Coin,
        currency: Currency,
        side: BookSide,
    ) -> Result<Vec<OrderLevel>, FeedError> {
        if currency != Currency::Zar {
            return Err(FeedError::UnsupportedVenue(format!(
                "Ice3x trades ZAR pairs only, not {currency}"
            )));
        }
        let book_type = match side {
            BookSide::Asks => "ask",
            BookSide::Bids => "bid",
        };
        let url = format!(
            "{}/api/v1/orderbook/info?type={book_type}&pair_id={}",
            Self::BASE_URL,
            Self::pair_id(coin)
        );
        debug!(coin = coin.code(), ?side, "fetching Ice3x order book");

        let json = get_json(&self.client, &url).await?;
        Self::parse_levels(&json)
    }
}
