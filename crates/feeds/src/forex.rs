//! Foreign exchange reference rates.
//!
//! A single quote is fetched per simulation: how many units of the local
//! currency the bank charges for one unit of the foreign currency. The
//! engine turns that quote into a synthetic one-level book, so the fetch
//! side only needs the raw rate.

use crate::rest::parse_decimal;
use crate::FeedError;
use arbsim_core::{Currency, FixedPoint};
use serde_json::Value;
use tracing::debug;
use url::Url;

const DEFAULT_BASE_URL: &str = "https://open.er-api.com/v6/latest";

/// Client for the open exchange-rate API.
pub struct ForexClient {
    client: reqwest::Client,
    base_url: Url,
}

impl ForexClient {
    pub fn new(client: reqwest::Client) -> Self {
        Self::with_base_url(
            client,
            DEFAULT_BASE_URL.parse().expect("default forex url is valid"),
        )
    }

    pub fn with_base_url(client: reqwest::Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    /// The buy-side rate: units of `local` paid per unit of `foreign`.
    pub async fn buy_quote(
        &self,
        foreign: Currency,
        local: Currency,
    ) -> Result<FixedPoint, FeedError> {
        let url = format!("{}/{}", self.base_url, foreign.code());
        debug!(foreign = foreign.code(), local = local.code(), "fetching forex quote");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::HttpStatus(status.as_u16()));
        }
        let json = response.json::<Value>().await?;
        parse_quote(&json, local)
    }
}

fn parse_quote(json: &Value, local: Currency) -> Result<FixedPoint, FeedError> {
    let rate = &json["rates"][local.code()];
    if rate.is_null() {
        return Err(FeedError::ParseError(format!(
            "no rate for {}",
            local.code()
        )));
    }
    parse_decimal(rate)
}
