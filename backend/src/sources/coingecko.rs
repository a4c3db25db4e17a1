//! CoinGecko BTC/TRY spot price.
//!
//! CoinGecko only publishes a mid price, so the sell side gets a fixed spread
//! on top. The 24h variant also reports the daily change.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use shared::{RateData, RateTable};

use super::http::{get_text, parse_number, strip_bom};
use super::traits::{RateSource, SourceError};
use crate::domain::formatting::round_dp;

pub const BTC_SYMBOL: &str = "BTC";

pub struct CoinGeckoSource {
    client: Client,
    url: String,
    include_24h_change: bool,
    spread: f64,
}

impl CoinGeckoSource {
    /// `base_url` is the simple-price endpoint for bitcoin in TRY
    pub fn new(client: Client, base_url: &str, include_24h_change: bool, spread: f64) -> Self {
        let url = if include_24h_change {
            format!("{}&include_24hr_change=true", base_url)
        } else {
            base_url.to_string()
        };
        Self {
            client,
            url,
            include_24h_change,
            spread,
        }
    }
}

#[async_trait]
impl RateSource for CoinGeckoSource {
    fn name(&self) -> &str {
        if self.include_24h_change {
            "CoinGecko (24h)"
        } else {
            "CoinGecko"
        }
    }

    async fn fetch_rates(&self) -> Result<RateTable, SourceError> {
        let body = get_text(&self.client, &self.url).await?;
        parse_coingecko_payload(&body, self.spread)
    }
}

/// Turn `{ bitcoin: { try, try_24h_change? } }` into a BTC quote
pub fn parse_coingecko_payload(body: &str, spread: f64) -> Result<RateTable, SourceError> {
    let data: Value =
        serde_json::from_str(strip_bom(body)).map_err(|e| SourceError::Parse(e.to_string()))?;

    let bitcoin = data
        .get("bitcoin")
        .ok_or_else(|| SourceError::Parse("missing bitcoin entry".to_string()))?;
    let price = bitcoin
        .get("try")
        .and_then(parse_number)
        .filter(|price| *price > 0.0)
        .ok_or(SourceError::Empty)?;
    let change = bitcoin
        .get("try_24h_change")
        .and_then(parse_number)
        .unwrap_or(0.0);

    let mut rates = RateTable::new();
    rates.insert(
        BTC_SYMBOL.to_string(),
        RateData {
            buy_rate: round_dp(price, 2),
            sell_rate: round_dp(price * (1.0 + spread), 2),
            change,
        },
    );
    Ok(rates)
}
