//! Trunçgil Finans currency feed (`finans.truncgil.com/v4/today.json`).
//!
//! The feed is occasionally served with a BOM or slightly malformed JSON, so
//! parsing retries once on a repaired copy of the body.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use shared::{RateData, RateTable};
use tracing::{info, warn};

use super::http::{get_text, parse_number, repair_json, strip_bom};
use super::traits::{RateSource, SourceError};
use crate::domain::formatting::round_dp;

const CURRENCIES: [&str; 3] = ["USD", "EUR", "GBP"];

pub struct TruncgilSource {
    client: Client,
    url: String,
}

impl TruncgilSource {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl RateSource for TruncgilSource {
    fn name(&self) -> &str {
        "Trunçgil"
    }

    async fn fetch_rates(&self) -> Result<RateTable, SourceError> {
        let body = get_text(&self.client, &self.url).await?;
        parse_truncgil_payload(&body)
    }
}

/// Extract USD/EUR/GBP quotes from a Trunçgil payload
pub fn parse_truncgil_payload(body: &str) -> Result<RateTable, SourceError> {
    let text = strip_bom(body);
    let data: Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(e) => {
            warn!("Trunçgil JSON parse error: {}", e);
            let value = serde_json::from_str(&repair_json(text))
                .map_err(|e| SourceError::Parse(e.to_string()))?;
            info!("Recovered Trunçgil data after repairing JSON");
            value
        }
    };

    let mut rates = RateTable::new();
    for symbol in CURRENCIES {
        let Some(item) = data.get(symbol).filter(|item| item.is_object()) else {
            continue;
        };
        let buy = item.get("Buying").and_then(parse_number);
        let sell = item.get("Selling").and_then(parse_number);
        let change = item.get("Change").and_then(parse_number).unwrap_or(0.0);

        if let (Some(buy), Some(sell)) = (buy, sell) {
            rates.insert(
                symbol.to_string(),
                RateData {
                    buy_rate: round_dp(buy, 4),
                    sell_rate: round_dp(sell, 4),
                    change,
                },
            );
        }
    }

    if rates.is_empty() {
        return Err(SourceError::Empty);
    }
    Ok(rates)
}
