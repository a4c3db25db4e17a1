//! GenelPara feed (`api.genelpara.com/json/?list=all`), refreshed every
//! 15 minutes upstream. Also carries gram gold (`GA`).

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use shared::{RateData, RateTable};

use super::http::{get_text, parse_number, strip_bom};
use super::traits::{RateSource, SourceError};
use crate::domain::formatting::round_dp;

/// Symbols read from the feed and the precision they are kept at
const SYMBOLS: [(&str, u32); 4] = [("USD", 4), ("EUR", 4), ("GBP", 4), ("GA", 2)];

pub struct GenelParaSource {
    client: Client,
    url: String,
}

impl GenelParaSource {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl RateSource for GenelParaSource {
    fn name(&self) -> &str {
        "GenelPara"
    }

    async fn fetch_rates(&self) -> Result<RateTable, SourceError> {
        let body = get_text(&self.client, &self.url).await?;
        parse_genelpara_payload(&body)
    }
}

/// Extract quotes from `{ success, data: { USD: { alis, satis, degisim } } }`
pub fn parse_genelpara_payload(body: &str) -> Result<RateTable, SourceError> {
    let data: Value =
        serde_json::from_str(strip_bom(body)).map_err(|e| SourceError::Parse(e.to_string()))?;

    if data.get("success").and_then(Value::as_bool) != Some(true) {
        return Err(SourceError::Parse("response not marked successful".to_string()));
    }
    let Some(items) = data.get("data").filter(|d| d.is_object()) else {
        return Err(SourceError::Parse("missing data object".to_string()));
    };

    let mut rates = RateTable::new();
    for (symbol, decimals) in SYMBOLS {
        let Some(item) = items.get(symbol) else {
            continue;
        };
        let buy = item.get("alis").and_then(parse_number);
        let sell = item.get("satis").and_then(parse_number);
        let change = item.get("degisim").and_then(parse_number).unwrap_or(0.0);

        if let (Some(buy), Some(sell)) = (buy, sell) {
            rates.insert(
                symbol.to_string(),
                RateData {
                    buy_rate: round_dp(buy, decimals),
                    sell_rate: round_dp(sell, decimals),
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
