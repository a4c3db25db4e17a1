//! Market-data ticker service.
//!
//! Runs the currency and crypto source chains concurrently, overlays their
//! results on the configured fallback table and maps the merged table to the
//! ticker items the header shows. Always produces data: when every provider
//! is down, the fallback rates are served.

use reqwest::Client;
use shared::{MarketDataItem, RateTable};
use tracing::{info, warn};

use crate::config::{DisplayItem, MarketDataConfig, SourceKind};
use crate::domain::formatting::{format_tr_number, round_dp};
use crate::sources::{build_rate_source, ChainHit, SourceChain};

#[derive(Clone)]
pub struct MarketDataService {
    currency_chain: SourceChain,
    crypto_chain: SourceChain,
    fallback_rates: RateTable,
    display_items: Vec<DisplayItem>,
}

impl MarketDataService {
    pub fn new(
        currency_chain: SourceChain,
        crypto_chain: SourceChain,
        config: &MarketDataConfig,
    ) -> Self {
        Self {
            currency_chain,
            crypto_chain,
            fallback_rates: config.fallback_rates.clone(),
            display_items: config.display_items.clone(),
        }
    }

    /// Build both chains from the configured source order
    pub fn from_config(config: &MarketDataConfig, client: &Client) -> Self {
        let chain = |label: &str, kinds: &[SourceKind]| {
            let sources = kinds
                .iter()
                .map(|&kind| {
                    build_rate_source(kind, client, &config.endpoints, config.crypto_spread)
                })
                .collect();
            SourceChain::new(label, sources, config.source_timeout())
        };

        let currency_chain = chain("currency", config.currency_sources.as_slice());
        let crypto_chain = chain("crypto", config.crypto_sources.as_slice());
        info!(
            "Market data sources: currency {:?}, crypto {:?}",
            currency_chain.source_names(),
            crypto_chain.source_names()
        );

        Self::new(currency_chain, crypto_chain, config)
    }

    /// Current ticker items; never fails
    pub async fn get_market_data(&self) -> Vec<MarketDataItem> {
        let (currency, crypto) = tokio::join!(
            self.currency_chain.fetch_first(),
            self.crypto_chain.fetch_first()
        );

        let rates = self.merge_rates(currency, crypto);
        self.to_display_items(&rates)
    }

    /// Overlay live results on the fallback table, key by key
    pub fn merge_rates(&self, currency: Option<ChainHit>, crypto: Option<ChainHit>) -> RateTable {
        let mut rates = self.fallback_rates.clone();

        match currency {
            Some(hit) => rates.extend(hit.rates),
            None => warn!("Using fallback currency rates"),
        }
        match crypto {
            Some(hit) => rates.extend(hit.rates),
            None => warn!("Using fallback crypto rates"),
        }

        rates
    }

    /// Map the merged table to ticker items in display order
    pub fn to_display_items(&self, rates: &RateTable) -> Vec<MarketDataItem> {
        self.display_items
            .iter()
            .filter_map(|item| rates.get(&item.key).map(|rate| (item, rate)))
            .enumerate()
            .map(|(index, (item, rate))| {
                let buy_rate = round_dp(rate.buy_rate, item.decimals);
                let sell_rate = round_dp(rate.sell_rate, item.decimals);
                let change = round_dp(rate.change, 3);

                let (buy_rate_formatted, sell_rate_formatted) = if item.formatted {
                    (
                        Some(format_tr_number(buy_rate, item.decimals)),
                        Some(format_tr_number(sell_rate, item.decimals)),
                    )
                } else {
                    (None, None)
                };

                MarketDataItem {
                    id: index as u32 + 1,
                    symbol: item.symbol.clone(),
                    name: item.name.clone(),
                    buy_rate,
                    sell_rate,
                    change,
                    is_positive: change >= 0.0,
                    buy_rate_formatted,
                    sell_rate_formatted,
                }
            })
            .collect()
    }
}

/// Service wired to the given sources, for tests elsewhere in the crate
#[cfg(test)]
pub(crate) fn service_with_sources(
    currency: Vec<std::sync::Arc<dyn crate::sources::RateSource>>,
    crypto: Vec<std::sync::Arc<dyn crate::sources::RateSource>>,
) -> MarketDataService {
    let config = MarketDataConfig::default();
    let timeout = std::time::Duration::from_millis(200);
    MarketDataService::new(
        SourceChain::new("currency", currency, timeout),
        SourceChain::new("crypto", crypto, timeout),
        &config,
    )
}
