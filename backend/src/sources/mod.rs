//! # Sources Module
//!
//! Third-party data providers the site proxies: currency feeds (Trunçgil,
//! GenelPara), the CoinGecko bitcoin price and the Instagram feed.
//!
//! Every provider implements one of the traits in [`traits`] so the domain
//! services can hold them as `Arc<dyn ...>` and try them in a configured
//! order through a [`chain::SourceChain`].

pub mod chain;
pub mod coingecko;
pub mod genelpara;
pub mod http;
pub mod instagram;
pub mod traits;
pub mod truncgil;

use std::sync::Arc;

use reqwest::Client;

use crate::config::{SourceEndpoints, SourceKind};

pub use chain::{ChainHit, SourceChain};
pub use traits::{FeedSource, RateSource, SourceError};

/// Instantiate the provider behind a configured source kind
pub fn build_rate_source(
    kind: SourceKind,
    client: &Client,
    endpoints: &SourceEndpoints,
    crypto_spread: f64,
) -> Arc<dyn RateSource> {
    match kind {
        SourceKind::Truncgil => Arc::new(truncgil::TruncgilSource::new(
            client.clone(),
            endpoints.truncgil_url.clone(),
        )),
        SourceKind::GenelPara => Arc::new(genelpara::GenelParaSource::new(
            client.clone(),
            endpoints.genelpara_url.clone(),
        )),
        SourceKind::CoinGecko => Arc::new(coingecko::CoinGeckoSource::new(
            client.clone(),
            &endpoints.coingecko_url,
            false,
            crypto_spread,
        )),
        SourceKind::CoinGecko24h => Arc::new(coingecko::CoinGeckoSource::new(
            client.clone(),
            &endpoints.coingecko_url,
            true,
            crypto_spread,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_rate_source_names() {
        let client = Client::new();
        let endpoints = SourceEndpoints::default();

        let names: Vec<String> = [
            SourceKind::Truncgil,
            SourceKind::GenelPara,
            SourceKind::CoinGecko,
            SourceKind::CoinGecko24h,
        ]
        .into_iter()
        .map(|kind| build_rate_source(kind, &client, &endpoints, 0.005).name().to_string())
        .collect();

        assert_eq!(names, vec!["Trunçgil", "GenelPara", "CoinGecko", "CoinGecko (24h)"]);
    }
}
