//! Ordered fallback over several `RateSource`s.
//!
//! Sources are tried one after another, each bounded by the same timeout.
//! The first non-empty table wins; every failure is logged and skipped.

use std::sync::Arc;
use std::time::Duration;

use shared::RateTable;
use tracing::{info, warn};

use super::traits::{RateSource, SourceError};

/// Result of a successful chain run
#[derive(Debug, Clone, PartialEq)]
pub struct ChainHit {
    /// Name of the source that answered
    pub source: String,
    pub rates: RateTable,
}

#[derive(Clone)]
pub struct SourceChain {
    label: String,
    sources: Vec<Arc<dyn RateSource>>,
    timeout: Duration,
}

impl SourceChain {
    pub fn new(
        label: impl Into<String>,
        sources: Vec<Arc<dyn RateSource>>,
        timeout: Duration,
    ) -> Self {
        Self {
            label: label.into(),
            sources,
            timeout,
        }
    }

    /// Names of the sources in the order they are tried
    pub fn source_names(&self) -> Vec<String> {
        self.sources.iter().map(|s| s.name().to_string()).collect()
    }

    /// Try each source in order and return the first usable answer
    pub async fn fetch_first(&self) -> Option<ChainHit> {
        for source in &self.sources {
            match self.fetch_from(source.as_ref()).await {
                Ok(rates) => {
                    info!(
                        "{} chain: using {} ({})",
                        self.label,
                        source.name(),
                        rates.keys().cloned().collect::<Vec<_>>().join(", ")
                    );
                    return Some(ChainHit {
                        source: source.name().to_string(),
                        rates,
                    });
                }
                Err(e) => warn!("{} chain: {} unavailable: {}", self.label, source.name(), e),
            }
        }

        warn!("{} chain: no source available", self.label);
        None
    }

    async fn fetch_from(&self, source: &dyn RateSource) -> Result<RateTable, SourceError> {
        let rates = tokio::time::timeout(self.timeout, source.fetch_rates())
            .await
            .map_err(|_| SourceError::Timeout(self.timeout))??;

        if rates.is_empty() {
            return Err(SourceError::Empty);
        }
        Ok(rates)
    }
}


#[cfg(test)]
mod tests {
    use super::test_utils::{table, FakeBehavior, FakeSource};
    use super::*;

    fn chain(sources: Vec<Arc<FakeSource>>, timeout: Duration) -> SourceChain {
        let sources = sources
            .into_iter()
            .map(|s| s as Arc<dyn RateSource>)
            .collect();
        SourceChain::new("test", sources, timeout)
    }

    #[tokio::test]
    async fn test_first_success_short_circuits() {
        let first = FakeSource::new("first", FakeBehavior::Rates(table(&[("USD", 43.0)])));
        let second = FakeSource::new("second", FakeBehavior::Rates(table(&[("USD", 44.0)])));

        let hit = chain(vec![first.clone(), second.clone()], Duration::from_secs(1))
            .fetch_first()
            .await
            .unwrap();

        assert_eq!(hit.source, "first");
        assert_eq!(hit.rates["USD"].buy_rate, 43.0);
        assert_eq!(second.call_count(), 0);
    }

    #[tokio::test]
    async fn test_falls_through_failures_and_empty_tables() {
        let failing = FakeSource::new("failing", FakeBehavior::Fail);
        let empty = FakeSource::new("empty", FakeBehavior::Empty);
        let working = FakeSource::new("working", FakeBehavior::Rates(table(&[("EUR", 51.0)])));

        let hit = chain(
            vec![failing.clone(), empty.clone(), working.clone()],
            Duration::from_secs(1),
        )
        .fetch_first()
        .await
        .unwrap();

        assert_eq!(hit.source, "working");
        assert_eq!(failing.call_count(), 1);
        assert_eq!(empty.call_count(), 1);
    }

    #[tokio::test]
    async fn test_slow_source_times_out() {
        let slow = FakeSource::new("slow", FakeBehavior::Hang(Duration::from_millis(500)));
        let fast = FakeSource::new("fast", FakeBehavior::Rates(table(&[("GBP", 60.0)])));

        let hit = chain(vec![slow, fast], Duration::from_millis(50))
            .fetch_first()
            .await
            .unwrap();

        assert_eq!(hit.source, "fast");
    }

    #[tokio::test]
    async fn test_all_sources_failing_returns_none() {
        let chain = chain(
            vec![
                FakeSource::new("a", FakeBehavior::Fail),
                FakeSource::new("b", FakeBehavior::Empty),
            ],
            Duration::from_secs(1),
        );

        assert!(chain.fetch_first().await.is_none());
        assert_eq!(chain.source_names(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_empty_chain_returns_none() {
        let chain = SourceChain::new("none", Vec::new(), Duration::from_secs(1));
        assert!(chain.source_names().is_empty());
        assert!(chain.fetch_first().await.is_none());
    }
}
