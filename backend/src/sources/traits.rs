//! # Source Traits
//!
//! Abstractions over the third-party providers the site depends on. The
//! domain layer only sees these traits, so providers can be reordered,
//! replaced or faked in tests without touching the services.

use std::time::Duration;

use async_trait::async_trait;
use shared::{InstagramPost, RateTable};

/// Why a provider could not deliver data
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected HTTP status {0}")]
    Status(u16),
    #[error("could not parse response: {0}")]
    Parse(String),
    #[error("response contained no usable data")]
    Empty,
    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

/// A provider of buy/sell quotes keyed by symbol
///
/// Implementations return `Err` rather than an empty table when they have
/// nothing usable, so chains can move on to the next provider.
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Human-readable provider name used in logs
    fn name(&self) -> &str;

    /// Fetch the current quotes
    async fn fetch_rates(&self) -> Result<RateTable, SourceError>;
}

/// A provider of recent social-media posts
#[async_trait]
pub trait FeedSource: Send + Sync {
    fn name(&self) -> &str;

    /// Fetch at most `limit` posts, newest first
    async fn fetch_posts(&self, limit: usize) -> Result<Vec<InstagramPost>, SourceError>;
}
