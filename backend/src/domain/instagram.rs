//! Instagram feed service.
//!
//! Picks a feed provider from configuration at startup and turns every
//! failure into an empty list, so the gallery section simply hides itself.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use shared::InstagramPost;
use tracing::{info, warn};

use crate::config::InstagramConfig;
use crate::sources::instagram::{GraphApiFeed, PublicProfileFeed};
use crate::sources::{FeedSource, SourceError};

#[derive(Clone)]
pub struct InstagramService {
    source: Option<Arc<dyn FeedSource>>,
    limit: usize,
    timeout: Duration,
}

impl InstagramService {
    pub fn new(source: Arc<dyn FeedSource>, limit: usize, timeout: Duration) -> Self {
        Self {
            source: Some(source),
            limit,
            timeout,
        }
    }

    /// Service that always answers with an empty feed
    pub fn disabled() -> Self {
        Self {
            source: None,
            limit: 0,
            timeout: Duration::ZERO,
        }
    }

    /// Graph API when a token is configured, otherwise the public profile
    /// endpoint if allowed, otherwise nothing
    pub fn from_config(config: &InstagramConfig, client: &Client) -> Self {
        let source: Arc<dyn FeedSource> = match &config.access_token {
            Some(token) => Arc::new(GraphApiFeed::new(
                client.clone(),
                config.graph_api_url.clone(),
                token.clone(),
            )),
            None if config.public_profile_fallback => Arc::new(PublicProfileFeed::new(
                client.clone(),
                config.public_profile_base_url.clone(),
                config.username.clone(),
            )),
            None => {
                info!("No Instagram access token configured, feed disabled");
                return Self::disabled();
            }
        };

        info!("Instagram feed via {} for @{}", source.name(), config.username);
        Self::new(source, config.limit, config.timeout())
    }

    /// Latest posts, or an empty list if the feed is disabled or failing
    pub async fn get_posts(&self) -> Vec<InstagramPost> {
        let Some(source) = &self.source else {
            return Vec::new();
        };

        let result = tokio::time::timeout(self.timeout, source.fetch_posts(self.limit))
            .await
            .map_err(|_| SourceError::Timeout(self.timeout))
            .and_then(|posts| posts);

        match result {
            Ok(mut posts) => {
                posts.truncate(self.limit);
                info!("Fetched {} Instagram posts from {}", posts.len(), source.name());
                posts
            }
            Err(e) => {
                warn!("Instagram feed unavailable ({}): {}", source.name(), e);
                Vec::new()
            }
        }
    }
}
