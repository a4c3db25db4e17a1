//! Instagram feed providers.
//!
//! - `GraphApiFeed`: official Graph API media listing, needs an access token
//! - `PublicProfileFeed`: the unauthenticated profile JSON endpoint, which
//!   Instagram rate-limits and blocks often

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use shared::InstagramPost;

use super::http::get_text;
use super::traits::{FeedSource, SourceError};

const GRAPH_FIELDS: &str =
    "id,caption,media_type,media_url,thumbnail_url,permalink,timestamp,like_count,comments_count";

pub struct GraphApiFeed {
    client: Client,
    url: String,
    access_token: String,
}

impl GraphApiFeed {
    pub fn new(client: Client, url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            access_token: access_token.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GraphMediaPage {
    #[serde(default)]
    data: Vec<GraphMedia>,
}

#[derive(Debug, Deserialize)]
struct GraphMedia {
    id: String,
    caption: Option<String>,
    media_type: Option<String>,
    media_url: Option<String>,
    thumbnail_url: Option<String>,
    permalink: Option<String>,
    timestamp: Option<String>,
    like_count: Option<u64>,
    comments_count: Option<u64>,
}

#[async_trait]
impl FeedSource for GraphApiFeed {
    fn name(&self) -> &str {
        "Instagram Graph API"
    }

    async fn fetch_posts(&self, limit: usize) -> Result<Vec<InstagramPost>, SourceError> {
        let limit_param = limit.to_string();
        let response = self
            .client
            .get(&self.url)
            .query(&[
                ("fields", GRAPH_FIELDS),
                ("limit", limit_param.as_str()),
                ("access_token", self.access_token.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        parse_graph_media(&body, limit)
    }
}

/// Map a Graph API media page to posts, skipping media without an image
pub fn parse_graph_media(body: &str, limit: usize) -> Result<Vec<InstagramPost>, SourceError> {
    let page: GraphMediaPage =
        serde_json::from_str(body).map_err(|e| SourceError::Parse(e.to_string()))?;

    let posts = page
        .data
        .into_iter()
        .filter_map(|media| {
            // Videos expose their cover image as the thumbnail
            let image_url = match media.media_type.as_deref() {
                Some("VIDEO") => media.thumbnail_url.or(media.media_url),
                _ => media.media_url.or(media.thumbnail_url),
            }?;
            let url = media
                .permalink
                .unwrap_or_else(|| format!("https://www.instagram.com/p/{}/", media.id));

            Some(InstagramPost {
                id: media.id,
                image_url,
                caption: media.caption,
                likes: media.like_count,
                comments: media.comments_count,
                url,
                timestamp: media.timestamp,
            })
        })
        .take(limit)
        .collect();

    Ok(posts)
}

pub struct PublicProfileFeed {
    client: Client,
    base_url: String,
    username: String,
}

impl PublicProfileFeed {
    pub fn new(client: Client, base_url: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            username: username.into(),
        }
    }

    fn profile_url(&self) -> String {
        format!(
            "{}/{}/?__a=1&__d=dis",
            self.base_url.trim_end_matches('/'),
            self.username
        )
    }
}

#[async_trait]
impl FeedSource for PublicProfileFeed {
    fn name(&self) -> &str {
        "Instagram public profile"
    }

    async fn fetch_posts(&self, limit: usize) -> Result<Vec<InstagramPost>, SourceError> {
        let body = get_text(&self.client, &self.profile_url()).await?;
        parse_profile_timeline(&body, limit)
    }
}

/// Map `data.user.edge_owner_to_timeline_media.edges` to posts
pub fn parse_profile_timeline(
    body: &str,
    limit: usize,
) -> Result<Vec<InstagramPost>, SourceError> {
    let data: Value = serde_json::from_str(body).map_err(|e| SourceError::Parse(e.to_string()))?;

    let edges = data
        .pointer("/data/user/edge_owner_to_timeline_media/edges")
        .and_then(Value::as_array)
        .ok_or_else(|| SourceError::Parse("timeline data not found".to_string()))?;

    let posts = edges
        .iter()
        .filter_map(|edge| edge.get("node"))
        .filter_map(|node| {
            let id = node.get("id").and_then(Value::as_str)?.to_string();
            let image_url = node.get("display_url").and_then(Value::as_str)?.to_string();
            let shortcode = node.get("shortcode").and_then(Value::as_str).unwrap_or(&id);

            let caption = node
                .pointer("/edge_media_to_caption/edges/0/node/text")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            let likes = node
                .pointer("/edge_liked_by/count")
                .and_then(Value::as_u64)
                .filter(|&count| count > 0)
                .or_else(|| {
                    node.pointer("/edge_media_preview_like/count")
                        .and_then(Value::as_u64)
                })
                .unwrap_or(0);
            let comments = node
                .pointer("/edge_media_to_comment/count")
                .and_then(Value::as_u64)
                .unwrap_or(0);
            let timestamp = node
                .get("taken_at_timestamp")
                .and_then(Value::as_i64)
                .and_then(|secs| DateTime::from_timestamp(secs, 0))
                .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true));

            Some(InstagramPost {
                url: format!("https://www.instagram.com/p/{}/", shortcode),
                id,
                image_url,
                caption: Some(caption),
                likes: Some(likes),
                comments: Some(comments),
                timestamp,
            })
        })
        .take(limit)
        .collect();

    Ok(posts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_graph_media() {
        let body = r#"{"data": [
            {"id": "1", "caption": "Yeni kampanya", "media_type": "IMAGE",
             "media_url": "https://cdn/1.jpg", "permalink": "https://www.instagram.com/p/abc/",
             "timestamp": "2025-11-01T10:00:00+0000", "like_count": 12, "comments_count": 3},
            {"id": "2", "media_type": "VIDEO", "media_url": "https://cdn/2.mp4",
             "thumbnail_url": "https://cdn/2.jpg"},
            {"id": "3", "media_type": "IMAGE"}
        ]}"#;

        let posts = parse_graph_media(body, 6).unwrap();

        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].url, "https://www.instagram.com/p/abc/");
        assert_eq!(posts[0].likes, Some(12));
        assert_eq!(posts[1].image_url, "https://cdn/2.jpg");
        assert_eq!(posts[1].url, "https://www.instagram.com/p/2/");
    }

    #[test]
    fn test_parse_graph_media_respects_limit() {
        let body = r#"{"data": [
            {"id": "1", "media_url": "a"},
            {"id": "2", "media_url": "b"},
            {"id": "3", "media_url": "c"}
        ]}"#;
        assert_eq!(parse_graph_media(body, 2).unwrap().len(), 2);
    }

    #[test]
    fn test_parse_profile_timeline() {
        let body = r#"{"data": {"user": {"edge_owner_to_timeline_media": {"edges": [
            {"node": {
                "id": "111", "shortcode": "Cx1", "display_url": "https://cdn/a.jpg",
                "taken_at_timestamp": 1700000000,
                "edge_media_to_caption": {"edges": [{"node": {"text": "Hayaline geç kalma"}}]},
                "edge_liked_by": {"count": 0},
                "edge_media_preview_like": {"count": 42},
                "edge_media_to_comment": {"count": 5}
            }},
            {"node": {"id": "222", "shortcode": "Cx2", "display_url": "https://cdn/b.jpg"}}
        ]}}}}"#;

        let posts = parse_profile_timeline(body, 6).unwrap();

        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].url, "https://www.instagram.com/p/Cx1/");
        assert_eq!(posts[0].caption.as_deref(), Some("Hayaline geç kalma"));
        assert_eq!(posts[0].likes, Some(42));
        assert_eq!(posts[0].comments, Some(5));
        assert_eq!(posts[0].timestamp.as_deref(), Some("2023-11-14T22:13:20.000Z"));
        assert_eq!(posts[1].caption.as_deref(), Some(""));
        assert_eq!(posts[1].likes, Some(0));
        assert_eq!(posts[1].timestamp, None);
    }

    #[test]
    fn test_parse_profile_without_timeline_is_error() {
        let result = parse_profile_timeline(r#"{"data": {"user": null}}"#, 6);
        assert!(matches!(result, Err(SourceError::Parse(_))));
    }

    #[test]
    fn test_profile_url() {
        let feed =
            PublicProfileFeed::new(Client::new(), "https://www.instagram.com/", "otofinansglobal");
        assert_eq!(
            feed.profile_url(),
            "https://www.instagram.com/otofinansglobal/?__a=1&__d=dis"
        );
    }
}
