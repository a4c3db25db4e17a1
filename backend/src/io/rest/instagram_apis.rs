//! # REST API for the Instagram Gallery

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use tracing::info;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/instagram-posts", get(get_instagram_posts))
}

/// Latest posts; an empty list when the feed is disabled or unavailable
pub async fn get_instagram_posts(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/instagram-posts");

    let posts = state.instagram_service.get_posts().await;
    (StatusCode::OK, Json(posts))
}
