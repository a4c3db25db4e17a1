//! # REST API for Site Content
//!
//! Partner banks, car brands, promotions, service highlights and the
//! contact phone number shown on the landing page.

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
    Router::new().route("/site-content", get(get_site_content))
}

pub async fn get_site_content(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/site-content");
    (StatusCode::OK, Json(state.catalog_service.site_content().clone()))
}
