//! # REST API for Market Data
//!
//! Currency and BTC quotes for the header ticker. Always answers `200`:
//! when every provider is down the configured fallback rates are served.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use tracing::info;

use crate::AppState;

/// Create a router for market data APIs
pub fn router() -> Router<AppState> {
    Router::new().route("/market-data", get(get_market_data))
}

/// Current ticker items
pub async fn get_market_data(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/market-data");

    let items = state.market_data_service.get_market_data().await;
    (StatusCode::OK, Json(items))
}
