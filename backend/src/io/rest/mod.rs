//! # REST API Interface Layer
//!
//! Each `*_apis` module exposes a `router()` that is nested under `/api` by
//! [`crate::create_router`]:
//!
//! - `calculator_apis`: `/api/calculator/*` loan calculations
//! - `market_data_apis`: `/api/market-data` currency and BTC ticker
//! - `instagram_apis`: `/api/instagram-posts` gallery feed
//! - `site_content_apis`: `/api/site-content` banks, brands, promotions
//! - `system_apis`: `/api/health`
//!
//! Validation failures are answered with `400` and an `ErrorResponse` body.
//! Provider outages never reach clients: the market-data and Instagram
//! endpoints degrade to fallback data or an empty list instead.

pub mod calculator_apis;
pub mod instagram_apis;
pub mod market_data_apis;
pub mod site_content_apis;
pub mod system_apis;
