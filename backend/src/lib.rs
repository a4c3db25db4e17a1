//! # Oto Finans Global Backend
//!
//! HTTP backend for the Oto Finans Global vehicle-loan site: the loan
//! calculator, the currency/BTC ticker, the Instagram gallery proxy and the
//! static marketing catalog. It also serves the built frontend bundle.
//!
//! ## Architecture
//!
//! ```text
//! Frontend (landing page, calculator widgets)
//!     ↓
//! IO Layer (axum REST routers)
//!     ↓
//! Domain Layer (calculator, market data, Instagram, catalog services)
//!     ↓
//! Sources (Trunçgil, GenelPara, CoinGecko, Instagram providers)
//! ```
//!
//! Configuration is loaded once at startup (see [`config`]) and every
//! service is built from it by [`initialize_backend`].

pub mod config;
pub mod domain;
pub mod io;
pub mod sources;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    http::{HeaderValue, Method},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::{AppConfig, ServerConfig};
use crate::domain::{CatalogService, InstagramService, LoanCalculatorService, MarketDataService};
use crate::io::rest::{
    calculator_apis, instagram_apis, market_data_apis, site_content_apis, system_apis,
};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub calculator_service: LoanCalculatorService,
    pub market_data_service: MarketDataService,
    pub instagram_service: InstagramService,
    pub catalog_service: CatalogService,
    pub config: Arc<AppConfig>,
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: Arc<AppConfig>) -> Result<AppState> {
    info!("Setting up HTTP client");
    let client = sources::http::build_client(config.market_data.source_timeout())
        .context("Failed to build HTTP client")?;

    info!("Setting up domain services");
    let calculator_service = LoanCalculatorService::new(config.calculator.clone());
    let market_data_service = MarketDataService::from_config(&config.market_data, &client);
    let instagram_service = InstagramService::from_config(&config.instagram, &client);
    let catalog_service = CatalogService::new(&config.catalog);

    info!("Setting up application state");
    Ok(AppState {
        calculator_service,
        market_data_service,
        instagram_service,
        catalog_service,
        config,
    })
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, server: &ServerConfig) -> Result<Router> {
    let origin = server
        .cors_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid CORS origin {}", server.cors_origin))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let api_routes = Router::new()
        .merge(market_data_apis::router())
        .merge(instagram_apis::router())
        .merge(site_content_apis::router())
        .merge(system_apis::router())
        .nest("/calculator", calculator_apis::router());

    let router = Router::new()
        .nest("/api", api_routes)
        .fallback_service(ServeDir::new(&server.static_dir))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    Ok(router)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::instagram::test_utils::FakeFeed;
    use crate::domain::market_data::service_with_sources;
    use crate::sources::chain::test_utils::{table, FakeBehavior, FakeSource};
    use crate::sources::RateSource;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use std::time::Duration;
    use tower::ServiceExt;

    fn test_state(currency: Vec<Arc<dyn RateSource>>, instagram: InstagramService) -> AppState {
        let config = Arc::new(AppConfig::default());
        AppState {
            calculator_service: LoanCalculatorService::new(config.calculator.clone()),
            market_data_service: service_with_sources(currency, Vec::new()),
            instagram_service: instagram,
            catalog_service: CatalogService::new(&config.catalog),
            config,
        }
    }

    fn test_router() -> Router {
        let state = test_state(Vec::new(), InstagramService::disabled());
        create_router(state, &ServerConfig::default()).unwrap()
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(test_router(), get("/api/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn test_market_data_uses_live_and_fallback_rates() {
        let live: Arc<dyn RateSource> =
            FakeSource::new("live", FakeBehavior::Rates(table(&[("USD", 44.25)])));
        let state = test_state(vec![live], InstagramService::disabled());
        let router = create_router(state, &ServerConfig::default()).unwrap();

        let (status, body) = send(router, get("/api/market-data")).await;

        assert_eq!(status, StatusCode::OK);
        let items = body.as_array().unwrap();
        assert_eq!(items.len(), 4);
        assert_eq!(items[0]["symbol"], "USD");
        assert_eq!(items[0]["buyRate"], 44.25);
        assert_eq!(items[1]["buyRate"], 51.4746);
        assert_eq!(items[3]["buyRateFormatted"], "3.500.000,00");
        assert_eq!(items[3]["isPositive"], true);
    }

    #[tokio::test]
    async fn test_instagram_posts() {
        let feed = InstagramService::new(Arc::new(FakeFeed::Posts(8)), 6, Duration::from_secs(1));
        let router = create_router(test_state(Vec::new(), feed), &ServerConfig::default()).unwrap();

        let (status, body) = send(router, get("/api/instagram-posts")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 6);
        assert_eq!(body[0]["imageUrl"], "https://cdn.example/1.jpg");
    }

    #[tokio::test]
    async fn test_instagram_failure_is_empty_list() {
        let feed = InstagramService::new(Arc::new(FakeFeed::Fail), 6, Duration::from_secs(1));
        let router = create_router(test_state(Vec::new(), feed), &ServerConfig::default()).unwrap();

        let (status, body) = send(router, get("/api/instagram-posts")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_products() {
        let (status, body) = send(test_router(), get("/api/calculator/products")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 3);
        assert_eq!(body[0]["id"], "tasit-kredisi");
    }

    #[tokio::test]
    async fn test_installment_reference_example() {
        let request = post_json(
            "/api/calculator/installment",
            json!({"principal": 100000, "ratePercent": 0.99, "termMonths": 48}),
        );

        let (status, body) = send(test_router(), request).await;

        assert_eq!(status, StatusCode::OK);
        let monthly = body["result"]["monthlyPayment"].as_f64().unwrap();
        assert!((monthly - 2627.50).abs() < 0.005);
        assert_eq!(body["monthlyPaymentFormatted"], "₺2.627,50");
        assert_eq!(body["meetsMinimumAmount"], true);
    }

    #[tokio::test]
    async fn test_installment_unknown_product_is_bad_request() {
        let request = post_json(
            "/api/calculator/installment",
            json!({"productId": "uzay-mekigi", "principal": 100000, "termMonths": 48}),
        );

        let (status, body) = send(test_router(), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Unknown loan product: uzay-mekigi");
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let request = post_json("/api/calculator/installment", json!({"principal": "çok"}));

        let (status, body) = send(test_router(), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_schedule() {
        let request = post_json(
            "/api/calculator/schedule",
            json!({"principal": 12000, "ratePercent": 0, "termMonths": 12}),
        );

        let (status, body) = send(test_router(), request).await;

        assert_eq!(status, StatusCode::OK);
        let rows = body["rows"].as_array().unwrap();
        assert_eq!(rows.len(), 12);
        assert_eq!(body["monthlyPayment"], 1000.0);
    }

    #[tokio::test]
    async fn test_scenarios() {
        let request = post_json(
            "/api/calculator/scenarios",
            json!({"totalPrice": 1000000, "ratePercent": 0.99}),
        );

        let (status, body) = send(test_router(), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["terms"], json!([12, 18, 24, 36, 48]));
        let rows = body["rows"].as_array().unwrap();
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0]["downPaymentPercent"], 20);
        assert_eq!(rows[0]["loanAmount"], 800000.0);
    }

    #[tokio::test]
    async fn test_site_content() {
        let (status, body) = send(test_router(), get("/api/site-content")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["contactPhone"], "+905324098440");
        assert_eq!(body["banks"].as_array().unwrap().len(), 10);
    }

    #[tokio::test]
    async fn test_invalid_cors_origin_is_error() {
        let state = test_state(Vec::new(), InstagramService::disabled());
        let server = ServerConfig {
            cors_origin: "bad\norigin".to_string(),
            ..ServerConfig::default()
        };
        assert!(create_router(state, &server).is_err());
    }
}
