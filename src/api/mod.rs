//! REST API for the delivery dashboard
//!
//! Routes:
//!   GET  /api/v1/health              - Health check
//!   GET  /api/v1/filters             - Distinct areas / vehicles
//!   GET  /api/v1/dashboard           - Summary plus every chart
//!   GET  /api/v1/summary             - The four headline metrics
//!   GET  /api/v1/charts/weather      - Avg delivery time by weather
//!   GET  /api/v1/charts/category     - Orders by category
//!   GET  /api/v1/charts/histogram    - Delivery time distribution
//!   GET  /api/v1/charts/age-rating   - Agent age vs rating points
//!   GET  /api/v1/charts/stores       - Store coordinates
//!   GET  /api/v1/records             - Filtered rows
//!   POST /api/v1/reload              - Drop the cached table
//!
//! Filters are `?area=a,b&vehicle=c`; a missing or empty list leaves
//! that field unconstrained.

pub mod handlers;
pub mod service;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use service::DashboardService;

pub fn router(service: Arc<DashboardService>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/health", get(handlers::health))
        .route("/api/v1/filters", get(handlers::get_filters))
        .route("/api/v1/dashboard", get(handlers::get_dashboard))
        .route("/api/v1/summary", get(handlers::get_summary))
        // Charts
        .route("/api/v1/charts/weather", get(handlers::get_weather_chart))
        .route("/api/v1/charts/category", get(handlers::get_category_chart))
        .route("/api/v1/charts/histogram", get(handlers::get_histogram))
        .route("/api/v1/charts/age-rating", get(handlers::get_age_rating))
        .route("/api/v1/charts/stores", get(handlers::get_store_locations))
        // Raw table
        .route("/api/v1/records", get(handlers::get_records))
        .route("/api/v1/reload", post(handlers::reload))
        .with_state(service)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
