//! REST API handlers for the delivery dashboard
//!
//! These handlers use the shared DashboardService.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;

use super::service::DashboardService;
use crate::aggregate::{
    age_rating_points, by_category, by_weather, duration_histogram, store_locations,
    summary_metrics, AgeRatingPoint, CategoryCount, Dashboard, HistogramBin, StoreLocation,
    SummaryDisplay, SummaryMetrics, WeatherDuration,
};
use crate::filter::FilterSelection;
use crate::loader::LoadError;
use crate::models::DeliveryRecord;
use crate::report::late_label;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct FiltersResponse {
    pub areas: Vec<String>,
    pub vehicles: Vec<String>,
    pub late_threshold_minutes: f64,
    pub total_records: usize,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub metrics: SummaryMetrics,
    pub display: SummaryDisplay,
    pub late_label: String,
}

#[derive(Debug, Serialize)]
pub struct RecordsResponse {
    pub total: usize,
    pub records: Vec<DeliveryRecord>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

// ============================================================================
// Query Parameters
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct FilterQuery {
    /// Comma-separated Area values
    pub area: Option<String>,
    /// Comma-separated Vehicle values
    pub vehicle: Option<String>,
    pub bins: Option<usize>,
    pub limit: Option<usize>,
}

fn split_list(list: Option<&str>) -> Vec<String> {
    list.map(|l| {
        l.split(',')
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

impl FilterQuery {
    /// Values are matched verbatim, so they are not trimmed.
    pub fn selection(&self) -> FilterSelection {
        FilterSelection::new(
            split_list(self.area.as_deref()),
            split_list(self.vehicle.as_deref()),
        )
    }

    fn histogram_bins(&self) -> Result<Option<usize>, ApiError> {
        match self.bins {
            Some(0) => Err(bad_request("bins must be at least 1")),
            other => Ok(other),
        }
    }
}

fn bad_request(message: &str) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}

fn load_failed(e: LoadError) -> ApiError {
    error!("Dataset unavailable: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
}

// ============================================================================
// Handlers
// ============================================================================

pub type AppState = Arc<DashboardService>;

/// GET /api/v1/health
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

/// GET /api/v1/filters
pub async fn get_filters(State(service): State<AppState>) -> Result<Json<FiltersResponse>, ApiError> {
    let options = service.filter_options().await.map_err(load_failed)?;
    Ok(Json(FiltersResponse {
        areas: options.areas,
        vehicles: options.vehicles,
        late_threshold_minutes: options.late_threshold_minutes,
        total_records: options.total_records,
    }))
}

/// GET /api/v1/dashboard
pub async fn get_dashboard(
    State(service): State<AppState>,
    Query(params): Query<FilterQuery>,
) -> Result<Json<Dashboard>, ApiError> {
    let bins = params.histogram_bins()?;
    let dashboard = service
        .dashboard(&params.selection(), bins)
        .await
        .map_err(load_failed)?;
    Ok(Json(dashboard))
}

/// GET /api/v1/summary
pub async fn get_summary(
    State(service): State<AppState>,
    Query(params): Query<FilterQuery>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let rows = service.filtered(&params.selection()).await.map_err(load_failed)?;
    let metrics = summary_metrics(&rows);
    Ok(Json(SummaryResponse {
        display: metrics.display(),
        metrics,
        late_label: late_label(service.late_threshold_minutes()),
    }))
}

/// GET /api/v1/charts/weather
pub async fn get_weather_chart(
    State(service): State<AppState>,
    Query(params): Query<FilterQuery>,
) -> Result<Json<Vec<WeatherDuration>>, ApiError> {
    let rows = service.filtered(&params.selection()).await.map_err(load_failed)?;
    Ok(Json(by_weather(&rows)))
}

/// GET /api/v1/charts/category
pub async fn get_category_chart(
    State(service): State<AppState>,
    Query(params): Query<FilterQuery>,
) -> Result<Json<Vec<CategoryCount>>, ApiError> {
    let rows = service.filtered(&params.selection()).await.map_err(load_failed)?;
    Ok(Json(by_category(&rows)))
}

/// GET /api/v1/charts/histogram
pub async fn get_histogram(
    State(service): State<AppState>,
    Query(params): Query<FilterQuery>,
) -> Result<Json<Vec<HistogramBin>>, ApiError> {
    let bins = params.histogram_bins()?.unwrap_or(service.histogram_bins());
    let rows = service.filtered(&params.selection()).await.map_err(load_failed)?;
    Ok(Json(duration_histogram(&rows, bins)))
}

/// GET /api/v1/charts/age-rating
pub async fn get_age_rating(
    State(service): State<AppState>,
    Query(params): Query<FilterQuery>,
) -> Result<Json<Vec<AgeRatingPoint>>, ApiError> {
    let rows = service.filtered(&params.selection()).await.map_err(load_failed)?;
    Ok(Json(age_rating_points(&rows)))
}

/// GET /api/v1/charts/stores
pub async fn get_store_locations(
    State(service): State<AppState>,
    Query(params): Query<FilterQuery>,
) -> Result<Json<Vec<StoreLocation>>, ApiError> {
    let rows = service.filtered(&params.selection()).await.map_err(load_failed)?;
    Ok(Json(store_locations(&rows)))
}

/// GET /api/v1/records
pub async fn get_records(
    State(service): State<AppState>,
    Query(params): Query<FilterQuery>,
) -> Result<Json<RecordsResponse>, ApiError> {
    let mut rows = service.filtered(&params.selection()).await.map_err(load_failed)?;
    let total = rows.len();
    if let Some(limit) = params.limit {
        rows.truncate(limit);
    }
    Ok(Json(RecordsResponse { total, records: rows }))
}

/// POST /api/v1/reload
pub async fn reload(State(service): State<AppState>) -> impl IntoResponse {
    service.reload().await;
    Json(serde_json::json!({"status": "reloaded"}))
}
