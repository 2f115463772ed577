use crate::charts::{self, ChartImage, ChartKind};
use crate::errors::AppError;
use crate::http::middleware::RequestContext;
use crate::http::params::{AreaParams, ChartParams, SearchParams, TopParams};
use crate::http::response::respond;
use crate::http::AppState;
use crate::service::AnalyticsService;
use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Extension;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub uptime_seconds: u64,
    pub memory_usage_mb: u64,
    pub data_loaded: bool,
}

/// Resident set size in MiB, or 0 where /proc is unavailable
fn resident_memory_mb() -> u64 {
    std::fs::read_to_string("/proc/self/status")
        .ok()
        .and_then(|status| {
            status
                .lines()
                .find(|line| line.starts_with("VmRSS:"))
                .and_then(|line| line.split_whitespace().nth(1))
                .and_then(|kb| kb.parse::<u64>().ok())
        })
        .map(|kb| kb / 1024)
        .unwrap_or(0)
}

fn loaded(state: &AppState) -> Result<&Arc<AnalyticsService>, AppError> {
    state.analytics.as_ref().ok_or(AppError::DataUnavailable)
}

pub async fn health_handler(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
) -> Response {
    let health = Health {
        status: "healthy",
        uptime_seconds: state.started_at.elapsed().as_secs(),
        memory_usage_mb: resident_memory_mb(),
        data_loaded: state.analytics.is_some(),
    };
    respond(&ctx, Ok::<_, AppError>(health))
}

pub async fn restaurant_types_handler(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
) -> Response {
    let result = loaded(&state).map(|service| service.type_summary());
    respond(&ctx, result)
}

pub async fn top_restaurants_handler(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Query(params): Query<TopParams>,
) -> Response {
    let result = params.validate().and_then(|(limit, sort_by)| {
        loaded(&state).map(|service| service.top_restaurants(limit, sort_by))
    });
    respond(&ctx, result)
}

pub async fn foodie_areas_handler(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Query(params): Query<AreaParams>,
) -> Response {
    let result = params
        .validate()
        .and_then(|limit| loaded(&state).map(|service| service.foodie_areas(limit)));
    respond(&ctx, result)
}

pub async fn search_handler(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Query(params): Query<SearchParams>,
) -> Response {
    let result = params.validate().and_then(|(query, mode, limit)| {
        loaded(&state).map(|service| service.search(&query, mode, limit))
    });
    respond(&ctx, result)
}

fn build_chart(state: &AppState, chart_type: &str, params: &ChartParams) -> Result<ChartImage, AppError> {
    // Unknown kinds are 404 even when the size is also bad
    let kind = chart_type
        .parse::<ChartKind>()
        .map_err(|_| AppError::UnknownChart(chart_type.to_string()))?;
    let size = params.validate()?;
    let service = loaded(state)?;
    Ok(charts::render_chart(service, kind, size)?)
}

pub async fn chart_handler(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(chart_type): Path<String>,
    Query(params): Query<ChartParams>,
) -> Response {
    respond(&ctx, build_chart(&state, &chart_type, &params))
}
