// HTTP surface: JSON API, chart endpoint, and dashboard pages

pub mod handlers;
pub mod middleware;
pub mod pages;
pub mod params;
pub mod response;

use crate::config::ServeConfig;
use crate::csv_reader;
use crate::service::AnalyticsService;
use anyhow::{Context, Result};
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

#[derive(Clone)]
pub struct AppState {
    /// None when the dataset failed to load; data routes then answer 500
    pub analytics: Option<Arc<AnalyticsService>>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(analytics: Option<AnalyticsService>) -> Self {
        Self {
            analytics: analytics.map(Arc::new),
            started_at: Instant::now(),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::index_page))
        .route("/top-restaurants", get(pages::top_restaurants_page))
        .route("/top-foodie-areas", get(pages::foodie_areas_page))
        .route("/top-restaurant-types", get(pages::restaurant_types_page))
        .route("/api/health", get(handlers::health_handler))
        .route("/api/restaurant-types", get(handlers::restaurant_types_handler))
        .route("/api/top-restaurants", get(handlers::top_restaurants_handler))
        .route("/api/foodie-areas", get(handlers::foodie_areas_handler))
        .route("/api/search", get(handlers::search_handler))
        .route("/api/charts/{chart_type}", get(handlers::chart_handler))
        .layer(axum::middleware::from_fn(middleware::request_context_middleware))
        .with_state(state)
}

/// Load the dataset and serve until the process is stopped.
///
/// A dataset that fails to load is logged and the server still starts.
pub async fn serve(config: ServeConfig) -> Result<()> {
    // 1. Load data
    let analytics = match csv_reader::load_restaurants(&config.data_path) {
        Ok(table) => Some(AnalyticsService::new(table, config.cache_ttl())),
        Err(e) => {
            error!(path = %config.data_path.display(), error = %format!("{:#}", e), "failed to load restaurant data");
            None
        }
    };

    // 2. Bind
    let app = build_router(AppState::new(analytics));
    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    info!(addr = %config.bind, "server listening");

    // 3. Serve
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
