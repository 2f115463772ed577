// Library exports for restaurant-insights

pub mod cache;
pub mod charts;
pub mod config;
pub mod csv_reader;
pub mod data;
pub mod errors;
pub mod graph;
pub mod http;
pub mod logging;
pub mod palette;
pub mod parser;
pub mod records;
pub mod search;
pub mod service;
pub mod transform;

pub use data::{Restaurant, RestaurantTable};
pub use errors::AppError;
pub use http::{build_router, AppState};
pub use service::AnalyticsService;
