// Chart catalogue: engine output -> canvas -> base64 PNG

use crate::graph::Canvas;
use crate::palette;
use crate::records::SortBy;
use crate::service::AnalyticsService;
use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

pub const WIDTH_RANGE: RangeInclusive<u32> = 300..=1200;
pub const HEIGHT_RANGE: RangeInclusive<u32> = 200..=800;

const PIE_SLICES: usize = 8;
const BAR_ROWS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ChartKind {
    RestaurantTypesPie,
    TopRestaurantsBar,
    FoodieAreasBar,
}

impl ChartKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::RestaurantTypesPie => "restaurant-types-pie",
            ChartKind::TopRestaurantsBar => "top-restaurants-bar",
            ChartKind::FoodieAreasBar => "foodie-areas-bar",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ChartKind::RestaurantTypesPie => "Restaurant Types Distribution",
            ChartKind::TopRestaurantsBar => "Top Restaurants by Votes",
            ChartKind::FoodieAreasBar => "Top Foodie Areas",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "restaurant-types-pie" => Ok(ChartKind::RestaurantTypesPie),
            "top-restaurants-bar" => Ok(ChartKind::TopRestaurantsBar),
            "foodie-areas-bar" => Ok(ChartKind::FoodieAreasBar),
            other => Err(format!("Unknown chart type: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartSize {
    pub width: u32,
    pub height: u32,
}

impl Default for ChartSize {
    fn default() -> Self {
        Self {
            width: 800,
            height: 400,
        }
    }
}

impl ChartSize {
    /// Both dimensions must fall inside the accepted pixel ranges
    pub fn new(width: u32, height: u32) -> Result<Self, String> {
        if !WIDTH_RANGE.contains(&width) {
            return Err(format!(
                "width must be between {} and {}",
                WIDTH_RANGE.start(),
                WIDTH_RANGE.end()
            ));
        }
        if !HEIGHT_RANGE.contains(&height) {
            return Err(format!(
                "height must be between {} and {}",
                HEIGHT_RANGE.start(),
                HEIGHT_RANGE.end()
            ));
        }
        Ok(Self { width, height })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartImage {
    pub chart_type: String,
    pub title: String,
    pub base64_image: String,
    pub width: u32,
    pub height: u32,
}

/// Largest types first; everything past the first few collapses into "Other"
fn type_slices(service: &AnalyticsService) -> Vec<(String, f64)> {
    let summary = service.type_summary();
    let mut slices: Vec<(String, f64)> = summary
        .restaurant_types
        .iter()
        .take(PIE_SLICES)
        .map(|t| (t.restaurant_type.clone(), t.count as f64))
        .collect();

    let other: usize = summary
        .restaurant_types
        .iter()
        .skip(PIE_SLICES)
        .map(|t| t.count)
        .sum();
    if other > 0 {
        slices.push(("Other".to_string(), other as f64));
    }
    slices
}

fn top_restaurant_bars(service: &AnalyticsService) -> Vec<(String, f64)> {
    service
        .top_restaurants(BAR_ROWS, SortBy::Votes)
        .top_restaurants
        .into_iter()
        .map(|r| (r.name, r.votes as f64))
        .collect()
}

fn foodie_area_bars(service: &AnalyticsService) -> Vec<(String, f64)> {
    service
        .foodie_areas(BAR_ROWS)
        .foodie_areas
        .into_iter()
        .map(|a| (a.area, a.restaurant_count as f64))
        .collect()
}

/// Draw `kind` at `size` and return the raw PNG bytes
pub fn render_png(service: &AnalyticsService, kind: ChartKind, size: ChartSize) -> Result<Vec<u8>> {
    let mut canvas = Canvas::new(size.width, size.height, kind.title())?;

    match kind {
        ChartKind::RestaurantTypesPie => canvas.draw_pie(&type_slices(service)),
        ChartKind::TopRestaurantsBar => {
            canvas.draw_horizontal_bars(&top_restaurant_bars(service), "Votes", palette::BAR_BLUE)
        }
        ChartKind::FoodieAreasBar => canvas.draw_horizontal_bars(
            &foodie_area_bars(service),
            "Number of Restaurants",
            palette::BAR_ORANGE,
        ),
    }
    .with_context(|| format!("Failed to draw {}", kind))?;

    canvas.render()
}

pub fn render_chart(service: &AnalyticsService, kind: ChartKind, size: ChartSize) -> Result<ChartImage> {
    let png = render_png(service, kind, size)?;

    Ok(ChartImage {
        chart_type: kind.as_str().to_string(),
        title: kind.title().to_string(),
        base64_image: STANDARD.encode(png),
        width: size.width,
        height: size.height,
    })
}
