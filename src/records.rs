// Typed results produced by the aggregation engine

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestaurantTypeSummary {
    pub restaurant_type: String,
    pub count: usize,
    pub percentage: f64,
    pub avg_rating: Option<f64>,
    pub avg_cost_for_two: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestaurantTypes {
    pub restaurant_types: Vec<RestaurantTypeSummary>,
    pub total_types: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopRestaurant {
    pub name: String,
    pub location: String,
    pub rating: Option<f64>,
    pub votes: u64,
    pub restaurant_type: String,
    pub cuisines: Vec<String>,
    pub rank: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopRestaurants {
    pub top_restaurants: Vec<TopRestaurant>,
    /// Row count of the table before deduplication
    pub total_restaurants: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoodieArea {
    pub area: String,
    pub restaurant_count: usize,
    pub avg_rating: Option<f64>,
    pub top_cuisines: Vec<String>,
    pub restaurant_types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoodieAreas {
    pub foodie_areas: Vec<FoodieArea>,
    /// Distinct locations in the whole table, before truncation
    pub total_areas: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NameMatch {
    pub name: String,
    pub location: String,
    pub restaurant_type: String,
    pub rating: Option<f64>,
    pub votes: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeMatch {
    pub restaurant_type: String,
    pub count: usize,
    pub avg_rating: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaMatch {
    pub area: String,
    pub restaurant_count: usize,
    pub avg_rating: Option<f64>,
}

/// One search result; the shape follows the search mode
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SearchHit {
    Name(NameMatch),
    Type(TypeMatch),
    Area(AreaMatch),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub query: String,
    pub mode: SearchMode,
    pub results: Vec<SearchHit>,
    pub total_matches: usize,
}

/// Primary ranking key for top restaurants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    #[default]
    Votes,
    Rating,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Votes => "votes",
            SortBy::Rating => "rating",
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "votes" => Ok(SortBy::Votes),
            "rating" => Ok(SortBy::Rating),
            other => Err(format!("sort_by must be one of: votes, rating (got '{}')", other)),
        }
    }
}

/// Column searched by the substring search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    Name,
    Type,
    Area,
}

impl SearchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMode::Name => "name",
            SearchMode::Type => "type",
            SearchMode::Area => "area",
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(SearchMode::Name),
            "type" => Ok(SearchMode::Type),
            "area" => Ok(SearchMode::Area),
            other => Err(format!("mode must be one of: name, type, area (got '{}')", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_parsing() {
        assert_eq!("rating".parse::<SortBy>(), Ok(SortBy::Rating));
        assert!("stars".parse::<SortBy>().is_err());
        assert_eq!("area".parse::<SearchMode>(), Ok(SearchMode::Area));
        assert!("Name".parse::<SearchMode>().is_err());
    }

    #[test]
    fn test_search_hit_serializes_flat() {
        let hit = SearchHit::Area(AreaMatch {
            area: "BTM".to_string(),
            restaurant_count: 2,
            avg_rating: None,
        });
        let json = serde_json::to_value(&hit).unwrap();
        assert_eq!(json["area"], "BTM");
        assert_eq!(json["restaurant_count"], 2);
        assert!(json["avg_rating"].is_null());
    }
}
