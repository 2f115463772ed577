// Query-string validation. Raw values arrive as strings so every bad input
// becomes a 400 with our own message instead of an extractor rejection.

use crate::charts::ChartSize;
use crate::errors::AppError;
use crate::records::{SearchMode, SortBy};
use serde::Deserialize;
use std::ops::RangeInclusive;

pub const TOP_LIMIT: RangeInclusive<usize> = 1..=10;
pub const AREA_LIMIT: RangeInclusive<usize> = 1..=20;
pub const SEARCH_LIMIT: RangeInclusive<usize> = 1..=10;
pub const MAX_QUERY_CHARS: usize = 200;

const DEFAULT_LIMIT: usize = 10;

fn invalid(message: impl Into<String>) -> AppError {
    AppError::InvalidParameter(message.into())
}

fn parse_bounded<T>(raw: Option<&str>, name: &str, default: T, range: RangeInclusive<T>) -> Result<T, AppError>
where
    T: std::str::FromStr + PartialOrd + std::fmt::Display + Copy,
{
    let value = match raw {
        None => return Ok(default),
        Some(s) => s
            .trim()
            .parse::<T>()
            .map_err(|_| invalid(format!("{} must be an integer", name)))?,
    };

    if !range.contains(&value) {
        return Err(invalid(format!(
            "{} must be between {} and {}",
            name,
            range.start(),
            range.end()
        )));
    }
    Ok(value)
}

#[derive(Debug, Default, Deserialize)]
pub struct TopParams {
    pub limit: Option<String>,
    pub sort_by: Option<String>,
}

impl TopParams {
    pub fn validate(&self) -> Result<(usize, SortBy), AppError> {
        let limit = parse_bounded(self.limit.as_deref(), "limit", DEFAULT_LIMIT, TOP_LIMIT)?;
        let sort_by = match self.sort_by.as_deref() {
            None => SortBy::default(),
            Some(s) => s.parse::<SortBy>().map_err(AppError::InvalidParameter)?,
        };
        Ok((limit, sort_by))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AreaParams {
    pub limit: Option<String>,
}

impl AreaParams {
    pub fn validate(&self) -> Result<usize, AppError> {
        parse_bounded(self.limit.as_deref(), "limit", DEFAULT_LIMIT, AREA_LIMIT)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub mode: Option<String>,
    pub limit: Option<String>,
}

impl SearchParams {
    /// Returns the trimmed query, the mode, and the limit
    pub fn validate(&self) -> Result<(String, SearchMode, usize), AppError> {
        let query = self
            .q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .ok_or_else(|| invalid("Query parameter 'q' is required"))?;
        if query.chars().count() > MAX_QUERY_CHARS {
            return Err(invalid(format!(
                "Query parameter 'q' must be at most {} characters",
                MAX_QUERY_CHARS
            )));
        }

        let mode = self
            .mode
            .as_deref()
            .ok_or_else(|| invalid("Query parameter 'mode' is required"))?
            .parse::<SearchMode>()
            .map_err(AppError::InvalidParameter)?;

        let limit = parse_bounded(self.limit.as_deref(), "limit", DEFAULT_LIMIT, SEARCH_LIMIT)?;
        Ok((query.to_string(), mode, limit))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ChartParams {
    pub width: Option<String>,
    pub height: Option<String>,
}

impl ChartParams {
    pub fn validate(&self) -> Result<ChartSize, AppError> {
        let defaults = ChartSize::default();
        let width = parse_bounded(
            self.width.as_deref(),
            "width",
            defaults.width,
            crate::charts::WIDTH_RANGE,
        )?;
        let height = parse_bounded(
            self.height.as_deref(),
            "height",
            defaults.height,
            crate::charts::HEIGHT_RANGE,
        )?;
        ChartSize::new(width, height).map_err(AppError::InvalidParameter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn test_top_defaults_and_bounds() {
        assert_eq!(TopParams::default().validate().unwrap(), (10, SortBy::Votes));

        let params = TopParams { limit: some("3"), sort_by: some("rating") };
        assert_eq!(params.validate().unwrap(), (3, SortBy::Rating));

        for bad in ["0", "11", "-1", "ten"] {
            let params = TopParams { limit: some(bad), sort_by: None };
            assert!(matches!(params.validate(), Err(AppError::InvalidParameter(_))), "{}", bad);
        }

        let params = TopParams { limit: None, sort_by: some("stars") };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_area_limit_bounds() {
        assert_eq!(AreaParams { limit: some("20") }.validate().unwrap(), 20);
        assert!(AreaParams { limit: some("0") }.validate().is_err());
        assert!(AreaParams { limit: some("999") }.validate().is_err());
    }

    #[test]
    fn test_search_requires_query_and_mode() {
        let ok = SearchParams { q: some("  toit "), mode: some("name"), limit: None };
        assert_eq!(ok.validate().unwrap(), ("toit".to_string(), SearchMode::Name, 10));

        let cases = [
            SearchParams { q: None, mode: some("name"), limit: None },
            SearchParams { q: some("   "), mode: some("name"), limit: None },
            SearchParams { q: some("toit"), mode: None, limit: None },
            SearchParams { q: some("toit"), mode: some("cuisine"), limit: None },
            SearchParams { q: Some("a".repeat(201)), mode: some("name"), limit: None },
            SearchParams { q: some("toit"), mode: some("name"), limit: some("11") },
        ];
        for params in cases {
            assert!(params.validate().is_err(), "{:?}", params);
        }

        let max = SearchParams { q: Some("a".repeat(200)), mode: some("area"), limit: None };
        assert!(max.validate().is_ok());
    }

    #[test]
    fn test_chart_size_validation() {
        assert_eq!(ChartParams::default().validate().unwrap(), ChartSize::default());
        let params = ChartParams { width: some("100"), height: None };
        let err = params.validate().unwrap_err();
        assert_eq!(err.to_string(), "width must be between 300 and 1200");
        assert!(ChartParams { width: None, height: some("900") }.validate().is_err());
    }
}
