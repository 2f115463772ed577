// Memoized entry points over a loaded table

use crate::cache::{CacheKey, ResultCache};
use crate::data::RestaurantTable;
use crate::records::{FoodieAreas, RestaurantTypes, SearchMode, SearchResult, SortBy, TopRestaurants};
use crate::search;
use crate::transform;
use parking_lot::Mutex;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Everything the cache can hold
#[derive(Debug, Clone)]
pub enum CachedResult {
    Types(RestaurantTypes),
    Top(TopRestaurants),
    Areas(FoodieAreas),
}

trait Cacheable: Clone {
    fn wrap(self) -> CachedResult;
    fn unwrap_cached(cached: CachedResult) -> Option<Self>;
}

impl Cacheable for RestaurantTypes {
    fn wrap(self) -> CachedResult {
        CachedResult::Types(self)
    }

    fn unwrap_cached(cached: CachedResult) -> Option<Self> {
        match cached {
            CachedResult::Types(v) => Some(v),
            _ => None,
        }
    }
}

impl Cacheable for TopRestaurants {
    fn wrap(self) -> CachedResult {
        CachedResult::Top(self)
    }

    fn unwrap_cached(cached: CachedResult) -> Option<Self> {
        match cached {
            CachedResult::Top(v) => Some(v),
            _ => None,
        }
    }
}

impl Cacheable for FoodieAreas {
    fn wrap(self) -> CachedResult {
        CachedResult::Areas(self)
    }

    fn unwrap_cached(cached: CachedResult) -> Option<Self> {
        match cached {
            CachedResult::Areas(v) => Some(v),
            _ => None,
        }
    }
}

/// Owns the table and the result cache guarding the aggregations.
///
/// The cache lock is held only around a lookup or a store, never while an
/// aggregation runs, so two concurrent misses may both compute; the later
/// store wins and both callers see equal values.
#[derive(Debug)]
pub struct AnalyticsService {
    table: RestaurantTable,
    cache: Mutex<ResultCache<CachedResult>>,
    ttl: Duration,
}

impl AnalyticsService {
    pub fn new(table: RestaurantTable, ttl: Duration) -> Self {
        Self {
            table,
            cache: Mutex::new(ResultCache::new()),
            ttl,
        }
    }

    pub fn table(&self) -> &RestaurantTable {
        &self.table
    }

    pub fn cached_entries(&self) -> usize {
        self.cache.lock().len()
    }

    fn memoize<T, F>(&self, key: CacheKey, compute: F) -> T
    where
        T: Cacheable,
        F: FnOnce(&RestaurantTable) -> T,
    {
        let hit = self.cache.lock().get(key.as_str());
        if let Some(value) = hit.and_then(T::unwrap_cached) {
            debug!(key = %key, "analytics cache hit");
            return value;
        }

        debug!(key = %key, "analytics cache miss");
        let value = compute(&self.table);
        self.cache
            .lock()
            .set(key.as_str(), value.clone().wrap(), self.ttl);
        value
    }

    pub fn type_summary(&self) -> RestaurantTypes {
        let key = CacheKey::new("restaurant_types", &self.table);
        self.memoize(key, transform::summarize_types)
    }

    pub fn top_restaurants(&self, limit: usize, sort_by: SortBy) -> TopRestaurants {
        let key = CacheKey::new("top_restaurants", &self.table)
            .param("limit", limit)
            .param("sort_by", sort_by);
        self.memoize(key, |table| transform::top_restaurants(table, limit, sort_by))
    }

    pub fn foodie_areas(&self, limit: usize) -> FoodieAreas {
        let key = CacheKey::new("foodie_areas", &self.table).param("limit", limit);
        self.memoize(key, |table| transform::foodie_areas(table, limit))
    }

    /// Not memoized: free-text queries would grow the cache without bound
    pub fn search(&self, query: &str, mode: SearchMode, limit: usize) -> SearchResult {
        search::search(&self.table, query, mode, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::sample_table;

    #[test]
    fn test_results_are_cached_per_parameters() {
        let service = AnalyticsService::new(sample_table(), DEFAULT_CACHE_TTL);
        assert_eq!(service.cached_entries(), 0);

        let first = service.top_restaurants(2, SortBy::Votes);
        let second = service.top_restaurants(2, SortBy::Votes);
        assert_eq!(first, second);
        assert_eq!(service.cached_entries(), 1);

        service.top_restaurants(2, SortBy::Rating);
        service.type_summary();
        service.foodie_areas(5);
        assert_eq!(service.cached_entries(), 4);
    }

    #[test]
    fn test_cached_value_matches_fresh_computation() {
        let service = AnalyticsService::new(sample_table(), DEFAULT_CACHE_TTL);
        let cached = {
            service.foodie_areas(10);
            service.foodie_areas(10)
        };
        assert_eq!(cached, transform::foodie_areas(service.table(), 10));
    }

    #[test]
    fn test_zero_ttl_still_returns_results() {
        let service = AnalyticsService::new(sample_table(), Duration::ZERO);
        assert_eq!(service.type_summary().total_types, 2);
        assert_eq!(service.type_summary().total_types, 2);
    }

    #[test]
    fn test_search_bypasses_cache() {
        let service = AnalyticsService::new(sample_table(), DEFAULT_CACHE_TTL);
        let result = service.search("btm", SearchMode::Area, 10);
        assert_eq!(result.total_matches, 1);
        assert_eq!(service.cached_entries(), 0);
    }

    #[test]
    fn test_service_keeps_the_table_it_was_given() {
        let table = sample_table();
        let id = table.id();
        let service = AnalyticsService::new(table, DEFAULT_CACHE_TTL);
        assert_eq!(service.table().id(), id);
        assert_eq!(service.table().len(), 3);
    }
}
