use crate::data::{Restaurant, RestaurantTable};
use crate::records::{
    FoodieArea, FoodieAreas, RestaurantTypeSummary, RestaurantTypes, SortBy, TopRestaurant,
    TopRestaurants,
};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::Hash;

/// Stand-in rating for unrated restaurants so they sort after every real rating
const MISSING_RATING: f64 = -1.0;

/// Number of cuisines / restaurant types reported per foodie area
const AREA_TOP_N: usize = 5;

// =============================================================================
// Grouping helpers
// =============================================================================

/// A group of rows sharing a key, in first-seen order
pub(crate) struct Group<'a, K> {
    pub key: K,
    pub rows: Vec<&'a Restaurant>,
}

/// Partition rows by key. Groups come out in the order their first row was seen.
pub(crate) fn group_rows<'a, K, F, I>(rows: I, key_fn: F) -> Vec<Group<'a, K>>
where
    K: Eq + Hash + Clone,
    F: Fn(&'a Restaurant) -> K,
    I: IntoIterator<Item = &'a Restaurant>,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<Group<'a, K>> = Vec::new();

    for row in rows {
        let key = key_fn(row);
        match index.get(&key) {
            Some(&pos) => groups[pos].rows.push(row),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(Group { key, rows: vec![row] });
            }
        }
    }

    groups
}

/// Mean of the present values, `None` when there are none
pub(crate) fn mean<I: IntoIterator<Item = Option<f64>>>(values: I) -> Option<f64> {
    let (sum, n) = values
        .into_iter()
        .flatten()
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    if n == 0 {
        None
    } else {
        Some(sum / n as f64)
    }
}

pub(crate) fn mean_rating(rows: &[&Restaurant]) -> Option<f64> {
    mean(rows.iter().map(|r| r.rating))
}

/// Order-preserving frequency count. Ties between equal counts resolve to
/// whichever value was encountered first.
#[derive(Debug, Default)]
struct FrequencyCount<'a> {
    index: HashMap<&'a str, usize>,
    entries: Vec<(&'a str, usize)>,
}

impl<'a> FrequencyCount<'a> {
    fn add(&mut self, value: &'a str) {
        match self.index.get(value) {
            Some(&pos) => self.entries[pos].1 += 1,
            None => {
                self.index.insert(value, self.entries.len());
                self.entries.push((value, 1));
            }
        }
    }

    fn most_common(mut self, n: usize) -> Vec<String> {
        // stable: equal counts keep encounter order
        self.entries.sort_by(|a, b| b.1.cmp(&a.1));
        self.entries
            .into_iter()
            .take(n)
            .map(|(value, _)| value.to_string())
            .collect()
    }
}

// =============================================================================
// Restaurant type summary
// =============================================================================

/// Group the table by restaurant type: count, share of total, mean rating and cost
pub fn summarize_types(table: &RestaurantTable) -> RestaurantTypes {
    let total = table.len();
    if total == 0 {
        return RestaurantTypes {
            restaurant_types: Vec::new(),
            total_types: 0,
        };
    }

    let mut summaries: Vec<RestaurantTypeSummary> =
        group_rows(table.rows(), |r| r.restaurant_type.as_str())
            .into_iter()
            .map(|group| {
                let count = group.rows.len();
                let avg_cost = mean(
                    group
                        .rows
                        .iter()
                        .map(|r| r.approx_cost_for_two.map(f64::from)),
                );
                RestaurantTypeSummary {
                    restaurant_type: group.key.to_string(),
                    count,
                    percentage: count as f64 / total as f64 * 100.0,
                    avg_rating: mean_rating(&group.rows),
                    avg_cost_for_two: avg_cost.map(|c| c.round_ties_even() as u32),
                }
            })
            .collect();

    summaries.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.restaurant_type.cmp(&b.restaurant_type))
    });

    RestaurantTypes {
        total_types: summaries.len(),
        restaurant_types: summaries,
    }
}

// =============================================================================
// Top-N ranking
// =============================================================================

/// One (name, location) pair after collapsing duplicate rows
#[derive(Debug, Clone)]
struct DedupedRestaurant<'a> {
    name: &'a str,
    location: &'a str,
    restaurant_type: String,
    votes: u64,
    rating: f64,
    cuisines: Vec<String>,
}

fn dedup_restaurants(table: &RestaurantTable) -> Vec<DedupedRestaurant<'_>> {
    group_rows(table.rows(), |r| (r.name.as_str(), r.location.as_str()))
        .into_iter()
        .map(|group| {
            let mut types = FrequencyCount::default();
            let mut votes = 0u64;
            let mut rating = MISSING_RATING;
            let mut cuisines: Vec<String> = Vec::new();

            for row in &group.rows {
                types.add(row.restaurant_type.as_str());
                votes = votes.max(row.votes);
                rating = rating.max(row.rating.unwrap_or(MISSING_RATING));
                for cuisine in &row.cuisines {
                    if !cuisines.contains(cuisine) {
                        cuisines.push(cuisine.clone());
                    }
                }
            }

            let (name, location) = group.key;
            DedupedRestaurant {
                name,
                location,
                restaurant_type: types.most_common(1).into_iter().next().unwrap_or_default(),
                votes,
                rating,
                cuisines,
            }
        })
        .collect()
}

fn compare_for_ranking(a: &DedupedRestaurant, b: &DedupedRestaurant, sort_by: SortBy) -> Ordering {
    let by_votes = b.votes.cmp(&a.votes);
    let by_rating = b.rating.total_cmp(&a.rating);
    match sort_by {
        SortBy::Votes => by_votes.then(by_rating),
        SortBy::Rating => by_rating.then(by_votes),
    }
}

/// Rank restaurants by votes or rating after merging duplicate (name, location) rows
pub fn top_restaurants(table: &RestaurantTable, limit: usize, sort_by: SortBy) -> TopRestaurants {
    let total_restaurants = table.len();

    // 1. Collapse duplicates
    let mut deduped = dedup_restaurants(table);

    // 2. Stable sort on the requested key
    deduped.sort_by(|a, b| compare_for_ranking(a, b, sort_by));

    // 3. Truncate and rank
    let top_restaurants = deduped
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(idx, r)| TopRestaurant {
            name: r.name.to_string(),
            location: r.location.to_string(),
            rating: if r.rating == MISSING_RATING { None } else { Some(r.rating) },
            votes: r.votes,
            restaurant_type: r.restaurant_type,
            cuisines: r.cuisines,
            rank: idx + 1,
        })
        .collect();

    TopRestaurants {
        top_restaurants,
        total_restaurants,
    }
}

// =============================================================================
// Foodie area rollup
// =============================================================================

/// Rank locations by restaurant count, with each area's dominant cuisines and types
pub fn foodie_areas(table: &RestaurantTable, limit: usize) -> FoodieAreas {
    let mut groups = group_rows(table.rows(), |r| {
        if r.location.is_empty() {
            "Unknown"
        } else {
            r.location.as_str()
        }
    });
    let total_areas = groups.len();

    groups.sort_by(|a, b| b.rows.len().cmp(&a.rows.len()).then_with(|| a.key.cmp(b.key)));
    groups.truncate(limit);

    let foodie_areas = groups
        .into_iter()
        .map(|group| {
            let mut cuisines = FrequencyCount::default();
            let mut types = FrequencyCount::default();
            for row in &group.rows {
                for cuisine in &row.cuisines {
                    cuisines.add(cuisine.as_str());
                }
                types.add(row.restaurant_type.as_str());
            }

            FoodieArea {
                area: group.key.to_string(),
                restaurant_count: group.rows.len(),
                avg_rating: mean_rating(&group.rows),
                top_cuisines: cuisines.most_common(AREA_TOP_N),
                restaurant_types: types.most_common(AREA_TOP_N),
            }
        })
        .collect();

    FoodieAreas {
        foodie_areas,
        total_areas,
    }
}
