// Case-insensitive literal substring search over one column

use crate::data::{Restaurant, RestaurantTable};
use crate::records::{AreaMatch, NameMatch, SearchHit, SearchMode, SearchResult, TypeMatch};
use crate::transform::{group_rows, mean_rating};
use regex::{Regex, RegexBuilder};

pub const DEFAULT_SEARCH_LIMIT: usize = 10;

fn target_column(row: &Restaurant, mode: SearchMode) -> &str {
    match mode {
        SearchMode::Name => row.name.as_str(),
        SearchMode::Type => row.restaurant_type.as_str(),
        SearchMode::Area => row.location.as_str(),
    }
}

/// Build a matcher that treats the query as literal text
fn literal_matcher(query: &str) -> Option<Regex> {
    RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
        .ok()
}

fn empty_result(query: &str, mode: SearchMode) -> SearchResult {
    SearchResult {
        query: query.to_string(),
        mode,
        results: Vec::new(),
        total_matches: 0,
    }
}

/// Search restaurants by name, type, or area.
///
/// Name searches return matching rows. Type and area searches return one
/// aggregate per distinct matched value, largest first.
pub fn search(table: &RestaurantTable, query: &str, mode: SearchMode, limit: usize) -> SearchResult {
    let query = query.trim();
    if query.is_empty() || table.is_empty() {
        return empty_result(query, mode);
    }

    let matcher = match literal_matcher(query) {
        Some(m) => m,
        None => return empty_result(query, mode),
    };

    let matched: Vec<&Restaurant> = table
        .rows()
        .iter()
        .filter(|row| matcher.is_match(target_column(row, mode)))
        .collect();

    let (results, total_matches) = match mode {
        SearchMode::Name => {
            let hits = matched
                .iter()
                .take(limit)
                .map(|row| {
                    SearchHit::Name(NameMatch {
                        name: row.name.clone(),
                        location: row.location.clone(),
                        restaurant_type: row.restaurant_type.clone(),
                        rating: row.rating,
                        votes: row.votes,
                    })
                })
                .collect();
            (hits, matched.len())
        }
        SearchMode::Type | SearchMode::Area => {
            let mut groups = group_rows(matched.iter().copied(), |row| target_column(row, mode));
            let total = groups.len();

            groups.sort_by(|a, b| b.rows.len().cmp(&a.rows.len()).then_with(|| a.key.cmp(b.key)));

            let hits = groups
                .into_iter()
                .take(limit)
                .map(|group| {
                    let avg_rating = mean_rating(&group.rows);
                    if mode == SearchMode::Type {
                        SearchHit::Type(TypeMatch {
                            restaurant_type: group.key.to_string(),
                            count: group.rows.len(),
                            avg_rating,
                        })
                    } else {
                        SearchHit::Area(AreaMatch {
                            area: group.key.to_string(),
                            restaurant_count: group.rows.len(),
                            avg_rating,
                        })
                    }
                })
                .collect();
            (hits, total)
        }
    };

    SearchResult {
        query: query.to_string(),
        mode,
        results,
        total_matches,
    }
}
