use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_TABLE_ID: AtomicU64 = AtomicU64::new(1);

/// One normalized row of the restaurant dataset
#[derive(Debug, Clone, PartialEq)]
pub struct Restaurant {
    pub name: String,
    pub location: String,
    pub restaurant_type: String,
    pub rating: Option<f64>,
    pub votes: u64,
    pub approx_cost_for_two: Option<u32>,
    pub cuisines: Vec<String>,
}

/// The loaded dataset. Built once, never mutated afterwards.
#[derive(Debug, Clone)]
pub struct RestaurantTable {
    id: u64,
    rows: Vec<Restaurant>,
}

impl RestaurantTable {
    pub fn new(rows: Vec<Restaurant>) -> Self {
        Self {
            id: NEXT_TABLE_ID.fetch_add(1, Ordering::Relaxed),
            rows,
        }
    }

    /// Process-unique identity marker, used to scope cache entries to this table
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn rows(&self) -> &[Restaurant] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::{Restaurant, RestaurantTable};

    pub fn restaurant(
        name: &str,
        location: &str,
        restaurant_type: &str,
        rating: Option<f64>,
        votes: u64,
        cost: Option<u32>,
        cuisines: &[&str],
    ) -> Restaurant {
        Restaurant {
            name: name.to_string(),
            location: location.to_string(),
            restaurant_type: restaurant_type.to_string(),
            rating,
            votes,
            approx_cost_for_two: cost,
            cuisines: cuisines.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// The three-row table used throughout the engine tests
    pub fn sample_table() -> RestaurantTable {
        RestaurantTable::new(vec![
            restaurant("A", "BTM", "Quick Bites", Some(4.0), 10, Some(400), &["North Indian", "Chinese"]),
            restaurant("B", "BTM", "Quick Bites", Some(3.0), 5, Some(300), &["Chinese"]),
            restaurant("C", "HSR", "Cafe", None, 1, None, &["Italian"]),
        ])
    }
}
