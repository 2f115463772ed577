// Table loader: raw restaurant CSV -> normalized RestaurantTable

use crate::data::{Restaurant, RestaurantTable};
use crate::parser::{parse_cost, parse_cuisines, parse_rating, parse_votes};
use anyhow::{anyhow, Context, Result};
use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use tracing::{info, warn};

const UNKNOWN_TYPE: &str = "Unknown";

/// Accepted header spellings per normalized column. The first entry is the
/// normalized name; the rest are the raw dataset's names.
const NAME_COLUMNS: &[&str] = &["name"];
const LOCATION_COLUMNS: &[&str] = &["location"];
const TYPE_COLUMNS: &[&str] = &["restaurant_type", "rest_type"];
const RATING_COLUMNS: &[&str] = &["rating", "rate"];
const VOTES_COLUMNS: &[&str] = &["votes"];
const COST_COLUMNS: &[&str] = &["approx_cost_for_two", "approx_cost(for two people)"];
const CUISINES_COLUMNS: &[&str] = &["cuisines"];

/// Column positions resolved once from the header row
#[derive(Debug, Clone)]
struct ColumnMap {
    name: usize,
    location: usize,
    restaurant_type: Option<usize>,
    rating: Option<usize>,
    votes: Option<usize>,
    cost: Option<usize>,
    cuisines: Option<usize>,
}

impl ColumnMap {
    fn resolve(headers: &StringRecord) -> Result<Self> {
        let name = find_column(headers, NAME_COLUMNS)
            .ok_or_else(|| anyhow!("Required column 'name' not found"))?;
        let location = find_column(headers, LOCATION_COLUMNS)
            .ok_or_else(|| anyhow!("Required column 'location' not found"))?;

        Ok(Self {
            name,
            location,
            restaurant_type: find_column(headers, TYPE_COLUMNS),
            rating: find_column(headers, RATING_COLUMNS),
            votes: find_column(headers, VOTES_COLUMNS),
            cost: find_column(headers, COST_COLUMNS),
            cuisines: find_column(headers, CUISINES_COLUMNS),
        })
    }
}

fn find_column(headers: &StringRecord, aliases: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| aliases.iter().any(|alias| h.trim().eq_ignore_ascii_case(alias)))
}

fn cell<'r>(record: &'r StringRecord, idx: Option<usize>) -> &'r str {
    idx.and_then(|i| record.get(i)).unwrap_or("")
}

/// Normalize one CSV record. Returns `None` when name or location is missing.
fn normalize_record(record: &StringRecord, columns: &ColumnMap) -> Option<Restaurant> {
    let name = cell(record, Some(columns.name)).trim();
    let location = cell(record, Some(columns.location)).trim();
    if name.is_empty() || location.is_empty() {
        return None;
    }

    let restaurant_type = match cell(record, columns.restaurant_type).trim() {
        "" => UNKNOWN_TYPE.to_string(),
        t => t.to_string(),
    };

    Some(Restaurant {
        name: name.to_string(),
        location: location.to_string(),
        restaurant_type,
        rating: parse_rating(cell(record, columns.rating)),
        votes: parse_votes(cell(record, columns.votes)),
        approx_cost_for_two: parse_cost(cell(record, columns.cost)),
        cuisines: parse_cuisines(cell(record, columns.cuisines)),
    })
}

/// Read and normalize restaurant rows from any CSV source
pub fn read_restaurants<R: Read>(reader: R) -> Result<RestaurantTable> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .context("Failed to read CSV headers")?
        .clone();
    let columns = ColumnMap::resolve(&headers)?;

    let mut rows = Vec::new();
    let mut dropped = 0usize;
    for (line, result) in csv_reader.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read CSV record {}", line + 1))?;
        match normalize_record(&record, &columns) {
            Some(row) => rows.push(row),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        warn!(dropped, "dropped rows without name or location");
    }
    info!(rows = rows.len(), "restaurant table loaded");

    Ok(RestaurantTable::new(rows))
}

/// Load the restaurant table from a CSV file on disk
pub fn load_restaurants(path: &Path) -> Result<RestaurantTable> {
    let file = File::open(path)
        .with_context(|| format!("Data file not found: {}", path.display()))?;
    read_restaurants(io::BufReader::new(file))
        .with_context(|| format!("Failed to load restaurants from {}", path.display()))
}

/// Load the restaurant table from stdin
pub fn read_restaurants_from_stdin() -> Result<RestaurantTable> {
    let stdin = io::stdin();
    read_restaurants(stdin.lock()).context("Failed to read CSV from stdin")
}
