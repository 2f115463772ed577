// Cell-level parsers for the restaurant dataset

pub mod fields;
pub mod lexer;

// Public API re-exports
pub use fields::{parse_cost, parse_cuisines, parse_rating, parse_votes};
