// Parsers for the raw dataset columns.
//
// Every parser here is permissive: a cell that does not match its grammar
// yields the column's fallback value instead of an error.

use super::lexer::{finite_number, ws};
use nom::{
    bytes::complete::{tag, take_till},
    character::complete::char,
    combinator::{all_consuming, opt, rest},
    multi::separated_list0,
    sequence::{pair, preceded},
    IResult,
};

/// `4.1/5`, `4.1 /5.0`, `4.1/` or plain `4.1`. Whatever follows the slash
/// is ignored.
fn rating_expr(input: &str) -> IResult<&str, f64> {
    let (input, (value, _scale)) = pair(ws(finite_number), opt(preceded(char('/'), rest)))(input)?;
    Ok((input, value))
}

/// Parse a rating cell. Returns `None` for blanks, "NEW", "-", garbage, and
/// anything outside [0, 5].
pub fn parse_rating(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "-" || trimmed.eq_ignore_ascii_case("new") {
        return None;
    }

    let (_, rating) = all_consuming(rating_expr)(trimmed).ok()?;
    if (0.0..=5.0).contains(&rating) {
        Some(rating)
    } else {
        None
    }
}

/// Parse a cost cell such as `1,200`. Fractions are truncated; negatives and
/// garbage become `None`.
pub fn parse_cost(raw: &str) -> Option<u32> {
    let cleaned: String = raw.chars().filter(|c| *c != ',').collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }

    let (_, value) = all_consuming(ws(finite_number))(cleaned).ok()?;
    if value < 0.0 || value > u32::MAX as f64 {
        return None;
    }
    Some(value.trunc() as u32)
}

/// Parse a vote count. Anything unparseable or negative counts as zero votes.
pub fn parse_votes(raw: &str) -> u64 {
    match all_consuming(ws(finite_number))(raw.trim()) {
        Ok((_, value)) if value >= 0.0 => value.trunc() as u64,
        _ => 0,
    }
}

fn cuisine_list(input: &str) -> IResult<&str, Vec<&str>> {
    separated_list0(tag(","), take_till(|c| c == ','))(input)
}

/// Split a comma-separated cuisine cell into trimmed, non-empty names
pub fn parse_cuisines(raw: &str) -> Vec<String> {
    match cuisine_list(raw) {
        Ok((_, parts)) => parts
            .into_iter()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect(),
        Err(_) => Vec::new(),
    }
}
