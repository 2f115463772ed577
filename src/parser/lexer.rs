// Shared lexical helpers for cell-level parsers

use nom::{
    character::complete::multispace0,
    number::complete::double,
    sequence::delimited,
    IResult,
};

/// Wrap a parser so it tolerates surrounding whitespace
pub fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

/// A finite decimal number. nom's `double` also accepts "nan"/"inf", which no
/// dataset column should produce.
pub fn finite_number(input: &str) -> IResult<&str, f64> {
    let (rest, value) = double(input)?;
    if value.is_finite() {
        Ok((rest, value))
    } else {
        Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Float,
        )))
    }
}
