//! Number literals and their textual form.

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{char, digit1},
    combinator::{map_res, opt, recognize},
    sequence::{pair, tuple},
};

/// Digits kept after the decimal point when printing.
pub const PRECISION: i32 = 5;

fn parse_magnitude(input: &str) -> IResult<&str, f64> {
    map_res(
        alt((
            recognize(tuple((digit1, opt(pair(char('.'), digit1))))),
            recognize(pair(char('.'), digit1)),
        )),
        |s: &str| s.parse::<f64>(),
    )(input)
}

fn parse_unit_suffix(input: &str) -> IResult<&str, &str> {
    alt((tag("%"), take_while1(|c: char| c.is_ascii_alphabetic())))(input)
}

/// Splits a number token such as `1.5em` into its value and unit.
///
/// The unit keeps the case it was written in. Returns `None` if the text is
/// not a complete number token.
pub fn parse_number_token(text: &str) -> Option<(f64, Option<String>)> {
    let (rest, value) = parse_magnitude(text).ok()?;
    let (rest, unit) = opt(parse_unit_suffix)(rest).ok()?;
    rest.is_empty().then(|| (value, unit.map(str::to_string)))
}

/// Prints a number with at most five decimals, trailing zeros removed.
///
/// ```
/// use scss::types::number::format_number;
///
/// assert_eq!(format_number(15.0), "15");
/// assert_eq!(format_number(1.0 / 3.0), "0.33333");
/// assert_eq!(format_number(-0.0), "0");
/// ```
pub fn format_number(value: f64) -> String {
    let scale = 10f64.powi(PRECISION);
    let rounded = (value * scale).round() / scale;
    if rounded == 0.0 {
        return "0".to_string();
    }
    if rounded.fract() == 0.0 && rounded.abs() < 1e15 {
        return format!("{}", rounded as i64);
    }
    let text = format!("{:.*}", PRECISION as usize, rounded);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Whether a number is integral once printing precision is applied.
pub fn is_integer(value: f64) -> bool {
    let scale = 10f64.powi(PRECISION);
    ((value * scale).round() / scale).fract() == 0.0
}
