//! Runtime values produced by expression evaluation.
//!
//! All arithmetic lives here so that the evaluator only has to attach a
//! source location to the [`ValueError`] when an operation is rejected.

use super::color::Color;
use super::number::format_number;
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

/// A rejected value operation. The evaluator turns it into a located error.
#[derive(Error, Clone, Debug, PartialEq)]
#[error("{message}")]
pub struct ValueError {
    pub message: String,
}

impl ValueError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub type ValueResult = Result<Value, ValueError>;

/// How the items of a list are joined.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListSeparator {
    Space,
    Comma,
}

impl ListSeparator {
    pub fn name(self) -> &'static str {
        match self {
            Self::Space => "space",
            Self::Comma => "comma",
        }
    }
}

/// A fully evaluated value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Number { value: f64, unit: Option<String> },
    Color(Color),
    /// `quote` is `None` for identifiers and other unquoted text.
    String { text: String, quote: Option<char> },
    Boolean(bool),
    List {
        items: Vec<Value>,
        separator: ListSeparator,
    },
}

impl Value {
    pub fn number(value: f64, unit: Option<&str>) -> Self {
        Self::Number {
            value,
            unit: unit.map(str::to_string),
        }
    }

    pub fn unitless(value: f64) -> Self {
        Self::Number { value, unit: None }
    }

    pub fn ident(text: impl Into<String>) -> Self {
        Self::String {
            text: text.into(),
            quote: None,
        }
    }

    pub fn quoted(text: impl Into<String>, quote: char) -> Self {
        Self::String {
            text: text.into(),
            quote: Some(quote),
        }
    }

    pub fn list(items: Vec<Value>, separator: ListSeparator) -> Self {
        Self::List { items, separator }
    }

    /// The name reported by `type-of()`.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Number { .. } => "number",
            Self::Color(_) => "color",
            Self::String { .. } => "string",
            Self::Boolean(_) => "bool",
            Self::List { .. } => "list",
        }
    }

    /// Only `false` is falsy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Self::Boolean(false))
    }

    /// The items of a list, or the value itself as a one-item list.
    pub fn as_list(&self) -> Vec<Value> {
        match self {
            Self::List { items, .. } => items.clone(),
            other => vec![other.clone()],
        }
    }

    pub fn separator(&self) -> ListSeparator {
        match self {
            Self::List { separator, .. } => *separator,
            _ => ListSeparator::Space,
        }
    }

    /// Text used when the value is spliced into an interpolation: strings lose their quotes.
    pub fn unquoted_text(&self) -> String {
        match self {
            Self::String { text, .. } => text.clone(),
            other => other.to_css(false),
        }
    }

    /// Renders the value as CSS text. `compressed` only affects list separators.
    pub fn to_css(&self, compressed: bool) -> String {
        match self {
            Self::Number { value, unit } => {
                format!("{}{}", format_number(*value), unit.as_deref().unwrap_or(""))
            }
            Self::Color(color) => color.to_string(),
            Self::String { text, quote } => match quote {
                Some(q) => format!("{q}{text}{q}"),
                None => text.clone(),
            },
            Self::Boolean(b) => b.to_string(),
            Self::List { items, separator } => {
                let joiner = match (separator, compressed) {
                    (ListSeparator::Space, _) => " ",
                    (ListSeparator::Comma, false) => ", ",
                    (ListSeparator::Comma, true) => ",",
                };
                items
                    .iter()
                    .map(|item| item.to_css(compressed))
                    .filter(|text| !text.is_empty())
                    .collect::<Vec<_>>()
                    .join(joiner)
            }
        }
    }

    pub fn add(&self, rhs: &Value) -> ValueResult {
        match (self, rhs) {
            (Self::Number { .. }, Self::Number { .. }) => numeric(self, rhs, '+', |a, b| a + b),
            (Self::Color(c), other) | (other, Self::Color(c)) if !other.is_string() => {
                color_op(c, other, '+', |a, b| a + b)
            }
            _ => Ok(concat(self, rhs)),
        }
    }

    pub fn sub(&self, rhs: &Value) -> ValueResult {
        match (self, rhs) {
            (Self::Number { .. }, Self::Number { .. }) => numeric(self, rhs, '-', |a, b| a - b),
            (Self::Color(c), other) if !other.is_string() => {
                color_op(c, other, '-', |a, b| a - b)
            }
            _ => Ok(Self::ident(format!(
                "{}-{}",
                self.unquoted_text(),
                rhs.unquoted_text()
            ))),
        }
    }

    pub fn mul(&self, rhs: &Value) -> ValueResult {
        match (self, rhs) {
            (Self::Number { .. }, Self::Number { .. }) => numeric(self, rhs, '*', |a, b| a * b),
            (Self::Color(c), other) | (other, Self::Color(c)) if other.is_number() => {
                color_op(c, other, '*', |a, b| a * b)
            }
            (Self::Color(c), other @ Self::Color(_)) => color_op(c, other, '*', |a, b| a * b),
            _ => Err(ValueError::new(format!(
                "undefined operation: {} times {}",
                self.to_css(false),
                rhs.to_css(false)
            ))),
        }
    }

    pub fn div(&self, rhs: &Value) -> ValueResult {
        match (self, rhs) {
            (Self::Number { .. }, Self::Number { .. }) => numeric(self, rhs, '/', |a, b| a / b),
            (Self::Color(c), other) if !other.is_string() => {
                if other.is_zero() {
                    return Err(ValueError::new("division by zero"));
                }
                color_op(c, other, '/', |a, b| a / b)
            }
            _ => Ok(Self::ident(format!(
                "{}/{}",
                self.unquoted_text(),
                rhs.unquoted_text()
            ))),
        }
    }

    pub fn rem(&self, rhs: &Value) -> ValueResult {
        match (self, rhs) {
            (Self::Number { .. }, Self::Number { .. }) => {
                numeric(self, rhs, '%', |a, b| a - b * (a / b).floor())
            }
            _ => Err(ValueError::new(format!(
                "undefined operation: {} mod {}",
                self.to_css(false),
                rhs.to_css(false)
            ))),
        }
    }

    pub fn neg(&self) -> Value {
        match self {
            Self::Number { value, unit } => Self::Number {
                value: -value,
                unit: unit.clone(),
            },
            other => Self::ident(format!("-{}", other.unquoted_text())),
        }
    }

    /// Structural equality used by `==` and `!=`. Quotes and printed colour forms are ignored.
    pub fn equals(&self, rhs: &Value) -> bool {
        match (self, rhs) {
            (Self::Number { value: a, unit: ua }, Self::Number { value: b, unit: ub }) => {
                same_unit(ua.as_deref(), ub.as_deref())
                    && format_number(*a) == format_number(*b)
            }
            (Self::Color(a), Self::Color(b)) => a.same_as(b),
            (Self::String { text: a, .. }, Self::String { text: b, .. }) => a == b,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (
                Self::List {
                    items: a,
                    separator: sa,
                },
                Self::List {
                    items: b,
                    separator: sb,
                },
            ) => sa == sb && a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.equals(y)),
            _ => false,
        }
    }

    /// Ordering for `<`, `>`, `<=`, `>=`. Only numbers with compatible units compare.
    pub fn compare(&self, rhs: &Value) -> Result<Ordering, ValueError> {
        match (self, rhs) {
            (Self::Number { value: a, unit: ua }, Self::Number { value: b, unit: ub }) => {
                if let (Some(ua), Some(ub)) = (ua, ub) {
                    if !ua.eq_ignore_ascii_case(ub) {
                        return Err(incompatible(ua, ub));
                    }
                }
                a.partial_cmp(b)
                    .ok_or_else(|| ValueError::new("numbers are not comparable"))
            }
            _ => Err(ValueError::new(format!(
                "cannot compare {} with {}",
                self.to_css(false),
                rhs.to_css(false)
            ))),
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Self::Number { .. })
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Self::String { .. })
    }

    fn is_zero(&self) -> bool {
        matches!(self, Self::Number { value, .. } if *value == 0.0)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css(false))
    }
}

/// Units compare without regard to case: `1PX == 1px`.
fn same_unit(a: Option<&str>, b: Option<&str>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
        (None, None) => true,
        _ => false,
    }
}

fn incompatible(a: &str, b: &str) -> ValueError {
    ValueError::new(format!("incompatible units: '{a}' and '{b}'"))
}

/// Number-number arithmetic with unit checking.
fn numeric(lhs: &Value, rhs: &Value, op: char, f: impl Fn(f64, f64) -> f64) -> ValueResult {
    let (Value::Number { value: a, unit: ua }, Value::Number { value: b, unit: ub }) = (lhs, rhs)
    else {
        return Err(ValueError::new("expected numbers"));
    };

    let unit = match op {
        '+' | '-' | '%' => match (ua, ub) {
            (Some(x), Some(y)) if !x.eq_ignore_ascii_case(y) => return Err(incompatible(x, y)),
            _ => ua.clone().or_else(|| ub.clone()),
        },
        '*' => match (ua, ub) {
            (Some(x), Some(y)) => {
                return Err(ValueError::new(format!(
                    "incompatible units: '{x}*{y}' is not a valid CSS unit"
                )));
            }
            _ => ua.clone().or_else(|| ub.clone()),
        },
        '/' => match (ua, ub) {
            (Some(x), Some(y)) if x.eq_ignore_ascii_case(y) => None,
            (Some(x), Some(y)) => return Err(incompatible(x, y)),
            (x, None) => x.clone(),
            (None, Some(y)) => {
                return Err(ValueError::new(format!(
                    "incompatible units: cannot divide a unitless number by '{y}'"
                )));
            }
        },
        _ => None,
    };

    if *b == 0.0 && op == '/' {
        return Err(ValueError::new("division by zero"));
    }
    if *b == 0.0 && op == '%' {
        return Err(ValueError::new("modulo by zero"));
    }

    Ok(Value::Number {
        value: f(*a, *b),
        unit,
    })
}

/// Colour arithmetic: channel by channel against a colour or a unitless number.
fn color_op(color: &Color, other: &Value, op: char, f: impl Fn(f64, f64) -> f64) -> ValueResult {
    match other {
        Value::Color(c) => {
            if (color.a - c.a).abs() > 1e-9 {
                return Err(ValueError::new(
                    "alpha channels must be equal when combining colors",
                ));
            }
            Ok(Value::Color(color.map_channels((c.r, c.g, c.b), f)))
        }
        Value::Number { value, unit: None } => {
            Ok(Value::Color(color.map_channels((*value, *value, *value), f)))
        }
        _ => Err(ValueError::new(format!(
            "undefined operation: {color} {op} {}",
            other.to_css(false)
        ))),
    }
}

/// String concatenation for `+`.
///
/// The result is quoted if the left side is quoted, or if the right side is
/// quoted and the left side is not a string.
fn concat(lhs: &Value, rhs: &Value) -> Value {
    let quote = match (lhs, rhs) {
        (Value::String { quote: Some(q), .. }, _) => Some(*q),
        (Value::String { quote: None, .. }, _) => None,
        (_, Value::String { quote, .. }) => *quote,
        _ => None,
    };
    let text = format!("{}{}", lhs.unquoted_text(), rhs.unquoted_text());
    Value::String { text, quote }
}
