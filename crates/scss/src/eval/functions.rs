//! Built-in functions.
//!
//! Each builtin declares its parameter names; [`call`] binds positional and
//! keyword arguments to them before dispatch. Names that are not builtins
//! are plain CSS functions and are printed back with evaluated arguments.

use crate::error::{CompileError, Result, Span};
use crate::types::number::{format_number, is_integer};
use crate::types::{Color, ListSeparator, Value};
use phf::phf_map;
use std::fmt::Display;

type BuiltinFn = fn(&Args) -> Result<Value>;

struct Builtin {
    params: &'static [&'static str],
    required: usize,
    run: BuiltinFn,
}

static BUILTINS: phf::Map<&'static str, Builtin> = phf_map! {
    "rgb" => Builtin { params: &["red", "green", "blue"], required: 3, run: rgb },
    "rgba" => Builtin { params: &["red", "green", "blue", "alpha"], required: 2, run: rgba },
    "hsl" => Builtin { params: &["hue", "saturation", "lightness"], required: 3, run: hsl },
    "hsla" => Builtin { params: &["hue", "saturation", "lightness", "alpha"], required: 4, run: hsla },
    "red" => Builtin { params: &["color"], required: 1, run: red },
    "green" => Builtin { params: &["color"], required: 1, run: green },
    "blue" => Builtin { params: &["color"], required: 1, run: blue },
    "alpha" => Builtin { params: &["color"], required: 1, run: alpha },
    "opacity" => Builtin { params: &["color"], required: 1, run: opacity },
    "mix" => Builtin { params: &["color1", "color2", "weight"], required: 2, run: mix },
    "lighten" => Builtin { params: &["color", "amount"], required: 2, run: lighten },
    "darken" => Builtin { params: &["color", "amount"], required: 2, run: darken },
    "saturate" => Builtin { params: &["color", "amount"], required: 1, run: saturate },
    "desaturate" => Builtin { params: &["color", "amount"], required: 2, run: desaturate },
    "adjust-hue" => Builtin { params: &["color", "degrees"], required: 2, run: adjust_hue },
    "grayscale" => Builtin { params: &["color"], required: 1, run: grayscale },
    "complement" => Builtin { params: &["color"], required: 1, run: complement },
    "invert" => Builtin { params: &["color"], required: 1, run: invert },
    "opacify" => Builtin { params: &["color", "amount"], required: 2, run: opacify },
    "fade-in" => Builtin { params: &["color", "amount"], required: 2, run: opacify },
    "transparentize" => Builtin { params: &["color", "amount"], required: 2, run: transparentize },
    "fade-out" => Builtin { params: &["color", "amount"], required: 2, run: transparentize },
    "percentage" => Builtin { params: &["number"], required: 1, run: percentage },
    "round" => Builtin { params: &["number"], required: 1, run: round },
    "ceil" => Builtin { params: &["number"], required: 1, run: ceil },
    "floor" => Builtin { params: &["number"], required: 1, run: floor },
    "abs" => Builtin { params: &["number"], required: 1, run: abs },
    "unit" => Builtin { params: &["number"], required: 1, run: unit },
    "unitless" => Builtin { params: &["number"], required: 1, run: unitless },
    "type-of" => Builtin { params: &["value"], required: 1, run: type_of },
    "quote" => Builtin { params: &["string"], required: 1, run: quote },
    "unquote" => Builtin { params: &["string"], required: 1, run: unquote },
    "length" => Builtin { params: &["list"], required: 1, run: length },
    "nth" => Builtin { params: &["list", "n"], required: 2, run: nth },
    "join" => Builtin { params: &["list1", "list2", "separator"], required: 2, run: join },
    "list-separator" => Builtin { params: &["list"], required: 1, run: list_separator },
    "if" => Builtin { params: &["condition", "if-true", "if-false"], required: 3, run: if_function },
};

fn normalize(name: &str) -> String {
    name.to_ascii_lowercase().replace('_', "-")
}

/// Calls the function `name` with already evaluated arguments.
pub fn call(
    name: &str,
    positional: Vec<Value>,
    named: Vec<(String, Value)>,
    span: Span,
) -> Result<Value> {
    let Some(builtin) = BUILTINS.get(normalize(name).as_str()) else {
        return Ok(plain_css_call(name, &positional, &named));
    };
    let values = bind_to(name, builtin, positional, named, span)?;
    (builtin.run)(&Args {
        name,
        params: builtin.params,
        values,
        span,
    })
}

/// Binds arguments of any kind to the parameters of builtin `name`, one slot
/// per parameter. Used for `if()`, whose arguments are bound before they are
/// evaluated.
pub fn bind<T>(
    name: &str,
    positional: Vec<T>,
    named: Vec<(String, T)>,
    span: Span,
) -> Result<Vec<Option<T>>> {
    let builtin = BUILTINS
        .get(normalize(name).as_str())
        .ok_or_else(|| CompileError::argument(format!("{name}() is not a builtin"), span))?;
    bind_to(name, builtin, positional, named, span)
}

fn bind_to<T>(
    name: &str,
    builtin: &Builtin,
    positional: Vec<T>,
    named: Vec<(String, T)>,
    span: Span,
) -> Result<Vec<Option<T>>> {
    let params = builtin.params;
    if positional.len() > params.len() {
        return Err(CompileError::argument(
            format!(
                "{name}() takes {} argument(s) but {} were passed",
                params.len(),
                positional.len()
            ),
            span,
        ));
    }

    let mut values: Vec<Option<T>> = positional.into_iter().map(Some).collect();
    values.resize_with(params.len(), || None);
    for (key, value) in named {
        let key = key.replace('_', "-");
        let Some(index) = params.iter().position(|p| *p == key) else {
            return Err(CompileError::argument(
                format!("{name}() has no parameter named ${key}"),
                span,
            ));
        };
        if values[index].is_some() {
            return Err(CompileError::argument(
                format!("{name}(): ${key} was passed both by position and by name"),
                span,
            ));
        }
        values[index] = Some(value);
    }
    if let Some(missing) = (0..builtin.required).find(|&i| values[i].is_none()) {
        return Err(CompileError::argument(
            format!("{name}() is missing argument ${}", params[missing]),
            span,
        ));
    }
    Ok(values)
}

fn plain_css_call(name: &str, positional: &[Value], named: &[(String, Value)]) -> Value {
    let args: Vec<String> = positional
        .iter()
        .chain(named.iter().map(|(_, v)| v))
        .map(|v| v.to_css(false))
        .collect();
    Value::ident(format!("{name}({})", args.join(", ")))
}

/// Bound arguments of one builtin call.
struct Args<'a> {
    name: &'a str,
    params: &'static [&'static str],
    values: Vec<Option<Value>>,
    span: Span,
}

impl Args<'_> {
    fn error(&self, message: impl Display) -> CompileError {
        CompileError::argument(format!("{}(): {message}", self.name), self.span)
    }

    fn get(&self, i: usize) -> Option<&Value> {
        self.values.get(i).and_then(Option::as_ref)
    }

    fn value(&self, i: usize) -> Result<&Value> {
        self.get(i)
            .ok_or_else(|| self.error(format_args!("missing argument ${}", self.params[i])))
    }

    fn color(&self, i: usize) -> Result<&Color> {
        match self.value(i)? {
            Value::Color(color) => Ok(color),
            other => Err(self.error(format_args!(
                "${}: {} is not a color",
                self.params[i],
                other.to_css(false)
            ))),
        }
    }

    fn number(&self, i: usize) -> Result<(f64, Option<&str>)> {
        match self.value(i)? {
            Value::Number { value, unit } => Ok((*value, unit.as_deref())),
            other => Err(self.error(format_args!(
                "${}: {} is not a number",
                self.params[i],
                other.to_css(false)
            ))),
        }
    }

    /// A `0%..=100%` amount (unitless counts as percent), as a fraction.
    fn percent(&self, i: usize) -> Result<f64> {
        let (value, unit) = self.number(i)?;
        if !matches!(unit, None | Some("%")) || !(0.0..=100.0).contains(&value) {
            return Err(self.error(format_args!(
                "${}: amount {}{} must be between 0% and 100%",
                self.params[i],
                format_number(value),
                unit.unwrap_or("")
            )));
        }
        Ok(value / 100.0)
    }

    /// An opacity amount between 0 and 1.
    fn unit_interval(&self, i: usize) -> Result<f64> {
        let (value, unit) = self.number(i)?;
        let value = if unit == Some("%") { value / 100.0 } else { value };
        if !(0.0..=1.0).contains(&value) {
            return Err(self.error(format_args!(
                "${}: amount {} must be between 0 and 1",
                self.params[i],
                format_number(value)
            )));
        }
        Ok(value)
    }

    /// An RGB channel: `0..=255` or a percentage.
    fn channel(&self, i: usize) -> Result<f64> {
        match self.number(i)? {
            (value, Some("%")) => Ok(value * 255.0 / 100.0),
            (value, None) => Ok(value),
            (value, Some(unit)) => Err(self.error(format_args!(
                "${}: {}{unit} is not a valid channel value",
                self.params[i],
                format_number(value)
            ))),
        }
    }
}

// ==================== COLOUR CONSTRUCTION ====================

fn rgb(args: &Args) -> Result<Value> {
    Ok(Value::Color(Color::rgb(
        args.channel(0)?,
        args.channel(1)?,
        args.channel(2)?,
    )))
}

fn rgba(args: &Args) -> Result<Value> {
    if let (Some(Value::Color(color)), None) = (args.get(0), args.get(2)) {
        return Ok(Value::Color(color.with_alpha(args.unit_interval(1)?)));
    }
    Ok(Value::Color(Color::rgba(
        args.channel(0)?,
        args.channel(1)?,
        args.channel(2)?,
        args.unit_interval(3)?,
    )))
}

fn hsl_color(args: &Args, alpha: f64) -> Result<Color> {
    let (hue, _) = args.number(0)?;
    Ok(Color::from_hsl(
        hue,
        args.percent(1)?,
        args.percent(2)?,
        alpha,
    ))
}

fn hsl(args: &Args) -> Result<Value> {
    Ok(Value::Color(hsl_color(args, 1.0)?))
}

fn hsla(args: &Args) -> Result<Value> {
    let alpha = args.unit_interval(3)?;
    Ok(Value::Color(hsl_color(args, alpha)?))
}

// ==================== COLOUR CHANNELS ====================

fn red(args: &Args) -> Result<Value> {
    Ok(Value::unitless(args.color(0)?.r.round()))
}

fn green(args: &Args) -> Result<Value> {
    Ok(Value::unitless(args.color(0)?.g.round()))
}

fn blue(args: &Args) -> Result<Value> {
    Ok(Value::unitless(args.color(0)?.b.round()))
}

fn alpha(args: &Args) -> Result<Value> {
    Ok(Value::unitless(args.color(0)?.a))
}

/// `opacity(50%)` is also the CSS filter function.
fn opacity(args: &Args) -> Result<Value> {
    if args.value(0)?.is_number() {
        return filter_call(args);
    }
    alpha(args)
}

// ==================== COLOUR ADJUSTMENT ====================

fn mix(args: &Args) -> Result<Value> {
    let weight = match args.get(2) {
        Some(_) => args.percent(2)?,
        None => 0.5,
    };
    Ok(Value::Color(args.color(0)?.mix(args.color(1)?, weight)))
}

fn lighten(args: &Args) -> Result<Value> {
    Ok(Value::Color(args.color(0)?.lighten(args.percent(1)?)))
}

fn darken(args: &Args) -> Result<Value> {
    Ok(Value::Color(args.color(0)?.darken(args.percent(1)?)))
}

/// With a single number argument this is the CSS filter `saturate()`.
fn saturate(args: &Args) -> Result<Value> {
    if args.value(0)?.is_number() && args.get(1).is_none() {
        return filter_call(args);
    }
    let amount = args.percent(1)?;
    Ok(Value::Color(args.color(0)?.adjust_hsl(0.0, amount, 0.0)))
}

fn desaturate(args: &Args) -> Result<Value> {
    let amount = args.percent(1)?;
    Ok(Value::Color(args.color(0)?.adjust_hsl(0.0, -amount, 0.0)))
}

fn adjust_hue(args: &Args) -> Result<Value> {
    let (degrees, _) = args.number(1)?;
    Ok(Value::Color(args.color(0)?.adjust_hsl(degrees, 0.0, 0.0)))
}

fn grayscale(args: &Args) -> Result<Value> {
    if args.value(0)?.is_number() {
        return filter_call(args);
    }
    Ok(Value::Color(args.color(0)?.adjust_hsl(0.0, -1.0, 0.0)))
}

fn complement(args: &Args) -> Result<Value> {
    Ok(Value::Color(args.color(0)?.adjust_hsl(180.0, 0.0, 0.0)))
}

fn invert(args: &Args) -> Result<Value> {
    if args.value(0)?.is_number() {
        return filter_call(args);
    }
    Ok(Value::Color(args.color(0)?.invert()))
}

fn opacify(args: &Args) -> Result<Value> {
    let color = args.color(0)?;
    let amount = args.unit_interval(1)?;
    Ok(Value::Color(color.with_alpha((color.a + amount).min(1.0))))
}

fn transparentize(args: &Args) -> Result<Value> {
    let color = args.color(0)?;
    let amount = args.unit_interval(1)?;
    Ok(Value::Color(color.with_alpha((color.a - amount).max(0.0))))
}

fn filter_call(args: &Args) -> Result<Value> {
    Ok(Value::ident(format!(
        "{}({})",
        args.name,
        args.value(0)?.to_css(false)
    )))
}

// ==================== NUMBERS ====================

fn percentage(args: &Args) -> Result<Value> {
    match args.number(0)? {
        (value, None) => Ok(Value::number(value * 100.0, Some("%"))),
        (value, Some(unit)) => Err(args.error(format_args!(
            "$number: {}{unit} is not unitless",
            format_number(value)
        ))),
    }
}

fn map_number(args: &Args, f: fn(f64) -> f64) -> Result<Value> {
    let (value, unit) = args.number(0)?;
    Ok(Value::number(f(value), unit))
}

fn round(args: &Args) -> Result<Value> {
    map_number(args, f64::round)
}

fn ceil(args: &Args) -> Result<Value> {
    map_number(args, f64::ceil)
}

fn floor(args: &Args) -> Result<Value> {
    map_number(args, f64::floor)
}

fn abs(args: &Args) -> Result<Value> {
    map_number(args, f64::abs)
}

fn unit(args: &Args) -> Result<Value> {
    let (_, unit) = args.number(0)?;
    Ok(Value::quoted(unit.unwrap_or(""), '"'))
}

fn unitless(args: &Args) -> Result<Value> {
    let (_, unit) = args.number(0)?;
    Ok(Value::Boolean(unit.is_none()))
}

// ==================== INTROSPECTION AND STRINGS ====================

fn type_of(args: &Args) -> Result<Value> {
    Ok(Value::ident(args.value(0)?.type_name()))
}

fn quote(args: &Args) -> Result<Value> {
    Ok(Value::quoted(args.value(0)?.unquoted_text(), '"'))
}

fn unquote(args: &Args) -> Result<Value> {
    Ok(Value::ident(args.value(0)?.unquoted_text()))
}

// ==================== LISTS ====================

fn length(args: &Args) -> Result<Value> {
    Ok(Value::unitless(args.value(0)?.as_list().len() as f64))
}

fn nth(args: &Args) -> Result<Value> {
    let items = args.value(0)?.as_list();
    let (n, _) = args.number(1)?;
    if !is_integer(n) || n == 0.0 {
        return Err(args.error(format_args!(
            "$n: {} is not a valid list index",
            format_number(n)
        )));
    }
    let len = items.len() as i64;
    let n = n as i64;
    let index = if n > 0 { n - 1 } else { len + n };
    if index < 0 || index >= len {
        return Err(args.error(format_args!(
            "$n: index {n} is out of bounds for a list of length {len}"
        )));
    }
    Ok(items[index as usize].clone())
}

fn join(args: &Args) -> Result<Value> {
    let first = args.value(0)?;
    let second = args.value(1)?;
    let separator = match args.get(2).map(Value::unquoted_text).as_deref() {
        None | Some("auto") => match (first, second) {
            (Value::List { separator, .. }, _) | (_, Value::List { separator, .. }) => *separator,
            _ => ListSeparator::Space,
        },
        Some("comma") => ListSeparator::Comma,
        Some("space") => ListSeparator::Space,
        Some(other) => {
            return Err(args.error(format_args!(
                "$separator: must be \"space\", \"comma\" or \"auto\", not {other}"
            )));
        }
    };
    let mut items = first.as_list();
    items.extend(second.as_list());
    Ok(Value::list(items, separator))
}

/// `space` for anything that is not a comma list.
fn list_separator(args: &Args) -> Result<Value> {
    Ok(Value::ident(args.value(0)?.separator().name()))
}

fn if_function(args: &Args) -> Result<Value> {
    let branch = if args.value(0)?.is_truthy() { 1 } else { 2 };
    Ok(args.value(branch)?.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(name: &str, args: Vec<Value>) -> Result<Value> {
        call(name, args, Vec::new(), Span::start())
    }

    fn css(name: &str, args: Vec<Value>) -> String {
        run(name, args).unwrap().to_css(false)
    }

    fn color(hex: &str) -> Value {
        Value::Color(Color::parse_hex(hex).unwrap())
    }

    fn pct(v: f64) -> Value {
        Value::number(v, Some("%"))
    }

    // ==================== COLOURS ====================

    #[test]
    fn test_rgb_and_rgba() {
        let n = Value::unitless;
        assert_eq!(css("rgb", vec![n(255.0), n(0.0), n(0.0)]), "red");
        assert_eq!(css("rgb", vec![n(51.0), n(102.0), n(153.0)]), "#336699");
        assert_eq!(
            css("rgba", vec![n(0.0), n(0.0), n(0.0), n(0.5)]),
            "rgba(0, 0, 0, 0.5)"
        );
        assert_eq!(
            css("rgba", vec![color("#336699"), n(0.25)]),
            "rgba(51, 102, 153, 0.25)"
        );
    }

    #[test]
    fn test_lighten_darken() {
        assert_eq!(css("lighten", vec![color("#000"), pct(50.0)]), "gray");
        assert_eq!(css("darken", vec![color("#fff"), pct(100.0)]), "black");
        let err = run("lighten", vec![color("#000"), pct(150.0)]).unwrap_err();
        assert!(matches!(err, CompileError::Argument { .. }));
    }

    #[test]
    fn test_hsl_and_channels() {
        let red = run(
            "hsl",
            vec![Value::unitless(0.0), pct(100.0), pct(50.0)],
        )
        .unwrap();
        assert_eq!(red.to_css(false), "red");
        assert_eq!(css("red", vec![color("#336699")]), "51");
        assert_eq!(css("blue", vec![color("#336699")]), "153");
        assert_eq!(css("complement", vec![color("#f00")]), "aqua");
        assert_eq!(css("invert", vec![color("#fff")]), "black");
    }

    #[test]
    fn test_mix_and_alpha() {
        assert_eq!(css("mix", vec![color("#000"), color("#fff")]), "gray");
        let faded = run("transparentize", vec![color("#000"), Value::unitless(0.5)]).unwrap();
        assert_eq!(faded.to_css(false), "rgba(0, 0, 0, 0.5)");
        assert_eq!(css("alpha", vec![faded]), "0.5");
    }

    #[test]
    fn test_filter_forms_pass_through() {
        assert_eq!(css("grayscale", vec![pct(50.0)]), "grayscale(50%)");
        assert_eq!(css("saturate", vec![pct(20.0)]), "saturate(20%)");
    }

    // ==================== NUMBERS ====================

    #[test]
    fn test_number_functions() {
        assert_eq!(css("percentage", vec![Value::unitless(0.25)]), "25%");
        assert_eq!(css("round", vec![Value::number(2.6, Some("px"))]), "3px");
        assert_eq!(css("floor", vec![Value::unitless(2.6)]), "2");
        assert_eq!(css("abs", vec![Value::number(-3.0, Some("em"))]), "3em");
        assert_eq!(css("unit", vec![Value::number(3.0, Some("em"))]), "\"em\"");
        assert_eq!(css("unitless", vec![Value::unitless(3.0)]), "true");
    }

    // ==================== LISTS AND STRINGS ====================

    #[test]
    fn test_list_functions() {
        let list = Value::list(
            vec![Value::ident("a"), Value::ident("b"), Value::ident("c")],
            ListSeparator::Space,
        );
        assert_eq!(css("length", vec![list.clone()]), "3");
        assert_eq!(css("nth", vec![list.clone(), Value::unitless(2.0)]), "b");
        assert_eq!(css("nth", vec![list.clone(), Value::unitless(-1.0)]), "c");
        assert!(run("nth", vec![list.clone(), Value::unitless(4.0)]).is_err());
        assert_eq!(
            css("join", vec![list.clone(), Value::ident("d")]),
            "a b c d"
        );
        assert_eq!(css("list-separator", vec![list]), "space");
        let commas = Value::list(vec![Value::ident("a"), Value::ident("b")], ListSeparator::Comma);
        assert_eq!(css("list-separator", vec![commas]), "comma");
    }

    #[test]
    fn test_string_functions() {
        assert_eq!(css("quote", vec![Value::ident("a")]), "\"a\"");
        assert_eq!(css("unquote", vec![Value::quoted("a b", '\'')]), "a b");
        assert_eq!(css("type-of", vec![Value::unitless(1.0)]), "number");
        assert_eq!(
            css("if", vec![Value::Boolean(false), Value::ident("x"), Value::ident("y")]),
            "y"
        );
    }

    // ==================== BINDING ====================

    #[test]
    fn test_keyword_arguments() {
        let value = call(
            "mix",
            vec![color("#000"), color("#fff")],
            vec![("weight".to_string(), pct(100.0))],
            Span::start(),
        )
        .unwrap();
        assert_eq!(value.to_css(false), "black");
    }

    #[test]
    fn test_argument_errors() {
        let missing = run("rgb", vec![Value::unitless(1.0)]).unwrap_err();
        assert!(missing.message().contains("$green"));
        let extra = run("abs", vec![Value::unitless(1.0), Value::unitless(2.0)]).unwrap_err();
        assert!(matches!(extra, CompileError::Argument { .. }));
        let wrong = run("red", vec![Value::unitless(1.0)]).unwrap_err();
        assert!(wrong.message().contains("is not a color"));
    }

    #[test]
    fn test_unknown_function_is_plain_css() {
        assert_eq!(
            css("translateX", vec![Value::number(10.0, Some("px"))]),
            "translateX(10px)"
        );
    }
}
