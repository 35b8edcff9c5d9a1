//! Arithmetic, colours, strings and built-in functions inside declarations.

use scss::{CompileError, CompileOptions, OutputStyle, compile};

/// The single declaration value produced by `a { prop: <value>; }`.
fn value(source_value: &str) -> String {
    value_with("", source_value)
}

fn value_with(prelude: &str, source_value: &str) -> String {
    let source = format!("{prelude} a {{ prop: {source_value}; }}");
    let css = compile(
        &source,
        &CompileOptions::new().with_output_style(OutputStyle::Compact),
    )
    .unwrap();
    css.trim_end()
        .strip_prefix("a { prop: ")
        .and_then(|rest| rest.strip_suffix("; }"))
        .unwrap_or_else(|| panic!("unexpected output: {css:?}"))
        .to_string()
}

fn error(source_value: &str) -> CompileError {
    compile(
        &format!("a {{ prop: {source_value}; }}"),
        &CompileOptions::default(),
    )
    .unwrap_err()
}

// ============================================================================
// Numbers and Units
// ============================================================================

#[test]
fn test_unit_arithmetic() {
    assert_eq!(value("10px + 5px"), "15px");
    assert_eq!(value("10px - 2"), "8px");
    assert_eq!(value("3 * 4em"), "12em");
    assert_eq!(value("10px % 4px"), "2px");
    assert_eq!(value("1 + 2 * 3"), "7");
    assert_eq!(value("(1 + 2) * 3"), "9");
}

#[test]
fn test_incompatible_units() {
    let err = error("10px + 5em");
    assert!(matches!(err, CompileError::Type { .. }));
    assert!(err.message().contains("px"));
    assert!(err.message().contains("em"));
    assert!(matches!(error("2px * 3px"), CompileError::Type { .. }));
}

#[test]
fn test_slash_separated_values_are_kept() {
    assert_eq!(value("12px/1.5 Arial"), "12px/1.5 Arial");
    assert_eq!(value("(12px / 2)"), "6px");
    assert_eq!(value_with("$w: 100px;", "$w / 4"), "25px");
}

#[test]
fn test_division_by_zero() {
    let err = error("(1px / 0)");
    assert_eq!(err.message(), "division by zero");
}

#[test]
fn test_negation_and_lists() {
    assert_eq!(value_with("$x: 5px;", "-$x"), "-5px");
    assert_eq!(value("0 -5px"), "0 -5px");
    assert_eq!(value("1px solid red"), "1px solid red");
    assert_eq!(value("10px -2px"), "10px -2px");
    assert_eq!(value("10px - 2px"), "8px");
}

#[test]
fn test_units_keep_their_case() {
    assert_eq!(value("1.5EM"), "1.5EM");
    assert_eq!(value("1px + 1PX"), "2px");
    assert_eq!(value("2Px * 3"), "6Px");
    assert_eq!(value("1PX == 1px"), "true");
    assert_eq!(value("unit(3Em)"), "\"Em\"");
}

#[test]
fn test_number_precision() {
    assert_eq!(value("(10 / 3)"), "3.33333");
    assert_eq!(value("0.5em"), "0.5em");
}

// ============================================================================
// Colours
// ============================================================================

#[test]
fn test_colours_keep_their_written_form() {
    assert_eq!(value("#FFF"), "#FFF");
    assert_eq!(value("red"), "red");
}

#[test]
fn test_colour_arithmetic() {
    assert_eq!(value("#336699 + #111"), "#4477aa");
    assert_eq!(value("#010203 * 2"), "#020406");
}

#[test]
fn test_colour_functions() {
    assert_eq!(value("lighten(#000, 50%)"), "gray");
    assert_eq!(value("darken(#fff, 100%)"), "black");
    assert_eq!(value("rgba(#336699, 0.5)"), "rgba(51, 102, 153, 0.5)");
    assert_eq!(value("rgb(255, 0, 0)"), "red");
    assert_eq!(value("mix(#000, #fff)"), "gray");
    assert_eq!(value("red(#336699)"), "51");
}

// ============================================================================
// Strings
// ============================================================================

#[test]
fn test_string_concatenation() {
    assert_eq!(value("\"foo\" + bar"), "\"foobar\"");
    assert_eq!(value("foo + \"bar\""), "foobar");
}

#[test]
fn test_string_interpolation() {
    assert_eq!(value_with("$n: 3;", "\"item #{$n}\""), "\"item 3\"");
    assert_eq!(value_with("$n: 3;", "#{$n}px"), "3px");
    assert_eq!(value_with("$q: \"x\";", "#{$q}"), "x");
}

#[test]
fn test_string_functions() {
    assert_eq!(value("unquote(\"a b\")"), "a b");
    assert_eq!(value("quote(sans)"), "\"sans\"");
    assert_eq!(value("type-of(1px)"), "number");
}

// ============================================================================
// Functions
// ============================================================================

#[test]
fn test_number_functions() {
    assert_eq!(value("percentage(0.5)"), "50%");
    assert_eq!(value("round(2.5px)"), "3px");
    assert_eq!(value("abs(-3em)"), "3em");
}

#[test]
fn test_list_functions() {
    let prelude = "$list: 1px 2px 3px;";
    assert_eq!(value_with(prelude, "nth($list, 2)"), "2px");
    assert_eq!(value_with(prelude, "length($list)"), "3");
    assert_eq!(value_with(prelude, "join($list, 4px)"), "1px 2px 3px 4px");
    assert_eq!(value_with(prelude, "list-separator($list)"), "space");
    assert_eq!(value("list-separator((a, b))"), "comma");
    assert_eq!(value("list-separator(a)"), "space");
}

#[test]
fn test_if_function() {
    assert_eq!(value("if(1 < 2, 10px, 20px)"), "10px");
    assert_eq!(value("if(true, 1px, $undefined)"), "1px");
    assert_eq!(value("if(false, $undefined, 2px)"), "2px");
}

#[test]
fn test_plain_css_functions_pass_through() {
    assert_eq!(value("translateX(10px * 2)"), "translateX(20px)");
    assert_eq!(value("url(\"a.png\")"), "url(\"a.png\")");
    assert_eq!(value("url(images/a.png)"), "url(images/a.png)");
    assert_eq!(value_with("$x: 10px;", "calc(100% - #{$x})"), "calc(100% - 10px)");
    assert_eq!(value("var(--main-color)"), "var(--main-color)");
}

#[test]
fn test_function_argument_errors() {
    assert!(matches!(error("lighten(#000)"), CompileError::Argument { .. }));
    assert!(matches!(error("lighten(1px, 10%)"), CompileError::Argument { .. }));
    assert!(matches!(error("nth(a b, 5)"), CompileError::Argument { .. }));
}

// ============================================================================
// Logic
// ============================================================================

#[test]
fn test_comparison_and_boolean_operators() {
    assert_eq!(value("1 < 2"), "true");
    assert_eq!(value("2px >= 3px"), "false");
    assert_eq!(value("1 == 1 and 2 != 2"), "false");
    assert_eq!(value("false or 5"), "5");
    assert_eq!(value("not false"), "true");
}

#[test]
fn test_important() {
    let css = compile(
        "a { color: red !important; }",
        &CompileOptions::new().with_output_style(OutputStyle::Compact),
    )
    .unwrap();
    assert_eq!(css, "a { color: red !important; }\n");
}

// ============================================================================
// Limits
// ============================================================================

#[test]
fn test_long_operator_chain() {
    let sum = vec!["1px"; 10_000].join(" + ");
    assert_eq!(value(&sum), "10000px");

    let conjunction = vec!["true"; 10_000].join(" and ");
    assert_eq!(value(&conjunction), "true");
}

#[test]
fn test_deep_nesting_is_an_error() {
    let parens = format!("{}1px{}", "(".repeat(10_000), ")".repeat(10_000));
    assert!(matches!(error(&parens), CompileError::InternalLimit { .. }));

    let signs = format!("{}1", "- ".repeat(10_000));
    assert!(matches!(error(&signs), CompileError::InternalLimit { .. }));

    let calls = format!("{}1px{}", "abs(".repeat(10_000), ")".repeat(10_000));
    assert!(matches!(error(&calls), CompileError::InternalLimit { .. }));
}
