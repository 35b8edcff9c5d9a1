//! Whole-compiler properties that hold across features.

use scss::parser::{Rule, parse_source, resolve_selectors};
use scss::{CompileError, CompileOptions, OutputStyle, compile};

fn compile_as(source: &str, style: OutputStyle) -> String {
    compile(source, &CompileOptions::new().with_output_style(style)).unwrap()
}

/// `(selector, property, value)` triples with all whitespace removed.
fn triples(css: &str) -> Vec<(String, String, String)> {
    let strip = |s: &str| s.chars().filter(|c| !c.is_whitespace()).collect::<String>();
    let mut out = Vec::new();
    for block in css.split('}') {
        let Some((selector, body)) = block.split_once('{') else {
            continue;
        };
        for declaration in body.split(';') {
            if let Some((property, value)) = declaration.split_once(':') {
                out.push((strip(selector), strip(property), strip(value)));
            }
        }
    }
    out
}

// ============================================================================
// Flat CSS
// ============================================================================

#[test]
fn test_flat_css_round_trips_in_expanded_style() {
    let flat = "a {\n  color: red;\n}\n\nb c {\n  margin: 0 auto;\n}\n";
    let once = compile_as(flat, OutputStyle::Expanded);
    assert_eq!(once, flat);
    assert_eq!(compile_as(&once, OutputStyle::Expanded), once);
}

// ============================================================================
// Selector Resolution
// ============================================================================

#[test]
fn test_resolved_selectors() {
    let mut doc = parse_source("a { b { x: y; } &:hover { x: z; } }").unwrap();
    resolve_selectors(&mut doc).unwrap();
    let outer = doc.rules().next().unwrap();
    let nested: Vec<&Rule> = outer.nested_rules().collect();
    assert_eq!(outer.resolved, vec!["a"]);
    assert_eq!(nested[0].resolved, vec!["a b"]);
    assert_eq!(nested[1].resolved, vec!["a:hover"]);
}

// ============================================================================
// Scoping and Arithmetic
// ============================================================================

#[test]
fn test_scoping() {
    assert_eq!(
        compile_as("$x: 1; a { $x: 2; w: $x; } b { w: $x; }", OutputStyle::Compact),
        "a { w: 2; }\n\nb { w: 1; }\n"
    );
}

#[test]
fn test_unit_checked_addition() {
    assert_eq!(
        compile_as("a { w: 10px + 5px; }", OutputStyle::Compact),
        "a { w: 15px; }\n"
    );
    let err = compile("a { w: 10px + 5em; }", &CompileOptions::default()).unwrap_err();
    assert!(matches!(err, CompileError::Type { .. }));
}

// ============================================================================
// Output Styles
// ============================================================================

#[test]
fn test_styles_agree_on_declarations() {
    let source = "$c: red; a { color: $c; b, c { margin: 0 auto; &:hover { font: 12px/1.5 Arial; } } \
                  d { width: 10px + 5px; } }";
    let expected = triples(&compile_as(source, OutputStyle::Expanded));
    assert_eq!(expected.len(), 4);
    for style in [
        OutputStyle::Nested,
        OutputStyle::Compact,
        OutputStyle::Compressed,
    ] {
        assert_eq!(triples(&compile_as(source, style)), expected, "{style}");
    }
}

// ============================================================================
// Mixins
// ============================================================================

#[test]
fn test_mixin_equals_manual_inlining() {
    let with_mixin = "@mixin pair($a, $b: 2px) { top: $a; left: $b; } .x { @include pair(1px); }";
    let inlined = ".x { top: 1px; left: 2px; }";
    for style in [OutputStyle::Nested, OutputStyle::Compressed] {
        assert_eq!(compile_as(with_mixin, style), compile_as(inlined, style));
    }
}

#[test]
fn test_recursion_is_bounded() {
    let err = compile(
        "@mixin loop($n) { @include loop($n + 1); } a { @include loop(0); }",
        &CompileOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, CompileError::InternalLimit { .. }));
}
