//! Nested rules, the parent reference and selector lists.

use scss::{CompileError, CompileOptions, OutputStyle, compile};

fn expanded(source: &str) -> String {
    compile(
        source,
        &CompileOptions::new().with_output_style(OutputStyle::Expanded),
    )
    .unwrap()
}

fn nested(source: &str) -> String {
    compile(source, &CompileOptions::default()).unwrap()
}

// ============================================================================
// Descendant Nesting
// ============================================================================

#[test]
fn test_descendant_nesting() {
    assert_eq!(
        expanded("a { b { color: red; } }"),
        "a b {\n  color: red;\n}\n"
    );
}

#[test]
fn test_parent_declarations_come_first() {
    assert_eq!(
        expanded("a { b { x: y; } color: red; }"),
        "a {\n  color: red;\n}\n\na b {\n  x: y;\n}\n"
    );
}

#[test]
fn test_nested_style_indents_by_depth() {
    assert_eq!(
        nested("a { color: red; b { color: blue; c { color: green; } } }"),
        "a {\n  color: red; }\n  a b {\n    color: blue; }\n    a b c {\n      color: green; }\n"
    );
}

#[test]
fn test_empty_rule_is_omitted() {
    assert_eq!(expanded("a { }"), "");
    assert_eq!(expanded("a { b { } }"), "");
}

// ============================================================================
// Parent Reference
// ============================================================================

#[test]
fn test_parent_reference_pseudo_class() {
    assert_eq!(
        expanded("a { color: red; &:hover { color: blue; } }"),
        "a {\n  color: red;\n}\n\na:hover {\n  color: blue;\n}\n"
    );
}

#[test]
fn test_parent_reference_suffix() {
    assert_eq!(
        expanded(".btn { &-primary { color: red; } }"),
        ".btn-primary {\n  color: red;\n}\n"
    );
}

#[test]
fn test_parent_reference_in_context() {
    assert_eq!(
        expanded(".item { .rtl & { float: right; } }"),
        ".rtl .item {\n  float: right;\n}\n"
    );
}

#[test]
fn test_top_level_parent_reference_fails() {
    let err = compile("&:hover { x: y; }", &CompileOptions::default()).unwrap_err();
    assert!(matches!(err, CompileError::Syntax { .. }));
}

// ============================================================================
// Selector Lists and Combinators
// ============================================================================

#[test]
fn test_selector_lists_combine() {
    assert_eq!(
        expanded("h1, h2 { a, b { x: y; } }"),
        "h1 a, h1 b, h2 a, h2 b {\n  x: y;\n}\n"
    );
}

#[test]
fn test_combinators_are_normalised() {
    assert_eq!(
        expanded("ul>li { a { x: y; } }"),
        "ul > li a {\n  x: y;\n}\n"
    );
    assert_eq!(
        expanded("ul { > li { x: y; } + p { x: z; } }"),
        "ul > li {\n  x: y;\n}\n\nul + p {\n  x: z;\n}\n"
    );
}

// ============================================================================
// Interpolation
// ============================================================================

#[test]
fn test_selector_interpolation() {
    assert_eq!(
        expanded("$name: icon; .#{$name}-home { x: y; }"),
        ".icon-home {\n  x: y;\n}\n"
    );
}

#[test]
fn test_interpolated_selector_list_is_split() {
    assert_eq!(
        expanded("$sel: \"b, c\"; a { #{$sel} { x: y; } }"),
        "a b, a c {\n  x: y;\n}\n"
    );
    assert_eq!(
        expanded("$sel: \"b, c\"; a { #{$sel} { d { x: y; } } }"),
        "a b d, a c d {\n  x: y;\n}\n"
    );
    assert_eq!(
        expanded("$sel: \".b, .c\"; #{$sel} { &:hover { x: y; } }"),
        ".b:hover, .c:hover {\n  x: y;\n}\n"
    );
}

#[test]
fn test_interpolated_selectors_inside_loops() {
    assert_eq!(
        expanded(".btn { @each $k in primary, danger { &-#{$k} { x: $k; } } }"),
        ".btn-primary {\n  x: primary;\n}\n\n.btn-danger {\n  x: danger;\n}\n"
    );
}

#[test]
fn test_property_interpolation() {
    assert_eq!(
        expanded("$side: left; a { margin-#{$side}: 1px; }"),
        "a {\n  margin-left: 1px;\n}\n"
    );
}

// ============================================================================
// Nested Properties
// ============================================================================

#[test]
fn test_nested_properties_expand() {
    assert_eq!(
        expanded("a { font: { family: Arial; size: 12px; } }"),
        "a {\n  font-family: Arial;\n  font-size: 12px;\n}\n"
    );
}

#[test]
fn test_nested_properties_with_a_value() {
    assert_eq!(
        expanded("a { font: 12px/1.5 { family: Arial; weight: bold; } }"),
        "a {\n  font: 12px/1.5;\n  font-family: Arial;\n  font-weight: bold;\n}\n"
    );
}

#[test]
fn test_nested_properties_nest_further() {
    assert_eq!(
        expanded("$side: left; a { border: { #{$side}: { width: 1px; } color: red; } }"),
        "a {\n  border-left-width: 1px;\n  border-color: red;\n}\n"
    );
}

#[test]
fn test_pseudo_class_is_not_a_property_set() {
    assert_eq!(
        expanded("a { b:hover { x: y; } }"),
        "a b:hover {\n  x: y;\n}\n"
    );
}

#[test]
fn test_rules_inside_property_set_fail() {
    let err = compile(
        "a { font: { b { x: y; } } }",
        &CompileOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, CompileError::Syntax { .. }));
}
