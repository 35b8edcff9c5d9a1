//! Error kinds and locations.

use scss::{CompileError, CompileOptions, compile};

fn error(source: &str) -> CompileError {
    compile(source, &CompileOptions::default()).unwrap_err()
}

// ============================================================================
// Locations
// ============================================================================

#[test]
fn test_missing_colon_reports_line() {
    let source = "$x: 1px;\n\na {\n  width: $x;\n}\nb {\n  color red;\n}\n";
    let err = error(source);
    assert!(matches!(err, CompileError::Syntax { .. }));
    assert_eq!(err.line(), 7);
    assert!(err.message().contains("expected ':'"));
}

#[test]
fn test_undefined_variable_location() {
    let err = error("a {\n  width: $missing;\n}");
    assert_eq!(err.line(), 2);
    assert_eq!(err.column(), 10);
    assert!(err.to_string().starts_with("2:10: "));
}

// ============================================================================
// Lex Errors
// ============================================================================

#[test]
fn test_invalid_character() {
    assert!(matches!(error("a { color: red; }\n`"), CompileError::Lex { .. }));
}

#[test]
fn test_unterminated_string() {
    assert!(matches!(error("a { content: \"open; }"), CompileError::Lex { .. }));
}

#[test]
fn test_unterminated_comment() {
    assert!(matches!(error("a { } /* never closed"), CompileError::Lex { .. }));
}

// ============================================================================
// Syntax Errors
// ============================================================================

#[test]
fn test_unclosed_block() {
    let err = error("a { color: red;");
    assert!(matches!(err, CompileError::Syntax { .. }));
    assert!(err.message().contains("unclosed"));
}

#[test]
fn test_top_level_declaration() {
    let err = error("color: red;");
    assert!(matches!(err, CompileError::Syntax { .. }));
}

#[test]
fn test_else_without_if() {
    let err = error("a { @else { } }");
    assert_eq!(err.message(), "@else without a preceding @if");
}

#[test]
fn test_unsupported_directive() {
    let err = error("a { @extend .b; }");
    assert!(matches!(err, CompileError::Syntax { .. }));
    assert!(err.message().contains("@extend"));
}

// ============================================================================
// Evaluation Errors
// ============================================================================

#[test]
fn test_type_error_mentions_units() {
    let err = error("a { width: 1px + 1em; }");
    assert!(matches!(err, CompileError::Type { .. }));
    assert!(err.message().contains("px"));
    assert!(err.message().contains("em"));
}

#[test]
fn test_first_error_wins() {
    let err = error("a { width: $one; height: $two; }");
    assert!(matches!(err, CompileError::UndefinedVariable { ref name, .. } if name == "one"));
}
