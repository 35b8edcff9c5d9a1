//! Selector text reconstruction.
//!
//! Selectors are kept as text: the resolver only has to splice parents into
//! `&` and the evaluator only has to expand `#{...}`. This module rebuilds
//! that text from tokens, normalising whitespace so that `a>b`, `a > b` and
//! `a  >  b` all become `a > b`.

use crate::error::{CompileError, Result, Span};
use crate::lexer::{Token, TokenKind};

/// `>`, `+` and `~` between compound selectors.
fn is_combinator(token: &Token) -> bool {
    token.is_op(">") || token.is_op("+") || token.is_punct("~")
}

/// Joins token texts, collapsing any whitespace run to a single space.
pub fn join_tokens(tokens: &[Token]) -> String {
    let mut text = String::new();
    for token in tokens {
        if token.ws_before && !text.is_empty() {
            text.push(' ');
        }
        text.push_str(&token.text);
    }
    text
}

/// Splits selector tokens at top-level commas into normalised fragments.
///
/// Fragments may start with a combinator (`> li` inside a nested rule) but
/// may not end with one. `$variables` must be interpolated to appear in a
/// selector.
pub fn parse_selector_list(tokens: &[Token], span: Span) -> Result<Vec<String>> {
    let mut fragments = Vec::new();
    let mut current = String::new();
    let mut combinator: Option<&str> = None;
    let mut depth = 0usize;
    let mut fragment_span = tokens.first().map(|t| t.span).unwrap_or(span);

    for token in tokens {
        if depth == 0 {
            if token.is_punct(",") {
                fragments.push(finish_fragment(&current, combinator, fragment_span)?);
                current.clear();
                combinator = None;
                fragment_span = token.span;
                continue;
            }
            if token.kind == TokenKind::Variable {
                return Err(CompileError::syntax(
                    format!(
                        "variables are not allowed in selectors, use #{{{}}}",
                        token.text
                    ),
                    token.span,
                ));
            }
            if is_combinator(token) {
                if combinator.is_some() {
                    return Err(CompileError::syntax(
                        format!("unexpected combinator '{}'", token.text),
                        token.span,
                    ));
                }
                combinator = Some(token.text.as_str());
                continue;
            }
        }

        if let Some(c) = combinator.take() {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(c);
            current.push(' ');
        } else if token.ws_before && !current.is_empty() && !current.ends_with(' ') {
            current.push(' ');
        }
        current.push_str(&token.text);

        match token.kind {
            TokenKind::InterpolationStart => depth += 1,
            TokenKind::Punctuation => match token.text.as_str() {
                "(" | "[" => depth += 1,
                ")" | "]" | "}" => depth = depth.saturating_sub(1),
                _ => {}
            },
            _ => {}
        }
    }

    fragments.push(finish_fragment(&current, combinator, fragment_span)?);
    Ok(fragments)
}

fn finish_fragment(text: &str, combinator: Option<&str>, span: Span) -> Result<String> {
    if let Some(c) = combinator {
        return Err(CompileError::syntax(
            format!("selector ends with a dangling combinator '{c}'"),
            span,
        ));
    }
    let text = text.trim();
    if text.is_empty() {
        return Err(CompileError::syntax("expected a selector", span));
    }
    Ok(text.to_string())
}
