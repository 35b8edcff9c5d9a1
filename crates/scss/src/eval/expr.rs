//! Expression evaluation.
//!
//! [`evaluate`] reduces an [`Expr`] to a [`Value`] against a scope chain.
//! Value operations report a [`ValueError`](crate::types::ValueError); the
//! span of the failing expression is attached here.

use super::functions;
use super::scope::Scope;
use crate::error::{CompileError, Result, Span};
use crate::lexer::Lexer;
use crate::parser::{BinaryOp, CallArg, Expr, ExprKind, UnaryOp, parse_expression_tokens};
use crate::types::{Value, ValueError};
use std::cmp::Ordering;
use std::rc::Rc;

fn located(span: Span) -> impl Fn(ValueError) -> CompileError {
    move |err| CompileError::type_error(err.message, span)
}

/// Evaluates `expr` in `scope`.
///
/// A `12px/2` written outside parentheses stays as the literal text
/// `12px/2`; it is only divided when used as an operand of further
/// arithmetic.
pub fn evaluate(expr: &Expr, scope: &Rc<Scope>) -> Result<Value> {
    match &expr.kind {
        ExprKind::Binary {
            first,
            rest,
            slash_literal: true,
        } => {
            let mut text = evaluate(first, scope)?.to_css(false);
            for (_, operand) in rest {
                text.push('/');
                text.push_str(&evaluate(operand, scope)?.to_css(false));
            }
            Ok(Value::ident(text))
        }
        _ => evaluate_operand(expr, scope),
    }
}

/// Evaluates `expr` as an operand: slash literals divide.
fn evaluate_operand(expr: &Expr, scope: &Rc<Scope>) -> Result<Value> {
    let span = expr.span;
    match &expr.kind {
        ExprKind::Number { value, unit } => Ok(Value::Number {
            value: *value,
            unit: unit.clone(),
        }),
        ExprKind::Color(color) => Ok(Value::Color(color.clone())),
        ExprKind::String { text, quote } => {
            let text = if text.contains("#{") {
                interpolate(text, scope, span)?
            } else {
                text.clone()
            };
            Ok(Value::String { text, quote: *quote })
        }
        ExprKind::Boolean(b) => Ok(Value::Boolean(*b)),
        ExprKind::Variable(name) => {
            scope
                .resolve(name)
                .ok_or_else(|| CompileError::UndefinedVariable {
                    name: name.clone(),
                    span,
                })
        }
        ExprKind::Binary { first, rest, .. } => {
            let mut left = evaluate_operand(first, scope)?;
            for (op, operand) in rest {
                left = binary(*op, left, operand, scope, span)?;
            }
            Ok(left)
        }
        ExprKind::Unary { op, operand } => {
            let value = evaluate_operand(operand, scope)?;
            Ok(match op {
                UnaryOp::Neg => value.neg(),
                UnaryOp::Plus if value.is_number() => value,
                UnaryOp::Plus => Value::ident(format!("+{}", value.unquoted_text())),
                UnaryOp::Not => Value::Boolean(!value.is_truthy()),
            })
        }
        ExprKind::Call { name, args } if name.eq_ignore_ascii_case("if") => {
            conditional(name, args, scope, span)
        }
        ExprKind::Call { name, args } => {
            let mut positional = Vec::new();
            let mut named = Vec::new();
            for arg in args {
                let value = evaluate(&arg.value, scope)?;
                match &arg.name {
                    Some(name) => named.push((name.clone(), value)),
                    None => positional.push(value),
                }
            }
            functions::call(name, positional, named, span)
        }
        ExprKind::List { items, separator } => {
            let items = items
                .iter()
                .map(|item| evaluate(item, scope))
                .collect::<Result<Vec<_>>>()?;
            Ok(Value::list(items, *separator))
        }
        ExprKind::Group(inner) => evaluate_operand(inner, scope),
        ExprKind::Interpolation(inner) => {
            Ok(Value::ident(evaluate(inner, scope)?.unquoted_text()))
        }
        ExprKind::Concat(pieces) => {
            let mut text = String::new();
            for piece in pieces {
                text.push_str(&evaluate(piece, scope)?.unquoted_text());
            }
            Ok(Value::ident(text))
        }
        ExprKind::Raw(text) => Ok(Value::ident(interpolate(text, scope, span)?)),
    }
}

/// `if()` evaluates only the branch its condition selects.
fn conditional(name: &str, args: &[CallArg], scope: &Rc<Scope>, span: Span) -> Result<Value> {
    let mut positional = Vec::new();
    let mut named = Vec::new();
    for arg in args {
        match &arg.name {
            Some(key) => named.push((key.clone(), &arg.value)),
            None => positional.push(&arg.value),
        }
    }
    let bound = functions::bind(name, positional, named, span)?;
    let [Some(condition), Some(if_true), Some(if_false)] = bound.as_slice() else {
        return Err(CompileError::argument(
            format!("{name}() takes a condition and two values"),
            span,
        ));
    };
    let branch = if evaluate(condition, scope)?.is_truthy() {
        if_true
    } else {
        if_false
    };
    evaluate(branch, scope)
}

/// Applies one operator of a chain. `rhs` is not evaluated when `and`/`or`
/// is decided by `left`.
fn binary(op: BinaryOp, left: Value, rhs: &Expr, scope: &Rc<Scope>, span: Span) -> Result<Value> {
    match op {
        BinaryOp::And if !left.is_truthy() => return Ok(left),
        BinaryOp::Or if left.is_truthy() => return Ok(left),
        _ => {}
    }

    let right = evaluate_operand(rhs, scope)?;
    let err = located(span);
    match op {
        BinaryOp::Add => left.add(&right).map_err(err),
        BinaryOp::Sub => left.sub(&right).map_err(err),
        BinaryOp::Mul => left.mul(&right).map_err(err),
        BinaryOp::Div => left.div(&right).map_err(err),
        BinaryOp::Rem => left.rem(&right).map_err(err),
        BinaryOp::Eq => Ok(Value::Boolean(left.equals(&right))),
        BinaryOp::Ne => Ok(Value::Boolean(!left.equals(&right))),
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
            let ordering = left.compare(&right).map_err(err)?;
            Ok(Value::Boolean(match op {
                BinaryOp::Lt => ordering == Ordering::Less,
                BinaryOp::Le => ordering != Ordering::Greater,
                BinaryOp::Gt => ordering == Ordering::Greater,
                _ => ordering != Ordering::Less,
            }))
        }
        BinaryOp::And | BinaryOp::Or => Ok(right),
    }
}

/// Replaces every `#{...}` in `text` with the unquoted value of its expression.
pub fn interpolate(text: &str, scope: &Rc<Scope>, span: Span) -> Result<String> {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("#{") {
        out.push_str(&rest[..start]);
        let inner_start = start + 2;
        let len = closing_brace(&rest[inner_start..]).ok_or_else(|| {
            CompileError::syntax("unterminated interpolation, expected '}'", span)
        })?;
        let inner = &rest[inner_start..inner_start + len];
        if inner.trim().is_empty() {
            return Err(CompileError::syntax("empty interpolation", span));
        }

        let tokens = Lexer::with_origin(inner, span).collect::<Result<Vec<_>>>()?;
        let expr = parse_expression_tokens(&tokens)?;
        out.push_str(&evaluate(&expr, scope)?.unquoted_text());
        rest = &rest[inner_start + len + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

/// Byte offset of the `}` closing an interpolation body.
fn closing_brace(body: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (i, c) in body.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '{' => depth += 1,
            '}' if depth == 0 => return Some(i),
            '}' => depth -= 1,
            _ => {}
        }
    }
    None
}
