//! Expression grammar.
//!
//! Precedence, lowest first:
//!
//! | level          | operators                  |
//! |----------------|----------------------------|
//! | comma list     | `,`                        |
//! | space list     | juxtaposition              |
//! | or             | `or`                       |
//! | and            | `and`                      |
//! | equality       | `==` `!=`                  |
//! | relational     | `<` `>` `<=` `>=`          |
//! | additive       | `+` `-`                    |
//! | multiplicative | `*` `/` `%`                |
//! | unary          | `-` `+` `not`              |
//!
//! `a -b` is a two item list while `a - b` and `a-b` subtract: a `-` with
//! whitespace before it and none after it starts a new list item.

use super::stylesheet::{BinaryOp, CallArg, Expr, ExprKind, UnaryOp};
use super::{MAX_EXPRESSION_DEPTH, Parser, describe, selectors::join_tokens};
use crate::error::{CompileError, Result};
use crate::lexer::{Token, TokenKind};
use crate::types::number::parse_number_token;
use crate::types::{Color, ListSeparator};

/// Functions whose arguments are copied through without evaluation.
fn is_raw_function(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    matches!(lower.as_str(), "var" | "env" | "expression" | "element")
        || lower.ends_with("calc")
}

impl Parser {
    /// Parses a full expression, including comma-separated lists.
    pub fn parse_expression(&mut self) -> Result<Expr> {
        let first = self.parse_space_list()?;
        if !self.at_punct(",") {
            return Ok(first);
        }

        let span = first.span;
        let mut items = vec![first];
        while self.at_punct(",") {
            self.advance();
            // Trailing comma: `(a, b,)`
            if !self.starts_expression() {
                break;
            }
            items.push(self.parse_space_list()?);
        }
        Ok(Expr::new(
            ExprKind::List {
                items,
                separator: ListSeparator::Comma,
            },
            span,
        ))
    }

    /// Parses space-separated items.
    pub fn parse_space_list(&mut self) -> Result<Expr> {
        let first = self.parse_or()?;
        if !self.starts_expression() {
            return Ok(first);
        }

        let span = first.span;
        let mut items = vec![first];
        while self.starts_expression() {
            items.push(self.parse_or()?);
        }
        Ok(Expr::new(
            ExprKind::List {
                items,
                separator: ListSeparator::Space,
            },
            span,
        ))
    }

    /// Whether the next token can begin another list item.
    fn starts_expression(&self) -> bool {
        let token = self.peek();
        match token.kind {
            TokenKind::Number
            | TokenKind::String
            | TokenKind::Url
            | TokenKind::Variable
            | TokenKind::Hash
            | TokenKind::InterpolationStart => true,
            TokenKind::Identifier => !self.stop_words.contains(&token.text.as_str()),
            TokenKind::Punctuation => token.text == "(",
            TokenKind::Operator => {
                (token.text == "-" || token.text == "+") && !self.peek_nth(1).ws_before
            }
            _ => false,
        }
    }

    fn parse_or(&mut self) -> Result<Expr> {
        let first = self.parse_and()?;
        let mut rest = Vec::new();
        while self.peek().is_ident("or") {
            self.advance();
            rest.push((BinaryOp::Or, self.parse_and()?));
        }
        Ok(chain(first, rest, false))
    }

    fn parse_and(&mut self) -> Result<Expr> {
        let first = self.parse_equality()?;
        let mut rest = Vec::new();
        while self.peek().is_ident("and") {
            self.advance();
            rest.push((BinaryOp::And, self.parse_equality()?));
        }
        Ok(chain(first, rest, false))
    }

    fn parse_equality(&mut self) -> Result<Expr> {
        let first = self.parse_relational()?;
        let mut rest = Vec::new();
        loop {
            let op = match self.peek() {
                t if t.is_op("==") => BinaryOp::Eq,
                t if t.is_op("!=") => BinaryOp::Ne,
                _ => break,
            };
            self.advance();
            rest.push((op, self.parse_relational()?));
        }
        Ok(chain(first, rest, false))
    }

    fn parse_relational(&mut self) -> Result<Expr> {
        let first = self.parse_additive()?;
        let mut rest = Vec::new();
        loop {
            let op = match self.peek() {
                t if t.is_op("<") => BinaryOp::Lt,
                t if t.is_op("<=") => BinaryOp::Le,
                t if t.is_op(">") => BinaryOp::Gt,
                t if t.is_op(">=") => BinaryOp::Ge,
                _ => break,
            };
            self.advance();
            rest.push((op, self.parse_additive()?));
        }
        Ok(chain(first, rest, false))
    }

    fn parse_additive(&mut self) -> Result<Expr> {
        let first = self.parse_multiplicative()?;
        let mut rest = Vec::new();
        loop {
            let token = self.peek();
            let op = match token {
                t if t.is_op("+") => BinaryOp::Add,
                t if t.is_op("-") => BinaryOp::Sub,
                _ => break,
            };
            // `a -b`: the minus belongs to the next list item.
            if token.ws_before && !self.peek_nth(1).ws_before {
                break;
            }
            self.advance();
            rest.push((op, self.parse_multiplicative()?));
        }
        Ok(chain(first, rest, false))
    }

    fn parse_multiplicative(&mut self) -> Result<Expr> {
        let first = self.parse_unary()?;
        let mut rest = Vec::new();
        loop {
            let op = match self.peek() {
                t if t.is_op("*") => BinaryOp::Mul,
                t if t.is_op("/") => BinaryOp::Div,
                t if t.is_op("%") => BinaryOp::Rem,
                _ => break,
            };
            self.advance();
            rest.push((op, self.parse_unary()?));
        }
        let slash_literal = self.paren_depth == 0
            && first.is_number_literal()
            && rest
                .iter()
                .all(|(op, rhs)| *op == BinaryOp::Div && rhs.is_number_literal());
        Ok(chain(first, rest, slash_literal))
    }

    /// Every nested expression passes through here, so the depth bound
    /// covers parentheses, calls, interpolation and repeated signs.
    fn parse_unary(&mut self) -> Result<Expr> {
        if self.expr_depth >= MAX_EXPRESSION_DEPTH {
            return Err(CompileError::limit(
                format!("expression nested deeper than {MAX_EXPRESSION_DEPTH} levels"),
                self.peek().span,
            ));
        }
        self.expr_depth += 1;
        let result = self.parse_signed();
        self.expr_depth -= 1;
        result
    }

    fn parse_signed(&mut self) -> Result<Expr> {
        let token = self.peek().clone();
        let op = if token.is_op("-") {
            Some(UnaryOp::Neg)
        } else if token.is_op("+") {
            Some(UnaryOp::Plus)
        } else if token.is_ident("not") && self.peek_nth(1).ws_before {
            Some(UnaryOp::Not)
        } else {
            None
        };

        let Some(op) = op else {
            return self.parse_primary();
        };
        self.advance();

        // Fold `-5px` into a literal so that `12px/-2px` stays a slash literal.
        let operand = self.parse_unary()?;
        if op == UnaryOp::Neg {
            if let ExprKind::Number { value, unit } = &operand.kind {
                return Ok(Expr::new(
                    ExprKind::Number {
                        value: -value,
                        unit: unit.clone(),
                    },
                    token.span,
                ));
            }
        }
        Ok(Expr::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            token.span,
        ))
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        let primary = self.parse_single()?;
        self.parse_adjacent(primary)
    }

    /// Joins pieces written without whitespace when interpolation is involved:
    /// `#{$a}px`, `foo#{$b}`, `#{$a}#{$b}`.
    fn parse_adjacent(&mut self, first: Expr) -> Result<Expr> {
        let mut pieces = vec![first];
        loop {
            let next = self.peek();
            if next.ws_before {
                break;
            }
            let last_is_interp = matches!(
                pieces.last().map(|e| &e.kind),
                Some(ExprKind::Interpolation(_))
            );
            let joinable = match next.kind {
                TokenKind::InterpolationStart => true,
                TokenKind::Identifier | TokenKind::Number => last_is_interp,
                _ => false,
            };
            if !joinable {
                break;
            }
            pieces.push(self.parse_single()?);
        }

        if pieces.len() == 1 {
            return Ok(pieces.remove(0));
        }
        let span = pieces[0].span;
        Ok(Expr::new(ExprKind::Concat(pieces), span))
    }

    fn parse_single(&mut self) -> Result<Expr> {
        let token = self.peek().clone();
        let span = token.span;
        let kind = match token.kind {
            TokenKind::Number => {
                self.advance();
                let (value, unit) = parse_number_token(&token.text).ok_or_else(|| {
                    CompileError::syntax(format!("invalid number '{}'", token.text), span)
                })?;
                ExprKind::Number { value, unit }
            }
            TokenKind::String => {
                self.advance();
                let (text, quote) = token.unquoted();
                ExprKind::String {
                    text: text.to_string(),
                    quote,
                }
            }
            TokenKind::Url => {
                self.advance();
                ExprKind::String {
                    text: token.text.clone(),
                    quote: None,
                }
            }
            TokenKind::Variable => {
                self.advance();
                ExprKind::Variable(token.name().to_string())
            }
            TokenKind::Hash => {
                self.advance();
                let color = Color::parse_hex(token.name()).map_err(|e| {
                    CompileError::syntax(format!("invalid color {}: {e}", token.text), span)
                })?;
                ExprKind::Color(color.with_original(token.text.clone()))
            }
            TokenKind::InterpolationStart => {
                self.advance();
                let saved = std::mem::take(&mut self.stop_words);
                let inner = self.parse_expression();
                self.stop_words = saved;
                let inner = inner?;
                if !self.at_punct("}") {
                    return Err(CompileError::syntax(
                        format!("expected '}}' to close interpolation, found {}", describe(self.peek())),
                        self.peek().span,
                    ));
                }
                self.advance();
                ExprKind::Interpolation(Box::new(inner))
            }
            TokenKind::Punctuation if token.text == "(" => {
                self.advance();
                self.paren_depth += 1;
                let saved = std::mem::take(&mut self.stop_words);
                let inner = if self.at_punct(")") {
                    Ok(Expr::new(
                        ExprKind::List {
                            items: Vec::new(),
                            separator: ListSeparator::Space,
                        },
                        span,
                    ))
                } else {
                    self.parse_expression()
                };
                self.stop_words = saved;
                self.paren_depth -= 1;
                let inner = inner?;
                self.expect_punct(")")?;
                ExprKind::Group(Box::new(inner))
            }
            TokenKind::Identifier => {
                self.advance();
                if self.at_punct("(") && !self.peek().ws_before {
                    return self.parse_call(token);
                }
                match token.text.as_str() {
                    "true" => ExprKind::Boolean(true),
                    "false" => ExprKind::Boolean(false),
                    text => match Color::named(text) {
                        Some(color) => ExprKind::Color(color.with_original(text)),
                        None => ExprKind::String {
                            text: text.to_string(),
                            quote: None,
                        },
                    },
                }
            }
            _ => {
                return Err(CompileError::syntax(
                    format!("expected an expression, found {}", describe(&token)),
                    span,
                ));
            }
        };
        Ok(Expr::new(kind, span))
    }

    /// Parses `name(args)`; the name has been consumed.
    fn parse_call(&mut self, name: Token) -> Result<Expr> {
        let span = name.span;
        if is_raw_function(&name.text) {
            let open = self.advance();
            let inner = self.collect_until(|t| t.is_punct(")"));
            let close = self.expect_punct(")")?;
            let mut tokens = vec![name, open];
            tokens.extend(inner);
            tokens.push(close);
            return Ok(Expr::new(ExprKind::Raw(join_tokens(&tokens)), span));
        }

        self.expect_punct("(")?;
        self.paren_depth += 1;
        let saved = std::mem::take(&mut self.stop_words);
        let args = self.parse_call_args();
        self.stop_words = saved;
        self.paren_depth -= 1;
        let args = args?;
        self.expect_punct(")")?;

        Ok(Expr::new(
            ExprKind::Call {
                name: name.text,
                args,
            },
            span,
        ))
    }

    fn parse_call_args(&mut self) -> Result<Vec<CallArg>> {
        let mut args = Vec::new();
        while !self.at_punct(")") {
            let name = if self.peek().kind == TokenKind::Variable && self.peek_nth(1).is_punct(":")
            {
                let variable = self.advance();
                self.advance();
                Some(variable.name().to_string())
            } else {
                None
            };
            let value = self.parse_space_list()?;
            args.push(CallArg { name, value });

            if self.at_punct(",") {
                self.advance();
            } else if !self.at_punct(")") {
                let token = self.peek();
                return Err(CompileError::syntax(
                    format!("expected ',' or ')' in argument list, found {}", describe(token)),
                    token.span,
                ));
            }
        }
        Ok(args)
    }
}

/// One operand with no operators is returned as is.
fn chain(first: Expr, rest: Vec<(BinaryOp, Expr)>, slash_literal: bool) -> Expr {
    if rest.is_empty() {
        return first;
    }
    let span = first.span;
    Expr::new(
        ExprKind::Binary {
            first: Box::new(first),
            rest,
            slash_literal,
        },
        span,
    )
}
