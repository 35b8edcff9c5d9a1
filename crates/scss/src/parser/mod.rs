//! Recursive-descent parser for SCSS.
//!
//! This module turns the token stream from the [`lexer`](crate::lexer) into
//! a [`Document`]:
//!
//! - [`parse`]: parse an already collected token list
//! - [`parse_source`]: lex and parse in one step
//! - [`parse_expression_tokens`]: parse a standalone token run as an expression
//!
//! ## Submodules
//!
//! - [`stylesheet`]: tree node types
//! - [`selectors`]: selector text reconstruction and validation
//! - [`values`]: the expression grammar
//! - [`flatten`]: the selector resolver (`&` and nesting)
//!
//! ## Example
//!
//! ```rust
//! use scss::parser::{parse_source, RuleItem};
//!
//! let doc = parse_source("a { color: red; b { margin: 0; } }").unwrap();
//! let rule = doc.rules().next().unwrap();
//! assert_eq!(rule.selectors, vec!["a"]);
//! assert_eq!(rule.declarations().count(), 1);
//! assert_eq!(rule.nested_rules().count(), 1);
//! ```

pub mod flatten;
pub mod selectors;
pub mod stylesheet;
pub mod values;

pub use crate::parser::flatten::{combine_selectors, resolve_items, resolve_selectors};
pub use crate::parser::stylesheet::{
    BinaryOp, CallArg, Control, Declaration, Directive, Document, Expr, ExprKind, ImportTarget,
    MixinArg, Param, Rule, RuleItem, UnaryOp, VarFlags,
};

use crate::error::{CompileError, Result, Span};
use crate::lexer::{Lexer, Token, TokenKind};

/// Maximum nesting of `{}` blocks.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Maximum nesting of parentheses, calls, interpolations and signs in one expression.
pub const MAX_EXPRESSION_DEPTH: usize = 64;

/// Parses a token list (as produced by the lexer) into a [`Document`].
pub fn parse(tokens: Vec<Token>) -> Result<Document> {
    let mut parser = Parser::new(tokens);
    let items = parser.parse_body(false)?;
    log::trace!("parsed {} top-level items", items.len());
    Ok(Document { items })
}

/// Lexes and parses `source`.
pub fn parse_source(source: &str) -> Result<Document> {
    let tokens = Lexer::new(source).collect::<Result<Vec<_>>>()?;
    parse(tokens)
}

/// Parses a standalone run of tokens as one expression (comma lists included).
pub fn parse_expression_tokens(tokens: &[Token]) -> Result<Expr> {
    let end_span = tokens.last().map(|t| t.span).unwrap_or_else(Span::start);
    let mut owned = tokens.to_vec();
    owned.push(Token::new(TokenKind::EndOfInput, "", end_span, false));

    let mut parser = Parser::new(owned);
    let expr = parser.parse_expression()?;
    let rest = parser.peek();
    if !rest.is_eof() {
        return Err(CompileError::syntax(
            format!("unexpected '{}' in expression", rest.text),
            rest.span,
        ));
    }
    Ok(expr)
}

/// Parser state over a fully lexed token list.
///
/// Comment tokens stay in the list; [`Parser::peek`] and [`Parser::advance`]
/// step over them, and statement positions collect block comments.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
    expr_depth: usize,
    /// Open parentheses in the expression being parsed.
    pub(crate) paren_depth: usize,
    /// Identifiers that end an expression (`to`, `through`, `in`).
    pub(crate) stop_words: &'static [&'static str],
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !tokens.last().is_some_and(Token::is_eof) {
            let span = tokens.last().map(|t| t.span).unwrap_or_else(Span::start);
            tokens.push(Token::new(TokenKind::EndOfInput, "", span, false));
        }
        Self {
            tokens,
            pos: 0,
            depth: 0,
            expr_depth: 0,
            paren_depth: 0,
            stop_words: &[],
        }
    }

    fn index_of_nth(&self, n: usize) -> usize {
        let mut seen = 0;
        let mut i = self.pos;
        while i < self.tokens.len() - 1 {
            if self.tokens[i].kind != TokenKind::Comment {
                if seen == n {
                    return i;
                }
                seen += 1;
            }
            i += 1;
        }
        self.tokens.len() - 1
    }

    /// The next significant (non-comment) token.
    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.index_of_nth(0)]
    }

    pub(crate) fn peek_nth(&self, n: usize) -> &Token {
        &self.tokens[self.index_of_nth(n)]
    }

    /// Consumes and returns the next significant token. `EndOfInput` is never consumed.
    pub(crate) fn advance(&mut self) -> Token {
        let index = self.index_of_nth(0);
        let token = self.tokens[index].clone();
        if !token.is_eof() {
            self.pos = index + 1;
        }
        token
    }

    pub(crate) fn at_punct(&self, text: &str) -> bool {
        self.peek().is_punct(text)
    }

    pub(crate) fn expect_punct(&mut self, text: &str) -> Result<Token> {
        let token = self.peek();
        if token.is_punct(text) {
            Ok(self.advance())
        } else {
            Err(CompileError::syntax(
                format!("expected '{text}', found {}", describe(token)),
                token.span,
            ))
        }
    }

    /// Raw significant tokens up to (not including) a depth-0 token matching `stop`.
    /// Brackets and interpolations are balanced.
    pub(crate) fn collect_until(&mut self, stop: impl Fn(&Token) -> bool) -> Vec<Token> {
        let mut collected = Vec::new();
        let mut depth = 0usize;
        loop {
            let token = self.peek();
            if token.is_eof() || (depth == 0 && stop(token)) {
                break;
            }
            if token.kind == TokenKind::InterpolationStart
                || token.is_punct("(")
                || token.is_punct("[")
            {
                depth += 1;
            } else if token.is_punct(")") || token.is_punct("]") || token.is_punct("}") {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            }
            collected.push(self.advance());
        }
        collected
    }

    /// Collects block comments at a statement position.
    fn take_comments(&mut self, items: &mut Vec<RuleItem>) {
        while let Some(token) = self.tokens.get(self.pos) {
            if token.kind != TokenKind::Comment {
                break;
            }
            if token.is_block_comment() {
                items.push(RuleItem::Comment(token.text.clone(), token.span));
            }
            self.pos += 1;
        }
    }

    /// Parses statements until `}` or end of input.
    ///
    /// `in_block` is false only for the document level, where `}` is unmatched
    /// and declarations are rejected.
    fn parse_body(&mut self, in_block: bool) -> Result<Vec<RuleItem>> {
        let mut items = Vec::new();
        loop {
            self.take_comments(&mut items);
            let token = self.peek().clone();
            match token.kind {
                TokenKind::EndOfInput => break,
                TokenKind::Punctuation if token.text == "}" => {
                    if in_block {
                        break;
                    }
                    return Err(CompileError::syntax("unmatched '}'", token.span));
                }
                TokenKind::Punctuation if token.text == ";" => {
                    self.advance();
                }
                TokenKind::AtKeyword => items.push(self.parse_directive(in_block)?),
                TokenKind::Variable => items.push(self.parse_variable_assignment()?),
                _ if in_block && self.starts_property_set() => {
                    items.extend(self.parse_property_set()?)
                }
                _ if self.starts_rule() => items.push(RuleItem::NestedRule(self.parse_rule()?)),
                _ => {
                    if !in_block {
                        return Err(CompileError::syntax(
                            "declarations may only be used within style rules",
                            token.span,
                        ));
                    }
                    items.push(RuleItem::Declaration(self.parse_declaration()?));
                }
            }
        }
        Ok(items)
    }

    /// Parses `{ body }`. The opening brace is the next token.
    fn parse_block(&mut self) -> Result<Vec<RuleItem>> {
        let open = self.expect_punct("{")?;
        self.depth += 1;
        if self.depth > MAX_NESTING_DEPTH {
            return Err(CompileError::limit(
                format!("nesting deeper than {MAX_NESTING_DEPTH} levels"),
                open.span,
            ));
        }

        let body = self.parse_body(true)?;

        let close = self.peek();
        if close.is_eof() {
            return Err(CompileError::syntax(
                format!("unclosed '{{' opened on line {}", open.span.line),
                close.span,
            ));
        }
        self.expect_punct("}")?;
        self.depth -= 1;
        Ok(body)
    }

    /// True when a `{` comes before the next `;` or `}` at bracket depth 0.
    fn starts_rule(&self) -> bool {
        let mut depth = 0usize;
        for token in &self.tokens[self.pos..] {
            match token.kind {
                TokenKind::EndOfInput => return false,
                TokenKind::InterpolationStart => depth += 1,
                TokenKind::Punctuation => match token.text.as_str() {
                    "(" | "[" => depth += 1,
                    ")" | "]" => depth = depth.saturating_sub(1),
                    "}" if depth > 0 => depth -= 1,
                    "}" => return false,
                    ";" if depth == 0 => return false,
                    "{" if depth == 0 => return true,
                    _ => {}
                },
                _ => {}
            }
        }
        false
    }

    /// `font: { ... }` or `font: 12px { ... }`. A selector such as `a:hover`
    /// has no whitespace after its colon, so it never matches.
    fn starts_property_set(&mut self) -> bool {
        let start = self.pos;
        let found = match self.parse_property_name() {
            Ok(name) if !name.starts_with("--") && self.at_punct(":") => {
                self.advance();
                let next = self.peek();
                next.is_punct("{") || (next.ws_before && self.starts_rule())
            }
            _ => false,
        };
        self.pos = start;
        found
    }

    /// Expands a nested property block into declarations named
    /// `outer-inner`, preceded by `outer: value` when a value is given.
    fn parse_property_set(&mut self) -> Result<Vec<RuleItem>> {
        let span = self.peek().span;
        let prefix = self.parse_property_name()?;
        self.expect_punct(":")?;

        let mut items = Vec::new();
        if !self.at_punct("{") {
            let value = self.parse_expression()?;
            let important = self.parse_important()?;
            items.push(RuleItem::Declaration(Declaration {
                property: prefix.clone(),
                value,
                important,
                span,
            }));
        }

        for item in self.parse_block()? {
            match item {
                RuleItem::Declaration(mut decl) => {
                    decl.property = format!("{prefix}-{}", decl.property);
                    items.push(RuleItem::Declaration(decl));
                }
                RuleItem::Comment(..) => items.push(item),
                RuleItem::NestedRule(rule) => {
                    return Err(CompileError::syntax(
                        format!("only properties may be nested inside property '{prefix}'"),
                        rule.span,
                    ));
                }
                RuleItem::Directive(_) => {
                    return Err(CompileError::syntax(
                        format!("only properties may be nested inside property '{prefix}'"),
                        span,
                    ));
                }
            }
        }
        Ok(items)
    }

    fn parse_rule(&mut self) -> Result<Rule> {
        let span = self.peek().span;
        let tokens = self.collect_until(|t| t.is_punct("{"));
        let selectors = selectors::parse_selector_list(&tokens, span)?;
        let body = self.parse_block()?;
        Ok(Rule::new(selectors, body, span))
    }

    fn parse_declaration(&mut self) -> Result<Declaration> {
        let span = self.peek().span;
        let property = self.parse_property_name()?;

        let colon = self.peek();
        if !colon.is_punct(":") {
            return Err(CompileError::syntax(
                format!("expected ':' after property '{property}'"),
                colon.span,
            ));
        }
        self.advance();

        let (value, important) = if property.starts_with("--") {
            let tokens = self.collect_until(|t| t.is_punct(";"));
            let value_span = tokens.first().map(|t| t.span).unwrap_or(span);
            (
                Expr::new(ExprKind::Raw(selectors::join_tokens(&tokens)), value_span),
                false,
            )
        } else {
            if self.at_statement_end() {
                return Err(CompileError::syntax(
                    format!("expected a value for '{property}'"),
                    self.peek().span,
                ));
            }
            let value = self.parse_expression()?;
            (value, self.parse_important()?)
        };

        self.expect_statement_end()?;
        Ok(Declaration {
            property,
            value,
            important,
            span,
        })
    }

    /// Property names: tight runs of identifiers, `-` and interpolations.
    fn parse_property_name(&mut self) -> Result<String> {
        let first = self.peek().clone();
        let mut name = String::new();
        // Old IE hacks (`*zoom: 1`) keep their leading character.
        if first.is_op("*") {
            name.push_str(&self.advance().text);
        }

        loop {
            let token = self.peek();
            if !name.is_empty() && token.ws_before {
                break;
            }
            match token.kind {
                TokenKind::Identifier => name.push_str(&self.advance().text),
                TokenKind::Operator if token.text == "-" => name.push_str(&self.advance().text),
                TokenKind::Number if !name.is_empty() => name.push_str(&self.advance().text),
                TokenKind::InterpolationStart => {
                    let tokens = self.collect_interpolation()?;
                    name.push_str(&selectors::join_tokens(&tokens));
                }
                _ => break,
            }
        }

        if name.is_empty() {
            return Err(CompileError::syntax(
                format!("expected a property name, found {}", describe(&first)),
                first.span,
            ));
        }
        Ok(name)
    }

    /// Consumes `#{ ... }` and returns its tokens, braces included.
    pub(crate) fn collect_interpolation(&mut self) -> Result<Vec<Token>> {
        let start = self.advance();
        let mut tokens = vec![start.clone()];
        tokens.extend(self.collect_until(|t| t.is_punct("}")));
        if !self.at_punct("}") {
            return Err(CompileError::syntax(
                "unterminated interpolation, expected '}'",
                start.span,
            ));
        }
        tokens.push(self.advance());
        Ok(tokens)
    }

    fn parse_important(&mut self) -> Result<bool> {
        if !self.peek().is_op("!") {
            return Ok(false);
        }
        let bang = self.advance();
        let flag = self.advance();
        if flag.kind == TokenKind::Identifier && flag.text.eq_ignore_ascii_case("important") {
            Ok(true)
        } else {
            Err(CompileError::syntax(
                format!("expected 'important' after '!', found {}", describe(&flag)),
                bang.span,
            ))
        }
    }

    fn at_statement_end(&self) -> bool {
        let token = self.peek();
        token.is_punct(";") || token.is_punct("}") || token.is_eof()
    }

    fn expect_statement_end(&mut self) -> Result<()> {
        let token = self.peek();
        if token.is_punct(";") {
            self.advance();
            Ok(())
        } else if token.is_punct("}") || token.is_eof() {
            Ok(())
        } else {
            Err(CompileError::syntax(
                format!("expected ';', found {}", describe(token)),
                token.span,
            ))
        }
    }

    fn parse_variable_assignment(&mut self) -> Result<RuleItem> {
        let variable = self.advance();
        if !self.peek().is_punct(":") {
            return Err(CompileError::syntax(
                format!("expected ':' after ${}", variable.name()),
                self.peek().span,
            ));
        }
        self.advance();
        if self.at_statement_end() {
            return Err(CompileError::syntax(
                format!("expected a value for ${}", variable.name()),
                self.peek().span,
            ));
        }

        let value = self.parse_expression()?;
        let mut flags = VarFlags::empty();
        while self.peek().is_op("!") {
            let bang = self.advance();
            let flag = self.advance();
            match flag.text.as_str() {
                "default" => flags |= VarFlags::DEFAULT,
                "global" => flags |= VarFlags::GLOBAL,
                _ => {
                    return Err(CompileError::syntax(
                        format!("unknown flag !{}", flag.text),
                        bang.span,
                    ));
                }
            }
        }
        self.expect_statement_end()?;

        Ok(RuleItem::Directive(Directive::VariableAssignment {
            name: variable.name().to_string(),
            value,
            flags,
            span: variable.span,
        }))
    }

    fn parse_directive(&mut self, in_block: bool) -> Result<RuleItem> {
        let keyword = self.peek().clone();
        let directive = match keyword.name().to_ascii_lowercase().as_str() {
            "mixin" => self.parse_mixin_definition()?,
            "include" => self.parse_mixin_include()?,
            "if" => self.parse_if(in_block)?,
            "else" => {
                return Err(CompileError::syntax("@else without a preceding @if", keyword.span));
            }
            "each" => self.parse_each(in_block)?,
            "for" => self.parse_for(in_block)?,
            "while" => self.parse_while(in_block)?,
            "import" => self.parse_import()?,
            "warn" | "debug" => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect_statement_end()?;
                if keyword.name().eq_ignore_ascii_case("warn") {
                    Directive::Warn(expr)
                } else {
                    Directive::Debug(expr)
                }
            }
            "extend" | "content" | "function" | "return" | "use" | "forward" | "at-root" => {
                return Err(CompileError::syntax(
                    format!("unsupported directive {}", keyword.text),
                    keyword.span,
                ));
            }
            _ => self.parse_at_rule()?,
        };
        Ok(RuleItem::Directive(directive))
    }

    fn parse_mixin_definition(&mut self) -> Result<Directive> {
        let keyword = self.advance();
        let name = self.advance();
        if name.kind != TokenKind::Identifier {
            return Err(CompileError::syntax(
                format!("expected a mixin name, found {}", describe(&name)),
                name.span,
            ));
        }

        let mut params: Vec<Param> = Vec::new();
        if self.at_punct("(") {
            self.advance();
            while !self.at_punct(")") {
                let variable = self.advance();
                if variable.kind != TokenKind::Variable {
                    return Err(CompileError::syntax(
                        format!("malformed parameter list: expected a variable, found {}", describe(&variable)),
                        variable.span,
                    ));
                }
                let default = if self.at_punct(":") {
                    self.advance();
                    Some(self.parse_space_list()?)
                } else {
                    None
                };
                if params.iter().any(|p| p.name == variable.name()) {
                    return Err(CompileError::syntax(
                        format!("duplicate parameter ${}", variable.name()),
                        variable.span,
                    ));
                }
                params.push(Param {
                    name: variable.name().to_string(),
                    default,
                });
                if self.at_punct(",") {
                    self.advance();
                } else if !self.at_punct(")") {
                    let token = self.peek();
                    return Err(CompileError::syntax(
                        format!("malformed parameter list: expected ',' or ')', found {}", describe(token)),
                        token.span,
                    ));
                }
            }
            self.advance();
        }

        let body = self.parse_block()?;
        Ok(Directive::MixinDefinition {
            name: name.text,
            params,
            body,
            span: keyword.span,
        })
    }

    fn parse_mixin_include(&mut self) -> Result<Directive> {
        let keyword = self.advance();
        let name = self.advance();
        if name.kind != TokenKind::Identifier {
            return Err(CompileError::syntax(
                format!("expected a mixin name, found {}", describe(&name)),
                name.span,
            ));
        }

        let mut args = Vec::new();
        if self.at_punct("(") {
            let open = self.advance();
            loop {
                if self.at_punct(")") {
                    break;
                }
                let span = self.peek().span;
                let keyword_name = if self.peek().kind == TokenKind::Variable
                    && self.peek_nth(1).is_punct(":")
                {
                    let variable = self.advance();
                    self.advance();
                    Some(variable.name().to_string())
                } else {
                    None
                };
                let tokens = self.collect_until(|t| t.is_punct(","));
                if tokens.is_empty() {
                    return Err(CompileError::syntax("expected a mixin argument", self.peek().span));
                }
                args.push(MixinArg {
                    name: keyword_name,
                    tokens,
                    span,
                });
                if self.at_punct(",") {
                    self.advance();
                } else {
                    break;
                }
            }
            if !self.at_punct(")") {
                return Err(CompileError::syntax(
                    format!("unclosed '(' in @include opened on line {}", open.span.line),
                    self.peek().span,
                ));
            }
            self.advance();
        }
        self.expect_statement_end()?;

        Ok(Directive::MixinInclude {
            name: name.text,
            args,
            span: keyword.span,
        })
    }

    fn parse_if(&mut self, in_block: bool) -> Result<Directive> {
        self.advance();
        let condition = self.parse_expression()?;
        let body = self.parse_control_block(in_block)?;
        let mut branches = vec![(condition, body)];
        let mut otherwise = None;

        while self.peek().kind == TokenKind::AtKeyword && self.peek().name() == "else" {
            self.advance();
            if self.peek().is_ident("if") {
                self.advance();
                let condition = self.parse_expression()?;
                let body = self.parse_control_block(in_block)?;
                branches.push((condition, body));
            } else {
                otherwise = Some(self.parse_control_block(in_block)?);
                break;
            }
        }

        Ok(Directive::Control(Control::If {
            branches,
            otherwise,
        }))
    }

    fn parse_each(&mut self, in_block: bool) -> Result<Directive> {
        let keyword = self.advance();
        let mut variables = Vec::new();
        loop {
            let variable = self.advance();
            if variable.kind != TokenKind::Variable {
                return Err(CompileError::syntax(
                    format!("malformed @each: expected a variable, found {}", describe(&variable)),
                    variable.span,
                ));
            }
            variables.push(variable.name().to_string());
            if self.at_punct(",") {
                self.advance();
            } else {
                break;
            }
        }

        if !self.peek().is_ident("in") {
            return Err(CompileError::syntax(
                format!("malformed @each: expected 'in', found {}", describe(self.peek())),
                self.peek().span,
            ));
        }
        self.advance();
        let list = self.parse_expression()?;
        let body = self.parse_control_block(in_block)?;
        log::trace!("parsed @each at {}", keyword.span);

        Ok(Directive::Control(Control::Each {
            variables,
            list,
            body,
        }))
    }

    fn parse_for(&mut self, in_block: bool) -> Result<Directive> {
        self.advance();
        let variable = self.advance();
        if variable.kind != TokenKind::Variable {
            return Err(CompileError::syntax(
                format!("malformed @for: expected a variable, found {}", describe(&variable)),
                variable.span,
            ));
        }
        if !self.peek().is_ident("from") {
            return Err(CompileError::syntax(
                format!("malformed @for: expected 'from', found {}", describe(self.peek())),
                self.peek().span,
            ));
        }
        self.advance();

        self.stop_words = &["through", "to"];
        let from = self.parse_expression();
        self.stop_words = &[];
        let from = from?;

        let inclusive = match self.peek() {
            t if t.is_ident("through") => true,
            t if t.is_ident("to") => false,
            t => {
                return Err(CompileError::syntax(
                    format!("malformed @for: expected 'through' or 'to', found {}", describe(t)),
                    t.span,
                ));
            }
        };
        self.advance();
        let to = self.parse_expression()?;
        let body = self.parse_control_block(in_block)?;

        Ok(Directive::Control(Control::For {
            variable: variable.name().to_string(),
            from,
            to,
            inclusive,
            body,
        }))
    }

    fn parse_while(&mut self, in_block: bool) -> Result<Directive> {
        self.advance();
        let condition = self.parse_expression()?;
        let body = self.parse_control_block(in_block)?;
        Ok(Directive::Control(Control::While { condition, body }))
    }

    /// Control bodies accept whatever the enclosing body accepts.
    fn parse_control_block(&mut self, in_block: bool) -> Result<Vec<RuleItem>> {
        if !self.at_punct("{") {
            let token = self.peek();
            return Err(CompileError::syntax(
                format!("expected '{{', found {}", describe(token)),
                token.span,
            ));
        }
        let body = self.parse_block()?;
        if !in_block {
            if let Some(RuleItem::Declaration(decl)) = body
                .iter()
                .find(|item| matches!(item, RuleItem::Declaration(_)))
            {
                return Err(CompileError::syntax(
                    "declarations may only be used within style rules",
                    decl.span,
                ));
            }
        }
        Ok(body)
    }

    fn parse_import(&mut self) -> Result<Directive> {
        let keyword = self.peek().clone();
        let start = self.pos;
        self.advance();

        let mut targets = Vec::new();
        let mut plain_css = false;
        loop {
            let token = self.advance();
            match token.kind {
                TokenKind::String => {
                    let (path, _) = token.unquoted();
                    if is_plain_css_import(path) {
                        plain_css = true;
                    }
                    targets.push(ImportTarget {
                        path: path.to_string(),
                        span: token.span,
                    });
                }
                TokenKind::Url => plain_css = true,
                TokenKind::Identifier if token.text.eq_ignore_ascii_case("url") => {
                    plain_css = true;
                    self.collect_until(|t| t.is_punct(",") || t.is_punct(";"));
                }
                _ => {
                    return Err(CompileError::syntax(
                        format!("expected a string after @import, found {}", describe(&token)),
                        token.span,
                    ));
                }
            }
            if self.at_punct(",") {
                self.advance();
                continue;
            }
            if !self.at_statement_end() {
                // A media query list makes this a plain CSS import.
                plain_css = true;
                self.collect_until(|t| t.is_punct(";"));
            }
            break;
        }
        self.expect_statement_end()?;

        if plain_css {
            self.pos = start;
            return self.parse_at_rule();
        }
        log::trace!("@import at {} with {} target(s)", keyword.span, targets.len());
        Ok(Directive::Import { targets })
    }

    fn parse_at_rule(&mut self) -> Result<Directive> {
        let keyword = self.advance();
        let params = self.collect_until(|t| t.is_punct("{") || t.is_punct(";"));
        let body = if self.at_punct("{") {
            Some(self.parse_block()?)
        } else {
            self.expect_statement_end()?;
            None
        };
        Ok(Directive::AtRule {
            name: keyword.name().to_string(),
            params,
            body,
            span: keyword.span,
        })
    }
}

/// `url(...)`, `*.css`, protocol-relative and absolute URLs stay CSS imports.
fn is_plain_css_import(path: &str) -> bool {
    path.ends_with(".css")
        || path.starts_with("http://")
        || path.starts_with("https://")
        || path.starts_with("//")
}

/// Human-readable description of a token for error messages.
pub(crate) fn describe(token: &Token) -> String {
    if token.is_eof() {
        "end of input".to_string()
    } else {
        format!("'{}'", token.text)
    }
}
