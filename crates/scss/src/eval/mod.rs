//! Evaluation of a resolved [`Document`] into a flat [`CssTree`].
//!
//! The walk follows source order. Each style rule opens a new [`Scope`]
//! frame, collects its declarations and pushes its nested output after
//! itself, so the tree that comes out is already in emission order:
//!
//! ```scss
//! a {
//!     color: red;
//!     b { color: blue; }
//!     @media print { color: black; }
//! }
//! ```
//!
//! becomes the rules `a`, `a b` and a `@media print` block wrapping `a`.
//!
//! ## Submodules
//!
//! - [`expr`]: expression evaluation and `#{}` interpolation
//! - [`functions`]: built-in functions
//! - [`scope`]: the variable and mixin environment

pub mod expr;
pub mod functions;
pub mod scope;

pub use expr::{evaluate, interpolate};
pub use scope::{Mixin, Scope};

use crate::context::CompileOptions;
use crate::error::{CompileError, Result, Span};
use crate::import::{self, Importer};
use crate::lexer::{Lexer, Token, TokenKind};
use crate::parser::{
    self, Control, Declaration, Directive, Document, Expr, ImportTarget, MixinArg, Rule, RuleItem,
    VarFlags,
};
use crate::types::Value;
use crate::types::number::{format_number, is_integer};
use std::path::PathBuf;
use std::rc::Rc;

/// Maximum nesting of `@include` expansions.
pub const MAX_INCLUDE_DEPTH: usize = 100;

/// Maximum iterations of a single `@while` or `@for` loop.
pub const MAX_LOOP_ITERATIONS: usize = 100_000;

/// Maximum nesting of `@import`.
pub const MAX_IMPORT_DEPTH: usize = 64;

/// Evaluated output, ready for the [`emitter`](crate::emitter).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CssTree {
    pub nodes: Vec<CssNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CssNode {
    Rule(CssRule),
    AtRule(CssAtRule),
    Comment(CssComment),
}

impl CssNode {
    /// Number of enclosing rules that produced output.
    pub fn depth(&self) -> usize {
        match self {
            Self::Rule(rule) => rule.depth,
            Self::AtRule(at_rule) => at_rule.depth,
            Self::Comment(comment) => comment.depth,
        }
    }

    fn shift(&mut self, delta: isize) {
        match self {
            Self::Rule(rule) => rule.depth = rule.depth.saturating_add_signed(delta),
            Self::Comment(comment) => comment.depth = comment.depth.saturating_add_signed(delta),
            Self::AtRule(at_rule) => {
                at_rule.depth = at_rule.depth.saturating_add_signed(delta);
                for child in &mut at_rule.children {
                    child.shift(delta);
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CssRule {
    pub selectors: Vec<String>,
    pub items: Vec<CssItem>,
    pub depth: usize,
}

/// A CSS at-rule. `items` holds declarations written directly in the block
/// (`@font-face`), `children` the rules inside it (`@media`).
#[derive(Debug, Clone, PartialEq)]
pub struct CssAtRule {
    pub name: String,
    pub params: String,
    pub items: Vec<CssItem>,
    pub children: Vec<CssNode>,
    pub has_block: bool,
    pub depth: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CssComment {
    pub text: String,
    pub depth: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CssItem {
    Declaration(CssDeclaration),
    Comment(String),
}

impl CssItem {
    pub fn is_declaration(&self) -> bool {
        matches!(self, Self::Declaration(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CssDeclaration {
    pub property: String,
    pub value: Value,
    pub important: bool,
}

/// Where evaluation currently is.
#[derive(Debug, Clone)]
struct Context {
    /// Selectors of the innermost style rule; `None` outside any rule.
    selectors: Option<Vec<String>>,
    /// Depth given to rules produced here.
    depth: usize,
    /// Inside an at-rule such as `@font-face` whose body is a declaration list.
    declaration_block: bool,
}

impl Context {
    fn root() -> Self {
        Self {
            selectors: None,
            depth: 0,
            declaration_block: false,
        }
    }

    fn accepts_declarations(&self) -> bool {
        self.selectors.is_some() || self.declaration_block
    }
}

/// Output collected for one block.
#[derive(Debug, Default)]
struct Output {
    items: Vec<CssItem>,
    nodes: Vec<CssNode>,
}

/// Walks a document and produces its [`CssTree`].
pub struct Evaluator<'a> {
    options: &'a CompileOptions,
    importer: &'a dyn Importer,
    include_depth: usize,
    import_stack: Vec<PathBuf>,
}

impl<'a> Evaluator<'a> {
    pub fn new(options: &'a CompileOptions, importer: &'a dyn Importer) -> Self {
        Self {
            options,
            importer,
            include_depth: 0,
            import_stack: Vec::new(),
        }
    }

    /// Evaluates `document` in a fresh global scope.
    pub fn evaluate(&mut self, document: &Document) -> Result<CssTree> {
        let scope = Scope::root();
        let mut out = Output::default();
        self.eval_items(&document.items, &scope, &Context::root(), &mut out)?;
        Ok(CssTree { nodes: out.nodes })
    }

    fn eval_items(
        &mut self,
        items: &[RuleItem],
        scope: &Rc<Scope>,
        ctx: &Context,
        out: &mut Output,
    ) -> Result<()> {
        for item in items {
            match item {
                RuleItem::Declaration(decl) => self.eval_declaration(decl, scope, ctx, out)?,
                RuleItem::NestedRule(rule) => self.eval_rule(rule, scope, ctx, out)?,
                RuleItem::Directive(directive) => {
                    self.eval_directive(directive, scope, ctx, out)?
                }
                RuleItem::Comment(text, span) => {
                    let text = if text.contains("#{") {
                        interpolate(text, scope, *span)?
                    } else {
                        text.clone()
                    };
                    if ctx.accepts_declarations() {
                        out.items.push(CssItem::Comment(text));
                    } else {
                        out.nodes.push(CssNode::Comment(CssComment {
                            text,
                            depth: ctx.depth,
                        }));
                    }
                }
            }
        }
        Ok(())
    }

    fn eval_declaration(
        &mut self,
        decl: &Declaration,
        scope: &Rc<Scope>,
        ctx: &Context,
        out: &mut Output,
    ) -> Result<()> {
        if !ctx.accepts_declarations() {
            return Err(CompileError::syntax(
                "declarations may only be used within style rules",
                decl.span,
            ));
        }
        let property = interpolate(&decl.property, scope, decl.span)?;
        let value = evaluate(&decl.value, scope)?;
        // `prop: ()` has nothing to print.
        if value.to_css(false).is_empty() {
            return Ok(());
        }
        out.items.push(CssItem::Declaration(CssDeclaration {
            property,
            value,
            important: decl.important,
        }));
        Ok(())
    }

    fn eval_rule(
        &mut self,
        rule: &Rule,
        scope: &Rc<Scope>,
        ctx: &Context,
        out: &mut Output,
    ) -> Result<()> {
        let frame = Scope::child(scope);
        let selectors = if rule.resolved.iter().any(|s| s.contains("#{")) {
            interpolated_selectors(rule, &frame, ctx.selectors.as_deref())?
        } else {
            rule.resolved.clone()
        };

        let inner_ctx = Context {
            selectors: Some(selectors.clone()),
            depth: ctx.depth + 1,
            declaration_block: false,
        };
        let mut inner = Output::default();
        self.eval_items(&rule.body, &frame, &inner_ctx, &mut inner)?;

        if inner.items.iter().any(CssItem::is_declaration) {
            if self.options.source_comments() {
                out.nodes.push(CssNode::Comment(CssComment {
                    text: format!("/* line {} */", rule.span.line),
                    depth: ctx.depth,
                }));
            }
            out.nodes.push(CssNode::Rule(CssRule {
                selectors,
                items: inner.items,
                depth: ctx.depth,
            }));
        } else {
            for node in &mut inner.nodes {
                node.shift(-1);
            }
        }
        out.nodes.extend(inner.nodes);
        Ok(())
    }

    fn eval_directive(
        &mut self,
        directive: &Directive,
        scope: &Rc<Scope>,
        ctx: &Context,
        out: &mut Output,
    ) -> Result<()> {
        match directive {
            Directive::VariableAssignment {
                name, value, flags, ..
            } => {
                let global = flags.contains(VarFlags::GLOBAL);
                if flags.contains(VarFlags::DEFAULT) {
                    let defined = if global {
                        scope.is_defined_globally(name)
                    } else {
                        scope.is_defined(name)
                    };
                    if defined {
                        return Ok(());
                    }
                }
                let value = evaluate(value, scope)?;
                if global {
                    scope.define_global(name, value);
                } else {
                    scope.define(name, value);
                }
            }
            Directive::Import { targets } => {
                for target in targets {
                    self.import(target, scope, ctx, out)?;
                }
            }
            Directive::MixinDefinition {
                name, params, body, ..
            } => scope.define_mixin(Mixin {
                name: name.clone(),
                params: params.clone(),
                body: body.clone(),
                scope: Rc::downgrade(scope),
            }),
            Directive::MixinInclude { name, args, span } => {
                self.include(name, args, *span, scope, ctx, out)?
            }
            Directive::Control(control) => self.eval_control(control, scope, ctx, out)?,
            Directive::AtRule {
                name,
                params,
                body,
                span,
            } => self.eval_at_rule(name, params, body.as_deref(), *span, scope, ctx, out)?,
            Directive::Warn(expr) => {
                let message = evaluate(expr, scope)?.unquoted_text();
                log::warn!("WARNING: {message} (line {})", expr.span.line);
            }
            Directive::Debug(expr) => {
                let message = evaluate(expr, scope)?.unquoted_text();
                log::debug!("{}: DEBUG: {message}", expr.span);
            }
        }
        Ok(())
    }

    // ==================== MIXINS ====================

    fn include(
        &mut self,
        name: &str,
        args: &[MixinArg],
        span: Span,
        scope: &Rc<Scope>,
        ctx: &Context,
        out: &mut Output,
    ) -> Result<()> {
        let undefined = || CompileError::UndefinedMixin {
            name: name.to_string(),
            span,
        };
        let mixin = scope.resolve_mixin(name).ok_or_else(undefined)?;
        if self.include_depth >= MAX_INCLUDE_DEPTH {
            return Err(CompileError::limit(
                format!("mixin '{name}' is nested more than {MAX_INCLUDE_DEPTH} levels deep"),
                span,
            ));
        }
        let definition = mixin.scope.upgrade().ok_or_else(undefined)?;

        let frame = Scope::child(&definition);
        bind_arguments(&mixin, args, span, scope, &frame)?;

        let mut body = mixin.body.clone();
        parser::resolve_items(&mut body, ctx.selectors.as_deref().unwrap_or_default())?;
        log::trace!("expanding mixin {name} at {span}, depth {}", self.include_depth);

        self.include_depth += 1;
        let result = self.eval_items(&body, &frame, ctx, out);
        self.include_depth -= 1;
        result
    }

    // ==================== CONTROL FLOW ====================

    fn eval_control(
        &mut self,
        control: &Control,
        scope: &Rc<Scope>,
        ctx: &Context,
        out: &mut Output,
    ) -> Result<()> {
        match control {
            Control::If {
                branches,
                otherwise,
            } => {
                for (condition, body) in branches {
                    if evaluate(condition, scope)?.is_truthy() {
                        return self.eval_items(body, scope, ctx, out);
                    }
                }
                if let Some(body) = otherwise {
                    self.eval_items(body, scope, ctx, out)?;
                }
            }
            Control::Each {
                variables,
                list,
                body,
            } => {
                for item in evaluate(list, scope)?.as_list() {
                    if let [variable] = variables.as_slice() {
                        scope.define(variable, item);
                    } else {
                        let parts = item.as_list();
                        for (i, variable) in variables.iter().enumerate() {
                            let part = parts.get(i).cloned().unwrap_or_else(|| Value::ident(""));
                            scope.define(variable, part);
                        }
                    }
                    self.eval_items(body, scope, ctx, out)?;
                }
            }
            Control::For {
                variable,
                from,
                to,
                inclusive,
                body,
            } => {
                let (start, from_unit) = loop_bound(from, scope)?;
                let (end, to_unit) = loop_bound(to, scope)?;
                let unit = from_unit.or(to_unit);
                if !inclusive && start == end {
                    return Ok(());
                }
                let step = if start <= end { 1 } else { -1 };
                let last = if *inclusive { end } else { end - step };
                if last.abs_diff(start) >= MAX_LOOP_ITERATIONS as u64 {
                    return Err(CompileError::limit(
                        format!("@for loop runs more than {MAX_LOOP_ITERATIONS} iterations"),
                        from.span,
                    ));
                }

                let mut i = start;
                loop {
                    scope.define(variable, Value::number(i as f64, unit.as_deref()));
                    self.eval_items(body, scope, ctx, out)?;
                    if i == last {
                        break;
                    }
                    i += step;
                }
            }
            Control::While { condition, body } => {
                let mut iterations = 0usize;
                while evaluate(condition, scope)?.is_truthy() {
                    iterations += 1;
                    if iterations > MAX_LOOP_ITERATIONS {
                        return Err(CompileError::limit(
                            format!("@while loop ran more than {MAX_LOOP_ITERATIONS} iterations"),
                            condition.span,
                        ));
                    }
                    self.eval_items(body, scope, ctx, out)?;
                }
            }
        }
        Ok(())
    }

    // ==================== IMPORTS ====================

    fn import(
        &mut self,
        target: &ImportTarget,
        scope: &Rc<Scope>,
        ctx: &Context,
        out: &mut Output,
    ) -> Result<()> {
        let (path, source) =
            import::resolve(&target.path, self.options.include_paths(), self.importer)
                .ok_or_else(|| CompileError::ImportNotFound {
                    path: target.path.clone(),
                    span: target.span,
                })?;
        if self.import_stack.contains(&path) {
            return Err(CompileError::limit(
                format!("import cycle: {} imports itself", path.display()),
                target.span,
            ));
        }
        if self.import_stack.len() >= MAX_IMPORT_DEPTH {
            return Err(CompileError::limit(
                format!("imports nested more than {MAX_IMPORT_DEPTH} levels deep"),
                target.span,
            ));
        }

        let mut document = parser::parse_source(&source)?;
        parser::resolve_items(
            &mut document.items,
            ctx.selectors.as_deref().unwrap_or_default(),
        )?;
        log::trace!(
            "importing {} ({} items) at {}",
            path.display(),
            document.items.len(),
            target.span
        );

        self.import_stack.push(path);
        let result = self.eval_items(&document.items, scope, ctx, out);
        self.import_stack.pop();
        result
    }

    // ==================== AT-RULES ====================

    #[allow(clippy::too_many_arguments)]
    fn eval_at_rule(
        &mut self,
        name: &str,
        params: &[Token],
        body: Option<&[RuleItem]>,
        span: Span,
        scope: &Rc<Scope>,
        ctx: &Context,
        out: &mut Output,
    ) -> Result<()> {
        let params = at_rule_params(params, scope, span)?;
        let Some(body) = body else {
            out.nodes.push(CssNode::AtRule(CssAtRule {
                name: name.to_string(),
                params,
                items: Vec::new(),
                children: Vec::new(),
                has_block: false,
                depth: ctx.depth,
            }));
            return Ok(());
        };

        let frame = Scope::child(scope);
        let inner_ctx = Context {
            selectors: ctx.selectors.clone(),
            depth: ctx.depth + 1,
            declaration_block: ctx.selectors.is_none() && holds_declarations(name),
        };
        let mut inner = Output::default();
        self.eval_items(body, &frame, &inner_ctx, &mut inner)?;

        let mut items = Vec::new();
        let mut children = Vec::new();
        match &ctx.selectors {
            // Bubbled out of a style rule: wrap the declarations in its selectors.
            Some(selectors) => {
                if inner.items.iter().any(CssItem::is_declaration) {
                    children.push(CssNode::Rule(CssRule {
                        selectors: selectors.clone(),
                        items: inner.items,
                        depth: ctx.depth + 1,
                    }));
                    for node in &mut inner.nodes {
                        node.shift(1);
                    }
                }
            }
            None => items = inner.items,
        }
        children.extend(inner.nodes);

        if items.is_empty() && children.is_empty() {
            log::trace!("dropping empty @{name} at {span}");
            return Ok(());
        }
        out.nodes.push(CssNode::AtRule(CssAtRule {
            name: name.to_string(),
            params,
            items,
            children,
            has_block: true,
            depth: ctx.depth,
        }));
        Ok(())
    }
}

/// Interpolates the selectors `rule` was written with and combines them with
/// the evaluated `parents`. An interpolation may produce a whole selector
/// list, so the text is split at commas again.
fn interpolated_selectors(
    rule: &Rule,
    scope: &Rc<Scope>,
    parents: Option<&[String]>,
) -> Result<Vec<String>> {
    let mut fragments = Vec::new();
    for raw in &rule.selectors {
        let text = interpolate(raw, scope, rule.span)?;
        let mut tokens = Lexer::with_origin(&text, rule.span).collect::<Result<Vec<_>>>()?;
        tokens.retain(|t| !t.is_eof() && t.kind != TokenKind::Comment);
        fragments.extend(parser::selectors::parse_selector_list(&tokens, rule.span)?);
    }
    match parents {
        Some(parents) => Ok(parser::combine_selectors(parents, &fragments)),
        None => {
            if let Some(fragment) = fragments.iter().find(|f| f.contains('&')) {
                return Err(CompileError::syntax(
                    format!("top-level selector '{fragment}' may not contain '&'"),
                    rule.span,
                ));
            }
            Ok(fragments)
        }
    }
}

/// At-rules whose body holds declarations directly, vendor prefixed or not.
fn holds_declarations(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    let unprefixed = name
        .strip_prefix('-')
        .and_then(|rest| rest.split_once('-'))
        .map_or(name.as_str(), |(_, rest)| rest);
    matches!(unprefixed, "font-face" | "page" | "viewport")
}

/// Binds `@include` arguments into `frame`.
///
/// Arguments are evaluated in the caller's scope; defaults are evaluated in
/// `frame` so they can refer to earlier parameters.
fn bind_arguments(
    mixin: &Mixin,
    args: &[MixinArg],
    span: Span,
    caller: &Rc<Scope>,
    frame: &Rc<Scope>,
) -> Result<()> {
    let name = &mixin.name;
    let mut positional = Vec::new();
    let mut named: Vec<(String, Value)> = Vec::new();
    for arg in args {
        let expr = parser::parse_expression_tokens(&arg.tokens)?;
        let value = evaluate(&expr, caller)?;
        match &arg.name {
            Some(key) => named.push((key.replace('_', "-"), value)),
            None if !named.is_empty() => {
                return Err(CompileError::argument(
                    "positional arguments must come before keyword arguments",
                    arg.span,
                ));
            }
            None => positional.push(value),
        }
    }

    if positional.len() > mixin.params.len() {
        return Err(CompileError::argument(
            format!(
                "mixin {name} takes {} argument(s) but {} were passed",
                mixin.params.len(),
                positional.len()
            ),
            span,
        ));
    }

    let mut positional = positional.into_iter();
    for param in &mixin.params {
        let key = param.name.replace('_', "-");
        let by_name = named.iter().position(|(n, _)| *n == key);
        let value = match (positional.next(), by_name) {
            (Some(_), Some(_)) => {
                return Err(CompileError::argument(
                    format!("mixin {name}: ${key} was passed both by position and by name"),
                    span,
                ));
            }
            (Some(value), None) => value,
            (None, Some(index)) => named.remove(index).1,
            (None, None) => match &param.default {
                Some(default) => evaluate(default, frame)?,
                None => {
                    return Err(CompileError::argument(
                        format!("mixin {name} is missing argument ${key}"),
                        span,
                    ));
                }
            },
        };
        frame.define(&param.name, value);
    }

    if let Some((key, _)) = named.first() {
        return Err(CompileError::argument(
            format!("mixin {name} has no parameter named ${key}"),
            span,
        ));
    }
    Ok(())
}

/// An integer `@for` bound and its unit.
fn loop_bound(expr: &Expr, scope: &Rc<Scope>) -> Result<(i64, Option<String>)> {
    match evaluate(expr, scope)? {
        Value::Number { value, unit } if is_integer(value) => Ok((value.round() as i64, unit)),
        Value::Number { value, unit } => Err(CompileError::type_error(
            format!(
                "@for bound {}{} is not an integer",
                format_number(value),
                unit.unwrap_or_default()
            ),
            expr.span,
        )),
        other => Err(CompileError::type_error(
            format!("@for bound {} is not a number", other.to_css(false)),
            expr.span,
        )),
    }
}

/// Rebuilds an at-rule prelude, substituting variables and interpolations.
fn at_rule_params(tokens: &[Token], scope: &Rc<Scope>, span: Span) -> Result<String> {
    let mut text = String::new();
    let mut interpolation_depth = 0usize;
    for token in tokens {
        if token.ws_before && !text.is_empty() {
            text.push(' ');
        }
        match token.kind {
            TokenKind::InterpolationStart => interpolation_depth += 1,
            TokenKind::Punctuation if token.text == "}" => {
                interpolation_depth = interpolation_depth.saturating_sub(1)
            }
            TokenKind::Variable if interpolation_depth == 0 => {
                let value = scope.resolve(token.name()).ok_or_else(|| {
                    CompileError::UndefinedVariable {
                        name: token.name().to_string(),
                        span: token.span,
                    }
                })?;
                text.push_str(&value.unquoted_text());
                continue;
            }
            _ => {}
        }
        text.push_str(&token.text);
    }
    interpolate(&text, scope, span)
}
