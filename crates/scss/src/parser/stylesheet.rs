//! Document tree produced by the parser.
//!
//! The tree is purely syntactic. Selectors keep their raw text (including
//! any `#{...}` interpolation), values are unevaluated [`Expr`]s and mixin
//! arguments are captured as token runs. Nothing is resolved until the
//! evaluator walks the tree.

use crate::error::Span;
use crate::lexer::Token;
use crate::types::{Color, ListSeparator};
use bitflags::bitflags;

/// A whole source file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Document {
    pub items: Vec<RuleItem>,
}

impl Document {
    /// Top-level style rules, in source order.
    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.items.iter().filter_map(|item| match item {
            RuleItem::NestedRule(rule) => Some(rule),
            _ => None,
        })
    }
}

/// An item in a rule body (or at the top level of a document).
#[derive(Clone, Debug, PartialEq)]
pub enum RuleItem {
    Declaration(Declaration),
    NestedRule(Rule),
    Directive(Directive),
    /// A `/* ... */` comment at statement position, text includes the delimiters.
    Comment(String, Span),
}

/// A style rule: `selector, selector { body }`.
#[derive(Clone, Debug, PartialEq)]
pub struct Rule {
    /// Comma-separated selector fragments exactly as written (normalised whitespace).
    pub selectors: Vec<String>,
    /// Fully qualified selectors, filled in by [`resolve_selectors`](super::flatten::resolve_selectors).
    pub resolved: Vec<String>,
    pub body: Vec<RuleItem>,
    pub span: Span,
}

impl Rule {
    pub fn new(selectors: Vec<String>, body: Vec<RuleItem>, span: Span) -> Self {
        Self {
            selectors,
            resolved: Vec::new(),
            body,
            span,
        }
    }

    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.body.iter().filter_map(|item| match item {
            RuleItem::Declaration(decl) => Some(decl),
            _ => None,
        })
    }

    pub fn nested_rules(&self) -> impl Iterator<Item = &Rule> {
        self.body.iter().filter_map(|item| match item {
            RuleItem::NestedRule(rule) => Some(rule),
            _ => None,
        })
    }
}

/// `property: value [!important];`
#[derive(Clone, Debug, PartialEq)]
pub struct Declaration {
    /// Property name as written; may contain `#{...}`.
    pub property: String,
    pub value: Expr,
    pub important: bool,
    pub span: Span,
}

bitflags! {
    /// Flags trailing a variable assignment.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct VarFlags: u8 {
        /// `!default`: assign only when not yet defined.
        const DEFAULT = 1 << 0;
        /// `!global`: assign in the root frame.
        const GLOBAL = 1 << 1;
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ImportTarget {
    pub path: String,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub name: String,
    pub default: Option<Expr>,
}

/// An `@include` argument, kept as tokens until the mixin is expanded.
#[derive(Clone, Debug, PartialEq)]
pub struct MixinArg {
    /// Set for keyword arguments (`$name: value`).
    pub name: Option<String>,
    pub tokens: Vec<Token>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Control {
    If {
        branches: Vec<(Expr, Vec<RuleItem>)>,
        otherwise: Option<Vec<RuleItem>>,
    },
    Each {
        variables: Vec<String>,
        list: Expr,
        body: Vec<RuleItem>,
    },
    For {
        variable: String,
        from: Expr,
        to: Expr,
        /// `through` includes the end value, `to` excludes it.
        inclusive: bool,
        body: Vec<RuleItem>,
    },
    While {
        condition: Expr,
        body: Vec<RuleItem>,
    },
}

impl Control {
    /// Every nested body, in source order.
    pub fn bodies_mut(&mut self) -> Vec<&mut Vec<RuleItem>> {
        match self {
            Self::If {
                branches,
                otherwise,
            } => branches
                .iter_mut()
                .map(|(_, body)| body)
                .chain(otherwise.iter_mut())
                .collect(),
            Self::Each { body, .. } | Self::For { body, .. } | Self::While { body, .. } => {
                vec![body]
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Directive {
    VariableAssignment {
        name: String,
        value: Expr,
        flags: VarFlags,
        span: Span,
    },
    Import {
        targets: Vec<ImportTarget>,
    },
    MixinDefinition {
        name: String,
        params: Vec<Param>,
        body: Vec<RuleItem>,
        span: Span,
    },
    MixinInclude {
        name: String,
        args: Vec<MixinArg>,
        span: Span,
    },
    Control(Control),
    /// A CSS at-rule passed through to the output (`@media`, `@font-face`, ...).
    AtRule {
        name: String,
        params: Vec<Token>,
        body: Option<Vec<RuleItem>>,
        span: Span,
    },
    Warn(Expr),
    Debug(Expr),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Rem => "%",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::And => "and",
            Self::Or => "or",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Plus,
    Not,
}

/// A function call argument.
#[derive(Clone, Debug, PartialEq)]
pub struct CallArg {
    pub name: Option<String>,
    pub value: Expr,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    Number {
        value: f64,
        unit: Option<String>,
    },
    Color(Color),
    /// Identifiers and quoted strings. Text may contain `#{...}`.
    String {
        text: String,
        quote: Option<char>,
    },
    Boolean(bool),
    Variable(String),
    /// A left-associative run of one precedence level, `a + b - c`, kept flat
    /// so that long chains never nest.
    Binary {
        first: Box<Expr>,
        rest: Vec<(BinaryOp, Expr)>,
        /// `12px/1.5` outside parentheses: printed as written unless used in arithmetic.
        slash_literal: bool,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Call {
        name: String,
        args: Vec<CallArg>,
    },
    List {
        items: Vec<Expr>,
        separator: ListSeparator,
    },
    Group(Box<Expr>),
    Interpolation(Box<Expr>),
    /// Adjacent pieces with no whitespace between them, e.g. `#{$side}-width`.
    Concat(Vec<Expr>),
    /// Verbatim text such as `calc(100% - 10px)`; may contain `#{...}`.
    Raw(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn is_number_literal(&self) -> bool {
        match &self.kind {
            ExprKind::Number { .. } => true,
            ExprKind::Binary {
                slash_literal: true,
                ..
            } => true,
            _ => false,
        }
    }
}
