//! Error types for SCSS compilation.
//!
//! Every stage of the pipeline reports failures through [`CompileError`].
//! Each variant carries the [`Span`] of the offending source so that the
//! caller can point at the exact line and column.

use std::fmt;
use thiserror::Error;

/// A 1-based source location.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Span {
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// The position of the first character of a source.
    pub const fn start() -> Self {
        Self { line: 1, column: 1 }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Errors that can occur while compiling a stylesheet.
///
/// Compilation is fail-fast: the first error encountered by any pass is
/// returned and no output is produced.
///
/// # Examples
///
/// ```rust
/// use scss::{compile, CompileError, CompileOptions};
///
/// let err = compile("a { width: $missing; }", &CompileOptions::default()).unwrap_err();
/// assert!(matches!(err, CompileError::UndefinedVariable { .. }));
/// assert_eq!(err.line(), 1);
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    /// Invalid character or unterminated literal in the source text.
    #[error("{span}: lex error: {message}")]
    Lex { message: String, span: Span },

    /// Structural parse failure (braces, semicolons, selectors, directives).
    #[error("{span}: syntax error: {message}")]
    Syntax { message: String, span: Span },

    /// A `$variable` was referenced but is not defined in any enclosing scope.
    #[error("{span}: undefined variable: ${name}")]
    UndefinedVariable { name: String, span: Span },

    /// An `@include` named a mixin that is not defined in any enclosing scope.
    #[error("{span}: undefined mixin: {name}")]
    UndefinedMixin { name: String, span: Span },

    /// Unit or type mismatch while evaluating an expression.
    #[error("{span}: type error: {message}")]
    Type { message: String, span: Span },

    /// Wrong number or kind of arguments passed to a function or mixin.
    #[error("{span}: argument error: {message}")]
    Argument { message: String, span: Span },

    /// An `@import` target could not be found on any include path.
    #[error("{span}: file to import not found or unreadable: {path}")]
    ImportNotFound { path: String, span: Span },

    /// A safety bound was exceeded (recursion, nesting or loop limits).
    #[error("{span}: limit exceeded: {message}")]
    InternalLimit { message: String, span: Span },
}

impl CompileError {
    pub fn lex(message: impl Into<String>, span: Span) -> Self {
        Self::Lex {
            message: message.into(),
            span,
        }
    }

    pub fn syntax(message: impl Into<String>, span: Span) -> Self {
        Self::Syntax {
            message: message.into(),
            span,
        }
    }

    pub fn type_error(message: impl Into<String>, span: Span) -> Self {
        Self::Type {
            message: message.into(),
            span,
        }
    }

    pub fn argument(message: impl Into<String>, span: Span) -> Self {
        Self::Argument {
            message: message.into(),
            span,
        }
    }

    pub fn limit(message: impl Into<String>, span: Span) -> Self {
        Self::InternalLimit {
            message: message.into(),
            span,
        }
    }

    /// The source location the error refers to.
    pub fn span(&self) -> Span {
        match self {
            Self::Lex { span, .. }
            | Self::Syntax { span, .. }
            | Self::UndefinedVariable { span, .. }
            | Self::UndefinedMixin { span, .. }
            | Self::Type { span, .. }
            | Self::Argument { span, .. }
            | Self::ImportNotFound { span, .. }
            | Self::InternalLimit { span, .. } => *span,
        }
    }

    /// 1-based line of the error.
    pub fn line(&self) -> usize {
        self.span().line
    }

    /// 1-based column of the error.
    pub fn column(&self) -> usize {
        self.span().column
    }

    /// The error message without the location prefix.
    pub fn message(&self) -> String {
        match self {
            Self::Lex { message, .. }
            | Self::Syntax { message, .. }
            | Self::Type { message, .. }
            | Self::Argument { message, .. }
            | Self::InternalLimit { message, .. } => message.clone(),
            Self::UndefinedVariable { name, .. } => format!("undefined variable: ${name}"),
            Self::UndefinedMixin { name, .. } => format!("undefined mixin: {name}"),
            Self::ImportNotFound { path, .. } => {
                format!("file to import not found or unreadable: {path}")
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, CompileError>;
