//! Compilation entry points and options.
//!
//! [`compile`] runs the passes strictly in order:
//!
//! 1. lex
//! 2. parse
//! 3. resolve selectors
//! 4. evaluate
//! 5. generate
//!
//! The first failing pass ends the compilation; no partial output is returned.

use crate::emitter::{self, OutputStyle};
use crate::error::CompileError;
use crate::eval::Evaluator;
use crate::import::{FsImporter, Importer};
use crate::lexer::Lexer;
use crate::parser;
use std::ffi::OsStr;
use std::path::PathBuf;

/// The CSS text, or the first error.
pub type CompileResult = Result<String, CompileError>;

/// Options for one compilation.
///
/// ```
/// use scss::{CompileOptions, OutputStyle};
///
/// let options = CompileOptions::new()
///     .with_output_style(OutputStyle::Compressed)
///     .with_include_path("styles/partials");
/// assert_eq!(options.output_style(), OutputStyle::Compressed);
/// assert_eq!(options.include_paths().len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileOptions {
    output_style: OutputStyle,
    include_paths: Vec<PathBuf>,
    source_comments: bool,
}

impl CompileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output_style(mut self, style: OutputStyle) -> Self {
        self.output_style = style;
        self
    }

    /// Appends a directory searched by `@import`.
    pub fn with_include_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.include_paths.push(path.into());
        self
    }

    pub fn with_include_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.include_paths.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Appends every directory of a platform path list (`a:b` on Unix, `a;b` on Windows).
    pub fn with_include_path_list(mut self, list: impl AsRef<OsStr>) -> Self {
        self.include_paths.extend(
            std::env::split_paths(list.as_ref()).filter(|path| !path.as_os_str().is_empty()),
        );
        self
    }

    /// Precede each emitted rule with a `/* line N */` comment.
    pub fn with_source_comments(mut self, enabled: bool) -> Self {
        self.source_comments = enabled;
        self
    }

    pub fn output_style(&self) -> OutputStyle {
        self.output_style
    }

    pub fn include_paths(&self) -> &[PathBuf] {
        &self.include_paths
    }

    pub fn source_comments(&self) -> bool {
        self.source_comments
    }
}

/// Compiles SCSS `input` to CSS, reading imports from the filesystem.
///
/// ```
/// use scss::{compile, CompileOptions, OutputStyle};
///
/// let options = CompileOptions::new().with_output_style(OutputStyle::Compact);
/// let css = compile("$c: red; a { b { color: $c; } }", &options).unwrap();
/// assert_eq!(css, "a b { color: red; }\n");
/// ```
pub fn compile(input: &str, options: &CompileOptions) -> CompileResult {
    compile_with_importer(input, options, &FsImporter)
}

/// Compiles SCSS `input` to CSS, reading imports through `importer`.
pub fn compile_with_importer(
    input: &str,
    options: &CompileOptions,
    importer: &dyn Importer,
) -> CompileResult {
    let tokens = Lexer::new(input).collect::<Result<Vec<_>, _>>()?;
    log::debug!("lexed {} bytes into {} tokens", input.len(), tokens.len());

    let mut document = parser::parse(tokens)?;
    log::debug!("parsed {} top-level items", document.items.len());

    parser::resolve_selectors(&mut document)?;
    log::debug!("resolved selectors");

    let tree = Evaluator::new(options, importer).evaluate(&document)?;
    log::debug!("evaluated into {} output nodes", tree.nodes.len());

    let css = emitter::render(&tree, options.output_style());
    log::debug!(
        "generated {} bytes of {} output",
        css.len(),
        options.output_style()
    );
    Ok(css)
}
