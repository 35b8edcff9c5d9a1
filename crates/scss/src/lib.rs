//! # SCSS - a Sass stylesheet compiler
//!
//! Compiles the SCSS dialect of Sass into plain CSS. The crate covers the
//! language core:
//!
//! - **Nesting**: nested rules, the `&` parent reference and selector lists
//! - **Variables**: lexically scoped `$variables` with `!default` and `!global`
//! - **Expressions**: unit-checked arithmetic, colours, strings, lists and
//!   built-in functions
//! - **Mixins**: `@mixin` / `@include` with positional, keyword and default arguments
//! - **Control flow**: `@if`, `@each`, `@for` and `@while`
//! - **Imports**: `@import` through include paths and partials
//! - **Output**: nested, expanded, compact and compressed styles
//!
//! ## Quick Start
//!
//! ```rust
//! use scss::{compile, CompileOptions, OutputStyle};
//!
//! let source = r#"
//!     $primary: #336699;
//!
//!     nav {
//!         ul { margin: 0; }
//!         a {
//!             color: $primary;
//!             &:hover { color: lighten($primary, 20%); }
//!         }
//!     }
//! "#;
//!
//! let options = CompileOptions::new().with_output_style(OutputStyle::Expanded);
//! let css = compile(source, &options).expect("valid SCSS");
//! assert!(css.contains("nav a:hover {"));
//! ```
//!
//! ## Pipeline
//!
//! source → [`lexer`] → [`parser`] → [`parser::flatten`] → [`eval`] →
//! [`emitter`] → CSS. [`context`] drives the passes; the first error ends
//! the compilation.
//!
//! ## Not Supported
//!
//! - The indented `.sass` syntax
//! - `@extend`, `@content`, `@function` and `@return`
//! - The `@use` / `@forward` module system
//! - Source maps
//!
//! ## Modules
//!
//! - [`lexer`]: tokens and the lazy [`Lexer`](lexer::Lexer)
//! - [`parser`]: the stylesheet tree and its parser
//! - [`eval`]: scopes, expressions, built-in functions and the tree walk
//! - [`types`]: runtime values, colours and numbers
//! - [`emitter`]: CSS text generation
//! - [`import`]: import resolution
//! - [`context`]: options and entry points
//! - [`error`]: error types

pub mod context;
pub mod emitter;
pub mod error;
pub mod eval;
pub mod import;
pub mod lexer;
pub mod parser;
pub mod types;

pub use context::{CompileOptions, CompileResult, compile, compile_with_importer};
pub use emitter::OutputStyle;
pub use error::{CompileError, Span};
pub use import::{FsImporter, Importer, MemoryImporter};
