//! Runtime value model: numbers with units, colours, strings, booleans and lists.

pub mod color;
pub mod number;
pub mod value;

pub use color::Color;
pub use value::{ListSeparator, Value, ValueError};
