//! Lexer and parser for a small first-order logic language.
//!
//! ```text
//! def f(x, y) forall z, p(x, z) /\ q(y) \/ r
//! ```
//!
//! Characters go through [`parser::lexer::Lexer`], tokens through
//! [`parser::Parser`], and every top-level `def` comes out as an
//! [`ir::ast::Function`]. [`driver::Driver`] runs the prompt loop on top of
//! that.

pub mod driver;
pub mod error;
pub mod ir;
pub mod parser;
pub mod span;

pub use error::{Error, ParseError};
pub use parser::{parse_definition, parse_expression};
