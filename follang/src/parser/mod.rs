pub mod lexer;
pub mod parser;
pub mod precedence;

use crate::error::{ParseError, ParseResult};
use crate::ir::ast;
use lexer::{Lexer, Token};
use precedence::PrecedenceTable;

pub use parser::Parser;

/// Parses a whole string as one expression with the default precedences.
pub fn parse_expression(source: &str) -> ParseResult<ast::Expression> {
    parse_expression_with(source, PrecedenceTable::default())
}

pub fn parse_expression_with(source: &str, precedence: PrecedenceTable) -> ParseResult<ast::Expression> {
    let mut parser = primed(source, precedence);
    let expr = parser.parse_expression()?;
    finish(&parser)?;
    Ok(expr)
}

/// Parses a whole string as one `def` with the default precedences.
pub fn parse_definition(source: &str) -> ParseResult<ast::Function> {
    parse_definition_with(source, PrecedenceTable::default())
}

pub fn parse_definition_with(source: &str, precedence: PrecedenceTable) -> ParseResult<ast::Function> {
    let mut parser = primed(source, precedence);
    let function = parser.parse_definition()?;
    finish(&parser)?;
    Ok(function)
}

fn primed(source: &str, precedence: PrecedenceTable) -> Parser<std::str::Chars<'_>> {
    let mut parser = Parser::new(Lexer::new(source.chars()), precedence);
    parser.next_token();
    parser
}

fn finish<I: Iterator<Item = char>>(parser: &Parser<I>) -> ParseResult<()> {
    match parser.current() {
        Token::Eof => Ok(()),
        found => Err(ParseError::TrailingInput {
            span: parser.span(),
            found: found.clone(),
        }),
    }
}
