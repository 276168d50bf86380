use log::debug;

use crate::error::{ParseError, ParseResult};
use crate::ir::ast::{BinaryOperator, Expression, Function, Prototype};
use crate::span::Span;
use super::lexer::{Lexer, Token};
use super::precedence::PrecedenceTable;

/// Deepest nesting of primary expressions (parentheses, call arguments,
/// quantifier bodies) before the parser gives up.
pub const MAX_DEPTH: usize = 256;

/// Recursive descent parser with precedence climbing for `/\` and `\/`.
///
/// The parser pulls tokens from the lexer on demand and always holds exactly
/// one of them, the current token. Every `parse_*` method starts at the
/// current token and leaves the parser on the first token it did not use.
pub struct Parser<I: Iterator<Item = char>> {
    lexer: Lexer<I>,
    current: Token,
    span: Span,
    precedence: PrecedenceTable,
    depth: usize,
}

impl<I: Iterator<Item = char>> Parser<I> {
    /// Nothing is read until the first [`Parser::next_token`] call, so a
    /// prompt can be printed before the input blocks.
    pub fn new(lexer: Lexer<I>, precedence: PrecedenceTable) -> Self {
        Self {
            lexer,
            current: Token::Char(' '),
            span: Span::default(),
            precedence,
            depth: 0,
        }
    }

    pub fn current(&self) -> &Token {
        &self.current
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn next_token(&mut self) -> &Token {
        self.current = self.lexer.next_token();
        self.span = self.lexer.token_start();
        &self.current
    }

    fn is_char(&self, ch: char) -> bool {
        self.current == Token::Char(ch)
    }

    fn pending_binop(&self) -> Option<(BinaryOperator, i32)> {
        match self.current {
            Token::Binop(op) => Some((op, self.precedence.get(op))),
            _ => None,
        }
    }

    /// Precedence of the current token, -1 if it is not a binary operator.
    pub fn token_precedence(&self) -> i32 {
        self.pending_binop().map_or(-1, |(_, prec)| prec)
    }

    /// primary ::= quantifierexpr | identifierexpr | parenexpr
    pub fn parse_primary(&mut self) -> ParseResult<Expression> {
        if self.depth >= MAX_DEPTH {
            return Err(ParseError::TooDeep {
                span: self.span,
                limit: MAX_DEPTH,
            });
        }

        self.depth += 1;
        let result = match self.current {
            Token::Quantifier(_) => self.parse_quantifier_expr(),
            Token::Identifier(_) => self.parse_identifier_expr(),
            Token::Char('(') => self.parse_paren_expr(),
            _ => Err(ParseError::UnknownToken {
                span: self.span,
                found: self.current.clone(),
            }),
        };
        self.depth -= 1;
        result
    }

    /// parenexpr ::= '(' expression ')'
    pub fn parse_paren_expr(&mut self) -> ParseResult<Expression> {
        self.next_token(); // eat (
        let expr = self.parse_expression()?;

        if !self.is_char(')') {
            return Err(ParseError::UnclosedParen { span: self.span });
        }
        self.next_token(); // eat )
        Ok(expr)
    }

    /// identifierexpr ::= identifier | identifier '(' (expression (',' expression)*)? ')'
    pub fn parse_identifier_expr(&mut self) -> ParseResult<Expression> {
        let name = match self.next_token_taking_identifier() {
            Some(name) => name,
            None => {
                return Err(ParseError::UnknownToken {
                    span: self.span,
                    found: self.current.clone(),
                });
            }
        };

        if !self.is_char('(') {
            return Ok(Expression::Variable(name));
        }

        self.next_token(); // eat (
        let mut args = Vec::new();
        if !self.is_char(')') {
            loop {
                args.push(self.parse_expression()?);

                if self.is_char(')') {
                    break;
                }
                if !self.is_char(',') {
                    return Err(ParseError::BadArgumentList { span: self.span });
                }
                self.next_token(); // eat ,
            }
        }
        self.next_token(); // eat )

        Ok(Expression::Call { callee: name, args })
    }

    /// quantifierexpr ::= ('forall' | 'exists') identifier ',' expression
    pub fn parse_quantifier_expr(&mut self) -> ParseResult<Expression> {
        let Token::Quantifier(quantifier) = self.current else {
            return Err(ParseError::UnknownToken {
                span: self.span,
                found: self.current.clone(),
            });
        };
        self.next_token(); // eat forall / exists

        let Some(variable) = self.next_token_taking_identifier() else {
            return Err(ParseError::MissingBoundVariable { span: self.span });
        };

        if !self.is_char(',') {
            return Err(ParseError::MissingQuantifierComma { span: self.span });
        }
        self.next_token(); // eat ,

        let body = self.parse_expression()?;
        Ok(Expression::Quantified {
            quantifier,
            variable,
            body: Box::new(body),
        })
    }

    /// expression ::= primary (binop primary)*
    pub fn parse_expression(&mut self) -> ParseResult<Expression> {
        let lhs = self.parse_primary()?;
        self.parse_binop_rhs(0, lhs)
    }

    /// Folds `(binop primary)*` into `lhs`, consuming only operators whose
    /// precedence is at least `min_precedence`. Equal precedences group to
    /// the left.
    pub fn parse_binop_rhs(&mut self, min_precedence: i32, mut lhs: Expression) -> ParseResult<Expression> {
        loop {
            let Some((op, precedence)) = self.pending_binop() else {
                return Ok(lhs);
            };
            if precedence < min_precedence {
                return Ok(lhs);
            }
            self.next_token(); // eat binop

            let mut rhs = self.parse_primary()?;

            // A tighter operator after rhs takes rhs as its own left operand.
            if precedence < self.token_precedence() {
                rhs = self.parse_binop_rhs(precedence + 1, rhs)?;
            }

            lhs = Expression::Binary {
                op,
                left: Box::new(lhs),
                right: Box::new(rhs),
            };
        }
    }

    /// prototype ::= identifier '(' (identifier (',' identifier)*)? ')'
    pub fn parse_prototype(&mut self) -> ParseResult<Prototype> {
        let Some(name) = self.next_token_taking_identifier() else {
            return Err(ParseError::MissingFunctionName { span: self.span });
        };

        if !self.is_char('(') {
            return Err(ParseError::MissingPrototypeOpen { span: self.span });
        }
        self.next_token(); // eat (

        let mut params = Vec::new();
        if let Some(param) = self.next_token_taking_identifier() {
            params.push(param);
            while self.is_char(',') {
                self.next_token(); // eat ,
                let Some(param) = self.next_token_taking_identifier() else {
                    return Err(ParseError::MissingParameter { span: self.span });
                };
                params.push(param);
            }
        }

        if !self.is_char(')') {
            return Err(ParseError::MissingPrototypeClose { span: self.span });
        }
        self.next_token(); // eat )

        debug!("parsed prototype {}({})", name, params.join(", "));
        Ok(Prototype { name, params })
    }

    /// definition ::= 'def' prototype expression
    pub fn parse_definition(&mut self) -> ParseResult<Function> {
        self.next_token(); // eat def
        let prototype = self.parse_prototype()?;
        let body = self.parse_expression()?;

        debug!("parsed definition of {}", prototype.name);
        Ok(Function { prototype, body })
    }

    /// If the current token is an identifier, takes its text and advances.
    fn next_token_taking_identifier(&mut self) -> Option<String> {
        let Token::Identifier(name) = &mut self.current else {
            return None;
        };
        let name = std::mem::take(name);
        self.next_token();
        Some(name)
    }
}
