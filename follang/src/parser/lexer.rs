use std::fmt;

use log::trace;

use crate::ir::ast::{BinaryOperator, Quantifier};
use crate::span::Span;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Eof,
    // keywords
    Def,
    Quantifier(Quantifier), // forall, exists
    // operators
    Binop(BinaryOperator), // /\, \/
    Identifier(String),
    /// Any other character: ( ) , ; and whatever the parser has to reject
    Char(char),
}

impl Token {
    fn from_word(word: String) -> Self {
        match word.as_str() {
            "forall" => Token::Quantifier(Quantifier::Universal),
            "exists" => Token::Quantifier(Quantifier::Existential),
            "def" => Token::Def,
            _ => Token::Identifier(word),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Eof => f.write_str("end of input"),
            Token::Def => f.write_str("'def'"),
            Token::Quantifier(q) => write!(f, "'{}'", q),
            Token::Binop(op) => write!(f, "'{}'", op),
            Token::Identifier(name) => write!(f, "identifier '{}'", name),
            Token::Char(ch) => write!(f, "{:?}", ch),
        }
    }
}

/// Turns a character stream into tokens, one at a time.
///
/// The only state carried between calls is one character of lookahead,
/// `last_char` (`None` once the stream is exhausted), plus the position of
/// that character. Characters are pulled from the source lazily, so a lexer
/// over stdin blocks only when it actually needs the next character.
pub struct Lexer<I: Iterator<Item = char>> {
    chars: I,
    last_char: Option<char>,
    position: Span,
    token_start: Span,
}

impl<I: Iterator<Item = char>> Lexer<I> {
    pub fn new(chars: I) -> Self {
        Self {
            chars,
            // Stands in front of the first real character, which lands on column 1.
            last_char: Some(' '),
            position: Span::new(1, 0),
            token_start: Span::default(),
        }
    }

    /// Where the most recently returned token started.
    pub fn token_start(&self) -> Span {
        self.token_start
    }

    fn bump(&mut self) {
        if let Some(ch) = self.last_char {
            self.position = self.position.advance(ch);
        }
        self.last_char = self.chars.next();
    }

    pub fn next_token(&mut self) -> Token {
        while self.last_char.is_some_and(is_space) {
            self.bump();
        }
        self.token_start = self.position;

        // End of input is never consumed, so every later call lands here again.
        let Some(this_char) = self.last_char else {
            trace!("{}: end of input", self.token_start);
            return Token::Eof;
        };

        let token = if this_char.is_ascii_alphabetic() {
            self.lex_word(this_char)
        } else {
            self.bump();
            match (this_char, self.last_char) {
                ('/', Some('\\')) => {
                    self.last_char = Some(' ');
                    Token::Binop(BinaryOperator::And)
                }
                ('\\', Some('/')) => {
                    self.last_char = Some(' ');
                    Token::Binop(BinaryOperator::Or)
                }
                _ => Token::Char(this_char),
            }
        };

        trace!("{}: {}", self.token_start, token);
        token
    }

    // [a-zA-Z][a-zA-Z0-9]*
    fn lex_word(&mut self, first: char) -> Token {
        let mut word = String::from(first);
        self.bump();
        while let Some(ch) = self.last_char.filter(char::is_ascii_alphanumeric) {
            word.push(ch);
            self.bump();
        }
        Token::from_word(word)
    }
}

// Same class as C isspace: ASCII whitespace plus vertical tab.
fn is_space(ch: char) -> bool {
    ch.is_ascii_whitespace() || ch == '\x0B'
}

/// Lexes the whole string; the last token is always [`Token::Eof`].
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(source.chars());
    let mut tokens = Vec::new();

    loop {
        let token = lexer.next_token();
        let done = token == Token::Eof;
        tokens.push(token);
        if done {
            break;
        }
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(name: &str) -> Token {
        Token::Identifier(name.to_string())
    }

    #[test]
    fn keywords_and_identifiers() {
        assert_eq!(
            tokenize("def forall exists definitely x1 Forall"),
            vec![
                Token::Def,
                Token::Quantifier(Quantifier::Universal),
                Token::Quantifier(Quantifier::Existential),
                ident("definitely"),
                ident("x1"),
                ident("Forall"),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn operators_need_both_glyphs() {
        assert_eq!(
            tokenize("a /\\ b \\/ c"),
            vec![
                ident("a"),
                Token::Binop(BinaryOperator::And),
                ident("b"),
                Token::Binop(BinaryOperator::Or),
                ident("c"),
                Token::Eof,
            ]
        );
        assert_eq!(
            tokenize("a/ b"),
            vec![ident("a"), Token::Char('/'), ident("b"), Token::Eof]
        );
        assert_eq!(
            tokenize("a\\\\b"),
            vec![ident("a"), Token::Char('\\'), Token::Char('\\'), ident("b"), Token::Eof]
        );
    }

    #[test]
    fn operators_without_spaces() {
        assert_eq!(
            tokenize("p/\\q\\/r"),
            vec![
                ident("p"),
                Token::Binop(BinaryOperator::And),
                ident("q"),
                Token::Binop(BinaryOperator::Or),
                ident("r"),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn punctuation_passes_through() {
        assert_eq!(
            tokenize("f(x, 1);"),
            vec![
                ident("f"),
                Token::Char('('),
                ident("x"),
                Token::Char(','),
                Token::Char('1'),
                Token::Char(')'),
                Token::Char(';'),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn underscore_ends_identifier() {
        assert_eq!(
            tokenize("a_b"),
            vec![ident("a"), Token::Char('_'), ident("b"), Token::Eof]
        );
    }

    #[test]
    fn vertical_tab_is_whitespace() {
        assert_eq!(
            tokenize("a\x0B b\t\x0Cc"),
            vec![ident("a"), ident("b"), ident("c"), Token::Eof]
        );
    }

    #[test]
    fn eof_is_sticky() {
        let mut lexer = Lexer::new("  ".chars());
        assert_eq!(lexer.next_token(), Token::Eof);
        assert_eq!(lexer.next_token(), Token::Eof);
    }

    #[test]
    fn tracks_token_positions() {
        let mut lexer = Lexer::new("def f(x)\n  x /\\ y".chars());
        let mut starts = Vec::new();
        while lexer.next_token() != Token::Eof {
            starts.push(lexer.token_start());
        }
        assert_eq!(
            starts,
            vec![
                Span::new(1, 1),
                Span::new(1, 5),
                Span::new(1, 6),
                Span::new(1, 7),
                Span::new(1, 8),
                Span::new(2, 3),
                Span::new(2, 5),
                Span::new(2, 8),
            ]
        );
    }
}
