use thiserror::Error;

use crate::parser::lexer::Token;
use crate::span::Span;

pub type ParseResult<T> = Result<T, ParseError>;

/// Grammar violations. Every variant is raised at exactly one place in the
/// parser and remembers where the offending token started.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("{span}: unknown token when expecting an expression, found {found}")]
    UnknownToken { span: Span, found: Token },

    #[error("{span}: expected ')'")]
    UnclosedParen { span: Span },

    #[error("{span}: expected ')' or ',' in argument list")]
    BadArgumentList { span: Span },

    #[error("{span}: expected identifier after quantifier")]
    MissingBoundVariable { span: Span },

    #[error("{span}: expected ',' after quantified variable")]
    MissingQuantifierComma { span: Span },

    #[error("{span}: expected function name in prototype")]
    MissingFunctionName { span: Span },

    #[error("{span}: expected '(' in prototype")]
    MissingPrototypeOpen { span: Span },

    #[error("{span}: expected ')' in prototype")]
    MissingPrototypeClose { span: Span },

    #[error("{span}: expected parameter name after ','")]
    MissingParameter { span: Span },

    #[error("{span}: expressions nested deeper than {limit} levels")]
    TooDeep { span: Span, limit: usize },

    #[error("{span}: unexpected trailing input, found {found}")]
    TrailingInput { span: Span, found: Token },
}

impl ParseError {
    pub fn span(&self) -> Span {
        match self {
            Self::UnknownToken { span, .. }
            | Self::UnclosedParen { span }
            | Self::BadArgumentList { span }
            | Self::MissingBoundVariable { span }
            | Self::MissingQuantifierComma { span }
            | Self::MissingFunctionName { span }
            | Self::MissingPrototypeOpen { span }
            | Self::MissingPrototypeClose { span }
            | Self::MissingParameter { span }
            | Self::TooDeep { span, .. }
            | Self::TrailingInput { span, .. } => *span,
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("{errors} top-level item(s) failed to parse")]
    Rejected { errors: usize },
}
