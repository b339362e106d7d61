//! General error types shared by all stages of the toolkit

use std::fmt::{Display, Formatter};

use thiserror::Error as ThisError;

/// Global result type used throughout the crate
pub type ParserResult<T> = Result<T, Error>;

/// Enumeration of the various different stages that can produce an error
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Stage {
    /// The lexical analysis stage
    Lexer,
    /// The parsing/tree construction stage
    Parser,
    /// The path-query scanning and execution stage
    Query,
    /// The structural merge stage
    Merge,
}

/// A global enumeration of error details
#[derive(Debug, Clone, PartialEq, ThisError)]
pub enum Details {
    #[error("illegal character found: '{0}'")]
    IllegalCharacter(char),
    #[error("end of input found whilst scanning a string")]
    UnterminatedString,
    #[error("end of input found whilst looking for the end of a block comment")]
    UnterminatedBlockComment,
    #[error("expected '/' or '*' after '/'")]
    InvalidCommentStart,
    #[error("expected a valid JSON identifier, found: {0}")]
    UnrecognisedIdentifier(String),

    #[error("invalid numeric representation found in input: {0}")]
    InvalidNumericRepresentation(String),
    #[error("unexpected token: expected {expected}, found: {found}")]
    UnexpectedToken {
        expected: &'static str,
        found: String,
    },
    #[error("expected a value at the document root, found none")]
    NoRootValue,
    #[error("{}", join_errors(.0))]
    Multiple(Vec<Error>),
    #[error("unable to open or read the input file")]
    InvalidFile,
    #[error("input is not valid UTF-8")]
    NonUtf8Input,

    #[error("query must start with '$', representing the document root")]
    MissingRootSelector,
    #[error("the document root is an object, so a query must begin with a key selector such as '$.key'")]
    WrongObjectRootSelector,
    #[error("the document root is an array, so a query must begin with an index selector such as '$[0]'")]
    WrongArrayRootSelector,
    #[error("expected '.' for an object selection or '[' for an array selection, got: '{0}'")]
    SelectorSyntax(String),
    #[error("invalid object selector: expected a key, found: '{0}'")]
    InvalidObjectSelector(String),
    #[error("invalid array selector: expected an index, found: '{0}'")]
    InvalidArraySelector(String),
    #[error("query ends part way through a selector")]
    IncompleteSelector,
    #[error("could not find a property with key: {0}")]
    KeyNotFound(String),
    #[error("index {index} is out of range for an array of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("{selector} selector applied to {node} node")]
    AccessMismatch {
        selector: &'static str,
        node: &'static str,
    },
    #[error("query path continues past the literal value at {0}")]
    TraversalIntoLiteral(String),
    #[error("could not convert query result '{found}' into {wanted}")]
    ValueConversion {
        wanted: &'static str,
        found: String,
    },

    #[error("mismatched types at '{path}': base holds {base}, incoming holds {incoming}")]
    MergeTypeMismatch {
        path: String,
        base: &'static str,
        incoming: &'static str,
    },
}

/// The general error structure
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    /// The originating stage for the error
    pub stage: Stage,
    /// The global error code for the error
    pub details: Details,
    /// Source line the error relates to, where one is known
    pub line: Option<usize>,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.line {
            Some(line) => write!(f, "{} (line {})", self.details, line),
            None => write!(f, "{}", self.details),
        }
    }
}

impl std::error::Error for Error {}

fn join_errors(errors: &[Error]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<String>>()
        .join("; ")
}

#[macro_export]
macro_rules! parser_error {
    ($details: expr) => {
        Err($crate::errors::Error {
            stage: $crate::errors::Stage::Parser,
            details: $details,
            line: None,
        })
    };
    ($details: expr, $line: expr) => {
        Err($crate::errors::Error {
            stage: $crate::errors::Stage::Parser,
            details: $details,
            line: Some($line),
        })
    };
}

#[macro_export]
macro_rules! query_error {
    ($details: expr) => {
        Err($crate::errors::Error {
            stage: $crate::errors::Stage::Query,
            details: $details,
            line: None,
        })
    };
}

#[macro_export]
macro_rules! merge_error {
    ($details: expr) => {
        Err($crate::errors::Error {
            stage: $crate::errors::Stage::Merge,
            details: $details,
            line: None,
        })
    };
}

#[cfg(test)]
mod tests {
    use super::{Details, Error, Stage};

    #[test]
    fn should_render_line_information() {
        let err = Error {
            stage: Stage::Lexer,
            details: Details::UnterminatedString,
            line: Some(4),
        };
        assert_eq!(
            err.to_string(),
            "end of input found whilst scanning a string (line 4)"
        );
    }

    #[test]
    fn should_join_multiple_errors() {
        let err = Error {
            stage: Stage::Parser,
            details: Details::Multiple(vec![
                Error {
                    stage: Stage::Parser,
                    details: Details::NoRootValue,
                    line: None,
                },
                Error {
                    stage: Stage::Lexer,
                    details: Details::IllegalCharacter('#'),
                    line: Some(1),
                },
            ]),
            line: None,
        };
        let rendered = err.to_string();
        assert!(rendered.contains("expected a value at the document root"));
        assert!(rendered.contains("illegal character found: '#' (line 1)"));
    }
}
