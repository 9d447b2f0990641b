use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ItpError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: ItpParseErrorKind },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ItpParseErrorKind {
    #[error("Expected at least {expected} columns, found {found}")]
    MissingColumns { expected: usize, found: usize },
    #[error("Invalid integer format in column {column} (value: '{value}')")]
    InvalidInt { column: usize, value: String },
    #[error("Invalid float format in column {column} (value: '{value}')")]
    InvalidFloat { column: usize, value: String },
}

impl ItpError {
    pub(crate) fn parse(line: usize, kind: ItpParseErrorKind) -> Self {
        ItpError::Parse { line, kind }
    }
}
