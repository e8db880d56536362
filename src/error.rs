use std::io;

use thiserror::Error;

use crate::token::Token;
use crate::token_type::TokenType;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    #[error("Source is empty.")]
    EmptySource,
}

/// Raised at the token a grammar rule rejected. Caught at the nearest
/// declaration, where the parser synchronizes.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("[line {line}] Error{location}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub location: Location,
    pub message: String,
}

impl ParseError {
    pub fn at(token: &Token, message: impl Into<String>) -> Self {
        ParseError {
            line: token.line,
            location: Location::of(token),
            message: message.into(),
        }
    }
}

/// Where in a line a compile-time error was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Unknown,
    AtEnd,
    At(String),
}

impl Location {
    pub fn of(token: &Token) -> Self {
        match token.typ {
            TokenType::Eof => Location::AtEnd,
            _ => Location::At(token.lexeme.to_owned()),
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Location::Unknown => Ok(()),
            Location::AtEnd => write!(f, " at end"),
            Location::At(lexeme) => write!(f, " at '{lexeme}'"),
        }
    }
}

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Undefined variable '{name}'.")]
    UndefinedVariable { name: String, line: usize },

    #[error("{message}")]
    Type { message: &'static str, line: usize },

    #[error("Could not write output.")]
    Output {
        line: usize,
        #[source]
        source: io::Error,
    },
}

impl RuntimeError {
    pub fn undefined_variable(name: &Token) -> Self {
        RuntimeError::UndefinedVariable {
            name: name.lexeme.to_owned(),
            line: name.line,
        }
    }

    pub fn type_error(operator: &Token, message: &'static str) -> Self {
        RuntimeError::Type {
            message,
            line: operator.line,
        }
    }

    pub fn line(&self) -> usize {
        match self {
            RuntimeError::UndefinedVariable { line, .. } => *line,
            RuntimeError::Type { line, .. } => *line,
            RuntimeError::Output { line, .. } => *line,
        }
    }
}

/// Outcome of one run through the whole pipeline.
#[derive(Debug, Error)]
pub enum LoxError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error("{errors} compile error(s).")]
    Compile { errors: usize },

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl LoxError {
    /// Conventional process status for this error class.
    pub fn exit_code(&self) -> u8 {
        match self {
            LoxError::Scan(_) | LoxError::Compile { .. } => 65,
            LoxError::Runtime(_) => 70,
        }
    }
}
