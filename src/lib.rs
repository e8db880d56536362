//! A tree-walking interpreter for a small dynamically typed scripting
//! language: source text is scanned into tokens, parsed into statements and
//! executed directly against a chain of lexical scopes.

mod ast_display;
pub mod diagnostic;
pub mod environment;
pub mod error;
pub mod expr;
pub mod interpreter;
pub mod lox;
pub mod parser;
pub mod scanner;
pub mod stmt;
pub mod token;
pub mod token_type;
pub mod value;

pub use diagnostic::{Diagnostic, Diagnostics};
pub use error::{LoxError, RuntimeError, ScanError};
pub use lox::Lox;
pub use value::Value;
