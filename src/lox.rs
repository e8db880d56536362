use std::io::{self, Write};

use tracing::{debug, warn};

use crate::diagnostic::Diagnostics;
use crate::error::{LoxError, ScanError};
use crate::interpreter::Interpreter;
use crate::parser;
use crate::scanner::Scanner;
use crate::stmt::Stmt;
use crate::token::Token;

/// One interpreter session: scan, parse and run source text against a
/// persistent global scope.
///
/// Each call to [`Lox::run`] starts with an empty diagnostics collector, so an
/// error on one REPL line does not leak into the next. Globals defined by
/// earlier runs stay visible.
pub struct Lox<W: Write> {
    interpreter: Interpreter<W>,
    diagnostics: Diagnostics,
}

impl Lox<io::Stdout> {
    pub fn new() -> Self {
        Lox::with_output(io::stdout())
    }
}

impl Default for Lox<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Lox<W> {
    pub fn with_output(output: W) -> Self {
        Lox {
            interpreter: Interpreter::with_output(output),
            diagnostics: Diagnostics::new(),
        }
    }

    /// Diagnostics reported by the most recent call.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn interpreter(&self) -> &Interpreter<W> {
        &self.interpreter
    }

    pub fn into_output(self) -> W {
        self.interpreter.into_output()
    }

    /// Run `source` through the whole pipeline.
    ///
    /// Statements are only executed when scanning and parsing reported no
    /// errors.
    #[tracing::instrument(level = "debug", skip_all, fields(bytes = source.len()))]
    pub fn run(&mut self, source: &str) -> Result<(), LoxError> {
        let statements = self.parse(source)?;

        self.interpreter.interpret(&statements).map_err(|error| {
            self.diagnostics.runtime_error(&error);
            LoxError::Runtime(error)
        })
    }

    /// Scan and parse `source` without running it.
    pub fn parse(&mut self, source: &str) -> Result<Vec<Stmt>, LoxError> {
        let tokens = self.scan(source)?;
        let statements = parser::parse(&tokens, &mut self.diagnostics);

        if self.diagnostics.had_error() {
            warn!(errors = self.diagnostics.len(), "not running source with compile errors");
            return Err(LoxError::Compile {
                errors: self.diagnostics.len(),
            });
        }

        debug!(statements = statements.len(), "parsed");
        Ok(statements)
    }

    /// Scan `source` into tokens. Malformed lexemes are reported to the
    /// diagnostics collector rather than failing the call.
    pub fn scan(&mut self, source: &str) -> Result<Vec<Token>, ScanError> {
        self.diagnostics.clear();
        Scanner::new(source).scan_tokens(&mut self.diagnostics)
    }
}
