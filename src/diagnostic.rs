use std::fmt;
use std::io::{self, Write};

use tracing::debug;

use crate::error::{Location, ParseError, RuntimeError};

/// Which phase produced a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Scan,
    Parse,
    Runtime,
}

/// One reported error
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub kind: Kind,
    pub line: usize,
    pub location: Location,
    pub message: String,
}

impl Diagnostic {
    pub fn is_compile_error(&self) -> bool {
        matches!(self.kind, Kind::Scan | Kind::Parse)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            Kind::Runtime => write!(
                f,
                "[line {line}] Error: {message}\n{message}\n[line {line}]",
                line = self.line,
                message = self.message
            ),
            Kind::Scan | Kind::Parse => write!(
                f,
                "[line {}] Error{}: {}",
                self.line, self.location, self.message
            ),
        }
    }
}

/// Ordered collection of every error reported during a run.
///
/// Scanner, parser and interpreter all record into the same collector, which
/// the caller inspects once a run finishes.
#[derive(Debug, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scanner error, reported without a location.
    pub fn error(&mut self, line: usize, message: impl Into<String>) {
        self.push(Diagnostic {
            kind: Kind::Scan,
            line,
            location: Location::Unknown,
            message: message.into(),
        });
    }

    pub fn parse_error(&mut self, error: &ParseError) {
        self.push(Diagnostic {
            kind: Kind::Parse,
            line: error.line,
            location: error.location.clone(),
            message: error.message.clone(),
        });
    }

    pub fn runtime_error(&mut self, error: &RuntimeError) {
        self.push(Diagnostic {
            kind: Kind::Runtime,
            line: error.line(),
            location: Location::Unknown,
            message: error.to_string(),
        });
    }

    fn push(&mut self, diagnostic: Diagnostic) {
        debug!(kind = ?diagnostic.kind, line = diagnostic.line, "{}", diagnostic.message);
        self.items.push(diagnostic);
    }

    /// True when a scan or parse error was reported.
    pub fn had_error(&self) -> bool {
        self.items.iter().any(Diagnostic::is_compile_error)
    }

    pub fn had_runtime_error(&self) -> bool {
        self.items.iter().any(|d| d.kind == Kind::Runtime)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.items.iter()
    }

    /// Write every diagnostic, one per line, in report order.
    pub fn emit<W: Write>(&self, mut out: W) -> io::Result<()> {
        for diagnostic in &self.items {
            writeln!(out, "{diagnostic}")?;
        }
        Ok(())
    }
}
