use lazy_static::lazy_static;
use std::collections::HashMap;
use std::iter::Peekable;
use std::mem;
use std::str::Chars;

use tracing::debug;

use crate::diagnostic::Diagnostics;
use crate::error::ScanError;
use crate::token::{Literal, Token};
use crate::token_type::TokenType::{self, *};

lazy_static! {
    static ref KEYWORDS: HashMap<&'static str, TokenType> = HashMap::from([
        ("and", And),
        ("break", Break),
        ("class", Class),
        ("continue", Continue),
        ("else", Else),
        ("false", False),
        ("for", For),
        ("fun", Fun),
        ("if", If),
        ("nil", Nil),
        ("or", Or),
        ("print", Print),
        ("return", Return),
        ("super", Super),
        ("this", This),
        ("true", True),
        ("var", Var),
        ("while", While),
    ]);
}

pub struct Scanner<'a> {
    source: Peekable<Chars<'a>>,
    tokens: Vec<Token>,
    text: String,
    line: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Scanner {
            source: source.chars().peekable(),
            tokens: Vec::new(),
            text: String::new(),
            line: 1,
        }
    }

    /// Scan the whole source. Malformed lexemes are reported to `diagnostics`
    /// and skipped; the returned sequence always ends with a single EOF token.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn scan_tokens(mut self, diagnostics: &mut Diagnostics) -> Result<Vec<Token>, ScanError> {
        if self.source.peek().is_none() {
            return Err(ScanError::EmptySource);
        }

        while let Some(c) = self.source.next() {
            self.text.push(c);
            self.scan_token(c, diagnostics);
        }

        self.tokens.push(Token::eof(self.line));
        debug!(tokens = self.tokens.len(), lines = self.line, "scan complete");
        Ok(self.tokens)
    }

    fn scan_token(&mut self, c: char, diagnostics: &mut Diagnostics) {
        match c {
            '(' => self.add_token(LeftParen),
            ')' => self.add_token(RightParen),
            '{' => self.add_token(LeftBrace),
            '}' => self.add_token(RightBrace),
            ',' => self.add_token(Comma),
            '.' => self.add_token(Dot),
            '-' => self.add_token(Minus),
            '+' => self.add_token(Plus),
            ';' => self.add_token(Semicolon),
            '*' => self.add_token(Star),
            '!' => {
                let matched = self.match_next('=');
                self.add_token(if matched { BangEqual } else { Bang })
            }
            '=' => {
                let matched = self.match_next('=');
                self.add_token(if matched { EqualEqual } else { Equal })
            }
            '<' => {
                let matched = self.match_next('=');
                self.add_token(if matched { LessEqual } else { Less })
            }
            '>' => {
                let matched = self.match_next('=');
                self.add_token(if matched { GreaterEqual } else { Greater })
            }
            '/' => {
                if self.match_next('/') {
                    while let Some(&c) = self.source.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.source.next();
                    }
                    self.text.clear();
                } else {
                    self.add_token(Slash);
                }
            }
            ' ' | '\r' | '\t' => {
                self.text.clear();
            }
            '\n' => {
                self.line += 1;
                self.text.clear();
            }
            '"' => self.scan_string(diagnostics),
            _ => {
                if is_digit(c) {
                    self.scan_number(diagnostics);
                } else if is_alpha(c) {
                    self.scan_identifier();
                } else {
                    diagnostics.error(self.line, "Unexpected Character Encountered");
                    self.text.clear();
                }
            }
        };
    }

    fn scan_string(&mut self, diagnostics: &mut Diagnostics) {
        while let Some(&c) = self.source.peek() {
            if c == '"' {
                break;
            }
            if c == '\n' {
                self.line += 1;
            }
            self.text.push(c);
            self.source.next();
        }

        if self.source.peek().is_none() {
            diagnostics.error(self.line, "Unterminated string.");
            self.text.clear();
            return;
        }

        // closing "
        self.source.next();
        self.text.push('"');

        let value = self.text[1..self.text.len() - 1].to_owned();
        self.add_literal_token(StringToken, Literal::StringLiteral(value));
    }

    fn scan_number(&mut self, diagnostics: &mut Diagnostics) {
        self.advance_digits();

        // a fractional part needs a digit after the '.'
        if let Some(&'.') = self.source.peek() {
            // clone the source iterator so that we can peek 2 characters ahead
            let mut cloned = self.source.clone();
            cloned.next();
            if cloned.peek().is_some_and(|&next_c| is_digit(next_c)) {
                self.text.push('.');
                self.source.next();
                self.advance_digits();
            }
        }

        match self.text.parse::<f64>() {
            Ok(value) => self.add_literal_token(Number, Literal::F64(value)),
            Err(_) => {
                diagnostics.error(self.line, "Invalid number literal.");
                self.text.clear();
            }
        }
    }

    fn advance_digits(&mut self) {
        while let Some(&c) = self.source.peek() {
            if !is_digit(c) {
                break;
            }
            self.text.push(c);
            self.source.next();
        }
    }

    fn scan_identifier(&mut self) {
        while let Some(&c) = self.source.peek() {
            if !is_alpha_num(c) {
                break;
            }
            self.text.push(c);
            self.source.next();
        }

        match KEYWORDS.get(self.text.as_str()) {
            Some(&typ) => self.add_token(typ),
            None => {
                let identifier = self.text.clone();
                self.add_literal_token(Identifier, Literal::IdentifierLiteral(identifier));
            }
        }
    }

    fn match_next(&mut self, expected: char) -> bool {
        match self.source.peek() {
            Some(&next_char) if next_char == expected => {
                self.source.next();
                self.text.push(expected);
                true
            }
            _ => false,
        }
    }

    fn add_token(&mut self, typ: TokenType) {
        self.add_literal_token(typ, Literal::None);
    }

    fn add_literal_token(&mut self, typ: TokenType, literal: Literal) {
        let lexeme = mem::take(&mut self.text);
        self.tokens.push(Token {
            typ,
            lexeme,
            literal,
            line: self.line,
        });
    }
}

fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

fn is_alpha(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_alpha_num(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
