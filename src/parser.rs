use std::iter::Peekable;
use std::slice::Iter;

use tracing::debug;

use crate::diagnostic::Diagnostics;
use crate::error::ParseError;
use crate::expr::Expr;
use crate::stmt::Stmt;
use crate::token::{Literal, Token};
use crate::token_type::TokenType::{self, *};
use crate::value::Value;

// parameters: parser, and a series of TokenType variants separated by |
// return option of next token
macro_rules! match_types {
    ($parser:ident, $( $variant:pat_param )|* ) => {
        match $parser.tokens.peek() {
            Some(token) => {
                match token.typ {
                    $(
                        $variant
                    )|* => $parser.tokens.next(),
                    _ => None,
                }
            },
            None => None,
        }
    };
}

// deeper statements or expressions abort the parse with a single error
const MAX_NESTING: usize = 100;

/// Parse a token sequence into statements.
///
/// Never fails outright: a malformed declaration is reported to
/// `diagnostics` and skipped, and parsing resumes at the next statement
/// boundary. Callers must check `diagnostics.had_error()` before running the
/// result.
#[tracing::instrument(level = "debug", skip_all)]
pub fn parse(tokens: &[Token], diagnostics: &mut Diagnostics) -> Vec<Stmt> {
    let Some(eof) = tokens.last() else {
        return Vec::new();
    };

    let mut parser = Parser {
        tokens: tokens.iter().peekable(),
        eof,
        diagnostics,
        loop_depth: 0,
        nesting: 0,
        too_deep: false,
    };

    let mut statements = Vec::new();
    while !parser.is_at_end() {
        if let Some(stmt) = parser.declaration() {
            statements.push(stmt);
        }
    }

    debug!(statements = statements.len(), "parse complete");
    statements
}

struct Parser<'a, 'd> {
    tokens: Peekable<Iter<'a, Token>>,
    eof: &'a Token,
    diagnostics: &'d mut Diagnostics,
    loop_depth: usize,
    nesting: usize,
    too_deep: bool,
}

impl<'a, 'd> Parser<'a, 'd> {
    fn declaration(&mut self) -> Option<Stmt> {
        let start = self.tokens.len();
        let result = match match_types!(self, Var) {
            Some(_) => self.var_declaration(),
            None => self.statement(),
        };

        match result {
            Ok(stmt) => Some(stmt),
            Err(error) if self.too_deep => {
                debug!(%error, "abandoning parse");
                while self.tokens.next().is_some() {}
                None
            }
            Err(error) => {
                debug!(%error, "synchronizing");
                self.synchronize(start);
                None
            }
        }
    }

    fn var_declaration(&mut self) -> Result<Stmt, ParseError> {
        let name = self.consume(Identifier, "Expected variable name.")?.to_owned();

        let initializer = match match_types!(self, Equal) {
            Some(_) => Some(self.expression()?),
            None => None,
        };

        self.consume(Semicolon, "Expected ';' after variable declaration.")?;
        Ok(Stmt::Var { name, initializer })
    }

    fn statement(&mut self) -> Result<Stmt, ParseError> {
        self.nested(|parser| match parser.peek().typ {
            Print => parser.print_statement(),
            LeftBrace => {
                parser.advance();
                Ok(Stmt::Block {
                    statements: parser.block()?,
                })
            }
            If => parser.if_statement(),
            While => parser.while_statement(),
            For => parser.for_statement(),
            Break | Continue => parser.loop_control_statement(),
            _ => parser.expression_statement(),
        })
    }

    fn block(&mut self) -> Result<Vec<Stmt>, ParseError> {
        let mut statements = Vec::new();

        while !self.check(RightBrace) && !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                statements.push(stmt);
            }
        }

        self.consume(RightBrace, "Expected '}' after block.")?;
        Ok(statements)
    }

    fn print_statement(&mut self) -> Result<Stmt, ParseError> {
        let keyword = self.advance().to_owned();
        let expression = self.expression()?;
        self.consume(Semicolon, "Expected ';' after value.")?;
        Ok(Stmt::Print {
            keyword,
            expression,
        })
    }

    fn if_statement(&mut self) -> Result<Stmt, ParseError> {
        self.advance();
        self.consume(LeftParen, "Expected '(' after 'if'.")?;
        let condition = self.expression()?;
        self.consume(RightParen, "Expected ')' after if condition.")?;

        let then_branch = Box::new(self.statement()?);
        let else_branch = match match_types!(self, Else) {
            Some(_) => Some(Box::new(self.statement()?)),
            None => None,
        };

        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    fn while_statement(&mut self) -> Result<Stmt, ParseError> {
        self.advance();
        self.consume(LeftParen, "Expected '(' after 'while'.")?;
        let condition = self.expression()?;
        self.consume(RightParen, "Expected ')' after condition.")?;
        let body = Box::new(self.loop_body()?);

        Ok(Stmt::While { condition, body })
    }

    // for (init; cond; incr) body  =>  { init; while (cond) { body; incr; } }
    fn for_statement(&mut self) -> Result<Stmt, ParseError> {
        self.advance();
        self.consume(LeftParen, "Expected '(' after 'for'.")?;

        let initializer = if match_types!(self, Semicolon).is_some() {
            None
        } else if match_types!(self, Var).is_some() {
            Some(self.var_declaration()?)
        } else {
            Some(self.expression_statement()?)
        };

        let condition = if self.check(Semicolon) {
            None
        } else {
            Some(self.expression()?)
        };
        self.consume(Semicolon, "Expected ';' after loop condition.")?;

        let increment = if self.check(RightParen) {
            None
        } else {
            Some(self.expression()?)
        };
        self.consume(RightParen, "Expected ')' after for clauses.")?;

        let mut body = self.loop_body()?;

        if let Some(increment) = increment {
            body = Stmt::Block {
                statements: vec![
                    body,
                    Stmt::Expression {
                        expression: increment,
                    },
                ],
            };
        }

        let condition = condition.unwrap_or(Expr::LiteralExpr {
            value: Value::Bool(true),
        });
        body = Stmt::While {
            condition,
            body: Box::new(body),
        };

        if let Some(initializer) = initializer {
            body = Stmt::Block {
                statements: vec![initializer, body],
            };
        }

        Ok(body)
    }

    fn loop_body(&mut self) -> Result<Stmt, ParseError> {
        self.loop_depth += 1;
        let body = self.statement();
        self.loop_depth -= 1;
        body
    }

    fn loop_control_statement(&mut self) -> Result<Stmt, ParseError> {
        let keyword = self.advance().to_owned();

        if self.loop_depth == 0 {
            self.error(
                &keyword,
                &format!("Can't use '{}' outside of a loop.", keyword.lexeme),
            );
        }

        self.consume(
            Semicolon,
            &format!("Expected ';' after '{}'.", keyword.lexeme),
        )?;

        Ok(match keyword.typ {
            Break => Stmt::Break { keyword },
            _ => Stmt::Continue { keyword },
        })
    }

    fn expression_statement(&mut self) -> Result<Stmt, ParseError> {
        let expression = self.expression()?;
        self.consume(Semicolon, "Expected ';' after expression.")?;
        Ok(Stmt::Expression { expression })
    }

    fn expression(&mut self) -> Result<Expr, ParseError> {
        self.nested(Self::assignment)
    }

    fn assignment(&mut self) -> Result<Expr, ParseError> {
        let expr = self.logic_or()?;

        if let Some(equals) = match_types!(self, Equal) {
            let value = self.nested(Self::assignment)?;

            return match expr {
                Expr::Variable { name } => Ok(Expr::Assign {
                    name,
                    value: Box::new(value),
                }),
                _ => {
                    // reported, but the parse carries on
                    self.error(equals, "Invalid assignment target.");
                    Ok(expr)
                }
            };
        }

        Ok(expr)
    }

    fn logic_or(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.logic_and()?;

        while let Some(operator) = match_types!(self, Or) {
            let right = self.logic_and()?;
            expr = Expr::Logical {
                left: Box::new(expr),
                operator: operator.to_owned(),
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn logic_and(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.equality()?;

        while let Some(operator) = match_types!(self, And) {
            let right = self.equality()?;
            expr = Expr::Logical {
                left: Box::new(expr),
                operator: operator.to_owned(),
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn equality(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.comparison()?;

        while let Some(operator) = match_types!(self, BangEqual | EqualEqual) {
            let right = self.comparison()?;
            expr = binary(expr, operator, right);
        }

        Ok(expr)
    }

    fn comparison(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.term()?;

        while let Some(operator) = match_types!(self, Greater | GreaterEqual | Less | LessEqual) {
            let right = self.term()?;
            expr = binary(expr, operator, right);
        }

        Ok(expr)
    }

    fn term(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.factor()?;

        while let Some(operator) = match_types!(self, Minus | Plus) {
            let right = self.factor()?;
            expr = binary(expr, operator, right);
        }

        Ok(expr)
    }

    fn factor(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.unary()?;

        while let Some(operator) = match_types!(self, Slash | Star) {
            let right = self.unary()?;
            expr = binary(expr, operator, right);
        }

        Ok(expr)
    }

    fn unary(&mut self) -> Result<Expr, ParseError> {
        if let Some(operator) = match_types!(self, Bang | Minus) {
            let right = self.nested(Self::unary)?;
            Ok(Expr::Unary {
                operator: operator.to_owned(),
                right: Box::new(right),
            })
        } else {
            self.primary()
        }
    }

    fn primary(&mut self) -> Result<Expr, ParseError> {
        let token = self.peek();

        let expr = match (token.typ, &token.literal) {
            (False, _) => Expr::LiteralExpr {
                value: Value::Bool(false),
            },
            (True, _) => Expr::LiteralExpr {
                value: Value::Bool(true),
            },
            (Nil, _) => Expr::LiteralExpr { value: Value::Nil },
            (Number, Literal::F64(number)) => Expr::LiteralExpr {
                value: Value::Number(*number),
            },
            (StringToken, Literal::StringLiteral(text)) => Expr::LiteralExpr {
                value: Value::Str(text.to_owned()),
            },
            (Identifier, _) => Expr::Variable {
                name: token.to_owned(),
            },
            (LeftParen, _) => {
                self.advance();
                let expression = self.expression()?;
                self.consume(RightParen, "Expected ')' after expression.")?;
                return Ok(Expr::Grouping {
                    expression: Box::new(expression),
                });
            }
            _ => return Err(self.error(token, "Expected expression.")),
        };

        self.advance();
        Ok(expr)
    }

    fn consume(&mut self, typ: TokenType, message: &str) -> Result<&'a Token, ParseError> {
        if self.check(typ) {
            return Ok(self.advance());
        }

        let token = self.peek();
        Err(self.error(token, message))
    }

    fn check(&mut self, typ: TokenType) -> bool {
        self.peek().typ == typ
    }

    fn peek(&mut self) -> &'a Token {
        match self.tokens.peek() {
            Some(&token) => token,
            None => self.eof,
        }
    }

    fn advance(&mut self) -> &'a Token {
        self.tokens.next().unwrap_or(self.eof)
    }

    fn is_at_end(&mut self) -> bool {
        match self.tokens.peek() {
            Some(token) => token.typ == Eof,
            None => true,
        }
    }

    // Run a recursive grammar rule one level deeper, failing once the
    // program nests past MAX_NESTING.
    fn nested<T>(
        &mut self,
        rule: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.nesting == MAX_NESTING {
            let token = self.peek();
            let error = self.error(token, "Too much nesting.");
            self.too_deep = true;
            return Err(error);
        }

        self.nesting += 1;
        let result = rule(self);
        self.nesting -= 1;
        result
    }

    // once the nesting limit is hit, errors from unwinding rules are dropped
    fn error(&mut self, token: &Token, message: &str) -> ParseError {
        let error = ParseError::at(token, message);
        if !self.too_deep {
            self.diagnostics.parse_error(&error);
        }
        error
    }

    // discard tokens until the next statement boundary
    fn synchronize(&mut self, start: usize) {
        if self.tokens.len() == start {
            self.advance();
        }

        while !self.is_at_end() {
            match self.peek().typ {
                Class | Fun | Var | For | If | While | Print | Return | Break | Continue => return,
                Semicolon => {
                    self.advance();
                    return;
                }
                _ => {
                    self.advance();
                }
            }
        }
    }
}

fn binary(left: Expr, operator: &Token, right: Expr) -> Expr {
    Expr::Binary {
        left: Box::new(left),
        operator: operator.to_owned(),
        right: Box::new(right),
    }
}
