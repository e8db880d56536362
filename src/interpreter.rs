use std::io::Write;

use tracing::{debug, trace};

use crate::environment::Environment;
use crate::error::RuntimeError;
use crate::expr::Expr;
use crate::stmt::Stmt;
use crate::token::Token;
use crate::token_type::TokenType;
use crate::value::Value;

/// What a statement asks of the loop it runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Next,
    Break,
    Continue,
}

/// Tree-walking evaluator. Owns the scope chain and writes `print` output
/// to `output`.
pub struct Interpreter<W: Write> {
    environment: Environment,
    output: W,
}

impl<W: Write> Interpreter<W> {
    pub fn with_output(output: W) -> Self {
        Interpreter {
            environment: Environment::new(),
            output,
        }
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Execute `statements` in order, stopping at the first runtime error.
    #[tracing::instrument(level = "debug", skip_all, fields(count = statements.len()))]
    pub fn interpret(&mut self, statements: &[Stmt]) -> Result<(), RuntimeError> {
        for statement in statements {
            if let Err(error) = self.execute(statement) {
                debug!(%error, "runtime error");
                return Err(error);
            }
        }
        Ok(())
    }

    pub fn execute(&mut self, stmt: &Stmt) -> Result<Flow, RuntimeError> {
        match stmt {
            Stmt::Block { statements } => self.execute_block(statements),
            Stmt::Break { .. } => Ok(Flow::Break),
            Stmt::Continue { .. } => Ok(Flow::Continue),
            Stmt::Expression { expression } => {
                self.evaluate(expression)?;
                Ok(Flow::Next)
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch)
                } else {
                    Ok(Flow::Next)
                }
            }
            Stmt::Print {
                keyword,
                expression,
            } => {
                let value = self.evaluate(expression)?;
                writeln!(self.output, "{value}").map_err(|source| RuntimeError::Output {
                    line: keyword.line,
                    source,
                })?;
                Ok(Flow::Next)
            }
            Stmt::Var { name, initializer } => {
                let value = match initializer {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                self.environment.define(&name.lexeme, value);
                Ok(Flow::Next)
            }
            Stmt::While { condition, body } => {
                while self.evaluate(condition)?.is_truthy() {
                    match self.execute(body)? {
                        Flow::Break => break,
                        Flow::Continue | Flow::Next => {}
                    }
                }
                Ok(Flow::Next)
            }
        }
    }

    /// Run `statements` in a fresh scope. The scope is dropped however the
    /// block ends: normally, through break/continue, or with an error.
    pub fn execute_block(&mut self, statements: &[Stmt]) -> Result<Flow, RuntimeError> {
        self.environment.add_scope();
        let result = self.execute_statements(statements);
        self.environment.del_scope();
        result
    }

    fn execute_statements(&mut self, statements: &[Stmt]) -> Result<Flow, RuntimeError> {
        for statement in statements {
            match self.execute(statement)? {
                Flow::Next => {}
                flow => {
                    trace!(?flow, "unwinding block");
                    return Ok(flow);
                }
            }
        }
        Ok(Flow::Next)
    }

    pub fn evaluate(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Assign { name, value } => {
                let value = self.evaluate(value)?;
                self.environment.assign(name, value)
            }
            Expr::Binary {
                left,
                operator,
                right,
            } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                binary(operator, left, right)
            }
            Expr::Grouping { expression } => self.evaluate(expression),
            Expr::LiteralExpr { value } => Ok(value.clone()),
            Expr::Logical {
                left,
                operator,
                right,
            } => {
                let left = self.evaluate(left)?;
                let short_circuits = match operator.typ {
                    TokenType::Or => left.is_truthy(),
                    _ => !left.is_truthy(),
                };

                if short_circuits {
                    Ok(left)
                } else {
                    self.evaluate(right)
                }
            }
            Expr::Unary { operator, right } => {
                let right = self.evaluate(right)?;
                match operator.typ {
                    TokenType::Bang => Ok(Value::Bool(!right.is_truthy())),
                    TokenType::Minus => match right {
                        Value::Number(value) => Ok(Value::Number(-value)),
                        _ => Err(RuntimeError::type_error(
                            operator,
                            "Operand must be a number.",
                        )),
                    },
                    _ => Err(RuntimeError::type_error(
                        operator,
                        "Expected a unary operator.",
                    )),
                }
            }
            Expr::Variable { name } => self.environment.get(name),
        }
    }
}

fn binary(operator: &Token, left: Value, right: Value) -> Result<Value, RuntimeError> {
    use TokenType::*;

    match operator.typ {
        Plus => match (left, right) {
            (Value::Number(l), Value::Number(r)) => Ok(Value::Number(l + r)),
            (Value::Str(l), Value::Str(r)) => Ok(Value::Str(l + &r)),
            _ => Err(RuntimeError::type_error(
                operator,
                "Operands must be two numbers or two strings.",
            )),
        },
        Minus => numeric(operator, left, right).map(|(l, r)| Value::Number(l - r)),
        Slash => numeric(operator, left, right).map(|(l, r)| Value::Number(l / r)),
        Star => numeric(operator, left, right).map(|(l, r)| Value::Number(l * r)),
        Greater => numeric(operator, left, right).map(|(l, r)| Value::Bool(l > r)),
        GreaterEqual => numeric(operator, left, right).map(|(l, r)| Value::Bool(l >= r)),
        Less => numeric(operator, left, right).map(|(l, r)| Value::Bool(l < r)),
        LessEqual => numeric(operator, left, right).map(|(l, r)| Value::Bool(l <= r)),
        BangEqual => Ok(Value::Bool(left != right)),
        EqualEqual => Ok(Value::Bool(left == right)),
        _ => Err(RuntimeError::type_error(
            operator,
            "Expected a binary operator.",
        )),
    }
}

fn numeric(operator: &Token, left: Value, right: Value) -> Result<(f64, f64), RuntimeError> {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => Ok((l, r)),
        _ => Err(RuntimeError::type_error(
            operator,
            "Operands must be numbers.",
        )),
    }
}
