use std::fmt;

use crate::{expr::Expr, stmt::Stmt, value::Value};

// Parenthesized prefix form, used by `--ast` and the parser tests.

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Assign { name, value } => {
                write!(f, "(= {} {value})", name.lexeme)
            }
            Expr::Binary {
                left,
                operator,
                right,
            }
            | Expr::Logical {
                left,
                operator,
                right,
            } => {
                write!(f, "({} {left} {right})", operator.lexeme)
            }
            Expr::Grouping { expression } => {
                write!(f, "(group {expression})")
            }
            Expr::LiteralExpr { value } => match value {
                Value::Str(s) => write!(f, "\"{s}\""),
                _ => write!(f, "{value}"),
            },
            Expr::Unary { operator, right } => {
                write!(f, "({} {right})", operator.lexeme)
            }
            Expr::Variable { name } => {
                write!(f, "{}", name.lexeme)
            }
        }
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Block { statements } => {
                write!(f, "(block")?;
                for statement in statements {
                    write!(f, " {statement}")?;
                }
                write!(f, ")")
            }
            Stmt::Break { .. } => write!(f, "(break)"),
            Stmt::Continue { .. } => write!(f, "(continue)"),
            Stmt::Expression { expression } => write!(f, "(; {expression})"),
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => match else_branch {
                Some(else_branch) => write!(f, "(if {condition} {then_branch} {else_branch})"),
                None => write!(f, "(if {condition} {then_branch})"),
            },
            Stmt::Print { expression, .. } => write!(f, "(print {expression})"),
            Stmt::Var { name, initializer } => match initializer {
                Some(initializer) => write!(f, "(var {} = {initializer})", name.lexeme),
                None => write!(f, "(var {})", name.lexeme),
            },
            Stmt::While { condition, body } => write!(f, "(while {condition} {body})"),
        }
    }
}
