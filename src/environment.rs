use std::collections::HashMap;

use tracing::trace;

use crate::{error::RuntimeError, token::Token, value::Value};

type Scope = HashMap<String, Value>;

/// Chain of scopes from the global scope (first) to the innermost block
/// (last). Blocks nest strictly, so the chain is kept as a stack: entering a
/// block pushes a scope and leaving it pops that scope along with its values.
#[derive(Debug)]
pub struct Environment {
    layers: Vec<Scope>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            layers: vec![HashMap::new()],
        }
    }

    pub fn add_scope(&mut self) {
        self.layers.push(HashMap::new());
        trace!(depth = self.depth(), "enter scope");
    }

    /// Drop the innermost scope. The global scope is never dropped.
    pub fn del_scope(&mut self) {
        if self.layers.len() > 1 {
            self.layers.pop();
        }
        trace!(depth = self.depth(), "leave scope");
    }

    /// Number of active scopes, the global one included.
    pub fn depth(&self) -> usize {
        self.layers.len()
    }

    /// Bind `name` in the innermost scope, replacing any binding it already
    /// holds there.
    pub fn define(&mut self, name: &str, value: Value) {
        if let Some(scope) = self.layers.last_mut() {
            scope.insert(name.to_string(), value);
        }
    }

    pub fn get(&self, name: &Token) -> Result<Value, RuntimeError> {
        self.layers
            .iter()
            .rev()
            .find_map(|values| values.get(&name.lexeme))
            .cloned()
            .ok_or_else(|| RuntimeError::undefined_variable(name))
    }

    /// Rebind `name` in the innermost scope that defines it.
    pub fn assign(&mut self, name: &Token, value: Value) -> Result<Value, RuntimeError> {
        match self
            .layers
            .iter_mut()
            .rev()
            .find_map(|values| values.get_mut(&name.lexeme))
        {
            Some(slot) => {
                *slot = value.clone();
                Ok(value)
            }
            None => Err(RuntimeError::undefined_variable(name)),
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Literal;
    use crate::token_type::TokenType;
    use pretty_assertions::assert_eq;

    fn name(lexeme: &str) -> Token {
        Token::new(
            TokenType::Identifier,
            lexeme,
            Literal::IdentifierLiteral(lexeme.to_string()),
            1,
        )
    }

    #[test]
    fn test_basic_define_get() {
        let mut env = Environment::new();
        env.define("x", Value::Number(42.0));
        assert_eq!(env.get(&name("x")).unwrap(), Value::Number(42.0));
    }

    #[test]
    fn test_redefine_overwrites() {
        let mut env = Environment::new();
        env.define("x", Value::Number(1.0));
        env.define("x", Value::from("one"));
        assert_eq!(env.get(&name("x")).unwrap(), Value::from("one"));
    }

    #[test]
    fn test_shadowing_and_scope_exit() {
        let mut env = Environment::new();
        env.define("x", Value::Number(1.0));

        env.add_scope();
        env.define("x", Value::Number(2.0));
        env.define("y", Value::Nil);
        assert_eq!(env.get(&name("x")).unwrap(), Value::Number(2.0));

        env.del_scope();
        assert_eq!(env.get(&name("x")).unwrap(), Value::Number(1.0));
        assert!(matches!(
            env.get(&name("y")),
            Err(RuntimeError::UndefinedVariable { ref name, line: 1 }) if name == "y"
        ));
    }

    #[test]
    fn test_assign_updates_enclosing_scope() {
        let mut env = Environment::new();
        env.define("x", Value::Number(1.0));

        env.add_scope();
        assert_eq!(env.assign(&name("x"), Value::Number(2.0)).unwrap(), Value::Number(2.0));
        assert_eq!(env.depth(), 2);

        env.del_scope();
        assert_eq!(env.get(&name("x")).unwrap(), Value::Number(2.0));
    }

    #[test]
    fn test_assign_undefined_fails() {
        let mut env = Environment::new();
        env.add_scope();
        let result = env.assign(&name("missing"), Value::Nil);
        assert_eq!(result.unwrap_err().to_string(), "Undefined variable 'missing'.");
    }

    #[test]
    fn test_global_scope_is_never_dropped() {
        let mut env = Environment::new();
        env.define("x", Value::Bool(true));
        env.del_scope();
        assert_eq!(env.depth(), 1);
        assert_eq!(env.get(&name("x")).unwrap(), Value::Bool(true));
    }
}
