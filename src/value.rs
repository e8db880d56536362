use std::fmt;

/// A runtime value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Nil,
    Bool(bool),
    Number(f64),
    Str(String),
}

impl Value {
    /// `nil` and `false` are falsy, everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Nil => false,
            Value::Bool(b) => *b,
            _ => true,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

// what `print` writes
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(float) if float.is_nan() => write!(f, "NaN"),
            Value::Number(float) if float.is_infinite() => {
                write!(f, "{}", if *float > 0.0 { "+Inf" } else { "-Inf" })
            }
            Value::Number(float) => write!(f, "{float}"),
            Value::Str(s) => write!(f, "{s}"),
        }
    }
}
