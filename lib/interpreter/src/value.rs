use std::fmt::{self, Display, Formatter};

use parser::LiteralValue;

#[derive(Debug, Clone, PartialEq, derive_more::From)]
pub enum Value {
    Number(f64),
    Boolean(bool),
    Str(String),
    Nil,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum ValueKind {
    #[display(fmt = "number")]
    Number,
    #[display(fmt = "boolean")]
    Boolean,
    #[display(fmt = "string")]
    Str,
    #[display(fmt = "nil")]
    Nil,
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Number(_) => ValueKind::Number,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::Str(_) => ValueKind::Str,
            Value::Nil => ValueKind::Nil,
        }
    }

    /// `nil` and `false` are falsy, everything else (including `0` and `""`) is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Nil => false,
            Value::Boolean(b) => *b,
            _ => true,
        }
    }

    /// Values of different kinds are never equal. Unlike `==` on `f64`, `NaN` equals itself.
    pub fn equals(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Number(l), Value::Number(r)) => l == r || (l.is_nan() && r.is_nan()),
            (Value::Boolean(l), Value::Boolean(r)) => l == r,
            (Value::Str(l), Value::Str(r)) => l == r,
            _ => false,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Str(s) => write!(f, "{}", s),
            Value::Nil => write!(f, "nil"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<LiteralValue<'_>> for Value {
    fn from(literal: LiteralValue<'_>) -> Self {
        match literal {
            LiteralValue::Number(n) => Value::Number(n),
            LiteralValue::Str(s) => s.into(),
            LiteralValue::Boolean(b) => Value::Boolean(b),
            LiteralValue::Nil => Value::Nil,
        }
    }
}
