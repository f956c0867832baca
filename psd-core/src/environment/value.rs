use std::fmt::Display;

use crate::parser::prelude::TypeName;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    // the explicit "no value" marker of unset variables and array leaves
    Null,
    Int(i64),
    Real(f64),
    Str(String),
    Boolean(bool),
    Array(Vec<Value>),
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Int(value) => write!(f, "{value}"),
            // whole-numbered reals print without a fraction
            Value::Real(value) => {
                if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
                    write!(f, "{}", *value as i64)
                } else {
                    write!(f, "{value}")
                }
            },
            Value::Str(value) => write!(f, "{value}"),
            Value::Boolean(value) => write!(f, "{value}"),
            // arrays stringify as an opaque placeholder
            Value::Array(items) => write!(f, "[Array({})]", items.len())
        }
    }
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Int(_) => "integer",
            Self::Real(_) => "real",
            Self::Str(_) => "string",
            Self::Boolean(_) => "boolean",
            Self::Array(_) => "array"
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Int(value) => Some(*value as f64),
            Self::Real(value) => Some(*value),
            _ => None
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Self::Str(_))
    }

    /// Only `false` and the unset marker count as false. Numeric zero and
    /// empty text are truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Self::Boolean(false) | Self::Null)
    }

    /// By-value comparison with no coercion, except that the two numeric
    /// kinds share one numeric domain.
    pub fn equals(&self, other: &Value) -> bool {
        match (self.as_number(), other.as_number()) {
            (Some(left), Some(right)) => left == right,
            _ => self == other
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Integer,
    Real,
    String,
    Character,
    Boolean
}

impl Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Integer => "integer",
            Self::Real => "real",
            Self::String => "string",
            Self::Character => "character",
            Self::Boolean => "boolean"
        };

        write!(f, "{name}")
    }
}

impl From<TypeName> for ValueType {
    fn from(value: TypeName) -> Self {
        match value {
            TypeName::Integer => ValueType::Integer,
            TypeName::Real => ValueType::Real,
            TypeName::String => ValueType::String,
            TypeName::Character => ValueType::Character,
            TypeName::Boolean => ValueType::Boolean
        }
    }
}

impl ValueType {
    /// Runtime shape check applied on every write: integer demands a
    /// whole-numbered numeric value, real any numeric value, character
    /// exactly one text element, string and boolean an exact kind match.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Self::Integer => match value {
                Value::Int(_) => true,
                Value::Real(value) => value.fract() == 0.0,
                _ => false
            },
            Self::Real => matches!(value, Value::Int(_) | Value::Real(_)),
            Self::String => matches!(value, Value::Str(_)),
            Self::Character => matches!(value, Value::Str(value) if value.chars().count() == 1),
            Self::Boolean => matches!(value, Value::Boolean(_))
        }
    }
}
