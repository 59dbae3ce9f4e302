use std::{cmp::Ordering, fmt};

use serde::{Deserialize, Serialize};

use crate::types::error::DatabaseError;

/// Declared column type. Every type has a fixed encoded width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Int,
    Long,
    Float,
    Double,
    Char(u32),
    Varchar(u32),
}

impl DataType {
    /// Number of bytes a value of this type occupies in a tuple.
    pub fn encoded_width(&self) -> usize {
        match self {
            DataType::Int | DataType::Float => 4,
            DataType::Long | DataType::Double => 8,
            DataType::Char(n) | DataType::Varchar(n) => *n as usize,
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, DataType::Int | DataType::Long)
    }

    pub fn is_float(&self) -> bool {
        matches!(self, DataType::Float | DataType::Double)
    }

    pub fn is_text(&self) -> bool {
        matches!(self, DataType::Char(_) | DataType::Varchar(_))
    }

    /// Parses a SQL type name such as `INT`, `BIGINT` or `VARCHAR(16)`.
    pub fn from_string(type_str: &str) -> Result<Self, DatabaseError> {
        let normalized = type_str.trim().to_uppercase();
        let (name, length) = match normalized.split_once('(') {
            Some((name, rest)) => {
                let digits = rest.trim_end_matches(')').trim();
                let length = digits.parse::<u32>().map_err(|_| DatabaseError::InvalidData {
                    details: format!("Invalid length in type '{}'", type_str),
                })?;
                (name.trim().to_string(), Some(length))
            }
            None => (normalized.clone(), None),
        };

        let data_type = match (name.as_str(), length) {
            ("INT" | "INTEGER", _) => DataType::Int,
            ("LONG" | "BIGINT", _) => DataType::Long,
            ("FLOAT" | "REAL", _) => DataType::Float,
            ("DOUBLE" | "DOUBLE PRECISION", _) => DataType::Double,
            ("CHAR" | "CHARACTER", Some(n)) => DataType::Char(n),
            ("CHAR" | "CHARACTER", None) => DataType::Char(1),
            ("VARCHAR" | "CHARACTER VARYING", Some(n)) => DataType::Varchar(n),
            _ => {
                return Err(DatabaseError::InvalidData {
                    details: format!("Unsupported data type: {}", type_str),
                });
            }
        };
        Ok(data_type)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Int => write!(f, "INT"),
            DataType::Long => write!(f, "LONG"),
            DataType::Float => write!(f, "FLOAT"),
            DataType::Double => write!(f, "DOUBLE"),
            DataType::Char(n) => write!(f, "CHAR({})", n),
            DataType::Varchar(n) => write!(f, "VARCHAR({})", n),
        }
    }
}

/// A literal column value, as supplied to and produced by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "NULL",
            Value::Integer(_) => "INTEGER",
            Value::Real(_) => "REAL",
            Value::Text(_) => "TEXT",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Real(r) => write!(f, "{}", r),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Value::Null, Value::Null) => Some(Ordering::Equal),
            (Value::Null, _) => Some(Ordering::Less),
            (_, Value::Null) => Some(Ordering::Greater),
            (Value::Integer(a), Value::Integer(b)) => a.partial_cmp(b),
            (Value::Integer(a), Value::Real(b)) => (*a as f64).partial_cmp(b),
            (Value::Real(a), Value::Integer(b)) => a.partial_cmp(&(*b as f64)),
            (Value::Real(a), Value::Real(b)) => a.partial_cmp(b),
            (Value::Text(a), Value::Text(b)) => a.partial_cmp(b),
            _ => None, // Mixed types
        }
    }
}
